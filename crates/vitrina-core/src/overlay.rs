//! Modal and carousel state for the page overlay
//!
//! The DOM layer turns browser events into these calls and then mirrors the
//! resulting state back into element styles and classes.

use crate::config::SlideConfig;

/// Something that happened to a modal or its surroundings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    /// The modal's trigger button was clicked
    OpenClicked,
    /// The close control inside the modal was clicked
    CloseClicked,
    /// A click landed on the page; `on_backdrop` is true when its target is
    /// the modal element itself (the dimmed area outside the content box)
    WindowClicked { on_backdrop: bool },
    /// A key was pressed anywhere on the page
    KeyDown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalState {
    open: bool,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Apply an event. Returns true when visibility changed.
    pub fn handle(&mut self, event: &ModalEvent) -> bool {
        let next = match event {
            ModalEvent::OpenClicked => true,
            ModalEvent::CloseClicked => false,
            ModalEvent::WindowClicked { on_backdrop: true } => false,
            ModalEvent::WindowClicked { on_backdrop: false } => self.open,
            ModalEvent::KeyDown(key) if key == "Escape" && self.open => false,
            ModalEvent::KeyDown(_) => self.open,
        };
        let changed = next != self.open;
        self.open = next;
        changed
    }

    /// CSS `display` value for the current state
    pub fn display(&self) -> &'static str {
        if self.open {
            "block"
        } else {
            "none"
        }
    }
}

/// One captioned image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub image: String,
    pub caption: String,
}

impl From<&SlideConfig> for Slide {
    fn from(config: &SlideConfig) -> Self {
        Self {
            image: config.image.clone(),
            caption: config.caption.clone(),
        }
    }
}

/// Fixed list of slides with a wrapping cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    slides: Vec<Slide>,
    current: usize,
}

impl Carousel {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    /// Select slide `n`, wrapping in both directions (`-1` is the last slide)
    pub fn show(&mut self, n: isize) -> Option<&Slide> {
        if self.slides.is_empty() {
            return None;
        }
        self.current = n.rem_euclid(self.slides.len() as isize) as usize;
        self.slides.get(self.current)
    }

    pub fn next(&mut self) -> Option<&Slide> {
        self.show(self.current as isize + 1)
    }

    pub fn prev(&mut self) -> Option<&Slide> {
        self.show(self.current as isize - 1)
    }

    /// Active flag for each indicator dot
    pub fn indicator_states(&self) -> Vec<bool> {
        (0..self.slides.len()).map(|i| i == self.current).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_slides() -> Carousel {
        Carousel::new(
            ["a", "b", "c"]
                .iter()
                .map(|name| Slide {
                    image: format!("{}.jpg", name),
                    caption: name.to_uppercase(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_show_wraps() {
        let mut carousel = three_slides();
        assert_eq!(carousel.show(-1).map(|s| s.caption.as_str()), Some("C"));
        assert_eq!(carousel.current(), 2);
        carousel.show(3);
        assert_eq!(carousel.current(), 0);
        carousel.show(7);
        assert_eq!(carousel.current(), 1);
        carousel.show(-4);
        assert_eq!(carousel.current(), 2);
    }

    #[test]
    fn test_show_is_idempotent() {
        let mut carousel = three_slides();
        carousel.show(5);
        let first = carousel.clone();
        carousel.show(5);
        assert_eq!(carousel, first);
    }

    #[test]
    fn test_next_and_prev_cycle() {
        let mut carousel = three_slides();
        carousel.prev();
        assert_eq!(carousel.current(), 2);
        carousel.next();
        carousel.next();
        assert_eq!(carousel.current(), 1);
        assert_eq!(carousel.indicator_states(), vec![false, true, false]);
    }

    #[test]
    fn test_empty_carousel() {
        let mut carousel = Carousel::new(Vec::new());
        assert!(carousel.show(1).is_none());
        assert!(carousel.next().is_none());
        assert!(carousel.indicator_states().is_empty());
    }

    #[test]
    fn test_modal_open_and_close_paths() {
        let mut modal = ModalState::default();
        assert_eq!(modal.display(), "none");

        assert!(modal.handle(&ModalEvent::OpenClicked));
        assert_eq!(modal.display(), "block");
        assert!(modal.handle(&ModalEvent::CloseClicked));
        assert!(!modal.is_open());

        modal.handle(&ModalEvent::OpenClicked);
        assert!(modal.handle(&ModalEvent::WindowClicked { on_backdrop: true }));
        assert!(!modal.is_open());

        modal.handle(&ModalEvent::OpenClicked);
        assert!(modal.handle(&ModalEvent::KeyDown("Escape".to_string())));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_modal_ignores_unrelated_events() {
        let mut modal = ModalState::default();
        modal.handle(&ModalEvent::OpenClicked);
        assert!(!modal.handle(&ModalEvent::WindowClicked { on_backdrop: false }));
        assert!(!modal.handle(&ModalEvent::KeyDown("Enter".to_string())));
        assert!(modal.is_open());

        let mut closed = ModalState::default();
        assert!(!closed.handle(&ModalEvent::KeyDown("Escape".to_string())));
        assert!(!closed.handle(&ModalEvent::CloseClicked));
    }
}
