//! DOM overlay: modal panels and the image carousel
//!
//! Each modal opens from its button and closes from its close control, a click
//! on its backdrop, or Escape. The carousel cycles captioned images with
//! prev/next buttons and clickable indicator dots. State lives in
//! `vitrina_core::overlay`; this module only forwards DOM events and mirrors
//! the state back into the page.

use vitrina_core::OverlayConfig;

/// What was wired up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayBinding {
    pub modals: usize,
    pub carousel: bool,
}

/// Wire the overlay to the page. Missing elements are logged and skipped.
pub fn bind_overlay(config: &OverlayConfig) -> OverlayBinding {
    match js_interop::bind(config) {
        Ok(binding) => {
            tracing::info!(
                "Overlay bound: {} of {} modals, carousel {}",
                binding.modals,
                config.modals.len(),
                if binding.carousel { "on" } else { "off" }
            );
            binding
        }
        Err(e) => {
            tracing::error!("Overlay unavailable: {:#}", e);
            OverlayBinding::default()
        }
    }
}

/// Log a DOM update that failed and carry on. Returns whether it applied.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn log_dom_failure<E: std::fmt::Debug>(action: &str, result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Cannot {}: {:?}", action, e);
            false
        }
    }
}

// ============================================================================
// JavaScript Interop (WASM only)
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod js_interop {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{anyhow, Context, Result};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent, Window};

    use vitrina_core::config::{CarouselConfig, ModalConfig};
    use vitrina_core::{Carousel, ModalEvent, ModalState, OverlayConfig, Slide};

    use super::{log_dom_failure, OverlayBinding};

    pub fn bind(config: &OverlayConfig) -> Result<OverlayBinding> {
        let window = web_sys::window().context("no window object")?;
        let document = window.document().context("no document object")?;

        let mut binding = OverlayBinding::default();
        for modal in &config.modals {
            match bind_modal(&window, &document, modal) {
                Ok(()) => binding.modals += 1,
                Err(e) => tracing::warn!("Skipping modal {}: {:#}", modal.modal_id, e),
            }
        }

        if let Some(carousel) = &config.carousel {
            match bind_carousel(&document, carousel) {
                Ok(()) => binding.carousel = true,
                Err(e) => tracing::warn!("Skipping carousel: {:#}", e),
            }
        }

        Ok(binding)
    }

    fn js_error(value: JsValue) -> anyhow::Error {
        anyhow!("{:?}", value)
    }

    fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T> {
        document
            .get_element_by_id(id)
            .with_context(|| format!("#{} not found", id))?
            .dyn_into::<T>()
            .map_err(|_| anyhow!("#{} has an unexpected element type", id))
    }

    /// Attach a listener for the lifetime of the page
    fn listen<F>(target: &EventTarget, kind: &str, handler: F) -> Result<()>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(js_error)
            .with_context(|| format!("cannot listen for {}", kind))?;
        closure.forget();
        Ok(())
    }

    fn bind_modal(window: &Window, document: &Document, config: &ModalConfig) -> Result<()> {
        let modal: HtmlElement = element_by_id(document, &config.modal_id)?;
        let button: Element = element_by_id(document, &config.button_id)?;
        let close = modal
            .query_selector(&config.close_selector)
            .map_err(js_error)
            .with_context(|| format!("bad close selector {}", config.close_selector))?;

        let state = Rc::new(RefCell::new(ModalState::default()));
        let dispatch: Rc<dyn Fn(ModalEvent)> = {
            let modal = modal.clone();
            Rc::new(move |event: ModalEvent| {
                let mut state = state.borrow_mut();
                if state.handle(&event) {
                    let result = modal.style().set_property("display", state.display());
                    log_dom_failure(&format!("restyle #{}", modal.id()), result);
                }
            })
        };

        let open = dispatch.clone();
        listen(&button, "click", move |_| open(ModalEvent::OpenClicked))?;

        match close {
            Some(close) => {
                let dispatch = dispatch.clone();
                listen(&close, "click", move |_| dispatch(ModalEvent::CloseClicked))?;
            }
            None => tracing::warn!("#{} has no {} control", config.modal_id, config.close_selector),
        }

        // The modal element is the backdrop; its content box is a child
        let backdrop: JsValue = modal.into();
        let on_window = dispatch.clone();
        listen(window, "click", move |event: Event| {
            let on_backdrop = event.target().is_some_and(|target| JsValue::from(target) == backdrop);
            on_window(ModalEvent::WindowClicked { on_backdrop });
        })?;

        listen(document, "keydown", move |event: Event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                dispatch(ModalEvent::KeyDown(key.key()));
            }
        })?;

        Ok(())
    }

    fn bind_carousel(document: &Document, config: &CarouselConfig) -> Result<()> {
        let image: HtmlImageElement = element_by_id(document, &config.image_id)?;
        let caption: Element = element_by_id(document, &config.caption_id)?;
        let prev: Element = element_by_id(document, &config.prev_button_id)?;
        let next: Element = element_by_id(document, &config.next_button_id)?;

        let found = document
            .query_selector_all(&config.indicator_selector)
            .map_err(js_error)
            .with_context(|| format!("bad indicator selector {}", config.indicator_selector))?;
        let indicators: Vec<Element> = (0..found.length())
            .filter_map(|i| found.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect();
        if indicators.len() != config.slides.len() {
            tracing::warn!(
                "Carousel has {} slides but {} indicators",
                config.slides.len(),
                indicators.len()
            );
        }

        let carousel = Rc::new(RefCell::new(Carousel::new(config.slides.iter().map(Slide::from).collect())));
        let active_class = config.active_class.clone();
        let render: Rc<dyn Fn(&Carousel)> = {
            let indicators = indicators.clone();
            Rc::new(move |carousel: &Carousel| {
                if let Some(slide) = carousel.current_slide() {
                    image.set_src(&slide.image);
                    image.set_alt(&slide.caption);
                    caption.set_text_content(Some(&slide.caption));
                }
                for (indicator, active) in indicators.iter().zip(carousel.indicator_states()) {
                    let classes = indicator.class_list();
                    let result = if active {
                        classes.add_1(&active_class)
                    } else {
                        classes.remove_1(&active_class)
                    };
                    log_dom_failure("update indicator class", result);
                }
            })
        };

        let step = |forward: bool| {
            let carousel = carousel.clone();
            let render = render.clone();
            move |_: Event| {
                let mut carousel = carousel.borrow_mut();
                if forward {
                    carousel.next();
                } else {
                    carousel.prev();
                }
                render(&carousel);
            }
        };
        listen(&prev, "click", step(false))?;
        listen(&next, "click", step(true))?;

        for (index, indicator) in indicators.iter().enumerate() {
            let carousel = carousel.clone();
            let render = render.clone();
            listen(indicator, "click", move |_| {
                let mut carousel = carousel.borrow_mut();
                carousel.show(index as isize);
                render(&carousel);
            })?;
        }

        let mut initial = carousel.borrow_mut();
        initial.show(0);
        render(&initial);
        Ok(())
    }
}

// Non-WASM stub: there is no page to bind to
#[cfg(not(target_arch = "wasm32"))]
mod js_interop {
    use anyhow::{bail, Result};
    use vitrina_core::OverlayConfig;

    use super::OverlayBinding;

    pub fn bind(_config: &OverlayConfig) -> Result<OverlayBinding> {
        bail!("no DOM on this platform")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_bind_reports_nothing_bound() {
        let binding = bind_overlay(&OverlayConfig::default());
        assert_eq!(binding, OverlayBinding::default());
    }

    #[test]
    fn test_dom_failures_are_skipped() {
        assert!(log_dom_failure::<String>("restyle #modalX", Ok(())));
        assert!(!log_dom_failure("restyle #modalX", Err("NoModificationAllowedError")));
    }
}
