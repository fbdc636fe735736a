//! Vitrina Core - Engine-independent logic for the portfolio viewer
//!
//! This crate holds everything that can be reasoned about without a renderer
//! or a browser:
//! - Bounding boxes and the auto-framing math for a loaded model
//! - The idle bob/sway motion applied to the model every frame
//! - Orbit camera state (rotate, pan, zoom around a pivot)
//! - Viewport constants and the resize policy
//! - The asset load task (timeout, cancellation) and the viewer phase machine
//! - Modal and carousel state for the page overlay
//! - Page configuration

pub mod bounds;
pub mod config;
pub mod framing;
pub mod load;
pub mod motion;
pub mod orbit;
pub mod overlay;
pub mod phase;
pub mod viewport;

pub use bounds::Bounds;
pub use config::{
    CarouselConfig, ConfigError, LightConfig, ModalConfig, OrbitConfig, OverlayConfig, PortfolioConfig, SlideConfig,
    ViewerConfig,
};
pub use framing::{Framing, FramingError, Normalization};
pub use load::{AssetLoadTask, CancellationToken, LoadError, LoadPoll, LoadStatus};
pub use motion::{IdleMotion, MotionSample};
pub use orbit::OrbitState;
pub use overlay::{Carousel, ModalEvent, ModalState, Slide};
pub use phase::{PhaseError, ViewerPhase};
pub use viewport::{SurfaceSize, ViewportState};
