//! Vitrina Web - browser entry point for the portfolio page
//!
//! Reads the page configuration, binds the modal and carousel overlay to the
//! DOM, and starts the bevy viewer on the page canvas.

mod app;
mod overlay;
mod page;

pub use app::run;
pub use overlay::bind_overlay;
pub use page::{device_pixel_ratio, load_page_config};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Max log level for a config value, falling back to INFO
pub fn log_level(name: &str) -> tracing::Level {
    name.trim().parse().unwrap_or(tracing::Level::INFO)
}

/// Entry point for WASM module
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // The config decides the log level, so it is read before logging starts
    let loaded = load_page_config();
    let level = loaded
        .as_ref()
        .map(|config| log_level(&config.viewer.log_level))
        .unwrap_or(tracing::Level::INFO);
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Using default page configuration: {:#}", e);
        Default::default()
    });

    run(config);
}
