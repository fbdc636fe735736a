//! Page configuration and display metrics

use anyhow::{Context, Result};
use vitrina_core::PortfolioConfig;
use vitrina_scene::PendingPageResizes;

/// Id of the `<script type="application/json">` element holding the configuration
pub const CONFIG_ELEMENT_ID: &str = "vitrina-config";

/// Parse configuration text. Missing or blank text means the stock page.
pub fn parse_page_config(text: Option<&str>) -> Result<PortfolioConfig> {
    match text.map(str::trim) {
        None | Some("") => Ok(PortfolioConfig::default()),
        Some(json) => PortfolioConfig::from_json(json).context("invalid page configuration"),
    }
}

/// Read the page configuration
pub fn load_page_config() -> Result<PortfolioConfig> {
    let text = js_interop::config_text()?;
    parse_page_config(text.as_deref())
}

/// Device pixel ratio of the display (1.0 when unknown)
pub fn device_pixel_ratio() -> f64 {
    js_interop::device_pixel_ratio()
}

/// Queue every browser window resize for the viewer
pub fn forward_page_resizes(pending: PendingPageResizes) -> Result<()> {
    js_interop::listen_for_resize(pending)
}

#[cfg(target_arch = "wasm32")]
mod js_interop {
    use super::*;
    use anyhow::anyhow;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    pub fn config_text() -> Result<Option<String>> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .context("no document object")?;
        Ok(document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|element| element.text_content()))
    }

    pub fn device_pixel_ratio() -> f64 {
        web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
    }

    pub fn listen_for_resize(pending: PendingPageResizes) -> Result<()> {
        let window = web_sys::window().context("no window object")?;
        let source = window.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let width = source.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or_default();
            let height = source.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or_default();
            pending.push(width as f32, height as f32);
        });
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("{:?}", e))
            .context("cannot listen for resize")?;
        closure.forget();
        Ok(())
    }
}

// Native: configuration comes from the file named by VITRINA_CONFIG
#[cfg(not(target_arch = "wasm32"))]
mod js_interop {
    use super::*;

    pub fn config_text() -> Result<Option<String>> {
        let Some(path) = std::env::var_os("VITRINA_CONFIG") else {
            return Ok(None);
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.to_string_lossy()))?;
        Ok(Some(text))
    }

    pub fn device_pixel_ratio() -> f64 {
        1.0
    }

    // winit reports native window resizes itself
    pub fn listen_for_resize(_pending: PendingPageResizes) -> Result<()> {
        Ok(())
    }
}
