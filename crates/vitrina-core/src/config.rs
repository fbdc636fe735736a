//! Page configuration
//!
//! Every field has a default, so an empty JSON object (or no configuration at
//! all) yields the stock portfolio page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::motion::IdleMotion;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl PortfolioConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PortfolioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewer.validate()?;
        self.overlay.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// CSS selector of the canvas the scene renders into
    #[serde(default = "default_canvas")]
    pub canvas: String,
    /// Asset fetched on startup, relative to the page root
    #[serde(default = "default_asset_path")]
    pub asset_path: String,
    /// Give up on the asset after this many seconds (`null` waits forever)
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: Option<u64>,
    /// Vertical field of view
    #[serde(default = "default_fov_degrees")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Logical viewport the initial aspect ratio is taken from
    #[serde(default = "default_initial_viewport")]
    pub initial_viewport: [f32; 2],
    /// Canvas size in logical pixels
    #[serde(default = "default_display_size")]
    pub display_size: [u32; 2],
    /// Upper bound on the device pixel ratio used for the drawing buffer
    #[serde(default = "default_max_pixel_ratio")]
    pub max_pixel_ratio: f32,
    /// Size every resize event forces the canvas to
    #[serde(default = "default_resize_target")]
    pub resize_target: [u32; 2],
    /// Camera position before the asset is framed
    #[serde(default = "default_initial_eye")]
    pub initial_eye: [f32; 3],
    /// Orbit pivot before the asset is framed
    #[serde(default)]
    pub initial_target: [f32; 3],
    #[serde(default = "default_ambient_light")]
    pub ambient_light: LightConfig,
    #[serde(default = "default_directional_light")]
    pub directional_light: LightConfig,
    #[serde(default)]
    pub orbit: OrbitConfig,
    #[serde(default)]
    pub motion: IdleMotion,
    /// Console log level: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            canvas: default_canvas(),
            asset_path: default_asset_path(),
            load_timeout_secs: default_load_timeout_secs(),
            fov_degrees: default_fov_degrees(),
            near: default_near(),
            far: default_far(),
            initial_viewport: default_initial_viewport(),
            display_size: default_display_size(),
            max_pixel_ratio: default_max_pixel_ratio(),
            resize_target: default_resize_target(),
            initial_eye: default_initial_eye(),
            initial_target: [0.0; 3],
            ambient_light: default_ambient_light(),
            directional_light: default_directional_light(),
            orbit: OrbitConfig::default(),
            motion: IdleMotion::default(),
            log_level: default_log_level(),
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if self.initial_viewport.iter().any(|v| !(*v > 0.0)) {
            return Err(ConfigError::Invalid("initial_viewport must be positive".to_string()));
        }
        if self.display_size.contains(&0) || self.resize_target.contains(&0) {
            return Err(ConfigError::Invalid("canvas sizes must be non-zero".to_string()));
        }
        if !(self.max_pixel_ratio > 0.0) {
            return Err(ConfigError::Invalid("max_pixel_ratio must be positive".to_string()));
        }
        if self.canvas.is_empty() || self.asset_path.is_empty() {
            return Err(ConfigError::Invalid("canvas and asset_path are required".to_string()));
        }
        self.orbit.validate()
    }

    pub fn load_timeout(&self) -> Option<std::time::Duration> {
        self.load_timeout_secs.map(std::time::Duration::from_secs)
    }
}

fn default_canvas() -> String {
    "#flowerCanvas".to_string()
}

fn default_asset_path() -> String {
    "/chibi_cute.glb".to_string()
}

fn default_load_timeout_secs() -> Option<u64> {
    Some(30)
}

fn default_fov_degrees() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_initial_viewport() -> [f32; 2] {
    [500.0, 250.0]
}

fn default_display_size() -> [u32; 2] {
    [500, 350]
}

fn default_max_pixel_ratio() -> f32 {
    2.0
}

fn default_resize_target() -> [u32; 2] {
    [700, 500]
}

fn default_initial_eye() -> [f32; 3] {
    [0.0, 1.5, 4.0]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ambient_light() -> LightConfig {
    LightConfig {
        color: [1.0, 1.0, 1.0],
        intensity: 1.3,
        position: None,
    }
}

fn default_directional_light() -> LightConfig {
    LightConfig {
        color: [1.0, 1.0, 1.0],
        intensity: 2.0,
        position: Some([5.0, 10.0, 7.5]),
    }
}

/// A light in page units (1.0 is a plain white light)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// Linear RGB, 0.0-1.0
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    pub intensity: f32,
    /// Directional lights shine from here towards the origin
    #[serde(default)]
    pub position: Option<[f32; 3]>,
}

fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Pointer response of the orbit camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    /// Radians per pixel of drag
    #[serde(default = "default_rotate_sensitivity")]
    pub rotate_sensitivity: f32,
    /// Pivot travel per pixel of drag, as a fraction of the orbit radius
    #[serde(default = "default_pan_sensitivity")]
    pub pan_sensitivity: f32,
    /// Fractional radius change per scroll line
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            rotate_sensitivity: default_rotate_sensitivity(),
            pan_sensitivity: default_pan_sensitivity(),
            zoom_speed: default_zoom_speed(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
        }
    }
}

impl OrbitConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_distance > 0.0 && self.max_distance >= self.min_distance) {
            return Err(ConfigError::Invalid(format!(
                "orbit distances must satisfy 0 < min <= max, got min={} max={}",
                self.min_distance, self.max_distance
            )));
        }
        Ok(())
    }
}

fn default_rotate_sensitivity() -> f32 {
    0.005
}

fn default_pan_sensitivity() -> f32 {
    0.002
}

fn default_zoom_speed() -> f32 {
    0.05
}

fn default_min_distance() -> f32 {
    0.1
}

fn default_max_distance() -> f32 {
    100.0
}

/// DOM overlay: modal panels and the image carousel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_modals")]
    pub modals: Vec<ModalConfig>,
    #[serde(default = "default_carousel")]
    pub carousel: Option<CarouselConfig>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            modals: default_modals(),
            carousel: default_carousel(),
        }
    }
}

impl OverlayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for modal in &self.modals {
            if modal.modal_id.is_empty() || modal.button_id.is_empty() {
                return Err(ConfigError::Invalid("modal entries need modal_id and button_id".to_string()));
            }
        }
        if let Some(carousel) = &self.carousel {
            if carousel.slides.is_empty() {
                return Err(ConfigError::Invalid("carousel needs at least one slide".to_string()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalConfig {
    /// Element id of the button that opens the modal
    pub button_id: String,
    /// Element id of the modal (its backdrop)
    pub modal_id: String,
    /// Selector of the close control, searched inside the modal
    #[serde(default = "default_close_selector")]
    pub close_selector: String,
}

impl ModalConfig {
    fn named(name: &str) -> Self {
        Self {
            button_id: format!("btn{}", name),
            modal_id: format!("modal{}", name),
            close_selector: default_close_selector(),
        }
    }
}

fn default_close_selector() -> String {
    ".close".to_string()
}

fn default_modals() -> Vec<ModalConfig> {
    ["QueHago", "SobreMi", "Proyectos", "Contacto"]
        .iter()
        .map(|name| ModalConfig::named(name))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// `<img>` whose source is replaced on every change
    #[serde(default = "default_carousel_image_id")]
    pub image_id: String,
    /// Element whose text is replaced with the slide caption
    #[serde(default = "default_carousel_caption_id")]
    pub caption_id: String,
    #[serde(default = "default_carousel_prev_id")]
    pub prev_button_id: String,
    #[serde(default = "default_carousel_next_id")]
    pub next_button_id: String,
    /// Indicator dots, in slide order
    #[serde(default = "default_indicator_selector")]
    pub indicator_selector: String,
    /// Class toggled on the indicator of the current slide
    #[serde(default = "default_active_class")]
    pub active_class: String,
    pub slides: Vec<SlideConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideConfig {
    pub image: String,
    #[serde(default)]
    pub caption: String,
}

fn default_carousel_image_id() -> String {
    "carouselImage".to_string()
}

fn default_carousel_caption_id() -> String {
    "carouselCaption".to_string()
}

fn default_carousel_prev_id() -> String {
    "carouselPrev".to_string()
}

fn default_carousel_next_id() -> String {
    "carouselNext".to_string()
}

fn default_indicator_selector() -> String {
    ".carousel-indicator".to_string()
}

fn default_active_class() -> String {
    "active".to_string()
}

fn default_carousel() -> Option<CarouselConfig> {
    let slides = [
        ("/img/proyecto1.jpg", "Proyecto 1"),
        ("/img/proyecto2.jpg", "Proyecto 2"),
        ("/img/proyecto3.jpg", "Proyecto 3"),
    ]
    .iter()
    .map(|(image, caption)| SlideConfig {
        image: image.to_string(),
        caption: caption.to_string(),
    })
    .collect();

    Some(CarouselConfig {
        image_id: default_carousel_image_id(),
        caption_id: default_carousel_caption_id(),
        prev_button_id: default_carousel_prev_id(),
        next_button_id: default_carousel_next_id(),
        indicator_selector: default_indicator_selector(),
        active_class: default_active_class(),
        slides,
    })
}
