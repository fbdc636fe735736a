//! Viewport state and the resize policy

use glam::Vec3;

use crate::config::ViewerConfig;
use crate::framing::Framing;

/// Render target size in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Clamp a device pixel ratio to `max`, treating nonsense values as 1
pub fn cap_pixel_ratio(device_pixel_ratio: f64, max: f32) -> f32 {
    if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
        return 1.0;
    }
    (device_pixel_ratio as f32).min(max)
}

/// Camera parameters plus the last known eye/target
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    /// Size every resize event is forced to
    resize_target: SurfaceSize,
}

impl ViewportState {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            aspect: config.initial_viewport[0] / config.initial_viewport[1],
            near: config.near,
            far: config.far,
            eye: Vec3::from_array(config.initial_eye),
            target: Vec3::from_array(config.initial_target),
            resize_target: SurfaceSize::new(config.resize_target[0], config.resize_target[1]),
        }
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// Handle a window resize. The reported size is ignored: the surface is
    /// always forced to the configured resize target (700×500 by default).
    pub fn apply_resize(&mut self, _width: f32, _height: f32) -> SurfaceSize {
        self.aspect = self.resize_target.aspect();
        self.resize_target
    }

    pub fn reframe(&mut self, framing: &Framing) {
        self.eye = framing.eye;
        self.target = framing.target;
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}
