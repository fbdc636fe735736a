//! Orbit camera state around a pivot (Y up)
//!
//! Spherical coordinates relative to `target`: `azimuth` is measured around +Y
//! starting from +Z, `elevation` is the angle above the XZ plane.

use glam::Vec3;

/// Keep the camera off the poles so `look_at` with +Y up stays well defined
pub const ELEVATION_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

const MIN_RADIUS: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub target: Vec3,
    pub radius: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self::look_from(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO)
    }
}

impl OrbitState {
    /// Derive orbit coordinates from an eye position looking at `target`
    pub fn look_from(eye: Vec3, target: Vec3) -> Self {
        let mut state = Self {
            target,
            radius: 1.0,
            azimuth: 0.0,
            elevation: 0.0,
            min_radius: MIN_RADIUS,
            max_radius: f32::INFINITY,
        };
        state.set_eye(eye);
        state
    }

    pub fn with_radius_limits(mut self, min: f32, max: f32) -> Self {
        self.min_radius = min.max(MIN_RADIUS);
        self.max_radius = max.max(self.min_radius);
        self.radius = self.radius.clamp(self.min_radius, self.max_radius);
        self
    }

    /// Re-derive the spherical coordinates from a new eye position, keeping the target
    pub fn set_eye(&mut self, eye: Vec3) {
        let offset = eye - self.target;
        let radius = offset.length();
        if !radius.is_finite() || radius < MIN_RADIUS {
            // Eye on top of the pivot: keep the previous direction
            return;
        }
        self.radius = radius.clamp(self.min_radius, self.max_radius);
        self.azimuth = offset.x.atan2(offset.z);
        self.elevation = (offset.y / radius).clamp(-1.0, 1.0).asin().clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    /// Move the pivot and place the eye, as the framing step does
    pub fn retarget(&mut self, eye: Vec3, target: Vec3) {
        self.target = target;
        self.set_eye(eye);
    }

    /// Direction from the target towards the eye
    pub fn offset_direction(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.offset_direction() * self.radius
    }

    /// Camera-space right vector projected onto the ground plane
    pub fn right(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        Vec3::new(cos_az, 0.0, -sin_az)
    }

    /// Camera-space up vector
    pub fn up(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        Vec3::new(-sin_el * sin_az, cos_el, -sin_el * cos_az)
    }

    /// Orbit by angle deltas (radians). Positive `d_elevation` raises the camera.
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.azimuth = wrap_angle(self.azimuth + d_azimuth);
        self.elevation = (self.elevation + d_elevation).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    /// Slide the pivot in the view plane. Deltas are in world units per unit radius.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let scale = self.radius;
        self.target += (self.right() * -dx + self.up() * dy) * scale;
    }

    /// Multiply the radius; factors below 1 move closer
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.radius = (self.radius * factor).clamp(self.min_radius, self.max_radius);
        }
    }
}

fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}
