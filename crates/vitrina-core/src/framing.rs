//! Auto-framing: center and scale a loaded model, then place the camera
//!
//! The model's largest dimension is mapped to `NORMALIZE_FACTOR * NORMALIZE_FACTOR`
//! world units (2.25). The factor is applied twice on purpose; the page was tuned
//! against that exact size.

use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::bounds::Bounds;

/// Applied twice: `scale = NORMALIZE_FACTOR / max_dim * NORMALIZE_FACTOR`
pub const NORMALIZE_FACTOR: f32 = 1.5;

/// How far behind the fit distance the camera sits
pub const DISTANCE_MARGIN: f32 = 1.5;

/// Camera lift as a fraction of the framed height
pub const LIFT_FRACTION: f32 = 0.2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FramingError {
    #[error("model has no measurable extent (max dimension {0})")]
    Degenerate(f32),
}

/// Centering offset and uniform scale for a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Translation applied in the model's own (unscaled) space
    pub offset: Vec3,
    /// Uniform scale applied around the centered origin
    pub scale: f32,
}

impl Normalization {
    /// Combined transform: translate by `offset`, then scale
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.scale)) * Mat4::from_translation(self.offset)
    }
}

/// Camera placement for a framed model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical-fit distance before the margin is applied
    pub distance: f32,
}

/// Compute the centering offset and scale for a model box
pub fn normalize(bounds: &Bounds) -> Result<Normalization, FramingError> {
    let max_dim = bounds.max_dimension();
    if bounds.is_empty() || !max_dim.is_finite() || max_dim <= f32::EPSILON {
        return Err(FramingError::Degenerate(max_dim));
    }

    Ok(Normalization {
        offset: -bounds.center(),
        scale: NORMALIZE_FACTOR / max_dim * NORMALIZE_FACTOR,
    })
}

/// Distance at which `height` exactly fills a perspective camera's vertical fov
pub fn fit_distance(height: f32, fov_radians: f32) -> f32 {
    (height / 2.0) / (fov_radians / 2.0).tan()
}

/// Place the camera in front of (+Z) and slightly above the box center
pub fn frame(bounds: &Bounds, fov_radians: f32) -> Framing {
    let center = bounds.center();
    let size = bounds.size();
    let distance = fit_distance(size.y, fov_radians);

    let eye = center + Vec3::new(0.0, size.y * LIFT_FRACTION, distance * DISTANCE_MARGIN);

    Framing {
        eye,
        target: center,
        distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-4)
    }

    #[test]
    fn test_normalized_model_is_centered_and_sized() {
        let raw = Bounds::new(Vec3::new(2.0, 10.0, -3.0), Vec3::new(4.0, 18.0, 1.0));
        let norm = normalize(&raw).unwrap();

        let scaled = raw.transformed(&norm.matrix());
        assert!(approx_vec(scaled.center(), Vec3::ZERO));
        assert!(approx(scaled.max_dimension(), 2.25));
        assert!(approx(raw.max_dimension() * norm.scale, 2.25));
    }

    #[test]
    fn test_scale_uses_double_factor() {
        let raw = Bounds::new(Vec3::ZERO, Vec3::new(1.0, 3.0, 0.5));
        let norm = normalize(&raw).unwrap();
        assert!(approx(norm.scale, 1.5 / 3.0 * 1.5));
        assert_eq!(norm.offset, -raw.center());
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        assert!(matches!(normalize(&Bounds::EMPTY), Err(FramingError::Degenerate(_))));

        let flat_point = Bounds::new(Vec3::ONE, Vec3::ONE);
        assert!(matches!(normalize(&flat_point), Err(FramingError::Degenerate(_))));

        // A flat but non-zero box is still framable
        let plane = Bounds::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 2.0));
        assert!(normalize(&plane).is_ok());
    }

    #[test]
    fn test_fit_distance_formula() {
        // 75° vertical fov, two units tall
        let d75 = fit_distance(2.0, 75f32.to_radians());
        assert!(approx(d75, 1.0 / 37.5f32.to_radians().tan()));
        assert!((d75 - 1.3032).abs() < 1e-3);

        // The same height at 50° lands at ~2.144
        let d50 = fit_distance(2.0, 50f32.to_radians());
        assert!((d50 - 2.1445).abs() < 1e-3);
    }

    #[test]
    fn test_frame_places_camera_back_and_up() {
        let scaled = Bounds::new(Vec3::new(-0.5, -1.0, -0.25), Vec3::new(0.5, 1.0, 0.25));
        let fov = 75f32.to_radians();
        let framing = frame(&scaled, fov);

        let expected_distance = fit_distance(2.0, fov);
        assert!(approx(framing.distance, expected_distance));
        assert_eq!(framing.target, Vec3::ZERO);
        assert!(approx_vec(
            framing.eye,
            Vec3::new(0.0, 2.0 * 0.2, expected_distance * 1.5)
        ));
    }

    #[test]
    fn test_frame_follows_off_center_box() {
        let scaled = Bounds::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 2.0, 2.0));
        let framing = frame(&scaled, 75f32.to_radians());
        assert_eq!(framing.target, Vec3::new(2.0, 1.5, 1.5));
        assert!(approx(framing.eye.x, 2.0));
        assert!(approx(framing.eye.y, 1.5 + 0.2));
    }
}
