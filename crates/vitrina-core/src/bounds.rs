//! Axis-aligned bounding boxes over model geometry

use glam::{Mat4, Vec3};

/// Axis-aligned box. An empty box has `min > max` on every axis so that
/// including the first point collapses it onto that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut bounds = Self::EMPTY;
        for point in points {
            bounds.include_point(point);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Transform the eight corners and re-fit an axis-aligned box around them.
    /// Rotations make the result looser than the geometry, same as a
    /// scene-graph box computed from per-mesh boxes.
    pub fn transformed(&self, matrix: &Mat4) -> Bounds {
        if self.is_empty() {
            return *self;
        }
        Bounds::from_points(self.corners().map(|corner| matrix.transform_point3(corner)))
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Center of the box (zero for an empty box)
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis (zero for an empty box)
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    /// Largest of the x/y/z extents
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}
