//! Image-plane frame basis

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;

/// World-space placement of the image plane.
///
/// Normalized image coordinate (u, v) in [0, 1]² maps to
/// `origin + u * x_axis + v * y_axis`, with u running along pixel columns and
/// v along pixel rows of the sample grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub origin: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
}

impl ImageFrame {
    pub fn new(origin: Vec3, x_axis: Vec3, y_axis: Vec3) -> Self {
        Self { origin, x_axis, y_axis }
    }

    /// Build a frame from the world positions of three image corners:
    /// pixel (0, 0), the end of the first row, and the start of the last row.
    pub fn from_corners(origin: Vec3, x_end: Vec3, y_end: Vec3) -> Self {
        Self {
            origin,
            x_axis: x_end - origin,
            y_axis: y_end - origin,
        }
    }

    /// World position of normalized image coordinate (u, v)
    pub fn point_at(&self, u: f32, v: f32) -> Vec3 {
        self.origin + u * self.x_axis + v * self.y_axis
    }

    /// Unit normal of the image plane (x_axis × y_axis), zero if the axes are parallel
    pub fn normal(&self) -> Vec3 {
        self.x_axis.cross(self.y_axis).normalize_or_zero()
    }
}
