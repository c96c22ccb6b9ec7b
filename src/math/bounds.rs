//! Axis-aligned pixel-space bounds

use crate::core::types::Vec2;

/// Axis-aligned rectangle in continuous pixel coordinates, inclusive on both ends
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl PixelBounds {
    /// Create bounds from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Query domain of a `width` x `height` sample grid: [0, W-1] x [0, H-1]
    pub fn for_grid(width: u32, height: u32) -> Self {
        Self::new(
            Vec2::ZERO,
            Vec2::new(width.saturating_sub(1) as f32, height.saturating_sub(1) as f32),
        )
    }

    /// Get center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Check if point is inside the bounds. NaN coordinates are never inside.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_grid() {
        let bounds = PixelBounds::for_grid(4, 3);
        assert_eq!(bounds.min, Vec2::ZERO);
        assert_eq!(bounds.max, Vec2::new(3.0, 2.0));
        assert_eq!(bounds.center(), Vec2::new(1.5, 1.0));
    }

    #[test]
    fn test_contains_point() {
        let bounds = PixelBounds::for_grid(4, 4);
        assert!(bounds.contains_point(Vec2::new(0.0, 0.0)));
        assert!(bounds.contains_point(Vec2::new(3.0, 3.0)));
        assert!(!bounds.contains_point(Vec2::new(3.01, 1.0)));
        assert!(!bounds.contains_point(Vec2::new(-0.01, 1.0)));
        assert!(!bounds.contains_point(Vec2::new(f32::NAN, 1.0)));
    }
}
