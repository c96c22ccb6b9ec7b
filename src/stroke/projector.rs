//! Lifting pixel-space streamlines into world-space strokes

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::{Result, Vec3};
use crate::placement::Streamline;
use super::frame::ImageFrame;

/// World-space polyline with a uniform radius
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Vec3>,
    pub radius: f32,
}

/// Ordered strokes, ready for an annotation layer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeSet {
    pub strokes: Vec<Stroke>,
}

impl StrokeSet {
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total point count over all strokes
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }

    /// Points per stroke, in stroke order
    pub fn point_counts(&self) -> Vec<usize> {
        self.strokes.iter().map(|s| s.points.len()).collect()
    }

    /// All positions as one flat xyz array
    pub fn flattened_positions(&self) -> Vec<f32> {
        self.strokes
            .iter()
            .flat_map(|s| s.points.iter().flat_map(|p| p.to_array()))
            .collect()
    }

    /// One radius per point, matching `flattened_positions`
    pub fn radii(&self) -> Vec<f32> {
        self.strokes
            .iter()
            .flat_map(|s| std::iter::repeat(s.radius).take(s.points.len()))
            .collect()
    }

    /// Write the stroke set as pretty-printed JSON
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Map one streamline into world space: `(x, y) -> origin + (x/W) x_axis + (y/H) y_axis`.
pub fn project(streamline: &Streamline, frame: &ImageFrame, width: u32, height: u32, radius: f32) -> Stroke {
    let (w, h) = (width as f32, height as f32);
    Stroke {
        points: streamline
            .positions()
            .map(|p| frame.point_at(p.x / w, p.y / h))
            .collect(),
        radius,
    }
}

/// Project every streamline in parallel, preserving order.
pub fn project_all(
    streamlines: &[Streamline],
    frame: &ImageFrame,
    width: u32,
    height: u32,
    radius: f32,
) -> StrokeSet {
    StrokeSet {
        strokes: streamlines
            .par_iter()
            .map(|s| project(s, frame, width, height, radius))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::placement::StreamlinePoint;

    fn line(points: &[(f32, f32)]) -> Streamline {
        let mut pts = points.iter().map(|&(x, y)| StreamlinePoint::new(Vec2::new(x, y), 0.0));
        let seed = pts.next().unwrap();
        Streamline::from_passes(Vec::new(), seed, pts.collect())
    }

    fn frame() -> ImageFrame {
        ImageFrame::new(Vec3::new(1.0, -2.0, 0.5), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -3.0))
    }

    #[test]
    fn test_corners_map_exactly() {
        let frame = frame();
        // Normalized (0,0) and (1,1) on a 64x32 image
        let stroke = project(&line(&[(0.0, 0.0), (64.0, 32.0)]), &frame, 64, 32, 0.01);
        assert_eq!(stroke.points[0], frame.origin);
        assert_eq!(stroke.points[1], frame.origin + frame.x_axis + frame.y_axis);
        assert_eq!(stroke.radius, 0.01);
    }

    #[test]
    fn test_interior_point() {
        let frame = frame();
        let stroke = project(&line(&[(16.0, 8.0)]), &frame, 64, 32, 0.01);
        let expected = frame.origin + 0.25 * frame.x_axis + 0.25 * frame.y_axis;
        assert!((stroke.points[0] - expected).length() < 1e-6);
    }

    #[test]
    fn test_project_all_preserves_order() {
        let lines: Vec<Streamline> = (0..50)
            .map(|i| line(&[(i as f32, 0.0), (i as f32, 1.0)]))
            .collect();
        let set = project_all(&lines, &frame(), 100, 10, 0.5);
        assert_eq!(set.len(), 50);
        for (i, stroke) in set.strokes.iter().enumerate() {
            assert_eq!(stroke.points[0], frame().point_at(i as f32 / 100.0, 0.0));
        }
    }

    #[test]
    fn test_flattened_layout() {
        let lines = vec![line(&[(0.0, 0.0), (1.0, 0.0)]), line(&[(2.0, 2.0)])];
        let frame = ImageFrame::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        let set = project_all(&lines, &frame, 2, 2, 0.25);

        assert_eq!(set.point_counts(), vec![2, 1]);
        assert_eq!(set.point_count(), 3);
        assert_eq!(
            set.flattened_positions(),
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 2.0, 0.0]
        );
        assert_eq!(set.radii(), vec![0.25; 3]);
    }

    #[test]
    fn test_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strokes.json");
        let set = project_all(&[line(&[(0.0, 0.0), (1.0, 1.0)])], &frame(), 2, 2, 0.1);
        set.to_json_file(&path).unwrap();

        let back: StrokeSet = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, set);
    }
}
