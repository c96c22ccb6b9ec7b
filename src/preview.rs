//! Grayscale previews of field channels and placed streamlines

use std::path::Path;

use image::{GrayImage, Luma};

use crate::core::types::{Result, Vec2};
use crate::field::DirectionValueGrid;
use crate::placement::Streamline;

/// Min/max scale `values` into [0, range]. A constant channel maps to all
/// zeros; non-finite entries are ignored for the range and map to zero.
pub fn normalize_channel(values: &[f32], range: f32) -> Vec<f32> {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if !(max > min) {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|&v| if v.is_finite() { range * (v - min) / (max - min) } else { 0.0 })
        .collect()
}

/// 8-bit image of one channel, normalized to the full gray range
pub fn channel_image(grid: &DirectionValueGrid, channel: usize) -> GrayImage {
    let normalized = normalize_channel(&grid.channel(channel), 255.0);
    let pixels: Vec<u8> = normalized.iter().map(|v| v.round().clamp(0.0, 255.0) as u8).collect();
    // Buffer length always equals width * height
    GrayImage::from_raw(grid.width(), grid.height(), pixels)
        .unwrap_or_else(|| GrayImage::new(grid.width(), grid.height()))
}

/// Channel image with streamlines drawn in black on top
pub fn streamline_overlay(grid: &DirectionValueGrid, channel: usize, streamlines: &[Streamline]) -> GrayImage {
    let mut image = channel_image(grid, channel);
    for line in streamlines {
        let points: Vec<Vec2> = line.positions().collect();
        if let [single] = points.as_slice() {
            plot(&mut image, *single);
        }
        for w in points.windows(2) {
            draw_segment(&mut image, w[0], w[1]);
        }
    }
    image
}

/// Save a preview as PNG
pub fn save_png(image: &GrayImage, path: impl AsRef<Path>) -> Result<()> {
    image.save(path.as_ref())?;
    Ok(())
}

fn draw_segment(image: &mut GrayImage, a: Vec2, b: Vec2) {
    // Half-pixel steps so no pixel along the segment is skipped
    let steps = (a.distance(b) * 2.0).ceil().max(1.0) as u32;
    for i in 0..=steps {
        plot(image, a.lerp(b, i as f32 / steps as f32));
    }
}

fn plot(image: &mut GrayImage, p: Vec2) {
    let (x, y) = (p.x.round(), p.y.round());
    if x >= 0.0 && y >= 0.0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, Luma([0]));
    }
}
