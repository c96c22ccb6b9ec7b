//! Immutable depth/orientation/value sample grid with interpolated queries

use crate::core::error::Error;
use crate::core::types::{Result, Vec2};
use crate::math::PixelBounds;

/// Values per cell: depth, orientation (radians), value
pub const CHANNELS: usize = 3;
/// Channel index of the depth sample
pub const DEPTH: usize = 0;
/// Channel index of the orientation angle
pub const ORIENTATION: usize = 1;
/// Channel index of the shading value
pub const VALUE: usize = 2;

/// Squared length under which an interpolated direction counts as degenerate
const MIN_DIRECTION_LENGTH_SQ: f32 = 1e-12;

/// Result of an interpolated field query
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
    pub depth: f32,
    /// Unit direction, `None` where the field has no preferred direction
    pub direction: Option<Vec2>,
    pub value: f32,
}

impl FieldSample {
    /// Orientation angle in radians in (-pi, pi], if the direction is defined
    pub fn orientation(&self) -> Option<f32> {
        self.direction.map(|d| d.y.atan2(d.x))
    }
}

/// Bilinear stencil: four cell indices and their weights
struct Stencil {
    cells: [usize; 4],
    weights: [f32; 4],
}

/// Row-major W x H grid of (depth, orientation, value) samples.
///
/// Orientation is stored twice: as the raw angle (for `cell`/`channel`) and
/// as a precomputed (cos, sin) vector that interpolation works on.
#[derive(Clone, Debug)]
pub struct DirectionValueGrid {
    width: u32,
    height: u32,
    samples: Vec<f32>,
    directions: Vec<Vec2>,
}

impl DirectionValueGrid {
    /// Build a grid from a flat buffer of `width * height * 3` values.
    pub fn from_samples(width: u32, height: u32, samples: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if width == 0 || height == 0 || samples.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: samples.len(),
            });
        }

        let directions = samples
            .chunks_exact(CHANNELS)
            .map(|cell| {
                let angle = cell[ORIENTATION];
                if angle.is_finite() {
                    Vec2::new(angle.cos(), angle.sin())
                } else {
                    Vec2::NAN
                }
            })
            .collect();

        Ok(Self {
            width,
            height,
            samples,
            directions,
        })
    }

    /// Build a grid where every cell holds the same sample. Handy for tests and benches.
    pub fn uniform(width: u32, height: u32, depth: f32, orientation: f32, value: f32) -> Result<Self> {
        let cells = width as usize * height as usize;
        let samples = std::iter::repeat([depth, orientation, value])
            .take(cells)
            .flatten()
            .collect();
        Self::from_samples(width, height, samples)
    }

    /// Build a grid by evaluating `f(x, y) -> (depth, orientation, value)` per cell.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> (f32, f32, f32)) -> Result<Self> {
        let mut samples = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let (depth, orientation, value) = f(x, y);
                samples.extend_from_slice(&[depth, orientation, value]);
            }
        }
        Self::from_samples(width, height, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Query domain [0, W-1] x [0, H-1]
    pub fn bounds(&self) -> PixelBounds {
        PixelBounds::for_grid(self.width, self.height)
    }

    /// Geometric center of the query domain
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.bounds().contains_point(p)
    }

    /// Raw flat sample buffer
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Raw (depth, orientation, value) at integer cell coordinates
    pub fn cell(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let base = self.index(x as usize, y as usize) * CHANNELS;
        Some([
            self.samples[base + DEPTH],
            self.samples[base + ORIENTATION],
            self.samples[base + VALUE],
        ])
    }

    /// Copy one channel out in row-major order
    pub fn channel(&self, channel: usize) -> Vec<f32> {
        self.samples
            .chunks_exact(CHANNELS)
            .map(|cell| cell.get(channel).copied().unwrap_or(f32::NAN))
            .collect()
    }

    /// Interpolated depth, orientation and value at `p`
    pub fn sample(&self, p: Vec2) -> Result<FieldSample> {
        let stencil = self.stencil(p)?;
        Ok(FieldSample {
            depth: self.blend_channel(&stencil, DEPTH),
            direction: self.blend_direction(&stencil),
            value: self.blend_channel(&stencil, VALUE),
        })
    }

    /// Unit direction at `p`, `Ok(None)` when the field is degenerate there
    pub fn direction_at(&self, p: Vec2) -> Result<Option<Vec2>> {
        let stencil = self.stencil(p)?;
        Ok(self.blend_direction(&stencil))
    }

    pub fn depth_at(&self, p: Vec2) -> Result<f32> {
        let stencil = self.stencil(p)?;
        Ok(self.blend_channel(&stencil, DEPTH))
    }

    pub fn value_at(&self, p: Vec2) -> Result<f32> {
        let stencil = self.stencil(p)?;
        Ok(self.blend_channel(&stencil, VALUE))
    }

    /// Smallest and largest raw depth over every cell the bilinear stencils
    /// along the segment `a`..`b` can touch. Non-finite depths are skipped;
    /// `Ok(None)` when no touched cell has a finite depth.
    pub fn depth_range(&self, a: Vec2, b: Vec2) -> Result<Option<(f32, f32)>> {
        // Bounds check both ends through the stencil
        self.stencil(a)?;
        self.stencil(b)?;

        let lo = a.min(b);
        let hi = a.max(b);
        let x_end = (hi.x.ceil() as u32).min(self.width - 1);
        let y_end = (hi.y.ceil() as u32).min(self.height - 1);

        let mut range: Option<(f32, f32)> = None;
        for y in lo.y.floor() as u32..=y_end {
            for x in lo.x.floor() as u32..=x_end {
                let depth = self.samples[self.index(x as usize, y as usize) * CHANNELS + DEPTH];
                if !depth.is_finite() {
                    continue;
                }
                range = Some(match range {
                    None => (depth, depth),
                    Some((min, max)) => (min.min(depth), max.max(depth)),
                });
            }
        }
        Ok(range)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    fn stencil(&self, p: Vec2) -> Result<Stencil> {
        if !self.contains(p) {
            return Err(Error::OutOfBounds {
                x: p.x,
                y: p.y,
                width: self.width,
                height: self.height,
            });
        }

        // Clamp the lower corner so the upper one stays in range on the last row/column
        let x0 = (p.x.floor() as usize).min(self.width.saturating_sub(2) as usize);
        let y0 = (p.y.floor() as usize).min(self.height.saturating_sub(2) as usize);
        let x1 = (x0 + 1).min(self.width as usize - 1);
        let y1 = (y0 + 1).min(self.height as usize - 1);
        let fx = (p.x - x0 as f32).clamp(0.0, 1.0);
        let fy = (p.y - y0 as f32).clamp(0.0, 1.0);

        Ok(Stencil {
            cells: [
                self.index(x0, y0),
                self.index(x1, y0),
                self.index(x0, y1),
                self.index(x1, y1),
            ],
            weights: [
                (1.0 - fx) * (1.0 - fy),
                fx * (1.0 - fy),
                (1.0 - fx) * fy,
                fx * fy,
            ],
        })
    }

    fn blend_channel(&self, stencil: &Stencil, channel: usize) -> f32 {
        let mut acc = 0.0;
        for (&cell, &w) in stencil.cells.iter().zip(&stencil.weights) {
            // Zero-weight corners must not leak a NaN from a neighboring cell
            if w > 0.0 {
                acc += w * self.samples[cell * CHANNELS + channel];
            }
        }
        acc
    }

    fn blend_direction(&self, stencil: &Stencil) -> Option<Vec2> {
        let mut reference: Option<Vec2> = None;
        let mut acc = Vec2::ZERO;
        for (&cell, &w) in stencil.cells.iter().zip(&stencil.weights) {
            if w <= 0.0 {
                continue;
            }
            let mut d = self.directions[cell];
            // The field is undirected: flip corners into the first corner's half-plane
            match reference {
                None => reference = Some(d),
                Some(r) if d.dot(r) < 0.0 => d = -d,
                Some(_) => {}
            }
            acc += w * d;
        }

        let len_sq = acc.length_squared();
        if !len_sq.is_finite() || len_sq < MIN_DIRECTION_LENGTH_SQ {
            return None;
        }
        Some(acc / len_sq.sqrt())
    }
}
