//! Streamline integration through the direction field.
//!
//! A candidate is grown from its seed in both directions with fixed-length
//! midpoint (RK2) steps. Each pass ends at the first of: leaving the field,
//! coming within `d_test` of an accepted streamline, a depth jump larger than
//! `max_depth_step` among the cells a step samples from, accumulated turning
//! beyond `max_accum_angle`, the `max_steps` cap, or a degenerate/non-finite
//! field value.

use crate::core::types::Vec2;
use crate::field::DirectionValueGrid;
use super::params::PlacementParams;
use super::separation::SeparationIndex;
use super::streamline::{Streamline, StreamlinePoint};

/// Why an integration pass ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    OutOfBounds,
    Crowded,
    DepthJump,
    Curvature,
    StepLimit,
    Degenerate,
}

/// Outcome of a single direction of integration
#[derive(Clone, Debug)]
pub struct Pass {
    /// Points ordered outward from the seed, seed excluded
    pub points: Vec<StreamlinePoint>,
    pub stop: StopReason,
}

/// Full record of one growth attempt
#[derive(Clone, Debug)]
pub enum Growth {
    /// The seed itself was unusable
    RejectedSeed(StopReason),
    /// Both passes ran; `streamline` is `None` when shorter than `min_steps`
    Grown {
        forward: StopReason,
        backward: StopReason,
        point_count: usize,
        streamline: Option<Streamline>,
    },
}

impl Growth {
    pub fn into_streamline(self) -> Option<Streamline> {
        match self {
            Growth::RejectedSeed(_) => None,
            Growth::Grown { streamline, .. } => streamline,
        }
    }
}

/// Integrator for growing candidate streamlines
pub struct StreamlineIntegrator<'a> {
    grid: &'a DirectionValueGrid,
    params: &'a PlacementParams,
}

impl<'a> StreamlineIntegrator<'a> {
    pub fn new(grid: &'a DirectionValueGrid, params: &'a PlacementParams) -> Self {
        Self { grid, params }
    }

    /// Grow a streamline from `seed`, or `None` if it cannot reach `min_steps`.
    pub fn grow(&self, seed: Vec2, index: &SeparationIndex) -> Option<Streamline> {
        self.grow_traced(seed, index).into_streamline()
    }

    /// Like [`grow`](Self::grow) but reports why each pass stopped.
    pub fn grow_traced(&self, seed: Vec2, index: &SeparationIndex) -> Growth {
        let sample = match self.grid.sample(seed) {
            Ok(sample) => sample,
            Err(_) => return Growth::RejectedSeed(StopReason::OutOfBounds),
        };
        let direction = match sample.direction {
            Some(d) if sample.depth.is_finite() => d,
            _ => return Growth::RejectedSeed(StopReason::Degenerate),
        };
        if index.any_within(seed, self.params.d_test()) {
            return Growth::RejectedSeed(StopReason::Crowded);
        }

        let forward = self.trace_pass(seed, direction, index);
        let backward = self.trace_pass(seed, -direction, index);

        let point_count = backward.points.len() + 1 + forward.points.len();
        let streamline = (point_count >= self.params.min_steps).then(|| {
            Streamline::from_passes(
                backward.points,
                StreamlinePoint::new(seed, sample.depth),
                forward.points,
            )
        });

        Growth::Grown {
            forward: forward.stop,
            backward: backward.stop,
            point_count,
            streamline,
        }
    }

    /// Integrate one direction from the seed until a stop rule fires.
    fn trace_pass(&self, seed: Vec2, heading: Vec2, index: &SeparationIndex) -> Pass {
        let h = self.params.d_step;
        let d_test = self.params.d_test();

        let mut points = Vec::new();
        let mut pos = seed;
        let mut prev_dir = heading;
        let mut prev_segment: Option<Vec2> = None;
        let mut turned = 0.0f32;

        let stop = loop {
            if points.len() >= self.params.max_steps {
                break StopReason::StepLimit;
            }

            // Midpoint step, each stage oriented along the previous one
            let k1 = match self.oriented_direction(pos, prev_dir) {
                Ok(d) => d,
                Err(reason) => break reason,
            };
            let k2 = match self.oriented_direction(pos + k1 * (h * 0.5), k1) {
                Ok(d) => d,
                Err(reason) => break reason,
            };
            let next = pos + k2 * h;

            if !next.is_finite() {
                break StopReason::Degenerate;
            }
            if !self.grid.contains(next) {
                break StopReason::OutOfBounds;
            }
            let next_depth = match self.grid.depth_at(next) {
                Ok(d) if d.is_finite() => d,
                _ => break StopReason::Degenerate,
            };
            if index.any_within(next, d_test) {
                break StopReason::Crowded;
            }
            // Raw cell depths: interpolated depth ramps across a hard step
            match self.grid.depth_range(pos, next) {
                Ok(Some((min, max))) if max - min > self.params.max_depth_step => break StopReason::DepthJump,
                Ok(_) => {}
                Err(_) => break StopReason::OutOfBounds,
            }
            if let Some(prev) = prev_segment {
                turned += prev.perp_dot(k2).atan2(prev.dot(k2)).abs();
                if turned > self.params.max_accum_angle {
                    break StopReason::Curvature;
                }
            }

            points.push(StreamlinePoint::new(next, next_depth));
            pos = next;
            prev_dir = k2;
            prev_segment = Some(k2);
        };

        Pass { points, stop }
    }

    /// Field direction at `p`, flipped to agree with `reference`.
    fn oriented_direction(&self, p: Vec2, reference: Vec2) -> Result<Vec2, StopReason> {
        match self.grid.direction_at(p) {
            Ok(Some(d)) if d.dot(reference) < 0.0 => Ok(-d),
            Ok(Some(d)) => Ok(d),
            Ok(None) => Err(StopReason::Degenerate),
            Err(_) => Err(StopReason::OutOfBounds),
        }
    }
}

/// Grow a single streamline from `seed` against the current index.
pub fn grow(
    seed: Vec2,
    grid: &DirectionValueGrid,
    index: &SeparationIndex,
    params: &PlacementParams,
) -> Option<Streamline> {
    StreamlineIntegrator::new(grid, params).grow(seed, index)
}
