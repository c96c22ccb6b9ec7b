//! Evenly-spaced streamline placement.
//!
//! Accepted streamlines are processed in strict FIFO order. Each one is
//! walked at fixed arc-length intervals and proposes two jittered seeds, one
//! `d_sep` to each side. Every accepted streamline is committed to the
//! separation index before the next candidate is tested, so the output
//! depends only on the grid, the parameters and `rng_seed`.

use std::collections::VecDeque;

use serde::Serialize;

use crate::core::types::{Result, Vec2};
use crate::field::DirectionValueGrid;
use crate::math::SeededRng;
use super::integrator::{Growth, StreamlineIntegrator};
use super::params::PlacementParams;
use super::separation::SeparationIndex;
use super::streamline::{SeedCandidate, Streamline};

/// Counters describing one placement run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlacementReport {
    /// Seed candidates proposed along accepted streamlines
    pub seeds_proposed: usize,
    /// Candidates that fell outside the field
    pub rejected_out_of_bounds: usize,
    /// Candidates already within `d_test` of placed points
    pub rejected_crowded: usize,
    /// Growth attempts that ended below `min_steps` or hit a degenerate seed
    pub too_short: usize,
    /// Accepted streamlines
    pub accepted: usize,
    /// Placement stopped on `max_streamlines`
    pub budget_exhausted: bool,
    /// The center seed failed and the lattice fallback supplied the first streamline
    pub used_fallback_seed: bool,
}

/// Streamlines in acceptance order plus run counters
#[derive(Clone, Debug)]
pub struct Placement {
    pub streamlines: Vec<Streamline>,
    pub report: PlacementReport,
}

/// Sequential placement state for a single run
pub struct StreamlinePlacer<'a> {
    grid: &'a DirectionValueGrid,
    params: &'a PlacementParams,
    index: SeparationIndex,
    rng: SeededRng,
    queue: VecDeque<usize>,
    streamlines: Vec<Streamline>,
    report: PlacementReport,
}

impl<'a> StreamlinePlacer<'a> {
    /// Validate parameters and set up an empty run.
    pub fn new(grid: &'a DirectionValueGrid, params: &'a PlacementParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            grid,
            params,
            index: SeparationIndex::new(params.d_sep),
            rng: SeededRng::new(params.rng_seed),
            queue: VecDeque::new(),
            streamlines: Vec::new(),
            report: PlacementReport::default(),
        })
    }

    /// Run placement to completion.
    pub fn run(mut self) -> Placement {
        log::debug!(
            "Placing on {}x{} field, seed {}, d_sep {}",
            self.grid.width(),
            self.grid.height(),
            self.rng.seed(),
            self.params.d_sep
        );
        if !self.budget_exhausted() {
            self.place_initial();
        }

        while let Some(current) = self.queue.pop_front() {
            if self.budget_exhausted() {
                break;
            }
            // Draw every candidate's jitter before any of them is grown
            let candidates = seed_candidates(&mut self.rng, self.params, &self.streamlines[current]);
            for candidate in candidates {
                if self.budget_exhausted() {
                    break;
                }
                self.try_candidate(candidate);
            }
        }

        self.report.budget_exhausted = self.budget_exhausted();
        if self.streamlines.is_empty() {
            log::warn!(
                "No streamline could be grown on the {}x{} field",
                self.grid.width(),
                self.grid.height()
            );
        }
        log::info!(
            "Placed {} streamlines ({} points): {} seeds proposed, {} out of bounds, {} crowded, {} too short",
            self.report.accepted,
            self.index.len(),
            self.report.seeds_proposed,
            self.report.rejected_out_of_bounds,
            self.report.rejected_crowded,
            self.report.too_short,
        );

        Placement {
            streamlines: self.streamlines,
            report: self.report,
        }
    }

    /// Streamlines accepted so far
    pub fn streamlines(&self) -> &[Streamline] {
        &self.streamlines
    }

    /// Separation index of the run
    pub fn index(&self) -> &SeparationIndex {
        &self.index
    }

    fn budget_exhausted(&self) -> bool {
        self.params
            .max_streamlines
            .is_some_and(|max| self.streamlines.len() >= max)
    }

    /// Grow the first streamline at the field center, falling back to a
    /// row-major lattice of `d_sep`-spaced seeds when the center fails.
    fn place_initial(&mut self) {
        let integrator = StreamlineIntegrator::new(self.grid, self.params);
        if let Some(line) = integrator.grow(self.grid.center(), &self.index) {
            self.accept(line);
            return;
        }
        log::debug!("Center seed {:?} failed, scanning seed lattice", self.grid.center());

        let bounds = self.grid.bounds();
        let step = self.params.d_sep;
        let mut y = bounds.min.y + step * 0.5;
        while y <= bounds.max.y {
            let mut x = bounds.min.x + step * 0.5;
            while x <= bounds.max.x {
                if let Some(line) = integrator.grow(Vec2::new(x, y), &self.index) {
                    self.report.used_fallback_seed = true;
                    self.accept(line);
                    return;
                }
                x += step;
            }
            y += step;
        }
    }

    fn try_candidate(&mut self, candidate: SeedCandidate) {
        self.report.seeds_proposed += 1;
        let seed = candidate.position;

        if !self.grid.contains(seed) {
            self.report.rejected_out_of_bounds += 1;
            return;
        }
        if self.index.any_within(seed, self.params.d_test()) {
            self.report.rejected_crowded += 1;
            return;
        }

        let growth = StreamlineIntegrator::new(self.grid, self.params).grow_traced(seed, &self.index);
        match growth {
            Growth::Grown { streamline: Some(line), .. } => self.accept(line),
            Growth::Grown { point_count, forward, backward, .. } => {
                log::trace!(
                    "Seed {:?} at {:.2} rad grew only {} points (forward {:?}, backward {:?})",
                    seed, candidate.angle(), point_count, forward, backward
                );
                self.report.too_short += 1;
            }
            Growth::RejectedSeed(reason) => {
                log::trace!("Seed {:?} at {:.2} rad rejected: {:?}", seed, candidate.angle(), reason);
                self.report.too_short += 1;
            }
        }
    }

    fn accept(&mut self, line: Streamline) {
        log::debug!(
            "Accepted streamline #{} from seed {:?} with {} points",
            self.streamlines.len(),
            line.seed().position,
            line.len()
        );
        self.index.insert_streamline(&line);
        self.queue.push_back(self.streamlines.len());
        self.streamlines.push(line);
        self.report.accepted += 1;
    }
}

/// Jittered seed candidates on both sides of `line`, in proposal order.
///
/// Two draws (x, then y) are taken per candidate whatever its fate, so the
/// draw sequence depends only on the accepted streamlines.
fn seed_candidates(rng: &mut SeededRng, params: &PlacementParams, line: &Streamline) -> Vec<SeedCandidate> {
    let mut candidates = Vec::new();
    for (position, tangent) in line.arc_samples(params.seed_interval) {
        let normal = tangent.perp();
        for side in [1.0f32, -1.0] {
            let jitter = Vec2::new(rng.next_centered(), rng.next_centered()) * params.seed_box_size;
            candidates.push(SeedCandidate {
                position: position + normal * (side * params.d_sep) + jitter,
                direction: tangent,
            });
        }
    }
    candidates
}

/// Place evenly-spaced streamlines over `grid`.
pub fn place(grid: &DirectionValueGrid, params: &PlacementParams) -> Result<Placement> {
    Ok(StreamlinePlacer::new(grid, params)?.run())
}
