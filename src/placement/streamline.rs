//! Streamline polylines and the seed candidates they spawn

use crate::core::types::Vec2;

/// One integrated point, tagged with the depth sampled when it was created
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamlinePoint {
    pub position: Vec2,
    pub depth: f32,
}

impl StreamlinePoint {
    pub fn new(position: Vec2, depth: f32) -> Self {
        Self { position, depth }
    }
}

/// Ordered pixel-space polyline: backward pass (reversed), seed, forward pass
#[derive(Clone, Debug, PartialEq)]
pub struct Streamline {
    points: Vec<StreamlinePoint>,
    seed_index: usize,
}

/// Proposed seed position plus the local direction of the streamline that spawned it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedCandidate {
    pub position: Vec2,
    pub direction: Vec2,
}

impl SeedCandidate {
    /// Angle of the source streamline at this candidate (radians)
    pub fn angle(&self) -> f32 {
        self.direction.y.atan2(self.direction.x)
    }
}

impl Streamline {
    /// Join the two integration passes around the seed. Both passes are
    /// ordered outward from the seed.
    pub fn from_passes(
        backward: Vec<StreamlinePoint>,
        seed: StreamlinePoint,
        forward: Vec<StreamlinePoint>,
    ) -> Self {
        let seed_index = backward.len();
        let mut points = Vec::with_capacity(backward.len() + 1 + forward.len());
        points.extend(backward.into_iter().rev());
        points.push(seed);
        points.extend(forward);
        Self { points, seed_index }
    }

    pub fn points(&self) -> &[StreamlinePoint] {
        &self.points
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(|p| p.position)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point integration started from
    pub fn seed(&self) -> StreamlinePoint {
        self.points[self.seed_index]
    }

    pub fn seed_index(&self) -> usize {
        self.seed_index
    }

    /// Total polyline length
    pub fn arc_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| w[0].position.distance(w[1].position))
            .sum()
    }

    /// Positions and unit tangents every `interval` of arc length, starting at
    /// the first point. A single-point streamline has no tangent and yields nothing.
    pub fn arc_samples(&self, interval: f32) -> Vec<(Vec2, Vec2)> {
        let mut samples = Vec::new();
        if !(interval > 0.0) {
            return samples;
        }

        // Sample k sits at k * interval; summing intervals instead drifts and
        // can stall once the running total's ulp exceeds the interval
        let interval = f64::from(interval);
        let mut travelled = 0.0f64;
        let mut k = 0u64;
        for w in self.points.windows(2) {
            let (a, b) = (w[0].position, w[1].position);
            let len = a.distance(b);
            if len <= f32::EPSILON {
                continue;
            }
            let tangent = (b - a) / len;
            let end = travelled + f64::from(len);
            loop {
                let at = k as f64 * interval;
                if at > end {
                    break;
                }
                let t = ((at - travelled) / f64::from(len)) as f32;
                samples.push((a + (b - a) * t, tangent));
                k += 1;
            }
            travelled = end;
        }
        samples
    }
}
