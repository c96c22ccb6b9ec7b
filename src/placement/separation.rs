//! SeparationIndex - bucketed lookup of placed streamline points.

use std::collections::HashMap;

use crate::core::types::Vec2;
use super::streamline::Streamline;

/// Bucket coordinate: (floor(x / cell), floor(y / cell))
pub type BucketKey = (i32, i32);

/// Uniform grid of buckets holding the points of accepted streamlines.
///
/// Buckets are sized to the largest radius normally queried (`d_sep`), so a
/// query only touches the 3x3 neighborhood around the query point. Larger
/// radii widen the scanned ring so answers stay exact.
pub struct SeparationIndex {
    cell_size: f32,
    buckets: HashMap<BucketKey, Vec<Vec2>>,
    len: usize,
}

impl SeparationIndex {
    /// Create an empty index. `cell_size` must be positive.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn key(&self, p: Vec2) -> BucketKey {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// Record a placed point.
    pub fn insert(&mut self, p: Vec2) {
        let key = self.key(p);
        self.buckets.entry(key).or_default().push(p);
        self.len += 1;
    }

    /// Record every point of an accepted streamline.
    pub fn insert_streamline(&mut self, streamline: &Streamline) {
        for p in streamline.positions() {
            self.insert(p);
        }
    }

    /// True iff some recorded point lies within `radius` of `p` (inclusive).
    pub fn any_within(&self, p: Vec2, radius: f32) -> bool {
        if self.len == 0 || !(radius >= 0.0) {
            return false;
        }
        let radius_sq = radius * radius;
        let hit = |bucket: &Vec<Vec2>| bucket.iter().any(|q| q.distance_squared(p) <= radius_sq);

        let reach = (radius / self.cell_size).ceil().max(1.0);
        let side = 2.0 * reach as f64 + 1.0;
        if side * side > self.buckets.len() as f64 {
            // Fewer occupied buckets than the neighborhood would visit
            return self.buckets.values().any(hit);
        }

        let reach = reach as i32;
        let (kx, ky) = self.key(p);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let key = (kx.saturating_add(dx), ky.saturating_add(dy));
                if self.buckets.get(&key).is_some_and(hit) {
                    return true;
                }
            }
        }
        false
    }

    /// Number of recorded points
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of occupied buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::streamline::StreamlinePoint;

    #[test]
    fn test_empty_index() {
        let index = SeparationIndex::new(2.0);
        assert!(index.is_empty());
        assert!(!index.any_within(Vec2::ZERO, 100.0));
    }

    #[test]
    fn test_inclusive_radius() {
        let mut index = SeparationIndex::new(2.0);
        index.insert(Vec2::new(1.0, 1.0));
        assert!(index.any_within(Vec2::new(3.0, 1.0), 2.0));
        assert!(!index.any_within(Vec2::new(3.01, 1.0), 2.0));
        assert!(index.any_within(Vec2::new(1.0, 1.0), 0.0));
    }

    #[test]
    fn test_neighbor_buckets() {
        let mut index = SeparationIndex::new(2.0);
        // Just across a bucket boundary, and on the negative side of the origin
        index.insert(Vec2::new(3.9, 3.9));
        index.insert(Vec2::new(-0.5, -0.5));
        assert_eq!(index.bucket_count(), 2);
        assert!(index.any_within(Vec2::new(4.1, 4.1), 1.0));
        assert!(index.any_within(Vec2::new(0.5, 0.5), 1.5));
        assert!(!index.any_within(Vec2::new(1.7, 1.7), 1.0));
    }

    #[test]
    fn test_radius_larger_than_cell() {
        let mut index = SeparationIndex::new(1.0);
        for i in 0..20 {
            index.insert(Vec2::new(i as f32 * 10.0, 0.0));
        }
        assert!(index.any_within(Vec2::new(5.0, 4.0), 6.5));
        assert!(!index.any_within(Vec2::new(5.0, 4.0), 6.0));
    }

    #[test]
    fn test_matches_brute_force() {
        let mut index = SeparationIndex::new(3.0);
        let points: Vec<Vec2> = (0..200)
            .map(|i| {
                let t = i as f32 * 0.37;
                Vec2::new((t * 7.3).sin() * 40.0 + 40.0, (t * 3.1).cos() * 30.0 + 30.0)
            })
            .collect();
        for &p in &points {
            index.insert(p);
        }
        assert_eq!(index.len(), 200);

        for qy in 0..16 {
            for qx in 0..16 {
                let q = Vec2::new(qx as f32 * 5.3, qy as f32 * 4.1);
                for radius in [0.5, 1.5, 3.0, 7.0] {
                    let brute = points.iter().any(|p| p.distance(q) <= radius);
                    assert_eq!(index.any_within(q, radius), brute, "q={:?} r={}", q, radius);
                }
            }
        }
    }

    #[test]
    fn test_insert_streamline() {
        let line = Streamline::from_passes(
            vec![StreamlinePoint::new(Vec2::new(0.0, 0.0), 0.0)],
            StreamlinePoint::new(Vec2::new(1.0, 0.0), 0.0),
            vec![StreamlinePoint::new(Vec2::new(2.0, 0.0), 0.0)],
        );
        let mut index = SeparationIndex::new(2.0);
        index.insert_streamline(&line);
        assert_eq!(index.len(), 3);
        for p in line.positions() {
            assert!(index.any_within(p, 0.0));
        }
    }
}
