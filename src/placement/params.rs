//! Placement parameters

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Smallest `seed_interval` accepted, as a fraction of `d_step`
const MIN_SEED_INTERVAL_PER_STEP: f32 = 0.01;

/// Caller-supplied parameters for one placement run. Has no `Default`;
/// callers state every threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementParams {
    /// Seed of the jitter random source
    pub rng_seed: u64,
    /// Side length of the jitter square around a proposed seed (pixels)
    pub seed_box_size: f32,
    /// Target separation between accepted streamlines (pixels)
    pub d_sep: f32,
    /// Fraction of `d_sep` used as the crowding threshold while growing, in (0, 1)
    pub d_test_factor: f32,
    /// Integration step length (pixels)
    pub d_step: f32,
    /// Largest depth change allowed between consecutive points
    pub max_depth_step: f32,
    /// Largest accumulated turning angle per pass (radians)
    pub max_accum_angle: f32,
    /// Point cap of each integration pass
    pub max_steps: usize,
    /// Fewest points an accepted streamline may have
    pub min_steps: usize,
    /// Arc length between seed samples along an accepted streamline (pixels)
    pub seed_interval: f32,
    /// Stop once this many streamlines have been accepted
    #[serde(default)]
    pub max_streamlines: Option<usize>,
}

impl PlacementParams {
    /// Crowding threshold used while growing and when testing seeds
    pub fn d_test(&self) -> f32 {
        self.d_test_factor * self.d_sep
    }

    /// Upper bound on the point count of a streamline: two passes plus the seed
    pub fn max_points(&self) -> usize {
        2 * self.max_steps + 1
    }

    /// Check parameter ranges before a run.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, v: f32) -> Result<()> {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidParams(format!("{} must be positive and finite, got {}", name, v)));
            }
            Ok(())
        }
        fn non_negative(name: &str, v: f32) -> Result<()> {
            // NaN fails this check as well
            if !(v >= 0.0) {
                return Err(Error::InvalidParams(format!("{} must not be negative, got {}", name, v)));
            }
            Ok(())
        }

        positive("d_sep", self.d_sep)?;
        positive("d_step", self.d_step)?;
        positive("seed_interval", self.seed_interval)?;
        non_negative("seed_box_size", self.seed_box_size)?;
        non_negative("max_depth_step", self.max_depth_step)?;
        non_negative("max_accum_angle", self.max_accum_angle)?;

        if self.seed_interval < self.d_step * MIN_SEED_INTERVAL_PER_STEP {
            return Err(Error::InvalidParams(format!(
                "seed_interval ({}) is below {} of d_step ({})",
                self.seed_interval, MIN_SEED_INTERVAL_PER_STEP, self.d_step
            )));
        }
        if !(self.d_test_factor > 0.0 && self.d_test_factor < 1.0) {
            return Err(Error::InvalidParams(format!(
                "d_test_factor must lie in (0, 1), got {}",
                self.d_test_factor
            )));
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidParams("max_steps must be at least 1".into()));
        }
        if self.min_steps > self.max_points() {
            return Err(Error::InvalidParams(format!(
                "min_steps ({}) exceeds the longest possible streamline ({} points)",
                self.min_steps,
                self.max_points()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Moderate parameters shared by the placement tests
    pub(crate) fn test_params() -> PlacementParams {
        PlacementParams {
            rng_seed: 7,
            seed_box_size: 0.5,
            d_sep: 4.0,
            d_test_factor: 0.5,
            d_step: 1.0,
            max_depth_step: 0.5,
            max_accum_angle: std::f32::consts::PI,
            max_steps: 40,
            min_steps: 5,
            seed_interval: 1.0,
            max_streamlines: None,
        }
    }

    #[test]
    fn test_valid_params() {
        let params = test_params();
        assert!(params.validate().is_ok());
        assert_eq!(params.d_test(), 2.0);
        assert_eq!(params.max_points(), 81);
    }

    #[test]
    fn test_d_test_factor_must_be_below_one() {
        for factor in [1.0, 1.5, 0.0, -0.2, f32::NAN] {
            let params = PlacementParams { d_test_factor: factor, ..test_params() };
            assert!(matches!(params.validate(), Err(Error::InvalidParams(_))), "factor {}", factor);
        }
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(PlacementParams { d_sep: 0.0, ..test_params() }.validate().is_err());
        assert!(PlacementParams { d_step: f32::INFINITY, ..test_params() }.validate().is_err());
        assert!(PlacementParams { seed_box_size: -1.0, ..test_params() }.validate().is_err());
        assert!(PlacementParams { max_steps: 0, ..test_params() }.validate().is_err());
        assert!(PlacementParams { min_steps: 82, ..test_params() }.validate().is_err());
        assert!(PlacementParams { max_depth_step: f32::NAN, ..test_params() }.validate().is_err());
    }

    #[test]
    fn test_tiny_seed_interval_rejected() {
        let params = PlacementParams { seed_interval: 1e-9, ..test_params() };
        assert!(matches!(params.validate(), Err(Error::InvalidParams(_))));
        let params = PlacementParams { d_step: 0.5, seed_interval: 0.01, ..test_params() };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_without_budget() {
        let json = r#"{
            "rng_seed": 1, "seed_box_size": 0.5, "d_sep": 2.0, "d_test_factor": 0.5,
            "d_step": 1.0, "max_depth_step": 999.0, "max_accum_angle": 999.0,
            "max_steps": 3, "min_steps": 1, "seed_interval": 1.0
        }"#;
        let params: PlacementParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.max_streamlines, None);
        assert_eq!(params.max_steps, 3);
        assert!(params.validate().is_ok());
    }
}
