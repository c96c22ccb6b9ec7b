//! Run configuration loaded from JSON

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::placement::PlacementParams;
use crate::stroke::ImageFrame;

/// Everything a hatching run needs besides the sample grid
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HatchConfig {
    /// Placement parameters
    pub params: PlacementParams,
    /// Image-plane basis for lifting strokes into world space
    pub frame: ImageFrame,
    /// Radius assigned to every stroke point
    pub radius: f32,
}

impl HatchConfig {
    /// Load and validate a configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: HatchConfig = serde_json::from_str(&text)?;
        config.params.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    const CONFIG: &str = r#"{
        "params": {
            "rng_seed": 3, "seed_box_size": 1.0, "d_sep": 6.0, "d_test_factor": 0.5,
            "d_step": 1.0, "max_depth_step": 0.05, "max_accum_angle": 3.0,
            "max_steps": 200, "min_steps": 8, "seed_interval": 2.0, "max_streamlines": 500
        },
        "frame": { "origin": [0.0, 0.0, 0.0], "x_axis": [1.5, 0.0, 0.0], "y_axis": [0.0, -1.0, 0.0] },
        "radius": 0.002
    }"#;

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hatch.json");
        fs::write(&path, CONFIG).unwrap();

        let config = HatchConfig::from_json_file(&path).unwrap();
        assert_eq!(config.params.max_streamlines, Some(500));
        assert_eq!(config.frame.x_axis.x, 1.5);
        assert_eq!(config.radius, 0.002);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hatch.json");
        fs::write(&path, CONFIG.replace("\"d_test_factor\": 0.5", "\"d_test_factor\": 1.5")).unwrap();
        assert!(matches!(HatchConfig::from_json_file(&path), Err(Error::InvalidParams(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(HatchConfig::from_json_file("/nonexistent/hatch.json"), Err(Error::Io(_))));
    }
}
