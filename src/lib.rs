//! Hatchfield - evenly-spaced, depth-aware hatching strokes
//!
//! A renderer samples a scene into a grid of (depth, orientation, value)
//! per pixel. This crate places streamlines that follow the orientation
//! field at an even spacing, stops them at depth discontinuities, and lifts
//! them into world space as strokes for an annotation layer.
//!
//! ```no_run
//! use hatchfield::config::HatchConfig;
//! use hatchfield::field::load_grid;
//! use hatchfield::placement::place;
//! use hatchfield::stroke::project_all;
//!
//! # fn main() -> hatchfield::core::Result<()> {
//! let grid = load_grid("render_dov.bin.gz")?;
//! let config = HatchConfig::from_json_file("hatch.json")?;
//! let placement = place(&grid, &config.params)?;
//! let strokes = project_all(&placement.streamlines, &config.frame, grid.width(), grid.height(), config.radius);
//! strokes.to_json_file("strokes.json")?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod math;
pub mod field;
pub mod placement;
pub mod stroke;
pub mod config;
pub mod preview;
