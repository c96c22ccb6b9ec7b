//! Sampled depth/orientation/value field and its file formats

pub mod grid;
pub mod io;

pub use grid::{DirectionValueGrid, FieldSample, CHANNELS, DEPTH, ORIENTATION, VALUE};
pub use io::{load_grid, save_grid, SampleFormat};
