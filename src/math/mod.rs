//! Mathematical utilities

pub mod bounds;
pub mod rng;

pub use bounds::PixelBounds;
pub use rng::SeededRng;
