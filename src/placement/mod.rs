//! Evenly-spaced, depth-aware streamline placement

pub mod params;
pub mod streamline;
pub mod separation;
pub mod integrator;
pub mod placer;

pub use params::PlacementParams;
pub use streamline::{SeedCandidate, Streamline, StreamlinePoint};
pub use separation::SeparationIndex;
pub use integrator::{grow, Growth, StopReason, StreamlineIntegrator};
pub use placer::{place, Placement, PlacementReport, StreamlinePlacer};
