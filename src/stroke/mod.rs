//! World-space strokes from placed streamlines

pub mod frame;
pub mod projector;

pub use frame::ImageFrame;
pub use projector::{project, project_all, Stroke, StrokeSet};
