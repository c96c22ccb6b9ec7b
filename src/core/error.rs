//! Error types for hatchfield

use thiserror::Error;

/// Main error type for field loading, placement and projection
#[derive(Debug, Error)]
pub enum Error {
    #[error("point ({x}, {y}) is outside the {width}x{height} field")]
    OutOfBounds {
        x: f32,
        y: f32,
        width: u32,
        height: u32,
    },

    #[error("sample buffer holds {actual} values, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("invalid placement parameters: {0}")]
    InvalidParams(String),

    #[error("malformed sample file: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
