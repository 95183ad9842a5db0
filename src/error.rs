// THEORY:
// The engine itself has almost no failure surface: once a `Pixelator` exists,
// every run completes. Errors are confined to the edges of the system:
// constructing buffers and parameters that would otherwise divide by zero or
// never terminate, and the optional I/O helpers around the core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixelateError {
    /// The image has no pixels.
    #[error("image must have a non-zero area, got {width}x{height}")]
    EmptyImage { width: usize, height: usize },

    /// The byte buffer does not match the declared dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A run parameter is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse parameters: {0}")]
    Json(#[from] serde_json::Error),

    /// A background clustering task panicked or was cancelled.
    #[error("pixelation task failed: {0}")]
    TaskJoin(String),
}

pub type Result<T> = std::result::Result<T, PixelateError>;
