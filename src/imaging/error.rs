//! Error taxonomy for every image operation.
//!
//! Engines report failures as [`EngineError`]; the [`From`] conversion below
//! folds them into the caller-facing [`ImageError`] so decode and encode
//! failures keep their identity no matter which engine produced them.

use super::backend::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    /// Bytes match neither signature, or the extension is not recognized.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    /// Malformed resize/crop request or encoding option.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Crop region exceeds the image extent.
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The engine failed a resize/crop/fill for reasons of its own.
    #[error("Engine failure: {0}")]
    Engine(String),
}

impl From<EngineError> for ImageError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Io(e) => ImageError::Io(e),
            EngineError::UnsupportedFormat(msg) => ImageError::UnsupportedFormat(msg),
            EngineError::Decode(msg) => ImageError::Decode(msg),
            EngineError::Encode(msg) => ImageError::Encode(msg),
            EngineError::Unsupported(what) => {
                ImageError::Engine(format!("operation not supported: {what}"))
            }
            EngineError::ProcessingFailed(msg) => ImageError::Engine(msg),
        }
    }
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;
