//! Unified error type for the Colloquy workspace.

use thiserror::Error;

/// A convenience `Result` alias using [`ColloquyError`].
pub type ColloquyResult<T> = Result<T, ColloquyError>;

/// Top-level error type for Colloquy.
#[derive(Debug, Error)]
pub enum ColloquyError {
    /// A required argument was absent or empty.
    ///
    /// Raised before any read or mutation is attempted, so a failed call
    /// never leaves the store half-modified.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
