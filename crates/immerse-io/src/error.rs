//! Error types for mask output.

use thiserror::Error;

/// Errors that can occur while writing masks.
#[derive(Error, Debug)]
pub enum IoError {
    /// Writing a data or descriptor file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the descriptor failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The sink was already closed.
    #[error("sink is closed")]
    Closed,

    /// A descriptor does not fit the mask it describes.
    #[error("invalid descriptor for '{name}': {reason}")]
    InvalidDescriptor {
        /// Variable name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, IoError>;
