//! Error types for embedding.

use immerse_math::Shape3;
use thiserror::Error;

/// Errors that can occur while setting up or combining embeddings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbedError {
    /// Target mesh has a zero point count or a non-positive extent.
    #[error("invalid target mesh: {0}")]
    InvalidMeshSpec(String),

    /// Cylinder with a non-positive radius or a degenerate axis.
    #[error("invalid cylinder: {0}")]
    InvalidCylinder(String),

    /// Two masks sampled on different meshes cannot be combined.
    #[error("mask shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        /// Shape of the accumulating mask.
        expected: Shape3,
        /// Shape of the mask being combined into it.
        found: Shape3,
    },
}

/// Result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;
