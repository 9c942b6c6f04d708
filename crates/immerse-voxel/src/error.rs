//! Error types for voxel grids.

use thiserror::Error;

/// Errors that can occur when building a voxel grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoxelError {
    /// Scale, shape, shift or tensor length do not describe a valid grid.
    #[error("invalid voxel grid: {0}")]
    InvalidGridSpec(String),
}

/// Result type for voxel grid operations.
pub type Result<T> = std::result::Result<T, VoxelError>;
