//! Error types for mesh loading and voxelization.

use immerse_voxel::VoxelError;
use thiserror::Error;

/// Errors that can occur while loading or voxelizing a mesh.
#[derive(Error, Debug)]
pub enum VoxelizeError {
    /// Reading the mesh file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a well-formed STL.
    #[error("malformed STL: {0}")]
    Parse(String),

    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Mesh has zero extent on every axis.
    #[error("mesh has degenerate geometry: {0}")]
    DegenerateMesh(String),

    /// Invalid voxelization settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The voxelized tensor did not form a valid grid.
    #[error(transparent)]
    Grid(#[from] VoxelError),
}

/// Result type for voxelization operations.
pub type Result<T> = std::result::Result<T, VoxelizeError>;
