#![warn(missing_docs)]

//! Surface mesh loading and voxelization for immerse.
//!
//! Turns a closed triangle mesh (typically read from STL) into a
//! [`VoxelGrid`] by slicing it at every voxel layer and scan-converting the
//! slice outlines row by row.
//!
//! # Example
//!
//! ```ignore
//! use immerse_voxelize::{read_stl, voxelize, VoxelizeSettings};
//!
//! let mesh = read_stl("body.stl")?;
//! let grid = voxelize(&mesh, &VoxelizeSettings::default())?;
//! println!("voxels: {}", grid.count());
//! ```

pub mod error;
pub mod mesh;
mod raster;
pub mod stl;

pub use error::{Result, VoxelizeError};
pub use mesh::TriangleMesh;
pub use stl::{parse_stl, read_stl};

use immerse_math::{Shape3, Vec3};
use immerse_voxel::VoxelGrid;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::raster::{extract_triangles, fill_row, row_crossings, slice_at_z, RowLayout};

/// Voxelization parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelizeSettings {
    /// Voxels along the longest extent of the mesh.
    pub resolution: usize,
}

impl Default for VoxelizeSettings {
    fn default() -> Self {
        Self { resolution: 400 }
    }
}

impl VoxelizeSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(VoxelizeError::InvalidSettings(
                "resolution must be at least 1".into(),
            ));
        }
        if self.resolution.checked_pow(3).is_none() {
            return Err(VoxelizeError::InvalidSettings(format!(
                "resolution {} gives more voxels than fit in memory",
                self.resolution
            )));
        }
        Ok(())
    }
}

/// Voxelize a closed triangle mesh.
///
/// Voxels are cubes of side `longest_extent / resolution`, and the grid
/// starts at the minimum corner of the mesh. A voxel is occupied when its
/// centre lies inside the surface by the even-odd rule, so open meshes and
/// self-intersections give holes rather than errors.
pub fn voxelize(mesh: &TriangleMesh, settings: &VoxelizeSettings) -> Result<VoxelGrid> {
    settings.validate()?;
    let bounds = mesh.bounds().ok_or(VoxelizeError::EmptyMesh)?;
    if mesh.num_triangles() == 0 {
        return Err(VoxelizeError::EmptyMesh);
    }

    let extents = bounds.extents();
    let longest = extents.max();
    if !longest.is_finite() || longest <= 0.0 {
        return Err(VoxelizeError::DegenerateMesh(format!(
            "extent [{}, {}, {}]",
            extents.x, extents.y, extents.z
        )));
    }

    let scale = settings.resolution as f64 / longest;
    let shape = Shape3::new(
        voxel_count(extents.x, scale),
        voxel_count(extents.y, scale),
        voxel_count(extents.z, scale),
    );
    let shift = bounds.min;
    log::debug!(
        "voxelizing {} triangles into {shape} voxels at scale {scale}",
        mesh.num_triangles()
    );

    let triangles = extract_triangles(mesh);
    let len = shape.checked_len().ok_or_else(|| {
        VoxelizeError::InvalidSettings(format!("{shape} voxels overflow the address space"))
    })?;
    let mut data = vec![0u8; len];
    let layout = RowLayout {
        origin: shift.x,
        scale,
    };

    data.par_chunks_mut(shape.slab_len())
        .enumerate()
        .for_each(|(k, layer)| {
            let z = centre(shift.z, k, scale);
            let segments = slice_at_z(&triangles, z);
            if segments.is_empty() {
                return;
            }
            for (j, row) in layer.chunks_exact_mut(shape.x).enumerate() {
                let crossings = row_crossings(&segments, centre(shift.y, j, scale));
                fill_row(row, &crossings, layout);
            }
        });

    let grid = VoxelGrid::new(shape, data, Vec3::repeat(scale), shift)?;
    log::info!(
        "voxelized mesh: {} voxels, {} occupied",
        shape,
        grid.occupied_count()
    );
    Ok(grid)
}

/// Voxels needed to cover `extent`, at least one.
fn voxel_count(extent: f64, scale: f64) -> usize {
    // Absorb rounding so the longest axis gets exactly `resolution` voxels.
    ((extent * scale - 1e-9).ceil() as usize).max(1)
}

fn centre(origin: f64, index: usize, scale: f64) -> f64 {
    origin + (index as f64 + 0.5) / scale
}
