//! Structured target mesh description.

use immerse_math::{Point3, Shape3, Vec3};

use crate::error::{EmbedError, Result};

/// A uniform structured mesh spanning `[0, L]` on each axis.
///
/// Point `(i, j, k)` sits at `(i * dx, j * dy, k * dz)` where
/// `d = L / (n - 1)`. An axis with a single point has zero spacing; it models
/// a 2-D slice at coordinate 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetMesh {
    shape: Shape3,
    extents: Vec3,
    spacing: Vec3,
}

impl TargetMesh {
    /// Create a mesh with `shape` points spanning `extents`.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::InvalidMeshSpec`] if any point count is zero or
    /// any extent is not a positive finite number.
    pub fn new(shape: Shape3, extents: Vec3) -> Result<Self> {
        if shape.is_empty() {
            return Err(EmbedError::InvalidMeshSpec(format!(
                "point counts must be at least 1 on every axis, got {shape}"
            )));
        }
        if extents.iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(EmbedError::InvalidMeshSpec(format!(
                "extents must be positive, got [{}, {}, {}]",
                extents.x, extents.y, extents.z
            )));
        }
        if shape.checked_len().is_none() {
            return Err(EmbedError::InvalidMeshSpec(format!(
                "point count overflows for shape {shape}"
            )));
        }

        let spacing = Vec3::new(
            axis_spacing(extents.x, shape.x),
            axis_spacing(extents.y, shape.y),
            axis_spacing(extents.z, shape.z),
        );

        Ok(Self {
            shape,
            extents,
            spacing,
        })
    }

    /// Number of points along x, y, z.
    pub fn shape(&self) -> Shape3 {
        self.shape
    }

    /// Physical size along x, y, z.
    pub fn extents(&self) -> Vec3 {
        self.extents
    }

    /// Distance between neighbouring points; 0 on single-point axes.
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// World-space position of point `(i, j, k)`.
    pub fn point(&self, i: usize, j: usize, k: usize) -> Point3 {
        Point3::new(
            i as f64 * self.spacing.x,
            j as f64 * self.spacing.y,
            k as f64 * self.spacing.z,
        )
    }
}

fn axis_spacing(extent: f64, n: usize) -> f64 {
    if n > 1 {
        extent / (n - 1) as f64
    } else {
        0.0
    }
}
