//! Immersed-boundary masks sampled on a target mesh.

use immerse_math::Shape3;
use rayon::prelude::*;

use crate::error::{EmbedError, Result};

/// Dense solid/fluid field over a target mesh.
///
/// Values are [`Mask::SOLID`] (0.0) or [`Mask::FLUID`] (1.0), stored z-major
/// so the buffer reads as an array of shape `(nz, ny, nx)`, which is the
/// layout solvers consume.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    shape: Shape3,
    pub(crate) data: Vec<f64>,
}

impl Mask {
    /// Value of a cell inside a body.
    pub const SOLID: f64 = 0.0;
    /// Value of a cell in the fluid.
    pub const FLUID: f64 = 1.0;

    /// An all-fluid mask.
    pub fn fluid(shape: Shape3) -> Self {
        Self {
            shape,
            data: vec![Self::FLUID; shape.len()],
        }
    }

    /// Number of points along x, y, z.
    pub fn shape(&self) -> Shape3 {
        self.shape
    }

    /// Value at point `(i, j, k)`, if it is inside the mesh.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        if i < self.shape.x && j < self.shape.y && k < self.shape.z {
            Some(self.data[self.shape.linear(i, j, k)])
        } else {
            None
        }
    }

    /// True if point `(i, j, k)` is inside a body.
    pub fn is_solid(&self, i: usize, j: usize, k: usize) -> bool {
        self.get(i, j, k) == Some(Self::SOLID)
    }

    /// Number of solid points.
    pub fn solid_count(&self) -> usize {
        self.data.par_iter().filter(|&&v| v == Self::SOLID).count()
    }

    /// The values in `(nz, ny, nx)` order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the mask, returning the values in `(nz, ny, nx)` order.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Merge another body's mask into this one.
    ///
    /// The product of two masks is fluid only where both are fluid, so the
    /// result is solid wherever either body is.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::ShapeMismatch`] if the masks were sampled on
    /// meshes with different point counts.
    pub fn combine(&mut self, other: &Mask) -> Result<()> {
        if self.shape != other.shape {
            return Err(EmbedError::ShapeMismatch {
                expected: self.shape,
                found: other.shape,
            });
        }
        self.multiply(other);
        Ok(())
    }

    pub(crate) fn multiply(&mut self, other: &Mask) {
        self.data
            .par_iter_mut()
            .zip(other.data.par_iter())
            .for_each(|(a, b)| *a *= *b);
    }
}

/// Combine any number of masks over a mesh of `shape`.
///
/// With no masks the result is all fluid.
pub fn compose(shape: Shape3, masks: impl IntoIterator<Item = Mask>) -> Result<Mask> {
    let mut acc = Mask::fluid(shape);
    for mask in masks {
        acc.combine(&mask)?;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_solid(shape: Shape3, cells: &[(usize, usize, usize)]) -> Mask {
        let mut mask = Mask::fluid(shape);
        for &(i, j, k) in cells {
            mask.data[shape.linear(i, j, k)] = Mask::SOLID;
        }
        mask
    }

    #[test]
    fn test_fluid_mask() {
        let mask = Mask::fluid(Shape3::new(3, 4, 5));
        assert_eq!(mask.as_slice().len(), 60);
        assert_eq!(mask.solid_count(), 0);
        assert_eq!(mask.get(2, 3, 4), Some(Mask::FLUID));
        assert_eq!(mask.get(3, 0, 0), None);
    }

    #[test]
    fn test_layout_is_z_major() {
        let shape = Shape3::new(3, 2, 2);
        let mask = with_solid(shape, &[(1, 0, 1)]);
        let flat = mask.into_vec();
        assert_eq!(flat[6 + 1], Mask::SOLID);
        assert_eq!(flat.iter().filter(|&&v| v == Mask::SOLID).count(), 1);
    }

    #[test]
    fn test_combine_is_commutative() {
        let shape = Shape3::new(4, 4, 4);
        let a = with_solid(shape, &[(0, 0, 0), (1, 2, 3)]);
        let b = with_solid(shape, &[(1, 2, 3), (3, 3, 3)]);

        let mut ab = a.clone();
        ab.combine(&b).unwrap();
        let mut ba = b.clone();
        ba.combine(&a).unwrap();

        assert_eq!(ab, ba);
        assert_eq!(ab.solid_count(), 3);
        assert!(ab.is_solid(3, 3, 3));
    }

    #[test]
    fn test_combine_is_idempotent() {
        let shape = Shape3::new(4, 4, 4);
        let a = with_solid(shape, &[(0, 1, 2)]);
        let mut aa = a.clone();
        aa.combine(&a).unwrap();
        assert_eq!(aa, a);
    }

    #[test]
    fn test_combine_rejects_other_mesh() {
        let mut a = Mask::fluid(Shape3::new(4, 4, 4));
        let b = Mask::fluid(Shape3::new(4, 4, 5));
        let err = a.combine(&b).unwrap_err();
        assert_eq!(
            err,
            EmbedError::ShapeMismatch {
                expected: Shape3::new(4, 4, 4),
                found: Shape3::new(4, 4, 5),
            }
        );
    }

    #[test]
    fn test_compose() {
        let shape = Shape3::new(2, 2, 2);
        let empty = compose(shape, Vec::new()).unwrap();
        assert_eq!(empty, Mask::fluid(shape));

        let all = compose(
            shape,
            vec![with_solid(shape, &[(0, 0, 0)]), with_solid(shape, &[(1, 1, 1)])],
        )
        .unwrap();
        assert_eq!(all.solid_count(), 2);
    }
}
