//! Dense voxel occupancy grid with world-space calibration.

use immerse_math::{Aabb3, Axis, Index3, Point3, Shape3, Vec3};

use crate::error::{Result, VoxelError};

/// A voxelized body: a dense occupancy tensor plus its placement in space.
///
/// Voxel `(i, j, k)` covers the world-space cell starting at
/// `shift + (i, j, k) / scale`. The occupancy buffer is laid out z-major,
/// i.e. `data[(k * ny + j) * nx + i]`, which is the layout voxelizers emit
/// for a tensor indexed `[z][y][x]`. Shape, scale and shift are always
/// x, y, z ordered.
///
/// The grid is immutable once built and is `Sync`, so many threads may query
/// it at the same time.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    data: Vec<u8>,
    shape: Shape3,
    /// Voxels per unit length along each axis.
    scale: Vec3,
    /// World-space position of the corner of voxel (0, 0, 0).
    shift: Point3,
    /// Physical size of the grid, `shape / scale`.
    dims: Vec3,
}

impl VoxelGrid {
    /// Create a grid from a z-major occupancy buffer.
    ///
    /// # Errors
    ///
    /// Returns [`VoxelError::InvalidGridSpec`] if any scale component is not a
    /// positive finite number, any axis has zero voxels, the shift is not
    /// finite, or `data` does not hold exactly `x * y * z` values.
    pub fn new(shape: Shape3, data: Vec<u8>, scale: Vec3, shift: Point3) -> Result<Self> {
        if scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(VoxelError::InvalidGridSpec(format!(
                "scale must be positive on every axis, got [{}, {}, {}]",
                scale.x, scale.y, scale.z
            )));
        }
        if shape.is_empty() {
            return Err(VoxelError::InvalidGridSpec(format!(
                "every axis needs at least one voxel, got {shape}"
            )));
        }
        if shift.iter().any(|s| !s.is_finite()) {
            return Err(VoxelError::InvalidGridSpec("shift must be finite".into()));
        }
        let expected = shape.checked_len().ok_or_else(|| {
            VoxelError::InvalidGridSpec(format!("voxel count overflows for shape {shape}"))
        })?;
        if data.len() != expected {
            return Err(VoxelError::InvalidGridSpec(format!(
                "shape {shape} needs {expected} voxels, tensor holds {}",
                data.len()
            )));
        }

        let dims = shape.to_vec3().component_div(&scale);
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(VoxelError::InvalidGridSpec(format!(
                "shape {shape} and scale give a degenerate extent [{}, {}, {}]",
                dims.x, dims.y, dims.z
            )));
        }

        Ok(Self {
            data,
            shape,
            scale,
            shift,
            dims,
        })
    }

    /// Adopt a tensor whose shape is reported in z, y, x order.
    ///
    /// This is the layout produced by slice-based voxelizers: the buffer is
    /// indexed `[z][y][x]` while `scale` and `shift` stay x, y, z.
    pub fn from_zyx(
        shape_zyx: [usize; 3],
        data: Vec<u8>,
        scale: Vec3,
        shift: Point3,
    ) -> Result<Self> {
        Self::new(Shape3::from_zyx(shape_zyx), data, scale, shift)
    }

    /// Create a grid with every voxel set to `value`.
    pub fn filled(shape: Shape3, value: u8, scale: Vec3, shift: Point3) -> Result<Self> {
        let len = shape.checked_len().ok_or_else(|| {
            VoxelError::InvalidGridSpec(format!("voxel count overflows for shape {shape}"))
        })?;
        Self::new(shape, vec![value; len], scale, shift)
    }

    /// Create a grid by evaluating `f` at every voxel index.
    pub fn from_fn(
        shape: Shape3,
        scale: Vec3,
        shift: Point3,
        mut f: impl FnMut(Index3) -> u8,
    ) -> Result<Self> {
        let len = shape.checked_len().ok_or_else(|| {
            VoxelError::InvalidGridSpec(format!("voxel count overflows for shape {shape}"))
        })?;
        let mut data = Vec::with_capacity(len);
        for k in 0..shape.z {
            for j in 0..shape.y {
                for i in 0..shape.x {
                    data.push(f(Index3::new(i as i64, j as i64, k as i64)));
                }
            }
        }
        Self::new(shape, data, scale, shift)
    }

    /// Position of `p` relative to the grid origin.
    pub fn relative_coordinate(&self, p: &Point3) -> Vec3 {
        *p - self.shift
    }

    /// Voxel index containing `p`.
    ///
    /// Uses floor, so points before the origin get negative indices and
    /// never alias voxel 0. The result may lie outside the grid.
    pub fn to_index(&self, p: &Point3) -> Index3 {
        Index3::floor(&self.relative_coordinate(p).component_mul(&self.scale))
    }

    /// Occupancy at world-space point `p`; 0 anywhere outside the grid.
    ///
    /// Voxel cells are half-open, except that the far face of the grid is
    /// closed: a point lying exactly on `shift + dims` along an axis reads the
    /// last voxel on that axis. Points past the far face, or landing in the
    /// layer beyond it without sitting exactly on it, read 0.
    pub fn query(&self, p: &Point3) -> u8 {
        let rel = self.relative_coordinate(p);
        let mut idx = Index3::floor(&rel.component_mul(&self.scale));

        for axis in Axis::ALL {
            let n = self.shape[axis] as i64;
            if idx[axis] < 0 || idx[axis] > n {
                return 0;
            }
        }

        for axis in Axis::ALL {
            if idx[axis] == self.shape[axis] as i64 {
                if rel[axis.index()] == self.dims[axis.index()] {
                    idx[axis] -= 1;
                } else {
                    return 0;
                }
            }
        }

        self.value(idx).unwrap_or(0)
    }

    /// True if the voxel at `p` is occupied.
    pub fn is_occupied(&self, p: &Point3) -> bool {
        self.query(p) > 0
    }

    /// Raw tensor value at a voxel index, if the index is inside the grid.
    pub fn value(&self, idx: Index3) -> Option<u8> {
        let (i, j, k) = idx.within(self.shape)?;
        Some(self.data[self.shape.linear(i, j, k)])
    }

    /// Physical size of the grid along x, y, z.
    pub fn dims(&self) -> Vec3 {
        self.dims
    }

    /// World-space bounds `[shift, shift + dims]`.
    pub fn bounding_box(&self) -> Aabb3 {
        Aabb3::new(self.shift, self.shift + self.dims)
    }

    /// Number of voxels along x, y, z.
    pub fn count(&self) -> Shape3 {
        self.shape
    }

    /// Voxels per unit length along x, y, z.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Edge length of one voxel along x, y, z.
    pub fn voxel_size(&self) -> Vec3 {
        self.scale.map(|s| 1.0 / s)
    }

    /// World-space position of the corner of voxel (0, 0, 0).
    pub fn shift(&self) -> Point3 {
        self.shift
    }

    /// Number of voxels with a positive value.
    pub fn occupied_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LX: f64 = 1.0;
    const LY: f64 = 2.0;
    const LZ: f64 = 4.0;

    /// Voxel size matching a 10x5x20 grid over LX x LY x LZ.
    fn spacing() -> Vec3 {
        Vec3::new(LX / 10.0, LY / 5.0, LZ / 20.0)
    }

    fn shift() -> Point3 {
        Point3::new(0.75, -3.0, 2.0)
    }

    fn uniform(value: u8, shift: Point3) -> VoxelGrid {
        let scale = spacing().map(|d| 1.0 / d);
        VoxelGrid::from_zyx([20, 5, 10], vec![value; 1000], scale, shift).unwrap()
    }

    #[test]
    fn test_ingest_reverses_shape() {
        let grid = uniform(0, Point3::origin());
        assert_eq!(grid.count(), Shape3::new(10, 5, 20));
        assert_eq!(grid.dims(), Vec3::new(LX, LY, LZ));
    }

    #[test]
    fn test_dims_and_bounding_box() {
        let cases = [
            (Shape3::new(10, 5, 20), Vec3::new(10.0, 2.5, 5.0), Point3::new(0.75, -3.0, 2.0)),
            (Shape3::new(3, 7, 1), Vec3::new(0.3, 11.0, 2.0), Point3::new(-1.5, 0.0, 10.0)),
            (Shape3::new(400, 120, 33), Vec3::new(123.4, 123.4, 123.4), Point3::origin()),
        ];
        for (shape, scale, shift) in cases {
            let grid = VoxelGrid::filled(shape, 1, scale, shift).unwrap();
            let dims = grid.dims();
            for axis in Axis::ALL {
                let a = axis.index();
                assert_eq!(dims[a], shape[axis] as f64 / scale[a]);
            }
            let bbox = grid.bounding_box();
            assert_eq!(bbox.min, shift);
            let ext = bbox.extents();
            assert_relative_eq!(ext.x, dims.x, epsilon = 1e-12);
            assert_relative_eq!(ext.y, dims.y, epsilon = 1e-12);
            assert_relative_eq!(ext.z, dims.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_grid_queries_zero() {
        let grid = uniform(0, Point3::origin());
        for k in 0..=40 {
            for j in 0..=10 {
                for i in 0..=20 {
                    let p = Point3::new(i as f64 * 0.05, j as f64 * 0.2, k as f64 * 0.1);
                    assert_eq!(grid.query(&p), 0);
                }
            }
        }
    }

    #[test]
    fn test_index_inside() {
        let grid = uniform(0, shift());
        let p = shift() + Vec3::new(LX, LY, LZ) * 0.5;
        let idx = grid.to_index(&p);
        for axis in Axis::ALL {
            assert!(idx[axis] > 0);
            assert!(idx[axis] < grid.count()[axis] as i64);
        }
    }

    #[test]
    fn test_index_before_is_negative() {
        let grid = uniform(0, shift());
        let idx = grid.to_index(&(shift() - spacing() * 0.1));
        assert_eq!(idx, Index3::new(-1, -1, -1));
    }

    #[test]
    fn test_index_corners() {
        let grid = uniform(0, shift());
        assert_eq!(grid.to_index(&shift()), Index3::new(0, 0, 0));
        let far = shift() + grid.dims();
        assert_eq!(grid.to_index(&far), Index3::new(10, 5, 20));
        let after = far + spacing() * 0.1;
        assert_eq!(grid.to_index(&after), Index3::new(10, 5, 20));
        let past = far + spacing() * 1.1;
        let idx = grid.to_index(&past);
        for axis in Axis::ALL {
            assert!(idx[axis] > grid.count()[axis] as i64);
        }
    }

    #[test]
    fn test_full_grid_queries() {
        let grid = uniform(1, shift());
        let d = spacing();
        let dims = grid.dims();

        assert_eq!(grid.query(&(shift() + dims * 0.5)), 1);
        assert_eq!(grid.query(&shift()), 1);
        assert_eq!(grid.query(&(shift() - d * 0.1)), 0);
        assert_eq!(grid.query(&(shift() + dims)), 1);
        assert_eq!(grid.query(&(shift() + dims + d * 0.1)), 0);
        assert_eq!(grid.query(&(shift() + dims + d * 1.1)), 0);
    }

    #[test]
    fn test_far_face_reads_last_voxel() {
        let shape = Shape3::new(4, 3, 2);
        let scale = Vec3::new(2.0, 1.0, 4.0);
        let grid = VoxelGrid::from_fn(shape, scale, Point3::new(1.0, 1.0, 1.0), |idx| {
            (idx.x + 10 * idx.y + 100 * idx.z) as u8
        })
        .unwrap();
        let far = grid.bounding_box().max;
        assert_eq!(grid.query(&far), 3 + 20 + 100);

        // Closed on one face, interior on the others.
        let p = Point3::new(far.x, 1.5, 1.1);
        assert_eq!(grid.query(&p), 3);
    }

    #[test]
    fn test_outside_on_single_axis() {
        let grid = uniform(1, shift());
        let far = shift() + grid.dims();
        let mid = shift() + grid.dims() * 0.5;
        for axis in Axis::ALL {
            let a = axis.index();
            let mut beyond = mid;
            beyond[a] = far[a] + 1e-9;
            assert_eq!(grid.query(&beyond), 0, "beyond far face on {axis:?}");

            let mut before = mid;
            before[a] = shift()[a] - 1e-9;
            assert_eq!(grid.query(&before), 0, "before origin on {axis:?}");
        }
    }

    #[test]
    fn test_non_finite_query_is_empty() {
        let grid = uniform(1, shift());
        assert_eq!(grid.query(&Point3::new(f64::NAN, 0.0, 0.0)), 0);
        assert_eq!(grid.query(&Point3::new(f64::INFINITY, -3.0, 2.0)), 0);
    }

    #[test]
    fn test_query_is_idempotent() {
        let grid = VoxelGrid::from_fn(
            Shape3::new(5, 5, 5),
            Vec3::new(5.0, 5.0, 5.0),
            Point3::origin(),
            |idx| u8::from((idx.x + idx.y + idx.z) % 2 == 0),
        )
        .unwrap();
        let points = [
            Point3::new(0.1, 0.3, 0.5),
            Point3::new(0.95, 0.05, 0.45),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-0.2, 0.5, 0.5),
        ];
        let first: Vec<u8> = points.iter().map(|p| grid.query(p)).collect();
        for _ in 0..3 {
            let again: Vec<u8> = points.iter().map(|p| grid.query(p)).collect();
            assert_eq!(first, again);
        }
        assert_eq!(grid.occupied_count(), 63);
    }

    #[test]
    fn test_zyx_tensor_layout() {
        // z = 2, y = 3, x = 4, value encodes the x, y, z index.
        let mut data = Vec::new();
        for k in 0..2u8 {
            for j in 0..3u8 {
                for i in 0..4u8 {
                    data.push(i + 10 * j + 100 * k);
                }
            }
        }
        let grid = VoxelGrid::from_zyx([2, 3, 4], data, Vec3::new(1.0, 1.0, 1.0), Point3::origin())
            .unwrap();
        assert_eq!(grid.query(&Point3::new(3.5, 0.5, 0.5)), 3);
        assert_eq!(grid.query(&Point3::new(0.5, 2.5, 0.5)), 20);
        assert_eq!(grid.query(&Point3::new(0.5, 0.5, 1.5)), 100);
        assert_eq!(grid.value(Index3::new(3, 2, 1)), Some(123));
        assert_eq!(grid.value(Index3::new(4, 0, 0)), None);
    }

    #[test]
    fn test_voxel_size() {
        let grid = uniform(0, Point3::origin());
        let size = grid.voxel_size();
        assert_relative_eq!(size.x, 0.1, epsilon = 1e-12);
        assert_relative_eq!(size.y, 0.4, epsilon = 1e-12);
        assert_relative_eq!(size.z, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_invalid_specs() {
        let shape = Shape3::new(2, 2, 2);
        let ok_scale = Vec3::new(1.0, 1.0, 1.0);

        let bad_scale = VoxelGrid::filled(shape, 1, Vec3::new(1.0, 0.0, 1.0), Point3::origin());
        assert!(matches!(bad_scale, Err(VoxelError::InvalidGridSpec(_))));

        let negative = VoxelGrid::filled(shape, 1, Vec3::new(1.0, 1.0, -2.0), Point3::origin());
        assert!(negative.is_err());

        let nan = VoxelGrid::filled(shape, 1, Vec3::new(f64::NAN, 1.0, 1.0), Point3::origin());
        assert!(nan.is_err());

        let empty = VoxelGrid::filled(Shape3::new(2, 0, 2), 1, ok_scale, Point3::origin());
        assert!(empty.is_err());

        let short = VoxelGrid::new(shape, vec![1; 7], ok_scale, Point3::origin());
        assert!(short.is_err());

        let bad_shift = VoxelGrid::filled(shape, 1, ok_scale, Point3::new(0.0, f64::INFINITY, 0.0));
        assert!(bad_shift.is_err());
    }
}
