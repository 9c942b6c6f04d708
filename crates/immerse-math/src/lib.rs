#![warn(missing_docs)]

//! Math types for the immerse voxel embedding tools.
//!
//! Thin wrappers around nalgebra for world-space points and vectors, plus
//! explicit `{x, y, z}` integer triples for grid shapes and indices.
//!
//! Every type in this crate is ordered x, y, z. Arrays laid out z-major
//! (voxelizer tensors, solver masks) are converted with [`Shape3::from_zyx`]
//! and [`Shape3::to_zyx`] at the edges of the system and nowhere else.

use std::ops::{Index, IndexMut};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = nalgebra::Vector3<f64>;

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// All three axes in x, y, z order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis in an x, y, z ordered array.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Number of samples along each axis of a structured grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape3 {
    /// Samples along x.
    pub x: usize,
    /// Samples along y.
    pub y: usize,
    /// Samples along z.
    pub z: usize,
}

impl Shape3 {
    /// Create a shape from x, y, z counts.
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Create a shape from counts reported in z, y, x order.
    pub const fn from_zyx(zyx: [usize; 3]) -> Self {
        Self::new(zyx[2], zyx[1], zyx[0])
    }

    /// Counts in z, y, x order, matching the memory layout of grid buffers.
    pub const fn to_zyx(self) -> [usize; 3] {
        [self.z, self.y, self.x]
    }

    /// Total number of samples, or `None` on overflow.
    pub fn checked_len(self) -> Option<usize> {
        self.x.checked_mul(self.y)?.checked_mul(self.z)
    }

    /// Total number of samples.
    pub fn len(self) -> usize {
        self.x * self.y * self.z
    }

    /// True if any axis has zero samples.
    pub fn is_empty(self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }

    /// Number of samples in one z-slab (`x * y`).
    pub fn slab_len(self) -> usize {
        self.x * self.y
    }

    /// Offset of `(i, j, k)` in a z-major buffer of this shape.
    ///
    /// The caller guarantees the index is in range.
    pub fn linear(self, i: usize, j: usize, k: usize) -> usize {
        (k * self.y + j) * self.x + i
    }

    /// Counts as floating point, for scaling world-space vectors.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl Index<Axis> for Shape3 {
    type Output = usize;

    fn index(&self, axis: Axis) -> &usize {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl std::fmt::Display for Shape3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// A signed grid index. Negative components address cells before the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Index3 {
    /// Index along x.
    pub x: i64,
    /// Index along y.
    pub y: i64,
    /// Index along z.
    pub z: i64,
}

impl Index3 {
    /// Create an index from x, y, z components.
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Floor each component of `v` into an index.
    ///
    /// Rounds toward negative infinity, so `-0.5` maps to `-1`. Values that
    /// do not fit (including NaN) saturate, which keeps them out of range of
    /// any real grid.
    pub fn floor(v: &Vec3) -> Self {
        Self::new(floor_to_i64(v.x), floor_to_i64(v.y), floor_to_i64(v.z))
    }

    /// Convert to unsigned coordinates if every component lies in `[0, shape)`.
    pub fn within(self, shape: Shape3) -> Option<(usize, usize, usize)> {
        let fits = |v: i64, n: usize| usize::try_from(v).ok().filter(|&u| u < n);
        Some((fits(self.x, shape.x)?, fits(self.y, shape.y)?, fits(self.z, shape.z)?))
    }
}

impl Index<Axis> for Index3 {
    type Output = i64;

    fn index(&self, axis: Axis) -> &i64 {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl IndexMut<Axis> for Index3 {
    fn index_mut(&mut self, axis: Axis) -> &mut i64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

fn floor_to_i64(v: f64) -> i64 {
    if v.is_nan() {
        // Any out-of-range value works; pick one below every grid.
        return i64::MIN;
    }
    // `as` saturates at the i64 limits.
    v.floor() as i64
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True if nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Edge lengths of the box.
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Centre of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// The same box moved by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Self {
        Self::new(self.min + *offset, self.max + *offset)
    }

    /// Closed containment test: points on the faces are inside.
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}
