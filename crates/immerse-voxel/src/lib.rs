#![warn(missing_docs)]

//! Voxel occupancy grids for immerse.
//!
//! A [`VoxelGrid`] is the output of voxelizing a surface mesh: a dense
//! occupancy tensor, the number of voxels per unit length along each axis
//! (its scale), and the world-space position of voxel (0, 0, 0) (its shift).
//! Grids answer point queries in world coordinates and never fail on points
//! outside their extent.
//!
//! # Example
//!
//! ```
//! use immerse_math::{Point3, Shape3, Vec3};
//! use immerse_voxel::VoxelGrid;
//!
//! let grid = VoxelGrid::filled(
//!     Shape3::new(10, 5, 20),
//!     1,
//!     Vec3::new(10.0, 2.5, 5.0),
//!     Point3::new(0.75, -3.0, 2.0),
//! )?;
//!
//! assert_eq!(grid.dims(), Vec3::new(1.0, 2.0, 4.0));
//! assert_eq!(grid.query(&Point3::new(1.0, -2.0, 3.0)), 1);
//! assert_eq!(grid.query(&Point3::new(0.0, 0.0, 0.0)), 0);
//! # Ok::<(), immerse_voxel::VoxelError>(())
//! ```

pub mod error;
pub mod grid;

pub use error::{Result, VoxelError};
pub use grid::VoxelGrid;
