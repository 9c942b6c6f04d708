#![warn(missing_docs)]

//! Immersed-boundary masks from voxelized geometry.
//!
//! Re-exports the immerse crates and adds [`Scene`], which places any number
//! of voxelized bodies and analytic cylinders in a target mesh and writes the
//! resulting mask.
//!
//! # Example
//!
//! ```
//! use immerse::{Placement, Scene, TargetMesh, VoxelGrid};
//! use immerse::math::{Point3, Shape3, Vec3};
//!
//! let body = VoxelGrid::filled(Shape3::new(4, 4, 4), 1, Vec3::repeat(16.0), Point3::origin())?;
//! let mesh = TargetMesh::new(Shape3::new(9, 9, 9), Vec3::repeat(1.0))?;
//!
//! let mut scene = Scene::new(mesh);
//! scene.add(&body, Placement::centered_at(Point3::new(0.5, 0.5, 0.5)));
//! assert_eq!(scene.mask().solid_count(), 27);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod scene;

pub use immerse_embed as embed;
pub use immerse_io as io;
pub use immerse_math as math;
pub use immerse_voxel as voxel;
pub use immerse_voxelize as voxelize;

pub use immerse_embed::{
    Cylinder, Embedder, LogProgress, Mask, NoProgress, Placement, Progress, TargetMesh,
};
pub use immerse_io::{MaskDescriptor, MaskSink, RawSink};
pub use immerse_voxel::VoxelGrid;
pub use immerse_voxelize::{read_stl, voxelize, TriangleMesh, VoxelizeSettings};
pub use scene::{write_mask, Scene, EP1, IIBM};
