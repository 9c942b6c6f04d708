#![warn(missing_docs)]

//! Immersed-boundary mask generation for immerse.
//!
//! This crate rasterizes voxelized bodies onto a uniform structured mesh,
//! producing the solid/fluid mask an immersed-boundary CFD solver reads.
//!
//! # Features
//!
//! - Placement of a body by target center or raw offset
//! - Tight index-space loop bounds around each placed body
//! - Parallel rasterization over z-slabs with pluggable progress reporting
//! - Analytic cylinders alongside voxelized bodies
//! - Multi-body scenes merged by elementwise product
//!
//! # Example
//!
//! ```
//! use immerse_embed::{Embedder, Placement, TargetMesh};
//! use immerse_math::{Point3, Shape3, Vec3};
//! use immerse_voxel::VoxelGrid;
//!
//! let body = VoxelGrid::filled(
//!     Shape3::new(8, 8, 8),
//!     1,
//!     Vec3::new(32.0, 32.0, 32.0),
//!     Point3::origin(),
//! )?;
//! let mesh = TargetMesh::new(Shape3::new(33, 33, 33), Vec3::new(1.0, 1.0, 1.0))?;
//!
//! let embedder = Embedder::new(mesh);
//! let mask = embedder.embed(&body, &Placement::centered_at(Point3::new(0.5, 0.5, 0.5)));
//! assert_eq!(mask.solid_count(), 9 * 9 * 9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bounds;
pub mod cylinder;
pub mod embed;
pub mod error;
pub mod mask;
pub mod mesh;
pub mod placement;
pub mod progress;

pub use bounds::IndexBounds;
pub use cylinder::Cylinder;
pub use embed::Embedder;
pub use error::{EmbedError, Result};
pub use mask::{compose, Mask};
pub use mesh::TargetMesh;
pub use placement::{to_local, Placement};
pub use progress::{LogProgress, NoProgress, Progress};
