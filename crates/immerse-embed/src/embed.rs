//! Rasterizing placed voxel grids and analytic bodies onto a target mesh.

use std::sync::atomic::{AtomicUsize, Ordering};

use immerse_math::Point3;
use immerse_voxel::VoxelGrid;
use rayon::prelude::*;

use crate::bounds::IndexBounds;
use crate::cylinder::Cylinder;
use crate::mask::Mask;
use crate::mesh::TargetMesh;
use crate::placement::{to_local, Placement};
use crate::progress::{NoProgress, Progress};

/// Embeds voxel grids into a fixed target mesh.
///
/// An embedder holds only the mesh description; every call builds and returns
/// its own mask, so one embedder can be shared between threads.
#[derive(Debug, Clone)]
pub struct Embedder {
    mesh: TargetMesh,
}

impl Embedder {
    /// Create an embedder for `mesh`.
    pub fn new(mesh: TargetMesh) -> Self {
        Self { mesh }
    }

    /// The target mesh.
    pub fn mesh(&self) -> &TargetMesh {
        &self.mesh
    }

    /// Mesh points that can fall inside `grid` once placed.
    pub fn bounds(&self, grid: &VoxelGrid, placement: &Placement) -> IndexBounds {
        let offset = placement.resolve(grid);
        IndexBounds::covering(&grid.bounding_box().translated(&offset), &self.mesh)
    }

    /// Embed one placed grid, returning its mask.
    pub fn embed(&self, grid: &VoxelGrid, placement: &Placement) -> Mask {
        self.embed_with_progress(grid, placement, &NoProgress)
    }

    /// Embed one placed grid, reporting progress per z-slab.
    ///
    /// Every mesh point inside the placed bounding box is mapped back into
    /// the grid's own frame and marked solid if the grid is occupied there.
    /// Points outside the box are left fluid without being queried.
    pub fn embed_with_progress(
        &self,
        grid: &VoxelGrid,
        placement: &Placement,
        progress: &dyn Progress,
    ) -> Mask {
        let mut mask = Mask::fluid(self.mesh.shape());
        self.stamp_grid(&mut mask, grid, placement, progress);
        mask
    }

    /// Embed an analytic cylinder, returning its mask.
    pub fn embed_cylinder(&self, cylinder: &Cylinder) -> Mask {
        self.embed_cylinder_with_progress(cylinder, &NoProgress)
    }

    /// Embed an analytic cylinder, reporting progress per z-slab.
    ///
    /// Points whose distance to the axis is at most the radius are solid.
    /// Only the mesh points inside the cylinder's bounding box are tested.
    pub fn embed_cylinder_with_progress(
        &self,
        cylinder: &Cylinder,
        progress: &dyn Progress,
    ) -> Mask {
        let mut mask = Mask::fluid(self.mesh.shape());
        self.stamp_cylinder(&mut mask, cylinder, progress);
        mask
    }

    /// Embed several placed grids and merge them into one mask.
    ///
    /// Bodies are embedded in parallel; the result is solid wherever any body
    /// is solid. An empty scene gives an all-fluid mask.
    ///
    /// Bodies are split into one batch per rayon thread and each batch is
    /// rasterized into its own mask, so at most about one full-size mask per
    /// thread is alive at once. [`Embedder::embed_all_with_progress`] keeps a
    /// single mask for the whole scene.
    pub fn embed_all(&self, bodies: &[(&VoxelGrid, Placement)]) -> Mask {
        let shape = self.mesh.shape();
        let batch = bodies.len().div_ceil(rayon::current_num_threads()).max(1);
        bodies
            .par_chunks(batch)
            .map(|chunk| {
                let mut mask = Mask::fluid(shape);
                for (grid, placement) in chunk {
                    self.stamp_grid(&mut mask, grid, placement, &NoProgress);
                }
                mask
            })
            .reduce_with(|mut acc, mask| {
                acc.multiply(&mask);
                acc
            })
            .unwrap_or_else(|| Mask::fluid(shape))
    }

    /// Embed several placed grids one after another, reporting each pass.
    ///
    /// Gives the same mask as [`Embedder::embed_all`]. Each body is still
    /// rasterized in parallel, but bodies are written one at a time into a
    /// single mask, so `progress` sees one pass at a time and memory stays at
    /// one mask regardless of the number of bodies.
    pub fn embed_all_with_progress(
        &self,
        bodies: &[(&VoxelGrid, Placement)],
        progress: &dyn Progress,
    ) -> Mask {
        self.embed_scene(bodies, &[], progress)
    }

    /// Embed placed grids and analytic cylinders into one mask.
    ///
    /// Bodies are written one after another into the same mask, grids first.
    /// The result equals the product of the individual masks.
    pub fn embed_scene(
        &self,
        bodies: &[(&VoxelGrid, Placement)],
        cylinders: &[Cylinder],
        progress: &dyn Progress,
    ) -> Mask {
        let mut mask = Mask::fluid(self.mesh.shape());
        let total = bodies.len() + cylinders.len();
        for (n, (grid, placement)) in bodies.iter().enumerate() {
            log::debug!("embedding body {} of {total}", n + 1);
            self.stamp_grid(&mut mask, grid, placement, progress);
        }
        for (n, cylinder) in cylinders.iter().enumerate() {
            log::debug!("embedding body {} of {total} (cylinder)", bodies.len() + n + 1);
            self.stamp_cylinder(&mut mask, cylinder, progress);
        }
        mask
    }

    fn stamp_grid(
        &self,
        mask: &mut Mask,
        grid: &VoxelGrid,
        placement: &Placement,
        progress: &dyn Progress,
    ) {
        let offset = placement.resolve(grid);
        let bounds = IndexBounds::covering(&grid.bounding_box().translated(&offset), &self.mesh);
        self.rasterize(mask, &bounds, |p| grid.is_occupied(&to_local(p, &offset)), progress);
    }

    fn stamp_cylinder(&self, mask: &mut Mask, cylinder: &Cylinder, progress: &dyn Progress) {
        let bounds = IndexBounds::covering(&cylinder.bounding_box(), &self.mesh);
        self.rasterize(mask, &bounds, |p| cylinder.contains(p), progress);
    }

    /// Mark solid every point of `bounds` for which `inside` holds.
    ///
    /// Solid points are only ever set, never cleared, so stamping several
    /// bodies into one mask gives their product. `mask` must be sampled on
    /// this embedder's mesh.
    fn rasterize<F>(
        &self,
        mask: &mut Mask,
        bounds: &IndexBounds,
        inside: F,
        progress: &dyn Progress,
    ) where
        F: Fn(&Point3) -> bool + Sync,
    {
        let shape = self.mesh.shape();
        debug_assert_eq!(mask.shape(), shape);
        log::debug!("working range (indices): {bounds}");

        progress.begin(bounds);
        if bounds.is_empty() {
            progress.finish();
            return;
        }

        let total = bounds.z.len();
        let done = AtomicUsize::new(0);
        let mesh = &self.mesh;

        mask.data
            .par_chunks_mut(shape.slab_len())
            .enumerate()
            .skip(bounds.z.start)
            .take(total)
            .for_each(|(k, slab)| {
                for j in bounds.y.clone() {
                    let row = &mut slab[j * shape.x..(j + 1) * shape.x];
                    for i in bounds.x.clone() {
                        if inside(&mesh.point(i, j, k)) {
                            row[i] = Mask::SOLID;
                        }
                    }
                }
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                progress.advance(finished, total);
            });

        progress.finish();
    }
}
