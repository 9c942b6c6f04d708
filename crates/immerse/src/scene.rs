//! Bodies placed in a target mesh.

use immerse_embed::{Cylinder, Embedder, Mask, NoProgress, Placement, Progress, TargetMesh};
use immerse_io::{MaskDescriptor, MaskSink};
use immerse_voxel::VoxelGrid;

/// Name of the flag telling the solver to read a mask.
pub const IIBM: &str = "iibm";

/// Name of the mask variable.
pub const EP1: &str = "ep1";

/// A target mesh with voxelized bodies and analytic cylinders placed in it.
///
/// Grids are borrowed, so one grid can be placed several times without
/// copying it.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    embedder: Embedder,
    bodies: Vec<(&'a VoxelGrid, Placement)>,
    cylinders: Vec<Cylinder>,
}

impl<'a> Scene<'a> {
    /// An empty scene over `mesh`.
    pub fn new(mesh: TargetMesh) -> Self {
        Self {
            embedder: Embedder::new(mesh),
            bodies: Vec::new(),
            cylinders: Vec::new(),
        }
    }

    /// Place `grid` in the scene.
    pub fn add(&mut self, grid: &'a VoxelGrid, placement: Placement) -> &mut Self {
        self.bodies.push((grid, placement));
        self
    }

    /// Add an analytic cylinder to the scene.
    pub fn add_cylinder(&mut self, cylinder: Cylinder) -> &mut Self {
        self.cylinders.push(cylinder);
        self
    }

    /// The target mesh.
    pub fn mesh(&self) -> &TargetMesh {
        self.embedder.mesh()
    }

    /// Number of bodies, grids and cylinders together.
    pub fn len(&self) -> usize {
        self.bodies.len() + self.cylinders.len()
    }

    /// True if nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mask of all bodies.
    ///
    /// Bodies are written one at a time into a single mask, each rasterized
    /// in parallel over z-slabs, so memory stays at one mask however many
    /// bodies the scene holds.
    pub fn mask(&self) -> Mask {
        self.mask_with_progress(&NoProgress)
    }

    /// Like [`Scene::mask`], reporting each body's pass to `progress`.
    pub fn mask_with_progress(&self, progress: &dyn Progress) -> Mask {
        self.embedder.embed_scene(&self.bodies, &self.cylinders, progress)
    }
}

/// Write `mask` as the solver's immersed-boundary input.
///
/// Sets `iibm = 1` and stores the whole mask as `ep1`. The sink is left open.
pub fn write_mask(sink: &mut dyn MaskSink, mask: &Mask) -> immerse_io::Result<()> {
    sink.write_scalar(IIBM, 1)?;
    sink.write_mask(EP1, mask, &MaskDescriptor::whole(mask))?;
    log::info!("wrote mask with {} solid points", mask.solid_count());
    Ok(())
}
