//! Run configuration loaded from TOML.
//!
//! ```toml
//! stl = "cylinder.stl"
//! resolution = 400
//!
//! [mesh]
//! n = [129, 65, 65]
//! l = [4.0, 2.0, 2.0]
//!
//! [[body]]
//! centre = [1.0, 1.0, 1.0]
//!
//! [[cylinder]]
//! radius = 0.25
//! origin = [3.0, 1.0, 0.0]
//! axis = [0.0, 0.0, 1.0]
//!
//! [output]
//! stem = "out/ibm"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use immerse::math::{Point3, Shape3, Vec3};
use immerse::{Cylinder, Placement, TargetMesh, VoxelizeSettings};
use serde::Deserialize;

/// Everything needed for one mask generation run.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Surface mesh of the body. A run may use cylinders alone.
    pub stl: Option<PathBuf>,
    /// Voxelization parameters, given at the top level.
    #[serde(flatten)]
    pub voxelize: VoxelizeSettings,
    /// Target mesh.
    pub mesh: MeshConfig,
    /// Placements of the body; one centred at the origin if omitted.
    #[serde(default = "default_bodies", rename = "body")]
    pub bodies: Vec<BodyConfig>,
    /// Analytic cylinders.
    #[serde(default, rename = "cylinder")]
    pub cylinders: Vec<CylinderConfig>,
    /// Output location.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target mesh point counts and extents, x then y then z.
#[derive(Debug, Clone, Deserialize)]
pub struct MeshConfig {
    pub n: [usize; 3],
    pub l: [f64; 3],
}

/// One placement of the body: a centre or a raw offset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BodyConfig {
    pub centre: Option<[f64; 3]>,
    pub offset: Option<[f64; 3]>,
}

/// An infinite cylinder: radius, a point on its axis and the axis direction.
#[derive(Debug, Clone, Deserialize)]
pub struct CylinderConfig {
    pub radius: f64,
    pub origin: [f64; 3],
    #[serde(default = "default_axis")]
    pub axis: [f64; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub stem: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            stem: PathBuf::from("ibm"),
        }
    }
}

fn default_bodies() -> Vec<BodyConfig> {
    vec![BodyConfig::default()]
}

fn default_axis() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

impl MeshConfig {
    pub fn target_mesh(&self) -> Result<TargetMesh> {
        let [nx, ny, nz] = self.n;
        let [lx, ly, lz] = self.l;
        Ok(TargetMesh::new(Shape3::new(nx, ny, nz), Vec3::new(lx, ly, lz))?)
    }
}

impl BodyConfig {
    pub fn placement(&self) -> Result<Placement> {
        match (self.centre, self.offset) {
            (Some(_), Some(_)) => bail!("a body takes either `centre` or `offset`, not both"),
            (Some([x, y, z]), None) => Ok(Placement::centered_at(Point3::new(x, y, z))),
            (None, Some([x, y, z])) => Ok(Placement::offset(Vec3::new(x, y, z))),
            (None, None) => Ok(Placement::default()),
        }
    }
}

impl CylinderConfig {
    pub fn cylinder(&self) -> Result<Cylinder> {
        let [x, y, z] = self.origin;
        let [ax, ay, az] = self.axis;
        Ok(Cylinder::new(self.radius, Point3::new(x, y, z), Vec3::new(ax, ay, az))?)
    }
}

impl RunConfig {
    /// Load a config file. A relative `stl` path is taken relative to the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config =
            Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))?;
        if let Some(stl) = config.stl.as_mut().filter(|stl| stl.is_relative()) {
            if let Some(dir) = path.parent() {
                *stl = dir.join(&*stl);
            }
        }
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every setting before any work starts.
    pub fn validate(&self) -> Result<()> {
        self.voxelize.validate()?;
        self.mesh.target_mesh()?;
        if self.stl.is_none() && self.cylinders.is_empty() {
            bail!("nothing to embed: give `stl` or at least one `[[cylinder]]`");
        }
        for (n, body) in self.bodies.iter().enumerate() {
            body.placement()
                .with_context(|| format!("body {}", n + 1))?;
        }
        for (n, cylinder) in self.cylinders.iter().enumerate() {
            cylinder
                .cylinder()
                .with_context(|| format!("cylinder {}", n + 1))?;
        }
        Ok(())
    }

    pub fn placements(&self) -> Result<Vec<Placement>> {
        self.bodies.iter().map(BodyConfig::placement).collect()
    }

    pub fn cylinders(&self) -> Result<Vec<Cylinder>> {
        self.cylinders.iter().map(CylinderConfig::cylinder).collect()
    }
}
