//! immerse CLI - immersed-boundary masks from STL geometry
//!
//! Voxelizes a body, places it in a structured mesh and writes the mask a
//! solver reads at startup.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use immerse::io::MaskSink;
use immerse::{
    read_stl, voxelize, write_mask, LogProgress, RawSink, Scene, VoxelGrid, VoxelizeSettings,
};

mod config;

use config::RunConfig;

#[derive(Parser)]
#[command(name = "immerse")]
#[command(about = "Generate immersed-boundary masks from STL geometry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed the configured bodies and cylinders and write the mask
    Embed {
        /// Run configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,
        /// Output stem, overriding the config (writes <stem>.json and <stem>.ep1.bin)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Voxelize an STL file and print a summary
    Info {
        /// Path to the STL file
        file: PathBuf,
        /// Voxels along the longest extent
        #[arg(short, long)]
        resolution: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Embed { config, output } => {
            run_embed(&config, output)?;
        }
        Commands::Info { file, resolution } => {
            let mut settings = VoxelizeSettings::default();
            if let Some(resolution) = resolution {
                settings.resolution = resolution;
            }
            load_body(&file, &settings)?;
        }
    }

    Ok(())
}

fn run_embed(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let mesh = config.mesh.target_mesh()?;
    let placements = config.placements()?;
    let cylinders = config.cylinders()?;

    let grid = config
        .stl
        .as_deref()
        .map(|stl| load_body(stl, &config.voxelize))
        .transpose()?;

    let mut scene = Scene::new(mesh);
    if let Some(grid) = &grid {
        for placement in placements {
            scene.add(grid, placement);
        }
    }
    for cylinder in cylinders {
        let (o, a) = (cylinder.origin(), cylinder.axis());
        log::info!(
            "cylinder: radius {}, origin [{}, {}, {}], axis [{}, {}, {}]",
            cylinder.radius(),
            o.x,
            o.y,
            o.z,
            a.x,
            a.y,
            a.z
        );
        scene.add_cylinder(cylinder);
    }
    log::info!(
        "embedding {} bod{} into a {} mesh",
        scene.len(),
        if scene.len() == 1 { "y" } else { "ies" },
        mesh.shape()
    );
    let mask = scene.mask_with_progress(&LogProgress::new("embed"));

    let stem = output.unwrap_or(config.output.stem);
    let mut sink = RawSink::create(&stem)
        .with_context(|| format!("creating output {}", stem.display()))?;
    write_mask(&mut sink, &mask)?;
    sink.close()?;

    log::info!(
        "{} of {} points are solid",
        mask.solid_count(),
        mask.shape().len()
    );
    Ok(())
}

fn load_body(path: &Path, settings: &VoxelizeSettings) -> Result<VoxelGrid> {
    let mesh = read_stl(path).with_context(|| format!("reading {}", path.display()))?;
    log::info!("{}: {} triangles", path.display(), mesh.num_triangles());

    let grid = voxelize(&mesh, settings)?;
    log_summary(&grid);
    Ok(grid)
}

fn log_summary(grid: &VoxelGrid) {
    let dims = grid.dims();
    let scale = grid.scale();
    let size = grid.voxel_size();
    let bbox = grid.bounding_box();
    log::info!("object dims:  [{:.6}, {:.6}, {:.6}]", dims.x, dims.y, dims.z);
    log::info!("scale:        [{:.6}, {:.6}, {:.6}]", scale.x, scale.y, scale.z);
    log::info!("voxel size:   [{:.6}, {:.6}, {:.6}]", size.x, size.y, size.z);
    log::info!("voxel count:  {} ({} occupied)", grid.count(), grid.occupied_count());
    log::info!(
        "bounding box: [{:.6}, {:.6}, {:.6}] -> [{:.6}, {:.6}, {:.6}]",
        bbox.min.x,
        bbox.min.y,
        bbox.min.z,
        bbox.max.x,
        bbox.max.y,
        bbox.max.z
    );
}
