//! gll_metadata - Generate GLL spectral element metadata for a spherical mesh
//!
//! Reads a quadrilateral mesh (Gmsh `.msh` or Exodus `.g`/`.exo`/`.nc`),
//! computes global GLL node indices and Jacobian weights, and writes them to
//! a NetCDF file with `GLLnodes` and `J` variables.
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gllmeta_rs::{
    BubbleCorrection, MetadataConfig, MetadataWriter, TopologyPolicy, WriterConfig,
    generate_metadata, read_mesh,
};

#[derive(Parser, Debug)]
#[command(name = "gll_metadata")]
#[command(about = "Generate GLL node indices and Jacobians for a spherical mesh", long_about = None)]
struct Cli {
    /// Input mesh file (.msh, .g, .exo or .nc)
    #[arg(long)]
    mesh: PathBuf,

    /// GLL points per element edge
    #[arg(long = "np", default_value_t = 4)]
    n_points: usize,

    /// Output NetCDF file
    #[arg(long, default_value = "gllmeta.nc")]
    out: PathBuf,

    /// Area correction: none, uniform or interior
    #[arg(long, default_value_t = BubbleCorrection::None)]
    bubble: BubbleCorrection,

    /// Distance below which two nodes are the same point
    #[arg(long, default_value_t = gllmeta_rs::metadata::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Fail on boundary nodes not shared with any other element
    #[arg(long)]
    strict: bool,

    /// Expected total area used to report the accumulated Jacobian error
    #[arg(long, default_value_t = 4.0 * std::f64::consts::PI)]
    expected_area: f64,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if cli.mesh.as_os_str().is_empty() {
        bail!("no mesh file given");
    }
    if !MetadataWriter::is_available() {
        bail!("writing metadata requires the `netcdf` feature; rebuild with --features netcdf");
    }

    info!(mesh = %cli.mesh.display(), "loading mesh");
    let mesh = read_mesh(&cli.mesh)
        .with_context(|| format!("failed to read mesh {}", cli.mesh.display()))?;

    let geometric_area = mesh.total_area();
    info!(
        n_faces = mesh.n_faces(),
        n_vertices = mesh.n_vertices(),
        geometric_area,
        "mesh loaded"
    );

    let topology = if cli.strict {
        TopologyPolicy::Strict
    } else {
        TopologyPolicy::Lenient
    };
    let config = MetadataConfig::new(cli.n_points)
        .with_bubble(cli.bubble)
        .with_tolerance(cli.tolerance)
        .with_topology(topology);

    let metadata = generate_metadata(&mesh, &config).context("failed to generate GLL metadata")?;

    info!(
        accumulated_jacobian = metadata.accumulated_jacobian,
        expected_area = cli.expected_area,
        residual = metadata.area_residual(cli.expected_area),
        n_global_nodes = metadata.n_global_nodes,
        "accumulated Jacobian"
    );

    let writer_config = WriterConfig::new(&cli.out).with_mesh_file(cli.mesh.display().to_string());
    MetadataWriter::new(writer_config)
        .write(&metadata)
        .with_context(|| format!("failed to write {}", cli.out.display()))?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
