//! garment-zones - split a garment mesh into sleeve, front and back meshes
//!
//! With no arguments, reads `public/models/shirt.glb` and writes
//! `public/models/shirt-zones.glb` relative to the working directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use garment_zones::io::AxisConvention;
use garment_zones::operations::classify::DEFAULT_SLEEVE_RATIO;
use garment_zones::pipeline::{
    SeparateConfig, SeparateZones, Strategy, DEFAULT_INPUT, DEFAULT_OUTPUT,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "garment-zones")]
#[command(about = "Split a garment mesh into sleeves, front torso and back torso")]
#[command(version)]
struct Cli {
    /// Input GLB containing the garment mesh
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output GLB receiving the three zone meshes
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Fraction of the X span beyond which a polygon is a sleeve
    #[arg(long, default_value_t = DEFAULT_SLEEVE_RATIO)]
    threshold_ratio: f64,

    /// How zone meshes are derived from the source mesh
    #[arg(long, value_enum, default_value_t = CliStrategy::Partition)]
    strategy: CliStrategy,

    /// Classify in the file's own Y-up frame instead of converting to Z-up
    #[arg(long)]
    native_axes: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliStrategy {
    /// Classify each polygon once and build zones as index sets
    Partition,
    /// Duplicate the mesh and trim each copy
    DuplicateAndTrim,
}

impl From<CliStrategy> for Strategy {
    fn from(s: CliStrategy) -> Self {
        match s {
            CliStrategy::Partition => Strategy::Partition,
            CliStrategy::DuplicateAndTrim => Strategy::DuplicateAndTrim,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = SeparateConfig::default()
        .with_input(&cli.input)
        .with_output(&cli.output)
        .with_threshold_ratio(cli.threshold_ratio)
        .with_strategy(cli.strategy.into())
        .with_axes(if cli.native_axes {
            AxisConvention::Native
        } else {
            AxisConvention::ZUp
        });

    let report = SeparateZones::new(config)
        .execute()
        .with_context(|| format!("Failed to separate zones of {:?}", cli.input))?;

    for stats in &report.zones {
        tracing::info!(
            "{}: {} polygons, {} vertices",
            stats.zone,
            stats.polygons,
            stats.vertices
        );
    }
    tracing::info!("Successfully exported to {:?}", cli.output);
    Ok(())
}
