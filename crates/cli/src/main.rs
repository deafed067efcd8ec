//! geomatica: runs the course units from the command line

mod units;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geomatica_colormap::{save_png, RgbaImage};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "geomatica")]
#[command(about = "Geomatics course units: vectors, rasters, remote sensing and satellite imagery")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the course outline
    Intro,
    /// Vector geometries, measurements and topology
    Vector {
        /// Directory for SVG previews
        #[arg(short, long, default_value = "resultados/vector")]
        output: PathBuf,
    },
    /// Raster fundamentals: synthetic DEM, land cover, clipping and terrain
    Raster {
        /// Directory holding the land-cover and DEM GeoTIFFs
        #[arg(long, default_value = "data/raster")]
        data_dir: PathBuf,
        /// Directory for the clipped GeoTIFF and figures
        #[arg(short, long, default_value = "resultados/raster")]
        output: PathBuf,
        /// Seed of the synthetic DEM noise
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Remote sensing theory: platforms, resolutions and missions
    RemoteSensing {
        /// Directory for figures
        #[arg(short, long, default_value = "resultados/teledeteccion")]
        output: PathBuf,
    },
    /// Search a STAC catalog and render satellite composites
    Imagery {
        /// Catalog: "pc" (Planetary Computer), "es" (Earth Search) or a STAC API URL
        #[arg(long, default_value = "pc")]
        catalog: String,
        /// Area of interest as west,south,east,north in degrees
        #[arg(long, default_value = "-71.399460,-34.366111,-70.633850,-34.084512")]
        bbox: String,
        /// Datetime range (RFC 3339 interval)
        #[arg(long, default_value = "2023-01-01/2023-01-31")]
        datetime: String,
        /// Maximum cloud cover percentage
        #[arg(long, default_value = "20")]
        max_cloud: f64,
        /// Output CRS as an EPSG code
        #[arg(long, default_value = "32719")]
        epsg: u32,
        /// Sentinel-2 cell size in metres
        #[arg(long, default_value = "10")]
        resolution: f64,
        /// Directory for composites
        #[arg(short, long, default_value = "resultados/imagenes")]
        output: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set default subscriber")
}

pub(crate) fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid spinner template")?,
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

/// Save an RGBA buffer of `rows * cols` pixels as PNG
pub(crate) fn write_png(rows: usize, cols: usize, rgba: Vec<u8>, path: &Path) -> Result<()> {
    let image = geomatica_colormap::rgba_image(rows, cols, rgba)
        .context("RGBA buffer does not match the image size")?;
    write_image(&image, path)
}

pub(crate) fn write_image(image: &RgbaImage, path: &Path) -> Result<()> {
    save_png(image, path).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Figure saved to: {}", path.display());
    Ok(())
}

pub(crate) fn section(title: &str) {
    println!();
    println!("=== {} ===", title);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Intro => units::intro::run(),
        Commands::Vector { output } => units::vector::run(&output),
        Commands::Raster {
            data_dir,
            output,
            seed,
        } => units::raster::run(&data_dir, &output, seed),
        Commands::RemoteSensing { output } => units::remote_sensing::run(&output),
        Commands::Imagery {
            catalog,
            bbox,
            datetime,
            max_cloud,
            epsg,
            resolution,
            output,
        } => {
            let opts = units::imagery::ImageryOptions {
                catalog,
                bbox: units::imagery::parse_bbox(&bbox)?,
                datetime,
                max_cloud,
                epsg,
                resolution,
            };
            units::imagery::run(&opts, &output)
        }
    }
}
