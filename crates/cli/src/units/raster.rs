use anyhow::{Context, Result};
use geomatica_algorithms::landcover::class_shares;
use geomatica_algorithms::synthetic::{synthetic_dem, SyntheticDemParams};
use geomatica_algorithms::terrain::{Aspect, AspectOutput, Hillshade, HillshadeParams, Slope, SlopeParams};
use geomatica_colormap::{
    auto_params, categorical_to_rgba, landcover_color, raster_to_rgba, ColorScheme, ColormapParams,
};
use geomatica_core::crs::{UtmZone, CRS};
use geomatica_core::io::{read_geotiff, write_geotiff, GeoTiffOptions, SampleType};
use geomatica_core::raster::reproject_nearest;
use geomatica_core::{Algorithm, Raster};
use std::path::Path;
use tracing::{debug, info};

use crate::{ensure_dir, section, spinner, write_png};

const COVERAGE_FILE: &str = "chile_coverage_2018s.tif";
const DEM_FILE: &str = "Copernicus_DSM_COG_10_S35_00_W072_00_DEM.tif";
const CLIPPED_FILE: &str = "raster_recortado.tif";

pub fn run(data_dir: &Path, output: &Path, seed: u64) -> Result<()> {
    ensure_dir(output)?;

    synthetic(output, seed)?;
    let coverage = land_cover(&data_dir.join(COVERAGE_FILE), output)?;
    clip(&coverage, output)?;
    terrain(&data_dir.join(DEM_FILE), output)
}

fn render<T: geomatica_core::RasterElement>(
    raster: &Raster<T>,
    params: &ColormapParams,
    path: &Path,
) -> Result<()> {
    write_png(raster.rows(), raster.cols(), raster_to_rgba(raster, params), path)
}

fn render_landcover(raster: &Raster<u8>, path: &Path) -> Result<()> {
    let rgba = categorical_to_rgba(raster, |v| landcover_color(u16::from(v)));
    write_png(raster.rows(), raster.cols(), rgba, path)
}

// ─── Synthetic DEM ──────────────────────────────────────────────────────

fn synthetic(output: &Path, seed: u64) -> Result<()> {
    section("A simple raster: synthetic elevation model");
    let params = SyntheticDemParams {
        seed,
        ..SyntheticDemParams::default()
    };
    let dem = synthetic_dem(&params).context("Failed to build synthetic DEM")?;

    println!("{}", dem.info());
    println!("{}", dem.statistics());
    render(
        &dem,
        &auto_params(&dem, ColorScheme::Terrain),
        &output.join("dem_sintetico.png"),
    )
}

// ─── Land cover ─────────────────────────────────────────────────────────

fn land_cover(path: &Path, output: &Path) -> Result<Raster<u8>> {
    section("Land cover of Chile (2018)");
    let pb = spinner("Reading land cover...")?;
    let coverage: Raster<u8> = read_geotiff(path)
        .with_context(|| format!("Failed to read land cover raster {}", path.display()))?;
    pb.finish_and_clear();

    println!("{}", coverage.info());
    let codes: Vec<String> = coverage.unique_values().iter().map(u8::to_string).collect();
    println!("Classes present: [{}]", codes.join(", "));

    println!();
    println!("{:>6}  {:<36} {:>10} {:>8}", "Code", "Class", "Cells", "%");
    for share in class_shares(&coverage) {
        println!(
            "{:>6}  {:<36} {:>10} {:>7.2}%",
            share.code, share.name, share.count, share.percent
        );
    }

    render_landcover(&coverage, &output.join("cobertura.png"))?;
    Ok(coverage)
}

fn clip(coverage: &Raster<u8>, output: &Path) -> Result<()> {
    section("Clipping to the central area");
    let bbox = coverage.bounds().fraction(0.25, 0.75);
    debug!("Clip box: {}", bbox);
    let clipped = coverage.clip_box(&bbox).context("Failed to clip land cover")?;

    println!("{}", clipped.info());
    println!();
    println!("Raster statistics:");
    println!("{}", clipped.statistics());

    let path = output.join(CLIPPED_FILE);
    write_geotiff(
        &clipped,
        &path,
        Some(GeoTiffOptions::with_sample_type(SampleType::U8)),
    )
    .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Raster saved to: {}", path.display());

    render_landcover(&clipped, &output.join("raster_recortado.png"))
}

// ─── Terrain ────────────────────────────────────────────────────────────

fn terrain(path: &Path, output: &Path) -> Result<()> {
    section("Terrain analysis");
    let pb = spinner("Reading DEM...")?;
    let dem: Raster<f64> = read_geotiff(path)
        .with_context(|| format!("Failed to read DEM {}", path.display()))?;
    pb.finish_and_clear();
    println!("{}", dem.info());

    render(
        &dem,
        &auto_params(&dem, ColorScheme::Terrain),
        &output.join("dem.png"),
    )?;

    // Derivatives need a metric grid
    let dem = match dem.crs() {
        Some(crs) if crs.is_geographic() => {
            let (lon, lat) = dem.bounds().center();
            let utm = CRS::from_epsg(UtmZone::for_lon_lat(lon, lat).epsg());
            info!("Reprojecting DEM to {}", utm);
            let pb = spinner("Reprojecting DEM...")?;
            let projected = reproject_nearest(&dem, &utm, None).context("Failed to reproject DEM")?;
            pb.finish_and_clear();
            projected
        }
        _ => dem,
    };
    println!("Cell size: {:.2} m", dem.cell_size());

    let pb = spinner("Computing slope, aspect and hillshade...")?;
    let slope_deg = derive(&Slope, &dem, SlopeParams::default())?;
    let aspect_deg = derive(&Aspect, &dem, AspectOutput::Degrees)?;
    let shade = derive(&Hillshade, &dem, HillshadeParams::default())?;
    pb.finish_and_clear();

    println!();
    println!("Slope (degrees):");
    println!("{}", slope_deg.statistics());

    render(
        &slope_deg,
        &auto_params(&slope_deg, ColorScheme::YlOrRd),
        &output.join("pendiente.png"),
    )?;
    render(
        &aspect_deg,
        &ColormapParams::with_range(ColorScheme::Twilight, 0.0, 360.0),
        &output.join("orientacion.png"),
    )?;
    render(
        &shade,
        &ColormapParams::new(ColorScheme::Grayscale),
        &output.join("sombreado.png"),
    )?;

    let blended = shaded_relief(&dem, &shade);
    write_png(dem.rows(), dem.cols(), blended, &output.join("dem_sombreado.png"))
}

fn derive<A>(algorithm: &A, dem: &Raster<f64>, params: A::Params) -> Result<Raster<f64>>
where
    A: Algorithm<Input = Raster<f64>, Output = Raster<f64>, Error = geomatica_core::Error>,
{
    debug!("{}: {}", algorithm.name(), algorithm.description());
    algorithm
        .execute(dem.clone(), params)
        .with_context(|| format!("{} failed", algorithm.name()))
}

/// Terrain colors darkened by the hillshade: 60% color, 40% shade
fn shaded_relief(dem: &Raster<f64>, shade: &Raster<f64>) -> Vec<u8> {
    let mut rgba = raster_to_rgba(dem, &auto_params(dem, ColorScheme::Terrain));
    for (px, s) in rgba.chunks_exact_mut(4).zip(shade.data().iter()) {
        let s = if s.is_finite() { *s } else { 1.0 };
        let factor = 0.6 + 0.4 * s;
        for c in &mut px[..3] {
            *c = (f64::from(*c) * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
    rgba
}
