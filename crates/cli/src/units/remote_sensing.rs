use anyhow::{Context, Result};
use geomatica_algorithms::imagery::{
    degrade, gradient_image, hyperspectral_bands, landsat8_oli_bands, panchromatic_band,
    quantize_image, revisits_sorted, text_table, two_squares_scene, SpectralBand, SpectralCurve,
    MISSIONS, PLATFORMS, SENTINEL2_BANDS,
};
use geomatica_colormap::{
    bar_chart, composite_to_rgba, evaluate, panels, raster_to_rgba, rgba_image, ColorScheme,
    ColormapParams, LineChart, Rgb, RgbaImage,
};
use geomatica_core::Raster;
use std::path::Path;

use crate::{ensure_dir, section, write_image};

const FIGURE_WIDTH: u32 = 800;
const FIGURE_HEIGHT: u32 = 400;
const PANEL_SIZE: u32 = 300;

const CURVE_SAMPLES: usize = 1000;
const CURVE_NOISE: f64 = 0.02;
const CURVE_SEED: u64 = 42;

pub fn run(output: &Path) -> Result<()> {
    ensure_dir(output)?;

    platforms(output)?;
    spatial_resolution(output)?;
    spectral_resolution(output)?;
    radiometric_resolution(output)?;
    temporal_resolution(output)?;
    missions();
    Ok(())
}

fn platforms(output: &Path) -> Result<()> {
    section("Remote sensing platforms by altitude");
    let rows: Vec<Vec<String>> = PLATFORMS
        .iter()
        .map(|p| {
            vec![
                p.name.to_string(),
                p.altitude_label(),
                format!("{:.2}", p.log_altitude()),
            ]
        })
        .collect();
    println!("{}", text_table(&["Platform", "Altitude", "log10(km)"], &rows));

    // Bars start at the ground level of the log scale
    let heights: Vec<f64> = PLATFORMS.iter().map(|p| p.log_altitude() + 2.0).collect();
    let chart = bar_chart(&heights, Rgb::from_hex(0x1f77b4), FIGURE_WIDTH, FIGURE_HEIGHT);
    write_image(&chart, &output.join("plataformas.png"))
}

fn spatial_resolution(output: &Path) -> Result<()> {
    section("Spatial resolution");
    let scene = two_squares_scene();
    let mut images = Vec::new();
    for (factor, label) in [(1, "High (1 m)"), (5, "Medium (5 m)"), (10, "Low (10 m)")] {
        let coarse = degrade(&scene, factor).context("Failed to degrade scene")?;
        println!("{}: blocks of {}x{} pixels", label, factor, factor);
        let rgba = composite_to_rgba(coarse.mapv(|v| v as f32).view(), None);
        let (rows, cols, _) = coarse.dim();
        images.push(rgba_image(rows, cols, rgba).context("Scene buffer size mismatch")?);
    }
    write_image(&panels(&images, PANEL_SIZE), &output.join("resolucion_espacial.png"))
}

fn band_chart(curve: &SpectralCurve, bands: &[SpectralBand]) -> RgbaImage {
    let n = bands.len().max(1) as f64;
    curve
        .resample(bands)
        .iter()
        .enumerate()
        .fold(
            LineChart::new().series(&curve.wavelengths, &curve.reflectance, Rgb::from_hex(0xb0b0b0)),
            |chart, (i, (band, mean))| {
                let color = evaluate(ColorScheme::Twilight, i as f64 / n);
                chart.segment(band.start, band.end, *mean, color)
            },
        )
        .render(FIGURE_WIDTH, FIGURE_HEIGHT)
}

fn spectral_resolution(output: &Path) -> Result<()> {
    section("Spectral resolution");
    let curve = SpectralCurve::vegetation(CURVE_SAMPLES, CURVE_NOISE, CURVE_SEED)
        .context("Failed to build spectral curve")?;

    let sensors = [
        ("Panchromatic (1 broad band)", vec![panchromatic_band()], "espectral_pancromatica.png"),
        ("Multispectral (Landsat-8 OLI)", landsat8_oli_bands(), "espectral_multiespectral.png"),
        ("Hyperspectral (narrow bands)", hyperspectral_bands(100), "espectral_hiperespectral.png"),
    ];

    for (title, bands, file) in &sensors {
        let recorded = curve.resample(bands);
        println!("{}: {} bands", title, recorded.len());
        if recorded.len() <= 10 {
            let rows: Vec<Vec<String>> = recorded
                .iter()
                .map(|(b, v)| {
                    vec![
                        b.name.clone(),
                        format!("{:.2}-{:.2}", b.start, b.end),
                        format!("{:.3}", v),
                    ]
                })
                .collect();
            println!("{}", text_table(&["Band", "Range (µm)", "Mean reflectance"], &rows));
        }
        write_image(&band_chart(&curve, bands), &output.join(file))?;
    }
    Ok(())
}

fn radiometric_resolution(output: &Path) -> Result<()> {
    section("Radiometric resolution");
    let ramp = gradient_image(256);
    let params = ColormapParams::new(ColorScheme::Grayscale);
    let mut images = Vec::new();
    for bits in [2u32, 4, 8] {
        let levels = quantize_image(&ramp, bits);
        println!("{} bits: {} levels", bits, 1u32 << bits);
        let raster = Raster::from_array(levels);
        let rgba = raster_to_rgba(&raster, &params);
        images.push(rgba_image(raster.rows(), raster.cols(), rgba).context("Ramp buffer size mismatch")?);
    }
    write_image(&panels(&images, PANEL_SIZE), &output.join("resolucion_radiometrica.png"))
}

fn temporal_resolution(output: &Path) -> Result<()> {
    section("Temporal resolution");
    let revisits = revisits_sorted();
    let rows: Vec<Vec<String>> = revisits
        .iter()
        .map(|r| vec![r.satellite.to_string(), format!("{}", r.days), r.label.to_string()])
        .collect();
    println!("{}", text_table(&["Satellite", "Days", "Revisit"], &rows));

    let days: Vec<f64> = revisits.iter().map(|r| r.days).collect();
    let chart = bar_chart(&days, Rgb::from_hex(0xd62728), FIGURE_WIDTH, FIGURE_HEIGHT);
    write_image(&chart, &output.join("resolucion_temporal.png"))
}

fn missions() {
    section("Earth observation missions");
    let rows: Vec<Vec<String>> = MISSIONS
        .iter()
        .map(|m| {
            [m.name, m.agency, m.period, m.spatial, m.temporal, m.kind, m.applications]
                .map(String::from)
                .to_vec()
        })
        .collect();
    println!(
        "{}",
        text_table(
            &["Mission", "Agency", "Period", "Spatial", "Temporal", "Type", "Applications"],
            &rows
        )
    );

    section("Sentinel-2 MSI bands");
    let rows: Vec<Vec<String>> = SENTINEL2_BANDS
        .iter()
        .map(|b| {
            vec![
                b.name.to_string(),
                format!("{} nm", b.wavelength_nm),
                format!("{} m", b.resolution_m),
                b.description.to_string(),
            ]
        })
        .collect();
    println!("{}", text_table(&["Band", "Wavelength", "Resolution", "Description"], &rows));
}
