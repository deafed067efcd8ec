use anyhow::{bail, Context, Result};
use geomatica_algorithms::imagery::{composite, BandScaling, CompositeKind, CompositeParams};
use geomatica_cloud::blocking::StacClientBlocking;
use geomatica_cloud::{BandStack, LoadOptions, StacCatalog, StacClientOptions, StacItem, StacSearchParams};
use geomatica_colormap::composite_to_rgba;
use geomatica_core::{BBox, CRS};
use std::path::Path;
use tracing::info;

use crate::{ensure_dir, section, spinner, write_png};

/// Landsat Collection 2 surface reflectance, used when an asset lacks `raster:bands`
const LANDSAT_C2_SCALING: (f64, f64) = (0.0000275, -0.2);
const LANDSAT_RESOLUTION: f64 = 30.0;

pub struct ImageryOptions {
    pub catalog: String,
    pub bbox: BBox,
    pub datetime: String,
    pub max_cloud: f64,
    pub epsg: u32,
    pub resolution: f64,
}

/// Parse `west,south,east,north`
pub fn parse_bbox(s: &str) -> Result<BBox> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().with_context(|| format!("Invalid bbox value: {}", v)))
        .collect::<Result<_>>()?;
    let [west, south, east, north] = values[..] else {
        bail!("bbox must be west,south,east,north, got: {}", s);
    };
    if values.iter().any(|v| !v.is_finite()) {
        bail!("bbox values must be finite, got: {}", s);
    }
    let bbox = BBox::new(west, south, east, north);
    if bbox.is_empty() {
        bail!("bbox is empty: {}", s);
    }
    Ok(bbox)
}

pub fn run(opts: &ImageryOptions, output: &Path) -> Result<()> {
    ensure_dir(output)?;
    let catalog = StacCatalog::from_str_or_url(&opts.catalog);
    info!("Catalog: {}", catalog.root_url());
    let client = StacClientBlocking::new(catalog, StacClientOptions::default())
        .context("Failed to create STAC client")?;

    sentinel2(&client, opts, output)?;
    landsat(&client, opts, output)
}

fn search(client: &StacClientBlocking, params: &StacSearchParams) -> Result<Vec<StacItem>> {
    let pb = spinner("Searching catalog...")?;
    let items = client.search_nonempty(params);
    pb.finish_and_clear();
    let items = items.context("STAC search failed")?;

    println!("Found {} images", items.len());
    if let Some(first) = items.first() {
        println!();
        println!("First image:");
        if let Some(dt) = first.datetime() {
            println!("Date: {}", dt.format("%Y-%m-%d"));
        }
        if let Some(cc) = first.properties.eo_cloud_cover {
            println!("Cloud cover: {}%", cc);
        }
        println!("Image ID: {}", first.id);
    }
    Ok(items)
}

/// Items sharing the solar day of the first result
fn first_day(items: &[StacItem]) -> Vec<StacItem> {
    let day = items.first().and_then(StacItem::solar_day);
    items
        .iter()
        .filter(|item| item.solar_day() == day)
        .cloned()
        .collect()
}

fn load(client: &StacClientBlocking, items: &[StacItem], options: &LoadOptions) -> Result<BandStack> {
    let day_items = first_day(items);
    let pb = spinner(&format!("Loading {} bands from {} items...", options.bands.len(), day_items.len()))?;
    let stacks = client.load(&day_items, options);
    pb.finish_and_clear();
    let stack = stacks
        .context("Failed to load bands")?
        .into_iter()
        .next()
        .context("No band stack was loaded")?;
    info!("Loaded {} ({})", stack.day, stack.item_ids.join(", "));
    Ok(stack)
}

fn render(stack: &BandStack, kind: CompositeKind, path: &Path) -> Result<()> {
    let names = kind.bands();
    let mut rasters = Vec::with_capacity(3);
    let mut scaling = [BandScaling::default(); 3];
    for (i, name) in names.iter().enumerate() {
        let band = stack
            .band(name)
            .with_context(|| format!("Band {} was not loaded", name))?;
        scaling[i] = BandScaling::new(band.scale, band.offset);
        rasters.push(&band.raster);
    }

    let image = composite(
        [rasters[0], rasters[1], rasters[2]],
        scaling,
        &CompositeParams::default(),
    )
    .with_context(|| format!("Failed to build {}", kind.title()))?;
    println!(
        "{} ({}): {:.1}% valid pixels",
        kind.title(),
        stack.day,
        image.valid_fraction() * 100.0
    );

    let rgba = composite_to_rgba(image.data.view(), Some(image.valid.view()));
    write_png(image.rows(), image.cols(), rgba, path)
}

// ─── Sentinel-2 ─────────────────────────────────────────────────────────

fn sentinel2(client: &StacClientBlocking, opts: &ImageryOptions, output: &Path) -> Result<()> {
    section("Sentinel-2 search");
    let b = opts.bbox;
    let params = StacSearchParams::new()
        .collections(&["sentinel-2-l2a"])
        .bbox(b.min_x, b.min_y, b.max_x, b.max_y)
        .datetime(&opts.datetime)
        .max_cloud_cover(opts.max_cloud);
    let items = search(client, &params)?;

    section("Sentinel-2 composites");
    let load_opts = LoadOptions {
        bands: ["B04", "B03", "B02", "B08"].map(String::from).to_vec(),
        bbox: opts.bbox,
        crs: CRS::from_epsg(opts.epsg),
        resolution: opts.resolution,
        ..LoadOptions::default()
    };
    let stack = load(client, &items, &load_opts)?;

    render(&stack, CompositeKind::TrueColor, &output.join("sentinel2_rgb.png"))?;
    render(&stack, CompositeKind::FalseColorNir, &output.join("sentinel2_nir.png"))
}

// ─── Landsat ────────────────────────────────────────────────────────────

fn landsat(client: &StacClientBlocking, opts: &ImageryOptions, output: &Path) -> Result<()> {
    section("Landsat search");
    let b = opts.bbox;
    let params = StacSearchParams::new()
        .collections(&["landsat-c2-l2"])
        .bbox(b.min_x, b.min_y, b.max_x, b.max_y)
        .datetime(&opts.datetime)
        .max_cloud_cover(opts.max_cloud)
        .platforms(&["landsat-8", "landsat-9"]);
    let items = search(client, &params)?;

    section("Landsat composite");
    let load_opts = LoadOptions {
        bands: CompositeKind::LandsatTrueColor.bands().map(String::from).to_vec(),
        bbox: opts.bbox,
        crs: CRS::from_epsg(opts.epsg),
        resolution: LANDSAT_RESOLUTION,
        default_scaling: LANDSAT_C2_SCALING,
        ..LoadOptions::default()
    };
    let stack = load(client, &items, &load_opts)?;
    if let Some(blue) = stack.band("blue") {
        println!("Scale: {}, offset: {}", blue.scale, blue.offset);
    }

    render(&stack, CompositeKind::LandsatTrueColor, &output.join("landsat_rgb.png"))
}
