//! Band loading onto a common grid.
//!
//! Items are grouped by solar day, each requested band is read from every
//! item of a group over the target box, resampled (nearest) onto the target
//! grid and merged first-valid-wins, so overlapping same-day tiles
//! collapse into one mosaic.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use chrono::NaiveDate;
use geomatica_core::crs::{transform_bbox, transform_point, CRS, EPSG_WGS84};
use geomatica_core::raster::{BBox, GeoTransform, Raster};
use tracing::{debug, info, warn};

use crate::error::{CloudError, Result};
use crate::geotiff_window::WindowedGeoTiff;
use crate::stac_models::{StacAsset, StacItem};

/// Scale and offset of Sentinel-2 L2A digital numbers.
pub const SENTINEL2_SCALING: (f64, f64) = (0.0001, 0.0);

/// What to load and onto which grid.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Asset keys, in output order.
    pub bands: Vec<String>,
    /// Area of interest in WGS84 longitude/latitude.
    pub bbox: BBox,
    /// Output CRS; must be EPSG-identified.
    pub crs: CRS,
    /// Output cell size in `crs` units.
    pub resolution: f64,
    /// Merge same-day items into one stack; otherwise one stack per item.
    pub group_by_solar_day: bool,
    /// `(scale, offset)` for assets without `raster:bands` scaling.
    pub default_scaling: (f64, f64),
    /// Range request granularity for remote reads.
    pub block_size: u64,
    /// Blocks kept per open asset.
    pub cache_blocks: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            bands: ["B04", "B03", "B02", "B08"].map(String::from).to_vec(),
            bbox: BBox::new(-71.399460, -34.366111, -70.633850, -34.084512),
            crs: CRS::from_epsg(32719),
            resolution: 10.0,
            group_by_solar_day: true,
            default_scaling: SENTINEL2_SCALING,
            block_size: crate::cache::DEFAULT_BLOCK_SIZE,
            cache_blocks: 64,
        }
    }
}

/// North-up output grid covering the area of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGrid {
    pub transform: GeoTransform,
    pub rows: usize,
    pub cols: usize,
    pub epsg: u32,
}

impl TargetGrid {
    /// Grid over `bbox` (WGS84) projected to `crs`, with square cells.
    pub fn new(bbox: &BBox, crs: &CRS, resolution: f64) -> Result<Self> {
        let epsg = crs
            .epsg()
            .ok_or_else(|| geomatica_core::Error::UnsupportedCrs(crs.identifier()))?;
        if !(resolution > 0.0 && resolution.is_finite()) {
            return Err(geomatica_core::Error::InvalidParameter {
                name: "resolution",
                value: resolution.to_string(),
                reason: "must be positive".into(),
            }
            .into());
        }
        let projected = transform_bbox(bbox, EPSG_WGS84, epsg)?;
        let (transform, rows, cols) = GeoTransform::for_bbox(&projected, resolution);
        Ok(Self {
            transform,
            rows,
            cols,
            epsg,
        })
    }

    pub fn bounds(&self) -> BBox {
        self.transform.bounds(self.cols, self.rows)
    }

    /// All-NaN raster on this grid.
    pub fn empty_raster(&self) -> Raster<f32> {
        let mut r = Raster::filled(self.rows, self.cols, f32::NAN);
        r.set_transform(self.transform);
        r.set_crs(Some(CRS::from_epsg(self.epsg)));
        r.set_nodata(Some(f32::NAN));
        r
    }
}

/// Items acquired on the same day.
#[derive(Debug, Clone)]
pub struct ItemGroup<'a> {
    pub day: NaiveDate,
    pub items: Vec<&'a StacItem>,
}

/// Group items by solar day (or one group per item), earliest day first.
///
/// Items without a parseable datetime are skipped.
pub fn group_items(items: &[StacItem], by_solar_day: bool) -> Vec<ItemGroup<'_>> {
    let mut days: BTreeMap<NaiveDate, Vec<&StacItem>> = BTreeMap::new();
    let mut singles = Vec::new();

    for item in items {
        let Some(day) = item.solar_day() else {
            warn!(item = %item.id, "item has no datetime, skipped");
            continue;
        };
        if by_solar_day {
            days.entry(day).or_default().push(item);
        } else {
            singles.push(ItemGroup { day, items: vec![item] });
        }
    }

    if by_solar_day {
        days.into_iter()
            .map(|(day, items)| ItemGroup { day, items })
            .collect()
    } else {
        // stable: same-day items keep search order
        singles.sort_by_key(|g| g.day);
        singles
    }
}

/// One band on the target grid, in digital numbers.
#[derive(Debug, Clone)]
pub struct LoadedBand {
    pub name: String,
    pub raster: Raster<f32>,
    pub scale: f64,
    pub offset: f64,
}

/// All requested bands of one group.
#[derive(Debug, Clone)]
pub struct BandStack {
    pub day: NaiveDate,
    pub item_ids: Vec<String>,
    pub bands: Vec<LoadedBand>,
}

impl BandStack {
    pub fn band(&self, name: &str) -> Option<&LoadedBand> {
        self.bands.iter().find(|b| b.name == name)
    }
}

/// Resample `src` onto `target` (nearest), filling only cells still NaN.
///
/// Returns the number of cells filled.
pub fn merge_nearest(target: &mut Raster<f32>, src: &Raster<f32>, src_epsg: u32, target_epsg: u32) -> Result<usize> {
    let transform = *target.transform();
    let (rows, cols) = target.shape();
    let mut filled = 0;

    for row in 0..rows {
        for col in 0..cols {
            if !target.data()[(row, col)].is_nan() {
                continue;
            }
            let (x, y) = transform.pixel_to_geo(col, row);
            let (sx, sy) = transform_point(target_epsg, src_epsg, x, y)?;
            if let Some(v) = src.sample(sx, sy).filter(|v| !src.is_nodata(*v)) {
                target.data_mut()[(row, col)] = v;
                filled += 1;
            }
        }
    }
    Ok(filled)
}

/// Load every band of `group` onto `grid`.
///
/// `open` turns an asset into a seekable reader (a signed HTTP source in
/// production, memory in tests).
pub fn load_group<R, F>(
    group: &ItemGroup<'_>,
    grid: &TargetGrid,
    options: &LoadOptions,
    open: F,
) -> Result<BandStack>
where
    R: Read + Seek,
    F: Fn(&StacAsset) -> Result<R>,
{
    let grid_bounds = grid.bounds();
    let mut bands = Vec::with_capacity(options.bands.len());

    for name in &options.bands {
        let assets: Vec<(&StacItem, &StacAsset)> = group
            .items
            .iter()
            .filter_map(|item| item.asset(name).map(|a| (*item, a)))
            .collect();
        let Some(&(_, first_asset)) = assets.first() else {
            let item = group.items.first().map_or_else(String::new, |i| i.id.clone());
            return Err(CloudError::MissingAsset {
                item,
                asset: name.clone(),
            });
        };

        let (scale, offset) = first_asset.scale_offset().unwrap_or(options.default_scaling);
        let mut raster = grid.empty_raster();

        for (item, asset) in assets {
            let mut tiff = WindowedGeoTiff::open(open(asset)?)?;
            let src_epsg = tiff
                .info()
                .crs
                .as_ref()
                .and_then(CRS::epsg)
                .or_else(|| item.epsg())
                .ok_or_else(|| geomatica_core::Error::UnsupportedCrs(format!("no CRS for {}", item.id)))?;

            let src_box = transform_bbox(&grid_bounds, grid.epsg, src_epsg)?;
            let src: Raster<f32> = match tiff.read_bbox(&src_box) {
                Ok(r) => r,
                Err(CloudError::BBoxOutside) => {
                    debug!(item = %item.id, band = %name, "asset does not cover the target box");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let filled = merge_nearest(&mut raster, &src, src_epsg, grid.epsg)?;
            debug!(item = %item.id, band = %name, filled, "merged asset");
        }

        bands.push(LoadedBand {
            name: name.clone(),
            raster,
            scale,
            offset,
        });
    }

    info!(day = %group.day, items = group.items.len(), bands = bands.len(), "loaded group");
    Ok(BandStack {
        day: group.day,
        item_ids: group.items.iter().map(|i| i.id.clone()).collect(),
        bands,
    })
}

/// Group `items` and load each group; an empty item list is an error.
pub fn load_stacks<R, F>(items: &[StacItem], options: &LoadOptions, open: F) -> Result<Vec<BandStack>>
where
    R: Read + Seek,
    F: Fn(&StacAsset) -> Result<R>,
{
    if items.is_empty() {
        return Err(CloudError::EmptySearch);
    }
    let grid = TargetGrid::new(&options.bbox, &options.crs, options.resolution)?;
    info!(rows = grid.rows, cols = grid.cols, epsg = grid.epsg, "target grid");

    group_items(items, options.group_by_solar_day)
        .iter()
        .map(|group| load_group(group, &grid, options, &open))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, datetime: &str, west: f64) -> StacItem {
        serde_json::from_value(serde_json::json!({
            "type": "Feature",
            "id": id,
            "bbox": [west, -35.0, west + 1.0, -34.0],
            "properties": {"datetime": datetime},
            "assets": {}
        }))
        .unwrap()
    }

    #[test]
    fn groups_same_solar_day() {
        let items = vec![
            item("b", "2023-01-21T14:40:00Z", -71.5),
            item("a1", "2023-01-16T14:40:00Z", -71.5),
            item("a2", "2023-01-16T14:40:05Z", -70.5),
            item("undated", "not a date", -71.0),
        ];

        let groups = group_items(&items, true);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].day, NaiveDate::from_ymd_opt(2023, 1, 16).unwrap());
        let ids: Vec<&str> = groups[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);

        let singles = group_items(&items, false);
        assert_eq!(singles.len(), 3);
        assert_eq!(singles[2].items[0].id, "b");
    }

    #[test]
    fn target_grid_in_utm() {
        let options = LoadOptions::default();
        let grid = TargetGrid::new(&options.bbox, &options.crs, 30.0).unwrap();
        assert_eq!(grid.epsg, 32719);
        // ~70 km by ~31 km at 30 m
        assert!((2000..2800).contains(&grid.cols));
        assert!((900..1200).contains(&grid.rows));
        assert!(grid.bounds().width() >= 30.0 * (grid.cols - 1) as f64);

        assert!(TargetGrid::new(&options.bbox, &CRS::from_wkt("LOCAL_CS[]"), 30.0).is_err());
        assert!(TargetGrid::new(&options.bbox, &options.crs, 0.0).is_err());
    }

    #[test]
    fn merge_keeps_first_valid() {
        let mut target = Raster::filled(2, 2, f32::NAN);
        target.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));
        target.data_mut()[(0, 0)] = 5.0;

        let mut src = Raster::from_vec(vec![1.0f32, 0.0, 3.0, 4.0], 2, 2).unwrap();
        src.set_transform(GeoTransform::new(0.0, 2.0, 1.0, -1.0));
        src.set_nodata(Some(0.0));

        let filled = merge_nearest(&mut target, &src, 32719, 32719).unwrap();
        assert_eq!(filled, 2);
        assert_eq!(target.get(0, 0).unwrap(), 5.0);
        assert!(target.get(0, 1).unwrap().is_nan());
        assert_eq!(target.get(1, 1).unwrap(), 4.0);
    }
}
