//! Nearest-neighbour reprojection between supported CRSs

use crate::crs::{transform_bbox, transform_point, CRS};
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};

fn epsg_of(crs: Option<&CRS>) -> Result<u32> {
    let crs = crs.ok_or_else(|| Error::UnsupportedCrs("raster has no CRS".into()))?;
    crs.epsg()
        .ok_or_else(|| Error::UnsupportedCrs(crs.identifier()))
}

/// Output cell size preserving the source cell count along the x axis
fn matching_resolution(src_cols: usize, dst_width: f64) -> f64 {
    dst_width / src_cols.max(1) as f64
}

/// Warp `src` onto a north-up grid in `target`.
///
/// `resolution` is the output cell size in target units; `None` keeps
/// roughly the source cell count. Cells falling outside the source are
/// set to the source no-data value (or the type default).
pub fn reproject_nearest<T: RasterElement>(
    src: &Raster<T>,
    target: &CRS,
    resolution: Option<f64>,
) -> Result<Raster<T>> {
    let from = epsg_of(src.crs())?;
    let to = epsg_of(Some(target))?;

    if let Some(res) = resolution {
        if !(res > 0.0 && res.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "resolution",
                value: res.to_string(),
                reason: "must be positive".into(),
            });
        }
    }

    if from == to && resolution.is_none() {
        return Ok(src.clone());
    }

    let dst_bounds = transform_bbox(&src.bounds(), from, to)?;
    let res = resolution.unwrap_or_else(|| matching_resolution(src.cols(), dst_bounds.width()));
    let (transform, rows, cols) = GeoTransform::for_bbox(&dst_bounds, res);

    let fill = src.nodata().unwrap_or_else(T::default_nodata);
    let mut out: Raster<T> = src.with_same_meta(rows, cols);
    out.set_transform(transform);
    out.set_crs(Some(target.clone()));
    out.set_nodata(Some(fill));

    for row in 0..rows {
        for col in 0..cols {
            let (x, y) = transform.pixel_to_geo(col, row);
            let (sx, sy) = transform_point(to, from, x, y)?;
            let value = src.sample(sx, sy).unwrap_or(fill);
            out.data_mut()[(row, col)] = value;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geographic_dem() -> Raster<f32> {
        let data: Vec<f32> = (0..400).map(|i| i as f32).collect();
        let mut r = Raster::from_vec(data, 20, 20).unwrap();
        r.set_transform(GeoTransform::new(-71.5, -34.0, 0.01, -0.01));
        r.set_crs(Some(CRS::wgs84()));
        r
    }

    #[test]
    fn reproject_to_utm_19s() {
        let src = geographic_dem();
        let out = reproject_nearest(&src, &CRS::from_epsg(32719), Some(100.0)).unwrap();

        assert_eq!(out.crs().and_then(|c| c.epsg()), Some(32719));
        assert_relative_eq!(out.cell_size(), 100.0);
        // 0.2 degrees is roughly 18-22 km on both axes at this latitude
        assert!(out.cols() > 150 && out.cols() < 250);
        assert!(out.rows() > 150 && out.rows() < 250);

        // Center cell samples the center of the source grid
        let (x, y) = out.pixel_to_geo(out.cols() / 2, out.rows() / 2);
        let (lon, lat) = transform_point(32719, 4326, x, y).unwrap();
        assert_eq!(out.get(out.rows() / 2, out.cols() / 2).unwrap(), src.sample(lon, lat).unwrap());
    }

    #[test]
    fn corners_outside_source_are_nodata() {
        let src = geographic_dem();
        let out = reproject_nearest(&src, &CRS::from_epsg(32719), Some(200.0)).unwrap();
        let stats = out.statistics();
        assert!(stats.valid_count > 0);
        assert!(stats.min.unwrap() >= 0.0);
    }

    #[test]
    fn missing_crs_is_an_error() {
        let r: Raster<f32> = Raster::new(4, 4);
        assert!(reproject_nearest(&r, &CRS::from_epsg(32719), None).is_err());
    }
}
