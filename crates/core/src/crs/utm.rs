//! WGS84 <-> UTM projection (Snyder 1987, USGS Prof. Paper 1395, pp. 61-64).
//!
//! Covers EPSG 326xx (UTM north) and 327xx (UTM south), which is what
//! Sentinel-2 and Landsat scenes are delivered in.

use super::EPSG_WGS84;
use crate::error::{Error, Result};
use crate::raster::BBox;

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563;
const E2: f64 = 2.0 * F - F * F;
const E_PRIME2: f64 = E2 / (1.0 - E2);
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// A UTM zone on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    /// Zone number, 1..=60
    pub zone: u32,
    /// Northern hemisphere
    pub north: bool,
}

impl UtmZone {
    /// Parse an EPSG code: 326xx is north, 327xx is south.
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        if (32601..=32660).contains(&epsg) {
            Some(Self { zone: epsg - 32600, north: true })
        } else if (32701..=32760).contains(&epsg) {
            Some(Self { zone: epsg - 32700, north: false })
        } else {
            None
        }
    }

    /// Zone containing a longitude/latitude position.
    pub fn for_lon_lat(lon: f64, lat: f64) -> Self {
        let zone = (((lon + 180.0) / 6.0).floor() as i64).clamp(0, 59) as u32 + 1;
        Self { zone, north: lat >= 0.0 }
    }

    pub fn epsg(&self) -> u32 {
        if self.north {
            32600 + self.zone
        } else {
            32700 + self.zone
        }
    }

    fn central_meridian(&self) -> f64 {
        ((self.zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
    }

    /// Project longitude/latitude degrees to (easting, northing) metres.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();

        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let tan_lat = lat.tan();

        let n = A / (1.0 - E2 * sin_lat * sin_lat).sqrt();
        let t = tan_lat * tan_lat;
        let c = E_PRIME2 * cos_lat * cos_lat;
        let a = cos_lat * (lon - self.central_meridian());
        let m = meridional_arc(lat);

        let a2 = a * a;
        let a4 = a2 * a2;
        let a6 = a4 * a2;

        // Snyder eq. 8-9
        let easting = K0
            * n
            * (a + (1.0 - t + c) * a2 * a / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * E_PRIME2) * a4 * a / 120.0)
            + FALSE_EASTING;

        // Snyder eq. 8-10
        let northing = K0
            * (m + n
                * tan_lat
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * E_PRIME2) * a6 / 720.0));

        if self.north {
            (easting, northing)
        } else {
            (easting, northing + FALSE_NORTHING_SOUTH)
        }
    }

    /// Unproject (easting, northing) metres to longitude/latitude degrees.
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let x = easting - FALSE_EASTING;
        let y = if self.north {
            northing
        } else {
            northing - FALSE_NORTHING_SOUTH
        };

        let e4 = E2 * E2;
        let e6 = e4 * E2;
        let sqrt_1_e2 = (1.0 - E2).sqrt();
        let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);

        // Footpoint latitude, Snyder eqs. 8-18 to 3-26
        let m = y / K0;
        let mu = m / (A * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let c1 = E_PRIME2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let denom = 1.0 - E2 * sin_phi1 * sin_phi1;
        let n1 = A / denom.sqrt();
        let r1 = A * (1.0 - E2) / denom.powf(1.5);
        let d = x / (n1 * K0);

        let d2 = d * d;
        let d4 = d2 * d2;
        let d6 = d4 * d2;

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * E_PRIME2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * E_PRIME2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = self.central_meridian()
            + (d - (1.0 + 2.0 * t1 + c1) * d2 * d / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * E_PRIME2 + 24.0 * t1 * t1)
                    * d4
                    * d
                    / 120.0)
                / cos_phi1;

        (lon.to_degrees(), lat.to_degrees())
    }
}

/// Meridional arc from the equator to `lat` (radians), Snyder eq. 3-21.
fn meridional_arc(lat: f64) -> f64 {
    let e4 = E2 * E2;
    let e6 = e4 * E2;

    A * ((1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * E2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

/// Transform a point between two EPSG systems.
///
/// Supported systems are WGS84 geographic (4326) and WGS84 / UTM.
pub fn transform_point(from_epsg: u32, to_epsg: u32, x: f64, y: f64) -> Result<(f64, f64)> {
    if from_epsg == to_epsg {
        return Ok((x, y));
    }

    let (lon, lat) = if from_epsg == EPSG_WGS84 {
        (x, y)
    } else {
        utm_for(from_epsg)?.inverse(x, y)
    };

    if to_epsg == EPSG_WGS84 {
        Ok((lon, lat))
    } else {
        Ok(utm_for(to_epsg)?.forward(lon, lat))
    }
}

/// Transform a bounding box, taking the envelope of points sampled along
/// its edges so the curvature of the projection is covered.
pub fn transform_bbox(bbox: &BBox, from_epsg: u32, to_epsg: u32) -> Result<BBox> {
    if from_epsg == to_epsg {
        return Ok(*bbox);
    }

    const STEPS: usize = 8;
    let mut out = BBox::empty();
    for i in 0..=STEPS {
        let f = i as f64 / STEPS as f64;
        let x = bbox.min_x + f * bbox.width();
        let y = bbox.min_y + f * bbox.height();
        for (px, py) in [(x, bbox.min_y), (x, bbox.max_y), (bbox.min_x, y), (bbox.max_x, y)] {
            let (tx, ty) = transform_point(from_epsg, to_epsg, px, py)?;
            out.expand(tx, ty);
        }
    }
    Ok(out)
}

fn utm_for(epsg: u32) -> Result<UtmZone> {
    UtmZone::from_epsg(epsg).ok_or_else(|| Error::UnsupportedCrs(format!("EPSG:{}", epsg)))
}
