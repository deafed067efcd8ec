//! GeoTIFF georeferencing tags
//!
//! Reads and writes the subset of GeoTIFF metadata the course rasters use:
//! pixel scale + tiepoint, the EPSG code from the GeoKey directory and the
//! GDAL no-data string.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use std::io::{Read, Seek};
use tiff::decoder::Decoder;
use tiff::tags::Tag;

pub const KEY_MODEL_TYPE: u16 = 1024;
pub const KEY_RASTER_TYPE: u16 = 1025;
pub const KEY_GEOGRAPHIC_TYPE: u16 = 2048;
pub const KEY_PROJECTED_CS_TYPE: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;

/// Georeferencing recovered from a TIFF directory
#[derive(Debug, Clone, Default)]
pub struct Georeference {
    pub transform: Option<GeoTransform>,
    pub crs: Option<CRS>,
    pub nodata: Option<f64>,
}

impl Georeference {
    /// Read whatever georeferencing tags the current image carries.
    ///
    /// Missing tags leave the matching field as `None`.
    pub fn read<R: Read + Seek>(decoder: &mut Decoder<R>) -> Self {
        let transform = match (
            decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag),
            decoder.get_tag_f64_vec(Tag::ModelTiepointTag),
        ) {
            (Ok(scale), Ok(tiepoint)) => transform_from_tags(&scale, &tiepoint).ok(),
            _ => None,
        };

        let crs = decoder
            .get_tag_u16_vec(Tag::GeoKeyDirectoryTag)
            .ok()
            .and_then(|keys| epsg_from_geokeys(&keys))
            .map(CRS::from_epsg);

        let nodata = decoder
            .get_tag_ascii_string(Tag::GdalNodata)
            .ok()
            .and_then(|s| parse_nodata(&s));

        Self {
            transform,
            crs,
            nodata,
        }
    }
}

/// Build a north-up transform from ModelPixelScale and ModelTiepoint values
pub fn transform_from_tags(scale: &[f64], tiepoint: &[f64]) -> Result<GeoTransform> {
    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(Error::Other("Cannot determine geotransform".into()));
    }
    // tiepoint: [I, J, K, X, Y, Z]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    Ok(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

/// EPSG code declared in a GeoKey directory.
///
/// A projected CS key wins over a geographic one.
pub fn epsg_from_geokeys(keys: &[u16]) -> Option<u32> {
    if keys.len() < 4 {
        return None;
    }
    let count = keys[3] as usize;

    let mut projected = None;
    let mut geographic = None;
    for entry in keys[4..].chunks_exact(4).take(count) {
        // Only keys stored inline (location 0) carry an EPSG code
        if entry[1] != 0 {
            continue;
        }
        match entry[0] {
            KEY_PROJECTED_CS_TYPE => projected = Some(entry[3] as u32),
            KEY_GEOGRAPHIC_TYPE => geographic = Some(entry[3] as u32),
            _ => {}
        }
    }

    // 32767 is "user-defined"
    projected
        .or(geographic)
        .filter(|&code| code != 0 && code != 32767)
}

/// GeoKey directory declaring `crs`, or only the model/raster type keys
/// when no EPSG code is known.
pub fn geokeys_for(crs: Option<&CRS>) -> Vec<u16> {
    let mut entries: Vec<[u16; 4]> = Vec::new();

    match crs.and_then(|c| c.epsg().map(|code| (c.is_geographic(), code))) {
        Some((geographic, code)) if code <= u16::MAX as u32 => {
            let model = if geographic {
                MODEL_TYPE_GEOGRAPHIC
            } else {
                MODEL_TYPE_PROJECTED
            };
            entries.push([KEY_MODEL_TYPE, 0, 1, model]);
            entries.push([KEY_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);
            let key = if geographic {
                KEY_GEOGRAPHIC_TYPE
            } else {
                KEY_PROJECTED_CS_TYPE
            };
            entries.push([key, 0, 1, code as u16]);
        }
        _ => {
            entries.push([KEY_MODEL_TYPE, 0, 1, MODEL_TYPE_PROJECTED]);
            entries.push([KEY_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);
        }
    }

    let mut keys = vec![1, 1, 0, entries.len() as u16];
    keys.extend(entries.iter().flatten());
    keys
}

/// Parse a GDAL no-data string ("0", "-9999", "nan")
pub fn parse_nodata(s: &str) -> Option<f64> {
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if s.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projected_key_wins() {
        let keys = [
            1, 1, 0, 3, //
            1024, 0, 1, 1, //
            2048, 0, 1, 4326, //
            3072, 0, 1, 32719,
        ];
        assert_eq!(epsg_from_geokeys(&keys), Some(32719));
    }

    #[test]
    fn user_defined_is_ignored() {
        let keys = [1, 1, 0, 1, 3072, 0, 1, 32767];
        assert_eq!(epsg_from_geokeys(&keys), None);
        assert_eq!(epsg_from_geokeys(&[1, 1]), None);
    }

    #[test]
    fn written_keys_parse_back() {
        let utm = CRS::from_epsg(32719);
        assert_eq!(epsg_from_geokeys(&geokeys_for(Some(&utm))), Some(32719));
        let wgs = CRS::wgs84();
        let keys = geokeys_for(Some(&wgs));
        assert_eq!(keys[3], 3);
        assert_eq!(epsg_from_geokeys(&keys), Some(4326));
        assert_eq!(epsg_from_geokeys(&geokeys_for(None)), None);
    }

    #[test]
    fn nodata_strings() {
        assert_eq!(parse_nodata("0\0"), Some(0.0));
        assert_eq!(parse_nodata(" -9999 "), Some(-9999.0));
        assert!(parse_nodata("nan").map_or(false, f64::is_nan));
        assert_eq!(parse_nodata("none"), None);
    }
}
