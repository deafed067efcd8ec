//! Coordinate Reference System handling

mod utm;

pub use utm::{transform_bbox, transform_point, UtmZone};

use serde::{Deserialize, Serialize};
use std::fmt;

/// EPSG code of geographic WGS84 (longitude/latitude in degrees)
pub const EPSG_WGS84: u32 = 4326;

/// Coordinate Reference System representation.
///
/// Only EPSG-identified systems take part in reprojection; WKT is carried
/// through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    epsg: Option<u32>,
    wkt: Option<String>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            wkt: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            epsg: None,
            wkt: Some(wkt.into()),
        }
    }

    /// Parse `"EPSG:32719"` (case-insensitive) or a bare code like `"4326"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let code = match s.split_once(':') {
            Some((authority, code)) if authority.eq_ignore_ascii_case("epsg") => code,
            Some(_) => return None,
            None => s,
        };
        code.trim().parse().ok().map(Self::from_epsg)
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(EPSG_WGS84)
    }

    /// UTM zone on WGS84 (EPSG:326xx north, 327xx south)
    pub fn utm(zone: u32, north: bool) -> Self {
        Self::from_epsg(UtmZone { zone, north }.epsg())
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Whether coordinates are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        self.epsg == Some(EPSG_WGS84)
    }

    /// UTM zone, if this is a WGS84 / UTM system
    pub fn utm_zone(&self) -> Option<UtmZone> {
        self.epsg.and_then(UtmZone::from_epsg)
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        match (self.epsg, other.epsg) {
            (Some(a), Some(b)) => a == b,
            _ => matches!((&self.wkt, &other.wkt), (Some(a), Some(b)) if a == b),
        }
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(wkt) = &self.wkt {
            let end = wkt.char_indices().nth(50).map(|(i, _)| i).unwrap_or(wkt.len());
            return format!("WKT:{}", &wkt[..end]);
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = CRS::from_epsg(4326);
        assert_eq!(crs.epsg(), Some(4326));
        assert_eq!(crs.identifier(), "EPSG:4326");
        assert!(crs.is_geographic());
    }

    #[test]
    fn test_crs_parse() {
        assert_eq!(CRS::parse("EPSG:32719"), Some(CRS::from_epsg(32719)));
        assert_eq!(CRS::parse("epsg:4326"), Some(CRS::wgs84()));
        assert_eq!(CRS::parse("32630"), Some(CRS::from_epsg(32630)));
        assert_eq!(CRS::parse("ESRI:102100"), None);
        assert_eq!(CRS::parse("utm"), None);
    }

    #[test]
    fn test_crs_utm_zone() {
        let crs = CRS::utm(19, false);
        assert_eq!(crs.epsg(), Some(32719));
        assert_eq!(crs.utm_zone(), Some(UtmZone { zone: 19, north: false }));
        assert!(CRS::wgs84().utm_zone().is_none());
    }

    #[test]
    fn test_crs_equivalence() {
        assert!(CRS::from_epsg(4326).is_equivalent(&CRS::wgs84()));
        assert!(!CRS::from_epsg(32719).is_equivalent(&CRS::wgs84()));
        assert!(!CRS::from_wkt("GEOGCS[..]").is_equivalent(&CRS::wgs84()));
    }
}
