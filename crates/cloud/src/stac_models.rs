//! STAC (SpatioTemporal Asset Catalog) data types.
//!
//! Lightweight serde models for STAC Item Search (POST /search) requests and
//! responses: bbox, datetime and collection filters, the query extension,
//! pagination via `links`, and asset access with `raster:bands` scaling.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Search request
// ---------------------------------------------------------------------------

/// Body for `POST /search` (STAC API – Item Search).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StacSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,

    /// Property filters of the query extension, e.g.
    /// `{"eo:cloud_cover": {"lt": 20}}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Pagination token (next page).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl StacSearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bounding box `[west, south, east, north]`.
    pub fn bbox(mut self, west: f64, south: f64, east: f64, north: f64) -> Self {
        self.bbox = Some(vec![west, south, east, north]);
        self
    }

    /// Set datetime or datetime range (e.g. `"2023-01-01/2023-01-31"`).
    pub fn datetime(mut self, dt: &str) -> Self {
        self.datetime = Some(dt.to_string());
        self
    }

    pub fn collections(mut self, cols: &[&str]) -> Self {
        self.collections = Some(cols.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Add one `property: {op: value}` filter. Operators on the same
    /// property accumulate.
    pub fn query(mut self, property: &str, op: &str, value: Value) -> Self {
        let filters = self.query.get_or_insert_with(Map::new);
        let entry = filters
            .entry(property.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(ops) = entry {
            ops.insert(op.to_string(), value);
        }
        self
    }

    /// Keep items with `eo:cloud_cover` below `percent`.
    pub fn max_cloud_cover(self, percent: f64) -> Self {
        self.query("eo:cloud_cover", "lt", Value::from(percent))
    }

    /// Keep items whose `platform` is one of `platforms`.
    pub fn platforms(self, platforms: &[&str]) -> Self {
        self.query("platform", "in", Value::from(platforms.to_vec()))
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn token(mut self, tok: &str) -> Self {
        self.token = Some(tok.to_string());
        self
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A STAC Item Collection (GeoJSON FeatureCollection).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacItemCollection {
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<StacItem>,

    #[serde(default)]
    pub links: Vec<StacLink>,

    #[serde(rename = "numberMatched", skip_serializing_if = "Option::is_none")]
    pub number_matched: Option<u64>,

    #[serde(rename = "numberReturned", skip_serializing_if = "Option::is_none")]
    pub number_returned: Option<u64>,

    /// Earth Search and some others report counts here instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StacItemCollection {
    /// Find the `"next"` pagination link, if any.
    pub fn next_link(&self) -> Option<&StacLink> {
        self.links.iter().find(|l| l.rel == "next")
    }

    pub fn has_next(&self) -> bool {
        self.next_link().is_some()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A single STAC Item (GeoJSON Feature).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacItem {
    #[serde(rename = "type")]
    pub type_: String,

    pub id: String,

    /// Geometry as raw JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,

    /// Bounding box `[west, south, east, north]` in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    pub properties: StacItemProperties,

    pub assets: HashMap<String, StacAsset>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(default)]
    pub links: Vec<StacLink>,
}

impl StacItem {
    pub fn asset(&self, key: &str) -> Option<&StacAsset> {
        self.assets.get(key)
    }

    /// EPSG code from the `proj:epsg` property (projection extension).
    pub fn epsg(&self) -> Option<u32> {
        self.properties
            .extra
            .get("proj:epsg")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }

    /// Acquisition time, parsed from the RFC 3339 `datetime` property.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        let raw = self.properties.datetime.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Longitude of the item's bbox centre.
    ///
    /// Handles both 2D `[w, s, e, n]` and 3D `[w, s, zmin, e, n, zmax]` boxes.
    pub fn center_lon(&self) -> Option<f64> {
        match self.bbox.as_deref() {
            Some([west, _, east, _]) | Some([west, _, _, east, _, _]) => Some((west + east) / 2.0),
            _ => None,
        }
    }

    /// Local calendar day of the acquisition: UTC shifted by longitude / 15 hours.
    ///
    /// Falls back to the UTC date when the item has no bbox.
    pub fn solar_day(&self) -> Option<NaiveDate> {
        let dt = self.datetime()?;
        let offset = self
            .center_lon()
            .map_or(0, |lon| (lon * 240.0).round() as i64);
        Some((dt + Duration::seconds(offset)).date_naive())
    }
}

/// STAC Item properties.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacItemProperties {
    /// ISO 8601 datetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    /// Cloud cover percentage (EO extension).
    #[serde(rename = "eo:cloud_cover", skip_serializing_if = "Option::is_none")]
    pub eo_cloud_cover: Option<f64>,

    /// Platform name (e.g., "Sentinel-2A", "landsat-9").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub constellation: Option<String>,

    /// Ground sample distance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gsd: Option<f64>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A single STAC Asset (file reference).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacAsset {
    pub href: String,

    /// Media type (e.g., `"image/tiff; application=geotiff; profile=cloud-optimized"`).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Roles: `["data"]`, `["thumbnail"]`, `["overview"]`, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Per-band metadata of the raster extension.
    #[serde(rename = "raster:bands", default, skip_serializing_if = "Vec::is_empty")]
    pub raster_bands: Vec<RasterBand>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl StacAsset {
    /// `(scale, offset)` of the first band, when the asset declares either.
    pub fn scale_offset(&self) -> Option<(f64, f64)> {
        let band = self.raster_bands.first()?;
        if band.scale.is_none() && band.offset.is_none() {
            return None;
        }
        Some((band.scale.unwrap_or(1.0), band.offset.unwrap_or(0.0)))
    }

    pub fn is_geotiff(&self) -> bool {
        let typed = self
            .type_
            .as_deref()
            .is_some_and(|t| t.contains("geotiff") || t.contains("geo+tiff"));
        typed || self.href.ends_with(".tif") || self.href.ends_with(".tiff")
    }
}

/// One entry of `raster:bands`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RasterBand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodata: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// A STAC Link (used for pagination and related resources).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacLink {
    /// Relationship: `"self"`, `"root"`, `"next"`, `"prev"`, etc.
    pub rel: String,

    pub href: String,

    /// HTTP method for the link (default GET, but `"next"` often uses POST).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Request body for POST-based pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Merge mode: if true, merge body with previous request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
