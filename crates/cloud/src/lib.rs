//! # Geomatica Cloud
//!
//! Satellite image access through STAC catalogs.
//!
//! - [`StacClient`]: async STAC Item Search with pagination, retries and
//!   Planetary Computer signing; [`blocking`] wraps it for sync callers
//! - [`HttpSource`] + [`BlockReader`]: HTTP Range reads behind an LRU block cache
//! - [`WindowedGeoTiff`]: decode only the tiles a window touches
//! - [`loader`]: solar-day grouping, nearest resampling onto a target grid
//!   and first-valid-wins merging

pub mod cache;
pub mod error;
pub mod geotiff_window;
pub mod loader;
pub mod source;
pub mod stac_client;
pub mod stac_models;
mod sync_api;

pub use cache::{BlockCache, BlockReader};
pub use error::{CloudError, Result};
pub use geotiff_window::{GeoTiffInfo, WindowedGeoTiff};
pub use loader::{BandStack, LoadOptions, LoadedBand, TargetGrid};
pub use source::{ByteSource, HttpSource, MemorySource};
pub use stac_client::{StacCatalog, StacClient, StacClientOptions};
pub use stac_models::{StacAsset, StacItem, StacItemCollection, StacSearchParams};

/// Blocking API.
pub mod blocking {
    pub use crate::sync_api::*;
}
