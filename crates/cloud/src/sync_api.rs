//! Blocking (synchronous) API.
//!
//! Wraps the async [`StacClient`] with a Tokio runtime so callers don't need
//! to manage their own, and loads bands through blocking HTTP range reads.

use tokio::runtime::Runtime;

use crate::cache::BlockReader;
use crate::error::{CloudError, Result};
use crate::loader::{load_stacks, BandStack, LoadOptions};
use crate::source::HttpSource;
use crate::stac_client::{StacCatalog, StacClient, StacClientOptions};
use crate::stac_models::{StacItem, StacItemCollection, StacSearchParams};

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CloudError::Network(e.to_string()))
}

/// Blocking wrapper around [`StacClient`].
pub struct StacClientBlocking {
    rt: Runtime,
    inner: StacClient,
    options: StacClientOptions,
}

impl StacClientBlocking {
    pub fn new(catalog: StacCatalog, options: StacClientOptions) -> Result<Self> {
        let rt = runtime()?;
        let inner = StacClient::new(catalog, options.clone())?;
        Ok(Self { rt, inner, options })
    }

    pub fn catalog(&self) -> &StacCatalog {
        self.inner.catalog()
    }

    /// Execute a single search request (blocking).
    pub fn search(&self, params: &StacSearchParams) -> Result<StacItemCollection> {
        self.rt.block_on(self.inner.search(params))
    }

    /// Search with automatic pagination (blocking).
    pub fn search_all(&self, params: &StacSearchParams) -> Result<Vec<StacItem>> {
        self.rt.block_on(self.inner.search_all(params))
    }

    /// Search with pagination; no results is [`CloudError::EmptySearch`].
    pub fn search_nonempty(&self, params: &StacSearchParams) -> Result<Vec<StacItem>> {
        self.rt.block_on(self.inner.search_nonempty(params))
    }

    /// Sign an asset href for Planetary Computer (blocking).
    pub fn sign_href(&self, href: &str) -> Result<String> {
        self.rt.block_on(self.inner.sign_href(href))
    }

    /// Load the requested bands of `items`, one stack per solar day.
    ///
    /// Asset hrefs are signed on the fly when the catalog requires it.
    pub fn load(&self, items: &[StacItem], options: &LoadOptions) -> Result<Vec<BandStack>> {
        load_stacks(items, options, |asset| {
            let href = self.sign_href(&asset.href)?;
            let source = HttpSource::open(&href, self.options.request_timeout, self.options.max_retries)?;
            Ok(BlockReader::new(source, options.block_size, options.cache_blocks))
        })
    }
}
