//! Async STAC client for searching spatio-temporal asset catalogs.
//!
//! Planetary Computer and Earth Search are built in; any other STAC API
//! root works through [`StacCatalog::Custom`].

use std::time::Duration;

use reqwest::Url;
use tracing::{debug, info, warn};

use crate::error::{CloudError, Result};
use crate::stac_models::{StacItem, StacItemCollection, StacLink, StacSearchParams};

const PC_ROOT: &str = "https://planetarycomputer.microsoft.com/api/stac/v1";
const PC_SIGN: &str = "https://planetarycomputer.microsoft.com/api/sas/v1/sign";
const ES_ROOT: &str = "https://earth-search.aws.element84.com/v1";

// ---------------------------------------------------------------------------
// Catalog enum
// ---------------------------------------------------------------------------

/// Well-known STAC catalogs plus custom endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StacCatalog {
    /// Microsoft Planetary Computer STAC API.
    PlanetaryComputer,
    /// AWS Earth Search (Element 84).
    EarthSearch,
    /// Any STAC API root URL.
    Custom(String),
}

impl StacCatalog {
    pub fn root_url(&self) -> &str {
        match self {
            Self::PlanetaryComputer => PC_ROOT,
            Self::EarthSearch => ES_ROOT,
            Self::Custom(base) => base.trim_end_matches('/'),
        }
    }

    /// The POST `/search` URL for this catalog.
    pub fn search_url(&self) -> String {
        let root = self.root_url();
        if root.ends_with("/search") {
            root.to_string()
        } else {
            format!("{}/search", root)
        }
    }

    /// `"pc"` / `"planetary-computer"`, `"es"` / `"earth-search"`, or a URL.
    pub fn from_str_or_url(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pc" | "planetary-computer" | "planetarycomputer" => Self::PlanetaryComputer,
            "es" | "earth-search" | "earthsearch" => Self::EarthSearch,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// Whether asset hrefs need a SAS token before they can be read.
    pub fn needs_signing(&self) -> bool {
        matches!(self, Self::PlanetaryComputer)
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for [`StacClient`].
#[derive(Debug, Clone)]
pub struct StacClientOptions {
    /// Per-request timeout (default 30 s).
    pub request_timeout: Duration,
    /// Maximum retries on transient failures (default 3).
    pub max_retries: u32,
    /// Maximum total items to fetch across pages (default 100).
    pub max_items: usize,
}

impl Default for StacClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            max_items: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Async client for STAC Item Search.
pub struct StacClient {
    catalog: StacCatalog,
    client: reqwest::Client,
    options: StacClientOptions,
}

impl StacClient {
    pub fn new(catalog: StacCatalog, options: StacClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| CloudError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            catalog,
            client,
            options,
        })
    }

    pub fn catalog(&self) -> &StacCatalog {
        &self.catalog
    }

    /// Execute a single search request and return one page of results.
    pub async fn search(&self, params: &StacSearchParams) -> Result<StacItemCollection> {
        let url = self.catalog.search_url();
        self.post_search(&url, params).await
    }

    /// Search with automatic pagination, collecting up to `max_items` items.
    pub async fn search_all(&self, params: &StacSearchParams) -> Result<Vec<StacItem>> {
        let max = self.options.max_items;
        let mut all_items: Vec<StacItem> = Vec::new();
        let mut page = self.search(params).await?;

        loop {
            let next = page.next_link().cloned();
            all_items.append(&mut page.features);

            if all_items.len() >= max {
                break;
            }
            match next {
                Some(link) => {
                    page = self.follow_next(&link, params).await?;
                    if page.is_empty() {
                        break;
                    }
                }
                None => break,
            }
        }

        all_items.truncate(max);
        info!(
            catalog = self.catalog.root_url(),
            items = all_items.len(),
            "search finished"
        );
        Ok(all_items)
    }

    /// Like [`search_all`](Self::search_all), but an empty result is an error.
    pub async fn search_nonempty(&self, params: &StacSearchParams) -> Result<Vec<StacItem>> {
        let items = self.search_all(params).await?;
        if items.is_empty() {
            return Err(CloudError::EmptySearch);
        }
        Ok(items)
    }

    /// Sign an asset href for Planetary Computer via the SAS endpoint.
    ///
    /// For other catalogs the href is returned unchanged.
    pub async fn sign_href(&self, href: &str) -> Result<String> {
        if !self.catalog.needs_signing() {
            return Ok(href.to_string());
        }

        let url = Url::parse_with_params(PC_SIGN, &[("href", href)])
            .map_err(|e| CloudError::Auth(format!("invalid href {href}: {e}")))?;
        debug!(%href, "signing asset");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CloudError::Auth(format!("PC sign request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CloudError::Auth(format!(
                "PC sign returned HTTP {}: {}",
                status,
                body.chars().take(300).collect::<String>()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CloudError::Auth(format!("parsing PC sign response: {e}")))?;

        body["href"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CloudError::Auth("PC sign response missing 'href' field".into()))
    }

    async fn post_search(&self, url: &str, params: &StacSearchParams) -> Result<StacItemCollection> {
        let mut last_err = None;

        for attempt in 0..=self.options.max_retries {
            if attempt > 0 {
                // 500 ms, 1 s, 2 s, ...
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(attempt, ?delay, "retrying STAC search");
                tokio::time::sleep(delay).await;
            }

            debug!(%url, attempt, "POST search");
            let resp = self.client.post(url).json(params).send().await;

            match resp {
                Ok(r) if r.status().is_success() => {
                    let body = r
                        .text()
                        .await
                        .map_err(|e| CloudError::Network(format!("reading response body: {e}")))?;
                    return serde_json::from_str(&body)
                        .map_err(|e| CloudError::Network(format!("parsing STAC response: {e}")));
                }
                Ok(r) => {
                    let status = r.status();
                    let body = r.text().await.unwrap_or_default();
                    last_err = Some(CloudError::Network(format!(
                        "STAC search returned HTTP {}: {}",
                        status,
                        body.chars().take(500).collect::<String>()
                    )));
                    // 4xx will not improve on retry
                    if status.is_client_error() {
                        break;
                    }
                }
                Err(e) => {
                    last_err = Some(CloudError::Network(format!("STAC search request failed: {e}")));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| CloudError::Network("STAC search failed".into())))
    }

    /// Follow a pagination link, POST (with optional body merge) or GET.
    async fn follow_next(
        &self,
        link: &StacLink,
        original_params: &StacSearchParams,
    ) -> Result<StacItemCollection> {
        let method = link.method.as_deref().unwrap_or("GET").to_uppercase();

        if method == "POST" {
            let next = next_page_params(link, original_params)?;
            return self.post_search(&link.href, &next).await;
        }

        let resp = self
            .client
            .get(&link.href)
            .send()
            .await
            .map_err(|e| CloudError::Network(format!("GET pagination: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CloudError::Network(format!(
                "STAC pagination returned HTTP {}: {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| CloudError::Network(format!("reading pagination body: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| CloudError::Network(format!("parsing pagination response: {e}")))
    }
}

/// Search body for a POST `next` link: the link body, merged over the
/// original parameters when `merge` is set.
fn next_page_params(link: &StacLink, original: &StacSearchParams) -> Result<StacSearchParams> {
    let to_value = |p: &StacSearchParams| {
        serde_json::to_value(p).map_err(|e| CloudError::Network(format!("serializing params: {e}")))
    };

    let body = match (&link.body, link.merge.unwrap_or(false)) {
        (Some(link_body), true) => {
            let mut base = to_value(original)?;
            if let (Some(base_obj), Some(link_obj)) = (base.as_object_mut(), link_body.as_object()) {
                for (k, v) in link_obj {
                    base_obj.insert(k.clone(), v.clone());
                }
            }
            base
        }
        (Some(link_body), false) => link_body.clone(),
        (None, _) => to_value(original)?,
    };

    serde_json::from_value(body)
        .map_err(|e| CloudError::Network(format!("parsing merged params: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_search_urls() {
        assert_eq!(
            StacCatalog::PlanetaryComputer.search_url(),
            "https://planetarycomputer.microsoft.com/api/stac/v1/search"
        );
        assert_eq!(
            StacCatalog::Custom("https://example.com/stac/".into()).search_url(),
            "https://example.com/stac/search"
        );
        assert_eq!(
            StacCatalog::Custom("https://example.com/stac/search".into()).search_url(),
            "https://example.com/stac/search"
        );
    }

    #[test]
    fn catalog_shorthands() {
        assert_eq!(StacCatalog::from_str_or_url("PC"), StacCatalog::PlanetaryComputer);
        assert_eq!(StacCatalog::from_str_or_url("es"), StacCatalog::EarthSearch);
        // Custom URLs keep their case
        assert_eq!(
            StacCatalog::from_str_or_url("https://Example.com/API"),
            StacCatalog::Custom("https://Example.com/API".into())
        );
        assert!(StacCatalog::PlanetaryComputer.needs_signing());
        assert!(!StacCatalog::EarthSearch.needs_signing());
    }

    #[test]
    fn merged_next_page_keeps_filters() {
        let original = StacSearchParams::new()
            .collections(&["sentinel-2-l2a"])
            .max_cloud_cover(20.0);
        let link = StacLink {
            rel: "next".into(),
            href: "https://example.com/search".into(),
            method: Some("POST".into()),
            body: Some(json!({"token": "page2"})),
            merge: Some(true),
            type_: None,
        };

        let next = next_page_params(&link, &original).unwrap();
        assert_eq!(next.token.as_deref(), Some("page2"));
        assert_eq!(next.collections, original.collections);
        assert!(next.query.is_some());

        let replaced = next_page_params(&StacLink { merge: None, ..link }, &original).unwrap();
        assert!(replaced.collections.is_none());
    }
}
