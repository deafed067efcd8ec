//! Random-access byte sources: HTTP Range requests or memory.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderName, ACCEPT_RANGES, CONTENT_LENGTH, RANGE};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{CloudError, Result};

/// A file that can be read at arbitrary offsets.
pub trait ByteSource {
    /// Total size in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes `[offset, offset + length)`, truncated at the end of the file.
    fn read_range(&self, offset: u64, length: u64) -> Result<Vec<u8>>;
}

/// In-memory source, for tests and already-downloaded files.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl ByteSource for MemorySource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_range(&self, offset: u64, length: u64) -> Result<Vec<u8>> {
        let start = (offset as usize).min(self.data.len());
        let end = (offset.saturating_add(length) as usize).min(self.data.len());
        Ok(self.data[start..end].to_vec())
    }
}

/// Remote file read through HTTP Range requests.
pub struct HttpSource {
    client: Client,
    url: String,
    size: u64,
    max_retries: u32,
}

impl HttpSource {
    /// Open `url`, discovering its size and Range support with a HEAD request.
    pub fn open(url: &str, request_timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        let resp = execute_with_retry(client.head(url), max_retries)?;

        if !resp.status().is_success() {
            return Err(CloudError::Network(format!("HTTP {} for HEAD {}", resp.status(), url)));
        }

        let header = |name: HeaderName| resp.headers().get(name).and_then(|v| v.to_str().ok());
        // Some servers omit Accept-Ranges but honour Range anyway; a 200 reply
        // to the first ranged GET is caught in read_range.
        if header(ACCEPT_RANGES) == Some("none") {
            return Err(CloudError::RangeNotSupported { url: url.to_string() });
        }
        let size = header(CONTENT_LENGTH)
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| CloudError::Network(format!("no content length for {}", url)))?;

        debug!(%url, size, "opened remote file");
        Ok(Self {
            client,
            url: url.to_string(),
            size,
            max_retries,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ByteSource for HttpSource {
    fn len(&self) -> u64 {
        self.size
    }

    fn read_range(&self, offset: u64, length: u64) -> Result<Vec<u8>> {
        let end = offset.saturating_add(length).min(self.size);
        if offset >= end {
            return Ok(Vec::new());
        }

        let range = format!("bytes={}-{}", offset, end - 1);
        debug!(url = %self.url, %range, "range request");
        let resp = execute_with_retry(self.client.get(&self.url).header(RANGE, range), self.max_retries)?;

        let status = resp.status();
        if status == StatusCode::RANGE_NOT_SATISFIABLE
            || (status.is_success() && status != StatusCode::PARTIAL_CONTENT)
        {
            return Err(CloudError::RangeNotSupported { url: self.url.clone() });
        }
        if !status.is_success() {
            return Err(CloudError::Network(format!("HTTP {} fetching {}", status, self.url)));
        }

        Ok(resp.bytes()?.to_vec())
    }
}

/// Send with exponential backoff on timeouts and connection failures.
fn execute_with_retry(request: RequestBuilder, max_retries: u32) -> Result<Response> {
    let mut attempt = 0;
    loop {
        let Some(cloned) = request.try_clone() else {
            return Ok(request.send()?);
        };
        match cloned.send() {
            Ok(resp) => return Ok(resp),
            Err(e) if (e.is_timeout() || e.is_connect()) && attempt < max_retries => {
                attempt += 1;
                let backoff = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                warn!(error = %e, attempt, "transient HTTP failure, retrying");
                std::thread::sleep(backoff);
            }
            Err(e) => return Err(e.into()),
        }
    }
}
