//! Error types for catalog search and remote raster reads.

use thiserror::Error;

/// Errors produced by the catalog client and band loader.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server does not support Range requests for {url}")]
    RangeNotSupported { url: String },

    #[error("invalid TIFF: {reason}")]
    InvalidTiff { reason: String },

    #[error("TIFF decoding failed: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("bbox does not intersect raster extent")]
    BBoxOutside,

    #[error("search returned no items")]
    EmptySearch,

    #[error("asset '{asset}' not found in item '{item}'")]
    MissingAsset { item: String, asset: String },

    #[error("core error: {0}")]
    Core(#[from] geomatica_core::Error),
}

/// Result alias for cloud operations.
pub type Result<T> = std::result::Result<T, CloudError>;
