//! Imagery helpers
//!
//! - Composite: scale, gain and clip three bands into a display image
//! - Resolution: spatial, spectral and radiometric resolution illustrations
//! - Sensors: platform, revisit, mission and band reference tables

mod composite;
mod resolution;
mod sensors;

pub use composite::{composite, BandScaling, Composite, CompositeKind, CompositeParams, DEFAULT_SCALE};
pub use resolution::{
    degrade, gradient_image, hyperspectral_bands, landsat8_oli_bands, panchromatic_band, quantize,
    quantize_image, two_squares_scene, SpectralBand, SpectralCurve,
};
pub use sensors::{
    revisits_sorted, text_table, Mission, Platform, Revisit, Sentinel2Band, MISSIONS, PLATFORMS,
    SENTINEL2_BANDS,
};
