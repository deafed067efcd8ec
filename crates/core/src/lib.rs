//! # Geomatica Core
//!
//! Core types and I/O shared by the geomatica course units.
//!
//! This crate provides:
//! - `Raster<T>`: georeferenced 2D grid with clipping and summary statistics
//! - `GeoTransform` and `BBox`: affine georeferencing and extents
//! - `CRS`: coordinate reference systems, with WGS84 <-> UTM projection math
//! - Vector feature types built on `geo-types`
//! - Native GeoTIFF reading and writing

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;
pub mod vector;

pub use crs::CRS;
pub use error::{Error, Result};
pub use raster::{BBox, GeoTransform, Raster, RasterElement};
pub use vector::{AttributeValue, Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{BBox, GeoTransform, Raster, RasterElement, RasterStatistics};
    pub use crate::Algorithm;
}

/// Common shape for the raster algorithms of the course units.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
