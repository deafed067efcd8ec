//! # Geomatica Algorithms
//!
//! Analysis routines for the geomatica course units.
//!
//! ## Available Algorithm Categories
//!
//! - **terrain**: Slope, aspect, hillshade (Horn's method)
//! - **vector**: Measurements, WKT/SVG rendering, topology graphs
//! - **imagery**: Band composites, resolution illustrations, sensor tables
//! - **landcover**: MapBiomas legend and class shares
//! - **synthetic**: Reproducible synthetic elevation models

mod maybe_rayon;

pub mod imagery;
pub mod landcover;
pub mod synthetic;
pub mod terrain;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{
        composite, BandScaling, Composite, CompositeKind, CompositeParams,
    };
    pub use crate::landcover::{class_shares, lookup, ClassShare, LandCoverClass};
    pub use crate::synthetic::{synthetic_dem, SyntheticDemParams};
    pub use crate::terrain::{
        aspect, hillshade, slope, Aspect, AspectOutput, Hillshade, HillshadeParams, Slope,
        SlopeParams, SlopeUnits,
    };
    pub use crate::vector::{
        area, centroid, length, to_svg, to_wkt, GeometryAttributes, TopologyGraph,
        TopologyParams,
    };
    pub use geomatica_core::prelude::*;
}
