//! Terrain derivatives of a DEM
//!
//! - Slope: rate of change of elevation
//! - Aspect: direction of steepest descent
//! - Hillshade: shaded relief for a given sun position
//!
//! All three share the Horn 3x3 gradient and expect a projected DEM whose
//! cell size is in the same unit as the elevations.

mod aspect;
mod hillshade;
mod horn;
mod slope;

pub use aspect::{aspect, Aspect, AspectOutput, FLAT_ASPECT};
pub use hillshade::{hillshade, Hillshade, HillshadeParams};
pub use slope::{slope, Slope, SlopeParams, SlopeUnits};
