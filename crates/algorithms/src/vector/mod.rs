//! Vector geometry: measurements, text and SVG rendering, topology
//!
//! - Measurements: area (holes subtracted), length/perimeter, centroid, bounds
//! - WKT text and SVG previews of any `geo` geometry
//! - A node/arc graph contrasting geometric and topological queries

mod attributes;
mod measurements;
pub mod samples;
mod svg;
mod topology;
mod wkt;

pub use attributes::{bounds_tuple, coords_list, GeometryAttributes};
pub use measurements::{area, bounds, centroid, length, perimeter};
pub use svg::to_svg;
pub use topology::{Arc, BuildReport, Node, Route, TopologyGraph, TopologyParams, UnmatchedArc};
pub use wkt::{to_wkt, type_name, Wkt};
