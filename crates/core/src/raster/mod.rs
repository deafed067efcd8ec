//! Raster data structures and operations

mod bbox;
mod element;
mod geotransform;
mod grid;
mod stats;
mod warp;
mod window;

pub use bbox::BBox;
pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterInfo};
pub use stats::{ClassCount, RasterStatistics};
pub use warp::reproject_nearest;
pub use window::PixelWindow;
