//! # Geomatica Colormap
//!
//! Color mapping, figure drawing and PNG export for the course units.
//!
//! [`raster_to_rgba`] turns a `Raster<T>` into an RGBA buffer through one of
//! the continuous [`ColorScheme`]s; land-cover codes go through
//! [`categorical_to_rgba`] with [`landcover_color`]. Figures are plain
//! images with axes and no text.
//!
//! ## Usage
//!
//! ```ignore
//! use geomatica_colormap::{auto_params, raster_to_rgba, rgba_image, save_png, ColorScheme};
//!
//! let params = auto_params(&dem, ColorScheme::Terrain);
//! let rgba = raster_to_rgba(&dem, &params);
//! save_png(&rgba_image(dem.rows(), dem.cols(), rgba).unwrap(), "dem.png")?;
//! ```

mod export;
mod figure;
mod landcover;
mod render;
mod scheme;

pub use export::save_png;
pub use image::RgbaImage;
pub use figure::{bar_chart, panels, Canvas, LineChart};
pub use landcover::landcover_color;
pub use render::{
    auto_params, categorical_to_rgba, composite_to_rgba, raster_to_rgba, rgba_image,
    ColormapParams,
};
pub use scheme::{evaluate, ColorScheme, ColorStop, Rgb};
