//! Reading and writing GeoTIFF rasters

pub mod geokeys;
mod native;

pub use geokeys::Georeference;
pub use native::{
    cast_samples, read_geotiff, read_geotiff_from_buffer, write_geotiff, write_geotiff_to_buffer,
    GeoTiffOptions, SampleType,
};
