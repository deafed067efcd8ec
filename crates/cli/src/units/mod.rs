//! One module per course unit, each with a `run` entry point

pub mod imagery;
pub mod intro;
pub mod raster;
pub mod remote_sensing;
pub mod vector;
