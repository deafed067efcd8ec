//! Main Raster type

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{BBox, GeoTransform, RasterElement};
use ndarray::{Array2, ArrayView2};
use std::fmt;

/// A georeferenced 2D raster grid.
///
/// `Raster<T>` stores values of type `T` in row-major order together with
/// the affine transform, the CRS and an optional no-data value.
///
/// # Example
///
/// ```ignore
/// use geomatica_core::Raster;
///
/// let mut raster: Raster<f32> = Raster::new(100, 100);
/// raster.set(10, 20, 42.0)?;
/// let value = raster.get(10, 20)?;
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
    transform: GeoTransform,
    crs: Option<CRS>,
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Create a raster from row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
        }
    }

    /// Create a zeroed raster of another type sharing transform and CRS
    pub fn with_same_meta<U: RasterElement>(&self, rows: usize, cols: usize) -> Raster<U> {
        Raster {
            data: Array2::zeros((rows, cols)),
            transform: self.transform,
            crs: self.crs.clone(),
            nodata: None,
        }
    }

    /// Apply `f` to every cell, keeping the georeferencing.
    ///
    /// No-data cells map to `nodata` of the output.
    pub fn map<U, F>(&self, nodata: Option<U>, f: F) -> Raster<U>
    where
        U: RasterElement,
        F: Fn(T) -> U,
    {
        let src_nodata = self.nodata;
        let fill = nodata.unwrap_or_else(U::default_nodata);
        Raster {
            data: self
                .data
                .mapv(|v| if v.is_nodata(src_nodata) { fill } else { f(v) }),
            transform: self.transform,
            crs: self.crs.clone(),
            nodata,
        }
    }

    // Dimensions

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Value of the cell containing CRS point (x, y), if inside the grid
    pub fn sample(&self, x: f64, y: f64) -> Option<T> {
        let (col, row) = self.transform.geo_to_pixel(x, y);
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        self.data.get((row.floor() as usize, col.floor() as usize)).copied()
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    // Metadata

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<CRS>) {
        self.crs = crs;
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// (x, y) resolution
    pub fn resolution(&self) -> (f64, f64) {
        self.transform.resolution()
    }

    /// Extent of the grid in CRS units
    pub fn bounds(&self) -> BBox {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Pixel center of (col, row)
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.pixel_to_geo(col, row)
    }

    /// Fractional pixel coordinates (col, row) of a CRS point
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        self.transform.geo_to_pixel(x, y)
    }

    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    /// Shape, CRS, resolution and bounds in one printable record
    pub fn info(&self) -> RasterInfo {
        RasterInfo {
            rows: self.rows(),
            cols: self.cols(),
            crs: self.crs.clone(),
            resolution: self.resolution(),
            bounds: self.bounds(),
        }
    }
}

/// Summary of a raster's grid and georeferencing
#[derive(Debug, Clone, PartialEq)]
pub struct RasterInfo {
    pub rows: usize,
    pub cols: usize,
    pub crs: Option<CRS>,
    pub resolution: (f64, f64),
    pub bounds: BBox,
}

impl fmt::Display for RasterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dimensions: (1, {}, {})", self.rows, self.cols)?;
        match &self.crs {
            Some(crs) => writeln!(f, "Coordinate system: {}", crs)?,
            None => writeln!(f, "Coordinate system: None")?,
        }
        writeln!(f, "Resolution: ({}, {})", self.resolution.0, self.resolution.1)?;
        write!(f, "Bounds: {}", self.bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<f32> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
    }

    #[test]
    fn test_raster_access() {
        let mut raster: Raster<f32> = Raster::new(10, 10);
        raster.set(5, 5, 42.0).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), 42.0);
        assert!(raster.get(10, 0).is_err());
        assert!(raster.set(0, 10, 1.0).is_err());
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Raster::<u8>::from_vec(vec![1, 2, 3], 2, 2).is_err());
        let r = Raster::<u8>::from_vec(vec![1, 2, 3, 4], 2, 2).unwrap();
        assert_eq!(r.get(1, 0).unwrap(), 3);
    }

    #[test]
    fn test_sample_by_coordinate() {
        let mut r = Raster::<u8>::from_vec(vec![1, 2, 3, 4], 2, 2).unwrap();
        r.set_transform(GeoTransform::new(0.0, 20.0, 10.0, -10.0));
        assert_eq!(r.sample(15.0, 15.0), Some(2));
        assert_eq!(r.sample(5.0, 5.0), Some(3));
        assert_eq!(r.sample(-1.0, 5.0), None);
        assert_eq!(r.sample(25.0, 5.0), None);
    }

    #[test]
    fn test_map_keeps_nodata() {
        let mut r = Raster::<u16>::from_vec(vec![0, 100, 200, 300], 2, 2).unwrap();
        r.set_nodata(Some(0));
        let scaled = r.map(Some(f32::NAN), |v| v as f32 * 0.5);
        assert!(scaled.get(0, 0).unwrap().is_nan());
        assert_eq!(scaled.get(1, 1).unwrap(), 150.0);
    }

    #[test]
    fn test_info_display() {
        let mut r: Raster<u8> = Raster::new(3, 4);
        r.set_crs(Some(CRS::wgs84()));
        let text = r.info().to_string();
        assert!(text.contains("(1, 3, 4)"));
        assert!(text.contains("EPSG:4326"));
    }
}
