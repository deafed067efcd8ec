//! Pixel windows and bounding-box clipping

use crate::error::{Error, Result};
use crate::raster::{BBox, GeoTransform, Raster, RasterElement};
use ndarray::s;

/// A rectangular block of cells: `rows` x `cols` starting at (`row_off`, `col_off`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub col_off: usize,
    pub row_off: usize,
    pub cols: usize,
    pub rows: usize,
}

impl PixelWindow {
    pub fn new(col_off: usize, row_off: usize, cols: usize, rows: usize) -> Self {
        Self { col_off, row_off, cols, rows }
    }

    /// Cells of a `width` x `height` grid touched by `bbox`.
    ///
    /// Returns `None` when the box misses the grid.
    pub fn from_bbox(
        transform: &GeoTransform,
        width: usize,
        height: usize,
        bbox: &BBox,
    ) -> Option<Self> {
        let (col_a, row_a) = transform.geo_to_pixel(bbox.min_x, bbox.max_y);
        let (col_b, row_b) = transform.geo_to_pixel(bbox.max_x, bbox.min_y);
        if [col_a, row_a, col_b, row_b].iter().any(|v| !v.is_finite()) {
            return None;
        }

        let clamp = |v: f64, max: usize| (v.max(0.0) as usize).min(max);
        let min_col = clamp(col_a.min(col_b).floor(), width);
        let max_col = clamp(col_a.max(col_b).ceil(), width);
        let min_row = clamp(row_a.min(row_b).floor(), height);
        let max_row = clamp(row_a.max(row_b).ceil(), height);

        if min_col >= max_col || min_row >= max_row {
            return None;
        }

        Some(Self::new(min_col, min_row, max_col - min_col, max_row - min_row))
    }

    pub fn col_end(&self) -> usize {
        self.col_off + self.cols
    }

    pub fn row_end(&self) -> usize {
        self.row_off + self.rows
    }
}

impl<T: RasterElement> Raster<T> {
    /// Copy a window of cells into a new raster with a matching transform.
    pub fn window(&self, window: PixelWindow) -> Result<Raster<T>> {
        if window.row_end() > self.rows() || window.col_end() > self.cols() {
            return Err(Error::IndexOutOfBounds {
                row: window.row_end(),
                col: window.col_end(),
                rows: self.rows(),
                cols: self.cols(),
            });
        }

        let data = self
            .data()
            .slice(s![window.row_off..window.row_end(), window.col_off..window.col_end()])
            .to_owned();

        let mut out = Raster::from_array(data);
        out.set_transform(self.transform().shifted(window.col_off, window.row_off));
        out.set_crs(self.crs().cloned());
        out.set_nodata(self.nodata());
        Ok(out)
    }

    /// Clip to the cells touched by `bbox` (in the raster's CRS).
    ///
    /// The result's extent never exceeds the input extent.
    pub fn clip_box(&self, bbox: &BBox) -> Result<Raster<T>> {
        let window = PixelWindow::from_bbox(self.transform(), self.cols(), self.rows(), bbox)
            .ok_or(Error::EmptyClip {
                min_x: bbox.min_x,
                min_y: bbox.min_y,
                max_x: bbox.max_x,
                max_y: bbox.max_y,
            })?;
        self.window(window)
    }
}
