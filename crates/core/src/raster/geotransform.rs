//! Affine geotransformation for rasters

use super::BBox;
use serde::{Deserialize, Serialize};

/// Affine transformation coefficients for georeferencing rasters.
///
/// Converts between pixel coordinates (col, row) and CRS coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up images the rotations are 0 and `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Cell size in X
    pub pixel_width: f64,
    /// Cell size in Y, usually negative
    pub pixel_height: f64,
    pub row_rotation: f64,
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a north-up transform
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// North-up grid snapped to `bbox` with square cells of `resolution`.
    ///
    /// Returns the transform and the (rows, cols) needed to cover the box.
    pub fn for_bbox(bbox: &BBox, resolution: f64) -> (Self, usize, usize) {
        let cols = (bbox.width() / resolution).ceil().max(1.0) as usize;
        let rows = (bbox.height() / resolution).ceil().max(1.0) as usize;
        (Self::new(bbox.min_x, bbox.max_y, resolution, -resolution), rows, cols)
    }

    /// Pixel center of (col, row) in CRS coordinates
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Top-left corner of (col, row) in CRS coordinates
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64, row as f64)
    }

    fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// Convert CRS coordinates to fractional pixel coordinates (col, row).
    ///
    /// Use `.floor()` to get integer indices.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;

        if det.abs() < 1e-10 {
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;

        (col, row)
    }

    /// Transform of the sub-grid whose top-left cell is (col, row)
    pub fn shifted(&self, col: usize, row: usize) -> Self {
        let (origin_x, origin_y) = self.pixel_to_geo_corner(col, row);
        Self {
            origin_x,
            origin_y,
            ..*self
        }
    }

    /// Cell size, assuming square pixels
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// (x, y) resolution as positive cell sizes
    pub fn resolution(&self) -> (f64, f64) {
        (self.pixel_width.abs(), self.pixel_height.abs())
    }

    pub fn is_north_up(&self) -> bool {
        self.row_rotation.abs() < 1e-10
            && self.col_rotation.abs() < 1e-10
            && self.pixel_height < 0.0
    }

    /// Extent of a raster of the given dimensions
    pub fn bounds(&self, width: usize, height: usize) -> BBox {
        let mut bbox = BBox::empty();
        for (col, row) in [(0, 0), (width, 0), (0, height), (width, height)] {
            let (x, y) = self.pixel_to_geo_corner(col, row);
            bbox.expand(x, y);
        }
        bbox
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_to_geo_roundtrip() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);

        let (x, y) = gt.pixel_to_geo(5, 10);
        let (col, row) = gt.geo_to_pixel(x, y);

        assert_relative_eq!(col, 5.5, epsilon = 1e-10);
        assert_relative_eq!(row, 10.5, epsilon = 1e-10);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let b = gt.bounds(100, 50);

        assert_relative_eq!(b.min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(b.min_y, 50.0, epsilon = 1e-10);
        assert_relative_eq!(b.max_x, 100.0, epsilon = 1e-10);
        assert_relative_eq!(b.max_y, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_for_bbox_covers_box() {
        let bbox = BBox::new(300_000.0, 6_190_000.0, 300_095.0, 6_190_040.0);
        let (gt, rows, cols) = GeoTransform::for_bbox(&bbox, 10.0);
        assert_eq!((rows, cols), (4, 10));
        assert_relative_eq!(gt.origin_y, 6_190_040.0);
        assert!(gt.bounds(cols, rows).contains(&bbox));
    }

    #[test]
    fn test_shifted_origin() {
        let gt = GeoTransform::new(0.0, 100.0, 2.0, -2.0).shifted(3, 4);
        assert_relative_eq!(gt.origin_x, 6.0);
        assert_relative_eq!(gt.origin_y, 92.0);
        assert_relative_eq!(gt.pixel_width, 2.0);
    }
}
