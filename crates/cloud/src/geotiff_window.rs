//! Windowed reads from a (Cloud Optimized) GeoTIFF.
//!
//! Only the tiles or strips overlapping the requested window are decoded,
//! so over a [`BlockReader`](crate::cache::BlockReader) only their bytes
//! are fetched.

use std::io::{Read, Seek};

use geomatica_core::crs::CRS;
use geomatica_core::io::{cast_samples, Georeference};
use geomatica_core::raster::{BBox, GeoTransform, PixelWindow, Raster, RasterElement};
use ndarray::Array2;
use tiff::decoder::Decoder;
use tiff::tags::Tag;
use tracing::debug;

use crate::error::{CloudError, Result};

/// Grid and georeferencing of an opened GeoTIFF.
#[derive(Debug, Clone)]
pub struct GeoTiffInfo {
    pub width: u32,
    pub height: u32,
    pub chunk_width: u32,
    pub chunk_height: u32,
    pub samples: usize,
    pub transform: GeoTransform,
    pub crs: Option<CRS>,
    pub nodata: Option<f64>,
}

impl GeoTiffInfo {
    pub fn bounds(&self) -> BBox {
        self.transform.bounds(self.width as usize, self.height as usize)
    }
}

/// GeoTIFF reader decoding only the chunks a window needs.
pub struct WindowedGeoTiff<R: Read + Seek> {
    decoder: Decoder<R>,
    info: GeoTiffInfo,
}

impl<R: Read + Seek> WindowedGeoTiff<R> {
    /// Parse the header and first IFD.
    pub fn open(reader: R) -> Result<Self> {
        let mut decoder = Decoder::new(reader)?;
        let (width, height) = decoder.dimensions()?;
        let (chunk_width, chunk_height) = decoder.chunk_dimensions();
        // Absent tag means one sample per pixel (TIFF 6.0 default)
        let samples = decoder
            .get_tag_u32(Tag::SamplesPerPixel)
            .map(|s| s as usize)
            .unwrap_or(1);

        let georef = Georeference::read(&mut decoder);
        let transform = georef.transform.ok_or_else(|| CloudError::InvalidTiff {
            reason: "missing ModelPixelScale/ModelTiepoint tags".into(),
        })?;

        let info = GeoTiffInfo {
            width,
            height,
            chunk_width,
            chunk_height,
            samples,
            transform,
            crs: georef.crs,
            nodata: georef.nodata,
        };
        debug!(?info, "opened GeoTIFF");
        Ok(Self { decoder, info })
    }

    pub fn info(&self) -> &GeoTiffInfo {
        &self.info
    }

    /// Read the cells of `window`.
    ///
    /// The output carries the window's transform, the file CRS and its
    /// nodata value (cast to `T`).
    pub fn read_window<T: RasterElement>(&mut self, window: PixelWindow) -> Result<Raster<T>> {
        let (width, height) = (self.info.width as usize, self.info.height as usize);
        if window.cols == 0 || window.rows == 0 || window.col_end() > width || window.row_end() > height {
            return Err(CloudError::BBoxOutside);
        }

        let cw = self.info.chunk_width.max(1) as usize;
        let ch = self.info.chunk_height.max(1) as usize;
        let chunks_across = width.div_ceil(cw);

        let fill = self
            .info
            .nodata
            .map_or_else(T::default_nodata, T::from_f64);
        let mut data = Array2::from_elem((window.rows, window.cols), fill);

        for cy in window.row_off / ch..=(window.row_end() - 1) / ch {
            for cx in window.col_off / cw..=(window.col_end() - 1) / cw {
                let index = (cy * chunks_across + cx) as u32;
                let (data_w, data_h) = self.decoder.chunk_data_dimensions(index);
                let values: Vec<T> = cast_samples(self.decoder.read_chunk(index)?, self.info.samples)?;

                let (x0, y0) = (cx * cw, cy * ch);
                let rows = y0.max(window.row_off)..(y0 + data_h as usize).min(window.row_end());
                let cols = x0.max(window.col_off)..(x0 + data_w as usize).min(window.col_end());
                for r in rows {
                    for c in cols.clone() {
                        let v = values[(r - y0) * data_w as usize + (c - x0)];
                        data[(r - window.row_off, c - window.col_off)] = v;
                    }
                }
            }
        }

        let mut raster = Raster::from_array(data);
        raster.set_transform(self.info.transform.shifted(window.col_off, window.row_off));
        raster.set_crs(self.info.crs.clone());
        raster.set_nodata(self.info.nodata.map(T::from_f64));
        Ok(raster)
    }

    /// Read the part of the file covering `bbox` (in the file's CRS).
    pub fn read_bbox<T: RasterElement>(&mut self, bbox: &BBox) -> Result<Raster<T>> {
        let window = PixelWindow::from_bbox(
            &self.info.transform,
            self.info.width as usize,
            self.info.height as usize,
            bbox,
        )
        .ok_or(CloudError::BBoxOutside)?;
        self.read_window(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BlockReader;
    use crate::source::MemorySource;
    use geomatica_core::io::{write_geotiff_to_buffer, GeoTiffOptions, SampleType};
    use std::io::Cursor;

    fn sample_tiff() -> Vec<u8> {
        let values: Vec<u16> = (0..40 * 30).map(|i| i as u16).collect();
        let mut r = Raster::from_vec(values, 30, 40).unwrap();
        r.set_transform(GeoTransform::new(300_000.0, 6_200_000.0, 10.0, -10.0));
        r.set_crs(Some(CRS::from_epsg(32719)));
        r.set_nodata(Some(0));
        write_geotiff_to_buffer(&r, Some(GeoTiffOptions::with_sample_type(SampleType::U16))).unwrap()
    }

    #[test]
    fn window_matches_full_grid() {
        let mut tiff = WindowedGeoTiff::open(Cursor::new(sample_tiff())).unwrap();
        assert_eq!((tiff.info().width, tiff.info().height), (40, 30));
        assert_eq!(tiff.info().crs, Some(CRS::from_epsg(32719)));
        assert_eq!(tiff.info().samples, 1);

        let w = PixelWindow { col_off: 5, row_off: 7, cols: 10, rows: 4 };
        let r: Raster<u16> = tiff.read_window(w).unwrap();
        assert_eq!(r.shape(), (4, 10));
        assert_eq!(r.get(0, 0).unwrap(), 7 * 40 + 5);
        assert_eq!(r.get(3, 9).unwrap(), 10 * 40 + 14);
        assert_eq!(r.transform().origin_x, 300_050.0);
        assert_eq!(r.transform().origin_y, 6_199_930.0);
        assert_eq!(r.nodata(), Some(0));
    }

    #[test]
    fn bbox_read_through_block_cache() {
        let source = MemorySource::new(sample_tiff());
        let reader = BlockReader::new(source, 512, 16);
        let mut tiff = WindowedGeoTiff::open(reader).unwrap();

        let bbox = BBox::new(300_100.0, 6_199_800.0, 300_200.0, 6_199_900.0);
        let r: Raster<f32> = tiff.read_bbox(&bbox).unwrap();
        assert_eq!(r.shape(), (10, 10));
        assert_eq!(r.get(0, 0).unwrap(), (10 * 40 + 10) as f32);

        let outside = BBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(tiff.read_bbox::<f32>(&outside), Err(CloudError::BBoxOutside)));
    }
}
