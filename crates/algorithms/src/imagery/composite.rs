//! Three-band colour composites
//!
//! Each band's digital numbers become reflectance through its own
//! `value * scale + offset`, are multiplied by a display gain, then clipped
//! to [0, 1].

use crate::maybe_rayon::*;
use geomatica_core::raster::{Raster, RasterElement};
use geomatica_core::{Error, Result};
use ndarray::{Array2, Array3};

/// Scale factor used by Sentinel-2 L2A digital numbers
pub const DEFAULT_SCALE: f64 = 0.0001;

/// Linear conversion from digital number to reflectance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScaling {
    pub scale: f64,
    pub offset: f64,
}

impl BandScaling {
    pub fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    pub fn apply(&self, dn: f64) -> f64 {
        dn * self.scale + self.offset
    }
}

impl Default for BandScaling {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE, 0.0)
    }
}

/// Parameters for composite rendering
#[derive(Debug, Clone)]
pub struct CompositeParams {
    /// Brightness multiplier applied after scaling
    pub gain: f64,
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self { gain: 3.5 }
    }
}

/// Named band combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    /// Sentinel-2 B04, B03, B02
    TrueColor,
    /// Sentinel-2 B08, B04, B03 (vegetation shows red)
    FalseColorNir,
    /// Landsat Collection 2 red, green, blue
    LandsatTrueColor,
}

impl CompositeKind {
    /// Asset keys mapped to the red, green and blue channels
    pub fn bands(&self) -> [&'static str; 3] {
        match self {
            CompositeKind::TrueColor => ["B04", "B03", "B02"],
            CompositeKind::FalseColorNir => ["B08", "B04", "B03"],
            CompositeKind::LandsatTrueColor => ["red", "green", "blue"],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CompositeKind::TrueColor => "Sentinel-2 RGB - true color",
            CompositeKind::FalseColorNir => "Sentinel-2 - NIR false color",
            CompositeKind::LandsatTrueColor => "Landsat RGB - true color",
        }
    }
}

/// A (rows, cols, 3) reflectance image with values in [0, 1]
#[derive(Debug, Clone)]
pub struct Composite {
    pub data: Array3<f32>,
    /// false where any band was no-data; those pixels hold 0
    pub valid: Array2<bool>,
}

impl Composite {
    pub fn rows(&self) -> usize {
        self.data.dim().0
    }

    pub fn cols(&self) -> usize {
        self.data.dim().1
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<[f32; 3]> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        Some([
            self.data[(row, col, 0)],
            self.data[(row, col, 1)],
            self.data[(row, col, 2)],
        ])
    }

    pub fn valid_fraction(&self) -> f64 {
        let n = self.valid.len();
        if n == 0 {
            return 0.0;
        }
        self.valid.iter().filter(|&&v| v).count() as f64 / n as f64
    }
}

/// Stack three bands into a display composite.
///
/// All bands must share a shape. A pixel is invalid when any band is no-data.
pub fn composite<T: RasterElement>(
    bands: [&Raster<T>; 3],
    scaling: [BandScaling; 3],
    params: &CompositeParams,
) -> Result<Composite> {
    if !(params.gain.is_finite() && params.gain > 0.0) {
        return Err(Error::InvalidParameter {
            name: "gain",
            value: params.gain.to_string(),
            reason: "must be positive".into(),
        });
    }

    let (rows, cols) = bands[0].shape();
    for band in &bands[1..] {
        if band.shape() != (rows, cols) {
            return Err(Error::SizeMismatch {
                er: rows,
                ec: cols,
                ar: band.rows(),
                ac: band.cols(),
            });
        }
        if let (Some(a), Some(b)) = (bands[0].crs(), band.crs()) {
            if a != b {
                return Err(Error::CrsMismatch(a.to_string(), b.to_string()));
            }
        }
    }

    let gain = params.gain;
    let pixels: Vec<Option<[f32; 3]>> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| {
                    let mut rgb = [0f32; 3];
                    for (ch, band) in bands.iter().enumerate() {
                        // SAFETY: all bands share (rows, cols)
                        let dn = unsafe { band.get_unchecked(row, col) };
                        if band.is_nodata(dn) {
                            return None;
                        }
                        let reflectance = scaling[ch].apply(dn.to_f64()?) * gain;
                        rgb[ch] = reflectance.clamp(0.0, 1.0) as f32;
                    }
                    Some(rgb)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let mut data = Array3::<f32>::zeros((rows, cols, 3));
    let mut valid = Array2::from_elem((rows, cols), false);
    for (i, px) in pixels.into_iter().enumerate() {
        if let Some(rgb) = px {
            let (row, col) = (i / cols, i % cols);
            valid[(row, col)] = true;
            for (ch, v) in rgb.into_iter().enumerate() {
                data[(row, col, ch)] = v;
            }
        }
    }

    Ok(Composite { data, valid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geomatica_core::CRS;

    fn band(values: Vec<u16>) -> Raster<u16> {
        let mut r = Raster::from_vec(values, 2, 2).unwrap();
        r.set_nodata(Some(0));
        r
    }

    #[test]
    fn scales_and_clips() {
        let red = band(vec![1000, 2000, 4000, 0]);
        let green = band(vec![500, 500, 500, 500]);
        let blue = band(vec![100, 100, 100, 100]);

        let c = composite(
            [&red, &green, &blue],
            [BandScaling::default(); 3],
            &CompositeParams::default(),
        )
        .unwrap();

        let px = c.pixel(0, 0).unwrap();
        assert_relative_eq!(px[0], 0.35, epsilon = 1e-6);
        assert_relative_eq!(px[1], 0.175, epsilon = 1e-6);
        // 4000 * 0.0001 * 3.5 = 1.4 clips to 1
        assert_eq!(c.pixel(1, 0).unwrap()[0], 1.0);
        assert!(!c.valid[(1, 1)]);
        assert_relative_eq!(c.valid_fraction(), 0.75);
    }

    #[test]
    fn bands_must_share_crs() {
        let red = band(vec![1000; 4]);
        let mut green = band(vec![1000; 4]);
        let blue = band(vec![1000; 4]);
        let mut utm = red.clone();
        utm.set_crs(Some(CRS::from_epsg(32719)));
        green.set_crs(Some(CRS::from_epsg(32718)));

        let err = composite([&utm, &green, &blue], [BandScaling::default(); 3], &CompositeParams::default())
            .unwrap_err();
        assert!(matches!(err, Error::CrsMismatch(..)));
        // A band without a CRS is taken to share the others'
        assert!(composite([&utm, &blue, &blue], [BandScaling::default(); 3], &CompositeParams::default()).is_ok());
    }

    #[test]
    fn landsat_offset_clips_at_zero() {
        // Collection 2 surface reflectance: 0.0000275 * dn - 0.2
        let scaling = BandScaling::new(0.0000275, -0.2);
        let dark = band(vec![7000, 7273, 8000, 9000]);
        let c = composite([&dark, &dark, &dark], [scaling; 3], &CompositeParams::default()).unwrap();
        assert_eq!(c.pixel(0, 0).unwrap()[0], 0.0);
        assert!(c.data.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn mismatched_bands_fail() {
        let a = band(vec![1, 2, 3, 4]);
        let b = Raster::<u16>::new(3, 3);
        assert!(composite([&a, &b, &a], [BandScaling::default(); 3], &CompositeParams::default()).is_err());
    }

    #[test]
    fn band_presets() {
        assert_eq!(CompositeKind::FalseColorNir.bands(), ["B08", "B04", "B03"]);
        assert_eq!(CompositeKind::LandsatTrueColor.bands()[0], "red");
    }
}
