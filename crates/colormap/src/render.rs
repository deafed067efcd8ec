//! Raster-to-RGBA rendering using color schemes.

use crate::scheme::{evaluate, ColorScheme, Rgb};
use geomatica_core::raster::{Raster, RasterElement};
use image::RgbaImage;
use ndarray::{ArrayView2, ArrayView3};

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Parameters for colormap rendering.
#[derive(Debug, Clone)]
pub struct ColormapParams {
    pub scheme: ColorScheme,
    /// Value mapped to the start of the scheme; lower values are clamped.
    pub min: f64,
    /// Value mapped to the end of the scheme; higher values are clamped.
    pub max: f64,
    /// RGBA for no-data and NaN cells. Default: fully transparent.
    pub nodata_color: [u8; 4],
}

impl ColormapParams {
    /// Params over [0, 1]; see [`auto_params`] to take the range from data.
    pub fn new(scheme: ColorScheme) -> Self {
        Self::with_range(scheme, 0.0, 1.0)
    }

    pub fn with_range(scheme: ColorScheme, min: f64, max: f64) -> Self {
        Self {
            scheme,
            min,
            max,
            nodata_color: TRANSPARENT,
        }
    }
}

/// Params spanning the finite valid values of `raster`.
///
/// All no-data gives [0, 1]; a constant raster gets a unit-wide range.
pub fn auto_params<T: RasterElement>(raster: &Raster<T>, scheme: ColorScheme) -> ColormapParams {
    let (min, max) = raster
        .data()
        .iter()
        .filter(|v| !raster.is_nodata(**v))
        .filter_map(|v| v.to_f64())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !(min.is_finite() && max.is_finite()) {
        ColormapParams::with_range(scheme, 0.0, 1.0)
    } else if (max - min).abs() < f64::EPSILON {
        ColormapParams::with_range(scheme, min, min + 1.0)
    } else {
        ColormapParams::with_range(scheme, min, max)
    }
}

/// Convert a raster to a row-major RGBA buffer of `rows * cols * 4` bytes.
pub fn raster_to_rgba<T: RasterElement>(raster: &Raster<T>, params: &ColormapParams) -> Vec<u8> {
    let range = params.max - params.min;
    let inv_range = if range.abs() > f64::EPSILON { 1.0 / range } else { 1.0 };

    let mut rgba = vec![0u8; raster.len() * 4];
    for (px, val) in rgba.chunks_exact_mut(4).zip(raster.data().iter()) {
        let color = match val.to_f64() {
            Some(v) if v.is_finite() && !raster.is_nodata(*val) => {
                evaluate(params.scheme, (v - params.min) * inv_range).rgba()
            }
            _ => params.nodata_color,
        };
        px.copy_from_slice(&color);
    }
    rgba
}

/// Render a categorical raster through a value-to-color lookup.
///
/// Values the lookup does not know, and no-data, are transparent.
pub fn categorical_to_rgba<T, F>(raster: &Raster<T>, lookup: F) -> Vec<u8>
where
    T: RasterElement,
    F: Fn(T) -> Option<Rgb>,
{
    let mut rgba = vec![0u8; raster.len() * 4];
    for (px, &val) in rgba.chunks_exact_mut(4).zip(raster.data().iter()) {
        let color = if raster.is_nodata(val) {
            None
        } else {
            lookup(val)
        };
        px.copy_from_slice(&color.map_or(TRANSPARENT, Rgb::rgba));
    }
    rgba
}

/// Convert a (rows, cols, 3) image with values in [0, 1] to RGBA.
///
/// Pixels where `valid` is false become transparent.
pub fn composite_to_rgba(data: ArrayView3<'_, f32>, valid: Option<ArrayView2<'_, bool>>) -> Vec<u8> {
    let (rows, cols, _) = data.dim();
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;

    let mut rgba = Vec::with_capacity(rows * cols * 4);
    for row in 0..rows {
        for col in 0..cols {
            if valid.as_ref().map_or(false, |m| !m[[row, col]]) {
                rgba.extend_from_slice(&TRANSPARENT);
                continue;
            }
            rgba.extend_from_slice(&[
                to_u8(data[[row, col, 0]]),
                to_u8(data[[row, col, 1]]),
                to_u8(data[[row, col, 2]]),
                255,
            ]);
        }
    }
    rgba
}

/// Wrap an RGBA buffer as an image; `None` when the length does not match.
pub fn rgba_image(rows: usize, cols: usize, rgba: Vec<u8>) -> Option<RgbaImage> {
    RgbaImage::from_raw(u32::try_from(cols).ok()?, u32::try_from(rows).ok()?, rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    #[test]
    fn raster_to_rgba_basic() {
        let mut r = Raster::<f64>::from_vec(vec![0.0, 0.5, 1.0, f64::NAN], 2, 2).unwrap();
        r.set_nodata(Some(f64::NAN));

        let params = ColormapParams::with_range(ColorScheme::Grayscale, 0.0, 1.0);
        let rgba = raster_to_rgba(&r, &params);

        assert_eq!(rgba.len(), 16);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
        assert_eq!(&rgba[4..8], &[128, 128, 128, 255]);
        assert_eq!(&rgba[8..12], &[255, 255, 255, 255]);
        assert_eq!(&rgba[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn auto_params_range() {
        let r = Raster::<f64>::from_vec(vec![10.0, 50.0, 100.0], 1, 3).unwrap();
        let params = auto_params(&r, ColorScheme::Terrain);
        assert_eq!((params.min, params.max), (10.0, 100.0));
    }

    #[test]
    fn auto_params_degenerate() {
        let nan = Raster::<f64>::filled(1, 2, f64::NAN);
        let params = auto_params(&nan, ColorScheme::Terrain);
        assert_eq!((params.min, params.max), (0.0, 1.0));

        let flat = Raster::<f64>::filled(2, 2, 42.0);
        let params = auto_params(&flat, ColorScheme::Terrain);
        assert_eq!((params.min, params.max), (42.0, 43.0));
    }

    #[test]
    fn categorical_lookup() {
        let mut r = Raster::<u8>::from_vec(vec![1, 2, 0], 1, 3).unwrap();
        r.set_nodata(Some(0));
        let rgba = categorical_to_rgba(&r, |v| (v == 1).then_some(Rgb::WHITE));
        assert_eq!(&rgba[0..4], &[255, 255, 255, 255]);
        assert_eq!(&rgba[4..8], &TRANSPARENT);
        assert_eq!(&rgba[8..12], &TRANSPARENT);
    }

    #[test]
    fn composite_masks_invalid() {
        let data = Array3::from_elem((1, 2, 3), 0.5f32);
        let valid = Array2::from_shape_vec((1, 2), vec![true, false]).unwrap();
        let rgba = composite_to_rgba(data.view(), Some(valid.view()));
        assert_eq!(&rgba[0..4], &[128, 128, 128, 255]);
        assert_eq!(&rgba[4..8], &TRANSPARENT);

        let image = rgba_image(1, 2, rgba).unwrap();
        assert_eq!(image.dimensions(), (2, 1));
    }
}
