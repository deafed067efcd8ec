//! Illustrations of spatial, spectral and radiometric resolution

use geomatica_core::{Error, Result};
use ndarray::{s, Array2, Array3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// 100x100 RGB scene: a red square with a smaller green square inside
pub fn two_squares_scene() -> Array3<f64> {
    let mut img = Array3::<f64>::zeros((100, 100, 3));
    img.slice_mut(s![30..70, 30..70, 0]).fill(1.0);
    img.slice_mut(s![40..60, 40..60, 1]).fill(1.0);
    img
}

/// Coarsen an image by averaging `factor` x `factor` blocks, then blow it
/// back up to the original size so the blockiness is visible.
///
/// Blocks at the right and bottom edges may be partial.
pub fn degrade(img: &Array3<f64>, factor: usize) -> Result<Array3<f64>> {
    if factor == 0 {
        return Err(Error::InvalidParameter {
            name: "factor",
            value: factor.to_string(),
            reason: "must be at least 1".into(),
        });
    }
    let (rows, cols, bands) = img.dim();
    if factor == 1 {
        return Ok(img.clone());
    }

    let mut out = Array3::<f64>::zeros((rows, cols, bands));
    for r0 in (0..rows).step_by(factor) {
        for c0 in (0..cols).step_by(factor) {
            let (r1, c1) = ((r0 + factor).min(rows), (c0 + factor).min(cols));
            for b in 0..bands {
                let mean = img
                    .slice(s![r0..r1, c0..c1, b])
                    .mean()
                    .unwrap_or(0.0);
                out.slice_mut(s![r0..r1, c0..c1, b]).fill(mean);
            }
        }
    }
    Ok(out)
}

/// Horizontal 0-1 ramp of `size` x `size` pixels
pub fn gradient_image(size: usize) -> Array2<f64> {
    let denom = size.saturating_sub(1).max(1) as f64;
    Array2::from_shape_fn((size, size), |(_, col)| col as f64 / denom)
}

/// Snap a value in [0, 1] down to one of `2^bits` evenly spaced levels
pub fn quantize(value: f64, bits: u32) -> f64 {
    let top = ((1u64 << bits.clamp(1, 32)) - 1) as f64;
    // Nudge values sitting on a level boundary up to that level
    ((value * top + 1e-9).floor() / top).min(1.0)
}

pub fn quantize_image(img: &Array2<f64>, bits: u32) -> Array2<f64> {
    img.mapv(|v| quantize(v, bits))
}

/// A wavelength interval in micrometres
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralBand {
    pub name: String,
    pub start: f64,
    pub end: f64,
}

impl SpectralBand {
    pub fn new(name: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    pub fn contains(&self, wavelength: f64) -> bool {
        (self.start..=self.end).contains(&wavelength)
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// One broad panchromatic band, 0.5-0.9 µm
pub fn panchromatic_band() -> SpectralBand {
    SpectralBand::new("Panchromatic", 0.5, 0.9)
}

/// The seven reflective bands of Landsat-8 OLI
pub fn landsat8_oli_bands() -> Vec<SpectralBand> {
    [
        ("Coastal/Aerosol", 0.43, 0.45),
        ("Blue", 0.45, 0.51),
        ("Green", 0.53, 0.59),
        ("Red", 0.64, 0.67),
        ("NIR", 0.85, 0.88),
        ("SWIR1", 1.57, 1.65),
        ("SWIR2", 2.11, 2.29),
    ]
    .into_iter()
    .map(|(name, start, end)| SpectralBand::new(name, start, end))
    .collect()
}

/// Up to `count` contiguous 15 nm bands every 20 nm from 0.4 µm, ending by 2.5 µm
pub fn hyperspectral_bands(count: usize) -> Vec<SpectralBand> {
    (0..count)
        .map(|i| {
            let start = 0.4 + i as f64 * 0.02;
            SpectralBand::new(format!("HS{:03}", i + 1), start, start + 0.015)
        })
        .take_while(|b| b.end <= 2.5)
        .collect()
}

/// Reflectance sampled along wavelength
#[derive(Debug, Clone)]
pub struct SpectralCurve {
    pub wavelengths: Vec<f64>,
    pub reflectance: Vec<f64>,
}

impl SpectralCurve {
    /// Stylised vegetation signature over 0.4-2.5 µm with Gaussian noise
    pub fn vegetation(samples: usize, noise_sigma: f64, seed: u64) -> Result<Self> {
        if !(noise_sigma.is_finite() && noise_sigma >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "noise_sigma",
                value: noise_sigma.to_string(),
                reason: "must be finite and non-negative".into(),
            });
        }
        let noise = Normal::new(0.0, noise_sigma).map_err(|e| Error::InvalidParameter {
            name: "noise_sigma",
            value: noise_sigma.to_string(),
            reason: e.to_string(),
        })?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let step = if samples > 1 { 2.1 / (samples - 1) as f64 } else { 0.0 };
        let wavelengths: Vec<f64> = (0..samples).map(|i| 0.4 + i as f64 * step).collect();
        let reflectance = wavelengths
            .iter()
            .map(|&w| {
                let base = match w {
                    w if w < 0.5 => 0.1,
                    w if w < 0.6 => 0.2,
                    w if w < 0.7 => 0.1,
                    w if w < 1.3 => 0.5,
                    w if w < 1.9 => 0.3,
                    w if w < 2.5 => 0.2,
                    _ => 0.0,
                };
                base + noise.sample(&mut rng)
            })
            .collect();

        Ok(Self {
            wavelengths,
            reflectance,
        })
    }

    /// Mean reflectance inside `band`, `None` if no sample falls in it
    pub fn band_mean(&self, band: &SpectralBand) -> Option<f64> {
        let (sum, n) = self
            .wavelengths
            .iter()
            .zip(&self.reflectance)
            .filter(|(w, _)| band.contains(**w))
            .fold((0.0, 0usize), |(s, n), (_, r)| (s + r, n + 1));
        (n > 0).then(|| sum / n as f64)
    }

    /// What a sensor with `bands` records: one mean value per band
    pub fn resample(&self, bands: &[SpectralBand]) -> Vec<(SpectralBand, f64)> {
        bands
            .iter()
            .filter_map(|b| self.band_mean(b).map(|v| (b.clone(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn degrade_keeps_mean_and_shape() {
        let img = two_squares_scene();
        for factor in [1, 5, 10] {
            let out = degrade(&img, factor).unwrap();
            assert_eq!(out.dim(), (100, 100, 3));
            assert_relative_eq!(out.sum(), img.sum(), epsilon = 1e-6);
        }
        // A 20x20 block straddling the red square edge is partially red
        let coarse = degrade(&img, 20).unwrap();
        assert_relative_eq!(coarse[(20, 20, 0)], 0.25, epsilon = 1e-12);
        assert!(degrade(&img, 0).is_err());
    }

    #[test]
    fn quantization_levels() {
        let img = gradient_image(256);
        for bits in [2u32, 4, 8] {
            let q = quantize_image(&img, bits);
            let mut levels: Vec<u64> = q.iter().map(|v| (v * 1e6).round() as u64).collect();
            levels.sort_unstable();
            levels.dedup();
            assert_eq!(levels.len(), 1 << bits);
        }
        assert_eq!(quantize(1.0, 2), 1.0);
        assert_relative_eq!(quantize(0.5, 2), 1.0 / 3.0);
    }

    #[test]
    fn band_sets() {
        assert_eq!(landsat8_oli_bands().len(), 7);
        let hs = hyperspectral_bands(100);
        assert_eq!(hs.len(), 100);
        assert_relative_eq!(hs[99].end, 0.4 + 99.0 * 0.02 + 0.015, epsilon = 1e-12);
        assert!(hyperspectral_bands(200).len() < 200);
    }

    #[test]
    fn vegetation_curve_is_reproducible() {
        let a = SpectralCurve::vegetation(1000, 0.02, 42).unwrap();
        let b = SpectralCurve::vegetation(1000, 0.02, 42).unwrap();
        assert_eq!(a.reflectance, b.reflectance);
        assert_relative_eq!(a.wavelengths[999], 2.5, epsilon = 1e-12);

        // NIR plateau is much brighter than red
        let bands = landsat8_oli_bands();
        let nir = a.band_mean(&bands[4]).unwrap();
        let red = a.band_mean(&bands[3]).unwrap();
        assert!(nir > red + 0.3);
    }

    #[test]
    fn vegetation_curve_rejects_bad_sigma() {
        assert!(SpectralCurve::vegetation(10, -1.0, 1).is_err());
        assert!(SpectralCurve::vegetation(10, f64::NAN, 1).is_err());
        assert!(SpectralCurve::vegetation(10, 0.0, 1).is_ok());
    }
}
