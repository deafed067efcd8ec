//! Synthetic elevation model: a noisy conical hill

use geomatica_core::raster::Raster;
use geomatica_core::{Error, GeoTransform, Result};
use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Shape of the synthetic hill
#[derive(Debug, Clone)]
pub struct SyntheticDemParams {
    /// Rows and columns
    pub size: usize,
    /// Elevation at the centre before noise
    pub peak: f64,
    /// Elevation lost per cell of distance from the centre
    pub falloff: f64,
    pub noise_sigma: f64,
    pub seed: u64,
}

impl Default for SyntheticDemParams {
    fn default() -> Self {
        Self {
            size: 100,
            peak: 100.0,
            falloff: 1.5,
            noise_sigma: 5.0,
            seed: 42,
        }
    }
}

/// `peak - falloff * distance_to_centre + N(0, sigma)`, negatives clamped to 0 (sea level).
///
/// Cells are 1 unit wide with the origin at the grid's top-left corner.
pub fn synthetic_dem(params: &SyntheticDemParams) -> Result<Raster<f64>> {
    if params.size == 0 {
        return Err(Error::InvalidDimensions {
            width: 0,
            height: 0,
        });
    }
    if !(params.noise_sigma.is_finite() && params.noise_sigma >= 0.0) {
        return Err(Error::InvalidParameter {
            name: "noise_sigma",
            value: params.noise_sigma.to_string(),
            reason: "must be finite and non-negative".into(),
        });
    }
    let noise = Normal::new(0.0, params.noise_sigma).map_err(|e| Error::InvalidParameter {
        name: "noise_sigma",
        value: params.noise_sigma.to_string(),
        reason: e.to_string(),
    })?;
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

    let center = (params.size / 2) as f64;
    let data = Array2::from_shape_fn((params.size, params.size), |(i, j)| {
        let dist = (i as f64 - center).hypot(j as f64 - center);
        let z = params.peak - dist * params.falloff + noise.sample(&mut rng);
        z.max(0.0)
    });

    let mut dem = Raster::from_array(data);
    dem.set_transform(GeoTransform::new(0.0, params.size as f64, 1.0, -1.0));
    Ok(dem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hill_is_seeded_and_non_negative() {
        let params = SyntheticDemParams::default();
        let a = synthetic_dem(&params).unwrap();
        let b = synthetic_dem(&params).unwrap();
        assert_eq!(a.shape(), (100, 100));
        assert_eq!(a.data(), b.data());

        let stats = a.statistics();
        assert!(stats.min.unwrap() >= 0.0);
        // Corners drop ~106 below the peak
        assert!(a.get(0, 0).unwrap() < 15.0);
        assert!(a.get(50, 50).unwrap() > 80.0);
    }

    #[test]
    fn noiseless_profile() {
        let params = SyntheticDemParams {
            size: 11,
            noise_sigma: 0.0,
            ..Default::default()
        };
        let dem = synthetic_dem(&params).unwrap();
        assert_eq!(dem.get(5, 5).unwrap(), 100.0);
        assert_eq!(dem.get(5, 9).unwrap(), 94.0);
    }

    #[test]
    fn rejects_bad_noise_sigma() {
        for sigma in [-5.0, f64::NAN, f64::INFINITY] {
            let params = SyntheticDemParams {
                noise_sigma: sigma,
                ..Default::default()
            };
            assert!(synthetic_dem(&params).is_err(), "sigma {} accepted", sigma);
        }
    }
}
