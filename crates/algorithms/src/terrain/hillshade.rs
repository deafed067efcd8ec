//! Hillshade (shaded relief)

use super::horn::map_gradient;
use geomatica_core::raster::Raster;
use geomatica_core::{Algorithm, Error, Result};

/// Sun position and output scaling for hillshade
#[derive(Debug, Clone)]
pub struct HillshadeParams {
    /// Sun azimuth in degrees (0 = North, clockwise)
    pub azimuth: f64,
    /// Sun altitude in degrees above the horizon (0-90)
    pub altitude: f64,
    pub z_factor: f64,
    /// Output range: true = 0.0-1.0, false = 0-255
    pub normalized: bool,
}

impl Default for HillshadeParams {
    /// South-west sun, 25 degrees high, normalized output
    fn default() -> Self {
        Self {
            azimuth: 225.0,
            altitude: 25.0,
            z_factor: 1.0,
            normalized: true,
        }
    }
}

/// Hillshade algorithm
#[derive(Debug, Clone, Default)]
pub struct Hillshade;

impl Algorithm for Hillshade {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = HillshadeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Hillshade"
    }

    fn description(&self) -> &'static str {
        "Simulated illumination of the terrain from a sun position"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        hillshade(&input, params)
    }
}

/// Calculate hillshade from a DEM.
///
/// shade = cos(zenith) cos(slope) + sin(zenith) sin(slope) cos(azimuth - aspect),
/// clamped to [0, 1]. Edge and no-data cells are NaN.
pub fn hillshade(dem: &Raster<f64>, params: HillshadeParams) -> Result<Raster<f64>> {
    if !(0.0..=90.0).contains(&params.altitude) {
        return Err(Error::InvalidParameter {
            name: "altitude",
            value: params.altitude.to_string(),
            reason: "must be within 0-90 degrees".into(),
        });
    }

    let zenith = (90.0 - params.altitude).to_radians();
    let (sin_zenith, cos_zenith) = zenith.sin_cos();
    let azimuth = params.azimuth.to_radians();
    let scale = if params.normalized { 1.0 } else { 255.0 };

    map_gradient(dem, params.z_factor, f64::NAN, |g| {
        let slope = g.slope_rad();
        let shade = if g.is_flat() {
            cos_zenith
        } else {
            // Both angles are compass bearings, so their difference is frame-free
            cos_zenith * slope.cos() + sin_zenith * slope.sin() * (azimuth - g.bearing_rad()).cos()
        };
        let shade = shade.clamp(0.0, 1.0) * scale;
        if params.normalized {
            shade
        } else {
            shade.round()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geomatica_core::GeoTransform;

    fn facing(north: bool) -> Raster<f64> {
        let mut dem: Raster<f64> = Raster::new(8, 8);
        dem.set_transform(GeoTransform::new(0.0, 8.0, 1.0, -1.0));
        for row in 0..8 {
            for col in 0..8 {
                let z = if north { row as f64 } else { -(row as f64) };
                dem.set(row, col, z).unwrap();
            }
        }
        dem
    }

    #[test]
    fn flat_surface_gets_cos_zenith() {
        let mut dem: Raster<f64> = Raster::filled(8, 8, 50.0);
        dem.set_transform(GeoTransform::new(0.0, 8.0, 1.0, -1.0));
        let params = HillshadeParams { altitude: 45.0, ..Default::default() };
        let hs = hillshade(&dem, params).unwrap();
        assert_relative_eq!(hs.get(4, 4).unwrap(), 45f64.to_radians().sin(), epsilon = 1e-9);
    }

    #[test]
    fn slope_facing_the_sun_is_brighter() {
        let params = HillshadeParams { azimuth: 0.0, altitude: 30.0, ..Default::default() };
        let lit = hillshade(&facing(true), params.clone()).unwrap();
        let dark = hillshade(&facing(false), params).unwrap();
        assert!(lit.get(4, 4).unwrap() > dark.get(4, 4).unwrap());
    }

    #[test]
    fn byte_range_output() {
        let params = HillshadeParams { normalized: false, ..Default::default() };
        let hs = hillshade(&facing(true), params).unwrap();
        let v = hs.get(4, 4).unwrap();
        assert!((0.0..=255.0).contains(&v));
        assert_eq!(v, v.round());
        assert!(hs.get(0, 0).unwrap().is_nan());
    }

    #[test]
    fn rejects_bad_altitude() {
        let params = HillshadeParams { altitude: 120.0, ..Default::default() };
        assert!(hillshade(&facing(true), params).is_err());
    }
}
