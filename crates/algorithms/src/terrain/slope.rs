//! Slope from DEMs

use super::horn::map_gradient;
use geomatica_core::raster::Raster;
use geomatica_core::{Algorithm, Error, Result};

/// Units for slope output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlopeUnits {
    /// Degrees (0-90)
    #[default]
    Degrees,
    /// Percent rise over run
    Percent,
    /// Radians (0-π/2)
    Radians,
}

/// Parameters for slope calculation
#[derive(Debug, Clone)]
pub struct SlopeParams {
    pub units: SlopeUnits,
    /// Vertical exaggeration applied to elevations
    pub z_factor: f64,
}

impl Default for SlopeParams {
    fn default() -> Self {
        Self {
            units: SlopeUnits::Degrees,
            z_factor: 1.0,
        }
    }
}

/// Slope algorithm
#[derive(Debug, Clone, Default)]
pub struct Slope;

impl Algorithm for Slope {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = SlopeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Slope"
    }

    fn description(&self) -> &'static str {
        "Steepest rate of elevation change per cell (Horn 3x3)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        slope(&input, params)
    }
}

/// Calculate slope from a DEM in projected (metric) coordinates.
///
/// Edge cells and cells next to no-data are NaN.
pub fn slope(dem: &Raster<f64>, params: SlopeParams) -> Result<Raster<f64>> {
    map_gradient(dem, params.z_factor, f64::NAN, |g| {
        let rad = g.slope_rad();
        match params.units {
            SlopeUnits::Degrees => rad.to_degrees(),
            SlopeUnits::Percent => rad.tan() * 100.0,
            SlopeUnits::Radians => rad,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geomatica_core::GeoTransform;

    fn ramp(cell: f64) -> Raster<f64> {
        // z rises one cell size per column: a 45 degree plane
        let mut dem = Raster::new(10, 10);
        dem.set_transform(GeoTransform::new(0.0, 10.0 * cell, cell, -cell));
        for row in 0..10 {
            for col in 0..10 {
                dem.set(row, col, col as f64 * cell).unwrap();
            }
        }
        dem
    }

    #[test]
    fn test_slope_flat() {
        let mut dem: Raster<f64> = Raster::filled(10, 10, 100.0);
        dem.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));

        let result = slope(&dem, SlopeParams::default()).unwrap();
        assert_relative_eq!(result.get(5, 5).unwrap(), 0.0, epsilon = 1e-9);
        assert!(result.get(0, 5).unwrap().is_nan());
    }

    #[test]
    fn ramp_is_45_degrees_at_any_cell_size() {
        for cell in [1.0, 30.0] {
            let result = slope(&ramp(cell), SlopeParams::default()).unwrap();
            assert_relative_eq!(result.get(4, 4).unwrap(), 45.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_slope_units() {
        let dem = ramp(1.0);
        let at = |units| {
            slope(&dem, SlopeParams { units, z_factor: 1.0 })
                .unwrap()
                .get(5, 5)
                .unwrap()
        };
        assert_relative_eq!(at(SlopeUnits::Radians), std::f64::consts::FRAC_PI_4, epsilon = 1e-9);
        assert_relative_eq!(at(SlopeUnits::Percent), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn nodata_neighbour_blanks_cell() {
        let mut dem = ramp(1.0);
        dem.set(4, 4, f64::NAN).unwrap();
        let result = slope(&dem, SlopeParams::default()).unwrap();
        assert!(result.get(5, 5).unwrap().is_nan());
        assert!(!result.get(6, 6).unwrap().is_nan());
    }

    #[test]
    fn rejects_zero_z_factor() {
        let dem = ramp(1.0);
        assert!(slope(&dem, SlopeParams { z_factor: 0.0, ..Default::default() }).is_err());
    }
}
