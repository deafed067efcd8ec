//! Aspect (downslope direction) from DEMs

use super::horn::map_gradient;
use geomatica_core::raster::Raster;
use geomatica_core::{Algorithm, Error, Result};

/// Value assigned to flat cells, edges and no-data
pub const FLAT_ASPECT: f64 = -1.0;

/// Output format for aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectOutput {
    /// Degrees (0-360, 0=North, clockwise)
    #[default]
    Degrees,
    /// Radians (0-2π)
    Radians,
}

/// Aspect algorithm
#[derive(Debug, Clone, Default)]
pub struct Aspect;

impl Algorithm for Aspect {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = AspectOutput;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Aspect"
    }

    fn description(&self) -> &'static str {
        "Compass direction of steepest descent per cell (Horn 3x3)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        aspect(&input, params)
    }
}

/// Calculate aspect as a compass bearing: 0 north, 90 east, 180 south, 270 west.
///
/// Flat cells get [`FLAT_ASPECT`].
pub fn aspect(dem: &Raster<f64>, output: AspectOutput) -> Result<Raster<f64>> {
    map_gradient(dem, 1.0, FLAT_ASPECT, |g| {
        if g.is_flat() {
            return FLAT_ASPECT;
        }
        match output {
            AspectOutput::Degrees => g.bearing_rad().to_degrees(),
            AspectOutput::Radians => g.bearing_rad(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geomatica_core::GeoTransform;

    fn dem_from(f: impl Fn(usize, usize) -> f64) -> Raster<f64> {
        let mut dem: Raster<f64> = Raster::new(10, 10);
        dem.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));
        for row in 0..10 {
            for col in 0..10 {
                dem.set(row, col, f(row, col)).unwrap();
            }
        }
        dem
    }

    #[test]
    fn north_facing() {
        // Higher in the south
        let result = aspect(&dem_from(|r, _| r as f64), AspectOutput::Degrees).unwrap();
        assert_relative_eq!(result.get(5, 5).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn east_and_south_west_facing() {
        let east = aspect(&dem_from(|_, c| -(c as f64)), AspectOutput::Degrees).unwrap();
        assert_relative_eq!(east.get(5, 5).unwrap(), 90.0, epsilon = 1e-9);

        // Higher to the north-east
        let sw = aspect(&dem_from(|r, c| c as f64 - r as f64), AspectOutput::Degrees).unwrap();
        assert_relative_eq!(sw.get(5, 5).unwrap(), 225.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_is_marked() {
        let result = aspect(&dem_from(|_, _| 100.0), AspectOutput::Radians).unwrap();
        assert_eq!(result.get(5, 5).unwrap(), FLAT_ASPECT);
        assert_eq!(result.nodata(), Some(FLAT_ASPECT));
    }
}
