//! Horn (1981) 3x3 finite-difference gradient shared by the terrain kernels
//!
//! ```text
//! a b c
//! d e f
//! g h i
//! ```
//!
//! dz/dx = ((c + 2f + i) - (a + 2d + g)) / (8 * cellsize)
//! dz/dy = ((g + 2h + i) - (a + 2b + c)) / (8 * cellsize)
//!
//! `dz_dy` grows with the row index, i.e. towards the south on a north-up grid.

use crate::maybe_rayon::*;
use geomatica_core::raster::Raster;
use geomatica_core::{Error, Result};
use ndarray::Array2;

/// Surface gradient at one cell, in elevation units per ground unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Gradient {
    pub dz_dx: f64,
    pub dz_dy: f64,
}

impl Gradient {
    const FLAT: f64 = 1e-10;

    pub fn slope_rad(&self) -> f64 {
        self.dz_dx.hypot(self.dz_dy).atan()
    }

    pub fn is_flat(&self) -> bool {
        self.dz_dx.abs() < Self::FLAT && self.dz_dy.abs() < Self::FLAT
    }

    /// Downslope direction as a compass bearing in radians (0 = north, clockwise)
    pub fn bearing_rad(&self) -> f64 {
        // downslope: east = -dz_dx, north = +dz_dy (rows run south)
        (-self.dz_dx).atan2(self.dz_dy).rem_euclid(std::f64::consts::TAU)
    }
}

/// Horn gradient at (row, col), `None` on edges or next to no-data
fn gradient_at(dem: &Raster<f64>, row: usize, col: usize, eight_cell: f64) -> Option<Gradient> {
    let (rows, cols) = dem.shape();
    if row == 0 || col == 0 || row + 1 >= rows || col + 1 >= cols {
        return None;
    }

    // SAFETY: the edge check keeps every neighbour inside the grid
    let z = |r: usize, c: usize| unsafe { dem.get_unchecked(r, c) };
    let (a, b, c) = (z(row - 1, col - 1), z(row - 1, col), z(row - 1, col + 1));
    let (d, e, f) = (z(row, col - 1), z(row, col), z(row, col + 1));
    let (g, h, i) = (z(row + 1, col - 1), z(row + 1, col), z(row + 1, col + 1));

    if [a, b, c, d, e, f, g, h, i].iter().any(|&v| dem.is_nodata(v)) {
        return None;
    }

    Some(Gradient {
        dz_dx: ((c + 2.0 * f + i) - (a + 2.0 * d + g)) / eight_cell,
        dz_dy: ((g + 2.0 * h + i) - (a + 2.0 * b + c)) / eight_cell,
    })
}

/// Evaluate `f` on the gradient of every cell, row-parallel.
///
/// Cells without a full valid neighbourhood get `fill`, which also becomes
/// the output no-data value.
pub(crate) fn map_gradient<F>(dem: &Raster<f64>, z_factor: f64, fill: f64, f: F) -> Result<Raster<f64>>
where
    F: Fn(Gradient) -> f64 + Sync,
{
    if !(z_factor > 0.0) {
        return Err(Error::InvalidParameter {
            name: "z_factor",
            value: z_factor.to_string(),
            reason: "must be positive".into(),
        });
    }

    let (rows, cols) = dem.shape();
    // Vertical exaggeration is the same as shrinking the horizontal spacing
    let eight_cell = 8.0 * dem.cell_size() / z_factor;

    let values: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| gradient_at(dem, row, col, eight_cell).map_or(fill, &f))
                .collect::<Vec<_>>()
        })
        .collect();

    let mut output = dem.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(fill));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), values).map_err(|e| Error::Other(e.to_string()))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geomatica_core::GeoTransform;

    #[test]
    fn plane_gradient() {
        // z = 2 * col + 3 * row on 10 m cells
        let mut dem: Raster<f64> = Raster::new(5, 5);
        dem.set_transform(GeoTransform::new(0.0, 50.0, 10.0, -10.0));
        for r in 0..5 {
            for c in 0..5 {
                dem.set(r, c, (2 * c + 3 * r) as f64).unwrap();
            }
        }
        let g = gradient_at(&dem, 2, 2, 80.0).unwrap();
        assert_relative_eq!(g.dz_dx, 0.2, epsilon = 1e-12);
        assert_relative_eq!(g.dz_dy, 0.3, epsilon = 1e-12);
        assert!(gradient_at(&dem, 0, 2, 80.0).is_none());
    }

    #[test]
    fn bearings() {
        // Surface falling to the east
        let east = Gradient { dz_dx: -1.0, dz_dy: 0.0 };
        assert_relative_eq!(east.bearing_rad().to_degrees(), 90.0, epsilon = 1e-9);
        // Rising towards the south means falling to the north
        let north = Gradient { dz_dx: 0.0, dz_dy: 1.0 };
        assert_relative_eq!(north.bearing_rad().to_degrees(), 0.0, epsilon = 1e-9);
        let west = Gradient { dz_dx: 1.0, dz_dy: 0.0 };
        assert_relative_eq!(west.bearing_rad().to_degrees(), 270.0, epsilon = 1e-9);
    }
}
