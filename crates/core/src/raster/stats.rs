//! Summary statistics over valid cells

use crate::raster::{Raster, RasterElement};
use std::cmp::Ordering;
use std::fmt;

/// Basic statistics for a raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    /// Population standard deviation
    pub std_dev: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

impl<T: fmt::Display> fmt::Display for RasterStatistics<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<String>| v.unwrap_or_else(|| "n/a".to_string());
        writeln!(f, "Minimum value: {}", show(self.min.as_ref().map(|v| v.to_string())))?;
        writeln!(f, "Maximum value: {}", show(self.max.as_ref().map(|v| v.to_string())))?;
        writeln!(f, "Mean: {}", show(self.mean.map(|v| format!("{:.4}", v))))?;
        write!(f, "Standard deviation: {}", show(self.std_dev.map(|v| format!("{:.4}", v))))
    }
}

/// Cell count of one value in a categorical raster
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCount<T> {
    pub value: T,
    pub count: usize,
    /// Share of valid cells, 0-100
    pub percent: f64,
}

impl<T: RasterElement> Raster<T> {
    /// Calculate min, max, mean and standard deviation of valid cells
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut nodata_count = 0usize;

        // Welford's running mean/variance
        let mut count = 0usize;
        let mut mean = 0.0f64;
        let mut m2 = 0.0f64;

        for &value in self.data().iter() {
            if self.is_nodata(value) {
                nodata_count += 1;
                continue;
            }

            if min.map_or(true, |m| value < m) {
                min = Some(value);
            }
            if max.map_or(true, |m| value > m) {
                max = Some(value);
            }

            if let Some(v) = value.to_f64() {
                count += 1;
                let delta = v - mean;
                mean += delta / count as f64;
                m2 += delta * (v - mean);
            }
        }

        let (mean, std_dev) = if count > 0 {
            (Some(mean), Some((m2 / count as f64).sqrt()))
        } else {
            (None, None)
        };

        RasterStatistics {
            min,
            max,
            mean,
            std_dev,
            valid_count: count,
            nodata_count,
        }
    }

    /// Cell counts per distinct valid value, ascending by value
    pub fn class_counts(&self) -> Vec<ClassCount<T>> {
        let mut values: Vec<T> = self
            .data()
            .iter()
            .copied()
            .filter(|v| !self.is_nodata(*v))
            .collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let total = values.len();
        let mut classes: Vec<ClassCount<T>> = Vec::new();
        for value in values {
            match classes.last_mut() {
                Some(last) if last.value == value => last.count += 1,
                _ => classes.push(ClassCount {
                    value,
                    count: 1,
                    percent: 0.0,
                }),
            }
        }

        for class in &mut classes {
            class.percent = class.count as f64 * 100.0 / total as f64;
        }
        classes
    }

    /// Distinct valid values, ascending
    pub fn unique_values(&self) -> Vec<T> {
        self.class_counts().into_iter().map(|c| c.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_raster_statistics() {
        let mut raster: Raster<f32> = Raster::new(10, 10);
        for i in 0..10 {
            for j in 0..10 {
                raster.set(i, j, (i * 10 + j) as f32).unwrap();
            }
        }

        let stats = raster.statistics();
        assert_eq!(stats.min, Some(0.0));
        assert_eq!(stats.max, Some(99.0));
        assert_eq!(stats.valid_count, 100);
        assert_relative_eq!(stats.mean.unwrap(), 49.5, epsilon = 1e-9);
        // sqrt((n^2 - 1) / 12) for 0..n
        assert_relative_eq!(stats.std_dev.unwrap(), (9999.0f64 / 12.0).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn nodata_cells_are_skipped() {
        let mut raster = Raster::from_vec(vec![0u8, 3, 3, 11, 0, 21], 2, 3).unwrap();
        raster.set_nodata(Some(0));

        let stats = raster.statistics();
        assert_eq!(stats.min, Some(3));
        assert_eq!(stats.max, Some(21));
        assert_eq!(stats.valid_count, 4);
        assert_eq!(stats.nodata_count, 2);
    }

    #[test]
    fn all_nodata_has_no_mean() {
        let raster: Raster<f64> = Raster::filled(3, 3, f64::NAN);
        let stats = raster.statistics();
        assert!(stats.min.is_none());
        assert!(stats.mean.is_none());
        assert_eq!(stats.nodata_count, 9);
    }

    #[test]
    fn class_counts_and_percentages() {
        let raster = Raster::from_vec(vec![3u8, 3, 11, 21, 3, 11, 3, 21], 2, 4).unwrap();
        let classes = raster.class_counts();

        assert_eq!(raster.unique_values(), vec![3, 11, 21]);
        assert_eq!(classes[0].count, 4);
        assert_relative_eq!(classes[0].percent, 50.0);
        assert_relative_eq!(classes.iter().map(|c| c.percent).sum::<f64>(), 100.0);
    }
}
