//! Reference tables on platforms, revisit times, missions and band sets

/// A sensor platform and its typical altitude in kilometres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub name: &'static str,
    pub altitude_km: f64,
}

impl Platform {
    /// log10 of the altitude, floored so ground level maps to -2
    pub fn log_altitude(&self) -> f64 {
        (self.altitude_km + 0.01).max(0.01).log10()
    }

    /// Tick label: whole kilometres from 1 km up
    pub fn altitude_label(&self) -> String {
        if self.altitude_km >= 1.0 {
            format!("{} km", self.altitude_km as u64)
        } else {
            format!("{} km", self.altitude_km)
        }
    }
}

pub const PLATFORMS: [Platform; 6] = [
    Platform { name: "Ground surface", altitude_km: 0.0 },
    Platform { name: "Drones (10-120 m)", altitude_km: 0.1 },
    Platform { name: "Aircraft (1-10 km)", altitude_km: 3.0 },
    Platform { name: "High-altitude aircraft (15-20 km)", altitude_km: 20.0 },
    Platform { name: "Low Earth orbit satellites (400-1000 km)", altitude_km: 400.0 },
    Platform { name: "Geostationary satellites (36,000 km)", altitude_km: 36000.0 },
];

/// Days between passes over the same place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Revisit {
    pub satellite: &'static str,
    pub days: f64,
    pub label: &'static str,
}

const REVISITS: [Revisit; 6] = [
    Revisit { satellite: "GOES", days: 0.042, label: "Hourly" },
    Revisit { satellite: "MODIS (Terra/Aqua)", days: 1.0, label: "Daily" },
    Revisit { satellite: "Sentinel-2 (A+B)", days: 5.0, label: "Every 5 days" },
    Revisit { satellite: "Landsat-8", days: 16.0, label: "Every 16 days" },
    Revisit { satellite: "Landsat-7", days: 16.0, label: "Every 16 days" },
    Revisit { satellite: "WorldView-4", days: 4.5, label: "Variable ~4.5 days" },
];

/// Revisit table, most frequent first (stable for ties)
pub fn revisits_sorted() -> Vec<Revisit> {
    let mut v = REVISITS.to_vec();
    v.sort_by(|a, b| a.days.total_cmp(&b.days));
    v
}

/// Earth-observation mission summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mission {
    pub name: &'static str,
    pub agency: &'static str,
    pub period: &'static str,
    pub spatial: &'static str,
    pub temporal: &'static str,
    pub kind: &'static str,
    pub applications: &'static str,
}

pub const MISSIONS: [Mission; 5] = [
    Mission {
        name: "Landsat",
        agency: "NASA/USGS",
        period: "1972-present",
        spatial: "30m (15m pan)",
        temporal: "16 days",
        kind: "Multispectral",
        applications: "Long-term land monitoring",
    },
    Mission {
        name: "Sentinel-2",
        agency: "ESA",
        period: "2015-present",
        spatial: "10m, 20m, 60m",
        temporal: "5 days (A+B)",
        kind: "Multispectral",
        applications: "Vegetation, soils and coastal waters",
    },
    Mission {
        name: "MODIS",
        agency: "NASA",
        period: "1999-present",
        spatial: "250m, 500m, 1km",
        temporal: "Daily",
        kind: "Multispectral",
        applications: "Daily global coverage",
    },
    Mission {
        name: "Sentinel-1",
        agency: "ESA",
        period: "2014-present",
        spatial: "5-40m",
        temporal: "6 days (A+B)",
        kind: "Radar (SAR)",
        applications: "All-weather monitoring",
    },
    Mission {
        name: "SPOT",
        agency: "CNES",
        period: "1986-present",
        spatial: "1.5-6m",
        temporal: "1-5 days",
        kind: "Multispectral",
        applications: "Mapping and environmental monitoring",
    },
];

/// One Sentinel-2 MSI band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentinel2Band {
    pub name: &'static str,
    pub wavelength_nm: u32,
    pub resolution_m: u32,
    pub description: &'static str,
}

pub const SENTINEL2_BANDS: [Sentinel2Band; 13] = [
    Sentinel2Band { name: "B01", wavelength_nm: 443, resolution_m: 60, description: "Aerosols" },
    Sentinel2Band { name: "B02", wavelength_nm: 490, resolution_m: 10, description: "Blue" },
    Sentinel2Band { name: "B03", wavelength_nm: 560, resolution_m: 10, description: "Green" },
    Sentinel2Band { name: "B04", wavelength_nm: 665, resolution_m: 10, description: "Red" },
    Sentinel2Band { name: "B05", wavelength_nm: 705, resolution_m: 20, description: "Red Edge 1" },
    Sentinel2Band { name: "B06", wavelength_nm: 740, resolution_m: 20, description: "Red Edge 2" },
    Sentinel2Band { name: "B07", wavelength_nm: 783, resolution_m: 20, description: "Red Edge 3" },
    Sentinel2Band { name: "B08", wavelength_nm: 842, resolution_m: 10, description: "NIR" },
    Sentinel2Band { name: "B8A", wavelength_nm: 865, resolution_m: 20, description: "Red Edge 4" },
    Sentinel2Band { name: "B09", wavelength_nm: 940, resolution_m: 60, description: "Water vapour" },
    Sentinel2Band { name: "B10", wavelength_nm: 1375, resolution_m: 60, description: "Cirrus" },
    Sentinel2Band { name: "B11", wavelength_nm: 1610, resolution_m: 20, description: "SWIR 1" },
    Sentinel2Band { name: "B12", wavelength_nm: 2190, resolution_m: 20, description: "SWIR 2" },
];

/// Format rows as a left-aligned text table with a header rule
pub fn text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.to_vec());
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in rows {
        out.push('\n');
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}
