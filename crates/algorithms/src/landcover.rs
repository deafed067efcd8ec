//! MapBiomas Chile level-2 land-cover legend and class summaries

use geomatica_core::raster::{Raster, RasterElement};

/// One legend entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandCoverClass {
    pub code: u16,
    /// Hierarchical level-2 identifier, e.g. "2.3"
    pub level: &'static str,
    pub name: &'static str,
}

pub const LEGEND: [LandCoverClass; 14] = [
    LandCoverClass { code: 3, level: "1.1", name: "Forest" },
    LandCoverClass { code: 11, level: "2.1", name: "Wetland" },
    LandCoverClass { code: 12, level: "2.2", name: "Grassland" },
    LandCoverClass { code: 66, level: "2.3", name: "Shrubland" },
    LandCoverClass { code: 29, level: "2.4", name: "Rocky outcrop" },
    LandCoverClass { code: 9, level: "3.1", name: "Forest plantation" },
    LandCoverClass { code: 21, level: "3.2", name: "Mosaic of agriculture and pasture" },
    LandCoverClass { code: 24, level: "4.1", name: "Infrastructure" },
    LandCoverClass { code: 23, level: "4.2", name: "Sand, beaches and dunes" },
    LandCoverClass { code: 61, level: "4.3", name: "Salt flat" },
    LandCoverClass { code: 25, level: "4.4", name: "Other non-vegetated area" },
    LandCoverClass { code: 33, level: "5.1", name: "River, lake or ocean" },
    LandCoverClass { code: 34, level: "5.2", name: "Ice and snow" },
    LandCoverClass { code: 27, level: "-", name: "Not observed" },
];

pub fn lookup(code: u16) -> Option<&'static LandCoverClass> {
    LEGEND.iter().find(|c| c.code == code)
}

/// Share of one class in a land-cover raster
#[derive(Debug, Clone, PartialEq)]
pub struct ClassShare {
    pub code: i64,
    pub name: &'static str,
    pub count: usize,
    pub percent: f64,
}

/// Cell count and percentage of each class present, ascending by code.
///
/// Codes missing from the legend are reported as "Unknown".
pub fn class_shares<T: RasterElement>(raster: &Raster<T>) -> Vec<ClassShare> {
    raster
        .class_counts()
        .into_iter()
        .filter_map(|c| {
            let code = c.value.to_f64()? as i64;
            let name = u16::try_from(code)
                .ok()
                .and_then(lookup)
                .map_or("Unknown", |l| l.name);
            Some(ClassShare {
                code,
                name,
                count: c.count,
                percent: c.percent,
            })
        })
        .collect()
}
