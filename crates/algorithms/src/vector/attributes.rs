//! Derived attributes of a geometry, as a printable record

use super::measurements::{area, bounds, centroid, length};
use super::wkt::{type_name, Wkt};
use geo::{Coord, CoordsIter, Geometry, Point};
use geomatica_core::BBox;
use std::fmt;

/// Area, length, centroid, bounds and coordinates of one geometry
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryAttributes {
    pub kind: &'static str,
    /// Exterior coordinates for polygons, every coordinate otherwise
    pub coords: Vec<Coord<f64>>,
    pub area: f64,
    /// Path length, or perimeter for polygons
    pub length: f64,
    pub centroid: Option<Point<f64>>,
    pub bounds: Option<BBox>,
}

impl GeometryAttributes {
    pub fn of(geom: &Geometry<f64>) -> Self {
        let coords = match geom {
            Geometry::Polygon(p) => p.exterior().0.clone(),
            other => other.coords_iter().collect(),
        };
        Self {
            kind: type_name(geom),
            coords,
            area: area(geom),
            length: length(geom),
            centroid: centroid(geom),
            bounds: bounds(geom),
        }
    }
}

/// `(min_x, min_y, max_x, max_y)` tuple text
pub fn bounds_tuple(b: &BBox) -> String {
    format!("({}, {}, {}, {})", b.min_x, b.min_y, b.max_x, b.max_y)
}

/// `[(x, y), ...]` list text
pub fn coords_list(coords: &[Coord<f64>]) -> String {
    let items: Vec<String> = coords.iter().map(|c| format!("({}, {})", c.x, c.y)).collect();
    format!("[{}]", items.join(", "))
}

impl fmt::Display for GeometryAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Type: {}", self.kind)?;
        writeln!(f, "Coordinates: {}", coords_list(&self.coords))?;
        if self.kind == "POINT" {
            if let Some(c) = self.coords.first() {
                writeln!(f, "X: {}", c.x)?;
                writeln!(f, "Y: {}", c.y)?;
            }
        }
        if self.kind.ends_with("POLYGON") {
            writeln!(f, "Area: {}", self.area)?;
            writeln!(f, "Perimeter: {}", self.length)?;
        } else {
            writeln!(f, "Length: {}", self.length)?;
        }
        match self.centroid {
            Some(c) => writeln!(f, "Centroid: {}", Wkt(&Geometry::Point(c)))?,
            None => writeln!(f, "Centroid: POINT EMPTY")?,
        }
        match &self.bounds {
            Some(b) => write!(f, "Bounds: {}", bounds_tuple(b)),
            None => write!(f, "Bounds: ()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{line_string, point, polygon};

    #[test]
    fn unit_square_attributes() {
        let sq = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let attrs = GeometryAttributes::of(&sq.into());
        assert_eq!(attrs.kind, "POLYGON");
        assert_eq!(attrs.coords.len(), 5);
        assert_relative_eq!(attrs.area, 1.0);
        assert_relative_eq!(attrs.length, 4.0);
        assert_eq!(attrs.centroid, Some(point!(x: 0.5, y: 0.5)));

        let text = attrs.to_string();
        assert!(text.contains("Centroid: POINT (0.5 0.5)"));
        assert!(text.contains("Bounds: (0, 0, 1, 1)"));
    }

    #[test]
    fn point_and_line_text() {
        let p = GeometryAttributes::of(&point!(x: 0.0, y: 0.0).into()).to_string();
        assert!(p.contains("Coordinates: [(0, 0)]"));
        assert!(p.contains("X: 0"));

        let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 2.0, y: 0.0)];
        let attrs = GeometryAttributes::of(&line.into());
        assert_relative_eq!(attrs.length, 2.0 * 2f64.sqrt());
        assert_eq!(attrs.area, 0.0);
        assert!(attrs.to_string().contains("Centroid: POINT (1 0.5)"));
    }
}
