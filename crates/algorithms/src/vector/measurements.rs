//! Geometric measurements: area, length, perimeter, centroid, bounds

use geo::{Area, BoundingRect, Centroid, Euclidean, Geometry, Length, LineString, Point, Polygon};
use geomatica_core::BBox;

fn ring_length(ring: &LineString<f64>) -> f64 {
    ring.length::<Euclidean>()
}

fn polygon_perimeter(p: &Polygon<f64>) -> f64 {
    ring_length(p.exterior()) + p.interiors().iter().map(ring_length).sum::<f64>()
}

/// Unsigned area; holes are subtracted. Zero for points and lines.
pub fn area(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_)
        | Geometry::GeometryCollection(_) => geom.unsigned_area(),
        _ => 0.0,
    }
}

/// Total length of the geometry's boundary or path.
///
/// Lines give their path length, polygons their perimeter including holes.
pub fn length(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Line(l) => ring_length(&LineString::from(vec![l.start, l.end])),
        Geometry::LineString(ls) => ring_length(ls),
        Geometry::MultiLineString(mls) => mls.0.iter().map(ring_length).sum(),
        Geometry::Polygon(p) => polygon_perimeter(p),
        Geometry::MultiPolygon(mp) => mp.0.iter().map(polygon_perimeter).sum(),
        Geometry::Rect(r) => polygon_perimeter(&r.to_polygon()),
        Geometry::Triangle(t) => polygon_perimeter(&t.to_polygon()),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(length).sum(),
        Geometry::Point(_) | Geometry::MultiPoint(_) => 0.0,
    }
}

/// Perimeter of polygonal geometries, zero otherwise
pub fn perimeter(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
            length(geom)
        }
        _ => 0.0,
    }
}

/// Area-, length- or count-weighted centroid, `None` for empty geometries
pub fn centroid(geom: &Geometry<f64>) -> Option<Point<f64>> {
    geom.centroid()
}

/// Axis-aligned envelope, `None` for empty geometries
pub fn bounds(geom: &Geometry<f64>) -> Option<BBox> {
    geom.bounding_rect()
        .map(|r| BBox::new(r.min().x, r.min().y, r.max().x, r.max().y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Coord, Line, MultiLineString};

    fn square(size: f64, offset: f64) -> LineString<f64> {
        LineString::from(vec![
            (offset, offset),
            (offset + size, offset),
            (offset + size, offset + size),
            (offset, offset + size),
            (offset, offset),
        ])
    }

    #[test]
    fn area_of_polygon_with_hole() {
        let poly = Polygon::new(square(4.0, 0.0), vec![square(2.0, 1.0)]);
        assert_relative_eq!(area(&Geometry::Polygon(poly)), 12.0);
    }

    #[test]
    fn area_of_non_polygon_is_zero() {
        let line = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (10.0, 10.0)]));
        assert_eq!(area(&line), 0.0);
    }

    #[test]
    fn length_of_paths() {
        let line = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (3.0, 4.0)]));
        assert_relative_eq!(length(&line), 5.0);

        let mls = Geometry::MultiLineString(MultiLineString::new(vec![
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]),
            LineString::from(vec![(0.0, 0.0), (0.0, 5.0)]),
        ]));
        assert_relative_eq!(length(&mls), 15.0);

        let seg = Geometry::Line(Line::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 6.0, y: 8.0 }));
        assert_relative_eq!(length(&seg), 10.0);
    }

    #[test]
    fn perimeter_counts_holes() {
        let poly = Polygon::new(square(10.0, 0.0), vec![square(6.0, 2.0)]);
        assert_relative_eq!(perimeter(&Geometry::Polygon(poly)), 64.0);
    }

    #[test]
    fn centroid_and_bounds_of_line() {
        let line = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]));
        let c = centroid(&line).unwrap();
        assert_relative_eq!(c.x(), 1.0);
        assert_relative_eq!(c.y(), 0.5);
        assert_eq!(bounds(&line), Some(BBox::new(0.0, 0.0, 2.0, 1.0)));
    }
}
