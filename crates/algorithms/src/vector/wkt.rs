//! Well-known text rendering of geometries
//!
//! Coordinates print with Rust's shortest round-trip float formatting, so
//! whole numbers appear without a decimal part: `POINT (0 0)`.

use geo::{Coord, Geometry, LineString, Polygon};
use std::fmt::{self, Display, Write};

/// Display adapter writing a geometry as WKT
pub struct Wkt<'a>(pub &'a Geometry<f64>);

impl Display for Wkt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_geometry(f, self.0)
    }
}

pub fn to_wkt(geom: &Geometry<f64>) -> String {
    Wkt(geom).to_string()
}

/// Name of the geometry type as WKT spells it
pub fn type_name(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) | Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
    }
}

fn write_coord<W: Write>(w: &mut W, c: &Coord<f64>) -> fmt::Result {
    write!(w, "{} {}", c.x, c.y)
}

fn write_coords<W: Write>(w: &mut W, ls: &LineString<f64>) -> fmt::Result {
    w.write_char('(')?;
    for (i, c) in ls.coords().enumerate() {
        if i > 0 {
            w.write_str(", ")?;
        }
        write_coord(w, c)?;
    }
    w.write_char(')')
}

fn write_rings<W: Write>(w: &mut W, p: &Polygon<f64>) -> fmt::Result {
    w.write_char('(')?;
    write_coords(w, p.exterior())?;
    for ring in p.interiors() {
        w.write_str(", ")?;
        write_coords(w, ring)?;
    }
    w.write_char(')')
}

/// Comma-separated list of parts, or `EMPTY`
fn write_parts<W, T, F>(w: &mut W, parts: &[T], mut each: F) -> fmt::Result
where
    W: Write,
    F: FnMut(&mut W, &T) -> fmt::Result,
{
    if parts.is_empty() {
        return w.write_str("EMPTY");
    }
    w.write_char('(')?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            w.write_str(", ")?;
        }
        each(w, part)?;
    }
    w.write_char(')')
}

fn write_geometry<W: Write>(w: &mut W, geom: &Geometry<f64>) -> fmt::Result {
    write!(w, "{} ", type_name(geom))?;
    match geom {
        Geometry::Point(p) => {
            w.write_char('(')?;
            write_coord(w, &p.0)?;
            w.write_char(')')
        }
        Geometry::Line(l) => write_coords(w, &LineString::from(vec![l.start, l.end])),
        Geometry::LineString(ls) if ls.0.is_empty() => w.write_str("EMPTY"),
        Geometry::LineString(ls) => write_coords(w, ls),
        Geometry::Polygon(p) if p.exterior().0.is_empty() => w.write_str("EMPTY"),
        Geometry::Polygon(p) => write_rings(w, p),
        Geometry::Rect(r) => write_rings(w, &r.to_polygon()),
        Geometry::Triangle(t) => write_rings(w, &t.to_polygon()),
        Geometry::MultiPoint(mp) => write_parts(w, &mp.0, |w, p| {
            w.write_char('(')?;
            write_coord(w, &p.0)?;
            w.write_char(')')
        }),
        Geometry::MultiLineString(mls) => write_parts(w, &mls.0, |w, ls| write_coords(w, ls)),
        Geometry::MultiPolygon(mp) => write_parts(w, &mp.0, |w, p| write_rings(w, p)),
        Geometry::GeometryCollection(gc) => write_parts(w, &gc.0, |w, g| write_geometry(w, g)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon, MultiLineString, MultiPoint};

    #[test]
    fn basic_geometries() {
        assert_eq!(to_wkt(&point!(x: 0.0, y: 0.0).into()), "POINT (0 0)");
        let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 2.0, y: 0.0)];
        assert_eq!(to_wkt(&line.into()), "LINESTRING (0 0, 1 1, 2 0)");
        let poly = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        assert_eq!(to_wkt(&poly.into()), "POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
    }

    #[test]
    fn multi_geometries() {
        let mp = MultiPoint::from(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert_eq!(to_wkt(&mp.into()), "MULTIPOINT ((0 0), (1 1), (2 0))");

        let mls = MultiLineString::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)],
            line_string![(x: 2.0, y: 0.0), (x: 3.0, y: 1.0)],
        ]);
        assert_eq!(to_wkt(&mls.into()), "MULTILINESTRING ((0 0, 1 1), (2 0, 3 1))");
    }

    #[test]
    fn polygon_with_hole_and_fractions() {
        let poly = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0)]],
        );
        assert_eq!(
            to_wkt(&poly.into()),
            "POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 3 1, 3 3, 1 3, 1 1))"
        );
        assert_eq!(to_wkt(&point!(x: 1.0, y: 0.5).into()), "POINT (1 0.5)");
    }
}
