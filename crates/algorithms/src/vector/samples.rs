//! Geometries used throughout the vector unit

use geo::{
    line_string, point, polygon, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use geomatica_core::{Feature, FeatureCollection};

pub fn point() -> Point<f64> {
    point!(x: 0.0, y: 0.0)
}

pub fn line() -> LineString<f64> {
    line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 2.0, y: 0.0)]
}

fn unit_square_at(x: f64) -> Polygon<f64> {
    polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0), (x: x, y: 0.0)]
}

pub fn unit_square() -> Polygon<f64> {
    unit_square_at(0.0)
}

/// Irregular polygon of the area exercise
pub fn practice_polygon() -> Polygon<f64> {
    polygon![
        (x: 3.0, y: 5.0),
        (x: 5.0, y: 3.0),
        (x: 6.0, y: 9.0),
        (x: 5.0, y: 7.0),
        (x: 3.0, y: 6.0),
        (x: 3.0, y: 5.0),
    ]
}

pub fn multi_point() -> MultiPoint<f64> {
    MultiPoint::from(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)])
}

pub fn multi_line() -> MultiLineString<f64> {
    MultiLineString::new(vec![
        line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)],
        line_string![(x: 2.0, y: 0.0), (x: 3.0, y: 1.0)],
    ])
}

pub fn multi_polygon() -> MultiPolygon<f64> {
    MultiPolygon::new(vec![unit_square_at(0.0), unit_square_at(2.0)])
}

/// 4x4 square with a centred 2x2 hole
pub fn polygon_with_hole() -> Polygon<f64> {
    polygon!(
        exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0), (x: 0.0, y: 0.0)],
        interiors: [[(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0), (x: 1.0, y: 1.0)]],
    )
}

/// Every geometry of the unit with its label, in presentation order
pub fn gallery() -> Vec<(&'static str, Geometry<f64>)> {
    vec![
        ("point", point().into()),
        ("line", line().into()),
        ("polygon", unit_square().into()),
        ("practice_polygon", practice_polygon().into()),
        ("multipoint", multi_point().into()),
        ("multiline", multi_line().into()),
        ("multipolygon", multi_polygon().into()),
        ("polygon_with_hole", polygon_with_hole().into()),
    ]
}

/// Road-network nodes A-E
pub fn network_nodes() -> FeatureCollection {
    [
        ("A", 0.0, 0.0),
        ("B", 4.0, 0.0),
        ("C", 4.0, 3.0),
        ("D", 0.0, 2.0),
        ("E", 7.0, 2.0),
    ]
    .into_iter()
    .map(|(name, x, y)| Feature::named(name, point!(x: x, y: y)))
    .collect()
}

/// Arcs between the network nodes, each with a distinct length.
///
/// The last arc ends away from every node and does not join the graph.
pub fn network_arcs() -> FeatureCollection {
    let arc = |name: &str, coords: &[(f64, f64)]| Feature::named(name, LineString::from(coords.to_vec()));
    [
        arc("A-B", &[(0.0, 0.0), (4.0, 0.0)]),
        arc("B-C", &[(4.0, 0.0), (4.0, 3.0)]),
        arc("C-D", &[(4.0, 3.0), (0.0, 2.0)]),
        arc("D-A", &[(0.0, 2.0), (0.0, 0.0)]),
        arc("A-C", &[(0.0, 0.0), (4.0, 3.0)]),
        arc("B-E", &[(4.0, 0.0), (7.0, 2.0)]),
        arc("C-E", &[(4.0, 3.0), (7.0, 2.0)]),
        arc("A-X", &[(0.0, 0.0), (9.0, 9.0)]),
    ]
    .into_iter()
    .collect()
}
