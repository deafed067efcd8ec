//! Minimal SVG previews of geometries
//!
//! Layout follows the usual notebook preview: the geometry's envelope padded
//! by 4% of its widest side (or one unit around a lone point), a view box of
//! 100-300 px per side and a y-flip so north is up.

use super::measurements::bounds;
use geo::{Coord, Geometry, LineString, Polygon};
use std::fmt::Write;

const FILL: &str = "#66cc99";
const STROKE: &str = "#555555";
const PADDING: f64 = 0.04;

/// Render a standalone SVG document for `geom`
pub fn to_svg(geom: &Geometry<f64>) -> String {
    let Some(bbox) = bounds(geom) else {
        return r#"<svg xmlns="http://www.w3.org/2000/svg" />"#.to_string();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y);
    if min_x == max_x && min_y == max_y {
        min_x -= 1.0;
        min_y -= 1.0;
        max_x += 1.0;
        max_y += 1.0;
    } else {
        let pad = (max_x - min_x).max(max_y - min_y) * PADDING;
        min_x -= pad;
        min_y -= pad;
        max_x += pad;
        max_y += pad;
    }

    let dx = max_x - min_x;
    let dy = max_y - min_y;
    let width = dx.clamp(100.0, 300.0);
    let height = dy.clamp(100.0, 300.0);
    let scale = dx.max(dy) / width.max(height);

    let mut body = String::new();
    write_element(&mut body, geom, scale);

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"width="{w}" height="{h}" viewBox="{x} {y} {dx} {dy}" preserveAspectRatio="xMinYMin meet">"#,
            r#"<g transform="matrix(1,0,0,-1,0,{flip})">{body}</g></svg>"#
        ),
        w = width,
        h = height,
        x = min_x,
        y = min_y,
        dx = dx,
        dy = dy,
        flip = max_y + min_y,
        body = body,
    )
}

fn points_attr(coords: impl Iterator<Item = Coord<f64>>) -> String {
    coords
        .map(|c| format!("{},{}", c.x, c.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn ring_path(out: &mut String, ring: &LineString<f64>) {
    for (i, c) in ring.coords().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{} {},{} ", cmd, c.x, c.y);
    }
    out.push_str("z ");
}

fn polygon_element(out: &mut String, p: &Polygon<f64>, scale: f64) {
    let mut d = String::new();
    ring_path(&mut d, p.exterior());
    for hole in p.interiors() {
        ring_path(&mut d, hole);
    }
    let _ = write!(
        out,
        r#"<path fill-rule="evenodd" fill="{}" stroke="{}" stroke-width="{}" opacity="0.6" d="{}" />"#,
        FILL,
        STROKE,
        2.0 * scale,
        d.trim_end()
    );
}

fn line_element(out: &mut String, ls: &LineString<f64>, scale: f64) {
    let _ = write!(
        out,
        r#"<polyline fill="none" stroke="{}" stroke-width="{}" points="{}" opacity="0.8" />"#,
        FILL,
        2.0 * scale,
        points_attr(ls.coords().copied())
    );
}

fn point_element(out: &mut String, c: Coord<f64>, scale: f64) {
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}" stroke="{}" stroke-width="{}" fill="{}" opacity="0.6" />"#,
        c.x,
        c.y,
        3.0 * scale,
        STROKE,
        scale,
        FILL
    );
}

fn write_element(out: &mut String, geom: &Geometry<f64>, scale: f64) {
    match geom {
        Geometry::Point(p) => point_element(out, p.0, scale),
        Geometry::Line(l) => line_element(out, &LineString::from(vec![l.start, l.end]), scale),
        Geometry::LineString(ls) => line_element(out, ls, scale),
        Geometry::Polygon(p) => polygon_element(out, p, scale),
        Geometry::Rect(r) => polygon_element(out, &r.to_polygon(), scale),
        Geometry::Triangle(t) => polygon_element(out, &t.to_polygon(), scale),
        Geometry::MultiPoint(mp) => {
            out.push_str("<g>");
            mp.iter().for_each(|p| point_element(out, p.0, scale));
            out.push_str("</g>");
        }
        Geometry::MultiLineString(mls) => {
            out.push_str("<g>");
            mls.iter().for_each(|ls| line_element(out, ls, scale));
            out.push_str("</g>");
        }
        Geometry::MultiPolygon(mp) => {
            out.push_str("<g>");
            mp.iter().for_each(|p| polygon_element(out, p, scale));
            out.push_str("</g>");
        }
        Geometry::GeometryCollection(gc) => {
            out.push_str("<g>");
            gc.iter().for_each(|g| write_element(out, g, scale));
            out.push_str("</g>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{point, polygon};

    #[test]
    fn point_gets_unit_padding() {
        let svg = to_svg(&point!(x: 0.0, y: 0.0).into());
        assert!(svg.contains(r#"viewBox="-1 -1 2 2""#));
        assert!(svg.contains("<circle cx=\"0\" cy=\"0\""));
    }

    #[test]
    fn polygon_with_hole_uses_evenodd_path() {
        let poly = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0)]],
        );
        let svg = to_svg(&poly.into());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("fill-rule=\"evenodd\""));
        assert_eq!(svg.matches("M ").count(), 2);
    }
}
