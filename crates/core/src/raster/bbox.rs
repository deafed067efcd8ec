//! Axis-aligned bounding boxes

use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned extent in CRS units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// An inverted box that any call to [`BBox::expand`] will replace.
    pub fn empty() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY)
    }

    /// From STAC order `[west, south, east, north]`.
    pub fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_empty(&self) -> bool {
        !(self.max_x > self.min_x && self.max_y > self.min_y)
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Grow the box to include a point.
    pub fn expand(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Check if two boxes overlap with positive area.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Overlapping part of two boxes, `None` if they do not overlap.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        if !self.intersects(other) {
            return None;
        }
        Some(BBox::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        ))
    }

    /// Whether `other` lies fully inside this box (edges included).
    pub fn contains(&self, other: &BBox) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Sub-box between fractions of the width and height, e.g.
    /// `fraction(0.25, 0.75)` keeps the central half on both axes.
    pub fn fraction(&self, from: f64, to: f64) -> BBox {
        BBox::new(
            self.min_x + self.width() * from,
            self.min_y + self.height() * from,
            self.min_x + self.width() * to,
            self.min_y + self.height() * to,
        )
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox(left={}, bottom={}, right={}, top={})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_overlapping_boxes() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, -5.0, 15.0, 5.0);
        assert_eq!(a.intersection(&b), Some(BBox::new(5.0, 0.0, 10.0, 5.0)));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn expand_from_empty() {
        let mut b = BBox::empty();
        assert!(b.is_empty());
        b.expand(1.0, 2.0);
        b.expand(-1.0, 5.0);
        assert_eq!(b, BBox::new(-1.0, 2.0, 1.0, 5.0));
    }

    #[test]
    fn central_fraction() {
        let b = BBox::new(0.0, 0.0, 100.0, 40.0).fraction(0.25, 0.75);
        assert_eq!(b, BBox::new(25.0, 10.0, 75.0, 30.0));
    }
}
