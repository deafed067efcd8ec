//! Minimal chart and panel drawing on RGBA images
//!
//! Figures carry no text; titles and labels are printed by the caller.

use crate::scheme::Rgb;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

const MARGIN: u32 = 20;
const AXIS: Rgb = Rgb::new(60, 60, 60);

fn px(color: Rgb) -> Rgba<u8> {
    Rgba(color.rgba())
}

/// White canvas with clipped drawing primitives
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, px(Rgb::WHITE)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, px(color));
        }
    }

    /// Filled rectangle between two corners, inclusive
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.put(x, y, color);
            }
        }
    }

    /// Bresenham line
    pub fn line(&mut self, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb) {
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn polyline(&mut self, points: &[(i64, i64)], color: Rgb) {
        for w in points.windows(2) {
            self.line(w[0], w[1], color);
        }
    }

    fn axes(&mut self) {
        let (w, h) = (self.width() as i64, self.height() as i64);
        let m = MARGIN as i64;
        self.line((m, h - m), (w - m, h - m), AXIS);
        self.line((m, m), (m, h - m), AXIS);
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Linear map from a data range onto a pixel span
#[derive(Debug, Clone, Copy)]
struct Scale {
    lo: f64,
    hi: f64,
    start: f64,
    end: f64,
}

impl Scale {
    fn new(lo: f64, hi: f64, start: f64, end: f64) -> Self {
        let hi = if (hi - lo).abs() < f64::EPSILON { lo + 1.0 } else { hi };
        Self { lo, hi, start, end }
    }

    fn map(&self, v: f64) -> i64 {
        (self.start + (v - self.lo) / (self.hi - self.lo) * (self.end - self.start)).round() as i64
    }
}

fn range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Vertical bars from a zero baseline, one per value, in order.
pub fn bar_chart(values: &[f64], color: Rgb, width: u32, height: u32) -> RgbaImage {
    let mut canvas = Canvas::new(width, height);
    canvas.axes();
    if values.is_empty() {
        return canvas.into_image();
    }

    let (lo, hi) = range(values.iter().copied());
    let (lo, hi) = (lo.min(0.0), hi.max(0.0));
    let y = Scale::new(lo, hi, (height - MARGIN) as f64, MARGIN as f64);
    let slot = (width - 2 * MARGIN) as f64 / values.len() as f64;

    for (i, &v) in values.iter().enumerate().filter(|(_, v)| v.is_finite()) {
        let x0 = MARGIN as f64 + slot * (i as f64 + 0.15);
        let x1 = MARGIN as f64 + slot * (i as f64 + 0.85);
        canvas.fill_rect(x0.round() as i64, y.map(0.0), x1.round() as i64, y.map(v), color);
    }
    canvas.into_image()
}

/// One series of a [`LineChart`]
#[derive(Debug, Clone)]
enum Mark {
    Line(Vec<(f64, f64)>, Rgb),
    Segment { x0: f64, x1: f64, y: f64, color: Rgb },
}

/// XY line chart sharing one data range across all series
#[derive(Debug, Clone, Default)]
pub struct LineChart {
    marks: Vec<Mark>,
}

impl LineChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(mut self, xs: &[f64], ys: &[f64], color: Rgb) -> Self {
        let points = xs.iter().copied().zip(ys.iter().copied()).collect();
        self.marks.push(Mark::Line(points, color));
        self
    }

    /// Horizontal segment at `y` from `x0` to `x1`
    pub fn segment(mut self, x0: f64, x1: f64, y: f64, color: Rgb) -> Self {
        self.marks.push(Mark::Segment { x0, x1, y, color });
        self
    }

    pub fn render(&self, width: u32, height: u32) -> RgbaImage {
        let mut canvas = Canvas::new(width, height);
        canvas.axes();

        let xs = self.marks.iter().flat_map(|m| match m {
            Mark::Line(p, _) => p.iter().map(|(x, _)| *x).collect::<Vec<_>>(),
            Mark::Segment { x0, x1, .. } => vec![*x0, *x1],
        });
        let ys = self.marks.iter().flat_map(|m| match m {
            Mark::Line(p, _) => p.iter().map(|(_, y)| *y).collect::<Vec<_>>(),
            Mark::Segment { y, .. } => vec![*y],
        });
        let (x_lo, x_hi) = range(xs);
        let (y_lo, y_hi) = range(ys);
        if !(x_lo.is_finite() && y_lo.is_finite()) {
            return canvas.into_image();
        }

        let sx = Scale::new(x_lo, x_hi, MARGIN as f64, (width - MARGIN) as f64);
        let sy = Scale::new(y_lo, y_hi, (height - MARGIN) as f64, MARGIN as f64);

        for mark in &self.marks {
            match mark {
                Mark::Line(points, color) => {
                    let pts: Vec<_> = points.iter().map(|&(x, y)| (sx.map(x), sy.map(y))).collect();
                    canvas.polyline(&pts, *color);
                }
                Mark::Segment { x0, x1, y, color } => {
                    let yy = sy.map(*y);
                    // two pixels thick
                    canvas.fill_rect(sx.map(*x0), yy, sx.map(*x1), yy + 1, *color);
                }
            }
        }
        canvas.into_image()
    }
}

/// Tile images left to right, each scaled (nearest) to `cell` x `cell`.
pub fn panels(images: &[RgbaImage], cell: u32) -> RgbaImage {
    let gap = 8;
    let n = images.len() as u32;
    let width = (n * cell + n.saturating_sub(1) * gap).max(1);
    let mut out = RgbaImage::from_pixel(width, cell.max(1), px(Rgb::WHITE));
    for (i, img) in images.iter().enumerate() {
        let scaled = imageops::resize(img, cell, cell, FilterType::Nearest);
        imageops::replace(&mut out, &scaled, (i as u32 * (cell + gap)) as i64, 0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_fill_from_baseline() {
        let red = Rgb::new(200, 0, 0);
        let img = bar_chart(&[1.0, 2.0], red, 120, 100);
        // Second bar reaches the top margin, first only halfway
        assert_eq!(img.get_pixel(90, MARGIN + 1), &px(red));
        assert_eq!(img.get_pixel(40, MARGIN + 1), &px(Rgb::WHITE));
        assert_eq!(img.get_pixel(40, 70), &px(red));
    }

    #[test]
    fn line_chart_draws_series() {
        let blue = Rgb::new(0, 0, 255);
        let img = LineChart::new()
            .series(&[0.0, 1.0], &[0.0, 1.0], blue)
            .render(100, 100);
        assert_eq!(img.get_pixel(MARGIN, 100 - MARGIN), &px(blue));
        assert_eq!(img.get_pixel(100 - MARGIN, MARGIN), &px(blue));
    }

    #[test]
    fn panels_layout() {
        let a = RgbaImage::from_pixel(2, 2, px(Rgb::BLACK));
        let img = panels(&[a.clone(), a], 10);
        assert_eq!(img.dimensions(), (28, 10));
        assert_eq!(img.get_pixel(12, 5), &px(Rgb::WHITE));
        assert_eq!(img.get_pixel(20, 5), &px(Rgb::BLACK));
    }
}
