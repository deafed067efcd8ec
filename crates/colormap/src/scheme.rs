//! Color schemes and multi-stop interpolation engine.

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Continuous color schemes for single-band rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Blue -> Green -> Yellow -> Brown -> White (elevation)
    Terrain,
    /// Black -> White (hillshade)
    Grayscale,
    /// Light yellow -> Orange -> Dark red (slope)
    YlOrRd,
    /// Cyclic, same color at both ends (aspect)
    Twilight,
}

impl ColorScheme {
    pub const ALL: &[ColorScheme] = &[Self::Terrain, Self::Grayscale, Self::YlOrRd, Self::Twilight];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Terrain => "terrain",
            Self::Grayscale => "gray",
            Self::YlOrRd => "YlOrRd",
            Self::Twilight => "twilight",
        }
    }

    /// Parse a scheme by its name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

const TERRAIN_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 51, 51, 153),
    ColorStop::new(0.15, 0, 153, 255),
    ColorStop::new(0.25, 0, 204, 102),
    ColorStop::new(0.50, 255, 255, 153),
    ColorStop::new(0.75, 128, 92, 84),
    ColorStop::new(1.00, 255, 255, 255),
];

const YLORRD_STOPS: &[ColorStop] = &[
    ColorStop::new(0.000, 255, 255, 204),
    ColorStop::new(0.125, 255, 237, 160),
    ColorStop::new(0.250, 254, 217, 118),
    ColorStop::new(0.375, 254, 178, 76),
    ColorStop::new(0.500, 253, 141, 60),
    ColorStop::new(0.625, 252, 78, 42),
    ColorStop::new(0.750, 227, 26, 28),
    ColorStop::new(0.875, 189, 0, 38),
    ColorStop::new(1.000, 128, 0, 38),
];

const TWILIGHT_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 226, 217, 226),
    ColorStop::new(0.25, 94, 128, 185),
    ColorStop::new(0.50, 47, 20, 54),
    ColorStop::new(0.75, 170, 82, 72),
    ColorStop::new(1.00, 226, 217, 226),
];

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    stops
        .windows(2)
        .find(|w| t <= w[1].t)
        .map(|w| lerp_color(w[0].color, w[1].color, (t - w[0].t) / (w[1].t - w[0].t)))
        .unwrap_or(stops[stops.len() - 1].color)
}

/// Evaluate a color scheme at normalized position `t`, clamped to [0, 1].
pub fn evaluate(scheme: ColorScheme, t: f64) -> Rgb {
    match scheme {
        ColorScheme::Terrain => multi_stop(TERRAIN_STOPS, t),
        ColorScheme::Grayscale => {
            let v = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgb::new(v, v, v)
        }
        ColorScheme::YlOrRd => multi_stop(YLORRD_STOPS, t),
        ColorScheme::Twilight => multi_stop(TWILIGHT_STOPS, t),
    }
}
