//! Color mapping from cell values to ramp colors.

use super::ViewSnapshot;

/// Number of discrete steps in the color ramp.
pub const RAMP_SIZE: usize = 5 * 256;

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

/// Color palette for the matrix ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorPalette {
    /// Black, blue, cyan, green, yellow, red in five equal segments.
    #[default]
    Classic,
    /// Viridis colormap (perceptually uniform, colorblind-friendly).
    Viridis,
    /// Plasma colormap (perceptually uniform).
    Plasma,
    /// Rainbow/Spectral colormap (traditional, high contrast).
    Rainbow,
    /// Blue-White-Red diverging colormap.
    BlueRed,
}

const CLASSIC: [Rgb; 6] = [
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(0, 255, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 0, 0),
];

const VIRIDIS: [Rgb; 3] = [
    Rgb::new(68, 1, 84),
    Rgb::new(33, 104, 109),
    Rgb::new(253, 231, 37),
];

const PLASMA: [Rgb; 3] = [
    Rgb::new(13, 8, 135),
    Rgb::new(180, 54, 121),
    Rgb::new(240, 175, 12),
];

// Hue sweep from 240° (blue) down to 0° (red).
const RAINBOW: [Rgb; 5] = [
    Rgb::new(0, 0, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(0, 255, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 0, 0),
];

const BLUE_RED: [Rgb; 3] = [
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 255),
    Rgb::new(255, 0, 0),
];

impl ColorPalette {
    /// Get the next palette in cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Classic => Self::Viridis,
            Self::Viridis => Self::Plasma,
            Self::Plasma => Self::Rainbow,
            Self::Rainbow => Self::BlueRed,
            Self::BlueRed => Self::Classic,
        }
    }

    /// Get palette name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::Viridis => "Viridis",
            Self::Plasma => "Plasma",
            Self::Rainbow => "Rainbow",
            Self::BlueRed => "Blue-Red",
        }
    }

    /// Evenly spaced color stops, lowest first.
    pub fn stops(self) -> &'static [Rgb] {
        match self {
            Self::Classic => &CLASSIC,
            Self::Viridis => &VIRIDIS,
            Self::Plasma => &PLASMA,
            Self::Rainbow => &RAINBOW,
            Self::BlueRed => &BLUE_RED,
        }
    }

    /// Color of ramp step `index`, interpolated between the bracketing stops.
    ///
    /// Indices past the end of the ramp saturate at the last stop.
    pub fn color_at(self, index: usize) -> Rgb {
        let t = index.min(RAMP_SIZE - 1) as f64 / (RAMP_SIZE - 1) as f64;
        self.color(t)
    }

    /// Map a normalized value (0.0 to 1.0) to an RGB color.
    pub fn color(self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let seg = (pos.floor() as usize).min(stops.len() - 2);
        stops[seg].lerp(stops[seg + 1], pos - seg as f64)
    }
}

/// Monotonic log transform used in log scale mode; zero for non-positive input.
pub fn log_transform(z: f64) -> f64 {
    if z > 0.0 {
        z.ln_1p()
    } else {
        0.0
    }
}

/// Maps cell values to ramp indices and colors for one view snapshot.
///
/// The window bounds are transformed once on construction so that the
/// per-pixel path is a subtraction, a multiply and a clamp.
#[derive(Debug, Clone, Copy)]
pub struct ColorMapper {
    lower: f64,
    scale: f64,
    log_scale: bool,
    palette: ColorPalette,
}

impl ColorMapper {
    /// Build a mapper from a view snapshot.
    pub fn new(snapshot: &ViewSnapshot) -> Self {
        let view = &snapshot.view;
        Self::from_window(
            view.z_offset,
            view.z_visible_region,
            view.log_scale,
            snapshot.palette,
        )
    }

    /// Build a mapper for the value window `[offset, offset + region]`.
    pub fn from_window(offset: f64, region: f64, log_scale: bool, palette: ColorPalette) -> Self {
        let (lower, upper) = if log_scale {
            (log_transform(offset), log_transform(offset + region))
        } else {
            (offset, offset + region)
        };
        let span = upper - lower;
        let scale = if span > 0.0 && span.is_finite() {
            RAMP_SIZE as f64 / span
        } else {
            0.0
        };
        Self {
            lower: if lower.is_finite() { lower } else { 0.0 },
            scale,
            log_scale,
            palette,
        }
    }

    /// Ramp index for `z`, always in `0..RAMP_SIZE`.
    pub fn index_for(&self, z: f64) -> usize {
        let v = if self.log_scale {
            if !(z > 0.0) {
                return 0;
            }
            log_transform(z)
        } else {
            z
        };
        let idx = ((v - self.lower) * self.scale).round();
        if idx.is_nan() {
            return 0;
        }
        idx.clamp(0.0, (RAMP_SIZE - 1) as f64) as usize
    }

    /// Color for `z`.
    pub fn color_for(&self, z: f64) -> Rgb {
        self.palette.color_at(self.index_for(z))
    }
}
