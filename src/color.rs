//! Color math: hex ⇄ RGB ⇄ HSL conversion, RGB interpolation and intensity
//!
//! Everything here is pure. Phase blending stays in RGB space; HSL is only
//! used by the intensity (saturation) adjustment so blend midpoints never pick
//! up hue artifacts.

use std::fmt;
use std::str::FromStr;

/// A 24-bit sRGB color. Always representable as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Why a hex color string was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Not exactly six hex digits after the optional `#`
    Length(usize),
    /// A character outside `[0-9a-fA-F]`
    Digit(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(len) => write!(f, "expected 6 hex digits, found {}", len),
            Self::Digit(value) => write!(f, "invalid hex digit in {:?}", value),
        }
    }
}

impl std::error::Error for ColorParseError {}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`, case-insensitive.
    pub fn parse(hex: &str) -> Result<Self, ColorParseError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if digits.chars().count() != 6 {
            return Err(ColorParseError::Length(digits.chars().count()));
        }
        // from_str_radix tolerates a leading '+', so check digits up front
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::Digit(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorParseError::Digit(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Clamp each channel to [0, 255] and round
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self::new(to_channel(r), to_channel(g), to_channel(b))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a hex color, falling back to black on malformed input.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    Rgb::parse(hex).unwrap_or_else(|e| {
        tracing::debug!("Malformed color {:?} ({}), using #000000", hex, e);
        Rgb::BLACK
    })
}

fn to_channel(value: f64) -> u8 {
    // NaN casts to 0
    value.clamp(0.0, 255.0).round() as u8
}

/// Component-wise linear interpolation. `t` is not clamped; pass `t ∈ [0, 1]`.
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let mix = |x: u8, y: u8| {
        let x = f64::from(x);
        let y = f64::from(y);
        x + (y - x) * t
    };
    Rgb::from_channels(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

// ─────────────────────────────────────────────────────────────────────────────
// HSL
// ─────────────────────────────────────────────────────────────────────────────

/// Hue in degrees [0, 360), saturation and lightness in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl From<Rgb> for Hsl {
    fn from(rgb: Rgb) -> Self {
        let r = f64::from(rgb.r) / 255.0;
        let g = f64::from(rgb.g) / 255.0;
        let b = f64::from(rgb.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl { h: h * 60.0, s, l }
    }
}

impl From<Hsl> for Rgb {
    fn from(hsl: Hsl) -> Self {
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = l * 255.0;
            return Rgb::from_channels(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = hsl.h.rem_euclid(360.0) / 360.0;

        Rgb::from_channels(
            hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
            hue_to_rgb(p, q, h) * 255.0,
            hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
        )
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Intensity
// ─────────────────────────────────────────────────────────────────────────────

/// Saturation adjustment in percent, 0..=100.
///
/// 50 is neutral. Saturation is scaled by `percent / 50`: 0 removes all
/// color, 100 doubles saturation (clamped to fully saturated).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intensity(u8);

impl Intensity {
    pub const NEUTRAL: Intensity = Intensity(50);

    pub fn new(percent: u8) -> Self {
        Self(percent.min(100))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn is_neutral(self) -> bool {
        self == Self::NEUTRAL
    }

    pub fn saturation_factor(self) -> f64 {
        f64::from(self.0) / 50.0
    }

    /// Apply to a single color; neutral intensity returns the color untouched.
    pub fn apply(self, rgb: Rgb) -> Rgb {
        if self.is_neutral() {
            return rgb;
        }
        let mut hsl = Hsl::from(rgb);
        hsl.s = (hsl.s * self.saturation_factor()).clamp(0.0, 1.0);
        Rgb::from(hsl)
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
