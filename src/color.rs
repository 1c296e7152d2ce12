//! RGBA colors for node, edge and label styling
//!
//! Colors are stored as normalized floats and serialize as `#RRGGBB` (or
//! `#RRGGBBAA`) hex strings so configuration files stay readable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An RGBA color with components in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create an opaque color from 8-bit channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse a `#RRGGBB` or `#RRGGBBAA` hex string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() || (digits.len() != 6 && digits.len() != 8) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let mut color = Self::rgb(channel(0)?, channel(2)?, channel(4)?);
        if digits.len() == 8 {
            color.a = channel(6)? as f32 / 255.0;
        }
        Some(color)
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Channels as 8-bit values
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Brighter variant; `factor` is a percentage (120 = 20% brighter)
    ///
    /// Value is scaled in HSV space. When value saturates, the overflow is
    /// taken out of saturation instead, so bright colors wash toward white.
    pub fn lighter(&self, factor: u32) -> Self {
        let (h, mut s, mut v) = self.to_hsv();
        v *= factor as f32 / 100.0;
        if v > 1.0 {
            s = (s - (v - 1.0)).max(0.0);
            v = 1.0;
        }
        Self::from_hsv(h, s, v, self.a)
    }

    /// Darker variant; `factor` is a percentage (120 = value divided by 1.2)
    pub fn darker(&self, factor: u32) -> Self {
        if factor == 0 {
            return *self;
        }
        let (h, s, v) = self.to_hsv();
        Self::from_hsv(h, s, v * 100.0 / factor as f32, self.a)
    }

    /// Relative brightness (HSV value)
    pub fn value(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    fn to_hsv(self) -> (f32, f32, f32) {
        let max = self.value();
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == self.r {
            60.0 * ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if max == self.g {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };
        (h, s, max)
    }

    fn from_hsv(h: f32, s: f32, v: f32, a: f32) -> Self {
        let c = v * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self {
            r: r + m,
            g: g + m,
            b: b + m,
            a,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("invalid color '{s}', expected #RRGGBB"))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}
