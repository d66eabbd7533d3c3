//! Color types for the flow-field sketch.
//!
//! Strokes are described in HSB with every channel (hue, saturation,
//! brightness, alpha) on a `[0, 255]` scale rather than the usual
//! `[0, 360]` / `[0, 100]`. [`Hsba::to_srgb`] converts them to [`Srgb`] with
//! components in `[0, 1]` for compositing onto a canvas.

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upper bound of every [`Hsba`] channel.
pub const CHANNEL_MAX: f64 = 255.0;

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"` for human-readable formats.
/// The hex round-trip has 8-bit quantization (1/255 precision loss),
/// which is acceptable since hex colors are inherently 8-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `EngineError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    ///
    /// Components are quantized to 8-bit (0-255) with rounding.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes to 8-bit channels, clamping out-of-range components.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hue, saturation, brightness and alpha, each on a `[0, 255]` scale.
///
/// Hue wraps: 255 is a full turn, so hue 0 and hue 255 are the same red.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsba {
    pub h: f64,
    pub s: f64,
    pub b: f64,
    pub a: f64,
}

impl Hsba {
    pub fn new(h: f64, s: f64, b: f64, a: f64) -> Self {
        Self { h, s, b, a }
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha(&self) -> f64 {
        if self.a.is_nan() {
            return 0.0;
        }
        (self.a / CHANNEL_MAX).clamp(0.0, 1.0)
    }

    /// Converts to sRGB using the HSV sextant formula.
    ///
    /// Saturation and brightness are clamped to `[0, 255]`; hue is wrapped.
    /// A NaN hue is treated as 0.
    pub fn to_srgb(self) -> Srgb {
        let hue = if self.h.is_finite() {
            (self.h / CHANNEL_MAX).rem_euclid(1.0)
        } else {
            0.0
        };
        let s = unit_channel(self.s);
        let v = unit_channel(self.b);

        let sector = hue * 6.0;
        let c = v * s;
        let x = c * (1.0 - (sector % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match sector as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Srgb {
            r: r + m,
            g: g + m,
            b: b + m,
        }
    }
}

/// Maps a `[0, 255]` channel to `[0, 1]`, NaN to 0.
fn unit_channel(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    (value / CHANNEL_MAX).clamp(0.0, 1.0)
}
