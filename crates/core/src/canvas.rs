//! CPU raster canvas that accumulates frames.
//!
//! A [`Canvas`] is filled with its background once, at construction, and is
//! never cleared afterwards. Every call to [`Canvas::draw`] composites a
//! frame's [`RenderCommands`] on top of everything drawn before, so low-alpha
//! dots build up into trails.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::draw::{RenderCommands, StrokePoint};
use crate::error::EngineError;

/// How a dot is composited onto the pixels beneath it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Source-over: `dst = src * a + dst * (1 - a)`.
    #[default]
    Normal,
    /// `dst = min(dst + src * a, 1)`.
    Additive,
}

impl BlendMode {
    /// Parses `"normal"` or `"additive"` (case insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Some(BlendMode::Normal),
            "additive" => Some(BlendMode::Additive),
            _ => None,
        }
    }

    #[inline]
    fn blend(self, dst: f64, src: f64, alpha: f64) -> f64 {
        match self {
            BlendMode::Normal => src * alpha + dst * (1.0 - alpha),
            BlendMode::Additive => (dst + src * alpha).min(1.0),
        }
    }
}

/// Dots smaller than this radius would miss every pixel center, so they are
/// splatted onto the single pixel that contains them instead.
const MIN_SAMPLED_RADIUS: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Fixed-size RGBA raster with `f64` channels in `[0, 1]`.
///
/// Pixels are stored row-major. The canvas is always opaque: alpha is 1 for
/// every pixel because the background fills it.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    blend_mode: BlendMode,
    pixels: Vec<[f64; 4]>,
}

impl Canvas {
    /// Creates a canvas filled with `background`.
    ///
    /// Returns `EngineError::InvalidDimensions` if width or height is zero,
    /// or if `width * height` would overflow `usize`.
    pub fn new(width: usize, height: usize, background: Srgb) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            blend_mode: BlendMode::Normal,
            pixels: vec![[background.r, background.g, background.b, 1.0]; len],
        })
    }

    /// Returns a canvas that composites with `mode`.
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn pixels(&self) -> &[[f64; 4]] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f64; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Composites one frame of commands, in order, on top of the current contents.
    pub fn draw(&mut self, commands: &RenderCommands) {
        for point in commands {
            self.draw_point(point);
        }
    }

    /// Rasterises one point as a filled disc of diameter `point.weight`.
    ///
    /// A pixel is covered when its center lies inside the disc. Points with
    /// non-finite coordinates or weight are skipped.
    pub fn draw_point(&mut self, point: &StrokePoint) {
        let StrokePoint {
            position, weight, ..
        } = *point;
        if !position.is_finite() || !weight.is_finite() || weight <= 0.0 {
            return;
        }
        let color = point.color.to_srgb();
        let alpha = point.color.alpha();
        if alpha == 0.0 {
            return;
        }

        let radius = weight / 2.0;
        if radius < MIN_SAMPLED_RADIUS {
            let coverage = (std::f64::consts::PI * radius * radius).min(1.0);
            let (px, py) = (position.x.floor(), position.y.floor());
            if px >= 0.0 && py >= 0.0 {
                self.blend_pixel(px as usize, py as usize, color, alpha * coverage);
            }
            return;
        }

        let max_x = self.width as f64 - 1.0;
        let max_y = self.height as f64 - 1.0;
        let x0 = (position.x - radius - 0.5).ceil().clamp(0.0, max_x) as usize;
        let x1 = (position.x + radius - 0.5).floor().clamp(-1.0, max_x);
        let y0 = (position.y - radius - 0.5).ceil().clamp(0.0, max_y) as usize;
        let y1 = (position.y + radius - 0.5).floor().clamp(-1.0, max_y);
        if x1 < 0.0 || y1 < 0.0 {
            return;
        }
        let r2 = radius * radius;
        for py in y0..=y1 as usize {
            let dy = py as f64 + 0.5 - position.y;
            for px in x0..=x1 as usize {
                let dx = px as f64 + 0.5 - position.x;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }

    fn blend_pixel(&mut self, x: usize, y: usize, color: Srgb, alpha: f64) {
        if x >= self.width || y >= self.height {
            return;
        }
        let mode = self.blend_mode;
        let px = &mut self.pixels[y * self.width + x];
        px[0] = mode.blend(px[0], color.r, alpha);
        px[1] = mode.blend(px[1], color.g, alpha);
        px[2] = mode.blend(px[2], color.b, alpha);
    }

    /// Quantizes the canvas to tightly packed RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.pixels
            .iter()
            .flat_map(|&[r, g, b, a]| [q(r), q(g), q(b), q(a)])
            .collect()
    }
}
