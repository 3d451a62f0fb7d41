//! Packed ARGB color.

use crate::error::{GdiError, GdiResult};
use crate::known_colors;

/// A 32-bit ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    argb: u32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_argb_u32(0x00FFFFFF);
    pub const BLACK: Color = Color::from_argb_u32(0xFF000000);
    pub const WHITE: Color = Color::from_argb_u32(0xFFFFFFFF);
    pub const RED: Color = Color::from_argb_u32(0xFFFF0000);
    pub const LIME: Color = Color::from_argb_u32(0xFF00FF00);
    pub const BLUE: Color = Color::from_argb_u32(0xFF0000FF);
    pub const GREEN: Color = Color::from_argb_u32(0xFF008000);
    pub const GRAY: Color = Color::from_argb_u32(0xFF808080);

    /// Create a color from a packed `0xAARRGGBB` value.
    pub const fn from_argb_u32(argb: u32) -> Self {
        Self { argb }
    }

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self {
            argb: (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32,
        }
    }

    /// Opaque color from red, green and blue.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(255, r, g, b)
    }

    /// The same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::from_argb(a, self.r(), self.g(), self.b())
    }

    /// Look up a named color, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        known_colors::lookup(name).map(Self::from_argb_u32)
    }

    /// Parse an HTML color: a known color name or a CSS color string
    /// such as `#ff8800`, `#f80`, or `rgb(255, 136, 0)`.
    pub fn from_html(s: &str) -> GdiResult<Self> {
        if let Some(color) = Self::from_name(s) {
            return Ok(color);
        }
        let parsed = csscolorparser::parse(s.trim())
            .map_err(|e| GdiError::invalid_argument("color", format!("{}: {}", s, e)))?;
        let [r, g, b, a] = parsed.to_rgba8();
        Ok(Self::from_argb(a, r, g, b))
    }

    pub const fn to_argb(self) -> u32 {
        self.argb
    }

    pub const fn a(self) -> u8 {
        (self.argb >> 24) as u8
    }

    pub const fn r(self) -> u8 {
        (self.argb >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.argb >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.argb as u8
    }

    /// Lightness in HSL space, 0.0 to 1.0.
    pub fn brightness(self) -> f32 {
        let (max, min) = self.max_min();
        (max as f32 + min as f32) / (255.0 * 2.0)
    }

    /// Saturation in HSL space, 0.0 to 1.0.
    pub fn saturation(self) -> f32 {
        let (max, min) = self.max_min();
        if max == min {
            return 0.0;
        }
        let max = max as f32 / 255.0;
        let min = min as f32 / 255.0;
        let l = (max + min) / 2.0;
        if l <= 0.5 {
            (max - min) / (max + min)
        } else {
            (max - min) / (2.0 - max - min)
        }
    }

    /// Hue in degrees, 0.0 to 360.0. Grays have hue 0.
    pub fn hue(self) -> f32 {
        let (r, g, b) = (self.r(), self.g(), self.b());
        if r == g && g == b {
            return 0.0;
        }
        let (max, min) = self.max_min();
        let delta = (max - min) as f32;
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let max = max as f32;

        let mut hue = if r == max {
            (g - b) / delta
        } else if g == max {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        hue *= 60.0;
        if hue < 0.0 {
            hue += 360.0;
        }
        hue
    }

    fn max_min(self) -> (u8, u8) {
        let (r, g, b) = (self.r(), self.g(), self.b());
        (r.max(g).max(b), r.min(g).min(b))
    }
}

impl From<Color> for tiny_skia::Color {
    fn from(c: Color) -> Self {
        tiny_skia::Color::from_rgba8(c.r(), c.g(), c.b(), c.a())
    }
}
