//! Pixel format registry.
//!
//! Maps the legacy [`PixelFormat`] enumeration to the channel layout the
//! raster engine stores ([`ConcreteLayout`]) and to a byte-per-pixel size.
//! The engine has no 3-byte layout, so `Format24bppRgb` is stored in the
//! same 4-byte `Rgb888x` layout as `Format32bppRgb`. A 24bpp bitmap therefore
//! gains one byte per pixel once it lives in the engine.

use crate::color::Color;
use crate::error::{GdiError, GdiResult};

const INDEXED: u32 = 0x0001_0000;
const GDI: u32 = 0x0002_0000;
const ALPHA: u32 = 0x0004_0000;
const PALPHA: u32 = 0x0008_0000;
const CANONICAL: u32 = 0x0020_0000;

/// Abstract pixel layout.
///
/// Discriminants are the legacy flag-encoded constants: bits 8..16 hold the
/// bit depth, the high bits hold the indexed/alpha/premultiplied flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum PixelFormat {
    #[default]
    Undefined = 0,
    Format8bppIndexed = 3 | (8 << 8) | INDEXED | GDI,
    /// 8-bit luminance. Not part of the legacy set; uses the free index 15.
    Format8bppGrayscale = 15 | (8 << 8),
    Format16bppRgb565 = 6 | (16 << 8) | GDI,
    Format24bppRgb = 8 | (24 << 8) | GDI,
    Format32bppRgb = 9 | (32 << 8) | GDI,
    Format32bppArgb = 10 | (32 << 8) | ALPHA | GDI | CANONICAL,
    Format32bppPArgb = 11 | (32 << 8) | ALPHA | PALPHA | GDI,
}

/// Engine channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorType {
    /// Bytes B, G, R, A.
    Bgra8888,
    /// Bytes R, G, B, then one ignored byte.
    Rgb888x,
    /// Little-endian 16-bit word, 5 bits red, 6 green, 5 blue.
    Rgb565,
    /// One luminance byte.
    Gray8,
}

/// Engine alpha interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaType {
    Opaque,
    Premul,
    Unpremul,
}

/// A concrete engine layout: channel order plus alpha interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConcreteLayout {
    pub color_type: ColorType,
    pub alpha_type: AlphaType,
}

impl PixelFormat {
    /// All defined formats, `Undefined` first.
    pub const ALL: [PixelFormat; 8] = [
        PixelFormat::Undefined,
        PixelFormat::Format8bppIndexed,
        PixelFormat::Format8bppGrayscale,
        PixelFormat::Format16bppRgb565,
        PixelFormat::Format24bppRgb,
        PixelFormat::Format32bppRgb,
        PixelFormat::Format32bppArgb,
        PixelFormat::Format32bppPArgb,
    ];

    /// The numeric identity of this format.
    pub const fn to_raw(self) -> u32 {
        self as u32
    }

    /// Look up a format by its numeric identity.
    pub fn from_raw(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.to_raw() == value)
    }

    /// Bit depth encoded in the format value. Zero for `Undefined`.
    pub const fn bits_per_pixel(self) -> u32 {
        (self as u32 >> 8) & 0xFF
    }

    pub const fn has_alpha(self) -> bool {
        self as u32 & ALPHA != 0
    }

    pub const fn is_premultiplied(self) -> bool {
        self as u32 & PALPHA != 0
    }

    pub const fn is_indexed(self) -> bool {
        self as u32 & INDEXED != 0
    }

    /// Bytes per pixel of the abstract format.
    pub fn bytes_per_pixel(self) -> GdiResult<usize> {
        match self.bits_per_pixel() {
            0 => Err(GdiError::UnsupportedFormat(self)),
            bits => Ok((bits / 8) as usize),
        }
    }

    /// Bytes per pixel for address arithmetic in a lock.
    ///
    /// Formats without a size use 4 so the computed offset never under-steps.
    pub(crate) fn lock_bytes_per_pixel(self) -> usize {
        self.bytes_per_pixel().unwrap_or(4)
    }

    /// The engine layout backing this format.
    pub fn to_concrete_layout(self) -> GdiResult<ConcreteLayout> {
        let (color_type, alpha_type) = match self {
            PixelFormat::Undefined => return Err(GdiError::UnsupportedFormat(self)),
            PixelFormat::Format8bppIndexed | PixelFormat::Format8bppGrayscale => {
                (ColorType::Gray8, AlphaType::Opaque)
            }
            PixelFormat::Format16bppRgb565 => (ColorType::Rgb565, AlphaType::Opaque),
            PixelFormat::Format24bppRgb | PixelFormat::Format32bppRgb => {
                (ColorType::Rgb888x, AlphaType::Opaque)
            }
            PixelFormat::Format32bppArgb => (ColorType::Bgra8888, AlphaType::Unpremul),
            PixelFormat::Format32bppPArgb => (ColorType::Bgra8888, AlphaType::Premul),
        };
        Ok(ConcreteLayout {
            color_type,
            alpha_type,
        })
    }

    /// The canonical format for an engine layout.
    ///
    /// `Rgb888x` maps back to `Format32bppRgb` and `Gray8` to
    /// `Format8bppGrayscale`; the 24bpp and indexed origins are not recoverable.
    pub fn from_concrete_layout(layout: ConcreteLayout) -> Self {
        match (layout.color_type, layout.alpha_type) {
            (ColorType::Bgra8888, AlphaType::Unpremul) => PixelFormat::Format32bppArgb,
            (ColorType::Bgra8888, AlphaType::Premul) => PixelFormat::Format32bppPArgb,
            (ColorType::Bgra8888, AlphaType::Opaque) | (ColorType::Rgb888x, _) => {
                PixelFormat::Format32bppRgb
            }
            (ColorType::Rgb565, _) => PixelFormat::Format16bppRgb565,
            (ColorType::Gray8, _) => PixelFormat::Format8bppGrayscale,
        }
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = GdiError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_raw(value).ok_or_else(|| {
            GdiError::invalid_argument("format", format!("unknown value {value:#x}"))
        })
    }
}

impl ConcreteLayout {
    /// Bytes one pixel occupies in engine memory.
    pub const fn bytes_per_pixel(&self) -> usize {
        match self.color_type {
            ColorType::Bgra8888 | ColorType::Rgb888x => 4,
            ColorType::Rgb565 => 2,
            ColorType::Gray8 => 1,
        }
    }

    /// Decode one pixel. `px` holds at least [`Self::bytes_per_pixel`] bytes.
    pub(crate) fn read_color(&self, px: &[u8]) -> Color {
        match self.color_type {
            ColorType::Bgra8888 => {
                let (b, g, r, a) = (px[0], px[1], px[2], px[3]);
                match self.alpha_type {
                    AlphaType::Premul => {
                        let (r, g, b) = unpremultiply(r, g, b, a);
                        Color::from_argb(a, r, g, b)
                    }
                    AlphaType::Unpremul => Color::from_argb(a, r, g, b),
                    AlphaType::Opaque => Color::from_rgb(r, g, b),
                }
            }
            ColorType::Rgb888x => Color::from_rgb(px[0], px[1], px[2]),
            ColorType::Rgb565 => {
                let word = u16::from_le_bytes([px[0], px[1]]);
                let r5 = ((word >> 11) & 0x1F) as u8;
                let g6 = ((word >> 5) & 0x3F) as u8;
                let b5 = (word & 0x1F) as u8;
                Color::from_rgb(
                    (r5 << 3) | (r5 >> 2),
                    (g6 << 2) | (g6 >> 4),
                    (b5 << 3) | (b5 >> 2),
                )
            }
            ColorType::Gray8 => Color::from_rgb(px[0], px[0], px[0]),
        }
    }

    /// Encode one pixel. `px` holds at least [`Self::bytes_per_pixel`] bytes.
    pub(crate) fn write_color(&self, px: &mut [u8], color: Color) {
        let (a, r, g, b) = (color.a(), color.r(), color.g(), color.b());
        match self.color_type {
            ColorType::Bgra8888 => {
                let (r, g, b, a) = match self.alpha_type {
                    AlphaType::Premul => {
                        let (pr, pg, pb) = premultiply(r, g, b, a);
                        (pr, pg, pb, a)
                    }
                    AlphaType::Unpremul => (r, g, b, a),
                    AlphaType::Opaque => (r, g, b, 255),
                };
                px[..4].copy_from_slice(&[b, g, r, a]);
            }
            ColorType::Rgb888x => px[..4].copy_from_slice(&[r, g, b, 255]),
            ColorType::Rgb565 => {
                let word = ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3);
                px[..2].copy_from_slice(&word.to_le_bytes());
            }
            ColorType::Gray8 => px[0] = luminance(r, g, b),
        }
    }
}

/// Premultiply color channels by alpha with rounding.
pub(crate) fn premultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8) {
    if a == 255 {
        (r, g, b)
    } else if a == 0 {
        (0, 0, 0)
    } else {
        let a16 = a as u16;
        (
            ((r as u16 * a16 + 127) / 255) as u8,
            ((g as u16 * a16 + 127) / 255) as u8,
            ((b as u16 * a16 + 127) / 255) as u8,
        )
    }
}

/// Undo [`premultiply`]. Fully transparent pixels become black.
pub(crate) fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8) {
    if a == 255 {
        (r, g, b)
    } else if a == 0 {
        (0, 0, 0)
    } else {
        let alpha_f = a as f32 / 255.0;
        (
            (r as f32 / alpha_f).round().min(255.0) as u8,
            (g as f32 / alpha_f).round().min(255.0) as u8,
            (b as f32 / alpha_f).round().min(255.0) as u8,
        )
    }
}

/// Rec. 601 luma, rounded.
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}
