//! Legacy GDI+ style 2D imaging API on top of tiny-skia.
//!
//! This crate re-exposes the bitmap, drawing surface, brush, font, and codec
//! surface of the classic immediate-mode imaging API. It uses:
//! - `tiny-skia` for rasterization
//! - `cosmic-text` and `fontdb` for text shaping and font discovery
//! - `image` and `png` for decoding and encoding
//!
//! Bitmaps own their pixels in one of the legacy [`PixelFormat`]s. Raw pixel
//! memory can be copied in with [`Bitmap::from_raw`] and accessed in place
//! through [`Bitmap::lock_bits`].
//!
//! # Example
//!
//! ```rust,no_run
//! use gdi_compat::{Bitmap, Color, Graphics, ImageFormat, LinearGradientBrush, RectangleF};
//!
//! # fn main() -> gdi_compat::GdiResult<()> {
//! let mut bitmap = Bitmap::new(200, 100)?;
//! {
//!     let mut g = Graphics::from_image(&mut bitmap)?;
//!     g.clear(Color::WHITE);
//!     let rect = RectangleF::new(10.0, 10.0, 180.0, 80.0);
//!     let brush = LinearGradientBrush::from_rect_angle(rect, Color::RED, Color::BLUE, 45.0);
//!     g.fill_rectangle(&brush.into(), rect);
//! }
//! bitmap.save("out.png", ImageFormat::Png)?;
//! # Ok(())
//! # }
//! ```

mod bitmap;
mod bitmap_data;
mod codec;
mod color;
mod error;
mod font;
mod font_config;
mod geometry;
mod gradient;
pub mod graphics;
mod graphics_state;
mod known_colors;
mod pixel_format;
mod style;
mod text;
mod units;

// Re-export public API
pub use bitmap::{Bitmap, MAX_DIMENSION};
pub use bitmap_data::{BitmapData, ImageLockMode};
pub use codec::{EncoderParameters, ImageFormat};
pub use color::Color;
pub use error::{ErrorKind, GdiError, GdiResult};
pub use font::{Font, FontFamily, FontStyle};
pub use font_config::{
    font_config_to_fontdb, CustomFont, FontConfig, GenericFamilyMap, ResolvedFontConfig,
};
pub use geometry::{PixelRect, Point, PointF, Rectangle, RectangleF, Size, SizeF};
pub use gradient::{solve_endpoints, LinearGradientBrush, LinearGradientMode};
pub use graphics::Graphics;
pub use graphics_state::{GraphicsState, GraphicsStateToken};
pub use pixel_format::{AlphaType, ColorType, ConcreteLayout, PixelFormat};
pub use style::{
    Brush, CompositingMode, DashStyle, InterpolationMode, LineCap, LineJoin, Pen, SmoothingMode,
    SolidBrush,
};
pub use units::{convert, GraphicsUnit, DEFAULT_DPI};
