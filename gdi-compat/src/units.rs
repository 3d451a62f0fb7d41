//! Measurement units and their conversion to device pixels.

use crate::geometry::{PixelRect, RectangleF};

/// Default horizontal and vertical resolution of a bitmap.
pub const DEFAULT_DPI: f32 = 96.0;

/// Unit of measure for coordinates handed to a drawing call.
///
/// Discriminants match the legacy enumeration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsUnit {
    /// World coordinates. Treated as pixels, there is no world transform.
    World = 0,
    /// Display units, one pixel on raster devices.
    Display = 1,
    /// Device pixels.
    #[default]
    Pixel = 2,
    /// Printer's points (1/72 inch).
    Point = 3,
    Inch = 4,
    /// Document units (1/300 inch).
    Document = 5,
    Millimeter = 6,
}

impl GraphicsUnit {
    /// Map a raw legacy value to a unit.
    ///
    /// Values outside the enumeration fall back to [`GraphicsUnit::Pixel`]
    /// instead of failing.
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => GraphicsUnit::World,
            1 => GraphicsUnit::Display,
            3 => GraphicsUnit::Point,
            4 => GraphicsUnit::Inch,
            5 => GraphicsUnit::Document,
            6 => GraphicsUnit::Millimeter,
            _ => GraphicsUnit::Pixel,
        }
    }

    /// Pixels per one unit at the given resolution.
    pub fn scale(self, dpi: f32) -> f32 {
        match self {
            GraphicsUnit::World | GraphicsUnit::Display | GraphicsUnit::Pixel => 1.0,
            GraphicsUnit::Point => dpi / 72.0,
            GraphicsUnit::Inch => dpi,
            GraphicsUnit::Document => dpi / 300.0,
            GraphicsUnit::Millimeter => dpi / 25.4,
        }
    }
}

/// Convert a rectangle in `unit` to device pixels.
///
/// Position and extent are scaled independently and then combined into edges,
/// so `right` is `x * sx + width * sx` rather than `(x + width) * sx`.
/// The caller guarantees `dpi_x > 0` and `dpi_y > 0`.
pub fn convert(rect: RectangleF, unit: GraphicsUnit, dpi_x: f32, dpi_y: f32) -> PixelRect {
    let sx = unit.scale(dpi_x);
    let sy = unit.scale(dpi_y);

    let x = rect.x * sx;
    let y = rect.y * sy;
    let width = rect.width * sx;
    let height = rect.height * sy;

    PixelRect {
        left: x,
        top: y,
        right: x + width,
        bottom: y + height,
    }
}
