//! Convenience drawing helpers built on the surface's drawing target.

use super::Graphics;
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::error::GdiResult;
use crate::geometry::{Point, RectangleF};
use crate::gradient::LinearGradientBrush;
use tiny_skia::{BlendMode, FilterQuality, PixmapPaint, Transform};

/// Fill `rect` with a two-color gradient at `angle` degrees.
///
/// Honors the surface's smoothing and compositing modes.
pub fn fill_gradient_rectangle(
    graphics: &mut Graphics,
    rect: RectangleF,
    color1: Color,
    color2: Color,
    angle: f32,
) {
    let Some(skia_rect) = rect.to_skia() else {
        return;
    };
    let brush = LinearGradientBrush::from_rect_angle(rect, color1, color2, angle);
    let paint = graphics.state.paint(brush.to_shader());
    graphics
        .drawing_target()
        .fill_rect(skia_rect, &paint, Transform::identity(), None);
}

/// Copy `source` onto the surface with its top-left pixel at `at`.
///
/// Pixels are replaced, not blended, and never resampled. Parts falling
/// outside the surface are dropped.
pub fn blit_bitmap(graphics: &mut Graphics, source: &Bitmap, at: Point) -> GdiResult<()> {
    let pixmap = source.to_pixmap()?;
    let paint = PixmapPaint {
        blend_mode: BlendMode::Source,
        quality: FilterQuality::Nearest,
        ..Default::default()
    };
    log::debug!(target: "gdi", "blit {}x{} at {:?}", pixmap.width(), pixmap.height(), at);
    graphics.drawing_target().draw_pixmap(
        at.x,
        at.y,
        pixmap.as_ref(),
        &paint,
        Transform::identity(),
        None,
    );
    Ok(())
}
