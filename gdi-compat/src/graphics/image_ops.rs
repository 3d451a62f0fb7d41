//! Image drawing operations for Graphics.

use super::Graphics;
use crate::bitmap::Bitmap;
use crate::error::GdiResult;
use crate::geometry::{PixelRect, PointF, RectangleF};
use crate::units::{convert, GraphicsUnit};
use tiny_skia::{Pattern, PixmapRef, Rect, SpreadMode, Transform};

impl Graphics<'_> {
    /// Draw `image` at its physical size.
    ///
    /// The image is scaled by the ratio of the surface resolution to the
    /// image resolution, so a 96 dpi image on a 192 dpi surface doubles.
    pub fn draw_image(&mut self, image: &Bitmap, point: PointF) -> GdiResult<()> {
        let width = image.width()? as f32 * self.dpi_x() / image.horizontal_resolution()?;
        let height = image.height()? as f32 * self.dpi_y() / image.vertical_resolution()?;
        self.draw_image_rect(image, RectangleF::new(point.x, point.y, width, height))
    }

    /// Draw `image` one image pixel per surface pixel.
    pub fn draw_image_unscaled(&mut self, image: &Bitmap, point: PointF) -> GdiResult<()> {
        let width = image.width()? as f32;
        let height = image.height()? as f32;
        self.draw_image_rect(image, RectangleF::new(point.x, point.y, width, height))
    }

    /// Draw `image` stretched over `dest`, in pixels.
    pub fn draw_image_rect(&mut self, image: &Bitmap, dest: RectangleF) -> GdiResult<()> {
        self.draw_image_in_unit(image, dest, GraphicsUnit::Pixel)
    }

    /// Draw `image` stretched over `dest` given in `unit`.
    ///
    /// `dest` is converted to pixels with the surface resolution.
    pub fn draw_image_in_unit(
        &mut self,
        image: &Bitmap,
        dest: RectangleF,
        unit: GraphicsUnit,
    ) -> GdiResult<()> {
        let dest = convert(dest, unit, self.dpi_x(), self.dpi_y());
        log::debug!(target: "gdi", "drawImage {:?} in {:?}", dest, unit);
        let source = image.to_pixmap()?;
        self.draw_pixmap_scaled(source.as_ref(), dest);
        Ok(())
    }

    /// Draw the `src` part of `image` stretched over `dest`, in pixels.
    ///
    /// `src` is given in `src_unit` and converted to image pixels with the
    /// image's own resolution. Parts of `src` outside the image are clipped.
    pub fn draw_image_part(
        &mut self,
        image: &Bitmap,
        dest: RectangleF,
        src: RectangleF,
        src_unit: GraphicsUnit,
    ) -> GdiResult<()> {
        let src = convert(
            src,
            src_unit,
            image.horizontal_resolution()?,
            image.vertical_resolution()?,
        );
        let dest = convert(dest, GraphicsUnit::Pixel, self.dpi_x(), self.dpi_y());
        log::debug!(target: "gdi", "drawImage part {:?} -> {:?}", src, dest);
        let source = image.to_pixmap()?;
        if src.width() <= 0.0 || src.height() <= 0.0 {
            return Ok(());
        }

        // Source to destination mapping, applied to the whole source rect
        let sx = dest.width() / src.width();
        let sy = dest.height() / src.height();
        let transform = Transform::from_translate(dest.left, dest.top)
            .pre_scale(sx, sy)
            .pre_translate(-src.left, -src.top);

        // Only the part of the source inside the image is drawn
        let left = src.left.max(0.0);
        let top = src.top.max(0.0);
        let right = src.right.min(source.width() as f32);
        let bottom = src.bottom.min(source.height() as f32);
        if right <= left || bottom <= top {
            return Ok(());
        }
        let Some(area) = Rect::from_ltrb(
            dest.left + (left - src.left) * sx,
            dest.top + (top - src.top) * sy,
            dest.left + (right - src.left) * sx,
            dest.top + (bottom - src.top) * sy,
        ) else {
            return Ok(());
        };

        let shader = Pattern::new(
            source.as_ref(),
            SpreadMode::Pad,
            self.state.interpolation_mode.into(),
            1.0,
            transform,
        );
        let paint = self.state.paint(shader);
        self.drawing_target()
            .fill_rect(area, &paint, Transform::identity(), None);
        Ok(())
    }

    fn draw_pixmap_scaled(&mut self, pixmap: PixmapRef, dest: PixelRect) {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let paint = self.state.pixmap_paint();
        let transform = Transform::from_translate(dest.left, dest.top).pre_scale(
            dest.width() / pixmap.width() as f32,
            dest.height() / pixmap.height() as f32,
        );
        self.drawing_target()
            .draw_pixmap(0, 0, pixmap, &paint, transform, None);
    }
}
