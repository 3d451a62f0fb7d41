//! Shape filling and stroking for Graphics.

use super::Graphics;
use crate::color::Color;
use crate::error::{GdiError, GdiResult};
use crate::geometry::{PointF, RectangleF};
use crate::style::{Brush, Pen};
use tiny_skia::{FillRule, Path, PathBuilder, Transform};

impl Graphics<'_> {
    /// Replace every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        log::debug!(target: "gdi", "clear {:#010x}", color.to_argb());
        self.drawing_target().fill(color.into());
    }

    pub fn fill_rectangle(&mut self, brush: &Brush, rect: RectangleF) {
        log::debug!(target: "gdi", "fillRectangle {:?}", rect);
        if let Some(rect) = rect.to_skia() {
            let paint = self.state.paint(brush.to_shader());
            self.drawing_target()
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    pub fn draw_rectangle(&mut self, pen: &Pen, rect: RectangleF) {
        log::debug!(target: "gdi", "drawRectangle {:?}", rect);
        if let Some(rect) = rect.to_skia() {
            self.stroke_path(&PathBuilder::from_rect(rect), pen);
        }
    }

    /// Fill the ellipse inscribed in `rect`.
    pub fn fill_ellipse(&mut self, brush: &Brush, rect: RectangleF) {
        log::debug!(target: "gdi", "fillEllipse {:?}", rect);
        if let Some(path) = rect.to_skia().and_then(PathBuilder::from_oval) {
            self.fill_path(&path, brush);
        }
    }

    /// Outline the ellipse inscribed in `rect`.
    pub fn draw_ellipse(&mut self, pen: &Pen, rect: RectangleF) {
        log::debug!(target: "gdi", "drawEllipse {:?}", rect);
        if let Some(path) = rect.to_skia().and_then(PathBuilder::from_oval) {
            self.stroke_path(&path, pen);
        }
    }

    pub fn draw_line(&mut self, pen: &Pen, from: PointF, to: PointF) {
        log::debug!(target: "gdi", "drawLine {:?} {:?}", from, to);
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        if let Some(path) = pb.finish() {
            self.stroke_path(&path, pen);
        }
    }

    /// Stroke a connected series of line segments.
    pub fn draw_lines(&mut self, pen: &Pen, points: &[PointF]) -> GdiResult<()> {
        let path = polyline(points, false)?;
        self.stroke_path(&path, pen);
        Ok(())
    }

    /// Fill the polygon through `points` with the alternate (even-odd) rule.
    pub fn fill_polygon(&mut self, brush: &Brush, points: &[PointF]) -> GdiResult<()> {
        let path = polyline(points, true)?;
        let paint = self.state.paint(brush.to_shader());
        self.drawing_target()
            .fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
        Ok(())
    }

    pub fn draw_polygon(&mut self, pen: &Pen, points: &[PointF]) -> GdiResult<()> {
        let path = polyline(points, true)?;
        self.stroke_path(&path, pen);
        Ok(())
    }

    pub(crate) fn fill_path(&mut self, path: &Path, brush: &Brush) {
        let paint = self.state.paint(brush.to_shader());
        self.drawing_target()
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    pub(crate) fn stroke_path(&mut self, path: &Path, pen: &Pen) {
        let paint = self.state.paint(pen.brush.to_shader());
        let stroke = pen.to_stroke();
        self.drawing_target()
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }
}

fn polyline(points: &[PointF], close: bool) -> GdiResult<Path> {
    if points.len() < 2 {
        return Err(GdiError::invalid_argument(
            "points",
            format!("at least 2 points required, got {}", points.len()),
        ));
    }
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].x, points[0].y);
    for p in &points[1..] {
        pb.line_to(p.x, p.y);
    }
    if close {
        pb.close();
    }
    pb.finish().ok_or_else(|| {
        GdiError::invalid_argument("points", "points do not form a drawable path")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::error::ErrorKind;
    use crate::gradient::LinearGradientBrush;
    use crate::style::{CompositingMode, SmoothingMode};

    fn draw(width: u32, height: u32, f: impl FnOnce(&mut Graphics)) -> Bitmap {
        let mut bitmap = Bitmap::new(width, height).unwrap();
        {
            let mut g = Graphics::from_image(&mut bitmap).unwrap();
            f(&mut g);
        }
        bitmap
    }

    #[test]
    fn test_fill_rectangle_covers_pixels() {
        let bitmap = draw(10, 10, |g| {
            g.fill_rectangle(&Color::RED.into(), RectangleF::new(2.0, 2.0, 4.0, 4.0));
        });
        assert_eq!(bitmap.get_pixel(3, 3).unwrap(), Color::RED);
        assert_eq!(bitmap.get_pixel(5, 5).unwrap(), Color::RED);
        assert_eq!(bitmap.get_pixel(6, 6).unwrap().a(), 0);
        assert_eq!(bitmap.get_pixel(1, 1).unwrap().a(), 0);
    }

    #[test]
    fn test_empty_rectangle_is_ignored() {
        let bitmap = draw(4, 4, |g| {
            g.fill_rectangle(&Color::RED.into(), RectangleF::new(1.0, 1.0, 0.0, 2.0));
        });
        assert_eq!(bitmap.get_pixel(1, 1).unwrap().a(), 0);
    }

    #[test]
    fn test_source_copy_replaces_alpha() {
        let bitmap = draw(4, 4, |g| {
            g.clear(Color::WHITE);
            g.set_compositing_mode(CompositingMode::SourceCopy);
            g.fill_rectangle(
                &Color::from_argb(0, 0, 0, 0).into(),
                RectangleF::new(0.0, 0.0, 2.0, 4.0),
            );
        });
        assert_eq!(bitmap.get_pixel(0, 0).unwrap().a(), 0);
        assert_eq!(bitmap.get_pixel(3, 0).unwrap(), Color::WHITE);
    }

    #[test]
    fn test_draw_line_hits_pixels() {
        let bitmap = draw(10, 10, |g| {
            g.draw_line(
                &Pen::new(Color::BLUE, 2.0),
                PointF::new(0.0, 5.0),
                PointF::new(10.0, 5.0),
            );
        });
        assert_eq!(bitmap.get_pixel(5, 4).unwrap(), Color::BLUE);
        assert_eq!(bitmap.get_pixel(5, 5).unwrap(), Color::BLUE);
        assert_eq!(bitmap.get_pixel(5, 0).unwrap().a(), 0);
    }

    #[test]
    fn test_fill_ellipse_center_not_corner() {
        let bitmap = draw(20, 20, |g| {
            g.set_smoothing_mode(SmoothingMode::AntiAlias);
            g.fill_ellipse(&Color::LIME.into(), RectangleF::new(0.0, 0.0, 20.0, 20.0));
        });
        assert_eq!(bitmap.get_pixel(10, 10).unwrap(), Color::LIME);
        assert_eq!(bitmap.get_pixel(0, 0).unwrap().a(), 0);
    }

    #[test]
    fn test_polygon_needs_two_points() {
        let mut bitmap = Bitmap::new(4, 4).unwrap();
        let mut g = Graphics::from_image(&mut bitmap).unwrap();
        let err = g
            .fill_polygon(&Color::RED.into(), &[PointF::new(1.0, 1.0)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(g.draw_lines(&Pen::default(), &[]).is_err());
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let bitmap = draw(10, 10, |g| {
            g.fill_polygon(
                &Color::RED.into(),
                &[
                    PointF::new(0.0, 0.0),
                    PointF::new(10.0, 0.0),
                    PointF::new(0.0, 10.0),
                ],
            )
            .unwrap();
        });
        assert_eq!(bitmap.get_pixel(1, 1).unwrap(), Color::RED);
        assert_eq!(bitmap.get_pixel(8, 8).unwrap().a(), 0);
    }

    #[test]
    fn test_gradient_fill_runs_between_colors() {
        let rect = RectangleF::new(0.0, 0.0, 100.0, 10.0);
        let brush = LinearGradientBrush::new(
            PointF::new(0.0, 0.0),
            PointF::new(100.0, 0.0),
            Color::RED,
            Color::BLUE,
        );
        let bitmap = draw(100, 10, |g| g.fill_rectangle(&brush.clone().into(), rect));
        let left = bitmap.get_pixel(0, 5).unwrap();
        let right = bitmap.get_pixel(99, 5).unwrap();
        assert!(left.r() > 240 && left.b() < 15, "{left:?}");
        assert!(right.b() > 240 && right.r() < 15, "{right:?}");
    }

    #[test]
    fn test_degenerate_gradient_fills_last_color() {
        let brush = LinearGradientBrush::from_rect_angle(
            RectangleF::new(0.0, 0.0, 0.0, 10.0),
            Color::RED,
            Color::BLUE,
            45.0,
        );
        let bitmap = draw(4, 4, |g| {
            g.fill_rectangle(&brush.clone().into(), RectangleF::new(0.0, 0.0, 4.0, 4.0))
        });
        assert_eq!(bitmap.get_pixel(2, 2).unwrap(), Color::BLUE);
    }
}
