//! Text drawing and measurement for Graphics.

use super::Graphics;
use crate::error::{GdiError, GdiResult};
use crate::font::Font;
use crate::geometry::{PointF, RectangleF, SizeF};
use crate::style::Brush;
use tiny_skia::{FillRule, Transform};

impl Graphics<'_> {
    /// Draw `text` with its layout box's upper-left corner at `origin`.
    ///
    /// Line breaks in `text` start new lines. Glyphs missing from every
    /// installed font are skipped.
    pub fn draw_string(&mut self, text: &str, font: &Font, brush: &Brush, origin: PointF) {
        log::debug!(target: "gdi", "drawString \"{}\" {:?}", text, origin);
        self.render_text(text, font, brush, origin, None);
    }

    /// Draw `text` inside `layout`, wrapping lines at its width.
    pub fn draw_string_in_rect(
        &mut self,
        text: &str,
        font: &Font,
        brush: &Brush,
        layout: RectangleF,
    ) -> GdiResult<()> {
        log::debug!(target: "gdi", "drawString \"{}\" in {:?}", text, layout);
        let width = check_layout_width(layout.width)?;
        self.render_text(text, font, brush, PointF::new(layout.x, layout.y), Some(width));
        Ok(())
    }

    /// Size of the box `text` occupies when drawn with `font`.
    pub fn measure_string(&mut self, text: &str, font: &Font) -> SizeF {
        let size_px = font.size_in_pixels(self.dpi_y());
        self.text_system().measure(text, font, size_px, None)
    }

    /// Like [`Graphics::measure_string`], wrapping lines at `max_width`.
    pub fn measure_string_wrapped(
        &mut self,
        text: &str,
        font: &Font,
        max_width: f32,
    ) -> GdiResult<SizeF> {
        let width = check_layout_width(max_width)?;
        let size_px = font.size_in_pixels(self.dpi_y());
        Ok(self.text_system().measure(text, font, size_px, Some(width)))
    }

    fn render_text(
        &mut self,
        text: &str,
        font: &Font,
        brush: &Brush,
        origin: PointF,
        max_width: Option<f32>,
    ) {
        let size_px = font.size_in_pixels(self.dpi_y());
        let laid_out = self
            .text_system()
            .layout(text, font, size_px, origin, max_width);

        let paint = self.state.paint(brush.to_shader());
        let pixmap = self.drawing_target();
        for path in &laid_out.glyphs {
            pixmap.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
        }
        for rect in &laid_out.decorations {
            pixmap.fill_rect(*rect, &paint, Transform::identity(), None);
        }
    }
}

fn check_layout_width(width: f32) -> GdiResult<f32> {
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(GdiError::invalid_argument(
            "width",
            format!("layout width must be positive, got {width}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::error::ErrorKind;
    use crate::font::FontStyle;
    use crate::font_config::{FontConfig, ResolvedFontConfig};
    use crate::units::GraphicsUnit;

    fn no_fonts() -> FontConfig {
        FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        }
    }

    #[test]
    fn test_layout_width_must_be_positive() {
        let mut bitmap = Bitmap::new(10, 10).unwrap();
        let mut g = Graphics::with_config(&mut bitmap, no_fonts()).unwrap();
        let font = Font::new("Arial", 10.0).unwrap();
        let err = g
            .draw_string_in_rect("x", &font, &Brush::default(), RectangleF::new(0.0, 0.0, 0.0, 5.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = g.measure_string_wrapped("x", &font, f32::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_measure_empty_string() {
        let mut bitmap = Bitmap::new(10, 10).unwrap();
        let mut g = Graphics::with_config(&mut bitmap, no_fonts()).unwrap();
        let font = Font::new("Arial", 10.0).unwrap();
        assert_eq!(g.measure_string("", &font).width, 0.0);
    }

    /// System fonts with a common sans-serif face, or `None` when no such
    /// face is installed.
    fn installed_sans() -> Option<(ResolvedFontConfig, &'static str)> {
        let resolved = FontConfig::default().resolve();
        let family = ["DejaVu Sans", "Liberation Sans", "Arial"]
            .into_iter()
            .find(|name| resolved.has_family(name))?;
        Some((resolved, family))
    }

    fn render(
        resolved: &ResolvedFontConfig,
        text: &str,
        font: &Font,
        origin: PointF,
    ) -> (Bitmap, SizeF) {
        let mut bitmap = Bitmap::new(80, 40).unwrap();
        let size = {
            let mut g = Graphics::with_resolved(&mut bitmap, resolved).unwrap();
            g.draw_string(text, font, &Brush::default(), origin);
            g.measure_string(text, font)
        };
        (bitmap, size)
    }

    /// Inked pixel count per row.
    fn ink_per_row(bitmap: &Bitmap) -> Vec<usize> {
        (0..bitmap.height().unwrap() as i32)
            .map(|y| {
                (0..bitmap.width().unwrap() as i32)
                    .filter(|&x| bitmap.get_pixel(x, y).unwrap().a() > 0)
                    .count()
            })
            .collect()
    }

    #[test]
    fn test_draw_string_inks_inside_measured_box() {
        let Some((resolved, family)) = installed_sans() else {
            return;
        };
        let font = Font::with_style(family, 20.0, FontStyle::REGULAR, GraphicsUnit::Pixel).unwrap();
        let origin = PointF::new(4.0, 4.0);
        let (bitmap, size) = render(&resolved, "Hg", &font, origin);

        assert!(size.width > 10.0 && size.width < 60.0, "{size:?}");
        assert!((size.height - 24.0).abs() < 1e-3, "{size:?}");

        let mut inked = 0;
        for y in 0..40 {
            for x in 0..80 {
                if bitmap.get_pixel(x, y).unwrap().a() == 0 {
                    continue;
                }
                inked += 1;
                let (x, y) = (x as f32, y as f32);
                assert!(x >= origin.x - 1.0 && x < origin.x + size.width + 1.0, "x {x}");
                assert!(y >= origin.y - 1.0 && y < origin.y + size.height + 1.0, "y {y}");
            }
        }
        assert!(inked > 50, "only {inked} pixels inked");
    }

    #[test]
    fn test_underline_inks_a_row_below_the_baseline() {
        let Some((resolved, family)) = installed_sans() else {
            return;
        };
        let origin = PointF::new(4.0, 4.0);
        let regular =
            Font::with_style(family, 20.0, FontStyle::REGULAR, GraphicsUnit::Pixel).unwrap();
        let underlined =
            Font::with_style(family, 20.0, FontStyle::UNDERLINE, GraphicsUnit::Pixel).unwrap();

        // "H" sits on the baseline, so its lowest inked row is just above it
        let (stem, _) = render(&resolved, "H", &regular, origin);
        let baseline = ink_per_row(&stem)
            .iter()
            .rposition(|&count| count > 0)
            .unwrap();

        let (plain, size) = render(&resolved, "Hg", &regular, origin);
        let (lined, _) = render(&resolved, "Hg", &underlined, origin);
        let wide = (size.width * 0.8) as usize;

        assert!(ink_per_row(&plain).iter().all(|&count| count < wide));
        let rows: Vec<usize> = ink_per_row(&lined)
            .iter()
            .enumerate()
            .filter(|(_, count)| **count >= wide)
            .map(|(y, _)| y)
            .collect();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|&y| y > baseline), "{rows:?} vs baseline {baseline}");
    }
}
