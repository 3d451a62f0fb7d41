//! Text layout and glyph outlines using cosmic-text.

use crate::font::{Font, FontFamily, LINE_SPACING};
use crate::font_config::{font_config_to_fontdb, FontConfig, ResolvedFontConfig};
use crate::geometry::{PointF, SizeF};
use cosmic_text::{
    Attrs, Buffer, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, Style,
    SwashCache, Weight,
};

/// Shaping state shared by the text calls of one drawing surface.
pub(crate) struct TextSystem {
    font_system: FontSystem,
    swash_cache: SwashCache,
    hinting_enabled: bool,
}

/// A positioned glyph outline in device pixels, plus decoration lines.
pub(crate) struct LaidOutText {
    pub glyphs: Vec<tiny_skia::Path>,
    pub decorations: Vec<tiny_skia::Rect>,
}

impl TextSystem {
    pub(crate) fn from_config(config: &FontConfig) -> Self {
        Self::new(font_config_to_fontdb(config), config.hinting_enabled)
    }

    pub(crate) fn from_resolved(resolved: &ResolvedFontConfig) -> Self {
        Self::new(resolved.fontdb.clone(), resolved.hinting_enabled)
    }

    fn new(db: fontdb::Database, hinting_enabled: bool) -> Self {
        Self {
            font_system: FontSystem::new_with_locale_and_db("en".to_string(), db),
            swash_cache: SwashCache::new(),
            hinting_enabled,
        }
    }

    /// Shape `text`, wrapping at `max_width` when given.
    fn shape(&mut self, text: &str, font: &Font, size_px: f32, max_width: Option<f32>) -> Buffer {
        let metrics = Metrics::new(size_px, size_px * LINE_SPACING);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, max_width, None);

        let family_name = resolve_family_name(&self.font_system, font.family());
        let family = match (font.family(), family_name.as_deref()) {
            (_, Some(name)) => Family::Name(name),
            (FontFamily::GenericSerif, None) => Family::Serif,
            (FontFamily::GenericMonospace, None) => Family::Monospace,
            _ => Family::SansSerif,
        };

        let mut attrs = Attrs::new()
            .family(family)
            .weight(if font.bold() { Weight::BOLD } else { Weight::NORMAL })
            .style(if font.italic() { Style::Italic } else { Style::Normal });
        if !self.hinting_enabled {
            attrs = attrs.cache_key_flags(CacheKeyFlags::DISABLE_HINTING);
        }

        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    /// Size of the laid out text box.
    pub(crate) fn measure(
        &mut self,
        text: &str,
        font: &Font,
        size_px: f32,
        max_width: Option<f32>,
    ) -> SizeF {
        let buffer = self.shape(text, font, size_px, max_width);
        measure_buffer(&buffer, size_px)
    }

    /// Lay out `text` with its upper-left corner at `origin`.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        font: &Font,
        size_px: f32,
        origin: PointF,
        max_width: Option<f32>,
    ) -> LaidOutText {
        let buffer = self.shape(text, font, size_px, max_width);

        let mut glyphs = Vec::new();
        let mut decorations = Vec::new();
        let thickness = (size_px / 14.0).max(1.0);

        for run in buffer.layout_runs() {
            let baseline = origin.y + run.line_y;
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((origin.x, baseline), 1.0);
                let glyph_x = origin.x + glyph.x + glyph.font_size * glyph.x_offset;
                let glyph_y = baseline + glyph.y - glyph.font_size * glyph.y_offset;

                let Some(commands) = self
                    .swash_cache
                    .get_outline_commands(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };
                // Font outlines are y-up
                let mut pb = tiny_skia::PathBuilder::new();
                for cmd in commands {
                    match cmd {
                        Command::MoveTo(p) => pb.move_to(p.x, -p.y),
                        Command::LineTo(p) => pb.line_to(p.x, -p.y),
                        Command::QuadTo(ctrl, end) => pb.quad_to(ctrl.x, -ctrl.y, end.x, -end.y),
                        Command::CurveTo(c1, c2, end) => {
                            pb.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                        }
                        Command::Close => pb.close(),
                    }
                }
                let placement = tiny_skia::Transform::from_translate(glyph_x, glyph_y);
                if let Some(path) = pb.finish().and_then(|p| p.transform(placement)) {
                    glyphs.push(path);
                }
            }

            if run.line_w > 0.0 {
                if font.underline() {
                    decorations.extend(tiny_skia::Rect::from_xywh(
                        origin.x,
                        baseline + size_px * 0.1,
                        run.line_w,
                        thickness,
                    ));
                }
                if font.strikeout() {
                    decorations.extend(tiny_skia::Rect::from_xywh(
                        origin.x,
                        baseline - size_px * 0.3,
                        run.line_w,
                        thickness,
                    ));
                }
            }
        }

        LaidOutText {
            glyphs,
            decorations,
        }
    }
}

fn measure_buffer(buffer: &Buffer, size_px: f32) -> SizeF {
    let mut width: f32 = 0.0;
    let mut lines = 0usize;
    for run in buffer.layout_runs() {
        width = width.max(run.line_w);
        lines += 1;
    }
    SizeF::new(width, lines as f32 * size_px * LINE_SPACING)
}

/// The installed family to request for `family`, if any.
///
/// Named families match case-insensitively; generic families take the
/// database's configured substitute.
fn resolve_family_name(font_system: &FontSystem, family: &FontFamily) -> Option<String> {
    let db = font_system.db();
    let wanted = match family {
        FontFamily::Named(name) => name.as_str(),
        FontFamily::GenericSansSerif => db.family_name(&fontdb::Family::SansSerif),
        FontFamily::GenericSerif => db.family_name(&fontdb::Family::Serif),
        FontFamily::GenericMonospace => db.family_name(&fontdb::Family::Monospace),
    };
    db.faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name))
        .find(|name| name.eq_ignore_ascii_case(wanted))
        .cloned()
}
