//! Brushes, pens, and rendering modes.

use crate::color::Color;
use crate::gradient::LinearGradientBrush;

/// A single-color brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidBrush {
    pub color: Color,
}

impl SolidBrush {
    pub const fn new(color: Color) -> Self {
        Self { color }
    }
}

/// Fill style for shapes, text, and pens.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    /// Solid color fill.
    Solid(SolidBrush),
    /// Two-color linear gradient fill.
    LinearGradient(LinearGradientBrush),
}

impl Brush {
    pub(crate) fn to_shader(&self) -> tiny_skia::Shader<'static> {
        match self {
            Brush::Solid(brush) => tiny_skia::Shader::SolidColor(brush.color.into()),
            Brush::LinearGradient(brush) => brush.to_shader(),
        }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Brush::Solid(SolidBrush::new(Color::BLACK))
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::Solid(SolidBrush::new(color))
    }
}

impl From<SolidBrush> for Brush {
    fn from(brush: SolidBrush) -> Self {
        Brush::Solid(brush)
    }
}

impl From<LinearGradientBrush> for Brush {
    fn from(brush: LinearGradientBrush) -> Self {
        Brush::LinearGradient(brush)
    }
}

/// Line cap style, applied to both ends of an open line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Flat,
    /// Rounded edge extending past the endpoint.
    Round,
    /// Square edge extending past the endpoint.
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Flat => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

/// Dash pattern of a pen.
///
/// Preset segment lengths are multiples of the pen width.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
    /// Alternating dash and gap lengths, in multiples of the pen width.
    Custom(Vec<f32>),
}

impl DashStyle {
    fn pattern(&self) -> Option<Vec<f32>> {
        match self {
            DashStyle::Solid => None,
            DashStyle::Dash => Some(vec![3.0, 1.0]),
            DashStyle::Dot => Some(vec![1.0, 1.0]),
            DashStyle::DashDot => Some(vec![3.0, 1.0, 1.0, 1.0]),
            DashStyle::DashDotDot => Some(vec![3.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
            DashStyle::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

/// Outline style: a brush plus stroke geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub brush: Brush,
    pub width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub dash_style: DashStyle,
    /// Dash phase, in multiples of the pen width.
    pub dash_offset: f32,
}

impl Pen {
    pub fn new(color: Color, width: f32) -> Self {
        Self::with_brush(Brush::from(color), width)
    }

    pub fn with_brush(brush: Brush, width: f32) -> Self {
        Self {
            brush,
            width,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            dash_style: DashStyle::default(),
            dash_offset: 0.0,
        }
    }

    /// Stroke geometry for the engine.
    ///
    /// Widths below one pixel stroke as hairlines. Dash patterns the engine
    /// rejects (odd length, all zero, negative) fall back to a solid line.
    pub(crate) fn to_stroke(&self) -> tiny_skia::Stroke {
        let width = if self.width.is_finite() { self.width.max(0.0) } else { 0.0 };
        let unit = width.max(1.0);
        let dash = self.dash_style.pattern().and_then(|pattern| {
            let scaled: Vec<f32> = pattern.iter().map(|len| len * unit).collect();
            tiny_skia::StrokeDash::new(scaled, self.dash_offset * unit)
        });
        tiny_skia::Stroke {
            width,
            miter_limit: self.miter_limit,
            line_cap: self.line_cap.into(),
            line_join: self.line_join.into(),
            dash,
        }
    }
}

impl Default for Pen {
    fn default() -> Self {
        Pen::new(Color::BLACK, 1.0)
    }
}

/// Anti-aliasing of lines, curves, and filled edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingMode {
    #[default]
    Default,
    HighSpeed,
    HighQuality,
    None,
    AntiAlias,
}

impl SmoothingMode {
    pub fn anti_alias(self) -> bool {
        matches!(self, SmoothingMode::HighQuality | SmoothingMode::AntiAlias)
    }
}

/// Resampling filter used when images are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    #[default]
    Default,
    Low,
    High,
    Bilinear,
    Bicubic,
    NearestNeighbor,
    HighQualityBilinear,
    HighQualityBicubic,
}

impl From<InterpolationMode> for tiny_skia::FilterQuality {
    fn from(mode: InterpolationMode) -> Self {
        match mode {
            InterpolationMode::NearestNeighbor => tiny_skia::FilterQuality::Nearest,
            InterpolationMode::Default
            | InterpolationMode::Low
            | InterpolationMode::Bilinear
            | InterpolationMode::HighQualityBilinear => tiny_skia::FilterQuality::Bilinear,
            InterpolationMode::High
            | InterpolationMode::Bicubic
            | InterpolationMode::HighQualityBicubic => tiny_skia::FilterQuality::Bicubic,
        }
    }
}

/// How drawn pixels combine with the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositingMode {
    /// Blend over existing pixels.
    #[default]
    SourceOver,
    /// Replace existing pixels, alpha included.
    SourceCopy,
}

impl From<CompositingMode> for tiny_skia::BlendMode {
    fn from(mode: CompositingMode) -> Self {
        match mode {
            CompositingMode::SourceOver => tiny_skia::BlendMode::SourceOver,
            CompositingMode::SourceCopy => tiny_skia::BlendMode::Source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_defaults() {
        let pen = Pen::default();
        assert_eq!(pen.brush, Brush::Solid(SolidBrush::new(Color::BLACK)));
        let stroke = pen.to_stroke();
        assert_eq!(stroke.width, 1.0);
        assert!(stroke.dash.is_none());
    }

    #[test]
    fn test_dash_scales_with_width() {
        let mut pen = Pen::new(Color::RED, 4.0);
        pen.dash_style = DashStyle::Dash;
        assert!(pen.to_stroke().dash.is_some());

        // Odd-length patterns are rejected by the engine
        pen.dash_style = DashStyle::Custom(vec![2.0]);
        assert!(pen.to_stroke().dash.is_none());
    }

    #[test]
    fn test_negative_width_clamps() {
        let pen = Pen::new(Color::RED, -3.0);
        assert_eq!(pen.to_stroke().width, 0.0);
    }

    #[test]
    fn test_mode_mappings() {
        assert!(!SmoothingMode::Default.anti_alias());
        assert!(SmoothingMode::AntiAlias.anti_alias());
        assert_eq!(
            tiny_skia::FilterQuality::from(InterpolationMode::NearestNeighbor),
            tiny_skia::FilterQuality::Nearest
        );
        assert_eq!(
            tiny_skia::BlendMode::from(CompositingMode::SourceCopy),
            tiny_skia::BlendMode::Source
        );
    }
}
