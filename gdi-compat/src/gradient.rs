//! Linear gradient brushes.

use crate::color::Color;
use crate::geometry::{PointF, RectangleF};

/// Preset gradient directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinearGradientMode {
    /// Left to right, 0 degrees.
    #[default]
    Horizontal,
    /// Top to bottom, 90 degrees.
    Vertical,
    /// Upper-left to lower-right, 45 degrees.
    ForwardDiagonal,
    /// Upper-right to lower-left, 135 degrees.
    BackwardDiagonal,
}

impl LinearGradientMode {
    /// The angle, clockwise from the positive x axis, this preset stands for.
    pub fn angle(self) -> f32 {
        match self {
            LinearGradientMode::Horizontal => 0.0,
            LinearGradientMode::Vertical => 90.0,
            LinearGradientMode::ForwardDiagonal => 45.0,
            LinearGradientMode::BackwardDiagonal => 135.0,
        }
    }
}

/// Derive gradient endpoints from a bounding rectangle and an angle in degrees.
///
/// Both endpoints sit `width * sqrt(2) / 2` from the rectangle's center along
/// the angle's direction, `start` on the positive side. The height does not
/// take part. A zero-width rectangle yields `start == end == center`.
pub fn solve_endpoints(rect: RectangleF, angle: f32) -> (PointF, PointF) {
    let center = rect.center();
    let offset = std::f32::consts::FRAC_1_SQRT_2 * rect.width;
    let radians = angle.to_radians();
    let (dx, dy) = (radians.cos() * offset, radians.sin() * offset);
    (
        PointF::new(center.x + dx, center.y + dy),
        PointF::new(center.x - dx, center.y - dy),
    )
}

/// A two-color linear gradient.
///
/// `color1` sits at the start point and `color2` at the end point; beyond the
/// endpoints the edge colors extend. When the endpoints coincide the brush
/// paints `color2`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradientBrush {
    start: PointF,
    end: PointF,
    color1: Color,
    color2: Color,
    rect: RectangleF,
}

impl LinearGradientBrush {
    /// Gradient between two points. The bounding rectangle spans both points.
    pub fn new(start: PointF, end: PointF, color1: Color, color2: Color) -> Self {
        let left = start.x.min(end.x);
        let top = start.y.min(end.y);
        let rect = RectangleF::new(
            left,
            top,
            start.x.max(end.x) - left,
            start.y.max(end.y) - top,
        );
        Self {
            start,
            end,
            color1,
            color2,
            rect,
        }
    }

    /// Gradient across `rect` at `angle` degrees.
    pub fn from_rect_angle(rect: RectangleF, color1: Color, color2: Color, angle: f32) -> Self {
        let (start, end) = solve_endpoints(rect, angle);
        log::debug!(target: "gdi", "gradient {:?} at {}deg: {:?} -> {:?}", rect, angle, start, end);
        Self {
            start,
            end,
            color1,
            color2,
            rect,
        }
    }

    /// Gradient across `rect` in a preset direction.
    pub fn from_rect_mode(
        rect: RectangleF,
        color1: Color,
        color2: Color,
        mode: LinearGradientMode,
    ) -> Self {
        Self::from_rect_angle(rect, color1, color2, mode.angle())
    }

    pub fn start_point(&self) -> PointF {
        self.start
    }

    pub fn end_point(&self) -> PointF {
        self.end
    }

    pub fn set_start_point(&mut self, start: PointF) {
        self.start = start;
    }

    pub fn set_end_point(&mut self, end: PointF) {
        self.end = end;
    }

    /// The colors at the start and end points.
    pub fn colors(&self) -> (Color, Color) {
        (self.color1, self.color2)
    }

    /// The rectangle the gradient was derived from.
    pub fn rectangle(&self) -> RectangleF {
        self.rect
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Build the engine shader.
    pub(crate) fn to_shader(&self) -> tiny_skia::Shader<'static> {
        let fallback = tiny_skia::Shader::SolidColor(self.color2.into());
        if self.is_degenerate() {
            return fallback;
        }
        let stops = vec![
            tiny_skia::GradientStop::new(0.0, self.color1.into()),
            tiny_skia::GradientStop::new(1.0, self.color2.into()),
        ];
        tiny_skia::LinearGradient::new(
            self.start.into(),
            self.end.into(),
            stops,
            tiny_skia::SpreadMode::Pad,
            tiny_skia::Transform::identity(),
        )
        .unwrap_or(fallback)
    }
}
