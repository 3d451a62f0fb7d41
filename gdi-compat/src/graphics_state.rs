//! Rendering state that can be saved and restored.

use crate::style::{CompositingMode, InterpolationMode, SmoothingMode};

/// Rendering state of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphicsState {
    /// Anti-aliasing of shapes and lines.
    pub smoothing_mode: SmoothingMode,
    /// Resampling filter for scaled images.
    pub interpolation_mode: InterpolationMode,
    /// Blending of drawn pixels with the surface.
    pub compositing_mode: CompositingMode,
}

/// Token returned by `Graphics::save`, consumed by `Graphics::restore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphicsStateToken(pub(crate) usize);

impl GraphicsState {
    pub(crate) fn paint<'a>(&self, shader: tiny_skia::Shader<'a>) -> tiny_skia::Paint<'a> {
        tiny_skia::Paint {
            shader,
            anti_alias: self.smoothing_mode.anti_alias(),
            blend_mode: self.compositing_mode.into(),
            ..Default::default()
        }
    }

    pub(crate) fn pixmap_paint(&self) -> tiny_skia::PixmapPaint {
        tiny_skia::PixmapPaint {
            blend_mode: self.compositing_mode.into(),
            quality: self.interpolation_mode.into(),
            ..Default::default()
        }
    }
}
