//! Drawing surface bound to a bitmap.

mod drawing;
pub mod extensions;
mod image_ops;
mod text_rendering;

use crate::bitmap::Bitmap;
use crate::error::{GdiError, GdiResult};
use crate::font_config::{FontConfig, ResolvedFontConfig};
use crate::graphics_state::{GraphicsState, GraphicsStateToken};
use crate::style::{CompositingMode, InterpolationMode, SmoothingMode};
use crate::text::TextSystem;
use tiny_skia::Pixmap;

/// An immediate-mode drawing surface over a [`Bitmap`].
///
/// Drawing happens on an engine pixmap copied from the bitmap. Pixels that
/// changed are written back by [`Graphics::flush`] and when the surface is
/// dropped; untouched pixels keep their stored value. The
/// surface borrows the bitmap mutably, so the bitmap cannot be read, locked,
/// or disposed while it is being drawn on.
pub struct Graphics<'a> {
    target: &'a mut Bitmap,
    pixmap: Pixmap,
    // Pixmap contents as of the last write-back
    snapshot: Pixmap,
    dpi_x: f32,
    dpi_y: f32,
    pub(crate) state: GraphicsState,
    state_stack: Vec<GraphicsState>,
    font_config: FontConfig,
    text: Option<TextSystem>,
}

impl<'a> Graphics<'a> {
    /// Draw on `bitmap` with the default font configuration.
    ///
    /// System fonts are scanned the first time text is drawn or measured.
    pub fn from_image(bitmap: &'a mut Bitmap) -> GdiResult<Self> {
        Self::with_config(bitmap, FontConfig::default())
    }

    pub fn with_config(bitmap: &'a mut Bitmap, config: FontConfig) -> GdiResult<Self> {
        Self::new_internal(bitmap, config, None)
    }

    /// Draw on `bitmap` using an already resolved font database.
    pub fn with_resolved(bitmap: &'a mut Bitmap, resolved: &ResolvedFontConfig) -> GdiResult<Self> {
        let text = TextSystem::from_resolved(resolved);
        Self::new_internal(bitmap, FontConfig::default(), Some(text))
    }

    fn new_internal(
        bitmap: &'a mut Bitmap,
        font_config: FontConfig,
        text: Option<TextSystem>,
    ) -> GdiResult<Self> {
        let format = bitmap.pixel_format()?;
        if format.is_indexed() {
            return Err(GdiError::UnsupportedFormat(format));
        }
        let pixmap = bitmap.to_pixmap()?;
        let dpi_x = bitmap.horizontal_resolution()?;
        let dpi_y = bitmap.vertical_resolution()?;
        log::debug!(
            target: "gdi",
            "graphics on {}x{} {:?}",
            pixmap.width(),
            pixmap.height(),
            format
        );

        Ok(Self {
            target: bitmap,
            snapshot: pixmap.clone(),
            pixmap,
            dpi_x,
            dpi_y,
            state: GraphicsState::default(),
            state_stack: Vec::new(),
            font_config,
            text,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Horizontal resolution of the surface, taken from the bitmap.
    pub fn dpi_x(&self) -> f32 {
        self.dpi_x
    }

    pub fn dpi_y(&self) -> f32 {
        self.dpi_y
    }

    /// Push the rendering state and return a token for [`Graphics::restore`].
    pub fn save(&mut self) -> GraphicsStateToken {
        log::debug!(target: "gdi", "save");
        self.state_stack.push(self.state);
        GraphicsStateToken(self.state_stack.len() - 1)
    }

    /// Return to the state captured by `token`, dropping every state saved
    /// after it. Tokens already restored past are ignored.
    pub fn restore(&mut self, token: GraphicsStateToken) {
        log::debug!(target: "gdi", "restore");
        if let Some(&state) = self.state_stack.get(token.0) {
            self.state = state;
            self.state_stack.truncate(token.0);
        }
    }

    pub fn smoothing_mode(&self) -> SmoothingMode {
        self.state.smoothing_mode
    }

    pub fn set_smoothing_mode(&mut self, mode: SmoothingMode) {
        self.state.smoothing_mode = mode;
    }

    pub fn interpolation_mode(&self) -> InterpolationMode {
        self.state.interpolation_mode
    }

    pub fn set_interpolation_mode(&mut self, mode: InterpolationMode) {
        self.state.interpolation_mode = mode;
    }

    pub fn compositing_mode(&self) -> CompositingMode {
        self.state.compositing_mode
    }

    pub fn set_compositing_mode(&mut self, mode: CompositingMode) {
        self.state.compositing_mode = mode;
    }

    /// Write the drawn pixels back into the bitmap.
    pub fn flush(&mut self) -> GdiResult<()> {
        log::debug!(target: "gdi", "flush");
        self.target.store_pixmap_changes(&self.snapshot, &self.pixmap)?;
        self.snapshot = self.pixmap.clone();
        Ok(())
    }

    /// The engine pixmap drawing calls render into.
    pub(crate) fn drawing_target(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub(crate) fn text_system(&mut self) -> &mut TextSystem {
        let config = &self.font_config;
        self.text.get_or_insert_with(|| TextSystem::from_config(config))
    }
}

impl Drop for Graphics<'_> {
    fn drop(&mut self) {
        // The bitmap is borrowed for our whole lifetime, so write-back cannot
        // hit a disposed or resized target.
        let _ = self.flush();
    }
}

impl std::fmt::Debug for Graphics<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graphics")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("dpi_x", &self.dpi_x)
            .field("dpi_y", &self.dpi_y)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
