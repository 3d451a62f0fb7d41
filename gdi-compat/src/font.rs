//! Font descriptions.

use crate::error::{GdiError, GdiResult};
use crate::units::GraphicsUnit;
use bitflags::bitflags;

bitflags! {
    /// Style flags of a font.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyle: u32 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKEOUT = 1 << 3;
    }
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle::empty();
}

/// A font family: a concrete name or one of the generic families.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    Named(String),
    #[default]
    GenericSansSerif,
    GenericSerif,
    GenericMonospace,
}

impl FontFamily {
    pub fn new(name: impl Into<String>) -> Self {
        FontFamily::Named(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            FontFamily::Named(name) => name,
            FontFamily::GenericSansSerif => "Microsoft Sans Serif",
            FontFamily::GenericSerif => "Times New Roman",
            FontFamily::GenericMonospace => "Courier New",
        }
    }
}

impl From<&str> for FontFamily {
    fn from(name: &str) -> Self {
        FontFamily::new(name)
    }
}

/// A family, an em size measured in `unit`, and style flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: FontFamily,
    em_size: f32,
    style: FontStyle,
    unit: GraphicsUnit,
}

impl Font {
    /// A regular font sized in points.
    pub fn new(family: impl Into<FontFamily>, em_size: f32) -> GdiResult<Self> {
        Self::with_style(family, em_size, FontStyle::REGULAR, GraphicsUnit::Point)
    }

    pub fn with_style(
        family: impl Into<FontFamily>,
        em_size: f32,
        style: FontStyle,
        unit: GraphicsUnit,
    ) -> GdiResult<Self> {
        if !(em_size.is_finite() && em_size > 0.0) {
            return Err(GdiError::invalid_argument(
                "em_size",
                format!("must be positive, got {em_size}"),
            ));
        }
        Ok(Self {
            family: family.into(),
            em_size,
            style,
            unit,
        })
    }

    pub fn family(&self) -> &FontFamily {
        &self.family
    }

    /// Em size in [`Font::unit`].
    pub fn size(&self) -> f32 {
        self.em_size
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn unit(&self) -> GraphicsUnit {
        self.unit
    }

    pub fn bold(&self) -> bool {
        self.style.contains(FontStyle::BOLD)
    }

    pub fn italic(&self) -> bool {
        self.style.contains(FontStyle::ITALIC)
    }

    pub fn underline(&self) -> bool {
        self.style.contains(FontStyle::UNDERLINE)
    }

    pub fn strikeout(&self) -> bool {
        self.style.contains(FontStyle::STRIKEOUT)
    }

    /// Em size in device pixels at a vertical resolution.
    pub fn size_in_pixels(&self, dpi_y: f32) -> f32 {
        self.em_size * self.unit.scale(dpi_y)
    }

    /// Em size in points.
    pub fn size_in_points(&self, dpi_y: f32) -> f32 {
        self.size_in_pixels(dpi_y) * 72.0 / dpi_y
    }

    /// Line spacing in device pixels.
    pub fn height(&self, dpi_y: f32) -> f32 {
        self.size_in_pixels(dpi_y) * LINE_SPACING
    }
}

/// Line spacing as a multiple of the em size.
pub(crate) const LINE_SPACING: f32 = 1.2;
