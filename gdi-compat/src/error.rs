//! Error types for gdi-compat.

use crate::geometry::Rectangle;
use crate::pixel_format::PixelFormat;
use thiserror::Error;

/// Result type alias using GdiError.
pub type GdiResult<T> = Result<T, GdiError>;

/// Errors that can occur in bitmap, codec, and drawing operations.
#[derive(Debug, Error)]
pub enum GdiError {
    /// A required argument was missing, empty, or non-positive.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A rectangle does not lie within the bitmap.
    #[error("Rectangle out of bounds: {rect:?} does not fit in a {width}x{height} bitmap")]
    RectangleOutOfBounds {
        rect: Rectangle,
        width: u32,
        height: u32,
    },

    /// A pixel coordinate does not lie within the bitmap.
    #[error("Pixel ({x}, {y}) is outside a {width}x{height} bitmap")]
    PixelOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// The pixel format has no concrete layout.
    #[error("Pixel format {0:?} is not supported")]
    UnsupportedFormat(PixelFormat),

    /// The bitmap was disposed.
    #[error("Bitmap has been disposed")]
    Disposed,

    /// The codec could not decode the input.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The codec could not encode the bitmap.
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Reading or writing an image file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`GdiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    OutOfRange,
    UnsupportedFormat,
    Disposed,
    Decode,
    Encode,
    Io,
}

impl GdiError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GdiError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            GdiError::RectangleOutOfBounds { .. } | GdiError::PixelOutOfBounds { .. } => {
                ErrorKind::OutOfRange
            }
            GdiError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            GdiError::Disposed => ErrorKind::Disposed,
            GdiError::Decode(_) => ErrorKind::Decode,
            GdiError::Encode(_) => ErrorKind::Encode,
            GdiError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        GdiError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

impl From<png::EncodingError> for GdiError {
    fn from(err: png::EncodingError) -> Self {
        GdiError::Encode(err.to_string())
    }
}
