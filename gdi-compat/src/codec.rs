//! Image decoding and encoding.
//!
//! Decoding goes through the `image` crate and always yields a 32bpp ARGB
//! bitmap. PNG output is written with the `png` crate so the bitmap's
//! resolution lands in the `pHYs` chunk; other formats use `image` encoders.

use crate::bitmap::Bitmap;
use crate::error::{GdiError, GdiResult};
use std::io::{Cursor, Read};
use std::path::Path;

const METERS_PER_INCH: f32 = 0.0254;

/// Encoded image container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Bmp,
    Gif,
    Icon,
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    /// Guess the format from a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "bmp" | "dib" => Some(ImageFormat::Bmp),
            "gif" => Some(ImageFormat::Gif),
            "ico" => Some(ImageFormat::Icon),
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    /// Guess the format from the first bytes of an encoded image.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Bmp => Some(ImageFormat::Bmp),
            image::ImageFormat::Gif => Some(ImageFormat::Gif),
            image::ImageFormat::Ico => Some(ImageFormat::Icon),
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::WebP => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Icon => image::ImageFormat::Ico,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Webp => image::ImageFormat::WebP,
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderParameters {
    /// JPEG quality, 0 to 100. Ignored by the lossless formats.
    pub quality: u8,
}

impl Default for EncoderParameters {
    fn default() -> Self {
        Self { quality: 75 }
    }
}

impl Bitmap {
    /// Decode an encoded image held in memory.
    pub fn decode(bytes: &[u8]) -> GdiResult<Bitmap> {
        if bytes.is_empty() {
            return Err(GdiError::invalid_argument("bytes", "must not be empty"));
        }
        log::debug!(
            target: "gdi",
            "decode {} bytes as {:?}",
            bytes.len(),
            ImageFormat::sniff(bytes)
        );

        let img = image::load_from_memory(bytes).map_err(|e| GdiError::Decode(e.to_string()))?;
        let rgba = img.to_rgba8();
        let mut bitmap = Bitmap::from_rgba8(rgba.width(), rgba.height(), rgba.as_raw())?;

        if ImageFormat::sniff(bytes) == Some(ImageFormat::Png) {
            if let Some(dpi) = png_resolution(bytes) {
                bitmap.set_resolution(dpi.0, dpi.1)?;
            }
        }
        Ok(bitmap)
    }

    /// Decode an image read to the end of `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> GdiResult<Bitmap> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }

    /// Decode an image file.
    pub fn from_file(path: impl AsRef<Path>) -> GdiResult<Bitmap> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::decode(&bytes)
    }

    /// Encode with default parameters.
    pub fn encode(&self, format: ImageFormat) -> GdiResult<Vec<u8>> {
        self.encode_with(format, &EncoderParameters::default())
    }

    pub fn encode_with(
        &self,
        format: ImageFormat,
        params: &EncoderParameters,
    ) -> GdiResult<Vec<u8>> {
        if params.quality > 100 {
            return Err(GdiError::invalid_argument(
                "quality",
                format!("must be at most 100, got {}", params.quality),
            ));
        }
        let width = self.width()?;
        let height = self.height()?;
        log::debug!(target: "gdi", "encode {}x{} as {:?}", width, height, format);

        let rgba = self.to_rgba8()?;
        match format {
            ImageFormat::Png => self.encode_png(&rgba),
            ImageFormat::Jpeg => {
                let img = image::RgbaImage::from_raw(width, height, rgba)
                    .ok_or_else(|| GdiError::Encode("pixel buffer size mismatch".to_string()))?;
                let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
                let mut buf = Vec::new();
                let mut encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, params.quality);
                encoder
                    .encode(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
                    .map_err(|e| GdiError::Encode(e.to_string()))?;
                Ok(buf)
            }
            other => {
                let img = image::RgbaImage::from_raw(width, height, rgba)
                    .ok_or_else(|| GdiError::Encode("pixel buffer size mismatch".to_string()))?;
                let mut cursor = Cursor::new(Vec::new());
                image::DynamicImage::ImageRgba8(img)
                    .write_to(&mut cursor, other.to_image_format())
                    .map_err(|e| GdiError::Encode(e.to_string()))?;
                Ok(cursor.into_inner())
            }
        }
    }

    fn encode_png(&self, rgba: &[u8]) -> GdiResult<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width()?, self.height()?);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Resolution as pixels per meter
            let to_ppm = |dpi: f32| (dpi.max(0.0) / METERS_PER_INCH).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: to_ppm(self.horizontal_resolution()?),
                yppu: to_ppm(self.vertical_resolution()?),
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            writer.write_image_data(rgba)?;
        }
        Ok(buf)
    }

    /// Encode with default parameters and write to `path`.
    pub fn save(&self, path: impl AsRef<Path>, format: ImageFormat) -> GdiResult<()> {
        self.save_with(path, format, &EncoderParameters::default())
    }

    pub fn save_with(
        &self,
        path: impl AsRef<Path>,
        format: ImageFormat,
        params: &EncoderParameters,
    ) -> GdiResult<()> {
        let bytes = self.encode_with(format, params)?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}

/// Resolution stored in a PNG `pHYs` chunk, in dots per inch.
fn png_resolution(bytes: &[u8]) -> Option<(f32, f32)> {
    let reader = png::Decoder::new(Cursor::new(bytes)).read_info().ok()?;
    let dims = reader.info().pixel_dims.as_ref()?;
    if !matches!(dims.unit, png::Unit::Meter) || dims.xppu == 0 || dims.yppu == 0 {
        return None;
    }
    Some((
        dims.xppu as f32 * METERS_PER_INCH,
        dims.yppu as f32 * METERS_PER_INCH,
    ))
}
