//! Owned pixel buffers.

use crate::bitmap_data::{BitmapData, ImageLockMode};
use crate::color::Color;
use crate::error::{GdiError, GdiResult};
use crate::geometry::{Rectangle, Size};
use crate::pixel_format::{premultiply, unpremultiply, ConcreteLayout, PixelFormat};
use crate::units::DEFAULT_DPI;
use tiny_skia::{Pixmap, PremultipliedColorU8, Transform};

/// Maximum bitmap dimension.
pub const MAX_DIMENSION: u32 = 32767;

/// A bitmap: owned pixel memory in one of the supported [`PixelFormat`]s.
///
/// Rows are stored top-down, `stride` bytes apart, where the stride is chosen
/// by the engine layout (`width * bytes per engine pixel`). After
/// [`Bitmap::dispose`] every accessor fails with [`GdiError::Disposed`].
pub struct Bitmap {
    inner: Option<BitmapInner>,
}

#[derive(Clone)]
struct BitmapInner {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    layout: ConcreteLayout,
    dpi_x: f32,
    dpi_y: f32,
}

impl BitmapInner {
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + x as usize * self.layout.bytes_per_pixel()
    }

    fn read(&self, x: u32, y: u32) -> Color {
        let offset = self.offset(x, y);
        self.layout.read_color(&self.data[offset..])
    }

    fn write(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.layout.write_color(&mut self.data[offset..], color);
    }

    fn check_pixel(&self, x: i32, y: i32) -> GdiResult<(u32, u32)> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return Err(GdiError::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((x as u32, y as u32))
    }

    fn check_rect(&self, rect: Rectangle) -> GdiResult<()> {
        if !rect.fits_within(self.width, self.height) {
            return Err(GdiError::RectangleOutOfBounds {
                rect,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

fn validate_dimensions(width: u32, height: u32) -> GdiResult<()> {
    if width == 0 || width > MAX_DIMENSION {
        return Err(GdiError::invalid_argument(
            "width",
            format!("must be between 1 and {MAX_DIMENSION}, got {width}"),
        ));
    }
    if height == 0 || height > MAX_DIMENSION {
        return Err(GdiError::invalid_argument(
            "height",
            format!("must be between 1 and {MAX_DIMENSION}, got {height}"),
        ));
    }
    Ok(())
}

impl Bitmap {
    /// Create a zeroed 32bpp ARGB bitmap.
    pub fn new(width: u32, height: u32) -> GdiResult<Self> {
        Self::with_format(width, height, PixelFormat::Format32bppArgb)
    }

    /// Create a zeroed bitmap in the given format.
    pub fn with_format(width: u32, height: u32, format: PixelFormat) -> GdiResult<Self> {
        validate_dimensions(width, height)?;
        let layout = format.to_concrete_layout()?;
        Ok(Self::allocate(width, height, format, layout))
    }

    fn allocate(width: u32, height: u32, format: PixelFormat, layout: ConcreteLayout) -> Self {
        log::debug!(target: "gdi", "allocate {}x{} {:?}", width, height, format);
        let stride = width as usize * layout.bytes_per_pixel();
        Self {
            inner: Some(BitmapInner {
                data: vec![0u8; stride * height as usize],
                width,
                height,
                stride,
                format,
                layout,
                dpi_x: DEFAULT_DPI,
                dpi_y: DEFAULT_DPI,
            }),
        }
    }

    /// Copy caller-owned pixel memory into a new bitmap.
    ///
    /// `source` holds `height` rows, `stride` bytes apart, in `format`. Each row
    /// copies `min(stride, bitmap stride)` bytes: shorter source rows leave the
    /// zeroed tail of the destination row alone, longer ones lose their
    /// trailing bytes. Bytes past the last row are never read.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        source: &[u8],
    ) -> GdiResult<Self> {
        if width == 0 {
            return Err(GdiError::invalid_argument("width", "must be positive"));
        }
        if height == 0 {
            return Err(GdiError::invalid_argument("height", "must be positive"));
        }
        if stride == 0 {
            return Err(GdiError::invalid_argument("stride", "must be positive"));
        }
        if source.is_empty() {
            return Err(GdiError::invalid_argument("source", "must not be empty"));
        }
        validate_dimensions(width, height)?;
        let layout = format.to_concrete_layout()?;

        let stride_out = width as usize * layout.bytes_per_pixel();
        let row_len = stride.min(stride_out);
        let required = (height as usize - 1)
            .checked_mul(stride)
            .and_then(|rows| rows.checked_add(row_len))
            .ok_or_else(|| {
                GdiError::invalid_argument("stride", format!("{stride} overflows the buffer size"))
            })?;
        if source.len() < required {
            return Err(GdiError::invalid_argument(
                "source",
                format!("holds {} bytes, {} required", source.len(), required),
            ));
        }

        let mut bitmap = Self::allocate(width, height, format, layout);
        if let Some(inner) = bitmap.inner.as_mut() {
            for (src_row, dst_row) in source
                .chunks(stride)
                .zip(inner.data.chunks_mut(stride_out))
                .take(height as usize)
            {
                dst_row[..row_len].copy_from_slice(&src_row[..row_len]);
            }
        }
        Ok(bitmap)
    }

    /// Copy pixel memory behind a raw pointer into a new bitmap.
    ///
    /// Same copy rules as [`Bitmap::from_raw`].
    ///
    /// # Safety
    ///
    /// Unless `scan0` is null, it must be valid for reads of
    /// `(height - 1) * stride + min(stride, bitmap stride)` bytes.
    pub unsafe fn from_raw_ptr(
        width: u32,
        height: u32,
        stride: i32,
        format: PixelFormat,
        scan0: *const u8,
    ) -> GdiResult<Self> {
        if scan0.is_null() {
            return Err(GdiError::invalid_argument("scan0", "must not be null"));
        }
        if width == 0 {
            return Err(GdiError::invalid_argument("width", "must be positive"));
        }
        if height == 0 {
            return Err(GdiError::invalid_argument("height", "must be positive"));
        }
        if stride <= 0 {
            return Err(GdiError::invalid_argument(
                "stride",
                format!("must be positive, got {stride}"),
            ));
        }
        validate_dimensions(width, height)?;
        let layout = format.to_concrete_layout()?;
        let stride = stride as usize;
        let stride_out = width as usize * layout.bytes_per_pixel();
        let len = (height as usize - 1)
            .checked_mul(stride)
            .and_then(|rows| rows.checked_add(stride.min(stride_out)))
            .ok_or_else(|| {
                GdiError::invalid_argument("stride", format!("{stride} overflows the buffer size"))
            })?;
        // SAFETY: the caller guarantees `scan0` is readable for `len` bytes.
        let source = unsafe { std::slice::from_raw_parts(scan0, len) };
        Self::from_raw(width, height, stride, format, source)
    }

    /// Build a bitmap in `format` from an engine pixmap.
    pub fn from_pixmap(pixmap: &Pixmap, format: PixelFormat) -> GdiResult<Self> {
        let mut bitmap = Self::with_format(pixmap.width(), pixmap.height(), format)?;
        bitmap.store_pixmap(pixmap)?;
        Ok(bitmap)
    }

    /// Build a 32bpp ARGB bitmap from straight-alpha RGBA bytes.
    pub(crate) fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> GdiResult<Self> {
        let mut bitmap = Self::new(width, height)?;
        let inner = bitmap.inner_mut()?;
        for (i, px) in rgba.chunks_exact(4).enumerate().take((width * height) as usize) {
            let x = i as u32 % width;
            let y = i as u32 / width;
            inner.write(x, y, Color::from_argb(px[3], px[0], px[1], px[2]));
        }
        Ok(bitmap)
    }

    /// Straight-alpha RGBA bytes, row-major without padding.
    pub(crate) fn to_rgba8(&self) -> GdiResult<Vec<u8>> {
        let inner = self.inner()?;
        let mut out = Vec::with_capacity(inner.width as usize * inner.height as usize * 4);
        for y in 0..inner.height {
            for x in 0..inner.width {
                let c = inner.read(x, y);
                out.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
            }
        }
        Ok(out)
    }

    fn inner(&self) -> GdiResult<&BitmapInner> {
        self.inner.as_ref().ok_or(GdiError::Disposed)
    }

    fn inner_mut(&mut self) -> GdiResult<&mut BitmapInner> {
        self.inner.as_mut().ok_or(GdiError::Disposed)
    }

    /// Release the pixel memory. Every later access fails.
    pub fn dispose(&mut self) {
        log::debug!(target: "gdi", "dispose");
        self.inner = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_none()
    }

    pub fn width(&self) -> GdiResult<u32> {
        Ok(self.inner()?.width)
    }

    pub fn height(&self) -> GdiResult<u32> {
        Ok(self.inner()?.height)
    }

    pub fn size(&self) -> GdiResult<Size> {
        let inner = self.inner()?;
        Ok(Size::new(inner.width as i32, inner.height as i32))
    }

    /// The full bitmap rectangle.
    pub fn bounds(&self) -> GdiResult<Rectangle> {
        let inner = self.inner()?;
        Ok(Rectangle::from_size(inner.width as i32, inner.height as i32))
    }

    pub fn pixel_format(&self) -> GdiResult<PixelFormat> {
        Ok(self.inner()?.format)
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> GdiResult<usize> {
        Ok(self.inner()?.stride)
    }

    pub fn horizontal_resolution(&self) -> GdiResult<f32> {
        Ok(self.inner()?.dpi_x)
    }

    pub fn vertical_resolution(&self) -> GdiResult<f32> {
        Ok(self.inner()?.dpi_y)
    }

    /// Set the resolution in dots per inch. Both values must be positive and finite.
    pub fn set_resolution(&mut self, dpi_x: f32, dpi_y: f32) -> GdiResult<()> {
        if !(dpi_x.is_finite() && dpi_x > 0.0) {
            return Err(GdiError::invalid_argument(
                "dpi_x",
                format!("must be positive, got {dpi_x}"),
            ));
        }
        if !(dpi_y.is_finite() && dpi_y > 0.0) {
            return Err(GdiError::invalid_argument(
                "dpi_y",
                format!("must be positive, got {dpi_y}"),
            ));
        }
        let inner = self.inner_mut()?;
        inner.dpi_x = dpi_x;
        inner.dpi_y = dpi_y;
        Ok(())
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> GdiResult<Color> {
        let inner = self.inner()?;
        let (x, y) = inner.check_pixel(x, y)?;
        Ok(inner.read(x, y))
    }

    /// Write one pixel, converting the color to the bitmap's format.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> GdiResult<()> {
        let inner = self.inner_mut()?;
        let (x, y) = inner.check_pixel(x, y)?;
        inner.write(x, y, color);
        Ok(())
    }

    /// Copy the whole bitmap, format and resolution included.
    pub fn try_clone(&self) -> GdiResult<Bitmap> {
        Ok(Bitmap {
            inner: Some(self.inner()?.clone()),
        })
    }

    /// Copy a region into a new bitmap, converting to `format`.
    pub fn clone_region(&self, rect: Rectangle, format: PixelFormat) -> GdiResult<Bitmap> {
        let inner = self.inner()?;
        inner.check_rect(rect)?;
        let mut out = Bitmap::with_format(rect.width as u32, rect.height as u32, format)?;
        let out_inner = out.inner_mut()?;
        out_inner.dpi_x = inner.dpi_x;
        out_inner.dpi_y = inner.dpi_y;
        for y in 0..rect.height as u32 {
            for x in 0..rect.width as u32 {
                let color = inner.read(rect.x as u32 + x, rect.y as u32 + y);
                out_inner.write(x, y, color);
            }
        }
        Ok(out)
    }

    /// Resample into a new 32bpp ARGB bitmap of the given size.
    pub fn scaled(&self, width: u32, height: u32) -> GdiResult<Bitmap> {
        validate_dimensions(width, height)?;
        let source = self.to_pixmap()?;
        let mut target = Pixmap::new(width, height)
            .ok_or_else(|| GdiError::invalid_argument("width", "cannot allocate pixmap"))?;

        let scale_x = width as f32 / source.width() as f32;
        let scale_y = height as f32 / source.height() as f32;
        let paint = tiny_skia::PixmapPaint {
            quality: tiny_skia::FilterQuality::Bicubic,
            ..Default::default()
        };
        target.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &paint,
            Transform::from_scale(scale_x, scale_y),
            None,
        );

        let mut out = Bitmap::from_pixmap(&target, PixelFormat::Format32bppArgb)?;
        let (dpi_x, dpi_y) = (self.horizontal_resolution()?, self.vertical_resolution()?);
        out.set_resolution(dpi_x, dpi_y)?;
        Ok(out)
    }

    /// Make every pixel equal to `color` fully transparent.
    ///
    /// Bitmaps without an alpha channel are converted to 32bpp ARGB first.
    pub fn make_transparent(&mut self, color: Color) -> GdiResult<()> {
        if !self.pixel_format()?.has_alpha() {
            let bounds = self.bounds()?;
            *self = self.clone_region(bounds, PixelFormat::Format32bppArgb)?;
        }
        let inner = self.inner_mut()?;
        for y in 0..inner.height {
            for x in 0..inner.width {
                if inner.read(x, y) == color {
                    inner.write(x, y, Color::from_argb_u32(0));
                }
            }
        }
        Ok(())
    }

    /// Lock a region for direct memory access.
    ///
    /// `rect` must lie entirely within the bitmap. The view starts at
    /// `rect.y * stride + rect.x * bytes_per_pixel(format)`, where formats
    /// without a size count as 4 bytes, and keeps the full bitmap stride.
    pub fn lock_bits(
        &mut self,
        rect: Rectangle,
        mode: ImageLockMode,
        format: PixelFormat,
    ) -> GdiResult<BitmapData<'_>> {
        log::debug!(target: "gdi", "lockBits {:?} {:?} {:?}", rect, mode, format);
        let inner = self.inner_mut()?;
        inner.check_rect(rect)?;

        let stride = inner.stride;
        let offset = rect.y as usize * stride + rect.x as usize * format.lock_bytes_per_pixel();
        let bytes = inner.data.get_mut(offset..).unwrap_or_default();
        Ok(BitmapData::new(
            bytes,
            rect.width as u32,
            rect.height as u32,
            stride,
            format,
            mode,
        ))
    }

    /// Convert to a premultiplied RGBA engine pixmap.
    pub fn to_pixmap(&self) -> GdiResult<Pixmap> {
        let inner = self.inner()?;
        let mut pixmap = Pixmap::new(inner.width, inner.height)
            .ok_or_else(|| GdiError::invalid_argument("width", "cannot allocate pixmap"))?;
        let width = inner.width;
        for (i, pixel) in pixmap.pixels_mut().iter_mut().enumerate() {
            let color = inner.read(i as u32 % width, i as u32 / width);
            let a = color.a();
            let (r, g, b) = premultiply(color.r(), color.g(), color.b(), a);
            *pixel = PremultipliedColorU8::from_rgba(r, g, b, a)
                .unwrap_or(PremultipliedColorU8::TRANSPARENT);
        }
        Ok(pixmap)
    }

    /// Overwrite the pixels from a same-sized engine pixmap.
    pub(crate) fn store_pixmap(&mut self, pixmap: &Pixmap) -> GdiResult<()> {
        let inner = self.inner_mut()?;
        if pixmap.width() != inner.width || pixmap.height() != inner.height {
            return Err(GdiError::invalid_argument(
                "pixmap",
                format!(
                    "size {}x{} does not match bitmap {}x{}",
                    pixmap.width(),
                    pixmap.height(),
                    inner.width,
                    inner.height
                ),
            ));
        }
        let width = inner.width;
        for (i, pixel) in pixmap.pixels().iter().enumerate() {
            inner.write(i as u32 % width, i as u32 / width, unpremultiplied(*pixel));
        }
        Ok(())
    }

    /// Write back only the pixels of `pixmap` that differ from `snapshot`.
    ///
    /// Both pixmaps must match the bitmap's size. Untouched pixels keep their
    /// stored straight-alpha value instead of going through a premultiply
    /// round trip.
    pub(crate) fn store_pixmap_changes(
        &mut self,
        snapshot: &Pixmap,
        pixmap: &Pixmap,
    ) -> GdiResult<()> {
        let inner = self.inner_mut()?;
        let sizes = [
            (snapshot.width(), snapshot.height()),
            (pixmap.width(), pixmap.height()),
        ];
        if sizes.iter().any(|&size| size != (inner.width, inner.height)) {
            return Err(GdiError::invalid_argument(
                "pixmap",
                format!("size does not match bitmap {}x{}", inner.width, inner.height),
            ));
        }
        let width = inner.width;
        let changed = snapshot
            .pixels()
            .iter()
            .zip(pixmap.pixels())
            .enumerate()
            .filter(|(_, (before, after))| before != after);
        for (i, (_, after)) in changed {
            inner.write(i as u32 % width, i as u32 / width, unpremultiplied(*after));
        }
        Ok(())
    }
}

fn unpremultiplied(pixel: PremultipliedColorU8) -> Color {
    let a = pixel.alpha();
    let (r, g, b) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), a);
    Color::from_argb(a, r, g, b)
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(inner) => f
                .debug_struct("Bitmap")
                .field("width", &inner.width)
                .field("height", &inner.height)
                .field("stride", &inner.stride)
                .field("format", &inner.format)
                .field("dpi_x", &inner.dpi_x)
                .field("dpi_y", &inner.dpi_y)
                .finish_non_exhaustive(),
            None => f.write_str("Bitmap(disposed)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    #[test]
    fn test_new_bitmap_defaults() {
        let bitmap = Bitmap::new(20, 10).unwrap();
        assert_eq!(bitmap.width().unwrap(), 20);
        assert_eq!(bitmap.height().unwrap(), 10);
        assert_eq!(bitmap.stride().unwrap(), 80);
        assert_eq!(bitmap.pixel_format().unwrap(), PixelFormat::Format32bppArgb);
        assert_eq!(bitmap.horizontal_resolution().unwrap(), 96.0);
        assert_eq!(bitmap.vertical_resolution().unwrap(), 96.0);
        assert_eq!(bitmap.get_pixel(5, 5).unwrap().to_argb(), 0);
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = Bitmap::new(0, 10).unwrap_err();
        assert!(matches!(err, GdiError::InvalidArgument { name: "width", .. }));
        let err = Bitmap::new(10, 0).unwrap_err();
        assert!(matches!(err, GdiError::InvalidArgument { name: "height", .. }));
        let err = Bitmap::new(MAX_DIMENSION + 1, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_undefined_format_is_unsupported() {
        let err = Bitmap::with_format(4, 4, PixelFormat::Undefined).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_24bpp_stride_is_widened() {
        let bitmap = Bitmap::with_format(5, 2, PixelFormat::Format24bppRgb).unwrap();
        assert_eq!(bitmap.stride().unwrap(), 20);
    }

    #[test]
    fn test_set_get_pixel_per_format() {
        for format in PixelFormat::ALL.into_iter().skip(1) {
            let mut bitmap = Bitmap::with_format(3, 3, format).unwrap();
            bitmap.set_pixel(1, 2, Color::WHITE).unwrap();
            assert_eq!(bitmap.get_pixel(1, 2).unwrap(), Color::WHITE, "{format:?}");
            assert_eq!(bitmap.get_pixel(2, 1).unwrap().r(), 0, "{format:?}");
        }
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let mut bitmap = Bitmap::new(4, 4).unwrap();
        assert_eq!(bitmap.get_pixel(4, 0).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(bitmap.get_pixel(0, -1).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(
            bitmap.set_pixel(-1, 0, Color::RED).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_set_resolution_rejects_non_positive() {
        let mut bitmap = Bitmap::new(2, 2).unwrap();
        bitmap.set_resolution(300.0, 150.0).unwrap();
        assert_eq!(bitmap.horizontal_resolution().unwrap(), 300.0);
        assert_eq!(bitmap.vertical_resolution().unwrap(), 150.0);

        for (x, y) in [(0.0, 96.0), (96.0, -1.0), (f32::NAN, 96.0), (96.0, f32::INFINITY)] {
            let err = bitmap.set_resolution(x, y).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        // Rejected calls leave the previous values in place
        assert_eq!(bitmap.horizontal_resolution().unwrap(), 300.0);
    }

    #[test]
    fn test_from_raw_same_stride_copies_everything() {
        let source: Vec<u8> = (0..32).collect();
        let mut bitmap =
            Bitmap::from_raw(2, 4, 8, PixelFormat::Format32bppArgb, &source).unwrap();
        let bounds = bitmap.bounds().unwrap();
        let data = bitmap
            .lock_bits(bounds, ImageLockMode::ReadOnly, PixelFormat::Format32bppArgb)
            .unwrap();
        assert_eq!(data.as_bytes(), source.as_slice());
    }

    #[test]
    fn test_from_raw_wide_source_drops_row_tail() {
        // 2 pixels per row (8 bytes) but 12-byte source rows
        let mut source = vec![0u8; 12 * 2];
        for (i, byte) in source.iter_mut().enumerate() {
            *byte = i as u8 + 1;
        }
        let mut bitmap =
            Bitmap::from_raw(2, 2, 12, PixelFormat::Format32bppArgb, &source).unwrap();
        let data = bitmap
            .lock_bits(
                Rectangle::from_size(2, 2),
                ImageLockMode::ReadOnly,
                PixelFormat::Format32bppArgb,
            )
            .unwrap();
        assert_eq!(data.row(0).unwrap(), &source[0..8]);
        assert_eq!(data.row(1).unwrap(), &source[12..20]);
    }

    #[test]
    fn test_from_raw_narrow_source_leaves_zero_tail() {
        // 24bpp rows of 3 pixels are 9 bytes; the engine row is 12 bytes
        let source = vec![0xAAu8; 9 * 2];
        let mut bitmap =
            Bitmap::from_raw(3, 2, 9, PixelFormat::Format24bppRgb, &source).unwrap();
        assert_eq!(bitmap.stride().unwrap(), 12);
        let data = bitmap
            .lock_bits(
                Rectangle::from_size(3, 2),
                ImageLockMode::ReadOnly,
                PixelFormat::Format32bppRgb,
            )
            .unwrap();
        let bytes = data.as_bytes();
        assert!(bytes[0..9].iter().all(|&b| b == 0xAA));
        assert!(bytes[9..12].iter().all(|&b| b == 0));
        assert!(bytes[12..21].iter().all(|&b| b == 0xAA));
        assert!(bytes[21..24].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_raw_never_reads_past_last_row() {
        // The last row only needs `row_len` bytes, not a full source stride
        let source = vec![7u8; 16 + 8];
        assert!(Bitmap::from_raw(2, 2, 16, PixelFormat::Format32bppArgb, &source).is_ok());
        let short = vec![7u8; 16 + 7];
        let err = Bitmap::from_raw(2, 2, 16, PixelFormat::Format32bppArgb, &short).unwrap_err();
        assert!(matches!(err, GdiError::InvalidArgument { name: "source", .. }));
    }

    #[rstest]
    #[case(0, 2, 8, "width")]
    #[case(2, 0, 8, "height")]
    #[case(2, 2, 0, "stride")]
    fn test_from_raw_invalid_arguments(
        #[case] width: u32,
        #[case] height: u32,
        #[case] stride: usize,
        #[case] field: &str,
    ) {
        let source = vec![0u8; 64];
        match Bitmap::from_raw(width, height, stride, PixelFormat::Format32bppArgb, &source) {
            Err(GdiError::InvalidArgument { name, .. }) => assert_eq!(name, field),
            other => panic!("expected invalid argument, got {other:?}"),
        }
    }

    #[test]
    fn test_from_raw_huge_stride_is_rejected() {
        let source = vec![0u8; 64];
        for height in [2, 3] {
            let err = Bitmap::from_raw(2, height, usize::MAX, PixelFormat::Format32bppArgb, &source)
                .unwrap_err();
            assert!(matches!(err, GdiError::InvalidArgument { name: "stride", .. }));
        }
    }

    #[test]
    fn test_from_raw_empty_source() {
        let err = Bitmap::from_raw(1, 1, 4, PixelFormat::Format32bppArgb, &[]).unwrap_err();
        assert!(matches!(err, GdiError::InvalidArgument { name: "source", .. }));
    }

    #[test]
    fn test_from_raw_ptr_null() {
        let err = unsafe {
            Bitmap::from_raw_ptr(1, 1, 4, PixelFormat::Format32bppArgb, std::ptr::null())
        }
        .unwrap_err();
        assert!(matches!(err, GdiError::InvalidArgument { name: "scan0", .. }));
    }

    #[test]
    fn test_from_raw_ptr_copies() {
        let source = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let bitmap = unsafe {
            Bitmap::from_raw_ptr(1, 2, 4, PixelFormat::Format32bppArgb, source.as_ptr())
        }
        .unwrap();
        assert_eq!(bitmap.get_pixel(0, 1).unwrap(), Color::from_argb(8, 7, 6, 5));
    }

    #[test]
    fn test_clone_region_converts_format() {
        let mut bitmap = Bitmap::new(4, 4).unwrap();
        bitmap.set_pixel(2, 3, Color::RED).unwrap();
        bitmap.set_resolution(72.0, 72.0).unwrap();
        let region = bitmap
            .clone_region(Rectangle::new(1, 2, 3, 2), PixelFormat::Format16bppRgb565)
            .unwrap();
        assert_eq!(region.width().unwrap(), 3);
        assert_eq!(region.height().unwrap(), 2);
        assert_eq!(region.get_pixel(1, 1).unwrap(), Color::RED);
        assert_eq!(region.horizontal_resolution().unwrap(), 72.0);

        let err = bitmap
            .clone_region(Rectangle::new(2, 2, 3, 1), PixelFormat::Format32bppArgb)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_try_clone_is_independent() {
        let mut bitmap = Bitmap::new(2, 2).unwrap();
        let copy = bitmap.try_clone().unwrap();
        bitmap.set_pixel(0, 0, Color::BLUE).unwrap();
        assert_eq!(copy.get_pixel(0, 0).unwrap().to_argb(), 0);
    }

    #[test]
    fn test_scaled_doubles_size() {
        let mut bitmap = Bitmap::with_format(2, 2, PixelFormat::Format24bppRgb).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                bitmap.set_pixel(x, y, Color::LIME).unwrap();
            }
        }
        let big = bitmap.scaled(4, 6).unwrap();
        assert_eq!(big.size().unwrap(), Size::new(4, 6));
        assert_eq!(big.pixel_format().unwrap(), PixelFormat::Format32bppArgb);
        let px = big.get_pixel(2, 3).unwrap();
        assert!(px.g() >= 250 && px.r() <= 5 && px.a() >= 250, "{px:?}");
    }

    #[test]
    fn test_make_transparent_converts_opaque_formats() {
        let mut bitmap = Bitmap::with_format(2, 1, PixelFormat::Format24bppRgb).unwrap();
        bitmap.set_pixel(0, 0, Color::RED).unwrap();
        bitmap.set_pixel(1, 0, Color::BLUE).unwrap();
        bitmap.make_transparent(Color::RED).unwrap();
        assert_eq!(bitmap.pixel_format().unwrap(), PixelFormat::Format32bppArgb);
        assert_eq!(bitmap.get_pixel(0, 0).unwrap().a(), 0);
        assert_eq!(bitmap.get_pixel(1, 0).unwrap(), Color::BLUE);
    }

    #[rstest]
    #[case(Rectangle::new(-1, 0, 2, 2))]
    #[case(Rectangle::new(0, -1, 2, 2))]
    #[case(Rectangle::new(3, 0, 2, 2))]
    #[case(Rectangle::new(0, 3, 2, 2))]
    #[case(Rectangle::new(0, 0, -1, 2))]
    #[case(Rectangle::new(0, 0, 2, -1))]
    fn test_lock_out_of_bounds(#[case] rect: Rectangle) {
        let mut bitmap = Bitmap::new(4, 4).unwrap();
        let err = bitmap
            .lock_bits(rect, ImageLockMode::ReadWrite, PixelFormat::Format32bppArgb)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[rstest]
    #[case(Rectangle::new(0, 0, 4, 4))]
    #[case(Rectangle::new(2, 2, 2, 2))]
    #[case(Rectangle::new(4, 4, 0, 0))]
    #[case(Rectangle::new(0, 3, 4, 1))]
    fn test_lock_in_bounds(#[case] rect: Rectangle) {
        let mut bitmap = Bitmap::new(4, 4).unwrap();
        let data = bitmap
            .lock_bits(rect, ImageLockMode::ReadWrite, PixelFormat::Format32bppArgb)
            .unwrap();
        assert_eq!(data.stride(), 16);
        assert_eq!(data.width(), rect.width as u32);
        assert_eq!(data.height(), rect.height as u32);
    }

    #[test]
    fn test_lock_writes_land_in_bitmap() {
        let mut bitmap = Bitmap::new(4, 4).unwrap();
        {
            let mut data = bitmap
                .lock_bits(
                    Rectangle::new(1, 2, 2, 1),
                    ImageLockMode::WriteOnly,
                    PixelFormat::Format32bppArgb,
                )
                .unwrap();
            assert_eq!(data.lock_mode(), ImageLockMode::WriteOnly);
            let row = data.row_mut(0).unwrap();
            assert_eq!(row.len(), 8);
            row[4..8].copy_from_slice(&[0x30, 0x20, 0x10, 0xFF]);
            data.unlock();
        }
        assert_eq!(bitmap.get_pixel(2, 2).unwrap(), Color::from_rgb(0x10, 0x20, 0x30));
        assert_eq!(bitmap.get_pixel(1, 2).unwrap().to_argb(), 0);
    }

    #[test]
    fn test_lock_offset_uses_requested_format() {
        let mut bitmap = Bitmap::with_format(4, 2, PixelFormat::Format24bppRgb).unwrap();
        let base = {
            let data = bitmap
                .lock_bits(
                    Rectangle::from_size(4, 2),
                    ImageLockMode::ReadOnly,
                    PixelFormat::Format24bppRgb,
                )
                .unwrap();
            data.scan0() as usize
        };
        let data = bitmap
            .lock_bits(
                Rectangle::new(2, 1, 1, 1),
                ImageLockMode::ReadOnly,
                PixelFormat::Format24bppRgb,
            )
            .unwrap();
        // Engine stride is 16 (widened), pixel step follows the 3-byte format
        assert_eq!(data.stride(), 16);
        assert_eq!(data.scan0() as usize - base, 16 + 2 * 3);

        drop(data);
        let data = bitmap
            .lock_bits(
                Rectangle::new(1, 0, 1, 1),
                ImageLockMode::ReadOnly,
                PixelFormat::Undefined,
            )
            .unwrap();
        assert_eq!(data.bytes_per_pixel(), 4);
        assert_eq!(data.scan0() as usize - base, 4);
    }

    #[test]
    fn test_disposed_bitmap_fails_everywhere() {
        let mut bitmap = Bitmap::new(4, 4).unwrap();
        bitmap.dispose();
        assert!(bitmap.is_disposed());
        assert_eq!(bitmap.width().unwrap_err().kind(), ErrorKind::Disposed);
        assert_eq!(bitmap.height().unwrap_err().kind(), ErrorKind::Disposed);
        assert_eq!(bitmap.get_pixel(0, 0).unwrap_err().kind(), ErrorKind::Disposed);
        assert_eq!(
            bitmap.set_pixel(0, 0, Color::RED).unwrap_err().kind(),
            ErrorKind::Disposed
        );
        assert_eq!(
            bitmap
                .lock_bits(
                    Rectangle::from_size(1, 1),
                    ImageLockMode::ReadOnly,
                    PixelFormat::Format32bppArgb
                )
                .unwrap_err()
                .kind(),
            ErrorKind::Disposed
        );
        assert_eq!(bitmap.to_pixmap().unwrap_err().kind(), ErrorKind::Disposed);
        assert_eq!(bitmap.try_clone().unwrap_err().kind(), ErrorKind::Disposed);
        assert_eq!(
            bitmap.set_resolution(72.0, 72.0).unwrap_err().kind(),
            ErrorKind::Disposed
        );
        assert_eq!(format!("{bitmap:?}"), "Bitmap(disposed)");
    }

    #[test]
    fn test_pixmap_round_trip_premultiplies() {
        let mut bitmap = Bitmap::new(1, 1).unwrap();
        bitmap.set_pixel(0, 0, Color::from_argb(128, 255, 0, 0)).unwrap();
        let pixmap = bitmap.to_pixmap().unwrap();
        let px = pixmap.pixels()[0];
        assert_eq!((px.red(), px.alpha()), (128, 128));

        let back = Bitmap::from_pixmap(&pixmap, PixelFormat::Format32bppArgb).unwrap();
        assert_eq!(back.get_pixel(0, 0).unwrap(), Color::from_argb(128, 255, 0, 0));
    }

    #[test]
    fn test_store_changes_keeps_untouched_low_alpha_pixels() {
        let faint = Color::from_argb(10, 123, 45, 200);
        let mut bitmap = Bitmap::new(2, 1).unwrap();
        bitmap.set_pixel(0, 0, faint).unwrap();
        bitmap.set_pixel(1, 0, faint).unwrap();

        let snapshot = bitmap.to_pixmap().unwrap();
        let mut drawn = snapshot.clone();
        drawn.pixels_mut()[1] = PremultipliedColorU8::from_rgba(0, 0, 255, 255).unwrap();
        bitmap.store_pixmap_changes(&snapshot, &drawn).unwrap();

        assert_eq!(bitmap.get_pixel(0, 0).unwrap(), faint);
        assert_eq!(bitmap.get_pixel(1, 0).unwrap(), Color::BLUE);

        let small = Pixmap::new(1, 1).unwrap();
        let err = bitmap.store_pixmap_changes(&small, &drawn).unwrap_err();
        assert!(matches!(err, GdiError::InvalidArgument { name: "pixmap", .. }));
    }
}
