//! Locked views into bitmap memory.

use crate::pixel_format::PixelFormat;

/// Access mode requested when locking a bitmap region.
///
/// The mode is recorded on the [`BitmapData`] but not enforced, and releasing
/// a lock never copies data back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageLockMode {
    ReadOnly = 1,
    WriteOnly = 2,
    ReadWrite = 3,
    UserInputBuffer = 4,
}

/// A stride-aware view of a rectangular region of a bitmap's pixel memory.
///
/// The view borrows the bitmap mutably, so the bitmap cannot be disposed,
/// resized, or accessed through another path while the view is alive.
/// The first byte of [`BitmapData::as_bytes`] is the top-left pixel of the
/// locked rectangle; the slice extends to the end of the bitmap's buffer.
/// Rows are [`BitmapData::stride`] bytes apart, which is the stride of the
/// whole bitmap, not of the locked rectangle.
pub struct BitmapData<'a> {
    bytes: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
    bytes_per_pixel: usize,
    pixel_format: PixelFormat,
    lock_mode: ImageLockMode,
}

impl<'a> BitmapData<'a> {
    pub(crate) fn new(
        bytes: &'a mut [u8],
        width: u32,
        height: u32,
        stride: usize,
        pixel_format: PixelFormat,
        lock_mode: ImageLockMode,
    ) -> Self {
        Self {
            bytes,
            width,
            height,
            stride,
            bytes_per_pixel: pixel_format.lock_bytes_per_pixel(),
            pixel_format,
            lock_mode,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn lock_mode(&self) -> ImageLockMode {
        self.lock_mode
    }

    /// Bytes per pixel used for the start offset and row lengths.
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Pointer to the first pixel of the locked region.
    pub fn scan0(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// Mutable pointer to the first pixel of the locked region.
    pub fn scan0_mut(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &*self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    /// The pixels of row `y` of the locked region, `width * bytes_per_pixel` long.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        let range = self.row_range(y)?;
        self.bytes.get(range)
    }

    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        let range = self.row_range(y)?;
        self.bytes.get_mut(range)
    }

    /// Release the lock. Writes already landed in the bitmap; nothing is copied.
    pub fn unlock(self) {
        log::debug!(target: "gdi", "unlockBits {}x{}", self.width, self.height);
    }

    fn row_range(&self, y: u32) -> Option<std::ops::Range<usize>> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        Some(start..start + self.width as usize * self.bytes_per_pixel)
    }
}

impl std::fmt::Debug for BitmapData<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitmapData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("pixel_format", &self.pixel_format)
            .field("lock_mode", &self.lock_mode)
            .finish_non_exhaustive()
    }
}
