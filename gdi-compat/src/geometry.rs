//! Point, size, and rectangle types.
//!
//! Integer types address pixels of a bitmap; float types carry drawing
//! coordinates. [`PixelRect`] is the edge-based form handed to the raster
//! engine after unit conversion.

/// An integer point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A floating-point point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        Self {
            x: p.x as f32,
            y: p.y as f32,
        }
    }
}

impl From<PointF> for tiny_skia::Point {
    fn from(p: PointF) -> Self {
        tiny_skia::Point { x: p.x, y: p.y }
    }
}

/// An integer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A floating-point size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An integer rectangle given by origin and extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given size.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// X coordinate one past the right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Y coordinate one past the bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Whether this rectangle lies entirely within a `width` x `height` area
    /// anchored at the origin. Zero-sized rectangles on the boundary fit.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 0
            && self.height >= 0
            && self.right() <= width as i64
            && self.bottom() <= height as i64
    }
}

/// A floating-point rectangle given by origin and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectangleF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectangleF {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> PointF {
        PointF::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: PointF) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub(crate) fn to_skia(self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

impl From<Rectangle> for RectangleF {
    fn from(r: Rectangle) -> Self {
        Self {
            x: r.x as f32,
            y: r.y as f32,
            width: r.width as f32,
            height: r.height as f32,
        }
    }
}

/// A rectangle in device pixels given by its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PixelRect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within_edges() {
        assert!(Rectangle::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(Rectangle::new(10, 10, 0, 0).fits_within(10, 10));
        assert!(!Rectangle::new(1, 0, 10, 10).fits_within(10, 10));
        assert!(!Rectangle::new(0, 0, -1, 5).fits_within(10, 10));
        // No i32 overflow when adding extent to origin
        assert!(!Rectangle::new(i32::MAX, 0, i32::MAX, 1).fits_within(10, 10));
    }

    #[test]
    fn test_rectangle_f_center_and_contains() {
        let r = RectangleF::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.center(), PointF::new(25.0, 40.0));
        assert!(r.contains(PointF::new(10.0, 20.0)));
        assert!(!r.contains(PointF::new(40.0, 20.0)));
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }
}
