use thiserror::Error;

use crate::core::data::point::Point;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PixelRectError {
    #[error("pixel rect size must be positive: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// A rectangle of raster pixels, addressed by its top-left corner and size.
///
/// This is the request shape of a tile: `(x, y, w, h)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PixelRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Result<Self, PixelRectError> {
        if width == 0 || height == 0 {
            return Err(PixelRectError::InvalidSize { width, height });
        }

        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// The whole `size`x`size` raster.
    pub fn square(size: u32) -> Result<Self, PixelRectError> {
        Self::new(0, 0, size, size)
    }

    #[must_use]
    pub fn x(&self) -> u32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> u32 {
        self.y
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Exclusive right edge.
    #[must_use]
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        self.x <= point.x
            && self.y <= point.y
            && u64::from(point.x) < self.right()
            && u64::from(point.y) < self.bottom()
    }

    /// Whether this rectangle lies entirely inside a `size`x`size` raster.
    #[must_use]
    pub fn fits_within(&self, size: u32) -> bool {
        self.right() <= u64::from(size) && self.bottom() <= u64::from(size)
    }

    #[must_use]
    pub fn intersects(&self, other: &PixelRect) -> bool {
        u64::from(self.x) < other.right()
            && u64::from(other.x) < self.right()
            && u64::from(self.y) < other.bottom()
            && u64::from(other.y) < self.bottom()
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}
