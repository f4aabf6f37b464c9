use thiserror::Error;

use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::point::Point;
use crate::core::data::tile::Tile;

/// One iteration count per sample.
pub type Sample = u16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    #[error("raster size {expected} does not match sample count {actual}")]
    BoundsMismatch { expected: usize, actual: usize },
    #[error(
        "rect at x:{}, y:{} size {}x{} outside of {width}x{height} raster",
        .rect.x(), .rect.y(), .rect.width(), .rect.height()
    )]
    RectOutsideBounds {
        rect: PixelRect,
        width: u32,
        height: u32,
    },
}

/// Row-major raster of iteration counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    samples: Vec<Sample>,
}

impl Raster {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_samples(width: u32, height: u32, samples: Vec<Sample>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize;

        if expected != samples.len() {
            return Err(RasterError::BoundsMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn get(&self, point: Point) -> Option<Sample> {
        if point.x >= self.width || point.y >= self.height {
            return None;
        }

        Some(self.samples[self.index(point.x, point.y)])
    }

    /// Nearest-neighbour lookup, clamped at the edges.
    #[must_use]
    pub fn sample(&self, x: i64, y: i64) -> Sample {
        if self.samples.is_empty() {
            return 0;
        }

        let cx = x.clamp(0, i64::from(self.width) - 1) as u32;
        let cy = y.clamp(0, i64::from(self.height) - 1) as u32;

        self.samples[self.index(cx, cy)]
    }

    /// Copies a tile's samples into its rectangle.
    pub fn blit(&mut self, tile: &Tile) -> Result<(), RasterError> {
        let rect = tile.rect();

        if rect.right() > u64::from(self.width) || rect.bottom() > u64::from(self.height) {
            return Err(RasterError::RectOutsideBounds {
                rect,
                width: self.width,
                height: self.height,
            });
        }

        let row_len = rect.width() as usize;
        for (row, source) in tile.samples().chunks_exact(row_len).enumerate() {
            let start = self.index(rect.x(), rect.y() + row as u32);
            self.samples[start..start + row_len].copy_from_slice(source);
        }

        Ok(())
    }

    /// Writes `self` translated by `(dx, dy)` into `target`, filling the
    /// uncovered strips with `blank`. Both rasters must have the same size.
    pub fn shift_into(&self, target: &mut Raster, dx: i64, dy: i64, blank: Sample) {
        debug_assert_eq!((self.width, self.height), (target.width, target.height));

        let width = i64::from(self.width);
        let height = i64::from(self.height);

        target.samples.fill(blank);

        if dx.abs() >= width || dy.abs() >= height {
            return;
        }

        let copy_len = (width - dx.abs()) as usize;
        let src_x = (-dx).max(0) as usize;
        let dst_x = dx.max(0) as usize;

        for dst_y in dy.max(0)..(height + dy.min(0)) {
            let src_y = dst_y - dy;
            let src_start = src_y as usize * self.width as usize + src_x;
            let dst_start = dst_y as usize * self.width as usize + dst_x;

            target.samples[dst_start..dst_start + copy_len]
                .copy_from_slice(&self.samples[src_start..src_start + copy_len]);
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
