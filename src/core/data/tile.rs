use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::raster::{RasterError, Sample};

/// A rendered sub-region of the raster: its request rectangle and the
/// row-major iteration counts for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    rect: PixelRect,
    samples: Vec<Sample>,
}

impl Tile {
    pub fn new(rect: PixelRect, samples: Vec<Sample>) -> Result<Self, RasterError> {
        let expected = rect.size() as usize;

        if expected != samples.len() {
            return Err(RasterError::BoundsMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self { rect, samples })
    }

    #[must_use]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}
