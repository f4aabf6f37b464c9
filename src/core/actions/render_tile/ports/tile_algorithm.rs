use std::error::Error;

use crate::core::data::point::Point;

/// A pure function from a raster pixel to its sample.
pub trait TileAlgorithm {
    type Success;
    type Failure: Error + 'static;

    fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure>;
}
