use num_complex::Complex32;
use thiserror::Error;

use crate::core::data::point::Point;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PixelToViewCoordsError {
    #[error("point (x: {}, y: {}) is outside the {size}x{size} raster", .point.x, .point.y)]
    PointOutsideRaster { point: Point, size: u32 },
}

/// Maps the center of pixel `point` in a `size`x`size` raster to view
/// coordinates in `[-1, 1]`, imaginary axis pointing up.
pub fn pixel_to_view_coords(point: Point, size: u32) -> Result<Complex32, PixelToViewCoordsError> {
    if point.x >= size || point.y >= size {
        return Err(PixelToViewCoordsError::PointOutsideRaster { point, size });
    }

    let n = f64::from(size);
    let re = (2.0 * f64::from(point.x) + 1.0) / n - 1.0;
    let im = 1.0 - (2.0 * f64::from(point.y) + 1.0) / n;

    Ok(Complex32::new(re as f32, im as f32))
}
