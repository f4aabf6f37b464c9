use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_PIXELS, CancelToken, Cancelled};
use crate::core::actions::render_tile::errors::RenderTileError;
use crate::core::actions::render_tile::ports::tile_algorithm::TileAlgorithm;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::point::Point;

/// Evaluates every pixel of `rect` on the calling thread, row-major.
pub fn render_tile_serial<Alg, C>(
    rect: PixelRect,
    algorithm: &Alg,
    cancel: &C,
) -> Result<Vec<Alg::Success>, RenderTileError<Alg::Failure>>
where
    Alg: TileAlgorithm,
    C: CancelToken,
{
    let mut samples = Vec::with_capacity(rect.size() as usize);

    for y in rect.y()..rect.y() + rect.height() {
        for x in rect.x()..rect.x() + rect.width() {
            if samples.len() % CANCEL_CHECK_INTERVAL_PIXELS == 0 && cancel.is_cancelled() {
                return Err(RenderTileError::Cancelled(Cancelled));
            }

            let value = algorithm
                .compute(Point { x, y })
                .map_err(RenderTileError::Algorithm)?;
            samples.push(value);
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::cancellation::NeverCancel;
    use crate::core::actions::render_tile::test_support::{AddCoordinates, AlwaysFails};

    #[test]
    fn test_serial_is_row_major_in_global_coordinates() {
        let rect = PixelRect::new(2, 5, 3, 2).unwrap();

        let samples = render_tile_serial(rect, &AddCoordinates, &NeverCancel).unwrap();

        assert_eq!(samples, vec![7, 8, 9, 8, 9, 10]);
    }

    #[test]
    fn test_serial_propagates_algorithm_failure() {
        let rect = PixelRect::new(0, 0, 2, 2).unwrap();

        let result = render_tile_serial(rect, &AlwaysFails, &NeverCancel);

        assert!(matches!(result, Err(RenderTileError::Algorithm(_))));
    }

    #[test]
    fn test_serial_stops_when_cancelled() {
        let rect = PixelRect::new(0, 0, 4, 4).unwrap();

        let result = render_tile_serial(rect, &AddCoordinates, &|| true);

        assert!(matches!(result, Err(RenderTileError::Cancelled(_))));
    }
}
