use rayon::prelude::*;

use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_PIXELS, CancelToken, Cancelled};
use crate::core::actions::render_tile::errors::RenderTileError;
use crate::core::actions::render_tile::ports::tile_algorithm::TileAlgorithm;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::point::Point;

/// Evaluates `rect` with one rayon task per row.
///
/// Cancellation is polled at the start of each row and every
/// [`CANCEL_CHECK_INTERVAL_PIXELS`] pixels within it. Results are row-major,
/// identical to [`render_tile_serial`](super::render_tile_serial::render_tile_serial).
pub fn render_tile_parallel_rayon<Alg, C>(
    rect: PixelRect,
    algorithm: &Alg,
    cancel: &C,
) -> Result<Vec<Alg::Success>, RenderTileError<Alg::Failure>>
where
    Alg: TileAlgorithm + Sync,
    Alg::Success: Send,
    Alg::Failure: Send,
    C: CancelToken,
{
    let x_start = rect.x();
    let x_end = rect.x() + rect.width();
    let row_width = rect.width() as usize;

    let rows: Result<Vec<Vec<Alg::Success>>, RenderTileError<Alg::Failure>> = (rect.y()
        ..rect.y() + rect.height())
        .into_par_iter()
        .map(|y| {
            let mut row = Vec::with_capacity(row_width);

            for (i, x) in (x_start..x_end).enumerate() {
                if i % CANCEL_CHECK_INTERVAL_PIXELS == 0 && cancel.is_cancelled() {
                    return Err(RenderTileError::Cancelled(Cancelled));
                }

                let value = algorithm
                    .compute(Point { x, y })
                    .map_err(RenderTileError::Algorithm)?;
                row.push(value);
            }

            Ok(row)
        })
        .collect();

    rows.map(|r| r.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::cancellation::NeverCancel;
    use crate::core::actions::render_tile::render_tile_serial::render_tile_serial;
    use crate::core::actions::render_tile::test_support::{AddCoordinates, AlwaysFails};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_rayon_matches_serial() {
        let rect = PixelRect::new(3, 1, 17, 9).unwrap();

        let serial = render_tile_serial(rect, &AddCoordinates, &NeverCancel).unwrap();
        let parallel = render_tile_parallel_rayon(rect, &AddCoordinates, &NeverCancel).unwrap();

        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_rayon_single_pixel() {
        let rect = PixelRect::new(40, 2, 1, 1).unwrap();

        let samples = render_tile_parallel_rayon(rect, &AddCoordinates, &NeverCancel).unwrap();

        assert_eq!(samples, vec![42]);
    }

    #[test]
    fn test_rayon_propagates_algorithm_failure() {
        let rect = PixelRect::new(0, 0, 3, 4).unwrap();

        let result = render_tile_parallel_rayon(rect, &AlwaysFails, &NeverCancel);

        assert!(matches!(result, Err(RenderTileError::Algorithm(_))));
    }

    #[test]
    fn test_rayon_returns_cancelled_when_token_is_raised() {
        let rect = PixelRect::new(0, 0, 10, 8).unwrap();

        let result = render_tile_parallel_rayon(rect, &AddCoordinates, &|| true);

        assert!(matches!(result, Err(RenderTileError::Cancelled(_))));
    }

    #[test]
    fn test_cancellation_polled_at_each_row_start() {
        let rect = PixelRect::new(0, 0, 2, 5).unwrap();
        let polls = AtomicUsize::new(0);
        let token = || {
            polls.fetch_add(1, Ordering::Relaxed);
            false
        };

        let result = render_tile_parallel_rayon(rect, &AddCoordinates, &token);

        assert!(result.is_ok());
        assert!(polls.load(Ordering::Relaxed) >= 5);
    }

    #[test]
    fn test_cancellation_polled_within_wide_rows() {
        let rect = PixelRect::new(0, 0, 1000, 2).unwrap();
        let polls = AtomicUsize::new(0);
        let token = || {
            polls.fetch_add(1, Ordering::Relaxed);
            false
        };

        let result = render_tile_parallel_rayon(rect, &AddCoordinates, &token);

        assert!(result.is_ok());
        // 0, 256, 512, 768 on each row
        assert!(polls.load(Ordering::Relaxed) >= 8);
    }
}
