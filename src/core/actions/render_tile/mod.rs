pub mod errors;
pub mod ports;
pub mod render_tile_boundary_trace;
pub mod render_tile_parallel_rayon;
pub mod render_tile_serial;

use serde::{Deserialize, Serialize};

use crate::core::actions::cancellation::CancelToken;
use crate::core::actions::render_tile::errors::RenderTileError;
use crate::core::actions::render_tile::ports::tile_algorithm::TileAlgorithm;
use crate::core::actions::render_tile::render_tile_boundary_trace::render_tile_boundary_trace;
use crate::core::actions::render_tile::render_tile_parallel_rayon::render_tile_parallel_rayon;
use crate::core::data::pixel_rect::PixelRect;

/// How the pixels of a tile are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStrategy {
    /// Every pixel, one rayon task per row.
    #[default]
    Exhaustive,
    /// Border plus value boundaries only; uniform interiors are filled.
    BoundaryTrace,
}

pub fn render_tile<Alg, C>(
    rect: PixelRect,
    algorithm: &Alg,
    strategy: RenderStrategy,
    cancel: &C,
) -> Result<Vec<u16>, RenderTileError<Alg::Failure>>
where
    Alg: TileAlgorithm<Success = u16> + Sync,
    Alg::Failure: Send,
    C: CancelToken,
{
    match strategy {
        RenderStrategy::Exhaustive => render_tile_parallel_rayon(rect, algorithm, cancel),
        RenderStrategy::BoundaryTrace => render_tile_boundary_trace(rect, algorithm, cancel),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use thiserror::Error;

    use crate::core::actions::render_tile::ports::tile_algorithm::TileAlgorithm;
    use crate::core::data::point::Point;

    #[derive(Debug, PartialEq, Error)]
    #[error("stub failure")]
    pub struct StubError;

    /// Sample is `x + y` in global coordinates.
    pub struct AddCoordinates;

    impl TileAlgorithm for AddCoordinates {
        type Success = u64;
        type Failure = StubError;

        fn compute(&self, pixel: Point) -> Result<u64, StubError> {
            Ok(u64::from(pixel.x) + u64::from(pixel.y))
        }
    }

    pub struct AlwaysFails;

    impl TileAlgorithm for AlwaysFails {
        type Success = u16;
        type Failure = StubError;

        fn compute(&self, _: Point) -> Result<u16, StubError> {
            Err(StubError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::cancellation::NeverCancel;
    use crate::core::actions::render_tile::errors::RenderTileError;
    use crate::core::data::point::Point;
    use crate::core::actions::render_tile::test_support::StubError;

    struct Stripes;

    impl TileAlgorithm for Stripes {
        type Success = u16;
        type Failure = StubError;

        fn compute(&self, pixel: Point) -> Result<u16, StubError> {
            Ok(u16::from(pixel.y >= 6))
        }
    }

    #[test]
    fn test_strategies_agree_on_region_boundaries() {
        let rect = PixelRect::new(0, 0, 16, 16).unwrap();

        let exhaustive = render_tile(rect, &Stripes, RenderStrategy::Exhaustive, &NeverCancel).unwrap();
        let traced = render_tile(rect, &Stripes, RenderStrategy::BoundaryTrace, &NeverCancel).unwrap();

        assert_eq!(exhaustive, traced);
    }

    #[test]
    fn test_strategy_names_in_config() {
        let strategy: RenderStrategy = serde_json::from_str("\"boundary_trace\"").unwrap();

        assert_eq!(strategy, RenderStrategy::BoundaryTrace);
        assert_eq!(RenderStrategy::default(), RenderStrategy::Exhaustive);
    }

    #[test]
    fn test_error_display() {
        let err: RenderTileError<StubError> = RenderTileError::Algorithm(StubError);

        assert_eq!(err.to_string(), "pixel evaluation failed: stub failure");
    }
}
