use thiserror::Error;

use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::raster::RasterError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileCacheError {
    #[error("a fill sequence is already in flight")]
    SequenceInFlight,
    #[error("raster size must be at least 1, got {size}")]
    InvalidSize { size: u32 },
    #[error(
        "tile at x:{}, y:{} size {}x{} was not requested",
        .rect.x(), .rect.y(), .rect.width(), .rect.height()
    )]
    UnexpectedTile { rect: PixelRect },
    #[error(transparent)]
    Raster(#[from] RasterError),
}
