use thiserror::Error;

use crate::core::tiles::TileCacheError;

/// Failure to set up an [`InputCoordinator`](crate::InputCoordinator).
/// Everything after construction is reported through the presenter port.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    TileCache(#[from] TileCacheError),
}
