use thiserror::Error;

use crate::core::actions::cancellation::Cancelled;

/// Failure of a tile render: either shutdown interrupted it or the per-pixel
/// algorithm rejected a pixel.
#[derive(Debug, Error)]
pub enum RenderTileError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error("pixel evaluation failed: {0}")]
    Algorithm(#[source] E),
}
