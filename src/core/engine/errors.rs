use thiserror::Error;

use crate::core::actions::render_tile::errors::RenderTileError;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::formula::FormulaError;
use crate::core::newton::pixel_to_view_coords::PixelToViewCoordsError;
use crate::core::view::CoefficientError;

/// A setting outside its accepted range. The previous value is kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("raster size {size} outside {min}..={max}")]
    Size { size: u32, min: u32, max: u32 },
    #[error("max iterations {value} outside 1..=65535")]
    MaxIterations { value: u32 },
    #[error(
        "tile at x:{}, y:{} size {}x{} outside the {size}x{size} raster",
        .rect.x(), .rect.y(), .rect.width(), .rect.height()
    )]
    TileOutsideRaster { rect: PixelRect, size: u32 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Coefficients(#[from] CoefficientError),
    #[error(transparent)]
    Render(#[from] RenderTileError<PixelToViewCoordsError>),
    #[error("compute backend is unavailable")]
    BackendUnavailable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error(transparent)]
    Range(#[from] RangeError),
}
