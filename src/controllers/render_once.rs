use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::core::actions::cancellation::ShutdownToken;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::raster::Raster;
use crate::core::engine::{ComputeBackend, Engine, EngineConfig};
use crate::storage::write_pgm::write_pgm_file;

/// Where to look before rendering a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewRequest {
    /// Zoom steps about the screen center; positive zooms in.
    pub zoom: i32,
    /// Pan in screen fractions applied after the zoom.
    pub move_x: f64,
    pub move_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub raster: Raster,
    pub center: String,
    pub scale: String,
}

/// Renders one full frame without the interactive machinery.
pub fn render_once(
    config: EngineConfig,
    view: &ViewRequest,
) -> Result<RenderSummary, Box<dyn std::error::Error>> {
    let mut engine = Engine::new(config)?;

    if view.zoom != 0 {
        engine.zoom_view(view.zoom, 0.5, 0.5)?;
    }
    if view.move_x != 0.0 || view.move_y != 0.0 {
        engine.move_view(view.move_x, view.move_y)?;
    }

    let size = engine.size();
    let start = Instant::now();
    let tile = engine.render_tile(PixelRect::square(size)?, &ShutdownToken::new())?;

    info!(
        size,
        order = engine.coefficients().order(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        center = %engine.center_str(),
        scale = %engine.scale_str(),
        "frame rendered"
    );

    Ok(RenderSummary {
        raster: Raster::from_samples(size, size, tile.into_samples())?,
        center: engine.center_str(),
        scale: engine.scale_str(),
    })
}

pub fn render_to_file(
    config: EngineConfig,
    view: &ViewRequest,
    filepath: impl AsRef<Path>,
) -> Result<RenderSummary, Box<dyn std::error::Error>> {
    let summary = render_once(config, view)?;
    write_pgm_file(&summary.raster, filepath.as_ref())?;

    info!(path = %filepath.as_ref().display(), "saved");
    Ok(summary)
}
