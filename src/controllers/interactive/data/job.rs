use std::time::Duration;

use crate::controllers::interactive::data::pending_input::{SettingsChange, ZoomRequest};
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::tile::Tile;
use crate::core::engine::EngineError;

/// What the backend applies before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Settings(SettingsChange),
    /// `carry` is a sub-pixel pan, in screen fractions, applied before the
    /// zoom since the raster is re-rendered in full anyway.
    Zoom { request: ZoomRequest, carry: (f64, f64) },
    /// Pan by whole pixels, already expressed in screen fractions.
    Move { dx: f64, dy: f64 },
}

/// Which tiles to render once the command is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileRequest {
    /// The whole raster at whatever size the backend has after the command.
    FullRaster,
    Rects(Vec<PixelRect>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub generation: u64,
    pub command: Command,
    pub tiles: TileRequest,
}

#[derive(Debug)]
pub struct JobOutput {
    pub size: u32,
    pub tiles: Vec<Tile>,
    pub center: String,
    pub scale: String,
    /// Recoverable setting failures; the job still rendered.
    pub diagnostics: Vec<String>,
    pub render_duration: Duration,
}

#[derive(Debug)]
pub struct JobResult {
    pub generation: u64,
    pub outcome: Result<JobOutput, EngineError>,
}
