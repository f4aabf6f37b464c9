//! Deep-zoom Newton fractal engine.
//!
//! The view lives in arbitrary precision; each render derives a short Taylor
//! expansion of the formula around the view center, evaluated per pixel in
//! `f32`. Pans reuse already rendered pixels through a double-buffered tile
//! cache.

pub mod controllers;
pub mod core;
pub mod storage;

pub use controllers::interactive::{InputCoordinator, PresenterPort, RenderEvent, TickOutcome};
pub use controllers::render_once::{RenderSummary, ViewRequest, render_once, render_to_file};
pub use crate::core::actions::render_tile::RenderStrategy;
pub use crate::core::data::raster::Raster;
pub use crate::core::engine::{ComputeBackend, ConfigError, Engine, EngineConfig, EngineError, RangeError};
pub use crate::core::formula::FormulaError;
pub use crate::core::tiles::{TileCache, TileCacheError};
pub use crate::core::view::{CoefficientSet, ViewTransform};
