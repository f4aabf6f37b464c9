use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::actions::cancellation::ShutdownToken;
use crate::core::actions::render_tile::render_tile;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::tile::Tile;
use crate::core::engine::config::EngineConfig;
use crate::core::engine::errors::{EngineError, RangeError};
use crate::core::engine::ports::compute_backend::ComputeBackend;
use crate::core::newton::NewtonAlgorithm;
use crate::core::view::{CoefficientSet, ViewTransform};

/// Owns the view, the coefficient set derived from it, and the raster size.
///
/// The coefficient set is regenerated on every change that affects it, so
/// `render_tile` only ever reads.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    view: ViewTransform,
    coefficients: Arc<CoefficientSet>,
    size: u32,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.check_size(config.size)?;
        if config.max_iterations == 0 {
            return Err(RangeError::MaxIterations { value: 0 }.into());
        }

        let view = ViewTransform::new(config.view_settings(), &config.formula, config.max_iterations)?;
        let coefficients = Arc::new(view.coefficients()?);
        let size = config.size;

        Ok(Self {
            config,
            view,
            coefficients,
            size,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    #[must_use]
    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    #[must_use]
    pub fn max_iter(&self) -> u16 {
        self.view.max_iterations()
    }

    #[must_use]
    pub fn formula(&self) -> &str {
        self.view.formula_text()
    }

    /// `"OK"` on success, otherwise the diagnostic.
    pub fn set_formula_status(&mut self, text: &str) -> String {
        match self.set_formula(text) {
            Ok(()) => "OK".to_string(),
            Err(err) => err.to_string(),
        }
    }

    /// Applies `change` to a copy of the view and commits it together with
    /// the regenerated coefficients, or leaves everything as it was.
    fn commit(
        &mut self,
        change: impl FnOnce(&mut ViewTransform) -> Result<(), EngineError>,
    ) -> Result<(), EngineError> {
        let mut view = self.view.clone();
        change(&mut view)?;
        let coefficients = view.coefficients()?;

        self.view = view;
        self.coefficients = Arc::new(coefficients);
        Ok(())
    }
}

impl ComputeBackend for Engine {
    fn initialize(&mut self) -> Result<(), EngineError> {
        let fresh = Self::new(self.config.clone())?;
        *self = fresh;

        info!(size = self.size, formula = %self.formula(), "engine initialized");
        Ok(())
    }

    fn default_formula(&self) -> String {
        self.config.formula.clone()
    }

    fn default_size(&self) -> u32 {
        self.config.size
    }

    fn default_max_iter(&self) -> u16 {
        self.config.max_iterations
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn center_str(&self) -> String {
        self.view.center_str()
    }

    fn scale_str(&self) -> String {
        self.view.scale_str()
    }

    fn set_formula(&mut self, text: &str) -> Result<(), EngineError> {
        let result = self.commit(|view| Ok(view.set_formula(text)?));

        match &result {
            Ok(()) => info!(formula = text, order = self.view.order(), "formula changed"),
            Err(err) => warn!(formula = text, error = %err, "formula rejected"),
        }
        result
    }

    fn set_max_iter(&mut self, max_iter: u32) -> Result<(), EngineError> {
        let value = u16::try_from(max_iter)
            .ok()
            .filter(|&v| v > 0)
            .ok_or(RangeError::MaxIterations { value: max_iter })?;

        self.commit(|view| {
            view.set_max_iterations(value);
            Ok(())
        })?;

        info!(max_iter = value, "iteration budget changed");
        Ok(())
    }

    fn set_size(&mut self, size: u32) -> Result<(), EngineError> {
        self.config.check_size(size)?;
        self.size = size;

        info!(size, "raster size changed");
        Ok(())
    }

    fn move_view(&mut self, dx: f64, dy: f64) -> Result<(), EngineError> {
        finite("dx", dx)?;
        finite("dy", dy)?;

        self.commit(|view| {
            view.move_by(dx, dy);
            Ok(())
        })?;

        debug!(dx, dy, center = %self.view.center_str(), "view moved");
        Ok(())
    }

    fn zoom_view(&mut self, level: i32, pivot_x: f64, pivot_y: f64) -> Result<(), EngineError> {
        finite("pivot_x", pivot_x)?;
        finite("pivot_y", pivot_y)?;

        self.commit(|view| {
            view.zoom(level, pivot_x, pivot_y);
            Ok(())
        })?;

        debug!(
            level,
            zoom_level = self.view.zoom_level(),
            prec = self.view.prec(),
            scale = %self.view.scale_str(),
            "view zoomed"
        );
        Ok(())
    }

    fn render_tile(&self, rect: PixelRect, cancel: &ShutdownToken) -> Result<Tile, EngineError> {
        if !rect.fits_within(self.size) {
            return Err(RangeError::TileOutsideRaster {
                rect,
                size: self.size,
            }
            .into());
        }

        let algorithm = NewtonAlgorithm::new(
            Arc::clone(&self.coefficients),
            self.size,
            self.config.iteration_params(),
        );
        let samples = render_tile(rect, &algorithm, self.config.strategy, cancel)?;

        debug!(
            x = rect.x(),
            y = rect.y(),
            width = rect.width(),
            height = rect.height(),
            "tile rendered"
        );

        Tile::new(rect, samples).map_err(|_| {
            EngineError::Range(RangeError::TileOutsideRaster {
                rect,
                size: self.size,
            })
        })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), RangeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RangeError::NonFinite { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formula::FormulaError;

    fn small_engine() -> Engine {
        Engine::new(EngineConfig {
            size: 32,
            max_iterations: 64,
            ..EngineConfig::default()
        })
        .unwrap()
    }

    fn render_full(engine: &Engine) -> Tile {
        engine
            .render_tile(PixelRect::square(engine.size()).unwrap(), &ShutdownToken::new())
            .unwrap()
    }

    #[test]
    fn defaults_come_from_the_config() {
        let engine = Engine::new(EngineConfig::default()).unwrap();

        assert_eq!(engine.default_formula(), "z^3 - 1");
        assert_eq!(engine.default_size(), 512);
        assert_eq!(engine.default_max_iter(), 128);
        assert_eq!(engine.size(), 512);
        assert_eq!(engine.coefficients().order(), 3);
        assert_eq!(engine.coefficients().max_iterations(), 128);
    }

    #[test]
    fn rendering_twice_is_identical() {
        let engine = small_engine();

        assert_eq!(render_full(&engine), render_full(&engine));
    }

    #[test]
    fn sub_tile_matches_the_same_pixels_of_the_full_render() {
        let engine = small_engine();
        let full = render_full(&engine);
        let rect = PixelRect::new(5, 9, 7, 4).unwrap();

        let tile = engine.render_tile(rect, &ShutdownToken::new()).unwrap();

        for (i, sample) in tile.samples().iter().enumerate() {
            let x = rect.x() + i as u32 % rect.width();
            let y = rect.y() + i as u32 / rect.width();
            assert_eq!(*sample, full.samples()[(y * 32 + x) as usize]);
        }
    }

    #[test]
    fn tile_outside_the_raster_is_rejected() {
        let engine = small_engine();

        let result = engine.render_tile(PixelRect::new(30, 0, 4, 4).unwrap(), &ShutdownToken::new());

        assert!(matches!(
            result,
            Err(EngineError::Range(RangeError::TileOutsideRaster { .. }))
        ));
    }

    #[test]
    fn failed_formula_change_keeps_state() {
        let mut engine = small_engine();
        let before = render_full(&engine);

        let result = engine.set_formula("z^2 +");

        assert!(matches!(result, Err(EngineError::Formula(_))));
        assert_eq!(engine.formula(), "z^3 - 1");
        assert_eq!(render_full(&engine), before);
    }

    #[test]
    fn formula_status_reports_ok_or_diagnostic() {
        let mut engine = small_engine();

        assert_eq!(engine.set_formula_status("z^4 - 1"), "OK");
        assert_eq!(engine.coefficients().order(), 4);

        let diagnostic = engine.set_formula_status("z^7");
        assert_eq!(
            diagnostic,
            FormulaError::DegreeTooHigh { degree: 7, max: 6 }.to_string()
        );
        assert_eq!(engine.formula(), "z^4 - 1");
    }

    #[test]
    fn max_iter_is_range_checked() {
        let mut engine = small_engine();

        assert!(engine.set_max_iter(0).is_err());
        assert!(engine.set_max_iter(70_000).is_err());
        assert_eq!(engine.max_iter(), 64);

        engine.set_max_iter(65_535).unwrap();
        assert_eq!(engine.coefficients().max_iterations(), 65_535);
    }

    #[test]
    fn size_is_range_checked() {
        let mut engine = small_engine();

        assert!(engine.set_size(0).is_err());
        assert!(engine.set_size(100_000).is_err());
        assert_eq!(engine.size(), 32);

        engine.set_size(48).unwrap();
        assert_eq!(engine.size(), 48);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut engine = small_engine();
        let center = engine.center_str();

        assert!(engine.move_view(f64::NAN, 0.0).is_err());
        assert!(engine.zoom_view(1, 0.5, f64::INFINITY).is_err());
        assert_eq!(engine.center_str(), center);
    }

    #[test]
    fn initialize_restores_defaults() {
        let mut engine = small_engine();
        let scale = engine.scale_str();
        engine.zoom_view(12, 0.2, 0.3).unwrap();
        engine.set_formula("z^5 - z").unwrap();
        engine.set_size(40).unwrap();

        engine.initialize().unwrap();

        assert_eq!(engine.formula(), "z^3 - 1");
        assert_eq!(engine.size(), 32);
        assert_eq!(engine.scale_str(), scale);
    }

    #[test]
    fn zoom_in_then_out_restores_the_view() {
        let mut engine = small_engine();
        let before = render_full(&engine);

        engine.zoom_view(3, 0.7, 0.2).unwrap();
        assert_ne!(render_full(&engine), before);
        engine.zoom_view(-3, 0.7, 0.2).unwrap();

        let after = render_full(&engine);
        let differing = before
            .samples()
            .iter()
            .zip(after.samples())
            .filter(|(a, b)| a != b)
            .count();
        assert!(differing <= 8, "{differing} pixels differ");
    }

    #[test]
    fn cubic_corner_pixel_converges() {
        let engine = Engine::new(EngineConfig {
            max_iterations: 512,
            ..EngineConfig::default()
        })
        .unwrap();

        let tile = engine
            .render_tile(PixelRect::new(0, 0, 1, 1).unwrap(), &ShutdownToken::new())
            .unwrap();

        assert!(tile.samples()[0] < 512);
    }
}
