use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::actions::render_tile::RenderStrategy;
use crate::core::engine::errors::{ConfigError, RangeError};
use crate::core::formula::parse_polynomial;
use crate::core::newton::{DEFAULT_EPSILON, IterationParams};
use crate::core::view::{MAX_ORDER, ViewSettings};

pub const DEFAULT_FORMULA: &str = "z^3 - 1";
pub const DEFAULT_SIZE: u32 = 512;
pub const DEFAULT_MAX_ITER: u16 = 128;

/// Engine settings. Every field has a default, so a config file only needs
/// the ones it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub formula: String,
    pub size: u32,
    pub max_iterations: u16,
    pub min_size: u32,
    pub max_size: u32,
    pub initial_scale: f64,
    pub zoom_steps_per_octave: u32,
    pub min_precision_bits: u32,
    pub epsilon: f32,
    /// Damping factor as `[re, im]`.
    pub relaxation: [f32; 2],
    pub strategy: RenderStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            formula: DEFAULT_FORMULA.to_string(),
            size: DEFAULT_SIZE,
            max_iterations: DEFAULT_MAX_ITER,
            min_size: 1,
            max_size: 8192,
            initial_scale: 2.0,
            zoom_steps_per_octave: 8,
            min_precision_bits: 128,
            epsilon: DEFAULT_EPSILON,
            relaxation: [1.0, 0.0],
            strategy: RenderStrategy::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;

        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_size(self.size)?;
        if self.max_iterations == 0 {
            return Err(RangeError::MaxIterations { value: 0 }.into());
        }
        if !(self.initial_scale.is_finite() && self.initial_scale > 0.0) {
            return Err(RangeError::NonFinite {
                name: "initial_scale",
                value: self.initial_scale,
            }
            .into());
        }
        parse_polynomial(&self.formula, self.min_precision_bits, MAX_ORDER)?;

        Ok(())
    }

    pub fn check_size(&self, size: u32) -> Result<(), RangeError> {
        if size < self.min_size.max(1) || size > self.max_size {
            return Err(RangeError::Size {
                size,
                min: self.min_size.max(1),
                max: self.max_size,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            initial_scale: self.initial_scale,
            zoom_steps_per_octave: self.zoom_steps_per_octave,
            min_precision_bits: self.min_precision_bits,
        }
    }

    #[must_use]
    pub fn iteration_params(&self) -> IterationParams {
        IterationParams {
            epsilon: self.epsilon,
            relaxation: num_complex::Complex32::new(self.relaxation[0], self.relaxation[1]),
        }
    }
}
