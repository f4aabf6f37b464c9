pub mod config;
pub mod engine;
pub mod errors;
pub mod ports;

pub use config::EngineConfig;
pub use engine::Engine;
pub use errors::{ConfigError, EngineError, RangeError};
pub use ports::compute_backend::ComputeBackend;
