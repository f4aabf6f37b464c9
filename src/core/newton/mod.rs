pub mod evaluator;
pub mod pixel_to_view_coords;

pub use evaluator::{DEFAULT_EPSILON, IterationParams, NewtonAlgorithm, evaluate};
