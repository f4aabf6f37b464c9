pub mod coefficients;
pub mod precision;
pub mod view_transform;

pub use coefficients::{
    COEFFICIENT_SLOTS, CoefficientError, CoefficientSet, DEFAULT_MAX_ITERATIONS, MAX_ORDER, generate,
    generate_normalized,
};
pub use view_transform::{ViewSettings, ViewTransform, screen_to_view};
