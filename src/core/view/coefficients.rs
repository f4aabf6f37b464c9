use num_complex::Complex32;
use rug::{Complex, Float};
use thiserror::Error;

use crate::core::formula::Polynomial;

/// Coefficient slots available to the evaluation stage.
pub const COEFFICIENT_SLOTS: usize = 8;

/// Highest expansion order that fits: `order + 2 <= COEFFICIENT_SLOTS`.
pub const MAX_ORDER: usize = COEFFICIENT_SLOTS - 2;

/// Iteration budget of a hand-built set until one is attached.
pub const DEFAULT_MAX_ITERATIONS: u16 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoefficientError {
    #[error("expansion order {order} exceeds the maximum of {max}")]
    OrderTooHigh { order: usize, max: usize },
    #[error("coefficient set needs between 2 and {max} entries, got {len}")]
    InvalidLength { len: usize, max: usize },
}

/// Bounded-precision Taylor expansion of the formula around the view center.
///
/// Entry `i` is `scale^i * f^(i)(center) / i!`, so `F(w) = sum c_i w^i` equals
/// `f(center + scale * w)`. The last entry only feeds the derivative ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSet {
    coeffs: Vec<Complex32>,
    scale: f32,
    max_iterations: u16,
}

impl CoefficientSet {
    /// Builds a set by hand. `scale` multiplies the starting coordinate before
    /// evaluation; generated sets use 1.0.
    pub fn from_parts(coeffs: Vec<Complex32>, scale: f32) -> Result<Self, CoefficientError> {
        if coeffs.len() < 2 || coeffs.len() > COEFFICIENT_SLOTS {
            return Err(CoefficientError::InvalidLength {
                len: coeffs.len(),
                max: COEFFICIENT_SLOTS,
            });
        }

        Ok(Self {
            coeffs,
            scale,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        })
    }

    /// Attaches the iteration budget evaluators run against.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u16) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn coeffs(&self) -> &[Complex32] {
        &self.coeffs
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub fn order(&self) -> usize {
        self.coeffs.len() - 2
    }

    #[must_use]
    pub fn max_iterations(&self) -> u16 {
        self.max_iterations
    }
}

/// Derives `order + 2` coefficients of `formula` expanded around `center`
/// with `scale` absorbed into each one, rounding to f32 only at the end.
pub fn generate(
    center: &Complex,
    scale: &Float,
    formula: &Polynomial,
    order: usize,
) -> Result<CoefficientSet, CoefficientError> {
    let exact = scaled_taylor(center, scale, formula, order)?;

    CoefficientSet::from_parts(exact.iter().map(round).collect(), 1.0)
}

/// Like [`generate`], but divides every coefficient by the largest magnitude
/// first. Newton's step `F / F'` is unchanged by a common factor, and the
/// rounded values stay inside f32 range however deep the view is.
pub fn generate_normalized(
    center: &Complex,
    scale: &Float,
    formula: &Polynomial,
    order: usize,
) -> Result<CoefficientSet, CoefficientError> {
    let exact = scaled_taylor(center, scale, formula, order)?;
    let prec = formula.prec();

    let largest = exact
        .iter()
        .map(|c| Float::with_val(prec, c.abs_ref()))
        .fold(Float::new(prec), |acc, m| if m > acc { m } else { acc });

    if largest.is_zero() {
        return CoefficientSet::from_parts(exact.iter().map(round).collect(), 1.0);
    }

    let coeffs = exact
        .iter()
        .map(|c| round(&Complex::with_val(prec, c / &largest)))
        .collect();

    CoefficientSet::from_parts(coeffs, 1.0)
}

fn scaled_taylor(
    center: &Complex,
    scale: &Float,
    formula: &Polynomial,
    order: usize,
) -> Result<Vec<Complex>, CoefficientError> {
    if order > MAX_ORDER {
        return Err(CoefficientError::OrderTooHigh {
            order,
            max: MAX_ORDER,
        });
    }

    let prec = formula.prec();
    let mut scale_power = Float::with_val(prec, 1);

    let mut coefficients = formula.taylor_coefficients(center, order + 2);
    for coefficient in &mut coefficients {
        *coefficient *= &scale_power;
        scale_power *= scale;
    }

    Ok(coefficients)
}

fn round(value: &Complex) -> Complex32 {
    Complex32::new(value.real().to_f32(), value.imag().to_f32())
}
