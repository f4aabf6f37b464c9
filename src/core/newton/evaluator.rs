use std::sync::Arc;

use num_complex::Complex32;

use crate::core::actions::render_tile::ports::tile_algorithm::TileAlgorithm;
use crate::core::data::point::Point;
use crate::core::newton::pixel_to_view_coords::{PixelToViewCoordsError, pixel_to_view_coords};
use crate::core::view::coefficients::CoefficientSet;

pub const DEFAULT_EPSILON: f32 = 1e-5;

/// Per-render iteration parameters shared by every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationParams {
    /// Convergence threshold on each component of the step, in view units.
    pub epsilon: f32,
    /// Damping factor `a` in `z' - a * F / F'`.
    pub relaxation: Complex32,
}

impl Default for IterationParams {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            relaxation: Complex32::new(1.0, 0.0),
        }
    }
}

/// Evaluates `F(sz)` and `F'(sz)` together, top slot first.
///
/// `F` uses slots `0..=order`; `F'` uses `(i + 1) * c[i + 1]`, which is why
/// the set carries one slot beyond the order.
#[inline]
fn horner_pair(coeffs: &[Complex32], sz: Complex32) -> (Complex32, Complex32) {
    let order = coeffs.len() - 2;

    let mut f = coeffs[order];
    let mut df = coeffs[order + 1] * (order + 1) as f32;

    for i in (0..order).rev() {
        f = f * sz + coeffs[i];
        df = df * sz + coeffs[i + 1] * (i + 1) as f32;
    }

    (f, df)
}

/// Runs Newton's method from `z0` (view coordinates) and returns the
/// iteration at which it converged, or the set's `max_iterations` if it never
/// did or the step stopped being finite.
#[must_use]
pub fn evaluate(coefficients: &CoefficientSet, z0: Complex32, params: &IterationParams) -> u16 {
    let coeffs = coefficients.coeffs();
    let scale = coefficients.scale();
    let max_iterations = coefficients.max_iterations();
    let mut z = z0;

    for n in 0..max_iterations {
        let (f, df) = horner_pair(coeffs, z * scale);
        let step = params.relaxation * f / (df * scale);

        if !step.is_finite() {
            return max_iterations;
        }

        z -= step;

        if step.re.abs() < params.epsilon && step.im.abs() < params.epsilon {
            return n;
        }
    }

    max_iterations
}

/// Binds a coefficient set to the raster it is addressed in.
#[derive(Debug, Clone)]
pub struct NewtonAlgorithm {
    coefficients: Arc<CoefficientSet>,
    raster_size: u32,
    params: IterationParams,
}

impl NewtonAlgorithm {
    #[must_use]
    pub fn new(coefficients: Arc<CoefficientSet>, raster_size: u32, params: IterationParams) -> Self {
        Self {
            coefficients,
            raster_size,
            params,
        }
    }

    #[must_use]
    pub fn params(&self) -> &IterationParams {
        &self.params
    }
}

impl TileAlgorithm for NewtonAlgorithm {
    type Success = u16;
    type Failure = PixelToViewCoordsError;

    fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure> {
        let z0 = pixel_to_view_coords(pixel, self.raster_size)?;

        Ok(evaluate(&self.coefficients, z0, &self.params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f32, im: f32) -> Complex32 {
        Complex32::new(re, im)
    }

    fn cubic(scale: f32, max_iterations: u16) -> CoefficientSet {
        CoefficientSet::from_parts(
            vec![c(-1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)],
            scale,
        )
        .unwrap()
        .with_max_iterations(max_iterations)
    }

    fn iterate(coefficients: &CoefficientSet, z0: Complex32, steps: u16) -> Complex32 {
        let mut z = z0;
        for _ in 0..steps {
            let (f, df) = horner_pair(coefficients.coeffs(), z * coefficients.scale());
            z -= f / (df * coefficients.scale());
        }
        z * coefficients.scale()
    }

    #[test]
    fn horner_pair_matches_direct_evaluation() {
        // F(w) = 1 + 2w + 3w^2 + 4w^3, F'(w) = 2 + 6w + 12w^2
        let set = CoefficientSet::from_parts(
            vec![c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0), c(4.0, 0.0), c(0.0, 0.0)],
            1.0,
        )
        .unwrap();
        let w = c(0.5, -0.25);

        let (f, df) = horner_pair(set.coeffs(), w);

        let expected_f = c(1.0, 0.0) + w * 2.0 + w * w * 3.0 + w * w * w * 4.0;
        let expected_df = c(2.0, 0.0) + w * 6.0 + w * w * 12.0;
        assert!((f - expected_f).norm() < 1e-5);
        assert!((df - expected_df).norm() < 1e-5);
    }

    #[test]
    fn top_slot_only_feeds_the_derivative() {
        // order 1 with a non-zero top slot: F(w) = 1 + w, F'(w) = 1 + 2 * 5 * w
        let set = CoefficientSet::from_parts(vec![c(1.0, 0.0), c(1.0, 0.0), c(5.0, 0.0)], 1.0).unwrap();

        let (f, df) = horner_pair(set.coeffs(), c(2.0, 0.0));

        assert_eq!(f, c(3.0, 0.0));
        assert_eq!(df, c(21.0, 0.0));
    }

    #[test]
    fn cubic_converges_to_a_root_of_unity_from_the_first_pixel() {
        let set = cubic(2.0, 512);
        let z0 = pixel_to_view_coords(Point { x: 0, y: 0 }, 512).unwrap();

        let iterations = evaluate(&set, z0, &IterationParams::default());
        assert!(iterations < 512, "did not converge");

        let root = iterate(&set, z0, iterations + 1);
        let roots = [
            c(1.0, 0.0),
            c(-0.5, 3f32.sqrt() / 2.0),
            c(-0.5, -(3f32.sqrt()) / 2.0),
        ];
        assert!(
            roots.iter().any(|r| (root - r).norm() < 1e-3),
            "converged to {root}"
        );

        // reproducible
        assert_eq!(evaluate(&set, z0, &IterationParams::default()), iterations);
    }

    #[test]
    fn starting_on_a_root_converges_immediately() {
        let set = cubic(1.0, 64);

        assert_eq!(evaluate(&set, c(1.0, 0.0), &IterationParams::default()), 0);
    }

    #[test]
    fn zero_derivative_maps_to_the_sentinel() {
        // F'(0) = 0 for z^3 - 1: the first step is not finite
        let set = cubic(2.0, 512);

        assert_eq!(evaluate(&set, c(0.0, 0.0), &IterationParams::default()), 512);
    }

    #[test]
    fn scaled_and_prescaled_sets_agree() {
        // sigma = 2 on raw coefficients vs. sigma = 1 with 2^i folded in,
        // sampled near each root where rounding cannot flip the basin
        let raw = cubic(2.0, 256);
        let folded = CoefficientSet::from_parts(
            vec![c(-1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(8.0, 0.0), c(0.0, 0.0)],
            1.0,
        )
        .unwrap()
        .with_max_iterations(256);
        let params = IterationParams::default();

        for &(x, y) in &[(48u32, 32u32), (23, 18), (23, 45), (40, 30)] {
            let z0 = pixel_to_view_coords(Point { x, y }, 64).unwrap();
            let a = i32::from(evaluate(&raw, z0, &params));
            let b = i32::from(evaluate(&folded, z0, &params));
            assert!((a - b).abs() <= 1, "pixel ({x}, {y}): {a} vs {b}");
        }
    }

    #[test]
    fn damping_slows_convergence() {
        let set = cubic(1.0, 256);
        let damped = IterationParams {
            relaxation: c(0.5, 0.0),
            ..IterationParams::default()
        };
        let z0 = c(0.9, 0.4);

        assert!(evaluate(&set, z0, &damped) > evaluate(&set, z0, &IterationParams::default()));
    }

    #[test]
    fn algorithm_rejects_pixels_outside_the_raster() {
        let algorithm = NewtonAlgorithm::new(Arc::new(cubic(1.0, 16)), 8, IterationParams::default());

        assert!(algorithm.compute(Point { x: 7, y: 7 }).is_ok());
        assert!(algorithm.compute(Point { x: 8, y: 0 }).is_err());
    }
}
