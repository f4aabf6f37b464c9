use rug::{Complex, Float};

use crate::core::formula::{FormulaError, Polynomial, parse_polynomial};
use crate::core::view::coefficients::{
    CoefficientError, CoefficientSet, MAX_ORDER, generate_normalized,
};
use crate::core::view::precision::{display_digits, format_with_decimal, required_precision};

/// Fixed parameters of the plane-to-screen mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    /// Half-width of the visible square at zoom level 0.
    pub initial_scale: f64,
    /// Zoom steps per doubling; the zoom ratio is `2^(1 / steps)`.
    pub zoom_steps_per_octave: u32,
    pub min_precision_bits: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            initial_scale: 2.0,
            zoom_steps_per_octave: 8,
            min_precision_bits: 128,
        }
    }
}

/// Arbitrary-precision view state: which part of the plane is visible and
/// which formula is being solved.
///
/// Screen coordinates are fractions of the raster (`x` right, `y` down, both
/// in `[0, 1]`). View coordinates `z'` span `[-1, 1]` with imaginary up; the
/// plane point is `center + scale * z'`.
#[derive(Debug, Clone)]
pub struct ViewTransform {
    settings: ViewSettings,
    prec: u32,
    center: Complex,
    scale: Float,
    zoom_level: i64,
    formula_text: String,
    formula: Polynomial,
    max_iterations: u16,
}

impl ViewTransform {
    pub fn new(
        settings: ViewSettings,
        formula_text: &str,
        max_iterations: u16,
    ) -> Result<Self, FormulaError> {
        let prec = settings.min_precision_bits;
        let formula = parse_polynomial(formula_text, prec, MAX_ORDER)?;
        let scale = scale_for_level(&settings, 0, prec);

        let mut view = Self {
            prec,
            center: Complex::new(prec),
            scale,
            zoom_level: 0,
            formula_text: formula_text.to_string(),
            formula,
            max_iterations,
            settings,
        };
        view.raise_precision();

        Ok(view)
    }

    #[must_use]
    pub fn center(&self) -> &Complex {
        &self.center
    }

    #[must_use]
    pub fn scale(&self) -> &Float {
        &self.scale
    }

    #[must_use]
    pub fn zoom_level(&self) -> i64 {
        self.zoom_level
    }

    #[must_use]
    pub fn prec(&self) -> u32 {
        self.prec
    }

    #[must_use]
    pub fn formula(&self) -> &Polynomial {
        &self.formula
    }

    #[must_use]
    pub fn formula_text(&self) -> &str {
        &self.formula_text
    }

    #[must_use]
    pub fn max_iterations(&self) -> u16 {
        self.max_iterations
    }

    /// Expansion order used for this formula: the polynomial's degree, so the
    /// local expansion is exact.
    #[must_use]
    pub fn order(&self) -> usize {
        self.formula.degree().min(MAX_ORDER)
    }

    /// Replaces the formula. On error nothing changes.
    pub fn set_formula(&mut self, text: &str) -> Result<(), FormulaError> {
        let formula = parse_polynomial(text, self.prec, MAX_ORDER)?;

        self.formula = formula;
        self.formula_text = text.to_string();
        Ok(())
    }

    pub fn set_max_iterations(&mut self, max_iterations: u16) {
        self.max_iterations = max_iterations;
    }

    /// Zooms by `level` steps (positive zooms in) keeping the plane point
    /// under the screen pivot fixed.
    pub fn zoom(&mut self, level: i32, pivot_x: f64, pivot_y: f64) {
        let (zx, zy) = screen_to_view(pivot_x, pivot_y);
        let pivot = self.plane_point(zx, zy);

        self.zoom_level += i64::from(level);
        self.scale = scale_for_level(&self.settings, self.zoom_level, self.prec);
        self.raise_precision();

        let mut offset = Complex::with_val(self.prec, (zx, zy));
        offset *= &self.scale;

        self.center = Complex::with_val(self.prec, &pivot - &offset);
    }

    /// Moves the view so the content follows a drag of `(dx, dy)` screen
    /// fractions.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        let mut delta = Complex::with_val(self.prec, (-2.0 * dx, 2.0 * dy));
        delta *= &self.scale;

        self.center += &delta;
    }

    /// `center + scale * (zx + i zy)`.
    #[must_use]
    pub fn plane_point(&self, zx: f64, zy: f64) -> Complex {
        let mut point = Complex::with_val(self.prec, (zx, zy));
        point *= &self.scale;
        point += &self.center;
        point
    }

    /// Normalized coefficient set for the current view.
    pub fn coefficients(&self) -> Result<CoefficientSet, CoefficientError> {
        generate_normalized(&self.center, &self.scale, &self.formula, self.order())
            .map(|set| set.with_max_iterations(self.max_iterations))
    }

    #[must_use]
    pub fn center_str(&self) -> String {
        format!(
            "({re}, {im})",
            re = format_with_decimal(self.center.real(), display_digits(self.center.real(), &self.scale)),
            im = format_with_decimal(self.center.imag(), display_digits(self.center.imag(), &self.scale)),
        )
    }

    #[must_use]
    pub fn scale_str(&self) -> String {
        format_with_decimal(&self.scale, 6)
    }

    fn raise_precision(&mut self) {
        let wanted = required_precision(&self.scale, self.settings.min_precision_bits);
        if wanted <= self.prec {
            return;
        }

        self.prec = wanted;
        self.center.set_prec(wanted);
        self.formula.set_prec(wanted);
        self.scale = scale_for_level(&self.settings, self.zoom_level, wanted);
    }
}

/// Screen fractions to view coordinates.
#[must_use]
pub fn screen_to_view(x: f64, y: f64) -> (f64, f64) {
    (2.0 * x - 1.0, 1.0 - 2.0 * y)
}

fn scale_for_level(settings: &ViewSettings, level: i64, prec: u32) -> Float {
    let mut scale = Float::with_val(prec, -level);
    scale /= settings.zoom_steps_per_octave.max(1);
    scale.exp2_mut();
    scale *= settings.initial_scale;
    scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ViewTransform {
        ViewTransform::new(ViewSettings::default(), "z^3 - 1", 128).unwrap()
    }

    fn distance(a: &Complex, b: &Complex) -> Float {
        let diff = Complex::with_val(a.prec().0.max(b.prec().0), a - b);
        Float::with_val(diff.prec().0, diff.abs_ref())
    }

    #[test]
    fn starts_centered_at_origin_with_initial_scale() {
        let view = view();

        assert!(view.center().real().is_zero());
        assert!(view.center().imag().is_zero());
        assert_eq!(view.scale().to_f64(), 2.0);
        assert_eq!(view.order(), 3);
    }

    #[test]
    fn zoom_keeps_pivot_fixed() {
        let mut view = view();
        view.move_by(0.137, -0.052);

        for (level, px, py) in [(1, 0.25, 0.75), (3, 0.9, 0.1), (-2, 0.5, 0.5), (5, 0.0, 1.0)] {
            let (zx, zy) = screen_to_view(px, py);
            let before = view.plane_point(zx, zy);

            view.zoom(level, px, py);

            let after = view.plane_point(zx, zy);
            let tolerance = Float::with_val(64, view.scale()) >> (view.prec() - 8);
            assert!(
                distance(&before, &after) <= tolerance,
                "pivot moved for level {level} at ({px}, {py})"
            );
        }
    }

    #[test]
    fn zoom_in_divides_scale_by_the_ratio() {
        let mut view = view();

        view.zoom(8, 0.5, 0.5);

        assert!((view.scale().to_f64() - 1.0).abs() < 1e-15);
        assert_eq!(view.zoom_level(), 8);
    }

    #[test]
    fn move_there_and_back_restores_center() {
        let mut view = view();
        view.zoom(17, 0.3, 0.6);
        let original = view.center().clone();

        view.move_by(0.1, 0.0);
        assert!(!distance(&original, view.center()).is_zero());
        view.move_by(-0.1, 0.0);

        let tolerance = Float::with_val(64, view.scale()) >> (view.prec() - 8);
        assert!(distance(&original, view.center()) <= tolerance);
    }

    #[test]
    fn move_follows_the_drag_direction() {
        let mut view = view();

        // dragging content right reveals what was to the left
        view.move_by(0.25, 0.0);
        assert_eq!(view.center().real().to_f64(), -1.0);

        // dragging content down reveals what was above
        view.move_by(0.0, 0.25);
        assert_eq!(view.center().imag().to_f64(), 1.0);
    }

    #[test]
    fn deep_zoom_raises_precision() {
        let mut view = view();
        let initial_prec = view.prec();

        view.zoom(8 * 300, 0.5, 0.5);

        assert!(view.prec() > initial_prec);
        assert!(view.prec() >= 300);
        assert_eq!(view.center().prec().0, view.prec());
    }

    #[test]
    fn failed_formula_change_keeps_previous_formula() {
        let mut view = view();

        assert!(view.set_formula("z^").is_err());
        assert_eq!(view.formula_text(), "z^3 - 1");
        assert_eq!(view.order(), 3);

        view.set_formula("z^5 + 2z").unwrap();
        assert_eq!(view.order(), 5);
    }

    #[test]
    fn position_strings_describe_the_view() {
        let view = view();

        let center = view.center_str();
        assert!(center.starts_with('(') && center.ends_with(')'), "{center}");
        assert_eq!(view.scale_str().parse::<f64>().unwrap(), 2.0);
    }
}
