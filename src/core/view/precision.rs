use rug::Float;

/// Working precision is kept in whole words.
const PRECISION_STEP_BITS: u32 = 32;

/// Extra bits beyond what is needed to resolve the view, so that the
/// Taylor coefficients stay exact to well below one pixel.
const GUARD_BITS: u32 = 64;

/// Bits needed to address a view of half-width `scale` around any center of
/// magnitude up to a few units.
#[must_use]
pub fn required_precision(scale: &Float, min_bits: u32) -> u32 {
    let depth = scale.get_exp().map_or(0, |exp| (-exp).max(0) as u32);
    let bits = depth + GUARD_BITS;
    let rounded = bits.div_ceil(PRECISION_STEP_BITS) * PRECISION_STEP_BITS;

    rounded.max(min_bits)
}

/// Scientific notation that always carries a decimal point (`1.0e0`, never `1e0`).
#[must_use]
pub fn format_with_decimal(value: &Float, digits: usize) -> String {
    let text = format!("{:.*e}", digits, value);
    if text.contains('.') {
        text
    } else {
        text.replacen('e', ".0e", 1)
    }
}

/// Significant digits needed to tell neighbouring pixels apart at this scale.
#[must_use]
pub fn display_digits(value: &Float, scale: &Float) -> usize {
    let value_exp = value.get_exp().unwrap_or(0);
    let scale_exp = scale.get_exp().unwrap_or(0);
    let bits = (value_exp - scale_exp).max(0) as f64;

    (bits * std::f64::consts::LOG10_2).ceil() as usize + 4
}
