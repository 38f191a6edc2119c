//! Precision policies.
//!
//! Rounding and formatting helpers shared by every place that compares or
//! prints coordinates:
//! - `canonical_f64` folds `-0.0` into `0.0` and all NaNs into one NaN.
//! - `round_to_decimals` rounds half away from zero, then canonicalizes.
//! - `format_fixed` prints a fixed number of decimals without a `-0.000`.

/// Canonicalize a floating-point value for deterministic comparison.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Round to `decimals` fractional digits.
///
/// Non-finite values are returned canonicalized but otherwise untouched.
pub fn round_to_decimals(v: f64, decimals: u32) -> f64 {
    if !v.is_finite() {
        return canonical_f64(v);
    }
    let scale = 10f64.powi(decimals as i32);
    let scaled = v * scale;
    if !scaled.is_finite() {
        return v;
    }
    canonical_f64(scaled.round() / scale)
}

/// Fixed-decimal formatting that never prints a negative zero.
pub fn format_fixed(v: f64, decimals: u32) -> String {
    let rounded = round_to_decimals(v, decimals);
    format!("{rounded:.prec$}", prec = decimals as usize)
}
