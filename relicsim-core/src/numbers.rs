//! Numeric conversion helpers centralizing rounding and safe casts.

use num_traits::cast::cast;

/// Round half away from zero to `decimals` places, returning 0.0 for non-finite values.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // normalize -0.0
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Round a f64 and clamp it to the i64 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    // i64::MAX is not representable as f64; the clamp lands one past it
    cast::<f64, i64>(clamped).unwrap_or(if clamped > 0.0 { i64::MAX } else { i64::MIN })
}

/// Convert a rank or key count to f64.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}

/// Number of grid points between `start` and `end` (inclusive) at `step` spacing.
#[must_use]
pub fn grid_len(start: f64, end: f64, step: f64) -> u32 {
    if step.is_nan() || step <= 0.0 || end < start {
        return 0;
    }
    let span = ((end - start) / step + 1e-9).floor();
    cast::<f64, u32>(span).map_or(0, |n| n.saturating_add(1))
}

/// Format a value the way the addon expects: shortest round-trip form with
/// at least one decimal place (`1.0`, `0.25`).
#[must_use]
pub fn format_decimal(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_matches_half_away_from_zero() {
        assert!((round_to(1.005_1, 2) - 1.01).abs() < f64::EPSILON);
        assert!((round_to(2.5, 0) - 3.0).abs() < f64::EPSILON);
        assert!((round_to(-2.5, 0) + 3.0).abs() < f64::EPSILON);
        assert!((round_to(f64::NAN, 2) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn round_to_never_yields_negative_zero() {
        let value = round_to(-0.001, 2);
        assert!(value.is_sign_positive());
        assert_eq!(format_decimal(value), "0.0");
    }

    #[test]
    fn i64_rounding_clamps() {
        assert_eq!(round_f64_to_i64(34.5), 35);
        assert_eq!(round_f64_to_i64(f64::NAN), 0);
        assert_eq!(round_f64_to_i64(f64::MAX), i64::MAX);
    }

    #[test]
    fn grid_len_counts_inclusive_points() {
        assert_eq!(grid_len(0.5, 200.0, 0.5), 400);
        assert_eq!(grid_len(1.0, 1.0, 0.5), 1);
        assert_eq!(grid_len(1.0, 0.0, 0.5), 0);
        assert_eq!(grid_len(0.0, 1.0, 0.0), 0);
    }

    #[test]
    fn decimal_format_keeps_trailing_zero() {
        assert_eq!(format_decimal(1.0), "1.0");
        assert_eq!(format_decimal(0.25), "0.25");
        assert_eq!(format_decimal(-0.0), "0.0");
        assert_eq!(format_decimal(12.5), "12.5");
    }
}
