//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Treat a raw count as a non-negative integer, mapping missing or negative values to zero.
#[must_use]
pub fn non_negative(value: Option<i64>) -> u64 {
    value.and_then(|raw| u64::try_from(raw).ok()).unwrap_or(0)
}

/// Clamp a raw signed value into `0..=max`.
#[must_use]
pub fn clamp_to_u32(value: i64, max: u32) -> u32 {
    let clamped = value.clamp(0, i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

/// Round a f64 to the nearest integer and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.round().clamp(min, max);
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Clamp a percentage into `[0, 100]`, returning 0 for NaN.
#[must_use]
pub fn clamp_pct(value: f64) -> f64 {
    if value.is_nan() {
        return crate::constants::PROGRESS_MIN_PCT;
    }
    value.clamp(
        crate::constants::PROGRESS_MIN_PCT,
        crate::constants::PROGRESS_MAX_PCT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_zeroes_missing_and_negative() {
        assert_eq!(non_negative(None), 0);
        assert_eq!(non_negative(Some(-4)), 0);
        assert_eq!(non_negative(Some(7)), 7);
    }

    #[test]
    fn clamp_to_u32_respects_bounds() {
        assert_eq!(clamp_to_u32(-3, 10), 0);
        assert_eq!(clamp_to_u32(4, 10), 4);
        assert_eq!(clamp_to_u32(i64::MAX, 10), 10);
    }

    #[test]
    fn round_handles_non_finite() {
        assert_eq!(round_f64_to_i64(2.5), 3);
        assert_eq!(round_f64_to_i64(-1.4), -1);
        assert_eq!(round_f64_to_i64(f64::NAN), 0);
        assert_eq!(round_f64_to_i64(f64::INFINITY), 0);
    }

    #[test]
    fn clamp_pct_bounds_and_nan() {
        assert!((clamp_pct(150.0) - 100.0).abs() < f64::EPSILON);
        assert!(clamp_pct(-5.0).abs() < f64::EPSILON);
        assert!(clamp_pct(f64::NAN).abs() < f64::EPSILON);
        assert!((clamp_pct(42.5) - 42.5).abs() < f64::EPSILON);
    }
}
