use crate::{ast::Location, error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Formats a number the way the language prints it.
///
/// Integral values print without a fractional part. Everything else prints
/// with six decimal places and the trailing zeros trimmed. Non-finite values
/// print as `nan`, `inf` and `-inf`.
///
/// ## Parameters
/// - `value`: The number to format.
///
/// ## Returns
/// The display string.
///
/// ## Example
/// ```
/// use volt::util::num::format_number;
///
/// assert_eq!(format_number(42.0), "42");
/// assert_eq!(format_number(-3.5), "-3.5");
/// assert_eq!(format_number(1.0 / 3.0), "0.333333");
/// assert_eq!(format_number(f64::INFINITY), "inf");
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value.fract() == 0.0 {
        if value.abs() < i64::MAX as f64 {
            return (value as i64).to_string();
        }
        return format!("{value:.0}");
    }

    let fixed = format!("{value:.6}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Safely converts a `usize` to `f64` if and only if it is exactly
/// representable; larger values saturate at `MAX_SAFE_U64_INT`.
///
/// Used for lengths and sizes, which are always far below the limit in
/// practice.
///
/// ## Example
/// ```
/// use volt::util::num::usize_to_f64;
///
/// assert_eq!(usize_to_f64(100), 100.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    let value = u64::try_from(value).unwrap_or(u64::MAX).min(MAX_SAFE_U64_INT);
    value as f64
}

/// Converts a number used as an array index into a position.
///
/// ## Errors
/// - `RuntimeError::InvalidIndex` if the value is fractional or not finite.
/// - `RuntimeError::IndexOutOfBounds` if it is negative or not below
///   `length`.
///
/// ## Parameters
/// - `value`: The index as evaluated.
/// - `length`: Current length of the indexed array.
/// - `loc`: Source location for error reporting.
///
/// ## Returns
/// - `Ok(usize)`: A position inside the array.
///
/// ## Example
/// ```
/// use volt::{ast::Location, error::RuntimeError, util::num::f64_to_index_checked};
///
/// let loc = Location::new(1, 1);
/// assert_eq!(f64_to_index_checked(2.0, 3, loc).unwrap(), 2);
///
/// let err = f64_to_index_checked(3.0, 3, loc).unwrap_err();
/// assert!(matches!(err, RuntimeError::IndexOutOfBounds { length: 3, .. }));
///
/// let err = f64_to_index_checked(0.5, 3, loc).unwrap_err();
/// assert!(matches!(err, RuntimeError::InvalidIndex { .. }));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
pub fn f64_to_index_checked(value: f64, length: usize, loc: Location) -> EvalResult<usize> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(RuntimeError::InvalidIndex { details: format!("Array index must be an integer, got {}",
                                                                 format_number(value)),
                                                loc });
    }
    if value < 0.0 || value >= usize_to_f64(length) {
        return Err(RuntimeError::IndexOutOfBounds { index: value,
                                                    length,
                                                    loc });
    }
    Ok(value as usize)
}

/// Converts a number into a slice bound, clamping it into `0..=length`.
///
/// Negative bounds count back from the end, as in `slice(-2, len)`.
/// Fractional bounds are truncated toward zero.
///
/// ## Example
/// ```
/// use volt::util::num::clamp_slice_bound;
///
/// assert_eq!(clamp_slice_bound(1.0, 4), 1);
/// assert_eq!(clamp_slice_bound(-1.0, 4), 3);
/// assert_eq!(clamp_slice_bound(10.0, 4), 4);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn clamp_slice_bound(value: f64, length: usize) -> usize {
    let len = usize_to_f64(length);
    let bound = if value < 0.0 { (len + value.trunc()).max(0.0) } else { value.trunc().min(len) };
    if bound.is_nan() { 0 } else { bound as usize }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_at_the_edge_of_i64_print_exactly() {
        let two_pow_63 = 2f64.powi(63);
        assert_eq!(format_number(two_pow_63), "9223372036854775808");
        assert_eq!(format_number(-two_pow_63), "-9223372036854775808");
        assert_eq!(format_number(2f64.powi(62)), "4611686018427387904");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-0.000_000_1), "0");
    }
}
