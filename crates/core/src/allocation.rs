//! Percentage normalization for 4-bucket allocations.
//!
//! Two correction styles exist and are deliberately kept distinct because
//! downstream charts already expose their rounding behaviour:
//!
//! - [`normalize`] rounds every bucket independently, so the result can sum
//!   to 99 or 101.
//! - [`normalize_exact`] rounds the first three buckets and gives the last
//!   bucket the remainder, so the result always sums to exactly 100 (the
//!   remainder bucket may overshoot or go negative to absorb the error).

/// Clamp a weight to a finite non-negative value.
fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Scale four non-negative weights to percentages, rounding each bucket
/// independently.
///
/// An all-zero input is treated as `(1, 0, 0, 0)` to avoid dividing by
/// zero, so it yields `(100, 0, 0, 0)`.
pub fn normalize(values: [f64; 4]) -> [i64; 4] {
    let mut v = values.map(sanitize);
    let sum: f64 = v.iter().sum();
    if sum == 0.0 {
        v[0] = 1.0;
    }
    let sum: f64 = v.iter().sum();
    v.map(|x| (x / sum * 100.0).round() as i64)
}

/// Scale four non-negative weights to percentages summing to exactly 100.
///
/// The first three buckets are rounded independently; the last bucket takes
/// `100 - a - b - c` and is not clamped.
pub fn normalize_exact(values: [f64; 4]) -> [i64; 4] {
    let rounded = normalize(values);
    let [a, b, c, _] = rounded;
    [a, b, c, 100 - a - b - c]
}
