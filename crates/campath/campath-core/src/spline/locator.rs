//! Interval lookup over a strictly increasing knot array.

use crate::error::CamPathError;

/// Pair of knot indices bracketing a query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub lo: usize,
    pub hi: usize,
}

/// Find the knots surrounding `t`.
///
/// - one knot: `(0, 0)`
/// - `t <= times[0]` (or NaN): `(0, 0)`; callers return the first value directly
/// - `t >= times[n-1]`: `(n-2, n-1)`
/// - otherwise `hi` is the first knot strictly after `t` and `lo = hi - 1`
pub fn locate(times: &[f64], t: f64) -> Result<Bracket, CamPathError> {
    let n = times.len();
    if n == 0 {
        return Err(CamPathError::NoPoints);
    }
    if n == 1 || t <= times[0] || t.is_nan() {
        return Ok(Bracket { lo: 0, hi: 0 });
    }
    if t >= times[n - 1] {
        return Ok(Bracket { lo: n - 2, hi: n - 1 });
    }
    let hi = times.partition_point(|&knot| knot <= t);
    Ok(Bracket { lo: hi - 1, hi })
}

/// Fractional position of `t` inside `[lo, hi]`, clamped to `[0, 1]`.
#[inline]
pub(crate) fn fraction(times: &[f64], bracket: Bracket, t: f64) -> f64 {
    let span = times[bracket.hi] - times[bracket.lo];
    if span > 0.0 {
        ((t - times[bracket.lo]) / span).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
