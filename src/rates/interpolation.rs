//! Flat-forward interpolation.
//!
//! The ISDA standard model interpolates curves so that instantaneous
//! forward rates are constant between knots, which is linear interpolation
//! of `r(t)·t`. Discount factors and survival probabilities are then
//! piecewise exponential in `t`.

/// Interpolates a continuously compounded rate at `t` from curve knots.
///
/// `times` must be strictly increasing and the same length as `rates`
/// (curve constructors enforce this). Left of the first knot the first rate
/// extends flat (constant forward `r_0`); right of the last knot the last
/// segment's forward rate extends flat. Knot values reproduce exactly.
pub fn flat_forward_rate(times: &[f64], rates: &[f64], t: f64) -> f64 {
    debug_assert_eq!(times.len(), rates.len());
    debug_assert!(!times.is_empty());

    let n = times.len();
    if t <= times[0] || n == 1 {
        return rates[0];
    }

    if t >= times[n - 1] {
        let r_prev = rates[n - 2] * times[n - 2];
        let r_last = rates[n - 1] * times[n - 1];
        let fwd = (r_last - r_prev) / (times[n - 1] - times[n - 2]);
        return (r_last + fwd * (t - times[n - 1])) / t;
    }

    // Largest i with times[i] < t; t lies in (times[i], times[i+1]].
    let idx = times.partition_point(|&x| x < t) - 1;
    let t0 = times[idx];
    let t1 = times[idx + 1];
    let r0 = rates[idx] * t0;
    let r1 = rates[idx + 1] * t1;

    let rt = r0 + (r1 - r0) * (t - t0) / (t1 - t0);
    rt / t
}
