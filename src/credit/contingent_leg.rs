//! Contingent (protection) leg valuation.
//!
//! The protection payout `(1 - R)·N` is integrated against the default
//! density from the protection start to maturity. Sub-intervals are cut at
//! every curve knot so forward hazard and discount rates are constant on
//! each piece and the integral has the closed form
//! `(lambda/x)·(1 - e^{-x})·Q(t0)·DF(t0)` with `x = lambda + fwd`.

use chrono::NaiveDate;

use crate::credit::credit_curve::CreditCurve;
use crate::credit::fee_leg::TAYLOR_THRESHOLD;
use crate::credit::integration_grid;
use crate::rates::zero_curve::ZeroCurve;

/// Present value of the contingent leg at `value_date`.
///
/// Protection runs from `max(protection_start, value_date)` to `maturity`.
pub fn contingent_leg_pv(
    value_date: NaiveDate,
    protection_start: NaiveDate,
    maturity: NaiveDate,
    discount: &ZeroCurve,
    credit: &CreditCurve,
    recovery_rate: f64,
    notional: f64,
) -> f64 {
    let start = protection_start.max(value_date);
    let t_lo = discount.time_from_date(start);
    let t_hi = discount.time_from_date(maturity);
    if t_hi <= t_lo {
        return 0.0;
    }

    let loss = (1.0 - recovery_rate) * notional;

    let grid = integration_grid(discount, credit, t_lo, t_hi);
    let mut t0 = grid[0];
    let mut q0 = credit.survival_probability(t0);
    let mut df0 = discount.discount_factor(t0);

    let mut pv = 0.0;
    for &t1 in &grid[1..] {
        let q1 = credit.survival_probability(t1);
        let df1 = discount.discount_factor(t1);

        let lambda = q0.ln() - q1.ln();
        let fwd = df0.ln() - df1.ln();
        let x = lambda + fwd;

        pv += if x.abs() > TAYLOR_THRESHOLD {
            loss * lambda / x * (1.0 - (-x).exp()) * q0 * df0
        } else {
            // (1 - e^{-x})/x expanded around zero.
            let pv0 = loss * lambda * q0 * df0;
            let pv1 = -pv0 * x * 0.5;
            let pv2 = -pv1 * x / 3.0;
            let pv3 = -pv2 * x * 0.25;
            let pv4 = -pv3 * x * 0.2;
            pv0 + pv1 + pv2 + pv3 + pv4
        };

        t0 = t1;
        q0 = q1;
        df0 = df1;
    }

    pv / discount.discount_factor(discount.time_from_date(value_date))
}
