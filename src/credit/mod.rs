//! Credit primitives: hazard curves, CDS leg valuation, and the pricer.

pub mod contingent_leg;
pub mod credit_curve;
pub mod fee_leg;
pub mod pricer;

pub use contingent_leg::contingent_leg_pv;
pub use credit_curve::{
    CdsConventions, CreditCurve, bootstrap_credit_curve, bootstrap_flat_credit_curve,
};
pub use fee_leg::{accrued_interest, fee_leg_pv, rpv01};
pub use pricer::{CdsContract, CdsPricer, CdsPricingResult};

use crate::rates::ZeroCurve;

/// Sub-interval boundaries for leg integration over `[t_lo, t_hi]`.
///
/// Every knot of either curve lying strictly inside the interval becomes a
/// boundary, so forward discount rates and forward hazards are constant on
/// each sub-interval and the closed-form integrals are exact.
pub(crate) fn integration_grid(
    discount: &ZeroCurve,
    credit: &CreditCurve,
    t_lo: f64,
    t_hi: f64,
) -> Vec<f64> {
    let mut grid = Vec::with_capacity(discount.times().len() + credit.times().len() + 2);
    grid.push(t_lo);
    for &t in discount.times().iter().chain(credit.times().iter()) {
        if t > t_lo && t < t_hi {
            grid.push(t);
        }
    }
    grid.push(t_hi);
    grid.sort_by(f64::total_cmp);
    grid.dedup_by(|a, b| (*a - *b).abs() <= 1.0e-12);
    grid
}
