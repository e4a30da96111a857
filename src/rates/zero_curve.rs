//! Zero (discount) curve and its bootstrap from market quotes.
//!
//! Quotes with tenors up to one year are treated as money-market deposits
//! (simple ACT/360 interest); longer tenors are fixed-for-floating par
//! swaps whose terminal zero rate is solved so the par-swap equation
//! `sum(c·tau_i·DF(t_i)) + DF(t_N) = 1` holds. Knot times are ACT/365F
//! years from the base date and rates are continuously compounded.

use chrono::NaiveDate;

use crate::core::CdsError;
use crate::math::brent;
use crate::rates::calendar::{BadDayConvention, Calendar, add_months, adjust_business_day};
use crate::rates::day_count::{DayCountConvention, year_fraction};
use crate::rates::interpolation::flat_forward_rate;
use crate::rates::schedule::Frequency;
use crate::rates::tenor::Tenor;

/// Conventions applied when bootstrapping a [`ZeroCurve`].
///
/// Defaults match the ISDA standard rates converter: ACT/360 money market,
/// semi-annual 30/360 swap fixed legs, Modified Following adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ZeroCurveConfig {
    pub mm_day_count: DayCountConvention,
    pub fixed_day_count: DayCountConvention,
    pub fixed_frequency: Frequency,
    pub bad_day: BadDayConvention,
}

impl Default for ZeroCurveConfig {
    fn default() -> Self {
        Self {
            mm_day_count: DayCountConvention::Act360,
            fixed_day_count: DayCountConvention::Thirty360,
            fixed_frequency: Frequency::SemiAnnual,
            bad_day: BadDayConvention::ModifiedFollowing,
        }
    }
}

/// Continuously compounded zero-rate curve with flat-forward interpolation.
///
/// Immutable after construction; risk bumps produce shifted copies via
/// [`ZeroCurve::bumped`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZeroCurve {
    base_date: NaiveDate,
    times: Vec<f64>,
    rates: Vec<f64>,
}

impl ZeroCurve {
    /// Creates a curve from knot times (ACT/365F years) and zero rates.
    pub fn new(base_date: NaiveDate, times: Vec<f64>, rates: Vec<f64>) -> Result<Self, CdsError> {
        validate_knots(&times, &rates)?;
        Ok(Self {
            base_date,
            times,
            rates,
        })
    }

    pub(crate) fn from_parts(base_date: NaiveDate, times: Vec<f64>, rates: Vec<f64>) -> Self {
        Self {
            base_date,
            times,
            rates,
        }
    }

    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Curve time of a date: ACT/365F years from the base date (signed).
    pub fn time_from_date(&self, date: NaiveDate) -> f64 {
        year_fraction(self.base_date, date, DayCountConvention::Act365Fixed)
    }

    /// Interpolated zero rate at time `t`.
    pub fn zero_rate(&self, t: f64) -> f64 {
        flat_forward_rate(&self.times, &self.rates, t)
    }

    /// Discount factor `exp(-r(t)·t)`; 1.0 at or before the base date.
    pub fn discount_factor(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        (-self.zero_rate(t) * t).exp()
    }

    /// Discount factor at a calendar date.
    pub fn discount_factor_at(&self, date: NaiveDate) -> f64 {
        self.discount_factor(self.time_from_date(date))
    }

    /// Continuously compounded forward rate between `t1` and `t2`.
    pub fn forward_rate(&self, t1: f64, t2: f64) -> f64 {
        if t2 <= t1 {
            return self.zero_rate(t1);
        }
        let df1 = self.discount_factor(t1);
        let df2 = self.discount_factor(t2);
        (df1 / df2).ln() / (t2 - t1)
    }

    /// Logical copy with every knot rate shifted by `shift` (absolute).
    pub fn bumped(&self, shift: f64) -> Self {
        Self {
            base_date: self.base_date,
            times: self.times.clone(),
            rates: self.rates.iter().map(|r| r + shift).collect(),
        }
    }

    /// Bootstraps a curve from money-market and par-swap quotes.
    ///
    /// `rates` and `tenors` must be the same length, ordered by maturity.
    /// One knot is produced per instrument. Quote classification is by
    /// tenor: at most one year means money market, beyond means par swap.
    pub fn bootstrap(
        base_date: NaiveDate,
        rates: &[f64],
        tenors: &[Tenor],
        config: &ZeroCurveConfig,
        calendar: &Calendar,
    ) -> Result<Self, CdsError> {
        if rates.is_empty() {
            return Err(CdsError::InvalidInput("no curve instruments supplied".into()));
        }
        if rates.len() != tenors.len() {
            return Err(CdsError::InvalidInput(format!(
                "rates ({}) and tenors ({}) must have the same length",
                rates.len(),
                tenors.len()
            )));
        }

        let mut knot_times: Vec<f64> = Vec::with_capacity(rates.len());
        let mut knot_rates: Vec<f64> = Vec::with_capacity(rates.len());

        for (i, (&rate, tenor)) in rates.iter().zip(tenors.iter()).enumerate() {
            if !rate.is_finite() {
                return Err(CdsError::InvalidInput(format!(
                    "non-finite rate for tenor {tenor}"
                )));
            }

            let maturity_unadj = tenor.add_to(base_date);
            let maturity = adjust_business_day(maturity_unadj, config.bad_day, calendar);
            let t = year_fraction(base_date, maturity, DayCountConvention::Act365Fixed);

            if t <= 0.0 || knot_times.last().is_some_and(|&prev| t <= prev) {
                return Err(CdsError::InvalidInput(
                    "instrument tenors must be strictly increasing".into(),
                ));
            }

            let zero = if tenor.years() <= 1.0 {
                money_market_zero_rate(base_date, maturity, rate, t, config).map_err(|reason| {
                    CdsError::CurveBootstrapFailed { knot: i, reason }
                })?
            } else {
                bootstrap_swap_knot(
                    base_date,
                    maturity_unadj,
                    maturity,
                    rate,
                    t,
                    &knot_times,
                    &knot_rates,
                    config,
                    calendar,
                )
                .map_err(|reason| CdsError::CurveBootstrapFailed { knot: i, reason })?
            };

            knot_times.push(t);
            knot_rates.push(zero);
        }

        ZeroCurve::new(base_date, knot_times, knot_rates)
    }
}

pub(crate) fn validate_knots(times: &[f64], rates: &[f64]) -> Result<(), CdsError> {
    if times.is_empty() {
        return Err(CdsError::InvalidInput("curve has no knots".into()));
    }
    if times.len() != rates.len() {
        return Err(CdsError::InvalidInput(format!(
            "times ({}) and rates ({}) must have the same length",
            times.len(),
            rates.len()
        )));
    }
    if times[0] < 0.0 {
        return Err(CdsError::DateOutOfRange(
            "first knot precedes the curve base date".into(),
        ));
    }
    if times.windows(2).any(|w| w[1] <= w[0]) {
        return Err(CdsError::InvalidInput(
            "knot times must be strictly increasing".into(),
        ));
    }
    if times.iter().chain(rates.iter()).any(|x| !x.is_finite()) {
        return Err(CdsError::InvalidInput("curve knots must be finite".into()));
    }
    Ok(())
}

/// Zero rate implied by a simple-interest deposit maturing at `maturity`.
fn money_market_zero_rate(
    base_date: NaiveDate,
    maturity: NaiveDate,
    rate: f64,
    t: f64,
    config: &ZeroCurveConfig,
) -> Result<f64, String> {
    let tau = year_fraction(base_date, maturity, config.mm_day_count);
    let growth = 1.0 + rate * tau;
    if growth <= 0.0 {
        return Err(format!("deposit rate {rate} implies non-positive growth"));
    }
    // DF = 1/(1 + r*tau), knot rate from the ACT/365F time.
    Ok(growth.ln() / t)
}

/// Solves the terminal zero rate making the par-swap equation hold.
#[allow(clippy::too_many_arguments)]
fn bootstrap_swap_knot(
    base_date: NaiveDate,
    maturity_unadj: NaiveDate,
    maturity: NaiveDate,
    swap_rate: f64,
    t_maturity: f64,
    knot_times: &[f64],
    knot_rates: &[f64],
    config: &ZeroCurveConfig,
    calendar: &Calendar,
) -> Result<f64, String> {
    let step = config.fixed_frequency.months();
    let mut payment_dates = Vec::new();
    let mut k = 1;
    loop {
        let unadj = add_months(base_date, k * step);
        if unadj >= maturity_unadj {
            break;
        }
        payment_dates.push(adjust_business_day(unadj, config.bad_day, calendar));
        k += 1;
    }
    payment_dates.push(maturity);

    let mut accruals = Vec::with_capacity(payment_dates.len());
    let mut pay_times = Vec::with_capacity(payment_dates.len());
    let mut prev = base_date;
    for &pd in &payment_dates {
        accruals.push(year_fraction(prev, pd, config.fixed_day_count));
        pay_times.push(year_fraction(base_date, pd, DayCountConvention::Act365Fixed));
        prev = pd;
    }

    let mut trial_times = knot_times.to_vec();
    trial_times.push(t_maturity);
    let mut trial_rates = knot_rates.to_vec();
    trial_rates.push(0.0);
    let idx = trial_rates.len() - 1;

    let mut objective = |z: f64| {
        trial_rates[idx] = z;
        let mut pv = 0.0;
        for (&tau, &tp) in accruals.iter().zip(pay_times.iter()) {
            let df = (-flat_forward_rate(&trial_times, &trial_rates, tp) * tp).exp();
            pv += swap_rate * tau * df;
        }
        let df_mat = (-flat_forward_rate(&trial_times, &trial_rates, t_maturity) * t_maturity).exp();
        pv + df_mat - 1.0
    };

    brent(&mut objective, -0.5, 0.5, 1.0e-14, 100)
        .or_else(|_| brent(&mut objective, -1.0, 1.0, 1.0e-14, 100))
        .map_err(|e| e.to_string())
}
