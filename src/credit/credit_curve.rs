//! Credit (hazard) curve and its bootstrap from par CDS spreads.
//!
//! Knot values are hazard-integrated averages `h(t)` with survival
//! `Q(t) = exp(-h(t)·t)`, interpolated flat-forward exactly like zero
//! rates, so forward hazards are piecewise constant between knots.

use chrono::NaiveDate;

use crate::core::CdsError;
use crate::credit::contingent_leg::contingent_leg_pv;
use crate::credit::fee_leg::fee_leg_pv;
use crate::math::{MathError, brent};
use crate::rates::calendar::{BadDayConvention, Calendar};
use crate::rates::day_count::{DayCountConvention, year_fraction};
use crate::rates::imm::previous_imm;
use crate::rates::interpolation::flat_forward_rate;
use crate::rates::schedule::{CdsSchedule, Frequency};
use crate::rates::zero_curve::{ZeroCurve, validate_knots};

/// Standard CDS contract conventions used while bootstrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CdsConventions {
    pub frequency: Frequency,
    pub day_count: DayCountConvention,
    pub bad_day: BadDayConvention,
}

impl Default for CdsConventions {
    fn default() -> Self {
        Self {
            frequency: Frequency::Quarterly,
            day_count: DayCountConvention::Act360,
            bad_day: BadDayConvention::ModifiedFollowing,
        }
    }
}

/// Survival-probability term structure.
///
/// Immutable after bootstrap; [`CreditCurve::bumped`] returns a shifted
/// logical copy for risk runs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CreditCurve {
    base_date: NaiveDate,
    times: Vec<f64>,
    rates: Vec<f64>,
}

impl CreditCurve {
    /// Creates a curve from knot times (ACT/365F years) and hazard-integrated
    /// average rates.
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

    /// Hazard-integrated average rate at time `t`.
    pub fn hazard_rate(&self, t: f64) -> f64 {
        flat_forward_rate(&self.times, &self.rates, t)
    }

    /// Survival probability `Q(t) = exp(-h(t)·t)`; 1.0 at or before base.
    pub fn survival_probability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        (-self.hazard_rate(t) * t).exp()
    }

    /// Survival probability at a calendar date.
    pub fn survival_probability_at(&self, date: NaiveDate) -> f64 {
        self.survival_probability(self.time_from_date(date))
    }

    /// Forward hazard rate between `t1` and `t2`.
    pub fn forward_hazard_rate(&self, t1: f64, t2: f64) -> f64 {
        if t2 <= t1 {
            return self.hazard_rate(t1);
        }
        let q1 = self.survival_probability(t1);
        let q2 = self.survival_probability(t2);
        (q1 / q2).ln() / (t2 - t1)
    }

    /// Logical copy with every knot rate shifted by `shift` (absolute).
    pub fn bumped(&self, shift: f64) -> Self {
        Self {
            base_date: self.base_date,
            times: self.times.clone(),
            rates: self.rates.iter().map(|r| r + shift).collect(),
        }
    }
}

/// Bootstraps a credit curve from par CDS spreads at IMM-aligned maturities.
///
/// One knot per quote, in maturity order. For each knot the hazard level is
/// solved so that a par CDS to that maturity, paying its own spread as
/// coupon, has zero upfront value against `zero_curve`; earlier segments
/// stay fixed, so only the forward hazard over the newest segment is free.
pub fn bootstrap_credit_curve(
    base_date: NaiveDate,
    par_spreads: &[f64],
    maturities: &[NaiveDate],
    zero_curve: &ZeroCurve,
    recovery_rate: f64,
    conventions: &CdsConventions,
    calendar: &Calendar,
) -> Result<CreditCurve, CdsError> {
    if par_spreads.is_empty() {
        return Err(CdsError::InvalidInput("no par spreads supplied".into()));
    }
    if par_spreads.len() != maturities.len() {
        return Err(CdsError::InvalidInput(format!(
            "par spreads ({}) and maturities ({}) must have the same length",
            par_spreads.len(),
            maturities.len()
        )));
    }
    if !(0.0..1.0).contains(&recovery_rate) {
        return Err(CdsError::InvalidInput(format!(
            "recovery rate {recovery_rate} outside [0, 1)"
        )));
    }

    let accrual_start = previous_imm(base_date);
    let mut times: Vec<f64> = Vec::with_capacity(par_spreads.len());
    let mut hazards: Vec<f64> = Vec::with_capacity(par_spreads.len());

    for (k, (&spread, &maturity)) in par_spreads.iter().zip(maturities.iter()).enumerate() {
        if !spread.is_finite() || spread < 0.0 {
            return Err(CdsError::InvalidInput(format!(
                "par spread {spread} at knot {k} must be finite and non-negative"
            )));
        }
        let t = year_fraction(base_date, maturity, DayCountConvention::Act365Fixed);
        if t <= 0.0 || times.last().is_some_and(|&prev| t <= prev) {
            return Err(CdsError::InvalidInput(
                "CDS maturities must be strictly increasing and after the base date".into(),
            ));
        }

        if spread == 0.0 {
            times.push(t);
            hazards.push(0.0);
            continue;
        }

        let schedule = CdsSchedule::generate(
            accrual_start,
            maturity,
            conventions.frequency,
            conventions.day_count,
            conventions.bad_day,
            calendar,
        )?;

        let mut trial_times = times.clone();
        trial_times.push(t);
        let mut trial_rates = hazards.clone();
        trial_rates.push(0.0);
        let idx = trial_rates.len() - 1;

        let mut objective = |h: f64| {
            trial_rates[idx] = h;
            let trial =
                CreditCurve::from_parts(base_date, trial_times.clone(), trial_rates.clone());
            let fee = fee_leg_pv(base_date, &schedule, spread, zero_curve, &trial, 1.0, true);
            let cont = contingent_leg_pv(
                base_date,
                accrual_start,
                maturity,
                zero_curve,
                &trial,
                recovery_rate,
                1.0,
            );
            cont - fee
        };

        let hazard = solve_hazard(&mut objective, k)?;

        times.push(t);
        hazards.push(hazard);
    }

    CreditCurve::new(base_date, times, hazards)
}

/// Bootstraps a single-knot credit curve from one par spread.
///
/// Used when a trade supplies only its own quote: the flat hazard level is
/// solved so the CDS to `maturity`, paying `par_spread` as coupon, prices
/// at zero upfront.
pub fn bootstrap_flat_credit_curve(
    base_date: NaiveDate,
    par_spread: f64,
    maturity: NaiveDate,
    zero_curve: &ZeroCurve,
    recovery_rate: f64,
    accrual_start: NaiveDate,
    conventions: &CdsConventions,
    calendar: &Calendar,
) -> Result<CreditCurve, CdsError> {
    if !par_spread.is_finite() || par_spread < 0.0 {
        return Err(CdsError::InvalidInput(format!(
            "par spread {par_spread} must be finite and non-negative"
        )));
    }
    if !(0.0..1.0).contains(&recovery_rate) {
        return Err(CdsError::InvalidInput(format!(
            "recovery rate {recovery_rate} outside [0, 1)"
        )));
    }

    let t = year_fraction(base_date, maturity, DayCountConvention::Act365Fixed);
    if t <= 0.0 {
        return Err(CdsError::DateOutOfRange(format!(
            "maturity {maturity} is not after curve base {base_date}"
        )));
    }

    if par_spread == 0.0 {
        return CreditCurve::new(base_date, vec![t], vec![0.0]);
    }

    let schedule = CdsSchedule::generate(
        accrual_start,
        maturity,
        conventions.frequency,
        conventions.day_count,
        conventions.bad_day,
        calendar,
    )?;

    let mut objective = |h: f64| {
        let trial = CreditCurve::from_parts(base_date, vec![t], vec![h]);
        let fee = fee_leg_pv(base_date, &schedule, par_spread, zero_curve, &trial, 1.0, true);
        let cont = contingent_leg_pv(
            base_date,
            accrual_start,
            maturity,
            zero_curve,
            &trial,
            recovery_rate,
            1.0,
        );
        cont - fee
    };

    let hazard = solve_hazard(&mut objective, 0)?;

    CreditCurve::new(base_date, vec![t], vec![hazard])
}

/// Solves a bootstrap objective for one hazard knot.
///
/// The standard bracket `[1e-8, 10.0]` covers any market-like spread;
/// distressed quotes can push the root higher, so an unbracketed interval
/// grows the upper bound before giving up.
fn solve_hazard<F>(objective: &mut F, knot: usize) -> Result<f64, CdsError>
where
    F: FnMut(f64) -> f64,
{
    let mut hi = 10.0;
    for _ in 0..6 {
        match brent(&mut *objective, 1.0e-8, hi, 1.0e-14, 200) {
            Ok(hazard) => return Ok(hazard),
            Err(MathError::NoBracket { .. }) => hi *= 2.0,
            Err(e) => {
                return Err(CdsError::CurveBootstrapFailed {
                    knot,
                    reason: e.to_string(),
                });
            }
        }
    }
    Err(CdsError::CurveBootstrapFailed {
        knot,
        reason: format!("hazard rate not bracketed in [1e-8, {hi}]"),
    })
}
