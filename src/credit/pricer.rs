//! Top-level CDS pricing assembly.
//!
//! A [`CdsPricer`] captures the market snapshot (trade date, bootstrapped
//! zero curve, calendar) and prices contracts against it. Each pricing call
//! is pure: curves are read-only and risk bumps reprice shifted copies.
//!
//! Rate-quotation boundary: contract coupons enter the public surface in
//! whole basis points (100, 500, ...) while par spreads are decimals
//! (0.0065); everything is normalized to decimals internally.

use chrono::NaiveDate;

use crate::core::CdsError;
use crate::credit::credit_curve::{
    CdsConventions, CreditCurve, bootstrap_credit_curve, bootstrap_flat_credit_curve,
};
use crate::credit::contingent_leg::contingent_leg_pv;
use crate::credit::fee_leg::{accrued_interest, fee_leg_pv, rpv01};
use crate::math::brent;
use crate::rates::calendar::{BadDayConvention, Calendar, add_business_days};
use crate::rates::day_count::DayCountConvention;
use crate::rates::imm::previous_imm;
use crate::rates::schedule::{CdsSchedule, Frequency};
use crate::rates::tenor::Tenor;
use crate::rates::zero_curve::{ZeroCurve, ZeroCurveConfig};

/// Parallel shift used for CS01/DV01, one basis point.
const RISK_BUMP: f64 = 1.0e-4;

/// Contractual terms of a single-name CDS trade.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CdsContract {
    pub trade_date: NaiveDate,
    /// Effective protection date, trade date + 1 business day.
    pub step_in_date: NaiveDate,
    /// First accrual date, normally the IMM date preceding the trade date.
    pub accrual_start: NaiveDate,
    pub maturity: NaiveDate,
    /// Running coupon as a decimal per annum.
    pub coupon_rate: f64,
    pub notional: f64,
    pub recovery_rate: f64,
    pub pay_accrued_on_default: bool,
    /// Protection effective from `accrual_start` rather than step-in.
    pub protection_from_start_date: bool,
    pub is_buy_protection: bool,
    pub frequency: Frequency,
    pub accrual_day_count: DayCountConvention,
    pub bad_day_conv: BadDayConvention,
}

impl CdsContract {
    /// Builds a contract with ISDA standard-model conventions.
    ///
    /// `coupon_bps` is the standardized running coupon in whole basis
    /// points. Step-in is trade date + 1 business day and accrual anchors
    /// to the previous IMM date.
    pub fn standard(
        trade_date: NaiveDate,
        maturity: NaiveDate,
        coupon_bps: u32,
        notional: f64,
        recovery_rate: f64,
        is_buy_protection: bool,
        calendar: &Calendar,
    ) -> Result<Self, CdsError> {
        let contract = Self {
            trade_date,
            step_in_date: add_business_days(trade_date, 1, calendar),
            accrual_start: previous_imm(trade_date),
            maturity,
            coupon_rate: coupon_bps as f64 / 10_000.0,
            notional,
            recovery_rate,
            pay_accrued_on_default: true,
            protection_from_start_date: true,
            is_buy_protection,
            frequency: Frequency::Quarterly,
            accrual_day_count: DayCountConvention::Act360,
            bad_day_conv: BadDayConvention::ModifiedFollowing,
        };
        contract.validate()?;
        Ok(contract)
    }

    pub fn validate(&self) -> Result<(), CdsError> {
        if !self.notional.is_finite() || self.notional <= 0.0 {
            return Err(CdsError::InvalidInput(format!(
                "notional {} must be positive",
                self.notional
            )));
        }
        if !(0.0..1.0).contains(&self.recovery_rate) {
            return Err(CdsError::InvalidInput(format!(
                "recovery rate {} outside [0, 1)",
                self.recovery_rate
            )));
        }
        if !self.coupon_rate.is_finite() || self.coupon_rate < 0.0 {
            return Err(CdsError::InvalidInput(format!(
                "coupon rate {} must be finite and non-negative",
                self.coupon_rate
            )));
        }
        if self.maturity <= self.trade_date {
            return Err(CdsError::DateOutOfRange(format!(
                "maturity {} is not after trade date {}",
                self.maturity, self.trade_date
            )));
        }
        if self.accrual_start >= self.maturity {
            return Err(CdsError::InvalidInput(format!(
                "accrual start {} is not before maturity {}",
                self.accrual_start, self.maturity
            )));
        }
        Ok(())
    }

    fn protection_start(&self) -> NaiveDate {
        if self.protection_from_start_date {
            self.accrual_start
        } else {
            self.step_in_date
        }
    }

    fn side_sign(&self) -> f64 {
        if self.is_buy_protection { 1.0 } else { -1.0 }
    }
}

/// Pricing outputs for one CDS contract, signed from the traded side.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CdsPricingResult {
    /// PV including the accrued coupon amount.
    pub pv_dirty: f64,
    /// PV net of accrued interest.
    pub pv_clean: f64,
    /// Premium accrued from the current period start to step-in.
    pub accrued_interest: f64,
    /// Breakeven running spread (decimal).
    pub par_spread: f64,
    /// Risky annuity: fee-leg PV per unit coupon per unit notional.
    pub rpv01: f64,
    pub fee_leg_pv: f64,
    pub contingent_leg_pv: f64,
    /// PV change for a +1bp parallel shift of the hazard curve.
    pub cs01: f64,
    /// PV change for a +1bp parallel shift of the zero curve.
    pub dv01: f64,
}

/// CDS pricing engine over a bootstrapped market snapshot.
#[derive(Debug, Clone)]
pub struct CdsPricer {
    trade_date: NaiveDate,
    calendar: Calendar,
    conventions: CdsConventions,
    zero_curve: ZeroCurve,
}

impl CdsPricer {
    /// Bootstraps the discount curve from swap-market quotes under default
    /// ISDA conventions and a weekends-only calendar.
    ///
    /// `swap_tenors` are market labels (`"1M"`, `"5Y"`, ...) matching
    /// `swap_rates` in order.
    pub fn new(
        trade_date: NaiveDate,
        swap_rates: &[f64],
        swap_tenors: &[&str],
    ) -> Result<Self, CdsError> {
        Self::with_market(
            trade_date,
            swap_rates,
            swap_tenors,
            &ZeroCurveConfig::default(),
            Calendar::weekends_only(),
        )
    }

    /// Bootstraps the discount curve with explicit conventions and calendar.
    pub fn with_market(
        trade_date: NaiveDate,
        swap_rates: &[f64],
        swap_tenors: &[&str],
        config: &ZeroCurveConfig,
        calendar: Calendar,
    ) -> Result<Self, CdsError> {
        let tenors = swap_tenors
            .iter()
            .map(|s| s.parse::<Tenor>())
            .collect::<Result<Vec<_>, _>>()?;
        let zero_curve = ZeroCurve::bootstrap(trade_date, swap_rates, &tenors, config, &calendar)?;
        Ok(Self {
            trade_date,
            calendar,
            conventions: CdsConventions::default(),
            zero_curve,
        })
    }

    /// Wraps an already-bootstrapped zero curve.
    pub fn from_zero_curve(zero_curve: ZeroCurve, calendar: Calendar) -> Self {
        Self {
            trade_date: zero_curve.base_date(),
            calendar,
            conventions: CdsConventions::default(),
            zero_curve,
        }
    }

    pub fn trade_date(&self) -> NaiveDate {
        self.trade_date
    }

    pub fn zero_curve(&self) -> &ZeroCurve {
        &self.zero_curve
    }

    /// Bootstraps a credit curve from a term structure of par spreads.
    pub fn build_credit_curve(
        &self,
        par_spreads: &[f64],
        maturities: &[NaiveDate],
        recovery_rate: f64,
    ) -> Result<CreditCurve, CdsError> {
        bootstrap_credit_curve(
            self.trade_date,
            par_spreads,
            maturities,
            &self.zero_curve,
            recovery_rate,
            &self.conventions,
            &self.calendar,
        )
    }

    /// Prices a CDS quoted by its own par spread.
    ///
    /// A flat credit curve is bootstrapped so the contract prices at zero
    /// upfront when its coupon equals `par_spread`; the trade is then
    /// valued at `coupon_bps`.
    pub fn price_cds(
        &self,
        maturity: NaiveDate,
        par_spread: f64,
        coupon_bps: u32,
        notional: f64,
        recovery_rate: f64,
        is_buy_protection: bool,
    ) -> Result<CdsPricingResult, CdsError> {
        let contract = CdsContract::standard(
            self.trade_date,
            maturity,
            coupon_bps,
            notional,
            recovery_rate,
            is_buy_protection,
            &self.calendar,
        )?;
        let credit = bootstrap_flat_credit_curve(
            self.trade_date,
            par_spread,
            maturity,
            &self.zero_curve,
            recovery_rate,
            contract.accrual_start,
            &self.conventions,
            &self.calendar,
        )?;
        self.price_contract(&contract, &credit)
    }

    /// Prices a contract against an explicit credit curve.
    pub fn price_contract(
        &self,
        contract: &CdsContract,
        credit: &CreditCurve,
    ) -> Result<CdsPricingResult, CdsError> {
        contract.validate()?;
        if credit.base_date() != self.zero_curve.base_date() {
            return Err(CdsError::InvalidInput(format!(
                "credit curve base {} does not match zero curve base {}",
                credit.base_date(),
                self.zero_curve.base_date()
            )));
        }

        let schedule = CdsSchedule::generate(
            contract.accrual_start,
            contract.maturity,
            contract.frequency,
            contract.accrual_day_count,
            contract.bad_day_conv,
            &self.calendar,
        )?;

        let value_date = self.trade_date;
        let fee = fee_leg_pv(
            value_date,
            &schedule,
            contract.coupon_rate,
            &self.zero_curve,
            credit,
            contract.notional,
            contract.pay_accrued_on_default,
        );
        let cont = contingent_leg_pv(
            value_date,
            contract.protection_start(),
            contract.maturity,
            &self.zero_curve,
            credit,
            contract.recovery_rate,
            contract.notional,
        );
        let annuity = rpv01(value_date, &schedule, &self.zero_curve, credit);

        let dirty_buy = cont - fee;
        let accrued = accrued_interest(
            &schedule,
            contract.coupon_rate,
            contract.notional,
            contract.step_in_date,
        );
        let clean_buy = dirty_buy - accrued;
        let par_spread = if annuity > 1.0e-14 {
            cont / (annuity * contract.notional)
        } else {
            0.0
        };

        let cs01_buy =
            self.dirty_pv(contract, &schedule, &self.zero_curve, &credit.bumped(RISK_BUMP))
                - dirty_buy;
        let dv01_buy =
            self.dirty_pv(contract, &schedule, &self.zero_curve.bumped(RISK_BUMP), credit)
                - dirty_buy;

        let sign = contract.side_sign();
        let result = CdsPricingResult {
            pv_dirty: sign * dirty_buy,
            pv_clean: sign * clean_buy,
            accrued_interest: accrued,
            par_spread,
            rpv01: annuity,
            fee_leg_pv: fee,
            contingent_leg_pv: cont,
            cs01: sign * cs01_buy,
            dv01: sign * dv01_buy,
        };

        let fields = [
            result.pv_dirty,
            result.pv_clean,
            result.accrued_interest,
            result.par_spread,
            result.rpv01,
            result.fee_leg_pv,
            result.contingent_leg_pv,
            result.cs01,
            result.dv01,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(CdsError::NumericalInstability(
                "pricing produced a non-finite result".into(),
            ));
        }
        Ok(result)
    }

    /// Upfront payment for a trade quoted at `par_spread` but paying
    /// `coupon_bps`: `(dirty, clean, accrued)`, positive when the
    /// protection buyer pays.
    pub fn compute_upfront(
        &self,
        maturity: NaiveDate,
        par_spread: f64,
        coupon_bps: u32,
        notional: f64,
        recovery_rate: f64,
    ) -> Result<(f64, f64, f64), CdsError> {
        let result = self.price_cds(maturity, par_spread, coupon_bps, notional, recovery_rate, true)?;
        Ok((result.pv_dirty, result.pv_clean, result.accrued_interest))
    }

    /// Par spread implied by an upfront amount.
    ///
    /// Solves `upfront(spread) = target_upfront` (dirty, or clean when
    /// `is_clean`) for the buyer by Brent on `[1e-6, 10.0]`, to 1e-10 of
    /// notional.
    pub fn spread_from_upfront(
        &self,
        maturity: NaiveDate,
        target_upfront: f64,
        coupon_bps: u32,
        notional: f64,
        recovery_rate: f64,
        is_clean: bool,
    ) -> Result<f64, CdsError> {
        if !target_upfront.is_finite() {
            return Err(CdsError::InvalidInput("upfront must be finite".into()));
        }

        let mut failure: Option<CdsError> = None;
        let mut objective = |spread: f64| {
            match self.compute_upfront(maturity, spread, coupon_bps, notional, recovery_rate) {
                Ok((dirty, clean, _)) => {
                    let upfront = if is_clean { clean } else { dirty };
                    (upfront - target_upfront) / notional
                }
                Err(e) => {
                    failure = Some(e);
                    f64::NAN
                }
            }
        };

        let root = brent(&mut objective, 1.0e-6, 10.0, 1.0e-10, 200);
        if let Some(e) = failure {
            return Err(e);
        }
        root.map_err(|e| {
            CdsError::InvalidInput(format!(
                "no par spread in [1e-6, 10] matches upfront {target_upfront}: {e}"
            ))
        })
    }

    fn dirty_pv(
        &self,
        contract: &CdsContract,
        schedule: &CdsSchedule,
        zero: &ZeroCurve,
        credit: &CreditCurve,
    ) -> f64 {
        let fee = fee_leg_pv(
            self.trade_date,
            schedule,
            contract.coupon_rate,
            zero,
            credit,
            contract.notional,
            contract.pay_accrued_on_default,
        );
        let cont = contingent_leg_pv(
            self.trade_date,
            contract.protection_start(),
            contract.maturity,
            zero,
            credit,
            contract.recovery_rate,
            contract.notional,
        );
        cont - fee
    }
}
