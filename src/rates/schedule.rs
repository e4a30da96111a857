//! CDS coupon-schedule generation.
//!
//! Fee-leg periods are generated backward from maturity at the payment
//! frequency, so any short stub sits at the front of the schedule. Per the
//! ISDA standard model, protection covers the maturity date itself: the
//! final period accrues through maturity + 1 day while paying on the
//! adjusted maturity.

use chrono::{Duration, NaiveDate};

use crate::core::CdsError;
use crate::rates::calendar::{BadDayConvention, Calendar, add_months, adjust_business_day};
use crate::rates::day_count::{DayCountConvention, year_fraction};

/// Coupon payment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Frequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl Frequency {
    /// Number of months in one regular coupon period.
    pub fn months(self) -> i32 {
        match self {
            Self::Annual => 12,
            Self::SemiAnnual => 6,
            Self::Quarterly => 3,
            Self::Monthly => 1,
        }
    }
}

/// A single coupon accrual period.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SchedulePeriod {
    /// Unadjusted accrual start.
    pub accrual_start: NaiveDate,
    /// Unadjusted accrual end (maturity + 1 day for the final period).
    pub accrual_end: NaiveDate,
    /// Business-day adjusted payment date.
    pub payment_date: NaiveDate,
    /// Accrual fraction of `[accrual_start, accrual_end)` under the
    /// schedule's day count.
    pub year_fraction: f64,
}

/// Ordered, contiguous CDS coupon periods.
#[derive(Debug, Clone, PartialEq)]
pub struct CdsSchedule {
    periods: Vec<SchedulePeriod>,
    day_count: DayCountConvention,
}

impl CdsSchedule {
    /// Generates the coupon schedule from `accrual_start` to `maturity`.
    ///
    /// Period boundaries are rolled backward from maturity by the frequency
    /// interval until they reach `accrual_start`; a boundary landing on or
    /// before it closes the (possibly short) front stub.
    pub fn generate(
        accrual_start: NaiveDate,
        maturity: NaiveDate,
        frequency: Frequency,
        day_count: DayCountConvention,
        bad_day: BadDayConvention,
        calendar: &Calendar,
    ) -> Result<Self, CdsError> {
        if maturity <= accrual_start {
            return Err(CdsError::InvalidInput(format!(
                "maturity {maturity} must be after accrual start {accrual_start}"
            )));
        }

        let step = frequency.months();
        let mut boundaries = vec![maturity];
        let mut current = maturity;
        loop {
            let prev = add_months(current, -step);
            if prev <= accrual_start {
                boundaries.push(accrual_start);
                break;
            }
            boundaries.push(prev);
            current = prev;
        }
        boundaries.reverse();

        let count = boundaries.len() - 1;
        let mut periods = Vec::with_capacity(count);
        for (i, window) in boundaries.windows(2).enumerate() {
            let start = window[0];
            let is_last = i == count - 1;

            // Protection includes the maturity date: the last accrual runs
            // one day past maturity, while payment stays on the adjusted
            // maturity itself.
            let end = if is_last {
                window[1] + Duration::days(1)
            } else {
                window[1]
            };
            let payment_date = adjust_business_day(window[1], bad_day, calendar);

            periods.push(SchedulePeriod {
                accrual_start: start,
                accrual_end: end,
                payment_date,
                year_fraction: year_fraction(start, end, day_count),
            });
        }

        Ok(Self { periods, day_count })
    }

    pub fn periods(&self) -> &[SchedulePeriod] {
        &self.periods
    }

    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// The period whose accrual interval contains `date`.
    pub fn period_containing(&self, date: NaiveDate) -> Option<&SchedulePeriod> {
        self.periods
            .iter()
            .find(|p| p.accrual_start <= date && date < p.accrual_end)
    }
}
