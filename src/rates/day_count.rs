//! Day-count conventions for accrual and curve-time calculations.
//!
//! CDS fee legs accrue on ACT/360, curve times run on ACT/365F, and swap
//! fixed legs commonly use 30/360; all four market conventions are
//! implemented per the ISDA 2006 definitions.

use chrono::{Datelike, NaiveDate};

use crate::core::CdsError;

/// Supported day-count conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DayCountConvention {
    /// Actual day count over a 360-day year.
    Act360,
    /// Actual day count over a fixed 365-day year.
    Act365Fixed,
    /// 30/360 US (bond basis).
    Thirty360,
    /// 30E/360 European convention.
    ThirtyE360,
}

impl std::str::FromStr for DayCountConvention {
    type Err = CdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        match key.as_str() {
            "ACT/360" | "ACT360" | "A360" => Ok(Self::Act360),
            "ACT/365F" | "ACT/365" | "ACT365" | "ACT365F" | "A365" | "A365F" => {
                Ok(Self::Act365Fixed)
            }
            "30/360" | "30360" => Ok(Self::Thirty360),
            "30E/360" | "30E360" => Ok(Self::ThirtyE360),
            _ => Err(CdsError::InvalidInput(format!(
                "unknown day count convention: {s}"
            ))),
        }
    }
}

/// Computes the year fraction between two dates under a day-count convention.
///
/// If `start > end` the result is the negative of the reversed interval.
/// Leap days count as one actual day under ACT conventions; 30/360 variants
/// are independent of leap years.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ferricds::rates::{DayCountConvention, year_fraction};
///
/// let d1 = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
/// let d2 = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
///
/// let act = year_fraction(d1, d2, DayCountConvention::Act360);
/// assert!((act - 29.0 / 360.0).abs() < 1e-12);
///
/// let bond = year_fraction(d1, d2, DayCountConvention::Thirty360);
/// assert!((bond - 30.0 / 360.0).abs() < 1e-12);
/// ```
pub fn year_fraction(start: NaiveDate, end: NaiveDate, convention: DayCountConvention) -> f64 {
    if start == end {
        return 0.0;
    }
    if start > end {
        return -year_fraction(end, start, convention);
    }

    match convention {
        DayCountConvention::Act360 => (end - start).num_days() as f64 / 360.0,
        DayCountConvention::Act365Fixed => (end - start).num_days() as f64 / 365.0,
        DayCountConvention::Thirty360 => year_fraction_thirty_360(start, end),
        DayCountConvention::ThirtyE360 => year_fraction_thirty_e_360(start, end),
    }
}

fn year_fraction_thirty_360(start: NaiveDate, end: NaiveDate) -> f64 {
    let y1 = start.year();
    let m1 = start.month() as i32;
    let mut d1 = start.day() as i32;
    let y2 = end.year();
    let m2 = end.month() as i32;
    let mut d2 = end.day() as i32;

    if d1 == 31 {
        d1 = 30;
    }
    if d2 == 31 && d1 >= 30 {
        d2 = 30;
    }

    let days = 360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1);
    days as f64 / 360.0
}

fn year_fraction_thirty_e_360(start: NaiveDate, end: NaiveDate) -> f64 {
    let y1 = start.year();
    let m1 = start.month() as i32;
    let mut d1 = start.day() as i32;
    let y2 = end.year();
    let m2 = end.month() as i32;
    let mut d2 = end.day() as i32;

    if d1 == 31 {
        d1 = 30;
    }
    if d2 == 31 {
        d2 = 30;
    }

    let days = 360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1);
    days as f64 / 360.0
}
