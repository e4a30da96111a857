//! Tenor parsing and date arithmetic.

use chrono::{Duration, NaiveDate};

use crate::core::CdsError;
use crate::rates::calendar::{add_months, add_years};

/// Time unit of a tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TenorUnit {
    Days,
    Weeks,
    Months,
    Years,
}

/// A market tenor such as `1M` or `5Y`.
///
/// Adding a tenor to a date is pure calendar arithmetic; any business-day
/// adjustment is applied by the caller afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Tenor {
    pub value: i32,
    pub unit: TenorUnit,
}

impl Tenor {
    pub fn new(value: i32, unit: TenorUnit) -> Self {
        Self { value, unit }
    }

    /// Approximate tenor length in years, used to classify curve quotes.
    pub fn years(&self) -> f64 {
        match self.unit {
            TenorUnit::Days => self.value as f64 / 365.0,
            TenorUnit::Weeks => self.value as f64 * 7.0 / 365.0,
            TenorUnit::Months => self.value as f64 / 12.0,
            TenorUnit::Years => self.value as f64,
        }
    }

    /// Adds this tenor to `date` without business-day adjustment.
    pub fn add_to(&self, date: NaiveDate) -> NaiveDate {
        match self.unit {
            TenorUnit::Days => date + Duration::days(self.value as i64),
            TenorUnit::Weeks => date + Duration::days(7 * self.value as i64),
            TenorUnit::Months => add_months(date, self.value),
            TenorUnit::Years => add_years(date, self.value),
        }
    }
}

impl std::fmt::Display for Tenor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = match self.unit {
            TenorUnit::Days => 'D',
            TenorUnit::Weeks => 'W',
            TenorUnit::Months => 'M',
            TenorUnit::Years => 'Y',
        };
        write!(f, "{}{}", self.value, unit)
    }
}

impl std::str::FromStr for Tenor {
    type Err = CdsError;

    /// Parses `"3M"`, `"10Y"`, ... plus the money-market shorthands
    /// `ON`/`SN` (one day) and `TN` (two days).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_uppercase();

        match trimmed.as_str() {
            "ON" | "SN" => return Ok(Self::new(1, TenorUnit::Days)),
            "TN" => return Ok(Self::new(2, TenorUnit::Days)),
            _ => {}
        }

        let bad = || CdsError::InvalidInput(format!("cannot parse tenor: {s}"));

        let unit = match trimmed.chars().last() {
            Some('D') => TenorUnit::Days,
            Some('W') => TenorUnit::Weeks,
            Some('M') => TenorUnit::Months,
            Some('Y') => TenorUnit::Years,
            _ => return Err(bad()),
        };

        let digits = &trimmed[..trimmed.len() - 1];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let value: i32 = digits.parse().map_err(|_| bad())?;
        if value == 0 {
            return Err(bad());
        }

        Ok(Self::new(value, unit))
    }
}
