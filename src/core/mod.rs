//! Library-wide error taxonomy and date-input handling.

use chrono::NaiveDate;

/// Errors surfaced by curve construction, bootstrapping, and pricing.
///
/// Internal helpers return these unchanged; the top-level pricer never
/// remaps or swallows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdsError {
    /// Input validation error (bad notional, recovery, tenor, date, ...).
    InvalidInput(String),
    /// Root finder failed to bracket or converge while bootstrapping.
    ///
    /// `knot` is the zero-based index of the failing curve knot.
    CurveBootstrapFailed { knot: usize, reason: String },
    /// A date query produced an ambiguous or unusable curve time.
    DateOutOfRange(String),
    /// Taylor fallback still produced a non-finite result.
    NumericalInstability(String),
}

impl std::fmt::Display for CdsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::CurveBootstrapFailed { knot, reason } => {
                write!(f, "curve bootstrap failed at knot {knot}: {reason}")
            }
            Self::DateOutOfRange(msg) => write!(f, "date out of range: {msg}"),
            Self::NumericalInstability(msg) => write!(f, "numerical instability: {msg}"),
        }
    }
}

impl std::error::Error for CdsError {}

/// Ordering of day and month fields in slash-separated date strings.
///
/// Market data files use both `08/31/2022` and `31/08/2022`; silently
/// assuming either one is a latent bug, so the format is always an explicit
/// argument. ISO `YYYY-MM-DD` input is accepted under both settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DateFormat {
    /// `MM/DD/YYYY` (US convention).
    #[default]
    MonthDayYear,
    /// `DD/MM/YYYY`.
    DayMonthYear,
}

/// Parses a date string under an explicit day/month ordering.
///
/// # Examples
///
/// ```
/// use ferricds::core::{DateFormat, parse_date};
///
/// let us = parse_date("08/31/2022", DateFormat::MonthDayYear).unwrap();
/// let eu = parse_date("31/08/2022", DateFormat::DayMonthYear).unwrap();
/// assert_eq!(us, eu);
/// ```
pub fn parse_date(s: &str, format: DateFormat) -> Result<NaiveDate, CdsError> {
    let trimmed = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(d);
    }

    let pattern = match format {
        DateFormat::MonthDayYear => "%m/%d/%Y",
        DateFormat::DayMonthYear => "%d/%m/%Y",
    };
    NaiveDate::parse_from_str(trimmed, pattern)
        .map_err(|_| CdsError::InvalidInput(format!("cannot parse date: {trimmed}")))
}
