//! Business-day calendars, bad-day conventions, and date arithmetic.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::core::CdsError;

/// Business-day adjustment rule for dates landing on non-business days.
///
/// Let `d` be an unadjusted date:
///
/// - `Following`: first business day `>= d`
/// - `ModifiedFollowing`: following unless the month changes, then preceding
/// - `Preceding`: last business day `<= d`
/// - `ModifiedPreceding`: preceding unless the month changes, then following
/// - `None`: leave `d` unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BadDayConvention {
    None,
    Following,
    ModifiedFollowing,
    Preceding,
    ModifiedPreceding,
}

impl std::str::FromStr for BadDayConvention {
    type Err = CdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_uppercase();
        match key.as_str() {
            "NONE" | "N" => Ok(Self::None),
            "FOLLOWING" | "F" => Ok(Self::Following),
            "MODIFIEDFOLLOWING" | "MODFOLLOWING" | "MF" => Ok(Self::ModifiedFollowing),
            "PRECEDING" | "P" => Ok(Self::Preceding),
            "MODIFIEDPRECEDING" | "MODPRECEDING" | "MP" => Ok(Self::ModifiedPreceding),
            _ => Err(CdsError::InvalidInput(format!(
                "unknown bad day convention: {s}"
            ))),
        }
    }
}

/// Holiday calendar with Saturday/Sunday weekends.
///
/// Immutable after construction. The default CDS market calendar carries no
/// holidays at all (weekends only); explicit holiday sets are supported for
/// center-specific runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    holidays: BTreeSet<NaiveDate>,
}

impl Calendar {
    /// Calendar with no holidays: every weekday is a business day.
    pub fn weekends_only() -> Self {
        Self::default()
    }

    /// Calendar preloaded with holiday dates.
    pub fn with_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Returns true if `date` is neither a weekend nor a holiday.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// Returns true if `date` is not a business day.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        !self.is_business_day(date)
    }
}

/// Adjusts a date according to a bad-day convention under `calendar`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ferricds::rates::{BadDayConvention, Calendar, adjust_business_day};
///
/// let calendar = Calendar::weekends_only();
/// let sunday = NaiveDate::from_ymd_opt(2026, 12, 20).unwrap();
/// let adjusted = adjust_business_day(sunday, BadDayConvention::ModifiedFollowing, &calendar);
/// assert_eq!(adjusted, NaiveDate::from_ymd_opt(2026, 12, 21).unwrap());
/// ```
pub fn adjust_business_day(
    date: NaiveDate,
    convention: BadDayConvention,
    calendar: &Calendar,
) -> NaiveDate {
    match convention {
        BadDayConvention::None => date,
        BadDayConvention::Following => next_business_day(date, calendar),
        BadDayConvention::Preceding => previous_business_day(date, calendar),
        BadDayConvention::ModifiedFollowing => {
            let following = next_business_day(date, calendar);
            if following.month() != date.month() {
                previous_business_day(date, calendar)
            } else {
                following
            }
        }
        BadDayConvention::ModifiedPreceding => {
            let preceding = previous_business_day(date, calendar);
            if preceding.month() != date.month() {
                next_business_day(date, calendar)
            } else {
                preceding
            }
        }
    }
}

/// Adds business days to a date; negative `days` moves backward.
pub fn add_business_days(date: NaiveDate, days: i32, calendar: &Calendar) -> NaiveDate {
    if days == 0 {
        return date;
    }

    let step = if days > 0 { 1_i64 } else { -1_i64 };
    let mut left = days.abs();
    let mut current = date;

    while left > 0 {
        current += Duration::days(step);
        if calendar.is_business_day(current) {
            left -= 1;
        }
    }

    current
}

/// Adds calendar months, preserving the day of month with end-of-month clamp.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let month0 = date.month0() as i32;
    let total = month0 + months;

    let mut year = date.year() + total.div_euclid(12);
    let mut month0_new = total.rem_euclid(12);
    if month0_new < 0 {
        year -= 1;
        month0_new += 12;
    }

    let month = month0_new as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("valid add_months result")
}

/// Adds calendar years with the February-29 clamp.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    add_months(date, 12 * years)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => unreachable!("invalid month"),
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn next_business_day(date: NaiveDate, calendar: &Calendar) -> NaiveDate {
    let mut d = date;
    while !calendar.is_business_day(d) {
        d += Duration::days(1);
    }
    d
}

fn previous_business_day(date: NaiveDate, calendar: &Calendar) -> NaiveDate {
    let mut d = date;
    while !calendar.is_business_day(d) {
        d -= Duration::days(1);
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekends_only_calendar_flags_weekdays() {
        let cal = Calendar::weekends_only();
        assert!(cal.is_business_day(ymd(2022, 8, 31))); // Wednesday
        assert!(cal.is_holiday(ymd(2022, 9, 3))); // Saturday
        assert!(cal.is_holiday(ymd(2022, 9, 4))); // Sunday
    }

    #[test]
    fn holiday_set_removes_business_days() {
        let cal = Calendar::with_holidays([ymd(2026, 1, 1)]);
        assert!(cal.is_holiday(ymd(2026, 1, 1))); // Thursday, declared holiday
        assert!(cal.is_business_day(ymd(2026, 1, 2)));
    }

    #[test]
    fn adjustments_cover_all_conventions() {
        let cal = Calendar::weekends_only();
        let saturday = ymd(2026, 1, 31);

        assert_eq!(
            adjust_business_day(saturday, BadDayConvention::Following, &cal),
            ymd(2026, 2, 2)
        );
        assert_eq!(
            adjust_business_day(saturday, BadDayConvention::ModifiedFollowing, &cal),
            ymd(2026, 1, 30)
        );
        assert_eq!(
            adjust_business_day(saturday, BadDayConvention::Preceding, &cal),
            ymd(2026, 1, 30)
        );
        assert_eq!(
            adjust_business_day(saturday, BadDayConvention::ModifiedPreceding, &cal),
            ymd(2026, 1, 30)
        );
        assert_eq!(
            adjust_business_day(saturday, BadDayConvention::None, &cal),
            saturday
        );
    }

    #[test]
    fn modified_preceding_flips_at_month_start() {
        let cal = Calendar::weekends_only();
        let sunday = ymd(2026, 2, 1);
        assert_eq!(
            adjust_business_day(sunday, BadDayConvention::ModifiedPreceding, &cal),
            ymd(2026, 2, 2)
        );
    }

    #[test]
    fn business_day_arithmetic_is_signed() {
        let cal = Calendar::weekends_only();
        let friday = ymd(2026, 1, 2);

        let plus_two = add_business_days(friday, 2, &cal);
        assert_eq!(plus_two, ymd(2026, 1, 6));
        assert_eq!(add_business_days(plus_two, -2, &cal), friday);
        assert_eq!(add_business_days(friday, 0, &cal), friday);
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        assert_eq!(add_months(ymd(2025, 1, 31), 1), ymd(2025, 2, 28));
        assert_eq!(add_months(ymd(2024, 1, 31), 1), ymd(2024, 2, 29));
        assert_eq!(add_months(ymd(2025, 3, 31), -1), ymd(2025, 2, 28));
        assert_eq!(add_months(ymd(2025, 6, 15), 30), ymd(2027, 12, 15));
    }

    #[test]
    fn add_years_handles_leap_day() {
        assert_eq!(add_years(ymd(2024, 2, 29), 1), ymd(2025, 2, 28));
        assert_eq!(add_years(ymd(2024, 2, 29), 4), ymd(2028, 2, 29));
    }

    #[test]
    fn parses_convention_labels() {
        assert_eq!(
            "MF".parse::<BadDayConvention>().unwrap(),
            BadDayConvention::ModifiedFollowing
        );
        assert_eq!(
            "modified_following".parse::<BadDayConvention>().unwrap(),
            BadDayConvention::ModifiedFollowing
        );
        assert!("sideways".parse::<BadDayConvention>().is_err());
    }
}
