//! CDS IMM-date engine.
//!
//! Standard CDS dates fall on the 20th of March, June, September, and
//! December. Contract accrual anchors to the previous IMM date; quoted
//! maturities land on IMM dates, with maturities rolling only to June and
//! December since the December 2015 convention change.

use chrono::{Datelike, NaiveDate};

use crate::rates::calendar::add_months;
use crate::rates::tenor::Tenor;

const IMM_MONTHS: [u32; 4] = [3, 6, 9, 12];
const IMM_DAY: u32 = 20;

fn imm_in(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, IMM_DAY).expect("valid IMM date")
}

/// Returns true if `date` is the 20th of an IMM month.
pub fn is_imm_date(date: NaiveDate) -> bool {
    date.day() == IMM_DAY && IMM_MONTHS.contains(&date.month())
}

/// Smallest IMM date strictly after `date`.
pub fn next_imm(date: NaiveDate) -> NaiveDate {
    for month in IMM_MONTHS {
        let candidate = imm_in(date.year(), month);
        if candidate > date {
            return candidate;
        }
    }
    imm_in(date.year() + 1, 3)
}

/// Greatest IMM date on or before `date`; an IMM input maps to itself.
pub fn previous_imm(date: NaiveDate) -> NaiveDate {
    for month in IMM_MONTHS.iter().rev() {
        let candidate = imm_in(date.year(), *month);
        if candidate <= date {
            return candidate;
        }
    }
    imm_in(date.year() - 1, 12)
}

/// First date of the semi-annual maturity roll regime.
const SEMI_ANNUAL_ROLL_START: (i32, u32, u32) = (2015, 12, 20);

/// Standard CDS maturity for a quoted tenor.
///
/// The tenor is added to `reference`, then rolled to the next IMM date.
/// Under the post-2015 convention, March and September results roll forward
/// to June and December.
pub fn cds_maturity_for_tenor(reference: NaiveDate, tenor: Tenor) -> NaiveDate {
    let target = tenor.add_to(reference);
    let mut maturity = next_imm(target);

    let (ry, rm, rd) = SEMI_ANNUAL_ROLL_START;
    let roll_start = NaiveDate::from_ymd_opt(ry, rm, rd).expect("valid roll start");
    if maturity >= roll_start && matches!(maturity.month(), 3 | 9) {
        maturity = add_months(maturity, 3);
    }
    maturity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn previous_imm_anchors_accrual_start() {
        assert_eq!(previous_imm(ymd(2022, 8, 31)), ymd(2022, 6, 20));
        assert_eq!(previous_imm(ymd(2022, 6, 21)), ymd(2022, 6, 20));
        assert_eq!(previous_imm(ymd(2022, 2, 1)), ymd(2021, 12, 20));
    }

    #[test]
    fn previous_imm_of_imm_date_is_itself() {
        for d in [ymd(2022, 3, 20), ymd(2022, 6, 20), ymd(2022, 9, 20), ymd(2022, 12, 20)] {
            assert_eq!(previous_imm(d), d);
        }
    }

    #[test]
    fn next_imm_is_strictly_after() {
        assert_eq!(next_imm(ymd(2022, 8, 31)), ymd(2022, 9, 20));
        assert_eq!(next_imm(ymd(2022, 9, 20)), ymd(2022, 12, 20));
        assert_eq!(next_imm(ymd(2022, 12, 21)), ymd(2023, 3, 20));
        assert_eq!(next_imm(ymd(2022, 12, 31)), ymd(2023, 3, 20));
    }

    #[test]
    fn imm_date_predicate() {
        assert!(is_imm_date(ymd(2026, 12, 20)));
        assert!(!is_imm_date(ymd(2026, 12, 21)));
        assert!(!is_imm_date(ymd(2026, 1, 20)));
    }

    #[test]
    fn tenor_maturities_roll_semi_annually_post_2015() {
        // 2022-08-31 + 5Y = 2027-08-31 -> next IMM 2027-09-20 -> rolls to Dec.
        let five_y = cds_maturity_for_tenor(ymd(2022, 8, 31), "5Y".parse().unwrap());
        assert_eq!(five_y, ymd(2027, 12, 20));

        // 2022-08-31 + 3M = 2022-11-30 -> next IMM 2022-12-20, no roll needed.
        let three_m = cds_maturity_for_tenor(ymd(2022, 8, 31), "3M".parse().unwrap());
        assert_eq!(three_m, ymd(2022, 12, 20));
    }

    #[test]
    fn tenor_maturities_keep_quarterly_dates_pre_2015() {
        let maturity = cds_maturity_for_tenor(ymd(2014, 1, 8), "6M".parse().unwrap());
        assert_eq!(maturity, ymd(2014, 9, 20));
    }
}
