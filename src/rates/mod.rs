//! Rates primitives: calendars, day counts, tenors, IMM dates, schedules,
//! and the zero curve.

pub mod calendar;
pub mod day_count;
pub mod imm;
pub mod interpolation;
pub mod schedule;
pub mod tenor;
pub mod zero_curve;

pub use calendar::{
    BadDayConvention, Calendar, add_business_days, add_months, add_years, adjust_business_day,
};
pub use day_count::{DayCountConvention, year_fraction};
pub use imm::{cds_maturity_for_tenor, is_imm_date, next_imm, previous_imm};
pub use interpolation::flat_forward_rate;
pub use schedule::{CdsSchedule, Frequency, SchedulePeriod};
pub use tenor::{Tenor, TenorUnit};
pub use zero_curve::{ZeroCurve, ZeroCurveConfig};
