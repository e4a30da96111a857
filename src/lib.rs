//! FerriCDS implements the ISDA CDS Standard Model numerical core: market
//! conventions, curve bootstrapping, and credit-default-swap valuation with
//! risk sensitivities.
//!
//! The crate is organised in dependency order:
//! - [`rates`]: calendars, day counts, tenors, IMM dates, coupon schedules,
//!   and the zero (discount) curve with flat-forward interpolation.
//! - [`credit`]: the hazard curve, fee/contingent leg valuation, and the
//!   top-level [`credit::CdsPricer`].
//! - [`math`]: bracketed root finding used by the bootstrappers.
//! - [`core`]: the error taxonomy and explicit date-format handling.
//!
//! Everything is deterministic, single-threaded, and allocation-bounded by
//! the number of curve knots and schedule periods. Curves are immutable
//! value types; risk bumps reprice shifted logical copies.
//!
//! References: the ISDA CDS Standard Model documentation and O'Kane,
//! *Modelling Single-name and Multi-name Credit Derivatives* (2008),
//! Ch. 5-7 for the leg integrals and bootstrap.
//!
//! # Quick Start
//!
//! Price a five-year protection buy against a bootstrapped swap curve:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ferricds::credit::CdsPricer;
//!
//! let trade_date = NaiveDate::from_ymd_opt(2022, 8, 31).unwrap();
//! let pricer = CdsPricer::new(
//!     trade_date,
//!     &[0.0165, 0.0185, 0.0205, 0.0225, 0.0235],
//!     &["6M", "1Y", "2Y", "3Y", "5Y"],
//! )
//! .unwrap();
//!
//! let maturity = NaiveDate::from_ymd_opt(2026, 12, 20).unwrap();
//! let result = pricer
//!     .price_cds(maturity, 0.0065, 100, 10_000_000.0, 0.40, true)
//!     .unwrap();
//!
//! // Quoted spread below the running coupon: the buyer is owed upfront.
//! assert!(result.pv_dirty < 0.0);
//! assert!((result.par_spread - 0.0065).abs() < 1e-6);
//! ```
//!
//! Bootstrap a survival curve from a spread term structure:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ferricds::credit::CdsPricer;
//!
//! let trade_date = NaiveDate::from_ymd_opt(2022, 8, 31).unwrap();
//! let pricer = CdsPricer::new(
//!     trade_date,
//!     &[0.0165, 0.0185, 0.0205, 0.0225, 0.0235],
//!     &["6M", "1Y", "2Y", "3Y", "5Y"],
//! )
//! .unwrap();
//!
//! let maturities: Vec<_> = [2023, 2024, 2026]
//!     .iter()
//!     .map(|y| NaiveDate::from_ymd_opt(*y, 12, 20).unwrap())
//!     .collect();
//! let curve = pricer
//!     .build_credit_curve(&[0.0050, 0.0065, 0.0085], &maturities, 0.40)
//!     .unwrap();
//! assert!(curve.survival_probability(4.0) < 1.0);
//! ```

pub mod core;
pub mod credit;
pub mod math;
pub mod rates;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::{CdsError, DateFormat, parse_date};
    pub use crate::credit::{
        CdsContract, CdsConventions, CdsPricer, CdsPricingResult, CreditCurve,
        bootstrap_credit_curve, bootstrap_flat_credit_curve, contingent_leg_pv, fee_leg_pv,
        rpv01,
    };
    pub use crate::rates::{
        BadDayConvention, Calendar, CdsSchedule, DayCountConvention, Frequency, Tenor, TenorUnit,
        ZeroCurve, ZeroCurveConfig, year_fraction,
    };
}
