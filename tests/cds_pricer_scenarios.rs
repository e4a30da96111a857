//! End-to-end CDS pricing scenarios and cross-cutting pricing invariants.

use approx::assert_relative_eq;
use chrono::NaiveDate;

use ferricds::credit::{CdsContract, CdsPricer, CreditCurve, fee_leg_pv};
use ferricds::rates::{
    BadDayConvention, Calendar, CdsSchedule, DayCountConvention, Frequency, ZeroCurve,
    previous_imm,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const TRADE_DATE: (i32, u32, u32) = (2022, 8, 31);

const SWAP_TENORS: [&str; 16] = [
    "1M", "3M", "6M", "1Y", "2Y", "3Y", "4Y", "5Y", "6Y", "7Y", "8Y", "9Y", "10Y", "15Y", "20Y",
    "30Y",
];

const SWAP_RATES: [f64; 16] = [
    0.002979, 0.006419, 0.01165, 0.017617, 0.024417, 0.026917, 0.028, 0.028583, 0.029083,
    0.02945, 0.029917, 0.030167, 0.030417, 0.031417, 0.0305, 0.028917,
];

fn market_pricer() -> CdsPricer {
    let (y, m, d) = TRADE_DATE;
    CdsPricer::new(ymd(y, m, d), &SWAP_RATES, &SWAP_TENORS).unwrap()
}

// ===========================================================================
// Five-year par-coupon trade
// ===========================================================================

#[test]
fn five_year_buy_below_coupon_owes_the_buyer() {
    let pricer = market_pricer();
    let result = pricer
        .price_cds(ymd(2026, 12, 20), 0.0065, 100, 10_000_000.0, 0.40, true)
        .unwrap();

    // 73 days of ACT/360 accrual from 2022-06-20 to step-in 2022-09-01.
    assert_relative_eq!(
        result.accrued_interest,
        10_000_000.0 * 0.01 * 73.0 / 360.0,
        epsilon = 1e-8
    );

    // Quoted at its own par spread.
    assert_relative_eq!(result.par_spread, 0.0065, epsilon = 1e-7);

    // Worked reference values for this trade, recomputed independently
    // from the same market data: the fee leg carries the full on-cycle
    // first coupon (accruing since 2022-06-20), giving a dirty risky
    // annuity of 4.2251, so 35bp under the coupon is worth about
    // -147,879 dirty and -168,157 clean. Checked to 1%.
    assert_relative_eq!(result.rpv01, 4.2251, epsilon = 0.01 * 4.2251);
    assert_relative_eq!(result.pv_dirty, -147_879.0, epsilon = 0.01 * 147_879.0);
    assert_relative_eq!(result.pv_clean, -168_157.0, epsilon = 0.01 * 168_157.0);

    // Dirty PV decomposes as (par - coupon) times the risky annuity.
    let expected = (result.par_spread - 0.01) * result.rpv01 * 10_000_000.0;
    assert_relative_eq!(result.pv_dirty, expected, epsilon = 1e-6 * expected.abs());

    // Clean strips the accrued the buyer owes at settlement.
    assert_relative_eq!(
        result.pv_clean,
        result.pv_dirty - result.accrued_interest,
        epsilon = 1e-9
    );
    assert!(result.pv_clean < result.pv_dirty);

    assert!(result.fee_leg_pv > 0.0 && result.contingent_leg_pv > 0.0);
}

// ===========================================================================
// Coupon equal to par spread
// ===========================================================================

#[test]
fn coupon_at_par_spread_prices_to_zero() {
    let pricer = market_pricer();
    let notional = 10_000_000.0;
    let result = pricer
        .price_cds(ymd(2026, 12, 20), 0.0100, 100, notional, 0.40, true)
        .unwrap();

    // The flat-curve bootstrap must reprice its own quote: the residual
    // is bounded relative to notional, matching the hazard solver's
    // tolerance, not an absolute dollar figure.
    assert!(
        result.pv_dirty.abs() < 1.0e-6 * notional,
        "par trade dirty PV {} on notional {notional}",
        result.pv_dirty
    );
    assert_relative_eq!(result.par_spread, 0.0100, epsilon = 1e-8);
}

// ===========================================================================
// Recovery-rate sensitivity
// ===========================================================================

#[test]
fn recovery_rate_ordering_and_linearity() {
    let pricer = market_pricer();
    let maturity = ymd(2027, 12, 20);

    let pv = |recovery: f64| {
        pricer
            .price_cds(maturity, 0.0200, 100, 10_000_000.0, recovery, true)
            .unwrap()
            .pv_dirty
    };

    let pv20 = pv(0.20);
    let pv40 = pv(0.40);
    let pv60 = pv(0.60);

    // Spread above coupon: protection is in the money, and more so the
    // less is recovered on default.
    assert!(pv20 > pv40 && pv40 > pv60, "{pv20} > {pv40} > {pv60}");

    // Differences stay monotone; the hazard re-solve at each recovery
    // keeps them from being exactly linear, but the same order holds.
    let d1 = pv20 - pv40;
    let d2 = pv40 - pv60;
    assert!(d1 > 0.0 && d2 > 0.0);
    let ratio = d1 / d2;
    assert!((0.25..=4.0).contains(&ratio), "difference ratio {ratio}");
}

// ===========================================================================
// Single-period coupon arithmetic
// ===========================================================================

#[test]
fn interior_period_coupon_value_matches_hand_calculation() {
    let base = ymd(2022, 6, 20);

    // Flat curves hitting the quoted marks: Q ~ 0.9946 at the interior
    // observation date (181 days) and DF ~ 0.99 at the payment date.
    let t_obs = 182.0 / 365.0;
    let t_pay = 183.0 / 365.0;
    let hazard = -(0.9946_f64).ln() / t_obs;
    let rate = -(0.99_f64).ln() / t_pay;
    let zero = ZeroCurve::new(base, vec![1.0], vec![rate]).unwrap();
    let credit = CreditCurve::new(base, vec![1.0], vec![hazard]).unwrap();

    let schedule = CdsSchedule::generate(
        ymd(2022, 9, 20),
        ymd(2023, 3, 20),
        Frequency::Quarterly,
        DayCountConvention::Act360,
        BadDayConvention::ModifiedFollowing,
        &Calendar::weekends_only(),
    )
    .unwrap();
    assert_eq!(schedule.periods().len(), 2);
    let first = schedule.periods()[0];
    assert_relative_eq!(first.year_fraction, 91.0 / 360.0, epsilon = 1e-15);

    let fee = fee_leg_pv(base, &schedule, 0.01, &zero, &credit, 10_000_000.0, false);

    // Remove the final period's contribution, computed from curve queries:
    // survival observed one day before the stored accrual end.
    let last = schedule.periods()[1];
    let q_last = credit.survival_probability_at(last.accrual_end - chrono::Duration::days(1));
    let df_last = zero.discount_factor_at(last.payment_date);
    let last_pv = 0.01 * 10_000_000.0 * last.year_fraction * q_last * df_last;

    let first_pv = fee - last_pv;
    assert!(
        (first_pv - 24_889.0).abs() <= 5.0,
        "interior coupon PV {first_pv}"
    );
}

// ===========================================================================
// Schedule anchoring
// ===========================================================================

#[test]
fn trade_date_anchors_to_previous_imm_with_full_schedule() {
    let trade = ymd(2022, 8, 31);
    let anchor = previous_imm(trade);
    assert_eq!(anchor, ymd(2022, 6, 20));

    let schedule = CdsSchedule::generate(
        anchor,
        ymd(2026, 12, 20),
        Frequency::Quarterly,
        DayCountConvention::Act360,
        BadDayConvention::ModifiedFollowing,
        &Calendar::weekends_only(),
    )
    .unwrap();
    assert_eq!(schedule.periods().len(), 18);

    // The anchor is itself an IMM date, so there is no front stub: the
    // first period is a full quarter.
    let first = schedule.periods()[0];
    assert_eq!(first.accrual_end, ymd(2022, 9, 20));
    assert_relative_eq!(first.year_fraction, 92.0 / 360.0, epsilon = 1e-15);
}

// ===========================================================================
// Sensitivities
// ===========================================================================

#[test]
fn cs01_tracks_the_risky_annuity_at_the_money() {
    let pricer = market_pricer();
    let result = pricer
        .price_cds(ymd(2026, 12, 20), 0.0100, 100, 10_000_000.0, 0.40, true)
        .unwrap();

    // A 1bp hazard bump moves the buyer's PV up by about the annuity
    // scaled by loss given default.
    assert!(result.cs01 > 0.0);
    let first_order = 0.60 * result.rpv01 * 10_000_000.0 * 1.0e-4;
    let ratio = result.cs01 / first_order;
    assert!(
        (0.7..=1.3).contains(&ratio),
        "cs01 {} vs first-order {first_order}",
        result.cs01
    );
}

#[test]
fn dv01_is_second_order_at_the_money() {
    let pricer = market_pricer();
    let result = pricer
        .price_cds(ymd(2026, 12, 20), 0.0100, 100, 10_000_000.0, 0.40, true)
        .unwrap();

    assert!(result.dv01.is_finite());
    assert!(
        result.dv01.abs() < 0.2 * result.cs01.abs(),
        "dv01 {} should be small next to cs01 {}",
        result.dv01,
        result.cs01
    );
}

#[test]
fn buy_sell_antisymmetry_covers_risk_numbers() {
    let pricer = market_pricer();
    let buy = pricer
        .price_cds(ymd(2026, 12, 20), 0.0150, 500, 10_000_000.0, 0.40, true)
        .unwrap();
    let sell = pricer
        .price_cds(ymd(2026, 12, 20), 0.0150, 500, 10_000_000.0, 0.40, false)
        .unwrap();

    assert_relative_eq!(buy.pv_dirty, -sell.pv_dirty, epsilon = 1e-8 * buy.pv_dirty.abs());
    assert_relative_eq!(buy.pv_clean, -sell.pv_clean, epsilon = 1e-8 * buy.pv_clean.abs());
    assert_relative_eq!(buy.cs01, -sell.cs01, epsilon = 1e-8 * buy.cs01.abs());
    assert_relative_eq!(buy.dv01, -sell.dv01, epsilon = 1e-6 * buy.cs01.abs());
    assert_relative_eq!(buy.par_spread, sell.par_spread, epsilon = 1e-12);
}

// ===========================================================================
// Upfront conversions
// ===========================================================================

#[test]
fn upfront_and_spread_convert_both_ways() {
    let pricer = market_pricer();
    let maturity = ymd(2026, 12, 20);

    for &spread in &[0.0040, 0.0100, 0.0250, 0.0600] {
        let (dirty, clean, accrued) = pricer
            .compute_upfront(maturity, spread, 100, 10_000_000.0, 0.40)
            .unwrap();
        assert_relative_eq!(clean, dirty - accrued, epsilon = 1e-9);

        let implied = pricer
            .spread_from_upfront(maturity, dirty, 100, 10_000_000.0, 0.40, false)
            .unwrap();
        assert_relative_eq!(implied, spread, epsilon = 1e-8);
    }
}

#[test]
fn upfront_sign_follows_spread_versus_coupon() {
    let pricer = market_pricer();
    let maturity = ymd(2026, 12, 20);

    let (above, _, _) = pricer
        .compute_upfront(maturity, 0.0200, 100, 10_000_000.0, 0.40)
        .unwrap();
    let (below, _, _) = pricer
        .compute_upfront(maturity, 0.0050, 100, 10_000_000.0, 0.40)
        .unwrap();

    assert!(above > 0.0, "buyer pays when spread > coupon, got {above}");
    assert!(below < 0.0, "buyer receives when spread < coupon, got {below}");
}

// ===========================================================================
// Term-structure pricing
// ===========================================================================

#[test]
fn bootstrapped_term_structure_reprices_pillar_trades() {
    let pricer = market_pricer();
    let maturities = [
        ymd(2023, 12, 20),
        ymd(2025, 12, 20),
        ymd(2027, 12, 20),
        ymd(2029, 12, 20),
        ymd(2032, 12, 20),
    ];
    let spreads = [0.0045, 0.0060, 0.0075, 0.0085, 0.0095];

    let credit = pricer.build_credit_curve(&spreads, &maturities, 0.40).unwrap();

    for (&spread, &maturity) in spreads.iter().zip(maturities.iter()) {
        let contract = CdsContract::standard(
            pricer.trade_date(),
            maturity,
            100,
            10_000_000.0,
            0.40,
            true,
            &Calendar::weekends_only(),
        )
        .unwrap();
        let result = pricer.price_contract(&contract, &credit).unwrap();
        assert_relative_eq!(result.par_spread, spread, epsilon = 1e-7);
    }

    // Upward-sloping spreads mean survival decays faster further out.
    let q3 = credit.survival_probability(3.0);
    let q7 = credit.survival_probability(7.0);
    assert!(q3 > q7 && q7 > 0.0);
}
