#![cfg(feature = "portfolio")]

use auto_finance_core::portfolio::analytics::{self, RISK_DTI, RISK_LTV};
use auto_finance_core::portfolio::backtest::{self, band_midpoint};
use auto_finance_core::types::DealRecord;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn deal(
    id: &str,
    lender: &str,
    band: &str,
    funded: NaiveDate,
    apr: Decimal,
    dti: Decimal,
    ltv: Decimal,
    down: Decimal,
    sale: Decimal,
    status: &str,
) -> DealRecord {
    DealRecord {
        deal_id: id.to_string(),
        date_funded: funded,
        lender: lender.to_string(),
        borrower_zip: "06470".to_string(),
        fico_band: band.to_string(),
        vehicle_year: 2019,
        vehicle_make: "Honda".to_string(),
        vehicle_model: "Civic".to_string(),
        retail_price: sale + dec!(1500),
        sale_price: sale,
        down_payment: down,
        amount_financed: sale - down,
        apr,
        term_months: 60,
        payment_monthly: dec!(400),
        dti_ratio: dti,
        ltv_ratio: ltv,
        approval_status: status.to_string(),
        callbacks: 1,
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ===========================================================================
// KPI aggregation
// ===========================================================================

#[test]
fn test_kpis_on_mixed_batch() {
    let batch = vec![
        deal("D1", "Westlake Financial", "740-799", ymd(2025, 3, 3), dec!(5.5), dec!(0.28), dec!(0.85), dec!(4000), dec!(20000), "approved"),
        deal("D2", "Westlake Financial", "670-739", ymd(2025, 3, 18), dec!(8.5), dec!(0.44), dec!(1.00), dec!(2000), dec!(20000), "approved"),
        deal("D3", "Greenwood Credit", "580-669", ymd(2025, 4, 2), dec!(13.0), dec!(0.47), dec!(1.18), dec!(2000), dec!(20000), "conditional"),
        deal("D4", "United Auto Credit", "300-579", ymd(2025, 4, 20), dec!(17.0), dec!(0.58), dec!(1.25), dec!(1000), dec!(20000), "declined"),
    ];
    let kpis = analytics::calculate_kpis(&batch).unwrap();

    assert_eq!(kpis.deal_count, 4);
    assert_eq!(kpis.overall_approval_rate, dec!(0.5));

    // Approved deals only: both Westlake, mean of 5.5 and 8.5
    assert_eq!(kpis.apr_by_lender.len(), 1);
    assert_eq!(kpis.apr_by_lender[0].lender, "Westlake Financial");
    assert_eq!(kpis.apr_by_lender[0].avg_apr, dec!(7.0));
    assert_eq!(kpis.apr_by_lender[0].deals, 2);

    // Risky: D2 (DTI 0.44 > 0.40), D3, D4
    assert_eq!(kpis.risky_share_overall, dec!(0.75));
    assert_eq!(kpis.risky_by_month.len(), 2);
    assert_eq!(kpis.risky_by_month[0].month, ymd(2025, 3, 1));
    assert_eq!(kpis.risky_by_month[0].risky_share, dec!(0.5));
    assert_eq!(kpis.risky_by_month[1].month, ymd(2025, 4, 1));
    assert_eq!(kpis.risky_by_month[1].risky_share, Decimal::ONE);
}

#[test]
fn test_risk_thresholds_are_strict() {
    // Exactly at the thresholds is not risky
    let batch = vec![deal(
        "D1",
        "Greenwood Credit",
        "670-739",
        ymd(2025, 5, 1),
        dec!(9.0),
        RISK_DTI,
        RISK_LTV,
        dec!(2000),
        dec!(20000),
        "approved",
    )];
    let kpis = analytics::calculate_kpis(&batch).unwrap();
    assert_eq!(kpis.risky_share_overall, Decimal::ZERO);
}

#[test]
fn test_empty_batch_is_an_error_not_a_report() {
    assert!(analytics::calculate_kpis(&[]).is_err());
    assert!(backtest::run_backtest(&[]).is_err());
}

// ===========================================================================
// Backtesting against realized outcomes
// ===========================================================================

#[test]
fn test_backtest_agrees_with_ladder_built_records() {
    // Realized statuses chosen to match what the ladder says for each
    // record, so agreement must be total.
    let batch = vec![
        // 740-799 -> midpoint 769, clean ratios, 20% down: Approved
        deal("D1", "Westlake Financial", "740-799", ymd(2025, 2, 10), dec!(5.0), dec!(0.30), dec!(0.80), dec!(4000), dec!(20000), "approved"),
        // 300-579 -> midpoint 439, weak ratios, 5% down: Denied
        deal("D2", "United Auto Credit", "300-579", ymd(2025, 2, 11), dec!(17.5), dec!(0.65), dec!(1.40), dec!(1000), dec!(20000), "declined"),
    ];
    let out = backtest::run_backtest(&batch).unwrap();
    assert_eq!(out.compared, 2);
    assert_eq!(out.skipped, 0);
    assert_eq!(out.agreement_rate, Decimal::ONE);
    // Diagonal cells only
    assert_eq!(out.confusion[0][0], 1);
    assert_eq!(out.confusion[2][2], 1);
    assert_eq!(out.confusion[0][2], 0);
}

#[test]
fn test_backtest_skips_unparseable_rows() {
    let odd = deal(
        "D1",
        "Greenwood Credit",
        "prime",
        ymd(2025, 2, 10),
        dec!(9.0),
        dec!(0.30),
        dec!(0.90),
        dec!(2000),
        dec!(20000),
        "approved",
    );
    let ok = deal(
        "D2",
        "Greenwood Credit",
        "800+",
        ymd(2025, 2, 12),
        dec!(4.0),
        dec!(0.20),
        dec!(0.80),
        dec!(4000),
        dec!(20000),
        "approved",
    );
    let out = backtest::run_backtest(&[odd, ok]).unwrap();
    assert_eq!(out.skipped, 1);
    assert_eq!(out.compared, 1);
}

#[test]
fn test_band_midpoint_parsing() {
    assert_eq!(band_midpoint("580-669"), Some(624));
    assert_eq!(band_midpoint("800+"), Some(825));
    assert_eq!(band_midpoint("not-a-band"), None);
}

// ===========================================================================
// Simulated batch through the analytics path
// ===========================================================================

#[cfg(feature = "simulate")]
mod simulated {
    use super::*;
    use auto_finance_core::simulate::{self, SimulationInput};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simulated_batch_aggregates() {
        let rows = simulate::simulate_deals(&SimulationInput {
            rows: 300,
            days_back: 210,
            seed: 42,
            as_of: ymd(2025, 6, 1),
        })
        .unwrap();
        let kpis = analytics::calculate_kpis(&rows).unwrap();
        assert_eq!(kpis.deal_count, 300);
        assert!(kpis.overall_approval_rate > Decimal::ZERO);
        assert!(kpis.overall_approval_rate < Decimal::ONE);
        assert!(!kpis.risky_by_month.is_empty());

        let bt = backtest::run_backtest(&rows).unwrap();
        assert_eq!(bt.compared, 300);
        assert_eq!(bt.skipped, 0);
    }
}
