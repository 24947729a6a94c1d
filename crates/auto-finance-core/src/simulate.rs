//! Seeded synthetic deal generation for backtesting and demos.
//!
//! Reproducible by construction: a fixed default seed, an explicit as-of
//! date supplied by the caller (this module never reads the clock), and
//! `StdRng` throughout. Generator randomness stays on this side of the
//! boundary; the decision ladder never consults a random source.

use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

use crate::amortization;
use crate::error::AutoFinanceError;
use crate::types::{DealRecord, Money};
use crate::AutoFinanceResult;

// ---------------------------------------------------------------------------
// Inventory and lender tables
// ---------------------------------------------------------------------------

const MAKES_MODELS: &[(&str, &[&str])] = &[
    ("Toyota", &["Camry", "Corolla", "RAV4", "Highlander", "Tacoma"]),
    ("Honda", &["Civic", "Accord", "CR-V", "Pilot"]),
    ("Nissan", &["Altima", "Sentra", "Rogue"]),
    ("Ford", &["Focus", "Fusion", "Escape", "F-150"]),
    ("Hyundai", &["Elantra", "Sonata", "Tucson"]),
    ("Chevy", &["Cruze", "Malibu", "Equinox", "Silverado"]),
    ("Subaru", &["Impreza", "Legacy", "Outback", "Forester"]),
    ("Kia", &["Forte", "Optima", "Soul", "Sorento", "Sportage"]),
    ("BMW", &["3 Series", "5 Series", "X3", "X5"]),
    ("Mercedes-Benz", &["C-Class", "E-Class", "GLC", "GLE"]),
    (
        "Land Rover",
        &["Range Rover Evoque", "Range Rover Sport", "Discovery Sport"],
    ),
];

const LENDERS: [&str; 3] = [
    "Westlake Financial",
    "Greenwood Credit",
    "United Auto Credit",
];

const FICO_BANDS: [&str; 5] = ["300-579", "580-669", "670-739", "740-799", "800+"];

/// APR sampling ranges in percent per band, hard capped.
const APR_CAP: f64 = 18.9;
const APR_BY_FICO: [(f64, f64); 5] = [
    (15.0, 18.9),
    (11.0, 16.5),
    (7.0, 12.0),
    (4.0, 8.0),
    (2.9, 5.5),
];

/// Monthly income sampling ranges per band.
const INCOME_BY_FICO: [(u32, u32); 5] = [
    (2600, 4200),
    (3200, 5200),
    (4200, 6800),
    (5200, 8200),
    (6200, 9800),
];

const TERMS: [u32; 4] = [36, 48, 60, 72];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Parameters for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Number of deals to generate.
    #[serde(default = "default_rows")]
    pub rows: u32,
    /// Funded dates are spread over this many days before `as_of`.
    #[serde(default = "default_days_back")]
    pub days_back: u32,
    /// RNG seed. Same seed, same rows.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// End of the funded-date window; also anchors vehicle depreciation.
    pub as_of: NaiveDate,
}

fn default_rows() -> u32 {
    900
}

fn default_days_back() -> u32 {
    210
}

fn default_seed() -> u64 {
    42
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

fn normal(mean: f64, std_dev: f64) -> AutoFinanceResult<Normal> {
    Normal::new(mean, std_dev).map_err(|e| AutoFinanceError::InvalidInput {
        field: "distribution".into(),
        reason: format!("Invalid Normal parameters: {e}"),
    })
}

fn random_zip(rng: &mut StdRng) -> String {
    match rng.gen_range(0..3u8) {
        // CT: 06000-06999
        0 => format!("06{:03}", rng.gen_range(0..1000u32)),
        // MA: 01000-02799
        1 => format!("0{}", rng.gen_range(1000..2800u32)),
        // NY: 10001-14999
        _ => rng.gen_range(10001..15000u32).to_string(),
    }
}

fn price_from_year(rng: &mut StdRng, price_noise: &Normal, as_of_year: i32, year: i32) -> i64 {
    let base = 32000 - (as_of_year - year) as i64 * 1200;
    let sampled = base as f64 + rng.sample(price_noise);
    (sampled as i64).max(5500)
}

/// Realized status per the historical generator's rules: deep subprime
/// declines below 50% down, then risk-flag counting with band-specific
/// approval gates.
fn decide_status(
    fico_band: &str,
    down: Money,
    sale: Money,
    dti: Decimal,
    ltv: Decimal,
    pti: Decimal,
) -> &'static str {
    if fico_band == "300-579" && down < dec!(0.50) * sale {
        return "declined";
    }

    let mut risk_flags = 0u8;
    if dti > dec!(0.45) {
        risk_flags += 1;
    }
    if ltv > dec!(1.15) {
        risk_flags += 1;
    }
    if pti > dec!(0.15) {
        risk_flags += 1;
    }

    if matches!(fico_band, "740-799" | "800+") && risk_flags <= 1 {
        return "approved";
    }
    if fico_band == "670-739" && risk_flags <= 1 {
        return "approved";
    }
    if fico_band == "580-669" && down >= dec!(0.20) * sale && risk_flags <= 1 {
        return "approved";
    }

    match risk_flags {
        1 => "conditional",
        n if n >= 2 => "declined",
        _ => "conditional",
    }
}

/// Generate a reproducible batch of synthetic deals.
pub fn simulate_deals(input: &SimulationInput) -> AutoFinanceResult<Vec<DealRecord>> {
    if input.rows == 0 {
        return Err(AutoFinanceError::InvalidInput {
            field: "rows".into(),
            reason: "Must generate at least one row.".into(),
        });
    }

    let mut rng = StdRng::seed_from_u64(input.seed);
    let price_noise = normal(0.0, 3000.0)?;
    let debt_ratio_noise = normal(0.10, 0.05)?;
    let book_ratio_noise = normal(1.03, 0.08)?;

    let start_date = input.as_of - Duration::days(input.days_back as i64);
    let mut rows = Vec::with_capacity(input.rows as usize);

    for i in 0..input.rows {
        let date_funded = start_date + Duration::days(rng.gen_range(0..=input.days_back) as i64);
        let lender = LENDERS[rng.gen_range(0..LENDERS.len())];
        let band_idx = rng.gen_range(0..FICO_BANDS.len());
        let fico_band = FICO_BANDS[band_idx];

        let (make, models) = MAKES_MODELS[rng.gen_range(0..MAKES_MODELS.len())];
        let model = models[rng.gen_range(0..models.len())];
        let vehicle_year = rng.gen_range(2012..=2022);

        let retail = price_from_year(&mut rng, &price_noise, input.as_of.year(), vehicle_year);
        let sale = (retail as f64 * rng.gen_range(0.85..=1.00)) as i64;

        let down_frac = match fico_band {
            "300-579" => rng.gen_range(0.10..=0.60),
            "580-669" => rng.gen_range(0.10..=0.30),
            _ => rng.gen_range(0.05..=0.25),
        };
        // Floor of $300 down; sale prices never get near that low
        let down = ((sale as f64 * down_frac) as i64).clamp(300, sale);

        let sale = Decimal::from(sale);
        let down = Decimal::from(down);
        let amount_financed = (sale - down).max(Decimal::ZERO);

        let (apr_lo, apr_hi) = APR_BY_FICO[band_idx];
        let apr_pct = (rng.gen_range(apr_lo..=apr_hi).min(APR_CAP) * 10.0).round() / 10.0;
        let apr = Decimal::from_f64_retain(apr_pct)
            .unwrap_or_default()
            .round_dp(1);

        let term_months = TERMS[rng.gen_range(0..TERMS.len())];
        let payment_monthly =
            amortization::monthly_payment(amount_financed, apr / dec!(100), term_months)
                .round_dp(2);

        let (income_lo, income_hi) = INCOME_BY_FICO[band_idx];
        let income = Decimal::from(rng.gen_range(income_lo..=income_hi));

        let debt_ratio = rng.sample(&debt_ratio_noise).clamp(0.0, 0.35);
        let other_debt = Decimal::from_f64_retain(debt_ratio).unwrap_or_default() * income;

        let pti = (payment_monthly / income).round_dp(3);
        let dti = ((payment_monthly + other_debt) / income).round_dp(3);

        let book_ratio = rng.sample(&book_ratio_noise).clamp(0.85, 1.25);
        let book_value =
            (sale / Decimal::from_f64_retain(book_ratio).unwrap_or(Decimal::ONE)).round_dp(2);
        let ltv = (amount_financed / book_value.max(dec!(1000))).round_dp(3);

        let approval_status = decide_status(fico_band, down, sale, dti, ltv, pti);
        let callbacks = rng.gen_range(0..=3u32);
        let borrower_zip = random_zip(&mut rng);

        rows.push(DealRecord {
            deal_id: format!("SIM-{}-{:04}", date_funded.format("%y%m%d"), i),
            date_funded,
            lender: lender.to_string(),
            borrower_zip,
            fico_band: fico_band.to_string(),
            vehicle_year,
            vehicle_make: make.to_string(),
            vehicle_model: model.to_string(),
            retail_price: Decimal::from(retail),
            sale_price: sale,
            down_payment: down,
            amount_financed,
            apr,
            term_months,
            payment_monthly,
            dti_ratio: dti,
            ltv_ratio: ltv,
            approval_status: approval_status.to_string(),
            callbacks,
        });
    }

    Ok(rows)
}
