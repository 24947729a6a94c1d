//! Portfolio KPIs over batches of historical deals.
//!
//! Covers:
//! 1. **Overall approval rate** across the batch.
//! 2. **Average APR by lender** over approved deals.
//! 3. **Approval rate by FICO band**.
//! 4. **Risky-deal share**, overall and as a monthly trend.
//!
//! Consumes the same ratio definitions as the single-applicant path but
//! operates on batches. Output ordering is deterministic (explicit sorts,
//! BTreeMap grouping).

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AutoFinanceError;
use crate::types::DealRecord;
use crate::AutoFinanceResult;

/// A deal is risky when either ratio breaches these thresholds.
pub const RISK_DTI: Decimal = dec!(0.40);
pub const RISK_LTV: Decimal = dec!(1.10);

/// Average APR for one lender over its approved deals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LenderApr {
    pub lender: String,
    /// Mean APR in percent, matching the record unit.
    pub avg_apr: Decimal,
    pub deals: u64,
}

/// Approval rate within one FICO band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandApprovalRate {
    pub fico_band: String,
    pub approval_rate: Decimal,
    pub deals: u64,
}

/// Share of risky deals funded in one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRiskyShare {
    /// First day of the month.
    pub month: NaiveDate,
    pub risky_share: Decimal,
    pub deals: u64,
}

/// The weekly-report KPI set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioKpis {
    pub deal_count: u64,
    pub overall_approval_rate: Decimal,
    /// Ascending by average APR; approved deals only.
    pub apr_by_lender: Vec<LenderApr>,
    /// Ascending by approval rate.
    pub approval_by_fico: Vec<BandApprovalRate>,
    pub risky_share_overall: Decimal,
    /// Chronological monthly trend.
    pub risky_by_month: Vec<MonthlyRiskyShare>,
}

fn is_approved(record: &DealRecord) -> bool {
    record.approval_status.trim().eq_ignore_ascii_case("approved")
}

fn is_risky(record: &DealRecord) -> bool {
    record.dti_ratio > RISK_DTI || record.ltv_ratio > RISK_LTV
}

fn month_start(date: NaiveDate) -> NaiveDate {
    // from_ymd_opt cannot fail for day 1 of an existing date's month
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn share(numerator: u64, denominator: u64) -> Decimal {
    if denominator == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(numerator) / Decimal::from(denominator)
    }
}

/// Aggregate a batch of deals into the KPI set.
pub fn calculate_kpis(records: &[DealRecord]) -> AutoFinanceResult<PortfolioKpis> {
    if records.is_empty() {
        return Err(AutoFinanceError::InsufficientData(
            "At least one deal record is required.".into(),
        ));
    }

    let deal_count = records.len() as u64;
    let approved_count = records.iter().filter(|r| is_approved(r)).count() as u64;
    let risky_count = records.iter().filter(|r| is_risky(r)).count() as u64;

    // APR by lender, approved deals only
    let mut by_lender: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    for r in records.iter().filter(|r| is_approved(r)) {
        let entry = by_lender.entry(r.lender.as_str()).or_insert((Decimal::ZERO, 0));
        entry.0 += r.apr;
        entry.1 += 1;
    }
    let mut apr_by_lender: Vec<LenderApr> = by_lender
        .into_iter()
        .map(|(lender, (sum, n))| LenderApr {
            lender: lender.to_string(),
            avg_apr: sum / Decimal::from(n),
            deals: n,
        })
        .collect();
    apr_by_lender.sort_by(|a, b| a.avg_apr.cmp(&b.avg_apr).then(a.lender.cmp(&b.lender)));

    // Approval rate by FICO band
    let mut by_band: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for r in records {
        let entry = by_band.entry(r.fico_band.as_str()).or_insert((0, 0));
        if is_approved(r) {
            entry.0 += 1;
        }
        entry.1 += 1;
    }
    let mut approval_by_fico: Vec<BandApprovalRate> = by_band
        .into_iter()
        .map(|(band, (approved, total))| BandApprovalRate {
            fico_band: band.to_string(),
            approval_rate: share(approved, total),
            deals: total,
        })
        .collect();
    approval_by_fico.sort_by(|a, b| {
        a.approval_rate
            .cmp(&b.approval_rate)
            .then(a.fico_band.cmp(&b.fico_band))
    });

    // Monthly risky-share trend (BTreeMap keeps months chronological)
    let mut by_month: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for r in records {
        let entry = by_month.entry(month_start(r.date_funded)).or_insert((0, 0));
        if is_risky(r) {
            entry.0 += 1;
        }
        entry.1 += 1;
    }
    let risky_by_month: Vec<MonthlyRiskyShare> = by_month
        .into_iter()
        .map(|(month, (risky, total))| MonthlyRiskyShare {
            month,
            risky_share: share(risky, total),
            deals: total,
        })
        .collect();

    Ok(PortfolioKpis {
        deal_count,
        overall_approval_rate: share(approved_count, deal_count),
        apr_by_lender,
        approval_by_fico,
        risky_share_overall: share(risky_count, deal_count),
        risky_by_month,
    })
}
