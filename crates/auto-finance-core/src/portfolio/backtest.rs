//! Backtest the decision ladder against realized outcomes.
//!
//! Historical exports carry a FICO band label rather than a point score and
//! no recent-risk flag, so each record is replayed with the band midpoint,
//! the record's own ratios, the policy baseline for that midpoint, and the
//! risk flag off. Model and realized outcomes are coarsened to
//! approve / conditional / decline and cross-tabulated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decision::{self, DecisionInput};
use crate::error::AutoFinanceError;
use crate::policy;
use crate::types::{DealRecord, DecisionLabel, FICO_MAX};
use crate::AutoFinanceResult;

/// Coarse outcome shared by model labels and realized statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Approve,
    Conditional,
    Decline,
}

impl Outcome {
    fn index(self) -> usize {
        match self {
            Outcome::Approve => 0,
            Outcome::Conditional => 1,
            Outcome::Decline => 2,
        }
    }

    fn from_label(label: DecisionLabel) -> Outcome {
        match label {
            DecisionLabel::Approved => Outcome::Approve,
            DecisionLabel::ConditionalApproval | DecisionLabel::ConditionalNeedsHigherDown => {
                Outcome::Conditional
            }
            DecisionLabel::Denied => Outcome::Decline,
        }
    }

    fn from_status(status: &str) -> Option<Outcome> {
        match status.trim().to_ascii_lowercase().as_str() {
            "approved" => Some(Outcome::Approve),
            "conditional" => Some(Outcome::Conditional),
            "declined" => Some(Outcome::Decline),
            _ => None,
        }
    }
}

/// Model-vs-realized agreement over a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestOutput {
    /// Records replayed through the ladder.
    pub compared: u64,
    /// Records skipped for an unparseable band or status.
    pub skipped: u64,
    /// Share of compared records where the coarse outcomes match.
    pub agreement_rate: Decimal,
    /// Rows are model outcomes, columns realized, both in
    /// approve / conditional / decline order.
    pub confusion: [[u64; 3]; 3],
}

/// Representative score for a band label: "670-739" maps to its midpoint,
/// "800+" to the midpoint of [800, FICO_MAX].
pub fn band_midpoint(band: &str) -> Option<u32> {
    let band = band.trim();
    if let Some(floor) = band.strip_suffix('+') {
        let floor: u32 = floor.parse().ok()?;
        return Some((floor + FICO_MAX) / 2);
    }
    if let Some((lo, hi)) = band.split_once('-') {
        let lo: u32 = lo.trim().parse().ok()?;
        let hi: u32 = hi.trim().parse().ok()?;
        return Some((lo + hi) / 2);
    }
    band.parse().ok()
}

fn replay(record: &DealRecord, credit_score: u32) -> DecisionLabel {
    let down_payment_pct = if record.sale_price <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        record.down_payment / record.sale_price
    };
    let decision = decision::evaluate(&DecisionInput {
        credit_score,
        dti: record.dti_ratio,
        ltv: record.ltv_ratio,
        down_payment_pct,
        recent_auto_risk: false,
        baseline_min_down_pct: policy::min_down_payment_pct(credit_score),
    });
    decision.label
}

/// Replay the ladder over historical records and report agreement with the
/// realized statuses.
pub fn run_backtest(records: &[DealRecord]) -> AutoFinanceResult<BacktestOutput> {
    if records.is_empty() {
        return Err(AutoFinanceError::InsufficientData(
            "At least one deal record is required.".into(),
        ));
    }

    let mut confusion = [[0u64; 3]; 3];
    let mut compared = 0u64;
    let mut skipped = 0u64;
    let mut matches = 0u64;

    for record in records {
        let (score, realized) = match (
            band_midpoint(&record.fico_band),
            Outcome::from_status(&record.approval_status),
        ) {
            (Some(score), Some(realized)) => (score, realized),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let model = Outcome::from_label(replay(record, score));
        confusion[model.index()][realized.index()] += 1;
        compared += 1;
        if model == realized {
            matches += 1;
        }
    }

    let agreement_rate = if compared == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(matches) / Decimal::from(compared)
    };

    Ok(BacktestOutput {
        compared,
        skipped,
        agreement_rate,
        confusion,
    })
}
