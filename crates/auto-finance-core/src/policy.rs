//! Credit policy tables.
//!
//! One ordered band table drives both lookups (default APR and baseline
//! minimum down payment) so the two staircases cannot drift apart. Bands
//! are scanned from the highest score floor down; the final band has a
//! floor of zero and catches everything below 600.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{PolicyBaseline, Rate};

/// One row of the policy staircase.
#[derive(Debug, Clone, Copy)]
pub struct PolicyBand {
    /// Inclusive lower score bound for this band.
    pub floor: u32,
    /// Default APR pre-filled for scores in this band.
    pub default_apr: Rate,
    /// Baseline minimum down-payment fraction for scores in this band.
    pub min_down_payment_pct: Decimal,
}

/// Descending staircase over six score bands. Strong prime can finance
/// with nothing down; deep subprime starts at 35%.
pub static POLICY_BANDS: [PolicyBand; 6] = [
    PolicyBand {
        floor: 760,
        default_apr: dec!(0.049),
        min_down_payment_pct: dec!(0.00),
    },
    PolicyBand {
        floor: 720,
        default_apr: dec!(0.059),
        min_down_payment_pct: dec!(0.05),
    },
    PolicyBand {
        floor: 680,
        default_apr: dec!(0.079),
        min_down_payment_pct: dec!(0.10),
    },
    PolicyBand {
        floor: 640,
        default_apr: dec!(0.119),
        min_down_payment_pct: dec!(0.15),
    },
    PolicyBand {
        floor: 600,
        default_apr: dec!(0.159),
        min_down_payment_pct: dec!(0.25),
    },
    PolicyBand {
        floor: 0,
        default_apr: dec!(0.219),
        min_down_payment_pct: dec!(0.35),
    },
];

/// Advisory defaults for a credit score. Pure lookup, recomputed per call.
pub fn policy_baseline(credit_score: u32) -> PolicyBaseline {
    let band = POLICY_BANDS
        .iter()
        .find(|b| credit_score >= b.floor)
        .unwrap_or(&POLICY_BANDS[POLICY_BANDS.len() - 1]);
    PolicyBaseline {
        default_apr: band.default_apr,
        min_down_payment_pct: band.min_down_payment_pct,
    }
}

/// Default APR for a credit score.
pub fn default_apr(credit_score: u32) -> Rate {
    policy_baseline(credit_score).default_apr
}

/// Baseline minimum down-payment fraction for a credit score.
pub fn min_down_payment_pct(credit_score: u32) -> Decimal {
    policy_baseline(credit_score).min_down_payment_pct
}
