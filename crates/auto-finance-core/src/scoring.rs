//! Approval-probability scoring.
//!
//! Blends three normalized sub-scores into a single probability:
//! 1. **Credit** -- linear map of FICO [300, 850] onto [0, 1].
//! 2. **DTI** -- piecewise-linear decay past the 36% comfort threshold.
//! 3. **LTV** -- piecewise-linear decay past 90% financed.
//!
//! The blend is 0.6 credit / 0.25 DTI / 0.15 LTV. Credit dominates by
//! policy. Every sub-score is clamped to [0, 1] before combination and the
//! blend is clamped again on the way out.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{FICO_MAX, FICO_MIN};

const CREDIT_WEIGHT: Decimal = dec!(0.6);
const DTI_WEIGHT: Decimal = dec!(0.25);
const LTV_WEIGHT: Decimal = dec!(0.15);

fn clamp_unit(x: Decimal) -> Decimal {
    x.clamp(Decimal::ZERO, Decimal::ONE)
}

/// Linear map of a FICO score onto [0, 1].
pub fn credit_sub_score(credit_score: u32) -> Decimal {
    let span = Decimal::from(FICO_MAX - FICO_MIN);
    let above_floor = Decimal::from(credit_score.saturating_sub(FICO_MIN));
    clamp_unit(above_floor / span)
}

/// DTI sub-score: 1.0 up to 36%, then two linear decay segments down to a
/// 0.1 floor above 60%.
pub fn dti_sub_score(dti: Decimal) -> Decimal {
    let score = if dti <= dec!(0.36) {
        Decimal::ONE
    } else if dti <= dec!(0.50) {
        Decimal::ONE - (dti - dec!(0.36)) / dec!(0.14) * dec!(0.5)
    } else if dti <= dec!(0.60) {
        dec!(0.5) - (dti - dec!(0.50)) / dec!(0.10) * dec!(0.3)
    } else {
        dec!(0.1)
    };
    clamp_unit(score)
}

/// LTV sub-score: 1.0 up to 90% financed, a shallow decay to 100%, a steep
/// decay to 120%, then a 0.2 floor.
pub fn ltv_sub_score(ltv: Decimal) -> Decimal {
    let score = if ltv <= dec!(0.90) {
        Decimal::ONE
    } else if ltv <= dec!(1.00) {
        Decimal::ONE - (ltv - dec!(0.90)) / dec!(0.10) * dec!(0.1)
    } else if ltv <= dec!(1.20) {
        dec!(0.9) - (ltv - dec!(1.00)) / dec!(0.20) * dec!(0.6)
    } else {
        dec!(0.2)
    };
    clamp_unit(score)
}

/// Blended approval probability in [0, 1].
pub fn approval_probability(credit_score: u32, dti: Decimal, ltv: Decimal) -> Decimal {
    clamp_unit(
        CREDIT_WEIGHT * credit_sub_score(credit_score)
            + DTI_WEIGHT * dti_sub_score(dti)
            + LTV_WEIGHT * ltv_sub_score(ltv),
    )
}
