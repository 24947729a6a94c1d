//! The decision ladder: ordered business rules that resolve conflicting
//! signals into a final label.
//!
//! Rule order:
//! 1. **Hard decline** -- recent auto risk with FICO below 700. Terminal.
//! 2. **Down-payment escalation** -- baseline minimum raised for risk
//!    flags and weak credit, capped at 50%.
//! 3. **Requirement check** -- down-payment fraction against the escalated
//!    minimum, with an epsilon tolerance on the ratio comparison.
//! 4. **Probability bands** -- Approved / Conditional / Conditional
//!    pending a higher down payment / Denied.
//!
//! Pure and deterministic: identical inputs yield identical output.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::affordability;
use crate::policy;
use crate::scoring;
use crate::types::{
    ApplicantProfile, DealTerms, Decision, DecisionLabel, DerivedRatios, PolicyBaseline,
};

/// Tolerance for "meets or exceeds" comparisons over fractional money
/// ratios. Keeps a down payment of exactly the required fraction from
/// failing the check on rounding noise.
pub const RATIO_EPSILON: Decimal = dec!(0.000000001);

/// Upper bound on any required down-payment fraction.
const MAX_REQUIRED_DOWN_PCT: Decimal = dec!(0.50);

/// The six fields the ladder consumes. Ratio fields are assumed already
/// derived (see [`crate::affordability::derive_ratios`]); the baseline
/// minimum must come from the policy table, never from a user override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionInput {
    pub credit_score: u32,
    pub dti: Decimal,
    pub ltv: Decimal,
    pub down_payment_pct: Decimal,
    pub recent_auto_risk: bool,
    pub baseline_min_down_pct: Decimal,
}

/// A full evaluation of one application: derived ratios, the policy
/// baseline used, and the resulting decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealEvaluation {
    pub ratios: DerivedRatios,
    pub baseline: PolicyBaseline,
    pub decision: Decision,
}

fn meets_or_exceeds(value: Decimal, threshold: Decimal) -> bool {
    value + RATIO_EPSILON >= threshold
}

fn at_most(value: Decimal, threshold: Decimal) -> bool {
    value <= threshold + RATIO_EPSILON
}

/// Run the ladder over the six-field input.
pub fn evaluate(input: &DecisionInput) -> Decision {
    // Rule 1: hard decline. Terminal; no further rules run.
    if input.recent_auto_risk && input.credit_score < 700 {
        return Decision {
            label: DecisionLabel::Denied,
            probability: Decimal::ZERO,
            required_down_payment_pct: input
                .baseline_min_down_pct
                .max(dec!(0.50))
                .clamp(Decimal::ZERO, MAX_REQUIRED_DOWN_PCT),
            reasons: vec!["Recent auto risk and credit score below 700.".to_string()],
        };
    }

    // Rule 2: escalate the required down payment from the baseline.
    let mut required = input.baseline_min_down_pct;
    if input.recent_auto_risk && input.credit_score >= 700 {
        required = required.max(dec!(0.20));
    }
    if input.credit_score < 620 {
        required = required.max(dec!(0.40));
    }
    let required = required.clamp(Decimal::ZERO, MAX_REQUIRED_DOWN_PCT);

    // Rule 3: does the offered down payment meet the requirement?
    let mut reasons = Vec::new();
    let meets_requirement = meets_or_exceeds(input.down_payment_pct, required);
    if !meets_requirement {
        let pct = (required * dec!(100)).round_dp(0).normalize();
        reasons.push(format!("Down payment below required minimum ({pct}%)."));
    }

    // Rule 4: probability, then the bands.
    let probability = scoring::approval_probability(input.credit_score, input.dti, input.ltv);

    let label = if meets_requirement
        && ((input.credit_score >= 720
            && at_most(input.dti, dec!(0.45))
            && at_most(input.ltv, dec!(1.10)))
            || probability >= dec!(0.78))
    {
        DecisionLabel::Approved
    } else if meets_requirement
        && ((input.credit_score >= 650
            && at_most(input.dti, dec!(0.55))
            && at_most(input.ltv, dec!(1.20)))
            || probability >= dec!(0.58))
    {
        DecisionLabel::ConditionalApproval
    } else if !meets_requirement && probability >= dec!(0.50) {
        DecisionLabel::ConditionalNeedsHigherDown
    } else {
        DecisionLabel::Denied
    };

    Decision {
        label,
        probability,
        required_down_payment_pct: required,
        reasons,
    }
}

/// Evaluate a full application: derive ratios, look up the policy
/// baseline, and run the ladder. Convenience composition for the
/// estimator and for backtesting.
pub fn evaluate_deal(profile: &ApplicantProfile, terms: &DealTerms) -> DealEvaluation {
    let ratios = affordability::derive_ratios(profile, terms);
    let baseline = policy::policy_baseline(profile.credit_score);
    let decision = evaluate(&DecisionInput {
        credit_score: profile.credit_score,
        dti: ratios.dti,
        ltv: ratios.ltv,
        down_payment_pct: ratios.down_payment_pct,
        recent_auto_risk: profile.recent_auto_risk,
        baseline_min_down_pct: baseline.min_down_payment_pct,
    });
    DealEvaluation {
        ratios,
        baseline,
        decision,
    }
}
