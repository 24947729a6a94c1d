use auto_finance_core::decision::{self, DecisionInput};
use auto_finance_core::types::{ApplicantProfile, DealTerms, DecisionLabel};
use auto_finance_core::{amortization, policy, scoring};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_zero_rate_divides_evenly() {
    assert_eq!(
        amortization::monthly_payment(dec!(1200), Decimal::ZERO, 12),
        dec!(100)
    );
}

#[test]
fn test_annuity_reference_payment() {
    let pmt = amortization::monthly_payment(dec!(20000), dec!(0.06), 60);
    assert!((pmt - dec!(386.66)).abs() < dec!(0.005), "got {pmt}");
}

// ===========================================================================
// Full-application scenarios
// ===========================================================================

fn strong_prime_application() -> (ApplicantProfile, DealTerms) {
    let profile = ApplicantProfile {
        credit_score: 760,
        monthly_income: dec!(6000),
        monthly_housing: Decimal::ZERO,
        monthly_other_debt: Decimal::ZERO,
        recent_auto_risk: false,
    };
    let terms = DealTerms {
        vehicle_price: dec!(30000),
        down_payment: Decimal::ZERO,
        apr: dec!(0.049),
        term_months: 60,
    };
    (profile, terms)
}

#[test]
fn test_strong_prime_zero_down_approves() {
    let (profile, terms) = strong_prime_application();
    let eval = decision::evaluate_deal(&profile, &terms);

    // Fully financed: LTV is exactly 1.0, DTI is just the car payment
    assert_eq!(eval.ratios.ltv, Decimal::ONE);
    assert!(eval.ratios.dti < dec!(0.15));
    assert_eq!(eval.ratios.down_payment_pct, Decimal::ZERO);

    // 760 band: nothing down required, so zero down meets the baseline
    assert_eq!(eval.baseline.min_down_payment_pct, Decimal::ZERO);
    assert_eq!(eval.decision.required_down_payment_pct, Decimal::ZERO);
    assert_eq!(eval.decision.label, DecisionLabel::Approved);
    assert!(eval.decision.probability >= dec!(0.78));
    assert!(eval.decision.reasons.is_empty());
}

#[test]
fn test_risk_below_700_denies_regardless_of_deal() {
    // risk flag + 650 hits the hard decline whatever the ratios look like
    for (dti, ltv, dp) in [
        (dec!(0.05), dec!(0.50), dec!(0.60)),
        (dec!(0.30), dec!(0.90), dec!(0.20)),
        (dec!(0.70), dec!(1.40), Decimal::ZERO),
    ] {
        let d = decision::evaluate(&DecisionInput {
            credit_score: 650,
            dti,
            ltv,
            down_payment_pct: dp,
            recent_auto_risk: true,
            baseline_min_down_pct: policy::min_down_payment_pct(650),
        });
        assert_eq!(d.label, DecisionLabel::Denied);
        assert_eq!(d.probability, Decimal::ZERO);
        assert_eq!(d.required_down_payment_pct, dec!(0.50));
    }
}

#[test]
fn test_risk_with_strong_credit_and_quarter_down_approves() {
    let d = decision::evaluate(&DecisionInput {
        credit_score: 740,
        dti: dec!(0.30),
        ltv: dec!(0.80),
        down_payment_pct: dec!(0.25),
        recent_auto_risk: true,
        baseline_min_down_pct: policy::min_down_payment_pct(740),
    });
    assert_eq!(d.required_down_payment_pct, dec!(0.20));
    assert_eq!(d.label, DecisionLabel::Approved);
}

#[test]
fn test_down_payment_exactly_at_requirement_counts() {
    let d = decision::evaluate(&DecisionInput {
        credit_score: 700,
        dti: dec!(0.35),
        ltv: dec!(0.90),
        down_payment_pct: dec!(0.10),
        recent_auto_risk: false,
        baseline_min_down_pct: dec!(0.10),
    });
    assert!(
        d.reasons.is_empty(),
        "an exact-match down payment must meet the requirement"
    );
    assert_ne!(d.label, DecisionLabel::ConditionalNeedsHigherDown);
}

#[test]
fn test_byte_identical_repeat_evaluation() {
    let input = DecisionInput {
        credit_score: 685,
        dti: dec!(0.41),
        ltv: dec!(1.05),
        down_payment_pct: dec!(0.12),
        recent_auto_risk: false,
        baseline_min_down_pct: dec!(0.10),
    };
    let a = serde_json::to_string(&decision::evaluate(&input)).unwrap();
    let b = serde_json::to_string(&decision::evaluate(&input)).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// Output invariants over an input grid
// ===========================================================================

#[test]
fn test_invariants_hold_across_grid() {
    for score in [300u32, 550, 650, 720, 850] {
        for dti in [Decimal::ZERO, dec!(0.40), dec!(0.70)] {
            for ltv in [Decimal::ZERO, dec!(1.00), dec!(1.50)] {
                for dp in [Decimal::ZERO, dec!(0.20), dec!(0.50)] {
                    for risk in [false, true] {
                        let d = decision::evaluate(&DecisionInput {
                            credit_score: score,
                            dti,
                            ltv,
                            down_payment_pct: dp,
                            recent_auto_risk: risk,
                            baseline_min_down_pct: policy::min_down_payment_pct(score),
                        });
                        assert!(
                            d.probability >= Decimal::ZERO && d.probability <= Decimal::ONE,
                            "probability out of range for score {score}"
                        );
                        assert!(
                            d.required_down_payment_pct >= Decimal::ZERO
                                && d.required_down_payment_pct <= dec!(0.50),
                            "requirement out of range for score {score}"
                        );
                        if risk && score < 700 {
                            assert_eq!(d.label, DecisionLabel::Denied);
                            assert_eq!(d.probability, Decimal::ZERO);
                        }
                    }
                }
            }
        }
    }
}

// ===========================================================================
// Scoring properties
// ===========================================================================

#[test]
fn test_credit_sub_score_monotone_and_bounded() {
    let mut prev = Decimal::ZERO;
    for score in 300..=850u32 {
        let s = scoring::credit_sub_score(score);
        assert!(s >= Decimal::ZERO && s <= Decimal::ONE);
        assert!(s >= prev);
        prev = s;
    }
}

#[test]
fn test_dti_sub_score_non_increasing() {
    let mut prev = Decimal::ONE;
    let mut dti = Decimal::ZERO;
    while dti <= dec!(1.0) {
        let s = scoring::dti_sub_score(dti);
        assert!(s <= prev, "DTI sub-score rose at {dti}");
        prev = s;
        dti += dec!(0.005);
    }
}

#[test]
fn test_policy_baseline_feeds_ladder_not_overrides() {
    // The ladder input takes the baseline from the policy table; an APR
    // override has no channel into evaluate() at all. Assert the baseline
    // lookup is what the full-application path wires through.
    let (profile, mut terms) = strong_prime_application();
    terms.apr = dec!(0.199); // user-overridden APR, way above the 4.9% default
    let eval = decision::evaluate_deal(&profile, &terms);
    assert_eq!(
        eval.baseline.min_down_payment_pct,
        policy::min_down_payment_pct(profile.credit_score)
    );
    // Still approved: the override only moves DTI through the payment
    assert_eq!(eval.decision.label, DecisionLabel::Approved);
}
