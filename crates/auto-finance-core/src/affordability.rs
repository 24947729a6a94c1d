//! Affordability metrics: DTI, LTV, and down-payment fraction from raw
//! dollar inputs. Pure arithmetic; zero income or price short-circuits to
//! zero instead of dividing.

use rust_decimal::Decimal;

use crate::amortization;
use crate::types::{ApplicantProfile, DealTerms, DerivedRatios};

/// Derive principal, payment, and the three ratios the decision ladder
/// consumes.
pub fn derive_ratios(profile: &ApplicantProfile, terms: &DealTerms) -> DerivedRatios {
    let principal = (terms.vehicle_price - terms.down_payment).max(Decimal::ZERO);
    let monthly_payment = amortization::monthly_payment(principal, terms.apr, terms.term_months);

    let total_debt = profile.monthly_housing + profile.monthly_other_debt + monthly_payment;
    let dti = if profile.monthly_income <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        total_debt / profile.monthly_income
    };

    let (ltv, down_payment_pct) = if terms.vehicle_price <= Decimal::ZERO {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            principal / terms.vehicle_price,
            terms.down_payment / terms.vehicle_price,
        )
    };

    DerivedRatios {
        principal,
        monthly_payment,
        dti,
        ltv,
        down_payment_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn profile(income: Decimal) -> ApplicantProfile {
        ApplicantProfile {
            credit_score: 700,
            monthly_income: income,
            monthly_housing: dec!(1200),
            monthly_other_debt: dec!(300),
            recent_auto_risk: false,
        }
    }

    #[test]
    fn test_principal_floors_at_zero() {
        let terms = DealTerms {
            vehicle_price: dec!(10000),
            down_payment: dec!(12000),
            apr: dec!(0.06),
            term_months: 60,
        };
        let r = derive_ratios(&profile(dec!(5000)), &terms);
        assert_eq!(r.principal, Decimal::ZERO);
        assert_eq!(r.monthly_payment, Decimal::ZERO);
        assert_eq!(r.ltv, Decimal::ZERO);
    }

    #[test]
    fn test_zero_income_gives_zero_dti() {
        let terms = DealTerms {
            vehicle_price: dec!(20000),
            down_payment: dec!(2000),
            apr: dec!(0.06),
            term_months: 60,
        };
        let r = derive_ratios(&profile(Decimal::ZERO), &terms);
        assert_eq!(r.dti, Decimal::ZERO);
    }

    #[test]
    fn test_zero_price_guards_ltv_and_down_pct() {
        let terms = DealTerms {
            vehicle_price: Decimal::ZERO,
            down_payment: Decimal::ZERO,
            apr: dec!(0.06),
            term_months: 60,
        };
        let r = derive_ratios(&profile(dec!(5000)), &terms);
        assert_eq!(r.ltv, Decimal::ZERO);
        assert_eq!(r.down_payment_pct, Decimal::ZERO);
    }

    #[test]
    fn test_ratios_on_typical_deal() {
        // 30k car, 6k down, 24k financed at 0% over 48 months: 500/mo
        let terms = DealTerms {
            vehicle_price: dec!(30000),
            down_payment: dec!(6000),
            apr: Decimal::ZERO,
            term_months: 48,
        };
        let r = derive_ratios(&profile(dec!(5000)), &terms);
        assert_eq!(r.principal, dec!(24000));
        assert_eq!(r.monthly_payment, dec!(500));
        assert_eq!(r.ltv, dec!(0.8));
        assert_eq!(r.down_payment_pct, dec!(0.2));
        // (1200 + 300 + 500) / 5000
        assert_eq!(r.dti, dec!(0.4));
    }
}
