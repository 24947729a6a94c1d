use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Fixed monthly installment for a loan of `principal` at `annual_rate`
/// over `term_months`.
///
/// A zero term returns the principal unchanged (degenerate case, signals a
/// caller error without failing). A zero monthly rate divides the principal
/// evenly across the term. Otherwise the standard annuity formula
/// `P * r / (1 - (1+r)^-n)`, computed with integer powers for stability.
pub fn monthly_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Money {
    if term_months == 0 {
        return principal;
    }

    let r = annual_rate / MONTHS_PER_YEAR;
    let n = Decimal::from(term_months);
    if r.is_zero() {
        return principal / n;
    }

    // P * r / (1 - (1+r)^-n)  ==  P * r * (1+r)^n / ((1+r)^n - 1)
    let growth = (Decimal::ONE + r).powi(term_months as i64);
    principal * r * growth / (growth - Decimal::ONE)
}
