use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AutoFinanceError;
use crate::AutoFinanceResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Lowest FICO score accepted at the boundary.
pub const FICO_MIN: u32 = 300;
/// Highest FICO score accepted at the boundary.
pub const FICO_MAX: u32 = 850;

/// A single applicant's credit and income picture at evaluation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantProfile {
    /// FICO score in [300, 850].
    pub credit_score: u32,
    /// Gross monthly income.
    pub monthly_income: Money,
    /// Monthly rent or mortgage payment.
    pub monthly_housing: Money,
    /// Other monthly debt payments (cards, loans).
    pub monthly_other_debt: Money,
    /// Open auto loan or repossession within the past 24 months.
    pub recent_auto_risk: bool,
}

impl ApplicantProfile {
    /// Boundary validation. The decision functions assume a validated
    /// profile and do not re-check ranges.
    pub fn validate(&self) -> AutoFinanceResult<()> {
        if self.credit_score < FICO_MIN || self.credit_score > FICO_MAX {
            return Err(AutoFinanceError::InvalidInput {
                field: "credit_score".into(),
                reason: format!("Must be in [{FICO_MIN}, {FICO_MAX}]."),
            });
        }
        if self.monthly_income < Decimal::ZERO {
            return Err(AutoFinanceError::InvalidInput {
                field: "monthly_income".into(),
                reason: "Must be non-negative.".into(),
            });
        }
        if self.monthly_housing < Decimal::ZERO {
            return Err(AutoFinanceError::InvalidInput {
                field: "monthly_housing".into(),
                reason: "Must be non-negative.".into(),
            });
        }
        if self.monthly_other_debt < Decimal::ZERO {
            return Err(AutoFinanceError::InvalidInput {
                field: "monthly_other_debt".into(),
                reason: "Must be non-negative.".into(),
            });
        }
        Ok(())
    }
}

/// The deal being financed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealTerms {
    /// Vehicle sale price.
    pub vehicle_price: Money,
    /// Cash down payment.
    pub down_payment: Money,
    /// Annual percentage rate as a decimal fraction (0.059 = 5.9%).
    pub apr: Rate,
    /// Loan term in months.
    pub term_months: u32,
}

impl DealTerms {
    /// Boundary validation. See [`ApplicantProfile::validate`].
    pub fn validate(&self) -> AutoFinanceResult<()> {
        if self.vehicle_price < Decimal::ZERO {
            return Err(AutoFinanceError::InvalidInput {
                field: "vehicle_price".into(),
                reason: "Must be non-negative.".into(),
            });
        }
        if self.down_payment < Decimal::ZERO {
            return Err(AutoFinanceError::InvalidInput {
                field: "down_payment".into(),
                reason: "Must be non-negative.".into(),
            });
        }
        if self.apr < Decimal::ZERO {
            return Err(AutoFinanceError::InvalidInput {
                field: "apr".into(),
                reason: "Must be non-negative.".into(),
            });
        }
        if self.term_months == 0 {
            return Err(AutoFinanceError::InvalidInput {
                field: "term_months".into(),
                reason: "Must be positive.".into(),
            });
        }
        Ok(())
    }
}

/// Ratios derived from a profile and deal terms. Computed, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedRatios {
    /// Amount financed: max(price - down, 0).
    pub principal: Money,
    /// Fixed monthly installment on the principal.
    pub monthly_payment: Money,
    /// Debt-to-income including the prospective auto payment.
    pub dti: Decimal,
    /// Loan-to-value: principal / price.
    pub ltv: Decimal,
    /// Down payment as a fraction of price.
    pub down_payment_pct: Decimal,
}

/// Advisory defaults looked up from the credit policy table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyBaseline {
    /// Default APR to pre-fill for this score.
    pub default_apr: Rate,
    /// Baseline minimum down-payment fraction before risk escalations.
    pub min_down_payment_pct: Decimal,
}

/// Final approval label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionLabel {
    Approved,
    ConditionalApproval,
    ConditionalNeedsHigherDown,
    Denied,
}

impl std::fmt::Display for DecisionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionLabel::Approved => write!(f, "Approved"),
            DecisionLabel::ConditionalApproval => write!(f, "Conditional Approval"),
            DecisionLabel::ConditionalNeedsHigherDown => {
                write!(f, "Conditional Approval (needs higher down payment)")
            }
            DecisionLabel::Denied => write!(f, "Denied"),
        }
    }
}

/// Output of the decision ladder. Created fresh per evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub label: DecisionLabel,
    /// Approval probability estimate in [0, 1].
    pub probability: Decimal,
    /// Required minimum down-payment fraction in [0, 0.50] after
    /// risk escalations.
    pub required_down_payment_pct: Decimal,
    /// Human-readable reasons attached along the way.
    pub reasons: Vec<String>,
}

/// One historical deal as normalized by ingestion. Field names match the
/// normalized CSV header; the raw export headers ("Deal ID", "Amt Financed",
/// ...) are mapped by the ingestion layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealRecord {
    pub deal_id: String,
    pub date_funded: NaiveDate,
    pub lender: String,
    pub borrower_zip: String,
    /// FICO band label, e.g. "670-739" or "800+".
    pub fico_band: String,
    pub vehicle_year: i32,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub retail_price: Money,
    pub sale_price: Money,
    pub down_payment: Money,
    pub amount_financed: Money,
    /// APR in percent, as exported (12.5 = 12.5%).
    pub apr: Decimal,
    pub term_months: u32,
    pub payment_monthly: Money,
    pub dti_ratio: Decimal,
    pub ltv_ratio: Decimal,
    /// Realized outcome: "approved", "conditional", or "declined".
    pub approval_status: String,
    pub callbacks: u32,
}
