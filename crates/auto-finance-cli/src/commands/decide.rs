use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use auto_finance_core::decision::{self, DecisionInput};
use auto_finance_core::policy;
use auto_finance_core::types::{FICO_MAX, FICO_MIN};

use crate::input;

/// Arguments for a one-shot decision-ladder evaluation
#[derive(Args)]
pub struct DecideArgs {
    /// FICO score in [300, 850]
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Debt-to-income ratio including the prospective payment
    #[arg(long)]
    pub dti: Option<Decimal>,

    /// Loan-to-value ratio
    #[arg(long)]
    pub ltv: Option<Decimal>,

    /// Down payment as a fraction of price
    #[arg(long)]
    pub down_payment_pct: Option<Decimal>,

    /// Open auto loan or repossession within 24 months
    #[arg(long)]
    pub recent_auto_risk: bool,

    /// Baseline minimum down-payment fraction (defaults to the policy
    /// table value for the score)
    #[arg(long)]
    pub baseline_min_down_pct: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn validate(input: &DecisionInput) -> Result<(), Box<dyn std::error::Error>> {
    if input.credit_score < FICO_MIN || input.credit_score > FICO_MAX {
        return Err(format!("credit_score must be in [{FICO_MIN}, {FICO_MAX}]").into());
    }
    for (name, value) in [
        ("dti", input.dti),
        ("ltv", input.ltv),
        ("down_payment_pct", input.down_payment_pct),
        ("baseline_min_down_pct", input.baseline_min_down_pct),
    ] {
        if value < Decimal::ZERO {
            return Err(format!("{name} must be non-negative").into());
        }
    }
    Ok(())
}

pub fn run_decide(args: DecideArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: DecisionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let credit_score = args
            .credit_score
            .ok_or("--credit-score is required (or provide --input)")?;
        DecisionInput {
            credit_score,
            dti: args.dti.ok_or("--dti is required (or provide --input)")?,
            ltv: args.ltv.ok_or("--ltv is required (or provide --input)")?,
            down_payment_pct: args
                .down_payment_pct
                .ok_or("--down-payment-pct is required (or provide --input)")?,
            recent_auto_risk: args.recent_auto_risk,
            baseline_min_down_pct: args
                .baseline_min_down_pct
                .unwrap_or_else(|| policy::min_down_payment_pct(credit_score)),
        }
    };

    validate(&input_data)?;
    let decision = decision::evaluate(&input_data);
    Ok(serde_json::to_value(decision)?)
}
