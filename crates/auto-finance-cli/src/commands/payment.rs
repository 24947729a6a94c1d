use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use auto_finance_core::amortization;

/// Arguments for a standalone payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Amount financed
    #[arg(long)]
    pub principal: Decimal,

    /// Annual rate as a decimal fraction (0.059 = 5.9%)
    #[arg(long)]
    pub apr: Decimal,

    /// Loan term in months
    #[arg(long)]
    pub term: u32,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.principal < Decimal::ZERO {
        return Err("--principal must be non-negative".into());
    }
    if args.apr < Decimal::ZERO {
        return Err("--apr must be non-negative".into());
    }
    if args.term == 0 {
        return Err("--term must be positive".into());
    }

    let monthly_payment =
        amortization::monthly_payment(args.principal, args.apr, args.term).round_dp(2);
    let total_paid = (monthly_payment * Decimal::from(args.term)).round_dp(2);
    let total_interest = (total_paid - args.principal).round_dp(2);

    Ok(serde_json::json!({
        "principal": args.principal,
        "apr": args.apr,
        "term_months": args.term,
        "monthly_payment": monthly_payment,
        "total_paid": total_paid,
        "total_interest": total_interest,
    }))
}
