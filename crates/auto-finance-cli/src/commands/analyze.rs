use clap::Args;
use serde_json::Value;

use auto_finance_core::portfolio::{analytics, backtest};

use crate::input::csv_records;

/// Arguments for portfolio KPI analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Normalized deal CSV (see `ingest`)
    #[arg(long, default_value = "data/interim/deals_clean.csv")]
    pub input: String,

    /// Also replay the decision ladder against realized outcomes
    #[arg(long)]
    pub backtest: bool,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = csv_records::read_normalized_path(&args.input)?;
    let kpis = analytics::calculate_kpis(&records)?;

    let mut value = serde_json::to_value(&kpis)?;
    if args.backtest {
        let bt = backtest::run_backtest(&records)?;
        value["backtest"] = serde_json::to_value(&bt)?;
    }
    Ok(value)
}
