use chrono::Utc;
use clap::Args;
use serde_json::Value;
use std::fs;
use std::path::Path;

use auto_finance_core::simulate::{self, SimulationInput};

use crate::input::csv_records;

/// Arguments for synthetic raw-export generation
#[derive(Args)]
pub struct SimulateArgs {
    /// Number of deals to generate
    #[arg(long, default_value_t = 900)]
    pub rows: u32,

    /// Spread funded dates over this many days before today
    #[arg(long, default_value_t = 210)]
    pub days_back: u32,

    /// RNG seed; same seed, same file
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output path for the raw CSV
    #[arg(long, default_value = "data/raw/simulated_deals.csv")]
    pub out: String,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = simulate::simulate_deals(&SimulationInput {
        rows: args.rows,
        days_back: args.days_back,
        seed: args.seed,
        as_of: Utc::now().date_naive(),
    })?;

    let path = Path::new(&args.out);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)
        .map_err(|e| format!("Failed to create '{}': {e}", path.display()))?;
    csv_records::write_raw(file, &records)?;

    Ok(serde_json::json!({
        "rows": records.len(),
        "seed": args.seed,
        "path": args.out,
    }))
}
