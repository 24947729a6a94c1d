use clap::Args;
use serde_json::Value;
use std::path::Path;

use crate::input::csv_records;

/// Arguments for raw-export normalization
#[derive(Args)]
pub struct IngestArgs {
    /// Raw export CSVs (dealer export headers); repeatable
    #[arg(long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Output path for the normalized CSV
    #[arg(long, default_value = "data/interim/deals_clean.csv")]
    pub out: String,
}

pub fn run_ingest(args: IngestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut records = Vec::new();
    for path in &args.input {
        records.extend(csv_records::read_raw_path(path)?);
    }
    if records.is_empty() {
        return Err("No rows found in the raw input files".into());
    }

    csv_records::write_normalized_path(Path::new(&args.out), &records)?;

    Ok(serde_json::json!({
        "files": args.input.len(),
        "rows": records.len(),
        "path": args.out,
    }))
}
