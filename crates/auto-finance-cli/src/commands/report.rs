use clap::Args;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use auto_finance_core::portfolio::analytics::{self, PortfolioKpis};
use auto_finance_core::types::DealRecord;

use crate::input::csv_records;

/// Arguments for the weekly report package
#[derive(Args)]
pub struct ReportArgs {
    /// Raw export CSVs (dealer export headers); repeatable
    #[arg(long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Where the normalized CSV lands
    #[arg(long, default_value = "data/interim/deals_clean.csv")]
    pub clean_out: String,

    /// Directory for the report spreadsheets
    #[arg(long, default_value = "reports")]
    pub out_dir: String,
}

/// Ingest, aggregate, and write the report package: one CSV per sheet of
/// the old weekly workbook.
pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut records: Vec<DealRecord> = Vec::new();
    for path in &args.input {
        records.extend(csv_records::read_raw_path(path)?);
    }
    if records.is_empty() {
        return Err("No rows found in the raw input files".into());
    }

    csv_records::write_normalized_path(Path::new(&args.clean_out), &records)?;
    let kpis = analytics::calculate_kpis(&records)?;

    let out_dir = PathBuf::from(&args.out_dir);
    fs::create_dir_all(&out_dir)?;
    let files = write_package(&out_dir, &kpis)?;

    Ok(serde_json::json!({
        "rows": records.len(),
        "clean_path": args.clean_out,
        "package": args.out_dir,
        "files": files,
    }))
}

fn write_package(
    out_dir: &Path,
    kpis: &PortfolioKpis,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();

    let summary = out_dir.join("summary.csv");
    {
        let mut wtr = csv::Writer::from_path(&summary)?;
        wtr.write_record(["field", "value"])?;
        wtr.write_record(["deal_count", &kpis.deal_count.to_string()])?;
        wtr.write_record([
            "overall_approval_rate",
            &kpis.overall_approval_rate.to_string(),
        ])?;
        wtr.write_record(["risky_share_overall", &kpis.risky_share_overall.to_string()])?;
        wtr.flush()?;
    }
    files.push(summary.display().to_string());

    let lenders = out_dir.join("apr_by_lender.csv");
    {
        let mut wtr = csv::Writer::from_path(&lenders)?;
        for row in &kpis.apr_by_lender {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
    }
    files.push(lenders.display().to_string());

    let bands = out_dir.join("approval_by_fico.csv");
    {
        let mut wtr = csv::Writer::from_path(&bands)?;
        for row in &kpis.approval_by_fico {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
    }
    files.push(bands.display().to_string());

    let trend = out_dir.join("risk_trend.csv");
    {
        let mut wtr = csv::Writer::from_path(&trend)?;
        for row in &kpis.risky_by_month {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
    }
    files.push(trend.display().to_string());

    Ok(files)
}
