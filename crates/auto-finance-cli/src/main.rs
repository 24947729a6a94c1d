mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::decide::DecideArgs;
use commands::estimate::EstimateArgs;
use commands::ingest::IngestArgs;
use commands::payment::PaymentArgs;
use commands::report::ReportArgs;
use commands::simulate::SimulateArgs;

/// Auto-loan approval estimation and portfolio analytics
#[derive(Parser)]
#[command(
    name = "afa",
    version,
    about = "Auto-loan approval estimation and portfolio analytics",
    long_about = "A CLI for rule-based auto-loan approval estimation with decimal \
                  precision. Estimates single applications interactively, evaluates \
                  the decision ladder over piped inputs, and runs the batch pipeline \
                  (ingest, KPIs, weekly report package, synthetic data)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive approval estimator for one application
    Estimate(EstimateArgs),
    /// Run the decision ladder over a six-field input
    Decide(DecideArgs),
    /// Fixed-rate monthly payment for a loan
    Payment(PaymentArgs),
    /// Normalize raw deal exports into a clean CSV
    Ingest(IngestArgs),
    /// Portfolio KPIs over a normalized deal CSV
    Analyze(AnalyzeArgs),
    /// Weekly report package: ingest, KPIs, report spreadsheets
    Report(ReportArgs),
    /// Generate a synthetic raw deal export
    Simulate(SimulateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Estimate(args) => {
            // The estimator renders its own human summary and bypasses the
            // format dispatch.
            match commands::estimate::run_estimate(args) {
                Ok(()) => return,
                Err(e) => {
                    eprintln!("{}: {}", "error".red().bold(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Decide(args) => commands::decide::run_decide(args),
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Ingest(args) => commands::ingest::run_ingest(args),
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Report(args) => commands::report::run_report(args),
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Version => {
            println!("afa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
