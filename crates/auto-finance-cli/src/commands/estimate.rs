use clap::Args;
use colored::Colorize;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::{self, Write};

use auto_finance_core::decision::{self, DealEvaluation};
use auto_finance_core::policy;
use auto_finance_core::types::{ApplicantProfile, DealTerms, DecisionLabel, FICO_MAX, FICO_MIN};

/// Arguments for the interactive estimator. Any value not supplied as a
/// flag is prompted for (requires a terminal).
#[derive(Args)]
pub struct EstimateArgs {
    /// FICO score in [300, 850]
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Gross monthly income
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Monthly rent or mortgage payment
    #[arg(long)]
    pub monthly_housing: Option<Decimal>,

    /// Other monthly debt payments (cards, loans)
    #[arg(long)]
    pub monthly_other_debt: Option<Decimal>,

    /// Vehicle price
    #[arg(long)]
    pub vehicle_price: Option<Decimal>,

    /// Available down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Open auto loan or repossession within 24 months
    #[arg(long)]
    pub recent_auto_risk: Option<bool>,

    /// Loan term in months (minimum 12)
    #[arg(long)]
    pub term_months: Option<u32>,

    /// APR in percent (defaults to the policy rate for the score)
    #[arg(long)]
    pub apr_percent: Option<Decimal>,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Prompt helpers
// ---------------------------------------------------------------------------

fn prompt_line(prompt: &str) -> CliResult<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err("Unexpected end of input".into());
    }
    Ok(line.trim().to_string())
}

fn read_decimal(prompt: &str, default: Option<Decimal>, min: Decimal) -> CliResult<Decimal> {
    loop {
        let raw = prompt_line(prompt)?;
        if raw.is_empty() {
            if let Some(d) = default {
                return Ok(d);
            }
        }
        match raw.parse::<Decimal>() {
            Ok(v) if v < min => println!("  Please enter a value of at least {min}."),
            Ok(v) => return Ok(v),
            Err(_) => println!("  Please enter a number (or press Enter for the default)."),
        }
    }
}

fn read_u32(prompt: &str, default: Option<u32>, min: u32, max: u32) -> CliResult<u32> {
    loop {
        let raw = prompt_line(prompt)?;
        if raw.is_empty() {
            if let Some(d) = default {
                return Ok(d);
            }
        }
        match raw.parse::<u32>() {
            Ok(v) if v < min => println!("  Please enter a value of at least {min}."),
            Ok(v) if v > max => println!("  Please enter a value of at most {max}."),
            Ok(v) => return Ok(v),
            Err(_) => println!("  Please enter a whole number (or press Enter for the default)."),
        }
    }
}

fn read_yes_no(prompt: &str, default: bool) -> CliResult<bool> {
    loop {
        let raw = prompt_line(prompt)?.to_ascii_lowercase();
        match raw.as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("  Please answer y/n."),
        }
    }
}

fn flag_or_prompt_decimal(
    flag: Option<Decimal>,
    tty: bool,
    flag_name: &str,
    prompt: &str,
    default: Option<Decimal>,
) -> CliResult<Decimal> {
    match flag {
        Some(v) if v < Decimal::ZERO => Err(format!("{flag_name} must be non-negative").into()),
        Some(v) => Ok(v),
        None if tty => read_decimal(prompt, default, Decimal::ZERO),
        None => match default {
            Some(d) => Ok(d),
            None => Err(format!("{flag_name} is required without a terminal").into()),
        },
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Thousands-separated money rendering: 12345.6 -> "12,345.60".
fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let s = format!("{:.2}", rounded);
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}.{frac_part}")
}

fn format_pct0(fraction: Decimal) -> String {
    format!("{}%", (fraction * dec!(100)).round_dp(0).normalize())
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

pub fn run_estimate(args: EstimateArgs) -> CliResult<()> {
    let tty = atty::is(atty::Stream::Stdin);

    if tty {
        println!();
        println!("Auto financing approval estimator");
        println!("Estimates your approval chances from your credit and finances.");
        println!();
    }

    let credit_score = match args.credit_score {
        Some(v) if v < FICO_MIN || v > FICO_MAX => {
            return Err(format!("--credit-score must be in [{FICO_MIN}, {FICO_MAX}]").into());
        }
        Some(v) => v,
        None if tty => read_u32(
            &format!("Enter your credit score (FICO {FICO_MIN}-{FICO_MAX}): "),
            None,
            FICO_MIN,
            FICO_MAX,
        )?,
        None => return Err("--credit-score is required without a terminal".into()),
    };

    let monthly_income = flag_or_prompt_decimal(
        args.monthly_income,
        tty,
        "--monthly-income",
        "Enter your monthly income (in $): ",
        None,
    )?;
    let monthly_housing = flag_or_prompt_decimal(
        args.monthly_housing,
        tty,
        "--monthly-housing",
        "Enter your monthly rent/mortgage (in $, default 0): ",
        Some(Decimal::ZERO),
    )?;
    let monthly_other_debt = flag_or_prompt_decimal(
        args.monthly_other_debt,
        tty,
        "--monthly-other-debt",
        "Enter other monthly debt payments (in $, default 0): ",
        Some(Decimal::ZERO),
    )?;
    let vehicle_price = flag_or_prompt_decimal(
        args.vehicle_price,
        tty,
        "--vehicle-price",
        "Enter the vehicle's price (in $): ",
        None,
    )?;
    let down_payment = flag_or_prompt_decimal(
        args.down_payment,
        tty,
        "--down-payment",
        "Enter your available down payment (in $, default 0): ",
        Some(Decimal::ZERO),
    )?;

    let recent_auto_risk = match args.recent_auto_risk {
        Some(v) => v,
        None if tty => read_yes_no(
            "Any open auto loans or a repossession within the past 24 months? (y/n, default n): ",
            false,
        )?,
        None => false,
    };

    let term_months = match args.term_months {
        Some(v) if v < 12 => return Err("--term-months must be at least 12".into()),
        Some(v) => v,
        None if tty => read_u32(
            "Enter loan term in months (default 60): ",
            Some(60),
            12,
            u32::MAX,
        )?,
        None => 60,
    };

    // Pre-fill the APR from the policy table for this score; the override
    // only reaches the decision through the computed payment.
    let apr_default_pct = policy::default_apr(credit_score) * dec!(100);
    let apr_percent = flag_or_prompt_decimal(
        args.apr_percent,
        tty,
        "--apr-percent",
        &format!(
            "Enter APR % (default {}): ",
            apr_default_pct.round_dp(1).normalize()
        ),
        Some(apr_default_pct),
    )?;

    let profile = ApplicantProfile {
        credit_score,
        monthly_income,
        monthly_housing,
        monthly_other_debt,
        recent_auto_risk,
    };
    let terms = DealTerms {
        vehicle_price,
        down_payment,
        apr: apr_percent / dec!(100),
        term_months,
    };
    profile.validate()?;
    terms.validate()?;

    let eval = decision::evaluate_deal(&profile, &terms);
    print_summary(&profile, &terms, apr_percent, &eval);
    Ok(())
}

fn print_summary(
    profile: &ApplicantProfile,
    terms: &DealTerms,
    apr_percent: Decimal,
    eval: &DealEvaluation,
) {
    let ratios = &eval.ratios;
    let decision = &eval.decision;

    println!();
    println!("{}", "Results Summary".bold());
    println!("---------------");
    println!("Vehicle price: ${}", format_money(terms.vehicle_price));
    println!(
        "Down payment: ${} ({} of price)",
        format_money(terms.down_payment),
        format_pct0(ratios.down_payment_pct)
    );
    println!("Loan amount: ${}", format_money(ratios.principal));
    println!(
        "Estimated monthly payment: ${} (at {}% APR over {} months)",
        format_money(ratios.monthly_payment),
        apr_percent.round_dp(2).normalize(),
        terms.term_months
    );
    println!(
        "Debt-to-income ratio (DTI): {} (share of income going to debts)",
        ratios.dti.round_dp(2)
    );
    println!(
        "Loan-to-value ratio (LTV): {} (share of the car financed by the loan)",
        ratios.ltv.round_dp(2)
    );
    if profile.recent_auto_risk {
        println!("Risk flag: open auto loan or recent repossession reported.");
    }

    let label_text = decision.label.to_string();
    let label_colored = match decision.label {
        DecisionLabel::Approved => label_text.green().bold(),
        DecisionLabel::ConditionalApproval | DecisionLabel::ConditionalNeedsHigherDown => {
            label_text.yellow().bold()
        }
        DecisionLabel::Denied => label_text.red().bold(),
    };
    let chance = (decision.probability * dec!(100)).round_dp(1);
    println!();
    println!("{label_colored} (estimated approval chance: {chance}%)");
    for reason in &decision.reasons {
        println!("  - {reason}");
    }

    // Shortfall against the escalated requirement, with the same epsilon
    // the ladder applies to the ratio comparison
    let required = decision.required_down_payment_pct;
    if ratios.down_payment_pct + decision::RATIO_EPSILON < required {
        let required_amount = (required * terms.vehicle_price).round_dp(0);
        let shortfall = (required_amount - terms.down_payment).max(Decimal::ZERO).round_dp(0);
        println!(
            "Minimum required down payment for this profile: {} = ${} (you're short by ${}).",
            format_pct0(required),
            format_money(required_amount),
            format_money(shortfall)
        );
    }

    print_tips(profile, ratios.dti, ratios.ltv, ratios.down_payment_pct, required);

    println!();
    println!("Disclaimer: simplified estimate, not financial advice.");
    println!();
}

fn print_tips(
    profile: &ApplicantProfile,
    dti: Decimal,
    ltv: Decimal,
    down_payment_pct: Decimal,
    required: Decimal,
) {
    let mut tips = Vec::new();
    if down_payment_pct < required {
        tips.push("Increase your down payment to meet the required minimum for approval.");
    }
    if dti > dec!(0.45) {
        tips.push("Lower monthly debts, extend the term, or consider a cheaper car to reduce DTI.");
    }
    if ltv > Decimal::ONE {
        tips.push("A larger down payment reduces LTV and improves approval odds.");
    }
    if profile.credit_score < 700 {
        tips.push("Improving your credit score can boost approval odds and lower your APR.");
    }
    if profile.recent_auto_risk && profile.credit_score < 700 {
        tips.push("With a recent repo or open auto loan and a score under 700, most lenders will decline.");
    }
    if !tips.is_empty() {
        println!();
        for tip in tips {
            println!("Tip: {tip}");
        }
    }
}
