//! Validate command - check one receipt against the expected payment.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::{debug, info};

use recibo_core::receipt::rules::parse_amount;
use recibo_core::{ExpectedValues, OcrMetadata, ReceiptValidator};

use super::report::{format_text, to_csv, Outcome, OutputFormat, ReportRow};
use super::{load_config, read_text};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// OCR text of the receipt
    #[arg(required = true)]
    input: PathBuf,

    /// Average OCR word confidence (0.0 - 1.0)
    #[arg(long)]
    confidence: f64,

    /// Number of tokens the OCR engine flagged as suspicious
    #[arg(long, default_value = "0")]
    suspicious: usize,

    /// Expected amount, e.g. 1234.56 or 1.234,56
    #[arg(long, value_parser = parse_amount_arg)]
    amount: Decimal,

    /// Expected transfer date (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Expected destination CBU/CVU
    #[arg(long)]
    account: Option<String>,

    /// Expected destination alias
    #[arg(long)]
    alias: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Receipt notation first, then a plain decimal such as `1500000`.
fn parse_amount_arg(s: &str) -> Result<Decimal, String> {
    parse_amount(s)
        .or_else(|| Decimal::from_str(s.trim()).ok())
        .ok_or_else(|| format!("invalid amount: {}", s))
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let format = OutputFormat::resolve(args.format, &config)?;

    let text = read_text(&args.input)?;
    info!("Validating receipt: {}", args.input.display());

    let meta = OcrMetadata::new(text, args.confidence, args.suspicious);
    let mut expected = match args.date {
        Some(date) => ExpectedValues::new(args.amount, date),
        None => ExpectedValues::for_today(args.amount),
    };
    expected.destination_account = args.account;
    expected.destination_alias = args.alias;

    let validator = ReceiptValidator::from_config(&config);
    let outcome = Outcome::from_result(validator.validate(&meta, &expected));
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&outcome)?,
        OutputFormat::Csv => {
            let file = args.input.display().to_string();
            to_csv(&[ReportRow::new(file, &outcome, elapsed_ms)])?
        }
        OutputFormat::Text => format_text(&outcome),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    debug!("Total processing time: {}ms", elapsed_ms);

    match outcome {
        Outcome::Validated { .. } => Ok(()),
        Outcome::Rejected { error } => anyhow::bail!("Receipt rejected: {}", error),
        Outcome::Failed { error } => anyhow::bail!(error),
    }
}
