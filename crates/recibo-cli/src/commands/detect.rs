//! Detect command - show which strategy claims a receipt.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use recibo_core::{normalize, Bank, Registry};

use super::report::OutputFormat;
use super::{load_config, read_text};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// OCR text of the receipt
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct Detection {
    strategy: &'static str,
    display_name: &'static str,
    /// Every bank whose detector claims the text, in priority order.
    candidates: Vec<Bank>,
}

pub async fn run(args: DetectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let format = OutputFormat::resolve(args.format, &config)?;

    let text = normalize(&read_text(&args.input)?);
    let registry = Registry::from_config(&config.extraction);
    let strategy = registry.select(&text);

    let detection = Detection {
        strategy: strategy.name(),
        display_name: strategy.display_name(),
        candidates: registry.candidates(&text),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&detection)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["strategy", "display_name"])?;
            wtr.write_record([detection.strategy, detection.display_name])?;
            print!("{}", String::from_utf8(wtr.into_inner()?)?);
        }
        OutputFormat::Text => {
            println!("{} ({})", detection.strategy, detection.display_name);
            if detection.candidates.len() > 1 {
                let others: Vec<&str> = detection.candidates[1..].iter().map(|b| b.name()).collect();
                println!("also claimed by: {}", others.join(", "));
            }
        }
    }

    Ok(())
}
