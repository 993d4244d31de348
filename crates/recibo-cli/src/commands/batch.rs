//! Batch command - validate many receipt jobs in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use recibo_core::{ExpectedValues, OcrMetadata, ReceiptValidator};

use super::load_config;
use super::report::{to_csv, Outcome, OutputFormat, ReportRow};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of job files (JSON: {"ocr": ..., "expected": ...})
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (json or csv)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue when a job file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// One validation job: the OCR output and what it must prove.
#[derive(Debug, Deserialize)]
pub struct Job {
    pub ocr: OcrMetadata,
    pub expected: ExpectedValues,
}

/// Result of processing a single job file.
struct JobResult {
    path: PathBuf,
    outcome: Outcome,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let format = match OutputFormat::resolve(args.format, &config)? {
        OutputFormat::Text => anyhow::bail!("Batch output supports json or csv"),
        format => format,
    };

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching job files found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} jobs to validate", style("ℹ").blue(), files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} jobs")?
            .progress_chars("=>-"),
    );

    let validator = Arc::new(ReceiptValidator::from_config(&config));
    let workers = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let validator = Arc::clone(&validator);
        let permit = Arc::clone(&workers).acquire_owned().await?;
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let job_start = Instant::now();
            let outcome = process_job(&path, &validator);
            JobResult {
                path,
                outcome,
                processing_time_ms: job_start.elapsed().as_millis() as u64,
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await?;

        if let Outcome::Failed { error: message } = &result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                pb.abandon();
                anyhow::bail!("Processing failed: {}", message);
            }
        }

        pb.inc(1);
        results.push(result);
    }

    pb.finish_and_clear();

    let rows: Vec<ReportRow> = results
        .iter()
        .map(|r| ReportRow::new(r.path.display().to_string(), &r.outcome, r.processing_time_ms))
        .collect();

    let output = match format {
        OutputFormat::Csv => to_csv(&rows)?,
        _ => serde_json::to_string_pretty(&rows)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        debug!("Wrote report to {}", output_path.display());
    } else {
        println!("{}", output.trim_end());
    }

    let validated = results.iter().filter(|r| r.outcome.is_validated()).count();
    let failed = results
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Failed { .. }))
        .count();
    let rejected = results.len() - validated - failed;

    eprintln!(
        "{} Processed {} jobs in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} validated, {} rejected, {} failed",
        style(validated).green(),
        style(rejected).yellow(),
        style(failed).red()
    );

    Ok(())
}

fn process_job(path: &Path, validator: &ReceiptValidator) -> Outcome {
    match load_job(path) {
        Ok(job) => Outcome::from_result(validator.validate(&job.ocr, &job.expected)),
        Err(e) => Outcome::Failed { error: e.to_string() },
    }
}

fn load_job(path: &Path) -> anyhow::Result<Job> {
    let content = fs::read_to_string(path)?;
    let job: Job = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid job file {}: {}", path.display(), e))?;
    Ok(job)
}
