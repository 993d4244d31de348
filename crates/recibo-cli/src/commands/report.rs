//! Output formatting shared by the validate and batch commands.

use console::style;
use serde::Serialize;

use recibo_core::receipt::rules::{format_account, format_amount};
use recibo_core::{Extraction, ExtractionError, ReciboConfig, Validation};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// The explicit `--format`, else the configured default.
    pub fn resolve(explicit: Option<OutputFormat>, config: &ReciboConfig) -> anyhow::Result<Self> {
        if let Some(format) = explicit {
            return Ok(format);
        }
        <Self as clap::ValueEnum>::from_str(&config.output.format, true)
            .map_err(|_| anyhow::anyhow!("Unknown output format in config: {}", config.output.format))
    }
}

/// Outcome of one validation attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Validated { extraction: Extraction },
    Rejected { error: ExtractionError },
    Failed { error: String },
}

impl Outcome {
    pub fn from_result(result: Result<Validation, ExtractionError>) -> Self {
        match result {
            Ok(validation) => Outcome::Validated {
                extraction: validation.extraction,
            },
            Err(error) => Outcome::Rejected { error },
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Validated { .. } => "validated",
            Outcome::Rejected { .. } => "rejected",
            Outcome::Failed { .. } => "error",
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self, Outcome::Validated { .. })
    }
}

/// Flat record of an outcome, one CSV row.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub file: String,
    pub status: &'static str,
    pub strategy: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
    pub destination_account: Option<String>,
    pub destination_alias: Option<String>,
    pub guessed: Option<bool>,
    pub field: Option<String>,
    pub error: Option<String>,
    pub processing_time_ms: u64,
}

impl ReportRow {
    pub fn new(file: impl Into<String>, outcome: &Outcome, processing_time_ms: u64) -> Self {
        let mut row = ReportRow {
            file: file.into(),
            status: outcome.status(),
            strategy: None,
            amount: None,
            date: None,
            destination_account: None,
            destination_alias: None,
            guessed: None,
            field: None,
            error: None,
            processing_time_ms,
        };

        match outcome {
            Outcome::Validated { extraction } => {
                row.strategy = Some(extraction.strategy.clone());
                row.amount = Some(format!("{:.2}", extraction.result.amount));
                row.date = Some(extraction.result.iso_date());
                row.destination_account = extraction.result.destination_account.clone();
                row.destination_alias = extraction.result.destination_alias.clone();
                row.guessed = Some(extraction.is_guessed());
            }
            Outcome::Rejected { error } => {
                row.field = error.field().map(|f| f.to_string());
                row.error = Some(error.to_string());
            }
            Outcome::Failed { error } => {
                row.error = Some(error.clone());
            }
        }

        row
    }
}

/// User-facing explanation of a rejection.
pub fn describe(error: &ExtractionError) -> String {
    match error {
        ExtractionError::UntrustworthyOcr => "could not read receipt, a clearer image is needed".to_string(),
        ExtractionError::MissingField(field) => format!("the receipt does not show the {}", field),
        ExtractionError::AmbiguousField { field, candidates } => format!(
            "the receipt shows {} different values for the {}",
            candidates.len(),
            field
        ),
        ExtractionError::MismatchedValidation {
            field,
            expected,
            found,
        } => format!("{} does not match (expected {}, found {})", field, expected, found),
    }
}

pub fn to_csv(rows: &[ReportRow]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(outcome: &Outcome) -> String {
    let mut output = String::new();

    match outcome {
        Outcome::Validated { extraction } => {
            let result = &extraction.result;

            output.push_str(&format!(
                "{} Receipt validated ({})\n",
                style("✓").green(),
                extraction.strategy
            ));
            output.push_str(&format!("  Amount:  $ {}\n", format_amount(result.amount)));
            output.push_str(&format!("  Date:    {}\n", result.iso_date()));
            if let Some(account) = &result.destination_account {
                output.push_str(&format!("  Account: {}\n", format_account(account)));
            }
            if let Some(alias) = &result.destination_alias {
                output.push_str(&format!("  Alias:   {}\n", alias));
            }

            let guesses: Vec<String> = extraction
                .decisions
                .iter()
                .filter(|d| d.rule.is_tie_break())
                .map(|d| format!("{} by {:?} of {}", d.field, d.rule, d.candidates))
                .collect();
            if !guesses.is_empty() {
                output.push_str(&format!(
                    "{} Tie-breaks used: {}\n",
                    style("!").yellow(),
                    guesses.join("; ")
                ));
            }
        }
        Outcome::Rejected { error } => {
            output.push_str(&format!("{} Receipt rejected: {}\n", style("✗").red(), describe(error)));
        }
        Outcome::Failed { error } => {
            output.push_str(&format!("{} {}\n", style("✗").red(), error));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use recibo_core::Field;

    #[test]
    fn test_rejected_row() {
        let outcome = Outcome::from_result(Err(ExtractionError::MissingField(Field::Date)));
        let row = ReportRow::new("a.json", &outcome, 3);
        assert_eq!(row.status, "rejected");
        assert_eq!(row.field.as_deref(), Some("date"));
        assert_eq!(row.error.as_deref(), Some("missing required field: date"));
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let outcome = Outcome::Failed {
            error: "bad json".to_string(),
        };
        let csv = to_csv(&[ReportRow::new("a.json", &outcome, 0)]).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("file,status,strategy,amount"));
        assert!(lines.next().unwrap().starts_with("a.json,error,"));
    }

    #[test]
    fn test_resolve_format_from_config() {
        let mut config = ReciboConfig::default();
        assert_eq!(OutputFormat::resolve(None, &config).unwrap(), OutputFormat::Json);
        config.output.format = "TEXT".to_string();
        assert_eq!(OutputFormat::resolve(None, &config).unwrap(), OutputFormat::Text);
        assert_eq!(
            OutputFormat::resolve(Some(OutputFormat::Csv), &config).unwrap(),
            OutputFormat::Csv
        );
        config.output.format = "xml".to_string();
        assert!(OutputFormat::resolve(None, &config).is_err());
    }
}
