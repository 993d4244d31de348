//! Receipt data models: OCR input, expected business values, and extraction output.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Field;

/// Text and quality signals produced by the external OCR collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrMetadata {
    /// Recognized text, one receipt line per text line.
    pub text: String,

    /// Average per-word recognition confidence (0.0 - 1.0).
    pub average_confidence: f64,

    /// Number of tokens the OCR engine flagged as suspicious.
    pub suspicious_token_count: usize,
}

impl OcrMetadata {
    pub fn new(text: impl Into<String>, average_confidence: f64, suspicious_token_count: usize) -> Self {
        Self {
            text: text.into(),
            average_confidence,
            suspicious_token_count,
        }
    }
}

/// Values the receipt must prove, supplied by the caller per validation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedValues {
    /// Amount due.
    pub amount: Decimal,

    /// Transfer date (business rule: today in the caller's timezone).
    pub date: NaiveDate,

    /// CBU/CVU on file for the payee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_account: Option<String>,

    /// Alias on file for the payee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_alias: Option<String>,
}

impl ExpectedValues {
    pub fn new(amount: Decimal, date: NaiveDate) -> Self {
        Self {
            amount,
            date,
            destination_account: None,
            destination_alias: None,
        }
    }

    /// Expected values dated today in the local timezone.
    pub fn for_today(amount: Decimal) -> Self {
        Self::new(amount, Local::now().date_naive())
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.destination_account = Some(account.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.destination_alias = Some(alias.into());
        self
    }
}

/// Payment facts extracted from a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Transferred amount.
    pub amount: Decimal,

    /// Transfer date (time of day discarded).
    pub date: NaiveDate,

    /// Destination CBU/CVU (22 digits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_account: Option<String>,

    /// Destination alias, lowercase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_alias: Option<String>,
}

impl ParseResult {
    /// Date in ISO form (YYYY-MM-DD).
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Whether any destination was found.
    pub fn has_destination(&self) -> bool {
        self.destination_account.is_some() || self.destination_alias.is_some()
    }
}

/// Rule that produced a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Exactly one distinct candidate was found.
    Unique,
    /// Several candidates; the one equal to the expected value was taken.
    MatchedExpected,
    /// Several amounts; the largest was taken.
    Largest,
    /// Several candidates; the first in document order was taken.
    FirstInDocument,
    /// Several destinations; the one closest to its label was taken.
    NearestToLabel,
    /// Several destinations; the last one in document order was taken.
    LastInDocument,
}

impl Resolution {
    /// Whether the value was picked by a tie-break rather than proven unique.
    pub fn is_tie_break(&self) -> bool {
        !matches!(self, Resolution::Unique | Resolution::MatchedExpected)
    }
}

/// How one field of a [`ParseResult`] was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecision {
    pub field: Field,
    pub rule: Resolution,
    /// Number of distinct candidates seen when the rule fired.
    pub candidates: usize,
}

impl FieldDecision {
    pub fn new(field: Field, rule: Resolution, candidates: usize) -> Self {
        Self {
            field,
            rule,
            candidates,
        }
    }

    pub fn unique(field: Field) -> Self {
        Self::new(field, Resolution::Unique, 1)
    }
}

/// Output of a strategy: the extracted facts plus the trail of how they were chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Strategy that produced the result.
    pub strategy: String,

    /// Extracted facts.
    pub result: ParseResult,

    /// One decision per resolved field.
    pub decisions: Vec<FieldDecision>,
}

impl Extraction {
    pub fn new(strategy: impl Into<String>, result: ParseResult, decisions: Vec<FieldDecision>) -> Self {
        Self {
            strategy: strategy.into(),
            result,
            decisions,
        }
    }

    /// Whether any field was picked by a tie-break.
    pub fn is_guessed(&self) -> bool {
        self.decisions.iter().any(|d| d.rule.is_tie_break())
    }

    /// Decision recorded for a field.
    pub fn decision(&self, field: Field) -> Option<&FieldDecision> {
        self.decisions.iter().find(|d| d.field == field)
    }
}

/// A receipt that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub status: ValidationStatus,
    pub extraction: Extraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Validated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn result() -> ParseResult {
        ParseResult {
            amount: Decimal::from_str("1234.56").unwrap(),
            date: NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
            destination_account: None,
            destination_alias: Some("tienda.mp".to_string()),
        }
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(result().iso_date(), "2025-07-04");
        assert!(result().has_destination());
    }

    #[test]
    fn test_guessed_extraction() {
        let unique = Extraction::new(
            "galicia",
            result(),
            vec![FieldDecision::unique(Field::Amount), FieldDecision::unique(Field::Date)],
        );
        assert!(!unique.is_guessed());

        let guessed = Extraction::new(
            "generic",
            result(),
            vec![
                FieldDecision::new(Field::Amount, Resolution::Largest, 3),
                FieldDecision::unique(Field::Date),
            ],
        );
        assert!(guessed.is_guessed());
        assert_eq!(
            guessed.decision(Field::Amount).map(|d| d.rule),
            Some(Resolution::Largest)
        );
    }

    #[test]
    fn test_expected_values_json() {
        let json = r#"{"amount":"1234.56","date":"2025-07-04","destination_alias":"Tienda.MP"}"#;
        let expected: ExpectedValues = serde_json::from_str(json).unwrap();
        assert_eq!(expected.amount, Decimal::from_str("1234.56").unwrap());
        assert_eq!(expected.destination_account, None);
        assert_eq!(expected.destination_alias.as_deref(), Some("Tienda.MP"));
    }
}
