//! Error types for the recibo-core library.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the recibo library.
#[derive(Error, Debug)]
pub enum ReciboError {
    /// Receipt extraction or validation outcome.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Receipt field a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Amount,
    Date,
    Destination,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Amount => "amount",
            Field::Date => "date",
            Field::Destination => "destination",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged outcome of a failed extraction or validation attempt.
///
/// Every variant is fatal to the current attempt. Callers map them to
/// user-facing messages ("could not read receipt", "amount does not match").
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ExtractionError {
    /// More than one distinct candidate where a single value is required.
    #[error("ambiguous {field}: candidates {}", .candidates.join(", "))]
    AmbiguousField { field: Field, candidates: Vec<String> },

    /// No candidate found anywhere for a required field.
    #[error("missing required field: {0}")]
    MissingField(Field),

    /// OCR output failed the trust gate; nothing was extracted.
    #[error("OCR output is not trustworthy")]
    UntrustworthyOcr,

    /// Extraction succeeded but disagrees with the expected value.
    #[error("{field} mismatch: expected {expected}, found {found}")]
    MismatchedValidation {
        field: Field,
        expected: String,
        found: String,
    },
}

impl ExtractionError {
    /// Field the error refers to, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            ExtractionError::AmbiguousField { field, .. } => Some(*field),
            ExtractionError::MissingField(field) => Some(*field),
            ExtractionError::MismatchedValidation { field, .. } => Some(*field),
            ExtractionError::UntrustworthyOcr => None,
        }
    }
}

/// Result type for the recibo library.
pub type Result<T> = std::result::Result<T, ReciboError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExtractionError::AmbiguousField {
            field: Field::Destination,
            candidates: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "ambiguous destination: candidates a, b");

        let err = ExtractionError::MismatchedValidation {
            field: Field::Amount,
            expected: "999.00".to_string(),
            found: "1234.56".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "amount mismatch: expected 999.00, found 1234.56"
        );
    }

    #[test]
    fn test_error_field() {
        assert_eq!(
            ExtractionError::MissingField(Field::Date).field(),
            Some(Field::Date)
        );
        assert_eq!(ExtractionError::UntrustworthyOcr.field(), None);
    }

    #[test]
    fn test_serialized_tag() {
        let json = serde_json::to_string(&ExtractionError::MissingField(Field::Amount)).unwrap();
        assert!(json.contains("\"kind\":\"missing_field\""));
    }
}
