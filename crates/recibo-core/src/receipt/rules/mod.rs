//! Rule-based field extractors for transfer receipts.

pub mod amounts;
pub mod dates;
pub mod destination;
pub mod patterns;

pub use amounts::{amounts_match, format_amount, parse_amount, AmountExtractor};
pub use dates::{parse_date, parse_year, DateExtractor};
pub use destination::{format_account, parse_account, parse_alias, AccountExtractor, AliasExtractor};

use std::fmt;

use tracing::{debug, warn};

use crate::error::{ExtractionError, Field};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in the receipt, with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Line index in the normalized receipt.
    pub line: usize,
    /// Byte span within the line.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            line: 0,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn on_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// Distinct values in first-seen order.
pub fn distinct<T: PartialEq + Clone>(matches: &[ExtractionMatch<T>]) -> Vec<T> {
    let mut values: Vec<T> = Vec::new();
    for m in matches {
        if !values.contains(&m.value) {
            values.push(m.value.clone());
        }
    }
    values
}

/// Apply the ambiguity rule to one search stage.
///
/// Returns `None` when nothing was found, the value when every match agrees
/// (repeated values collapse), and `AmbiguousField` otherwise.
pub fn resolve_unique<T>(field: Field, matches: &[ExtractionMatch<T>]) -> Result<Option<T>, ExtractionError>
where
    T: PartialEq + Clone + fmt::Display,
{
    let values = distinct(matches);
    match values.len() {
        0 => Ok(None),
        1 => Ok(values.into_iter().next()),
        _ => {
            let candidates: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            warn!("ambiguous {}: {:?}", field, candidates);
            Err(ExtractionError::AmbiguousField { field, candidates })
        }
    }
}

/// Resolve escalating search stages: the first non-empty stage decides.
pub fn resolve_stages<T>(field: Field, stages: &[Vec<ExtractionMatch<T>>]) -> Result<Option<T>, ExtractionError>
where
    T: PartialEq + Clone + fmt::Display,
{
    for (stage, matches) in stages.iter().enumerate() {
        if let Some(value) = resolve_unique(field, matches)? {
            debug!("{} resolved at stage {}", field, stage + 1);
            return Ok(Some(value));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn m(value: &str, line: usize) -> ExtractionMatch<String> {
        ExtractionMatch::new(value.to_string(), value).on_line(line)
    }

    #[test]
    fn test_duplicates_collapse() {
        let matches = vec![m("a", 0), m("a", 5)];
        assert_eq!(resolve_unique(Field::Amount, &matches), Ok(Some("a".to_string())));
    }

    #[test]
    fn test_distinct_values_are_ambiguous() {
        let matches = vec![m("a", 0), m("b", 1), m("a", 2)];
        assert_eq!(
            resolve_unique(Field::Destination, &matches),
            Err(ExtractionError::AmbiguousField {
                field: Field::Destination,
                candidates: vec!["a".to_string(), "b".to_string()],
            })
        );
    }

    #[test]
    fn test_stages_escalate_only_when_empty() {
        let stages = vec![vec![], vec![m("x", 3)], vec![m("y", 0), m("z", 1)]];
        assert_eq!(resolve_stages(Field::Date, &stages), Ok(Some("x".to_string())));

        let empty: Vec<Vec<ExtractionMatch<String>>> = vec![vec![], vec![]];
        assert_eq!(resolve_stages(Field::Date, &empty), Ok(None));

        let ambiguous = vec![vec![m("y", 0), m("z", 1)], vec![m("x", 3)]];
        assert!(resolve_stages(Field::Date, &ambiguous).is_err());
    }

    #[test]
    fn test_later_stage_can_be_ambiguous() {
        let stages = vec![vec![], vec![m("y", 0), m("z", 1)]];
        assert_eq!(
            resolve_stages(Field::Destination, &stages),
            Err(ExtractionError::AmbiguousField {
                field: Field::Destination,
                candidates: vec!["y".to_string(), "z".to_string()],
            })
        );
    }
}
