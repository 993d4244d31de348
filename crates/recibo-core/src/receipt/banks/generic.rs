//! Layout-agnostic fallback strategy.
//!
//! Uses the same extractors as the bank strategies but settles ambiguity
//! instead of failing: a candidate equal to the expected value wins, else a
//! fixed tie-break picks one. Every settlement is returned as a
//! [`Resolution`] so callers can tell a guess from a proven value.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{ExtractionError, Field};
use crate::models::config::{AmountTieBreak, ExtractionConfig};
use crate::models::receipt::{ExpectedValues, Extraction, FieldDecision, ParseResult, Resolution};
use crate::receipt::layout::{excluding, Document};
use crate::receipt::rules::patterns::{ALIAS_LABEL, AMOUNT_LABEL, DATE_LABEL, DESTINATION_LABEL, ORIGIN_LABEL};
use crate::receipt::rules::{amounts_match, distinct, parse_account, ExtractionMatch};

/// Strategy name reported in [`Extraction::strategy`].
pub const NAME: &str = "generic";

/// A value chosen among candidates, with the rule that chose it.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled<T> {
    pub value: T,
    pub rule: Resolution,
    /// Number of distinct candidates.
    pub candidates: usize,
}

impl<T> Settled<T> {
    fn new(value: T, rule: Resolution, candidates: usize) -> Self {
        Self {
            value,
            rule,
            candidates,
        }
    }

    pub fn decision(&self, field: Field) -> FieldDecision {
        FieldDecision::new(field, self.rule, self.candidates)
    }
}

/// Fallback strategy for receipts no bank strategy claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericStrategy {
    pub amount_tie_break: AmountTieBreak,
}

impl GenericStrategy {
    pub fn new(amount_tie_break: AmountTieBreak) -> Self {
        Self { amount_tie_break }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.amount_tie_break)
    }

    /// The generic strategy claims every receipt.
    pub fn matches(&self, _text: &str) -> bool {
        true
    }

    /// Extract payment facts, settling ambiguity against `expected`.
    pub fn extract(&self, text: &str, expected: &ExpectedValues) -> Result<Extraction, ExtractionError> {
        let doc = Document::new(text);
        let mut decisions = Vec::with_capacity(4);

        let amounts = widen(vec![
            doc.window(&AMOUNT_LABEL, 1).amounts(),
            doc.all().currency_amounts(),
            doc.all().amounts(),
        ]);
        let amount = settle_amount(&amounts, expected.amount, self.amount_tie_break)?
            .ok_or(ExtractionError::MissingField(Field::Amount))?;
        decisions.push(amount.decision(Field::Amount));

        let dates = widen(vec![doc.window(&DATE_LABEL, 1).dates(), doc.all().dates()]);
        let date = settle_date(&dates, expected.date).ok_or(ExtractionError::MissingField(Field::Date))?;
        decisions.push(date.decision(Field::Date));

        // Sender block, cut short where a destination label starts.
        let origin_region = doc
            .window(&ORIGIN_LABEL, 2)
            .without(&doc.window(&DESTINATION_LABEL, 2));
        let origin = distinct(&origin_region.accounts());
        let accounts = excluding(doc.all().accounts(), &origin);
        let labels = label_lines(&doc);
        let account = settle_account(&accounts, expected.destination_account.as_deref(), &labels);
        if let Some(settled) = &account {
            decisions.push(settled.decision(Field::Destination));
        }

        let aliases = doc.labeled_values(&ALIAS_LABEL).aliases();
        let alias = settle_alias(&aliases, expected.destination_alias.as_deref());
        if let Some(settled) = &alias {
            decisions.push(settled.decision(Field::Destination));
        }

        let result = ParseResult {
            amount: amount.value,
            date: date.value,
            destination_account: account.map(|s| s.value),
            destination_alias: alias.map(|s| s.value),
        };
        debug!("{} extracted amount {} date {}", NAME, result.amount, result.iso_date());

        Ok(Extraction::new(NAME, result, decisions))
    }
}

/// The first non-empty search stage.
fn widen<T>(stages: Vec<Vec<ExtractionMatch<T>>>) -> Vec<ExtractionMatch<T>> {
    stages.into_iter().find(|s| !s.is_empty()).unwrap_or_default()
}

fn label_lines(doc: &Document<'_>) -> Vec<usize> {
    doc.lines()
        .iter()
        .enumerate()
        .filter(|(_, line)| DESTINATION_LABEL.is_match(line))
        .map(|(index, _)| index)
        .collect()
}

fn log_settled<T: std::fmt::Display>(field: Field, settled: &Settled<T>) {
    if settled.rule != Resolution::Unique {
        info!(
            "{} {} settled by {:?} among {} candidates: {}",
            NAME, field, settled.rule, settled.candidates, settled.value
        );
    }
}

/// Settle the transferred amount.
///
/// A candidate equal to `expected` at cent precision wins. Otherwise the
/// tie-break policy decides, and [`AmountTieBreak::Reject`] reports the
/// ambiguity instead.
pub fn settle_amount(
    matches: &[ExtractionMatch<Decimal>],
    expected: Decimal,
    policy: AmountTieBreak,
) -> Result<Option<Settled<Decimal>>, ExtractionError> {
    let candidates = distinct(matches);
    let count = candidates.len();

    let settled = match count {
        0 => return Ok(None),
        1 => Settled::new(candidates[0], Resolution::Unique, 1),
        _ => {
            if let Some(value) = candidates.iter().find(|c| amounts_match(**c, expected)) {
                Settled::new(*value, Resolution::MatchedExpected, count)
            } else {
                match policy {
                    AmountTieBreak::Largest => {
                        let largest = candidates.iter().copied().max().unwrap_or_default();
                        Settled::new(largest, Resolution::Largest, count)
                    }
                    AmountTieBreak::FirstInDocument => {
                        Settled::new(candidates[0], Resolution::FirstInDocument, count)
                    }
                    AmountTieBreak::Reject => {
                        info!("{} amount left ambiguous by policy", NAME);
                        return Err(ExtractionError::AmbiguousField {
                            field: Field::Amount,
                            candidates: candidates.iter().map(|c| c.to_string()).collect(),
                        });
                    }
                }
            }
        }
    };

    log_settled(Field::Amount, &settled);
    Ok(Some(settled))
}

/// Settle the transfer date: the expected date if present, else the first
/// date in document order.
pub fn settle_date(matches: &[ExtractionMatch<NaiveDate>], expected: NaiveDate) -> Option<Settled<NaiveDate>> {
    let candidates = distinct(matches);
    let count = candidates.len();

    let settled = match count {
        0 => return None,
        1 => Settled::new(candidates[0], Resolution::Unique, 1),
        _ if candidates.contains(&expected) => Settled::new(expected, Resolution::MatchedExpected, count),
        _ => Settled::new(candidates[0], Resolution::FirstInDocument, count),
    };

    log_settled(Field::Date, &settled);
    Some(settled)
}

/// Settle the destination account.
///
/// The expected account wins when present. Otherwise the candidate closest
/// below a destination label wins if no other candidate is as close, and
/// failing that the last candidate in the document.
pub fn settle_account(
    matches: &[ExtractionMatch<String>],
    expected: Option<&str>,
    label_lines: &[usize],
) -> Option<Settled<String>> {
    let candidates = distinct(matches);
    let count = candidates.len();

    let settled = match count {
        0 => return None,
        1 => Settled::new(candidates[0].clone(), Resolution::Unique, 1),
        _ => {
            let expected = expected.and_then(parse_account);
            if let Some(value) = expected.filter(|e| candidates.contains(e)) {
                Settled::new(value, Resolution::MatchedExpected, count)
            } else if let Some(value) = nearest_to_label(matches, label_lines) {
                Settled::new(value, Resolution::NearestToLabel, count)
            } else {
                let last = matches.last().map(|m| m.value.clone()).unwrap_or_default();
                Settled::new(last, Resolution::LastInDocument, count)
            }
        }
    };

    log_settled(Field::Destination, &settled);
    Some(settled)
}

/// Settle the destination alias: the expected alias (case-insensitive) if
/// present, else the last alias in the document.
pub fn settle_alias(matches: &[ExtractionMatch<String>], expected: Option<&str>) -> Option<Settled<String>> {
    let candidates = distinct(matches);
    let count = candidates.len();

    let settled = match count {
        0 => return None,
        1 => Settled::new(candidates[0].clone(), Resolution::Unique, 1),
        _ => {
            let found = expected.and_then(|e| candidates.iter().find(|c| c.eq_ignore_ascii_case(e.trim())));
            match found {
                Some(value) => Settled::new(value.clone(), Resolution::MatchedExpected, count),
                None => {
                    let last = matches.last().map(|m| m.value.clone()).unwrap_or_default();
                    Settled::new(last, Resolution::LastInDocument, count)
                }
            }
        }
    };

    log_settled(Field::Destination, &settled);
    Some(settled)
}

/// The single value found at the smallest line distance below a label.
fn nearest_to_label(matches: &[ExtractionMatch<String>], label_lines: &[usize]) -> Option<String> {
    let distances: Vec<(usize, &String)> = matches
        .iter()
        .filter_map(|m| {
            label_lines
                .iter()
                .filter(|&&label| label <= m.line)
                .map(|&label| m.line - label)
                .min()
                .map(|distance| (distance, &m.value))
        })
        .collect();

    let best = distances.iter().map(|(d, _)| *d).min()?;
    let mut closest: Vec<&String> = distances
        .iter()
        .filter(|(d, _)| *d == best)
        .map(|(_, v)| *v)
        .collect();
    closest.sort();
    closest.dedup();

    match closest.as_slice() {
        [only] => Some((*only).clone()),
        _ => None,
    }
}
