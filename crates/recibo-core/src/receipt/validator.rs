//! Comparison of extracted payment facts against expected values.

use tracing::{debug, warn};

use crate::error::{ExtractionError, Field};
use crate::models::receipt::{ExpectedValues, ParseResult};

use super::rules::amounts_match;

/// Check an extraction against the expected values.
///
/// Fields are checked in order amount, date, destination and the first
/// mismatch is reported. Amounts compare at cent precision and dates as ISO
/// strings. The destination passes when any supplied expectation matches:
/// the account by its digits, the alias case-insensitively. With neither
/// supplied the destination is not checked.
pub fn validate(result: &ParseResult, expected: &ExpectedValues) -> Result<(), ExtractionError> {
    if !amounts_match(result.amount, expected.amount) {
        return Err(mismatch(
            Field::Amount,
            format!("{:.2}", expected.amount),
            format!("{:.2}", result.amount),
        ));
    }

    let expected_date = expected.date.format("%Y-%m-%d").to_string();
    if result.iso_date() != expected_date {
        return Err(mismatch(Field::Date, expected_date, result.iso_date()));
    }

    let account = expected.destination_account.as_deref();
    let alias = expected.destination_alias.as_deref();
    if account.is_none() && alias.is_none() {
        debug!("No expected destination, skipping destination check");
        return Ok(());
    }

    let account_ok = account.is_some_and(|a| {
        result
            .destination_account
            .as_deref()
            .is_some_and(|found| digits(a) == found)
    });
    let alias_ok = alias.is_some_and(|a| {
        result
            .destination_alias
            .as_deref()
            .is_some_and(|found| found.eq_ignore_ascii_case(a.trim()))
    });

    if account_ok || alias_ok {
        Ok(())
    } else {
        Err(mismatch(
            Field::Destination,
            join_destination(account.map(digits).as_deref(), alias.map(str::trim)),
            join_destination(
                result.destination_account.as_deref(),
                result.destination_alias.as_deref(),
            ),
        ))
    }
}

fn mismatch(field: Field, expected: String, found: String) -> ExtractionError {
    warn!("{} mismatch: expected {}, found {}", field, expected, found);
    ExtractionError::MismatchedValidation {
        field,
        expected,
        found,
    }
}

fn digits(account: &str) -> String {
    account.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn join_destination(account: Option<&str>, alias: Option<&str>) -> String {
    match (account, alias) {
        (Some(account), Some(alias)) => format!("{} or {}", account, alias),
        (Some(value), None) | (None, Some(value)) => value.to_string(),
        (None, None) => "none".to_string(),
    }
}
