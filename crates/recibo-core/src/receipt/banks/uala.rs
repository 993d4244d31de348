//! Ualá transfer receipts.
//!
//! Ualá prints the clock time in front of the date on the same line, and OCR
//! often glues the two together (`14:3304/07/2025`). The leading time is cut
//! before the date is read.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ExtractionError, Field};
use crate::models::receipt::ParseResult;
use crate::receipt::layout::Document;
use crate::receipt::rules::resolve_stages;

use super::{finish, HEADER_LINES};

lazy_static! {
    static ref BRAND: Regex = Regex::new(r"\buala\b").unwrap();

    static ref TITLE: Regex = Regex::new(r"(?i)^transferencia enviada").unwrap();
    static ref AMOUNT_LABEL: Regex = Regex::new(r"(?i)^monto").unwrap();
    static ref DATE_LABEL: Regex = Regex::new(r"(?i)^fecha").unwrap();
    static ref RECIPIENT: Regex = Regex::new(r"(?i)^destinatario").unwrap();
    static ref RECIPIENT_END: Regex = Regex::new(r"(?i)^(banco|n[uú]mero de operaci[oó]n)").unwrap();
    static ref ALIAS: Regex = Regex::new(r"(?i)^alias").unwrap();

    static ref LEADING_TIME: Regex = Regex::new(
        r"(?i)^\s*\d{1,2}:\d{2}(?::\d{2})?\s*(?:hs|h)?\s*[-|·,]?\s*"
    ).unwrap();
}

pub fn matches(doc: &Document<'_>) -> bool {
    doc.header_matches(&BRAND, HEADER_LINES)
}

fn strip_leading_time(line: &str) -> String {
    LEADING_TIME.replace(line, "").into_owned()
}

pub fn extract(doc: &Document<'_>) -> Result<ParseResult, ExtractionError> {
    let amount = resolve_stages(
        Field::Amount,
        &[
            doc.window(&AMOUNT_LABEL, 1).amounts(),
            doc.section(&TITLE, Some(&DATE_LABEL)).amounts(),
            doc.all().currency_amounts(),
        ],
    )?;

    let date = resolve_stages(
        Field::Date,
        &[
            doc.window(&DATE_LABEL, 1).map_text(strip_leading_time).dates(),
            doc.all().map_text(strip_leading_time).dates(),
        ],
    )?;

    // no sender block on Ualá receipts
    let account = resolve_stages(
        Field::Destination,
        &[
            doc.window(&RECIPIENT, 2).accounts(),
            doc.section(&RECIPIENT, Some(&RECIPIENT_END)).accounts(),
            doc.all().accounts(),
        ],
    )?;
    let alias = resolve_stages(Field::Destination, &[doc.labeled_values(&ALIAS).aliases()])?;

    finish(amount, date, account, alias)
}
