//! Santander transfer receipts.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ExtractionError, Field};
use crate::models::receipt::ParseResult;
use crate::receipt::layout::{excluding, Document};
use crate::receipt::rules::{distinct, resolve_stages};

use super::{finish, HEADER_LINES};

lazy_static! {
    static ref BRAND: Regex = Regex::new(r"\bsantander\b").unwrap();

    static ref TITLE: Regex = Regex::new(r"(?i)^transferencia realizada").unwrap();
    static ref AMOUNT_LABEL: Regex = Regex::new(r"(?i)^importe").unwrap();
    static ref DATE_LABEL: Regex = Regex::new(r"(?i)^fecha").unwrap();
    static ref ORIGIN: Regex = Regex::new(r"(?i)^cuenta origen").unwrap();
    static ref RECIPIENT: Regex = Regex::new(r"(?i)^cuenta destino").unwrap();
    static ref RECIPIENT_END: Regex = Regex::new(r"(?i)^(titular|concepto|n[uú]mero de operaci[oó]n)").unwrap();
    static ref ALIAS: Regex = Regex::new(r"(?i)^alias destino").unwrap();
}

pub fn matches(doc: &Document<'_>) -> bool {
    doc.header_matches(&BRAND, HEADER_LINES)
}

pub fn extract(doc: &Document<'_>) -> Result<ParseResult, ExtractionError> {
    let summary = doc.section(&TITLE, Some(&ORIGIN));

    let amount = resolve_stages(
        Field::Amount,
        &[
            doc.window(&AMOUNT_LABEL, 1).amounts(),
            summary.amounts(),
            doc.all().currency_amounts(),
        ],
    )?;

    let date = resolve_stages(
        Field::Date,
        &[
            doc.window(&DATE_LABEL, 1).dates(),
            summary.dates(),
            doc.all().dates(),
        ],
    )?;

    let origin = distinct(&doc.window(&ORIGIN, 1).accounts());
    let account = resolve_stages(
        Field::Destination,
        &[
            excluding(doc.window(&RECIPIENT, 2).accounts(), &origin),
            excluding(doc.section(&RECIPIENT, Some(&RECIPIENT_END)).accounts(), &origin),
            excluding(doc.all().accounts(), &origin),
        ],
    )?;
    let alias = resolve_stages(Field::Destination, &[doc.labeled_values(&ALIAS).aliases()])?;

    finish(amount, date, account, alias)
}
