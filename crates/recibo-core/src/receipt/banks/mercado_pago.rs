//! Mercado Pago transfer receipts.
//!
//! The amount is printed twice, large in the header and again under
//! "Monto transferido"; both readings are collected in one stage so the
//! repeat collapses instead of counting as ambiguity. The sender ("De")
//! block precedes the recipient ("Para") block and lists the sender's own CVU.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ExtractionError, Field};
use crate::models::receipt::ParseResult;
use crate::receipt::layout::{excluding, Document};
use crate::receipt::rules::{distinct, resolve_stages};

use super::{finish, HEADER_LINES};

lazy_static! {
    static ref BRAND: Regex = Regex::new(r"\bmercado\s*pago\b").unwrap();
    static ref OPERATION_FOOTER: Regex = Regex::new(r"numero de operacion de mercado pago").unwrap();

    static ref AMOUNT_LABEL: Regex = Regex::new(r"(?i)^monto(?:\s+transferido)?").unwrap();
    static ref SENDER: Regex = Regex::new(r"(?i)^de$").unwrap();
    static ref RECIPIENT: Regex = Regex::new(r"(?i)^para$").unwrap();
    static ref RECIPIENT_END: Regex = Regex::new(r"(?i)^(monto|n[uú]mero de operaci[oó]n)").unwrap();
    static ref ALIAS: Regex = Regex::new(r"(?i)^alias").unwrap();
}

/// Lines after the header where the transfer date is printed.
const DATE_LINES: usize = 5;

pub fn matches(doc: &Document<'_>) -> bool {
    doc.header_matches(&BRAND, HEADER_LINES) || doc.mentions(&OPERATION_FOOTER)
}

pub fn extract(doc: &Document<'_>) -> Result<ParseResult, ExtractionError> {
    let mut both_readings = doc.header(HEADER_LINES).amounts();
    both_readings.extend(doc.window(&AMOUNT_LABEL, 1).amounts());

    let amount = resolve_stages(
        Field::Amount,
        &[both_readings, doc.all().currency_amounts()],
    )?;

    let date = resolve_stages(
        Field::Date,
        &[doc.header(DATE_LINES).dates(), doc.all().dates()],
    )?;

    let origin = distinct(&doc.section(&SENDER, Some(&RECIPIENT)).accounts());
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
