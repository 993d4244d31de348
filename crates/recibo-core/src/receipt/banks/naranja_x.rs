//! Naranja X transfer receipts.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ExtractionError, Field};
use crate::models::receipt::ParseResult;
use crate::receipt::layout::{excluding, Document};
use crate::receipt::rules::{distinct, resolve_stages};

use super::{finish, HEADER_LINES};

lazy_static! {
    static ref BRAND: Regex = Regex::new(r"\bnaranja\s*x\b").unwrap();

    static ref TITLE: Regex = Regex::new(r"(?i)^comprobante").unwrap();
    static ref SENT: Regex = Regex::new(r"(?i)^enviaste").unwrap();
    static ref SENDER: Regex = Regex::new(r"(?i)^origen$").unwrap();
    static ref RECIPIENT: Regex = Regex::new(r"(?i)^destino$").unwrap();
    static ref RECIPIENT_END: Regex = Regex::new(r"(?i)^id de operaci[oó]n").unwrap();
    static ref ACCOUNT_LABEL: Regex = Regex::new(r"(?i)^cbu/cvu$").unwrap();
    static ref ALIAS: Regex = Regex::new(r"(?i)^alias$").unwrap();
}

pub fn matches(doc: &Document<'_>) -> bool {
    doc.header_matches(&BRAND, HEADER_LINES)
}

pub fn extract(doc: &Document<'_>) -> Result<ParseResult, ExtractionError> {
    let summary = doc.section(&TITLE, Some(&SENDER));

    // "Enviaste" heads both the amount and, one line further, the date.
    let amount = resolve_stages(
        Field::Amount,
        &[
            doc.window(&SENT, 1).amounts(),
            summary.amounts(),
            doc.all().currency_amounts(),
        ],
    )?;

    let date = resolve_stages(
        Field::Date,
        &[doc.window(&SENT, 2).dates(), summary.dates(), doc.all().dates()],
    )?;

    let origin = distinct(&doc.section(&SENDER, Some(&RECIPIENT)).accounts());
    let account = resolve_stages(
        Field::Destination,
        &[
            excluding(doc.window(&ACCOUNT_LABEL, 1).accounts(), &origin),
            excluding(doc.section(&RECIPIENT, Some(&RECIPIENT_END)).accounts(), &origin),
            excluding(doc.all().accounts(), &origin),
        ],
    )?;
    let alias = resolve_stages(Field::Destination, &[doc.labeled_values(&ALIAS).aliases()])?;

    finish(amount, date, account, alias)
}
