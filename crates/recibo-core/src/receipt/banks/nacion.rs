//! Banco de la Nación Argentina (BNA+) transfer receipts.
//!
//! Every field sits on a "Label: value" line. Dates use an abbreviated
//! upper-case month, e.g. `04/JUL/2025`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ExtractionError, Field};
use crate::models::receipt::ParseResult;
use crate::receipt::layout::{excluding, Document};
use crate::receipt::rules::{distinct, resolve_stages};

use super::{finish, HEADER_LINES};

lazy_static! {
    static ref BRAND: Regex = Regex::new(r"\bbna\b|banco de la nacion|banco nacion").unwrap();

    static ref AMOUNT_LABEL: Regex = Regex::new(r"(?i)^monto").unwrap();
    static ref DATE_LABEL: Regex = Regex::new(r"(?i)^fecha").unwrap();
    static ref ORIGIN: Regex = Regex::new(r"(?i)^cuenta de d[eé]bito").unwrap();
    static ref ACCOUNT_LABEL: Regex = Regex::new(r"(?i)^cbu/cvu").unwrap();
    static ref RECIPIENT: Regex = Regex::new(r"(?i)^destinatario").unwrap();
    static ref RECIPIENT_END: Regex = Regex::new(r"(?i)^(concepto|nro)").unwrap();
    static ref ALIAS: Regex = Regex::new(r"(?i)^alias").unwrap();
}

pub fn matches(doc: &Document<'_>) -> bool {
    doc.header_matches(&BRAND, HEADER_LINES)
}

pub fn extract(doc: &Document<'_>) -> Result<ParseResult, ExtractionError> {
    let amount = resolve_stages(
        Field::Amount,
        &[doc.window(&AMOUNT_LABEL, 1).amounts(), doc.all().currency_amounts()],
    )?;

    let date = resolve_stages(
        Field::Date,
        &[doc.window(&DATE_LABEL, 1).dates(), doc.all().dates()],
    )?;

    let origin = distinct(&doc.window(&ORIGIN, 1).accounts());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::banks::fixtures::NACION;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matches_bna_plus_header() {
        assert!(matches(&Document::new(NACION)));
        assert!(matches(&Document::new("Comprobante\nBanco Nación\nMonto: $ 5,00")));
    }

    #[test]
    fn test_abbreviated_month_and_upper_case_alias() {
        let result = extract(&Document::new(NACION)).unwrap();
        assert_eq!(result.iso_date(), "2025-07-04");
        assert_eq!(result.destination_alias.as_deref(), Some("tienda.pagos"));
    }
}
