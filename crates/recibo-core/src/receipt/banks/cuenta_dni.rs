//! Cuenta DNI (Banco Provincia) transfer receipts.
//!
//! Labels and values share a line; the date is ISO with a trailing time.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ExtractionError, Field};
use crate::models::receipt::ParseResult;
use crate::receipt::layout::{excluding, Document};
use crate::receipt::rules::{distinct, resolve_stages};

use super::{finish, HEADER_LINES};

lazy_static! {
    static ref BRAND: Regex = Regex::new(r"\bcuenta dni\b|\bbanco provincia\b").unwrap();

    static ref TITLE: Regex = Regex::new(r"(?i)^transferencia exitosa").unwrap();
    static ref AMOUNT_LABEL: Regex = Regex::new(r"(?i)^importe").unwrap();
    static ref DATE_LABEL: Regex = Regex::new(r"(?i)^fecha").unwrap();
    static ref ORIGIN: Regex = Regex::new(r"(?i)^cbu origen").unwrap();
    static ref RECIPIENT: Regex = Regex::new(r"(?i)^cbu destino").unwrap();
    static ref RECIPIENT_END: Regex = Regex::new(r"(?i)^c[oó]digo").unwrap();
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
            doc.window(&AMOUNT_LABEL, 0).amounts(),
            summary.currency_amounts(),
            doc.all().currency_amounts(),
        ],
    )?;

    let date = resolve_stages(
        Field::Date,
        &[
            doc.window(&DATE_LABEL, 0).dates(),
            summary.dates(),
            doc.all().dates(),
        ],
    )?;

    let origin = distinct(&doc.window(&ORIGIN, 0).accounts());
    let account = resolve_stages(
        Field::Destination,
        &[
            excluding(doc.window(&RECIPIENT, 0).accounts(), &origin),
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
    use crate::receipt::banks::fixtures::CUENTA_DNI;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_iso_date_with_time() {
        let result = extract(&Document::new(CUENTA_DNI)).unwrap();
        assert_eq!(result.iso_date(), "2025-07-04");
        assert_eq!(result.destination_alias, None);
    }

    #[test]
    fn test_amount_on_a_later_line() {
        let text = CUENTA_DNI.replace("Importe: $1.234,56", "Importe:\n$1.234,56");
        let result = extract(&Document::new(&text)).unwrap();
        assert_eq!(result.amount.to_string(), "1234.56");
    }
}
