//! BBVA transfer receipts.
//!
//! BBVA splits the receipt into "Desde" and "Hacia" blocks; the destination
//! CBU is printed on a labeled line inside "Hacia".

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ExtractionError, Field};
use crate::models::receipt::ParseResult;
use crate::receipt::layout::{excluding, Document};
use crate::receipt::rules::{distinct, resolve_stages};

use super::{finish, HEADER_LINES};

lazy_static! {
    static ref BRAND: Regex = Regex::new(r"\bbbva\b").unwrap();

    static ref TITLE: Regex = Regex::new(r"(?i)^comprobante").unwrap();
    static ref AMOUNT_LABEL: Regex = Regex::new(r"(?i)^importe transferido").unwrap();
    static ref DATE_LABEL: Regex = Regex::new(r"(?i)^fecha de operaci[oó]n").unwrap();
    static ref SENDER: Regex = Regex::new(r"(?i)^desde$").unwrap();
    static ref RECIPIENT: Regex = Regex::new(r"(?i)^hacia$").unwrap();
    static ref RECIPIENT_END: Regex = Regex::new(r"(?i)^(referencia|nro\.? de operaci[oó]n)").unwrap();
    static ref ACCOUNT_LABEL: Regex = Regex::new(r"(?i)^cbu destino").unwrap();
    static ref ALIAS: Regex = Regex::new(r"(?i)^alias destino").unwrap();
}

pub fn matches(doc: &Document<'_>) -> bool {
    doc.header_matches(&BRAND, HEADER_LINES)
}

pub fn extract(doc: &Document<'_>) -> Result<ParseResult, ExtractionError> {
    let summary = doc.section(&TITLE, Some(&SENDER));

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::banks::fixtures::BBVA;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract() {
        let result = extract(&Document::new(BBVA)).unwrap();
        assert_eq!(result.iso_date(), "2025-07-04");
        assert_eq!(
            result.destination_account.as_deref(),
            Some("0000003100072077739741")
        );
        assert_eq!(result.destination_alias.as_deref(), Some("tienda.pagos"));
    }

    #[test]
    fn test_unlabeled_destination_found_in_hacia_block() {
        let text = BBVA.replace("CBU destino: ", "");
        let result = extract(&Document::new(&text)).unwrap();
        assert_eq!(
            result.destination_account.as_deref(),
            Some("0000003100072077739741")
        );
    }
}
