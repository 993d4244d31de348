//! Brubank transfer receipts.
//!
//! The sender block ("Desde") comes after the recipient block ("Para").

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ExtractionError, Field};
use crate::models::receipt::ParseResult;
use crate::receipt::layout::{excluding, Document};
use crate::receipt::rules::{distinct, resolve_stages};

use super::{finish, HEADER_LINES};

lazy_static! {
    static ref BRAND: Regex = Regex::new(r"\bbrubank\b").unwrap();

    static ref TITLE: Regex = Regex::new(r"(?i)enviaste dinero").unwrap();
    static ref AMOUNT_LABEL: Regex = Regex::new(r"(?i)^monto enviado").unwrap();
    static ref DATE_LABEL: Regex = Regex::new(r"(?i)^fecha").unwrap();
    static ref RECIPIENT: Regex = Regex::new(r"(?i)^para$").unwrap();
    static ref SENDER: Regex = Regex::new(r"(?i)^desde$").unwrap();
    static ref SENDER_END: Regex = Regex::new(r"(?i)^c[oó]digo").unwrap();
    static ref ALIAS: Regex = Regex::new(r"(?i)^alias destino").unwrap();
}

pub fn matches(doc: &Document<'_>) -> bool {
    doc.header_matches(&BRAND, HEADER_LINES)
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
        &[doc.window(&DATE_LABEL, 1).dates(), doc.all().dates()],
    )?;

    let origin = distinct(&doc.section(&SENDER, Some(&SENDER_END)).accounts());
    let account = resolve_stages(
        Field::Destination,
        &[
            excluding(doc.window(&RECIPIENT, 2).accounts(), &origin),
            excluding(doc.section(&RECIPIENT, Some(&SENDER)).accounts(), &origin),
            excluding(doc.all().accounts(), &origin),
        ],
    )?;
    let alias = resolve_stages(Field::Destination, &[doc.labeled_values(&ALIAS).aliases()])?;

    finish(amount, date, account, alias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::banks::fixtures::BRUBANK;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_digit_year() {
        let result = extract(&Document::new(BRUBANK)).unwrap();
        assert_eq!(result.iso_date(), "2025-07-04");
    }

    #[test]
    fn test_trailing_sender_cvu_is_excluded() {
        let text = BRUBANK.replace("CVU 0000003100072077739741\n", "");
        let result = extract(&Document::new(&text)).unwrap();
        assert_eq!(result.destination_account, None);
        assert_eq!(result.destination_alias.as_deref(), Some("tienda.pagos"));
    }
}
