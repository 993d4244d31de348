//! End-to-end receipt validation scenarios.

use std::str::FromStr;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use recibo_core::receipt::rules::{parse_amount, parse_date};
use recibo_core::{
    is_trustable, normalize, select_strategy, Bank, ExpectedValues, ExtractionError, Field, GenericStrategy,
    OcrMetadata, ReceiptValidator, Resolution, Strategy, ValidationStatus,
};

const ACCOUNT: &str = "0000003100072077739741";

const UNBRANDED: &str = "Comprobante de pago
Importe
$ 1.234,56
Fecha y hora
04/07/2025 14:33hs
CBU/CVU destino
0000003100072077739741";

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn july_4() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
}

fn trusted(text: &str) -> OcrMetadata {
    OcrMetadata::new(text, 0.93, 1)
}

#[test]
fn validates_matching_receipt() {
    let expected = ExpectedValues::new(dec("1234.56"), july_4()).with_account(ACCOUNT);
    let validation = ReceiptValidator::new()
        .validate(&trusted(UNBRANDED), &expected)
        .unwrap();

    assert_eq!(validation.status, ValidationStatus::Validated);
    assert_eq!(validation.extraction.result.amount, dec("1234.56"));
    assert_eq!(validation.extraction.result.iso_date(), "2025-07-04");
    assert_eq!(
        validation.extraction.result.destination_account.as_deref(),
        Some(ACCOUNT)
    );
}

#[test]
fn reports_amount_mismatch() {
    let expected = ExpectedValues::new(dec("999.00"), july_4()).with_account(ACCOUNT);
    assert_eq!(
        ReceiptValidator::new().validate(&trusted(UNBRANDED), &expected),
        Err(ExtractionError::MismatchedValidation {
            field: Field::Amount,
            expected: "999.00".to_string(),
            found: "1234.56".to_string(),
        })
    );
}

#[test]
fn rejects_untrusted_ocr() {
    let expected = ExpectedValues::new(dec("1234.56"), july_4());
    let meta = OcrMetadata::new(UNBRANDED, 0.5, 0);
    assert_eq!(
        ReceiptValidator::new().validate(&meta, &expected),
        Err(ExtractionError::UntrustworthyOcr)
    );
}

#[test]
fn confidence_below_threshold_never_trusted() {
    for suspicious in [0, 1, 5, 100] {
        assert!(!is_trustable(&OcrMetadata::new("x", 0.69, suspicious)));
    }
    assert!(is_trustable(&OcrMetadata::new("x", 0.70, 5)));
    assert!(!is_trustable(&OcrMetadata::new("x", 0.70, 6)));
}

#[test]
fn bank_rejects_two_destinations_generic_settles_with_expected() {
    let text = "Santander
Transferencia realizada
Importe
$ 1.234,56
Fecha
04/07/2025
Cuenta destino
CBU 0000003100072077739741
CBU 0000003100099999999999";

    assert_eq!(select_strategy(text), Strategy::Bank(Bank::Santander));
    let expected = ExpectedValues::new(dec("1234.56"), july_4()).with_account("0000003100099999999999");

    assert!(matches!(
        Bank::Santander.extract(text),
        Err(ExtractionError::AmbiguousField { field: Field::Destination, .. })
    ));
    assert!(matches!(
        ReceiptValidator::new().validate(&trusted(text), &expected),
        Err(ExtractionError::AmbiguousField { field: Field::Destination, .. })
    ));

    let extraction = GenericStrategy::default().extract(text, &expected).unwrap();
    assert_eq!(
        extraction.result.destination_account.as_deref(),
        Some("0000003100099999999999")
    );
    assert_eq!(
        extraction.decision(Field::Destination).map(|d| d.rule),
        Some(Resolution::MatchedExpected)
    );
}

#[test]
fn amount_conventions_agree() {
    let value = dec("1234.56");
    for text in ["1.234,56", "1,234.56", "1234,56", "1234.56"] {
        assert_eq!(parse_amount(text), Some(value), "{}", text);
    }
}

#[test]
fn two_digit_years_round_trip() {
    for yy in 0..100 {
        let text = format!("15/03/{:02}", yy);
        let date = parse_date(&text).unwrap();
        let century = if yy <= 79 { 2000 } else { 1900 };
        assert_eq!(date, NaiveDate::from_ymd_opt(century + yy, 3, 15).unwrap());

        let iso = date.format("%Y-%m-%d").to_string();
        assert_eq!(parse_date(&iso), Some(date));
    }
}

#[test]
fn normalize_is_idempotent() {
    let raw = "\t Comprobante \r\n\nImporte:\t\t$  1.234,56\u{00a0}\n  \n";
    let once = normalize(raw);
    assert_eq!(normalize(&once), once);
    assert_eq!(once, "Comprobante\n\nImporte: $ 1.234,56");
}

#[test]
fn every_bank_validates_end_to_end() {
    let receipts = [
        "Mercado Pago\n$ 1.234,56\n4 de julio de 2025\nPara\nTienda SA\nCVU 0000003100072077739741",
        "BBVA\nComprobante\nImporte transferido\n$1.234,56\nFecha de operación\n04-07-2025\nHacia\nCBU destino: 0000003100072077739741",
        "Cuenta DNI\nImporte: $1.234,56\nFecha: 2025-07-04 14:33:10\nCBU destino: 0000003100072077739741",
    ];
    let expected = ExpectedValues::new(dec("1234.56"), july_4()).with_account(ACCOUNT);

    for text in receipts {
        let validation = ReceiptValidator::new().validate(&trusted(text), &expected).unwrap();
        assert!(!validation.extraction.is_guessed());
        assert_ne!(validation.extraction.strategy, "generic");
    }
}
