//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric token that may be an amount: digits with optional . and , separators
    pub static ref NUMBER_TOKEN: Regex = Regex::new(
        r"\b\d(?:[\d.,]*\d)?\b"
    ).unwrap();

    // Currency marker immediately before a number (ARS receipts)
    pub static ref CURRENCY_SUFFIX: Regex = Regex::new(
        r"(?i)(?:\$|\bars|\bar\$)\s*$"
    ).unwrap();

    // Clock time, e.g. "14:33", "14:33:10", "14:33hs"
    pub static ref TIME: Regex = Regex::new(
        r"(?i)\b\d{1,2}:\d{2}(?::\d{2})?(?:\s*h(?:s|rs)?\b)?"
    ).unwrap();

    // Numeric dates: DD/MM/YYYY, DD/MM/YY (also with - or .)
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})\b"
    ).unwrap();

    // ISO dates, optionally followed by a time: YYYY-MM-DD[ HH:MM[:SS]]
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[/.\-](\d{1,2})[/.\-](\d{1,2})(?:[T\s]+\d{1,2}:\d{2}(?::\d{2})?)?\b"
    ).unwrap();

    // Spanish long form: "18 de junio de 2025", "miércoles, 18 de junio de 2025"
    pub static ref DATE_SPANISH_LONG: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+de\s+(enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre)\s+(?:del?\s+)?(\d{4})\b"
    ).unwrap();

    // Abbreviated month: "02/JUL/2025", "02-jul-25", "2 jul 2025"
    pub static ref DATE_ABBREVIATED: Regex = Regex::new(
        r"(?i)\b(\d{1,2})[\s/.\-]*(ene|feb|mar|abr|may|jun|jul|ago|sept?|set|oct|nov|dic|jan|apr|aug|dec)\.?[\s/.\-]*(\d{4}|\d{2})\b"
    ).unwrap();

    // CBU/CVU: 22 digits, OCR may insert single spaces or hyphens
    pub static ref ACCOUNT_NUMBER: Regex = Regex::new(
        r"\b\d(?:[ \-]?\d){21}\b"
    ).unwrap();

    // Alias token: 6-24 chars, alphanumeric plus . and -, no separator at the ends
    pub static ref ALIAS_TOKEN: Regex = Regex::new(
        r"^[A-Za-z0-9][A-Za-z0-9.\-]{4,22}[A-Za-z0-9]$"
    ).unwrap();

    // Words that are receipt labels, never alias values
    pub static ref LABEL_WORD: Regex = Regex::new(
        r"(?i)^(destinatario|destino|cuenta|banco|titular|concepto|referencia|importe|monto|comprobante|operaci[oó]n|origen|motivo|enviaste|transferiste|transferencia|fecha|para|desde)$"
    ).unwrap();

    // Generic labels, shared by the fallback strategy
    pub static ref AMOUNT_LABEL: Regex = Regex::new(
        r"(?i)\b(importe|monto|total|transferiste|enviaste|valor)\b"
    ).unwrap();

    pub static ref DATE_LABEL: Regex = Regex::new(
        r"(?i)\bfecha\b"
    ).unwrap();

    pub static ref DESTINATION_LABEL: Regex = Regex::new(
        r"(?i)\b(destino|destinatario|beneficiario|para|acreditar\s+en)\b"
    ).unwrap();

    pub static ref ALIAS_LABEL: Regex = Regex::new(
        r"(?i)\balias(?:\s+(?:cbu|cvu|destino|del\s+destinatario))?\b"
    ).unwrap();

    pub static ref ORIGIN_LABEL: Regex = Regex::new(
        r"(?i)\b(origen|desde|ordenante|de\s+la\s+cuenta|cuenta\s+de\s+d[eé]bito)\b"
    ).unwrap();
}
