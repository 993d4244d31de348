//! Destination extraction: CBU/CVU account numbers and aliases.

use super::patterns::{ACCOUNT_NUMBER, ALIAS_TOKEN, LABEL_WORD};
use super::{ExtractionMatch, FieldExtractor};

/// Number of digits in a CBU/CVU.
pub const ACCOUNT_DIGITS: usize = 22;

/// CBU/CVU field extractor.
pub struct AccountExtractor;

impl AccountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AccountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AccountExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ACCOUNT_NUMBER
            .find_iter(text)
            .filter_map(|m| {
                parse_account(m.as_str()).map(|account| {
                    ExtractionMatch::new(account, m.as_str()).with_position(m.start(), m.end())
                })
            })
            .collect()
    }
}

/// Alias field extractor.
///
/// Reads a label's value, so the input must be exactly the text following an
/// alias label; only its first token is considered.
pub struct AliasExtractor;

impl AliasExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AliasExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AliasExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let value = text.trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());
        let token = value.split_whitespace().next()?;
        let start = text.len() - value.len();

        parse_alias(token).map(|alias| {
            ExtractionMatch::new(alias, token).with_position(start, start + token.len())
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.extract(text).into_iter().collect()
    }
}

/// Normalize a CBU/CVU, stripping OCR spacing. Requires exactly 22 digits.
pub fn parse_account(s: &str) -> Option<String> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    let clean = s
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');

    if clean && digits.len() == ACCOUNT_DIGITS {
        Some(digits)
    } else {
        None
    }
}

/// Validate an alias token and return it lowercase.
///
/// An alias is 6-24 characters of letters, digits, `.` and `-`, does not
/// start or end with a separator and contains at least one letter.
pub fn parse_alias(s: &str) -> Option<String> {
    let s = s.trim();
    if !ALIAS_TOKEN.is_match(s) || LABEL_WORD.is_match(s) {
        return None;
    }
    if !s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(s.to_lowercase())
}

/// Format a CBU/CVU in its bank-entity/branch/account blocks (8 + 14 digits).
pub fn format_account(account: &str) -> String {
    if account.len() == ACCOUNT_DIGITS && account.is_ascii() {
        format!("{} {}", &account[..8], &account[8..])
    } else {
        account.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_account() {
        assert_eq!(
            parse_account("0000003100072077739741"),
            Some("0000003100072077739741".to_string())
        );
        assert_eq!(
            parse_account("0720 0000 8800 0012 3456 78"),
            Some("0720000088000012345678".to_string())
        );
        assert_eq!(parse_account("000000310007207773974"), None);
        assert_eq!(parse_account("00000031000720777397411"), None);
    }

    #[test]
    fn test_extract_accounts() {
        let extractor = AccountExtractor::new();
        let results = extractor.extract_all("CBU: 0000003100072077739741 / CVU 0000003100011111111111");
        let accounts: Vec<&str> = results.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(
            accounts,
            vec!["0000003100072077739741", "0000003100011111111111"]
        );

        // 23 contiguous digits are not a CBU
        assert!(extractor.extract_all("00000031000720777397411").is_empty());
    }

    #[test]
    fn test_parse_alias() {
        assert_eq!(parse_alias("Tienda.Pagos"), Some("tienda.pagos".to_string()));
        assert_eq!(parse_alias("mi-alias-99"), Some("mi-alias-99".to_string()));
        assert_eq!(parse_alias("abcdef"), Some("abcdef".to_string()));
        assert_eq!(parse_alias("abc"), None);
        assert_eq!(parse_alias(".tienda.pagos"), None);
        assert_eq!(parse_alias("tienda.pagos-"), None);
        assert_eq!(parse_alias("tienda_pagos"), None);
        assert_eq!(parse_alias("a234567890123456789012345"), None);
        assert_eq!(parse_alias("0000003100072077739741"), None);
        assert_eq!(parse_alias("Destinatario"), None);
    }

    #[test]
    fn test_extract_alias_from_label_value() {
        let extractor = AliasExtractor::new();
        let m = extractor.extract(": TIENDA.PAGOS.MP (Mercado Pago)").unwrap();
        assert_eq!(m.value, "tienda.pagos.mp");
        assert_eq!(m.source, "TIENDA.PAGOS.MP");
        assert!(extractor.extract("").is_none());
    }

    #[test]
    fn test_format_account() {
        assert_eq!(
            format_account("0000003100072077739741"),
            "00000031 00072077739741"
        );
    }
}
