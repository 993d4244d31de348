//! Amount extraction for transfer receipts.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{ACCOUNT_NUMBER, CURRENCY_SUFFIX, DATE_ABBREVIATED, DATE_DMY, DATE_SPANISH_LONG, DATE_YMD, NUMBER_TOKEN, TIME};
use super::{ExtractionMatch, FieldExtractor};

/// Bare integers with this many digits are reference numbers, not amounts.
pub const MAX_BARE_INTEGER_DIGITS: usize = 6;

/// Amount field extractor.
///
/// Reads amounts from a single line. Dates, clock times and account numbers
/// are masked first so their digits never surface as amounts.
pub struct AmountExtractor {
    require_currency: bool,
}

impl AmountExtractor {
    /// Accept currency-marked or separator-formatted amounts.
    pub fn new() -> Self {
        Self {
            require_currency: false,
        }
    }

    /// Accept only amounts preceded by a currency marker.
    pub fn currency_only() -> Self {
        Self {
            require_currency: true,
        }
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let masked = mask_non_amounts(text);
        let mut results = Vec::new();

        for m in NUMBER_TOKEN.find_iter(&masked) {
            let token = m.as_str();
            let marked = CURRENCY_SUFFIX.is_match(&masked[..m.start()]);
            let formatted = token.contains([',', '.']);

            if self.require_currency && !marked {
                continue;
            }
            if !marked && !formatted {
                continue;
            }

            if let Some(amount) = parse_amount(token) {
                results.push(
                    ExtractionMatch::new(amount, &text[m.start()..m.end()])
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results
    }
}

/// Blank out dates, clock times and account numbers, keeping byte offsets.
fn mask_non_amounts(text: &str) -> String {
    let mut masked = text.to_string();

    for pattern in [
        &*ACCOUNT_NUMBER,
        &*DATE_YMD,
        &*DATE_DMY,
        &*DATE_SPANISH_LONG,
        &*DATE_ABBREVIATED,
        &*TIME,
    ] {
        let ranges: Vec<(usize, usize)> = pattern
            .find_iter(&masked)
            .map(|m| (m.start(), m.end()))
            .collect();
        for (start, end) in ranges {
            masked.replace_range(start..end, &" ".repeat(end - start));
        }
    }

    masked
}

/// Parse an amount written in either decimal convention.
///
/// "1.234,56", "1,234.56", "1234,56" and "1234.56" all parse to 1234.56:
/// when both separators appear, the rightmost one is the decimal separator.
/// With a single separator kind, one occurrence followed by exactly three
/// digits is a thousands separator ("15.000"), one followed by one or two
/// digits is the decimal separator. Bare integers of seven or more digits
/// are rejected as reference numbers.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() || !cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');

    let (integer, fraction) = match (last_comma, last_dot) {
        (None, None) => {
            if cleaned.len() > MAX_BARE_INTEGER_DIGITS {
                return None;
            }
            (cleaned.clone(), String::new())
        }
        (Some(c), Some(d)) => {
            let (decimal_pos, thousands) = if c > d { (c, '.') } else { (d, ',') };
            let integer = &cleaned[..decimal_pos];
            let fraction = &cleaned[decimal_pos + 1..];
            // The decimal separator must not also appear in the integer part
            let decimal_sep = cleaned.as_bytes()[decimal_pos] as char;
            if integer.contains(decimal_sep) {
                return None;
            }
            (strip_thousands(integer, thousands)?, fraction.to_string())
        }
        (Some(pos), None) | (None, Some(pos)) => {
            let sep = cleaned.as_bytes()[pos] as char;
            let occurrences = cleaned.matches(sep).count();
            let tail = cleaned.len() - pos - 1;

            if occurrences == 1 && (1..=2).contains(&tail) {
                (cleaned[..pos].to_string(), cleaned[pos + 1..].to_string())
            } else {
                (strip_thousands(&cleaned, sep)?, String::new())
            }
        }
    };

    if fraction.len() > 2 || integer.is_empty() {
        return None;
    }

    let normalized = if fraction.is_empty() {
        integer
    } else {
        format!("{}.{}", integer, fraction)
    };

    Decimal::from_str(&normalized).ok()
}

/// Remove thousands separators, requiring groups of three after the first.
fn strip_thousands(s: &str, sep: char) -> Option<String> {
    let groups: Vec<&str> = s.split(sep).collect();
    let (first, rest) = groups.split_first()?;

    if first.is_empty() || (first.len() > 3 && !rest.is_empty()) {
        return None;
    }
    if rest.iter().any(|g| g.len() != 3) {
        return None;
    }

    let joined = groups.concat();
    if joined.chars().all(|c| c.is_ascii_digit()) {
        Some(joined)
    } else {
        None
    }
}

/// Whether two amounts are equal at cent precision.
pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    a.round_dp(2) == b.round_dp(2)
}

/// Format amount in Argentine style (1.234,56).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_both_conventions() {
        for s in ["1.234,56", "1,234.56", "1234,56", "1234.56", "$ 1.234,56"] {
            assert_eq!(parse_amount(s), Some(dec("1234.56")), "{}", s);
        }
        assert_eq!(parse_amount("12.345.678,90"), Some(dec("12345678.90")));
        assert_eq!(parse_amount("12,345,678.90"), Some(dec("12345678.90")));
    }

    #[test]
    fn test_parse_single_separator() {
        assert_eq!(parse_amount("15.000"), Some(dec("15000")));
        assert_eq!(parse_amount("15,000"), Some(dec("15000")));
        assert_eq!(parse_amount("1.500.000"), Some(dec("1500000")));
        assert_eq!(parse_amount("150,5"), Some(dec("150.5")));
        assert_eq!(parse_amount("150.50"), Some(dec("150.50")));
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse_amount("500"), Some(dec("500")));
        assert_eq!(parse_amount("123456"), Some(dec("123456")));
        assert_eq!(parse_amount("1234567"), None);
        assert_eq!(parse_amount("98765432101"), None);
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("1.23.4"), None);
        assert_eq!(parse_amount("1,234,56.7,8"), None);
        assert_eq!(parse_amount("1.234,567"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_extract_skips_dates_and_accounts() {
        let extractor = AmountExtractor::new();
        let line = "04/07/2025 14:33hs $ 1.234,56 CBU 0000003100072077739741";
        let results = extractor.extract_all(line);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, dec("1234.56"));
        assert_eq!(results[0].source, "1.234,56");
    }

    #[test]
    fn test_extract_requires_marker_or_format() {
        let extractor = AmountExtractor::new();
        assert!(extractor.extract_all("Operación 12345").is_empty());
        assert_eq!(extractor.extract_all("$ 500").len(), 1);
        assert_eq!(extractor.extract_all("ARS 2.500,00").len(), 1);
        assert_eq!(extractor.extract_all("1.500,00").len(), 1);

        let strict = AmountExtractor::currency_only();
        assert!(strict.extract_all("1.500,00").is_empty());
        assert_eq!(strict.extract_all("Total $1.500,00").len(), 1);
    }

    #[test]
    fn test_amounts_match() {
        assert!(amounts_match(dec("1234.56"), dec("1234.560")));
        assert!(amounts_match(dec("1234.561"), dec("1234.56")));
        assert!(!amounts_match(dec("1234.56"), dec("1234.57")));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("1234.56")), "1.234,56");
        assert_eq!(format_amount(dec("12345678.9")), "12.345.678,90");
        assert_eq!(format_amount(dec("5")), "5,00");
    }
}
