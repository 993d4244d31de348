//! Date extraction for transfer receipts.

use chrono::NaiveDate;

use super::patterns::{DATE_ABBREVIATED, DATE_DMY, DATE_SPANISH_LONG, DATE_YMD};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Matches are returned in text order; time of day is discarded.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        // YYYY-MM-DD, possibly followed by a time
        for caps in DATE_YMD.captures_iter(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);
            push_date(&mut results, &caps, NaiveDate::from_ymd_opt(year, month, day));
        }

        // DD/MM/YYYY or DD/MM/YY
        for caps in DATE_DMY.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);
            push_date(&mut results, &caps, NaiveDate::from_ymd_opt(year, month, day));
        }

        // "18 de junio de 2025"
        for caps in DATE_SPANISH_LONG.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = month_from_name(&caps[2]).unwrap_or(0);
            let year: i32 = caps[3].parse().unwrap_or(0);
            push_date(&mut results, &caps, NaiveDate::from_ymd_opt(year, month, day));
        }

        // "02/JUL/2025"
        for caps in DATE_ABBREVIATED.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = month_from_name(&caps[2]).unwrap_or(0);
            let year = parse_year(&caps[3]);
            push_date(&mut results, &caps, NaiveDate::from_ymd_opt(year, month, day));
        }

        results.sort_by_key(|m| m.position.map(|(start, _)| start));
        results
    }
}

fn push_date(
    results: &mut Vec<ExtractionMatch<NaiveDate>>,
    caps: &regex::Captures<'_>,
    date: Option<NaiveDate>,
) {
    let Some(date) = date else {
        return;
    };
    let Some(full_match) = caps.get(0) else {
        return;
    };

    // Patterns never overlap on valid input; skip a match nested in an earlier one
    let overlaps = results.iter().any(|r| {
        r.position
            .is_some_and(|(start, end)| full_match.start() < end && start < full_match.end())
    });
    if overlaps {
        return;
    }

    results.push(
        ExtractionMatch::new(date, full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    );
}

/// Parse the first date found in a string.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    DateExtractor::new().extract(s).map(|m| m.value)
}

/// Expand a year: two digits map to 20YY when YY <= 79, otherwise 19YY.
pub fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() <= 2 {
        if year <= 79 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

/// Month number from a Spanish (or English-abbreviated) month name.
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let month = match name.as_str() {
        "enero" | "ene" | "jan" => 1,
        "febrero" | "feb" => 2,
        "marzo" | "mar" => 3,
        "abril" | "abr" | "apr" => 4,
        "mayo" | "may" => 5,
        "junio" | "jun" => 6,
        "julio" | "jul" => 7,
        "agosto" | "ago" | "aug" => 8,
        "septiembre" | "setiembre" | "sep" | "sept" | "set" => 9,
        "octubre" | "oct" => 10,
        "noviembre" | "nov" => 11,
        "diciembre" | "dic" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_numeric_dates() {
        assert_eq!(parse_date("04/07/2025"), Some(ymd(2025, 7, 4)));
        assert_eq!(parse_date("04/07/2025 14:33hs"), Some(ymd(2025, 7, 4)));
        assert_eq!(parse_date("4-7-25"), Some(ymd(2025, 7, 4)));
        assert_eq!(parse_date("04.07.2025"), Some(ymd(2025, 7, 4)));
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_date("2025-07-04"), Some(ymd(2025, 7, 4)));
        assert_eq!(parse_date("2025-07-04 14:33:10"), Some(ymd(2025, 7, 4)));
        assert_eq!(parse_date("2025-07-04T14:33"), Some(ymd(2025, 7, 4)));
    }

    #[test]
    fn test_spanish_long_dates() {
        assert_eq!(parse_date("18 de junio de 2025"), Some(ymd(2025, 6, 18)));
        assert_eq!(
            parse_date("Miércoles, 18 de junio de 2025 a las 10:15"),
            Some(ymd(2025, 6, 18))
        );
        assert_eq!(parse_date("1 de Septiembre del 2024"), Some(ymd(2024, 9, 1)));
    }

    #[test]
    fn test_abbreviated_month() {
        assert_eq!(parse_date("02/JUL/2025"), Some(ymd(2025, 7, 2)));
        assert_eq!(parse_date("02-jul-25"), Some(ymd(2025, 7, 2)));
        assert_eq!(parse_date("2 dic 2024"), Some(ymd(2024, 12, 2)));
        assert_eq!(parse_date("15 SET 2025"), Some(ymd(2025, 9, 15)));
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_date("31/02/2025"), None);
        assert_eq!(parse_date("14:33"), None);
        assert_eq!(parse_date("0000003100072077739741"), None);
        assert_eq!(parse_date("$ 1.234,56"), None);
    }

    #[test]
    fn test_two_digit_year_pivot() {
        for yy in 0..100 {
            let text = format!("15/03/{:02}", yy);
            let date = parse_date(&text).unwrap();
            let expected_year = if yy <= 79 { 2000 + yy } else { 1900 + yy };
            assert_eq!(date, ymd(expected_year, 3, 15), "{}", text);

            let iso = date.format("%Y-%m-%d").to_string();
            assert_eq!(parse_date(&iso), Some(date));
        }
    }

    #[test]
    fn test_extract_all_in_text_order() {
        let extractor = DateExtractor::new();
        let dates: Vec<NaiveDate> = extractor
            .extract_all("Vence 18 de junio de 2025, pagado 2025-06-10")
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(dates, vec![ymd(2025, 6, 18), ymd(2025, 6, 10)]);
    }
}
