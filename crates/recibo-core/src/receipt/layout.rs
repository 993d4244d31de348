//! Line-oriented views over a normalized receipt.
//!
//! Bank strategies locate fields by position: a bounded window of lines after
//! an anchor label, the lines of a titled section, or the whole document.
//! A [`Region`] is such a selection of lines; it runs the field extractors
//! and tags every match with its line index.

use std::borrow::Cow;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use super::rules::{
    AccountExtractor, AliasExtractor, AmountExtractor, DateExtractor, ExtractionMatch, FieldExtractor,
};
use super::text::fold;

/// A normalized receipt split into lines.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    lines: Vec<&'a str>,
}

/// One line (or the tail of a line) selected into a region.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    pub index: usize,
    pub text: Cow<'a, str>,
}

/// A selection of receipt lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> Document<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
        }
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Every line of the receipt.
    pub fn all(&self) -> Region<'a> {
        Region {
            lines: self
                .lines
                .iter()
                .enumerate()
                .map(|(index, text)| Line {
                    index,
                    text: Cow::Borrowed(*text),
                })
                .collect(),
        }
    }

    /// The first `count` non-empty lines.
    pub fn header(&self, count: usize) -> Region<'a> {
        Region {
            lines: self
                .all()
                .lines
                .into_iter()
                .filter(|l| !l.text.is_empty())
                .take(count)
                .collect(),
        }
    }

    /// Whether `pattern` matches one of the first `count` non-empty lines,
    /// compared case- and accent-insensitively.
    pub fn header_matches(&self, pattern: &Regex, count: usize) -> bool {
        self.header(count)
            .lines
            .iter()
            .any(|l| pattern.is_match(&fold(&l.text)))
    }

    /// Whether `pattern` matches anywhere, compared case- and accent-insensitively.
    pub fn mentions(&self, pattern: &Regex) -> bool {
        self.lines.iter().any(|l| pattern.is_match(&fold(l)))
    }

    /// Index of the first line matching `pattern`.
    pub fn find_line(&self, pattern: &Regex) -> Option<usize> {
        self.lines.iter().position(|l| pattern.is_match(l))
    }

    /// The text after each `anchor` match plus the next `span` non-empty lines.
    pub fn window(&self, anchor: &Regex, span: usize) -> Region<'a> {
        let mut region = Region::default();

        for (index, &line) in self.lines.iter().enumerate() {
            let Some(m) = anchor.find(line) else {
                continue;
            };
            region.push(index, &line[m.end()..]);

            let following = self.lines[index + 1..]
                .iter()
                .enumerate()
                .filter(|(_, l)| !l.is_empty())
                .take(span);
            for (offset, &text) in following {
                region.push(index + 1 + offset, text);
            }
        }

        region
    }

    /// Lines of the section opened by `title`, up to (not including) the first
    /// later line matching `end`, or the end of the receipt.
    pub fn section(&self, title: &Regex, end: Option<&Regex>) -> Region<'a> {
        let mut region = Region::default();
        let Some(start) = self.find_line(title) else {
            return region;
        };

        let opener = self.lines[start];
        if let Some(m) = title.find(opener) {
            region.push(start, &opener[m.end()..]);
        }

        for (index, &line) in self.lines.iter().enumerate().skip(start + 1) {
            if end.is_some_and(|e| e.is_match(line)) {
                break;
            }
            region.push(index, line);
        }

        region
    }

    /// The value of each `label`: the rest of the label's line when it holds
    /// text, otherwise the next non-empty line.
    pub fn labeled_values(&self, label: &Regex) -> Region<'a> {
        let mut region = Region::default();

        for (index, &line) in self.lines.iter().enumerate() {
            let Some(m) = label.find(line) else {
                continue;
            };
            let rest = &line[m.end()..];
            if !rest.trim_matches(|c: char| c == ':' || c == '-' || c.is_whitespace()).is_empty() {
                region.push(index, rest);
                continue;
            }
            if let Some((offset, &next)) = self.lines[index + 1..]
                .iter()
                .enumerate()
                .find(|(_, l)| !l.is_empty())
            {
                region.push(index + 1 + offset, next);
            }
        }

        region
    }
}

impl<'a> Region<'a> {
    fn push(&mut self, index: usize, text: &'a str) {
        if self.lines.iter().any(|l| l.index == index) {
            return;
        }
        self.lines.push(Line {
            index,
            text: Cow::Borrowed(text),
        });
    }

    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.text.trim().is_empty())
    }

    /// Whether the region contains the given line.
    pub fn contains_line(&self, index: usize) -> bool {
        self.lines.iter().any(|l| l.index == index)
    }

    /// Drop the lines that also belong to `other`.
    pub fn without(mut self, other: &Region<'_>) -> Self {
        self.lines.retain(|l| !other.contains_line(l.index));
        self
    }

    /// Rewrite every line's text, keeping line indices.
    pub fn map_text<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Region {
            lines: self
                .lines
                .into_iter()
                .map(|l| Line {
                    index: l.index,
                    text: Cow::Owned(f(&l.text)),
                })
                .collect(),
        }
    }

    /// Amounts that are currency-marked or separator-formatted.
    pub fn amounts(&self) -> Vec<ExtractionMatch<Decimal>> {
        self.collect(&AmountExtractor::new())
    }

    /// Amounts preceded by a currency marker only.
    pub fn currency_amounts(&self) -> Vec<ExtractionMatch<Decimal>> {
        self.collect(&AmountExtractor::currency_only())
    }

    pub fn dates(&self) -> Vec<ExtractionMatch<NaiveDate>> {
        self.collect(&DateExtractor::new())
    }

    pub fn accounts(&self) -> Vec<ExtractionMatch<String>> {
        self.collect(&AccountExtractor::new())
    }

    /// Aliases, reading each line as the value of an alias label.
    pub fn aliases(&self) -> Vec<ExtractionMatch<String>> {
        self.collect(&AliasExtractor::new())
    }

    fn collect<E, T>(&self, extractor: &E) -> Vec<ExtractionMatch<T>>
    where
        E: FieldExtractor<Output = ExtractionMatch<T>>,
    {
        let mut matches: Vec<ExtractionMatch<T>> = self
            .lines
            .iter()
            .flat_map(|l| {
                extractor
                    .extract_all(&l.text)
                    .into_iter()
                    .map(move |m| m.on_line(l.index))
            })
            .collect();
        matches.sort_by_key(|m| m.line);
        matches
    }
}

/// Drop matches whose value is in `excluded`.
pub fn excluding<T: PartialEq>(matches: Vec<ExtractionMatch<T>>, excluded: &[T]) -> Vec<ExtractionMatch<T>> {
    matches
        .into_iter()
        .filter(|m| !excluded.contains(&m.value))
        .collect()
}
