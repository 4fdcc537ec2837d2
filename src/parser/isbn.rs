//! ISBN-10 / ISBN-13 detection with check-digit validation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::input::{IdKind, Identifier};

/// Candidate shapes, most specific first. Separated forms need exactly the
/// number of groups the standard uses (4 separators for ISBN-13, 3 for ISBN-10).
#[allow(clippy::expect_used)]
static ISBN_CANDIDATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b97[89][- ]\d{1,5}[- ]\d{1,7}[- ]\d{1,7}[- ]\d\b",
        r"(?i)\b\d{1,5}[- ]\d{1,7}[- ]\d{1,7}[- ][\dX]\b",
        r"\b97[89]\d{10}\b",
        r"(?i)\b\d{9}[\dX]\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("ISBN regex is valid")) // Static pattern, safe to panic
    .collect()
});

/// Whole-string form of the candidate shapes, used to validate direct input.
#[allow(clippy::expect_used)]
static ISBN_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:97[89]\d{10}|\d{9}[\dX]|97[89][- ]\d{1,5}[- ]\d{1,7}[- ]\d{1,7}[- ]\d|\d{1,5}[- ]\d{1,7}[- ]\d{1,7}[- ][\dX])$",
    )
    .expect("ISBN shape regex is valid") // Static pattern, safe to panic
});

/// Optional `ISBN`, `ISBN-10:` or `ISBN-13:` label in front of a number.
#[allow(clippy::expect_used)]
static ISBN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^ISBN(?:-1[03])?:?\s*").expect("ISBN label regex is valid") // Static pattern, safe to panic
});

/// Returns true when `subject` is a well-formed ISBN with a correct check digit.
///
/// A leading `ISBN`, `ISBN-10:` or `ISBN-13:` label is accepted.
///
/// # Examples
///
/// ```
/// use papers_dl_core::parser::valid_isbn;
///
/// assert!(valid_isbn("ISBN 0-306-40615-2"));
/// assert!(valid_isbn("9780306406157"));
/// assert!(!valid_isbn("9780306406158"));
/// ```
#[must_use]
pub fn valid_isbn(subject: &str) -> bool {
    let trimmed = subject.trim();
    let body = ISBN_LABEL
        .find(trimmed)
        .map_or(trimmed, |label| &trimmed[label.end()..]);
    if !ISBN_SHAPE.is_match(body) {
        return false;
    }

    let symbols: Vec<char> = body.chars().filter(|c| !matches!(c, '-' | ' ')).collect();
    match symbols.len() {
        10 => isbn10_check_digit_ok(&symbols),
        13 => isbn13_check_digit_ok(&symbols),
        _ => false,
    }
}

/// Finds every ISBN in `input` whose check digit is valid.
///
/// Values are returned as written (separators kept, label dropped), in
/// pattern order with overlapping candidates removed.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn extract_isbns(input: &str) -> Vec<Identifier> {
    let mut results = Vec::new();
    let mut seen_ranges: Vec<(usize, usize)> = Vec::new();

    for pattern in ISBN_CANDIDATE_PATTERNS.iter() {
        for m in pattern.find_iter(input) {
            if seen_ranges.iter().any(|&(s, e)| m.start() < e && m.end() > s) {
                continue;
            }
            seen_ranges.push((m.start(), m.end()));
            if valid_isbn(m.as_str()) {
                trace!(isbn = %m.as_str(), "ISBN validated");
                results.push(Identifier::new(IdKind::Isbn, m.as_str()));
            } else {
                trace!(candidate = %m.as_str(), "ISBN check digit mismatch");
            }
        }
    }

    results
}

fn isbn10_check_digit_ok(symbols: &[char]) -> bool {
    let mut sum = 0u32;
    for (index, &symbol) in symbols.iter().enumerate() {
        let value = match symbol {
            'X' | 'x' if index == 9 => 10,
            c => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        // Weights run 10 down to 1.
        let weight = 10 - u32::try_from(index).unwrap_or(10);
        sum += weight * value;
    }
    sum % 11 == 0
}

fn isbn13_check_digit_ok(symbols: &[char]) -> bool {
    let mut sum = 0u32;
    for (index, &symbol) in symbols.iter().enumerate() {
        let Some(digit) = symbol.to_digit(10) else {
            return false;
        };
        sum += if index % 2 == 0 { digit } else { digit * 3 };
    }
    sum % 10 == 0
}
