//! DOI recognition: resolver links, `doi:` labels, and bare `10.xxxx/...` strings.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::error::ParseError;
use super::input::Identifier;
use super::url::clean_url_trailing;

/// `10.<registrant>/<suffix>`. Registrants may be nested (`10.1000.10/...`).
/// The suffix runs to whitespace, a quote, `<`, `>`, `]`, or the start of a
/// query string or fragment. Legacy SICI suffixes keep their
/// `<154::AID-JBM4>` segment.
const DOI_SYNTAX: &str =
    r##"10\.\d{4,9}(?:\.\d+)*/(?:[^\s<>"'\]?#]|<[0-9A-Za-z]+:[-:0-9A-Za-z]*>)+"##;

/// Bare DOI. The `regex` crate has no lookbehind, so the left boundary is
/// checked in code.
#[allow(clippy::expect_used)]
static BARE_DOI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DOI_SYNTAX).expect("DOI regex is valid")); // Static pattern, safe to panic

/// `doi.org` or `dx.doi.org` link; group 1 is the DOI.
#[allow(clippy::expect_used)]
static RESOLVER_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"https?://(?:dx\.)?doi\.org/({DOI_SYNTAX})"))
        .expect("DOI resolver regex is valid") // Static pattern, safe to panic
});

/// `doi:` / `DOI: ` label; group 1 is the DOI.
#[allow(clippy::expect_used)]
static LABELLED_DOI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)doi:\s*({DOI_SYNTAX})"))
        .expect("labelled DOI regex is valid") // Static pattern, safe to panic
});

const RESOLVER_PREFIXES: [&str; 4] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
];

/// Finds every DOI in `input`.
///
/// Resolver links are matched first, then `doi:` labels, then bare DOIs;
/// a later form never re-reports text an earlier form already claimed.
/// Candidates are percent-decoded and stripped of trailing punctuation and
/// unbalanced closing brackets before validation.
///
/// # Examples
///
/// ```
/// use papers_dl_core::parser::extract_dois;
///
/// let results = extract_dois("See DOI: 10.1234/example for details");
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].as_ref().unwrap().value(), "10.1234/example");
/// ```
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn extract_dois(input: &str) -> Vec<Result<Identifier, ParseError>> {
    let mut claimed: Vec<std::ops::Range<usize>> = Vec::new();
    let mut results = Vec::new();

    for pattern in [&*RESOLVER_LINK, &*LABELLED_DOI] {
        for caps in pattern.captures_iter(input) {
            let (Some(whole), Some(doi)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if is_claimed(&claimed, &whole.range()) {
                continue;
            }
            trace!(raw = %whole.as_str(), "DOI candidate");
            claimed.push(whole.range());
            results.push(canonical_doi(doi.as_str()));
        }
    }

    for found in BARE_DOI.find_iter(input) {
        if is_claimed(&claimed, &found.range()) || glued_to_previous(input, found.start()) {
            continue;
        }
        trace!(raw = %found.as_str(), "bare DOI candidate");
        claimed.push(found.range());
        results.push(canonical_doi(found.as_str()));
    }

    results
}

/// Returns true when `input` is exactly one well-formed DOI and nothing else.
///
/// No normalization happens here: `doi:` labels, resolver URLs, and trailing
/// punctuation all make this return false.
#[must_use]
pub fn is_bare_doi(input: &str) -> bool {
    BARE_DOI
        .find(input)
        .is_some_and(|m| m.range() == (0..input.len()))
        && check_doi(input).is_ok()
}

/// Extracts the DOI from a `doi.org` / `dx.doi.org` resolver URL.
///
/// Returns `None` unless the whole input is such a URL carrying a valid DOI.
#[must_use]
pub fn doi_from_resolver_url(input: &str) -> Option<String> {
    let caps = RESOLVER_LINK.captures(input)?;
    if caps.get(0)?.range() != (0..input.len()) {
        return None;
    }
    canonical_doi(caps.get(1)?.as_str())
        .ok()
        .map(|id| id.value().to_string())
}

fn is_claimed(claimed: &[std::ops::Range<usize>], candidate: &std::ops::Range<usize>) -> bool {
    claimed
        .iter()
        .any(|range| candidate.start < range.end && candidate.end > range.start)
}

/// Rejects matches glued to a preceding letter, digit, or dot, which are
/// version strings (`v10.1234/rc1`) or addresses (`192.10.1234/24`).
fn glued_to_previous(input: &str, start: usize) -> bool {
    input[..start]
        .bytes()
        .next_back()
        .is_some_and(|byte| byte.is_ascii_alphanumeric() || byte == b'.')
}

fn canonical_doi(raw: &str) -> Result<Identifier, ParseError> {
    let decoded = decode_doi(raw);
    let decoded = unescape_markup(&decoded);
    let trimmed = clean_url_trailing(&decoded);
    let trimmed = trim_unbalanced_suffix(trimmed, '(', ')');
    let trimmed = trim_unbalanced_suffix(trimmed, '{', '}');

    check_doi(trimmed)
        .map(|()| {
            debug!(doi = %trimmed, "DOI accepted");
            Identifier::doi(trimmed)
        })
        .inspect_err(|error| debug!(doi = %trimmed, %error, "DOI rejected"))
}

/// Strips resolver and `doi:` prefixes, then percent-decodes.
fn decode_doi(input: &str) -> String {
    let mut doi = input.trim();
    if let Some(rest) = RESOLVER_PREFIXES
        .iter()
        .find_map(|prefix| doi.strip_prefix(prefix))
    {
        doi = rest;
    }
    if doi.get(..4).is_some_and(|label| label.eq_ignore_ascii_case("doi:")) {
        doi = doi[4..].trim_start();
    }
    urlencoding::decode(doi).map_or_else(|_| doi.trim().to_string(), |s| s.trim().to_string())
}

/// Undoes the HTML escaping of a SICI segment and cuts at an escaped `&`,
/// which in page markup starts the next query parameter.
fn unescape_markup(doi: &str) -> String {
    let doi = doi.split("&amp;").next().unwrap_or_default();
    doi.replace("&lt;", "<").replace("&gt;", ">")
}

/// Drops closing brackets at the end of the suffix that have no opener in it.
///
/// Suffixes such as `10.1002/(SICI)1097-4636` legitimately contain brackets,
/// while `(10.1234/example)` only picked one up from the surrounding text.
fn trim_unbalanced_suffix(doi: &str, open: char, close: char) -> &str {
    let Some(slash) = doi.find('/') else {
        return doi;
    };
    let mut end = doi.len();
    while end > slash + 1 && doi[..end].ends_with(close) {
        let suffix = &doi[slash + 1..end];
        if suffix.matches(close).count() <= suffix.matches(open).count() {
            break;
        }
        end -= close.len_utf8();
    }
    &doi[..end]
}

/// `10.` + registrant whose first segment has at least four digits + `/` + non-empty suffix.
fn check_doi(doi: &str) -> Result<(), ParseError> {
    let Some(rest) = doi.strip_prefix("10.") else {
        return Err(ParseError::invalid_doi(doi, "DOI must start with '10.'"));
    };
    let Some((registrant, suffix)) = rest.split_once('/') else {
        return Err(ParseError::doi_no_suffix(doi));
    };
    let first_segment = registrant.split('.').next().unwrap_or_default();
    if first_segment.len() < 4 || !first_segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::invalid_doi(
            doi,
            "registrant code must have at least 4 digits",
        ));
    }
    if suffix.is_empty() {
        return Err(ParseError::doi_no_suffix(doi));
    }
    Ok(())
}
