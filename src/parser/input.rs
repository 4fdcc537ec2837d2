//! Identifier types produced by parsing and consumed by the fetcher.

use std::fmt;

use serde::Serialize;

use super::doi::is_bare_doi;
use super::isbn::valid_isbn;
use super::url::is_direct_pdf_url;

/// Longest all-digit string still treated as a PubMed ID.
const MAX_PMID_DIGITS: usize = 9;

/// Kind of paper identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    /// Digital Object Identifier (`10.XXXX/suffix`)
    Doi,
    /// PubMed ID (all digits)
    Pmid,
    /// ISBN-10 or ISBN-13 with a valid check digit
    Isbn,
    /// HTTP/HTTPS URL
    Url,
}

impl IdKind {
    /// Stable lowercase label, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doi => "doi",
            Self::Pmid => "pmid",
            Self::Isbn => "isbn",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A syntactically valid paper identifier.
///
/// Serializes as `{"id": ..., "type": ...}` for line-oriented JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    /// Identifier text
    #[serde(rename = "id")]
    value: String,
    /// Identifier kind
    #[serde(rename = "type")]
    kind: IdKind,
}

impl Identifier {
    /// Creates an identifier from an already-validated value.
    #[must_use]
    pub fn new(kind: IdKind, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    /// Creates a DOI identifier.
    #[must_use]
    pub fn doi(value: impl Into<String>) -> Self {
        Self::new(IdKind::Doi, value)
    }

    /// Creates a URL identifier.
    #[must_use]
    pub fn url(value: impl Into<String>) -> Self {
        Self::new(IdKind::Url, value)
    }

    /// Recognizes input that already is an identifier, returning it unchanged.
    ///
    /// Accepted forms, checked in order:
    /// - a DOI (`10.1038/nature12373`), optionally labelled `doi:`
    /// - an ISBN-10/13 with a valid check digit
    /// - a PubMed ID (up to 9 digits), optionally labelled `PMID:`
    /// - an http(s) URL whose path ends in `.pdf`
    ///
    /// Labels are dropped; otherwise the value comes back unchanged.
    /// Anything else (including landing-page URLs) returns `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use papers_dl_core::parser::{IdKind, Identifier};
    ///
    /// let id = Identifier::parse("10.1038/nature12373").unwrap();
    /// assert_eq!(id.kind(), IdKind::Doi);
    /// assert_eq!(id.value(), "10.1038/nature12373");
    ///
    /// assert!(Identifier::parse("https://example.com/article").is_none());
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if is_bare_doi(input) {
            return Some(Self::doi(input));
        }
        if let Some(doi) = strip_label(input, "doi:")
            && is_bare_doi(doi)
        {
            return Some(Self::doi(doi));
        }
        if valid_isbn(input) {
            return Some(Self::new(IdKind::Isbn, input));
        }
        let pmid = strip_label(input, "pmid:").unwrap_or(input);
        if is_pmid(pmid) {
            return Some(Self::new(IdKind::Pmid, pmid));
        }
        if is_direct_pdf_url(input) {
            return Some(Self::url(input));
        }
        None
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the identifier kind.
    #[must_use]
    pub fn kind(&self) -> IdKind {
        self.kind
    }
}

/// Case-insensitive `label` prefix, with the whitespace after it removed.
fn strip_label<'a>(input: &'a str, label: &str) -> Option<&'a str> {
    input
        .get(..label.len())
        .filter(|head| head.eq_ignore_ascii_case(label))
        .map(|_| input[label.len()..].trim_start())
}

fn is_pmid(input: &str) -> bool {
    !input.is_empty() && input.len() <= MAX_PMID_DIGITS && input.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_kind_display() {
        assert_eq!(IdKind::Doi.to_string(), "doi");
        assert_eq!(IdKind::Pmid.to_string(), "pmid");
        assert_eq!(IdKind::Isbn.to_string(), "isbn");
        assert_eq!(IdKind::Url.to_string(), "url");
    }

    #[test]
    fn test_identifier_parse_bare_doi_unchanged() {
        let id = Identifier::parse("10.1016/j.cell.2024.01.001").unwrap();
        assert_eq!(id.kind(), IdKind::Doi);
        assert_eq!(id.value(), "10.1016/j.cell.2024.01.001");
    }

    #[test]
    fn test_identifier_parse_doi_with_parens_unchanged() {
        let id = Identifier::parse("10.1002/(SICI)1097-4636").unwrap();
        assert_eq!(id.value(), "10.1002/(SICI)1097-4636");
    }

    #[test]
    fn test_identifier_parse_sici_doi_unchanged() {
        let sici = "10.1002/(SICI)1097-4636(199911)47:2<154::AID-JBM4>3.0.CO;2-Z";
        let id = Identifier::parse(sici).unwrap();
        assert_eq!(id.kind(), IdKind::Doi);
        assert_eq!(id.value(), sici);
    }

    #[test]
    fn test_identifier_parse_drops_labels() {
        let id = Identifier::parse("doi:10.1038/nature12373").unwrap();
        assert_eq!(id, Identifier::doi("10.1038/nature12373"));
        let id = Identifier::parse("DOI: 10.1038/nature12373").unwrap();
        assert_eq!(id.value(), "10.1038/nature12373");
        let id = Identifier::parse("PMID:31452104").unwrap();
        assert_eq!(id, Identifier::new(IdKind::Pmid, "31452104"));
        let id = Identifier::parse("pmid: 123").unwrap();
        assert_eq!(id.value(), "123");
    }

    #[test]
    fn test_identifier_parse_rejects_empty_labels() {
        assert!(Identifier::parse("doi:").is_none());
        assert!(Identifier::parse("PMID:").is_none());
        assert!(Identifier::parse("doi:not-a-doi").is_none());
    }

    #[test]
    fn test_identifier_parse_trims_surrounding_whitespace() {
        let id = Identifier::parse("  10.1234/example \n").unwrap();
        assert_eq!(id.value(), "10.1234/example");
    }

    #[test]
    fn test_identifier_parse_pmid() {
        let id = Identifier::parse("31452104").unwrap();
        assert_eq!(id.kind(), IdKind::Pmid);
    }

    #[test]
    fn test_identifier_parse_isbn_13() {
        let id = Identifier::parse("978-0-306-40615-7").unwrap();
        assert_eq!(id.kind(), IdKind::Isbn);
        assert_eq!(id.value(), "978-0-306-40615-7");
    }

    #[test]
    fn test_identifier_parse_long_digit_run_is_not_pmid() {
        // 13 digits with a bad check digit: neither ISBN nor PMID
        assert!(Identifier::parse("9780306406158").is_none());
    }

    #[test]
    fn test_identifier_parse_direct_pdf_url() {
        let id = Identifier::parse("https://example.com/papers/a.pdf").unwrap();
        assert_eq!(id.kind(), IdKind::Url);
        assert_eq!(id.value(), "https://example.com/papers/a.pdf");
    }

    #[test]
    fn test_identifier_parse_landing_page_is_none() {
        assert!(Identifier::parse("https://example.com/article/42").is_none());
        assert!(Identifier::parse("plain words").is_none());
        assert!(Identifier::parse("").is_none());
    }

    #[test]
    fn test_identifier_serializes_as_id_and_type() {
        let json = serde_json::to_string(&Identifier::doi("10.1234/x")).unwrap();
        assert_eq!(json, r#"{"id":"10.1234/x","type":"doi"}"#);
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(Identifier::doi("10.1234/x").to_string(), "[doi] 10.1234/x");
    }
}
