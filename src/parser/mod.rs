//! Identifier parsing: DOIs, ISBNs, PubMed IDs, and URLs.
//!
//! This module is the pattern library shared by the resolver (which scans
//! fetched pages) and the `parse` command (which scans local files).
//!
//! # Example
//!
//! ```
//! use papers_dl_core::parser::{IdKind, parse_ids_from_text};
//!
//! let ids = parse_ids_from_text("see doi:10.1038/nature12373", &[IdKind::Doi]);
//! assert_eq!(ids.len(), 1);
//! assert_eq!(ids[0].value(), "10.1038/nature12373");
//! ```

mod doi;
mod error;
mod format;
mod input;
mod isbn;
mod url;

pub use doi::{doi_from_resolver_url, extract_dois, is_bare_doi};
pub use error::{MAX_URL_LENGTH, ParseError};
pub use format::{OutputFormat, format_output};
pub use input::{IdKind, Identifier};
pub use isbn::{extract_isbns, valid_isbn};
pub use url::{extract_urls, is_direct_pdf_url, validate_url};

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

/// Identifier kinds scanned for when the caller does not choose any.
/// Books come first, so `raw` output lists ISBNs before DOIs.
pub const DEFAULT_SCAN_KINDS: [IdKind; 2] = [IdKind::Isbn, IdKind::Doi];

/// Finds all identifiers of the given kinds in `text`.
///
/// Kinds are scanned in the order given; within a kind, matches keep the
/// extractor's order. Duplicate values are reported once, at their first
/// occurrence. `IdKind::Pmid` has no free-text pattern (any number would
/// match) and contributes nothing. Invalid candidates are dropped.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
#[must_use]
pub fn parse_ids_from_text(text: &str, kinds: &[IdKind]) -> Vec<Identifier> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut matches = Vec::new();

    for kind in kinds {
        let found: Vec<Identifier> = match kind {
            IdKind::Doi => extract_dois(text).into_iter().filter_map(Result::ok).collect(),
            IdKind::Isbn => extract_isbns(text),
            IdKind::Url => extract_urls(text).into_iter().filter_map(Result::ok).collect(),
            IdKind::Pmid => Vec::new(),
        };
        for id in found {
            if seen.insert(id.value().to_string()) {
                matches.push(id);
            }
        }
    }

    debug!(count = matches.len(), "identifiers found in text");
    matches
}

/// Reads `path` and finds all identifiers of the given kinds in it.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read as UTF-8 text.
pub fn parse_file(path: &Path, kinds: &[IdKind]) -> std::io::Result<Vec<Identifier>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_ids_from_text(&content, kinds))
}
