//! Errors raised while classifying queries and scanning text.

use thiserror::Error;

/// Longest URL accepted as a query or scanned from a page.
pub const MAX_URL_LENGTH: usize = 2000;

/// Characters of an oversized URL kept for the error message.
const URL_PREVIEW_CHARS: usize = 50;

/// A query or candidate identifier that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not an http(s) URL with a host.
    #[error("invalid URL '{url}': {reason} (pass a DOI, PMID, ISBN, or an http(s) URL)")]
    InvalidUrl {
        /// The rejected text.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Longer than [`MAX_URL_LENGTH`].
    #[error("URL of {length} characters exceeds the {max} limit: {preview}...")]
    UrlTooLong {
        /// Leading characters of the URL.
        preview: String,
        /// Length in bytes.
        length: usize,
        /// The limit that was exceeded.
        max: usize,
    },

    /// Does not have the `10.<registrant>/<suffix>` shape.
    #[error("invalid DOI '{doi}': {reason} (DOIs look like 10.1234/suffix)")]
    InvalidDoi {
        /// The rejected DOI.
        doi: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ParseError {
    /// Rejects a URL whose scheme is not http or https.
    #[must_use]
    pub fn unsupported_scheme(url: &str, scheme: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: format!("scheme '{scheme}' is not supported"),
        }
    }

    /// Rejects text the URL parser could not make sense of.
    #[must_use]
    pub fn malformed(url: &str, parse_error: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: parse_error.to_string(),
        }
    }

    #[must_use]
    pub fn no_host(url: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        }
    }

    #[must_use]
    pub fn too_long(url: &str) -> Self {
        Self::UrlTooLong {
            preview: url.chars().take(URL_PREVIEW_CHARS).collect(),
            length: url.len(),
            max: MAX_URL_LENGTH,
        }
    }

    #[must_use]
    pub fn invalid_doi(doi: &str, reason: &str) -> Self {
        Self::InvalidDoi {
            doi: doi.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Rejects a DOI with nothing after the registrant slash.
    #[must_use]
    pub fn doi_no_suffix(doi: &str) -> Self {
        Self::invalid_doi(doi, "missing suffix after '/'")
    }
}
