//! Error types for resolution and fetching.
//!
//! This module defines structured errors for every network and filesystem
//! step between a user query and a PDF on disk, plus the coarse
//! [`FailureKind`] used when reporting batch results.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

/// Coarse failure category shown to users in batch summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The query itself could not be interpreted.
    Input,
    /// A request failed, timed out, or was refused by the server.
    Network,
    /// The identifier could not be resolved to any content.
    NotFound,
    /// Writing the artifact to disk failed.
    Write,
}

impl FailureKind {
    /// Stable label for display output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Input => "InputError",
            Self::Network => "NetworkError",
            Self::NotFound => "NotFoundError",
            Self::Write => "WriteError",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that can occur while resolving or fetching a paper.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The query is neither an identifier nor a usable URL.
    #[error("invalid input '{input}': {source}")]
    InvalidInput {
        /// The raw query.
        input: String,
        /// Why it was rejected.
        #[source]
        source: ParseError,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A lookup service could not be queried for the identifier.
    #[error("{provider} lookup failed for {identifier}: {reason}")]
    Lookup {
        /// The identifier being looked up.
        identifier: String,
        /// Provider that performed the lookup.
        provider: String,
        /// What went wrong.
        reason: String,
        /// HTTP status of the lookup page, when one was received.
        status: Option<u16>,
    },

    /// No content exists for the identifier.
    #[error("no paper found for {identifier}: {reason}")]
    NotFound {
        /// The identifier or query that found nothing.
        identifier: String,
        /// Why nothing was found.
        reason: String,
    },

    /// The lookup page loaded but did not reference a PDF.
    #[error("no PDF location on lookup page {page_url} for {identifier}")]
    MissingContentLocation {
        /// The identifier being looked up.
        identifier: String,
        /// The page that was scanned.
        page_url: String,
    },

    /// The content location served something other than a PDF (usually a captcha).
    #[error("expected a PDF from {url} but got '{content_type}'")]
    NotPdf {
        /// The content URL.
        url: String,
        /// The Content-Type the server sent.
        content_type: String,
    },

    /// A scraped content location could not be parsed as a URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// File system error while writing the artifact.
    #[error("IO error writing to {path}: {source}")]
    Write {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Creates an invalid-input error.
    pub fn invalid_input(input: impl Into<String>, source: ParseError) -> Self {
        Self::InvalidInput {
            input: input.into(),
            source,
        }
    }

    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Wraps a failed lookup request, keeping its HTTP status when there was one.
    pub fn lookup(identifier: impl Into<String>, provider: impl Into<String>, cause: &Self) -> Self {
        let status = match cause {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        };
        Self::Lookup {
            identifier: identifier.into(),
            provider: provider.into(),
            reason: cause.to_string(),
            status,
        }
    }

    /// Creates a not-found error.
    pub fn not_found(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing-content-location error.
    pub fn missing_content_location(
        identifier: impl Into<String>,
        page_url: impl Into<String>,
    ) -> Self {
        Self::MissingContentLocation {
            identifier: identifier.into(),
            page_url: page_url.into(),
        }
    }

    /// Creates a not-a-PDF error.
    pub fn not_pdf(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::NotPdf {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Maps the error onto the user-facing failure taxonomy.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidInput { .. } => FailureKind::Input,
            Self::Network { .. } | Self::Timeout { .. } => FailureKind::Network,
            Self::HttpStatus { status, .. } => status_kind(Some(*status)),
            Self::Lookup { status, .. } => status_kind(*status),
            Self::NotFound { .. }
            | Self::MissingContentLocation { .. }
            | Self::NotPdf { .. }
            | Self::InvalidUrl { .. } => FailureKind::NotFound,
            Self::Write { .. } => FailureKind::Write,
        }
    }
}

fn status_kind(status: Option<u16>) -> FailureKind {
    match status {
        Some(404 | 410) => FailureKind::NotFound,
        _ => FailureKind::Network,
    }
}
