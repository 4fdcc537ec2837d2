//! papers-dl Core Library
//!
//! This library provides the core functionality for the `papers-dl` tool,
//! which turns paper identifiers (DOIs, PMIDs, ISBNs) and article URLs into
//! PDFs on disk by way of mirror lookup services.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Identifier patterns (DOI, ISBN, PMID, URL) and text scanning
//! - [`resolver`] - Query → identifiers, fetching and scanning pages when needed
//! - [`provider`] - Mirror lookup services that locate a PDF for an identifier
//! - [`fetch`] - HTTP client, provider chain, and atomic PDF writes
//! - [`batch`] - Sequential resolve/fetch over many queries with a report

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod fetch;
pub mod parser;
pub mod provider;
pub mod resolver;
pub(crate) mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use batch::{BatchEntry, BatchOptions, BatchReport, read_queries, run_batch};
pub use fetch::{ClientOptions, FailureKind, FetchError, FetchOutcome, Fetcher, HttpClient};
pub use parser::{IdKind, Identifier, OutputFormat, ParseError, format_output, parse_ids_from_text};
pub use provider::{ProviderKind, ProviderSettings, build_default_registry};
pub use resolver::IdentifierResolver;
pub use user_agent::default_user_agent;
