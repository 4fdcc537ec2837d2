//! Sequential batch runs: resolve each query, fetch each identifier, report.
//!
//! One query's failure never stops the batch; it is logged and recorded in
//! the [`BatchReport`].

use std::path::Path;

use tracing::{info, warn};

use crate::fetch::{FetchError, FetchOutcome, Fetcher};
use crate::parser::Identifier;
use crate::resolver::IdentifierResolver;

/// Options shared by every query in a batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions<'a> {
    /// Directory artifacts are written to.
    pub output_dir: &'a Path,
    /// Filename override, applied only when a query yields exactly one identifier.
    pub name: Option<&'a str>,
}

/// Result for one identifier (or one query that produced none).
#[derive(Debug)]
pub struct BatchEntry {
    /// The query as given by the user.
    pub query: String,
    /// The identifier fetched, if resolution produced one.
    pub identifier: Option<Identifier>,
    /// What happened.
    pub result: Result<FetchOutcome, FetchError>,
}

impl BatchEntry {
    /// Returns true when the entry produced a file.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-entry outcomes of a batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// All entries in processing order.
    #[must_use]
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Number of files written.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }

    /// Number of failed entries.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.entries.len() - self.completed()
    }

    fn push(&mut self, entry: BatchEntry) {
        if let Err(error) = &entry.result {
            warn!(query = %entry.query, kind = %error.kind(), error = %error, "query failed");
        }
        self.entries.push(entry);
    }
}

/// Splits input-file text into queries.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
#[must_use]
pub fn read_queries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Resolves and fetches every query in order.
///
/// A query that resolves to nothing is recorded as a not-found failure.
#[tracing::instrument(skip_all, fields(queries = queries.len()))]
pub async fn run_batch(
    resolver: &IdentifierResolver,
    fetcher: &Fetcher,
    queries: &[String],
    options: BatchOptions<'_>,
) -> BatchReport {
    let mut report = BatchReport::default();

    for query in queries {
        let identifiers = match resolver.resolve(query).await {
            Ok(identifiers) => identifiers,
            Err(error) => {
                report.push(BatchEntry {
                    query: query.clone(),
                    identifier: None,
                    result: Err(error),
                });
                continue;
            }
        };

        if identifiers.is_empty() {
            report.push(BatchEntry {
                query: query.clone(),
                identifier: None,
                result: Err(FetchError::not_found(
                    query.as_str(),
                    "no identifiers found in page",
                )),
            });
            continue;
        }

        let name = match (options.name, identifiers.len()) {
            (Some(name), 1) => Some(name),
            (Some(_), count) => {
                warn!(query = %query, count, "--name ignored: query resolved to several identifiers");
                None
            }
            (None, _) => None,
        };

        for identifier in identifiers {
            let result = fetcher.fetch(&identifier, options.output_dir, name).await;
            report.push(BatchEntry {
                query: query.clone(),
                identifier: Some(identifier),
                result,
            });
        }
    }

    info!(
        completed = report.completed(),
        failed = report.failed(),
        "batch finished"
    );
    report
}
