//! Fetching: identifier + output directory → one PDF on disk.
//!
//! The [`Fetcher`] consults the provider registry in order, downloads the
//! first content location that serves a PDF, and writes it atomically under
//! a deterministic filename.

mod client;
mod constants;
mod error;
mod filename;
mod writer;

pub use client::{ClientOptions, HttpClient};
pub use constants::{CONNECT_TIMEOUT_SECS, MAX_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::{FailureKind, FetchError};
pub use filename::{filename_for_identifier, filename_from_name};
pub use writer::{partial_path_for, write_atomically};

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::parser::Identifier;
use crate::provider::{Provider, ProviderRegistry};

/// A successfully written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The identifier that was fetched.
    pub identifier: Identifier,
    /// Where the PDF was written.
    pub path: PathBuf,
    /// Size of the PDF in bytes.
    pub bytes: u64,
    /// Name of the provider that located the PDF.
    pub source: String,
}

/// Downloads papers through an ordered provider chain.
#[derive(Debug)]
pub struct Fetcher {
    client: HttpClient,
    registry: ProviderRegistry,
}

impl Fetcher {
    /// Creates a fetcher over `registry`, sharing `client` for every request.
    #[must_use]
    pub fn new(client: HttpClient, registry: ProviderRegistry) -> Self {
        Self { client, registry }
    }

    /// Fetches `identifier` into `output_dir`.
    ///
    /// The file is named from `name` when given (sanitized, `.pdf` appended),
    /// otherwise from the identifier. An existing file with that name is
    /// replaced.
    ///
    /// Providers that accept the identifier are tried in order. A provider
    /// failure moves on to the next one, except for filesystem errors, which
    /// stop the chain. When every provider fails, the last error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] when no provider accepts the
    /// identifier, [`FetchError::Write`] when the file cannot be written,
    /// and otherwise the error of the last provider attempted.
    #[tracing::instrument(skip(self, output_dir), fields(id = %identifier))]
    pub async fn fetch(
        &self,
        identifier: &Identifier,
        output_dir: &Path,
        name: Option<&str>,
    ) -> Result<FetchOutcome, FetchError> {
        let filename = match name {
            Some(requested) => filename_from_name(requested).unwrap_or_else(|| {
                warn!(name = %requested, "unusable --name; using identifier-derived filename");
                filename_for_identifier(identifier)
            }),
            None => filename_for_identifier(identifier),
        };
        let dest = output_dir.join(filename);

        let handlers = self.registry.find_handlers(identifier);
        if handlers.is_empty() {
            return Err(FetchError::not_found(
                identifier.value(),
                format!("no provider accepts {} identifiers", identifier.kind()),
            ));
        }

        let mut last_error = None;
        for provider in handlers {
            debug!(provider = provider.name(), "trying provider");
            match self.try_provider(provider, identifier, &dest).await {
                Ok(bytes) => {
                    info!(
                        provider = provider.name(),
                        path = %dest.display(),
                        bytes,
                        "paper fetched"
                    );
                    return Ok(FetchOutcome {
                        identifier: identifier.clone(),
                        path: dest,
                        bytes,
                        source: provider.name().to_string(),
                    });
                }
                Err(error @ FetchError::Write { .. }) => return Err(error),
                Err(error) => {
                    debug!(provider = provider.name(), error = %error, "provider failed");
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            FetchError::not_found(identifier.value(), "every provider failed")
        }))
    }

    async fn try_provider(
        &self,
        provider: &dyn Provider,
        identifier: &Identifier,
        dest: &Path,
    ) -> Result<u64, FetchError> {
        let location = provider.locate(&self.client, identifier).await?;
        self.client.download_pdf(&location, dest).await
    }
}
