//! Mirror providers that turn an identifier into a PDF content location.
//!
//! # Architecture
//!
//! - [`Provider`] - Async trait each lookup service implements
//! - [`ProviderRegistry`] - Ordered collection consulted by the fetcher
//! - [`DirectProvider`] - Direct PDF URLs are their own content location
//! - [`ScidbProvider`] - `{base}/scidb/{doi}` lookups (DOI only)
//! - [`ScihubProvider`] - `{mirror}/{identifier}` lookups, one per mirror
//!
//! # Example
//!
//! ```no_run
//! use papers_dl_core::fetch::HttpClient;
//! use papers_dl_core::parser::Identifier;
//! use papers_dl_core::provider::{ProviderSettings, build_default_registry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = build_default_registry(&ProviderSettings::default());
//! let client = HttpClient::new();
//! let id = Identifier::doi("10.1038/nature12373");
//! for provider in registry.find_handlers(&id) {
//!     if let Ok(location) = provider.locate(&client, &id).await {
//!         println!("{} -> {location}", provider.name());
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod direct;
mod html;
mod registry;
mod scidb;
mod scihub;

pub use direct::DirectProvider;
pub use html::{absolutize_url, find_pdf_url};
pub use registry::ProviderRegistry;
pub use scidb::{DEFAULT_SCIDB_BASE_URL, ScidbProvider};
pub use scihub::{DEFAULT_SCIHUB_MIRRORS, ScihubProvider};

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::debug;

use crate::fetch::{FetchError, HttpClient};
use crate::parser::Identifier;

/// Lookup services that can be enabled in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Anna's Archive `SciDB`.
    Scidb,
    /// Sci-Hub mirrors.
    Scihub,
}

impl ProviderKind {
    /// Configuration name of the provider.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scidb => "scidb",
            Self::Scihub => "scihub",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scidb" => Ok(Self::Scidb),
            "scihub" => Ok(Self::Scihub),
            other => Err(format!(
                "unknown provider '{other}' (expected scidb or scihub)"
            )),
        }
    }
}

/// Which providers to consult, in order, and where they live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Providers in consultation order.
    pub providers: Vec<ProviderKind>,
    /// Base URL of the `SciDB` service.
    pub scidb_base_url: String,
    /// Sci-Hub mirror base URLs, tried in order.
    pub scihub_mirrors: Vec<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            providers: vec![ProviderKind::Scidb, ProviderKind::Scihub],
            scidb_base_url: DEFAULT_SCIDB_BASE_URL.to_string(),
            scihub_mirrors: DEFAULT_SCIHUB_MIRRORS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Builds the registry consulted by the fetcher.
///
/// Direct PDF URLs are always handled first; configured lookup services
/// follow in configuration order, one Sci-Hub provider per mirror.
#[must_use]
pub fn build_default_registry(settings: &ProviderSettings) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(DirectProvider::new()));

    for kind in &settings.providers {
        match kind {
            ProviderKind::Scidb => {
                registry.register(Box::new(ScidbProvider::new(&settings.scidb_base_url)));
            }
            ProviderKind::Scihub => {
                if settings.scihub_mirrors.is_empty() {
                    debug!("scihub enabled but no mirrors configured");
                }
                for mirror in &settings.scihub_mirrors {
                    registry.register(Box::new(ScihubProvider::new(mirror)));
                }
            }
        }
    }
    registry
}

/// Trait that all providers must implement.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Box<dyn Provider>`; Rust 2024 native async traits are not object-safe.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider's name (e.g., "direct", "scidb", "scihub").
    fn name(&self) -> &str;

    /// Returns true if this provider accepts the identifier's kind.
    fn can_handle(&self, identifier: &Identifier) -> bool;

    /// Finds the URL the PDF can be downloaded from.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Lookup`] when the lookup page cannot be fetched
    /// and [`FetchError::MissingContentLocation`] when it names no PDF.
    async fn locate(&self, client: &HttpClient, identifier: &Identifier)
    -> Result<String, FetchError>;
}

/// Percent-encodes each `/`-separated segment of an identifier for use in a path.
pub(crate) fn encode_path_segments(value: &str) -> String {
    value
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
