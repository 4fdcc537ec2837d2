//! Direct PDF URL provider - the URL is its own content location.

use async_trait::async_trait;

use crate::fetch::{FetchError, HttpClient};
use crate::parser::{IdKind, Identifier, is_direct_pdf_url};

use super::Provider;

/// A provider that passes direct PDF URLs through unchanged.
#[derive(Debug)]
pub struct DirectProvider;

impl DirectProvider {
    /// Creates a new `DirectProvider`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DirectProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for DirectProvider {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn can_handle(&self, identifier: &Identifier) -> bool {
        identifier.kind() == IdKind::Url && is_direct_pdf_url(identifier.value())
    }

    #[tracing::instrument(skip(self, _client), fields(provider = "direct"))]
    async fn locate(
        &self,
        _client: &HttpClient,
        identifier: &Identifier,
    ) -> Result<String, FetchError> {
        Ok(identifier.value().to_string())
    }
}
