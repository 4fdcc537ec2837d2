//! Sci-Hub mirror provider.
//!
//! Each configured mirror is registered as its own provider so the fetcher
//! moves on to the next mirror when one fails.

use async_trait::async_trait;
use tracing::debug;

use crate::fetch::{FetchError, HttpClient};
use crate::parser::{IdKind, Identifier, is_direct_pdf_url};

use super::{Provider, encode_path_segments, find_pdf_url};

/// Mirrors used when the configuration does not list any.
pub const DEFAULT_SCIHUB_MIRRORS: [&str; 3] =
    ["https://sci-hub.se", "https://sci-hub.st", "https://sci-hub.ru"];

const PROVIDER_NAME: &str = "scihub";

/// Lookup provider for one Sci-Hub mirror.
#[derive(Debug, Clone)]
pub struct ScihubProvider {
    mirror: String,
}

impl ScihubProvider {
    /// Creates a provider for the mirror at `mirror`.
    #[must_use]
    pub fn new(mirror: &str) -> Self {
        Self {
            mirror: mirror.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Mirror base URL.
    #[must_use]
    pub fn mirror(&self) -> &str {
        &self.mirror
    }

    /// Lookup page URL for an identifier.
    ///
    /// URLs are appended verbatim; the mirror parses them itself.
    #[must_use]
    pub fn lookup_url(&self, identifier: &Identifier) -> String {
        let tail = match identifier.kind() {
            IdKind::Url => identifier.value().to_string(),
            _ => encode_path_segments(identifier.value()),
        };
        format!("{}/{tail}", self.mirror)
    }
}

#[async_trait]
impl Provider for ScihubProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn can_handle(&self, identifier: &Identifier) -> bool {
        match identifier.kind() {
            IdKind::Doi | IdKind::Pmid => true,
            IdKind::Url => !is_direct_pdf_url(identifier.value()),
            IdKind::Isbn => false,
        }
    }

    #[tracing::instrument(skip(self, client), fields(provider = PROVIDER_NAME, mirror = %self.mirror, id = %identifier.value()))]
    async fn locate(
        &self,
        client: &HttpClient,
        identifier: &Identifier,
    ) -> Result<String, FetchError> {
        let lookup_url = self.lookup_url(identifier);
        let (page_url, body) = client
            .get_text(&lookup_url)
            .await
            .map_err(|e| FetchError::lookup(identifier.value(), PROVIDER_NAME, &e))?;

        let location = find_pdf_url(&body, &page_url).ok_or_else(|| {
            FetchError::missing_content_location(identifier.value(), page_url.as_str())
        })?;
        debug!(location = %location, "content location found");
        Ok(location)
    }
}
