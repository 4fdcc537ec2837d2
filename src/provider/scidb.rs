//! Anna's Archive `SciDB` provider.
//!
//! Looks up `{base}/scidb/{doi}` and scans the page for the embedded PDF.
//! Only DOIs are accepted by the service.

use async_trait::async_trait;
use tracing::debug;

use crate::fetch::{FetchError, HttpClient};
use crate::parser::{IdKind, Identifier};

use super::{Provider, encode_path_segments, find_pdf_url};

/// Default `SciDB` host.
pub const DEFAULT_SCIDB_BASE_URL: &str = "https://annas-archive.org";

const PROVIDER_NAME: &str = "scidb";

/// `SciDB` lookup provider.
#[derive(Debug, Clone)]
pub struct ScidbProvider {
    base_url: String,
}

impl ScidbProvider {
    /// Creates a provider for the `SciDB` instance at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Lookup page URL for a DOI.
    #[must_use]
    pub fn lookup_url(&self, doi: &str) -> String {
        format!("{}/scidb/{}", self.base_url, encode_path_segments(doi))
    }
}

#[async_trait]
impl Provider for ScidbProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn can_handle(&self, identifier: &Identifier) -> bool {
        identifier.kind() == IdKind::Doi
    }

    #[tracing::instrument(skip(self, client), fields(provider = PROVIDER_NAME, id = %identifier.value()))]
    async fn locate(
        &self,
        client: &HttpClient,
        identifier: &Identifier,
    ) -> Result<String, FetchError> {
        let lookup_url = self.lookup_url(identifier.value());
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn test_scidb_lookup_url() {
        let provider = ScidbProvider::new("https://scidb.example/");
        assert_eq!(
            provider.lookup_url("10.1038/nature12373"),
            "https://scidb.example/scidb/10.1038/nature12373"
        );
    }

    #[test]
    fn test_scidb_handles_doi_only() {
        let provider = ScidbProvider::new(DEFAULT_SCIDB_BASE_URL);
        assert!(provider.can_handle(&Identifier::doi("10.1234/abc")));
        assert!(!provider.can_handle(&Identifier::new(IdKind::Pmid, "31452104")));
        assert!(!provider.can_handle(&Identifier::url("https://example.com/a")));
    }

    #[tokio::test]
    async fn test_scidb_locate_finds_embedded_pdf() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/scidb/10.1234/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><embed type="application/pdf" src="/files/abc.pdf"></html>"#,
            ))
            .mount(&mock_server)
            .await;

        let provider = ScidbProvider::new(&mock_server.uri());
        let location = provider
            .locate(&HttpClient::new(), &Identifier::doi("10.1234/abc"))
            .await
            .unwrap();
        assert_eq!(location, format!("{}/files/abc.pdf", mock_server.uri()));
    }

    #[tokio::test]
    async fn test_scidb_locate_404_is_lookup_not_found() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let provider = ScidbProvider::new(&mock_server.uri());
        let error = provider
            .locate(&HttpClient::new(), &Identifier::doi("10.1234/missing"))
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Lookup { status: Some(404), .. }));
        assert_eq!(error.kind(), crate::fetch::FailureKind::NotFound);
    }

    #[tokio::test]
    async fn test_scidb_locate_page_without_pdf() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>no such paper</html>"))
            .mount(&mock_server)
            .await;

        let provider = ScidbProvider::new(&mock_server.uri());
        let error = provider
            .locate(&HttpClient::new(), &Identifier::doi("10.1234/abc"))
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::MissingContentLocation { .. }));
    }
}
