//! Identifier resolution: user query → zero or more paper identifiers.
//!
//! Queries that already are identifiers (DOI, PMID, ISBN, direct PDF URL)
//! pass through unchanged. `doi.org` links are unwrapped offline. Any other
//! http(s) URL is fetched once and its markup scanned for identifiers.
//!
//! # Example
//!
//! ```no_run
//! use papers_dl_core::fetch::HttpClient;
//! use papers_dl_core::resolver::IdentifierResolver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = IdentifierResolver::new(HttpClient::new());
//! for id in resolver.resolve("https://journal.example/article/42").await? {
//!     println!("{id}");
//! }
//! # Ok(())
//! # }
//! ```

use tracing::{debug, instrument};

use crate::fetch::{FetchError, HttpClient};
use crate::parser::{
    IdKind, Identifier, doi_from_resolver_url, parse_ids_from_text, validate_url,
};

/// Identifier kinds scanned for in fetched pages unless configured otherwise.
pub const DEFAULT_MATCH_KINDS: [IdKind; 1] = [IdKind::Doi];

/// Turns queries into identifiers, fetching pages when needed.
#[derive(Debug, Clone)]
pub struct IdentifierResolver {
    client: HttpClient,
    match_kinds: Vec<IdKind>,
}

impl IdentifierResolver {
    /// Creates a resolver that scans pages for DOIs.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            match_kinds: DEFAULT_MATCH_KINDS.to_vec(),
        }
    }

    /// Sets the identifier kinds scanned for in fetched pages.
    ///
    /// An empty list keeps the default.
    #[must_use]
    pub fn with_match_kinds(mut self, kinds: Vec<IdKind>) -> Self {
        if !kinds.is_empty() {
            self.match_kinds = kinds;
        }
        self
    }

    /// Kinds scanned for in fetched pages.
    #[must_use]
    pub fn match_kinds(&self) -> &[IdKind] {
        &self.match_kinds
    }

    /// Resolves `input` into identifiers.
    ///
    /// Bare identifiers come back as a single-element list with the trimmed
    /// value unchanged. Pages without identifiers yield an empty list. At
    /// most one network request is made.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidInput`] when `input` is neither an
    /// identifier nor an http(s) URL, and the request errors of
    /// [`HttpClient::get_text`] when the page cannot be fetched.
    #[instrument(skip(self), fields(match_kinds = ?self.match_kinds))]
    pub async fn resolve(&self, input: &str) -> Result<Vec<Identifier>, FetchError> {
        let trimmed = input.trim();

        if let Some(identifier) = Identifier::parse(trimmed) {
            debug!(kind = %identifier.kind(), "input is a bare identifier");
            return Ok(vec![identifier]);
        }

        if let Some(doi) = doi_from_resolver_url(trimmed) {
            debug!(doi = %doi, "input is a DOI resolver link");
            return Ok(vec![Identifier::doi(doi)]);
        }

        let url = validate_url(trimmed).map_err(|e| FetchError::invalid_input(trimmed, e))?;
        let (_, body) = self.client.get_text(&url).await?;
        let identifiers = parse_ids_from_text(&body, &self.match_kinds);
        debug!(count = identifiers.len(), "identifiers scanned from page");
        Ok(identifiers)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn resolver() -> IdentifierResolver {
        IdentifierResolver::new(HttpClient::new())
    }

    #[tokio::test]
    async fn test_resolve_bare_identifiers_unchanged() {
        let resolver = resolver();
        for (input, kind) in [
            ("10.1038/nature12373", IdKind::Doi),
            ("31452104", IdKind::Pmid),
            ("978-0-306-40615-7", IdKind::Isbn),
            ("https://example.com/paper.pdf", IdKind::Url),
        ] {
            let ids = resolver.resolve(input).await.unwrap();
            assert_eq!(ids, vec![Identifier::new(kind, input)], "input: {input}");
        }
    }

    #[tokio::test]
    async fn test_resolve_trims_whitespace() {
        let ids = resolver().resolve("  10.1234/abc \n").await.unwrap();
        assert_eq!(ids[0].value(), "10.1234/abc");
    }

    #[tokio::test]
    async fn test_resolve_doi_org_link_offline() {
        let ids = resolver()
            .resolve("https://doi.org/10.1038/nature12373")
            .await
            .unwrap();
        assert_eq!(ids, vec![Identifier::doi("10.1038/nature12373")]);
    }

    #[tokio::test]
    async fn test_resolve_rejects_non_url_text() {
        let error = resolver().resolve("not an identifier").await.unwrap_err();
        assert!(matches!(error, FetchError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_resolve_scans_page_for_dois() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<meta name="citation_doi" content="10.1234/first">
                   <a href="https://doi.org/10.5678/second">ref</a>
                   <p>see also 10.1234/first</p>"#,
            ))
            .mount(&mock_server)
            .await;

        let ids = resolver()
            .resolve(&format!("{}/article", mock_server.uri()))
            .await
            .unwrap();
        let values: Vec<&str> = ids.iter().map(Identifier::value).collect();
        assert_eq!(values, vec!["10.5678/second", "10.1234/first"]);
    }

    #[tokio::test]
    async fn test_resolve_page_links_with_query_and_fragment() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/landing"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<meta name="citation_doi" content="10.1234/abc">
                   <a href="/doi/pdf/10.1234/abc?download=true">PDF</a>
                   <a href="https://doi.org/10.1234/abc#ref">cite</a>
                   <a href="/doi/full/10.1234/abc?page=1&amp;sort=asc">full</a>"#,
            ))
            .mount(&mock_server)
            .await;

        let ids = resolver()
            .resolve(&format!("{}/landing", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(ids, vec![Identifier::doi("10.1234/abc")]);
    }

    #[tokio::test]
    async fn test_resolve_labelled_and_sici_queries_offline() {
        let resolver = resolver();
        let sici = "10.1002/(SICI)1097-4636(199911)47:2<154::AID-JBM4>3.0.CO;2-Z";
        assert_eq!(resolver.resolve(sici).await.unwrap(), vec![Identifier::doi(sici)]);
        assert_eq!(
            resolver.resolve("doi:10.1038/nature12373").await.unwrap(),
            vec![Identifier::doi("10.1038/nature12373")]
        );
        assert_eq!(
            resolver.resolve("PMID:31452104").await.unwrap(),
            vec![Identifier::new(IdKind::Pmid, "31452104")]
        );
    }

    #[tokio::test]
    async fn test_resolve_page_without_identifiers_is_empty() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nothing</html>"))
            .mount(&mock_server)
            .await;

        let ids = resolver().resolve(&mock_server.uri()).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_page_error_status() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let error = resolver().resolve(&mock_server.uri()).await.unwrap_err();
        assert!(matches!(error, FetchError::HttpStatus { status: 500, .. }));
    }

    #[test]
    fn test_with_match_kinds_empty_keeps_default() {
        let resolver = resolver().with_match_kinds(Vec::new());
        assert_eq!(resolver.match_kinds(), &DEFAULT_MATCH_KINDS);
    }
}
