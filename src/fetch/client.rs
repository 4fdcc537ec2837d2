//! HTTP client wrapper for lookup pages and PDF downloads.
//!
//! A single [`HttpClient`] is built per run and shared by the resolver and
//! every provider, so connection pooling and timeouts apply uniformly.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, PDF_CONTENT_TYPE, READ_TIMEOUT_SECS};
use super::error::FetchError;
use super::writer::write_atomically;
use crate::user_agent;

/// Settings applied when building the shared client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds, including the body.
    pub read_timeout_secs: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: user_agent::default_user_agent(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// HTTP client for page lookups and streaming PDF downloads.
///
/// # Example
///
/// ```no_run
/// use papers_dl_core::fetch::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let bytes = client
///     .download_pdf("https://example.com/paper.pdf", Path::new("./paper.pdf"))
///     .await?;
/// println!("wrote {bytes} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with the default User-Agent and timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_options(&ClientOptions::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a client from explicit options.
    ///
    /// # Errors
    ///
    /// Returns the builder error, e.g. for a User-Agent that is not a valid
    /// header value.
    pub fn with_options(options: &ClientOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(options.connect_timeout_secs))
            .timeout(Duration::from_secs(options.read_timeout_secs))
            .gzip(true)
            .user_agent(options.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    /// Fetches a page and returns its final URL (after redirects) and body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for invalid URLs, network failures, timeouts,
    /// and non-success status codes.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_text(&self, url: &str) -> Result<(Url, String), FetchError> {
        let response = self.send_get(url).await?;
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(url, e))?;
        debug!(final_url = %final_url, bytes = body.len(), "page fetched");
        Ok((final_url, body))
    }

    /// Downloads a PDF from `url` into `dest`, returning the byte count.
    ///
    /// Responses whose `Content-Type` is not `application/pdf` are rejected
    /// before anything is written. The body is written atomically.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotPdf`] for non-PDF responses, the request
    /// errors of [`get_text`](Self::get_text), and [`FetchError::Write`]
    /// for filesystem failures.
    #[instrument(skip(self, dest), fields(url = %url, dest = %dest.display()))]
    pub async fn download_pdf(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self.send_get(url).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_pdf_content_type(&content_type) {
            debug!(content_type = %content_type, "content location did not serve a PDF");
            return Err(FetchError::not_pdf(url, content_type));
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| FetchError::network(url, e)));
        let bytes = write_atomically(chunks, dest).await?;

        info!(path = %dest.display(), bytes, "download complete");
        Ok(bytes)
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }
}

fn is_pdf_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
}
