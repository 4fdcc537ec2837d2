//! Constants for the fetch module (timeouts).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Longest accepted timeout from configuration (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// MIME type a content location must serve.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
