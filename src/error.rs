//! Error types for edge-inspector

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of probe execution
///
/// Probe-internal failures never appear here: every probe converts them
/// into a `fail`-status [`crate::ProbeResult`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid target URL provided
    #[error("{0}")]
    InvalidUrl(String),

    /// Failed to create HTTP client
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    /// Invalid output format specified
    #[error("invalid output format: '{0}' (valid: human, json, none)")]
    InvalidOutputFormat(String),

    /// Output operation failed
    #[error("output failed: {0}")]
    OutputFailed(#[source] std::io::Error),

    /// JSON serialization failed
    #[error("JSON serialization failed")]
    SerializationFailed(#[from] serde_json::Error),
}
