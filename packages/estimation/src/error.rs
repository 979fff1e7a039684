//! Typed errors for the estimation library.
//!
//! The pure stages (normalize, extract, score, reconcile) are total and never
//! fail. Errors only arise at the snippet source seam and when validating
//! configuration.

use thiserror::Error;

/// Errors surfaced by the estimation library.
#[derive(Debug, Error)]
pub enum EstimationError {
    /// Snippet source failed
    #[error("snippet source failed: {0}")]
    Source(#[from] SourceError),

    /// Configuration value out of range
    #[error("invalid config: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Errors raised while fetching snippets for a query.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Upstream answered with a non-success status
    #[error("upstream returned status {status} for query: {query}")]
    Status { status: u16, query: String },

    /// Response body could not be interpreted
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Connection timeout
    #[error("timeout searching: {query}")]
    Timeout { query: String },
}

impl EstimationError {
    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for estimation operations.
pub type Result<T> = std::result::Result<T, EstimationError>;

/// Result type alias for snippet source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;
