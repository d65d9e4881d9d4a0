//! Shared error type for the retrieval pipeline.

use thiserror::Error;

/// Errors surfaced by ingestion, embedding, and storage operations.
///
/// Chunking and normalization are pure and infallible; only the
/// I/O-adjacent edges of the pipeline produce these. Errors propagate
/// unrecovered to the caller — no operation in this crate retries.
#[derive(Debug, Error)]
pub enum RagError {
    /// A document source with an extension the loader does not handle.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// A persisted artifact required by `load` is missing.
    #[error("persisted artifact not found: {0}")]
    NotFound(String),

    /// Persisted state that exists but cannot be trusted.
    ///
    /// Missing metadata fields are corrupt rather than defaultable: an
    /// embedding-model substitution would silently change similarity
    /// semantics for every subsequent query.
    #[error("corrupt persisted state: {0}")]
    Corrupt(String),

    /// A source record that could not be decoded.
    #[error("malformed source record: {0}")]
    Parse(String),

    /// Embedding provider initialization or invocation failure.
    #[error("embedding provider error: {0}")]
    Embedding(String),

    /// Transport failure while talking to a remote embedding endpoint.
    #[error("http error: {0}")]
    Http(String),

    /// Filesystem failure while reading sources or writing artifacts.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RagError {
    fn from(err: std::io::Error) -> Self {
        RagError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for RagError {
    fn from(err: reqwest::Error) -> Self {
        RagError::Http(err.to_string())
    }
}
