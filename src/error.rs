//! Crate-level error types.
//!
//! [`PlanbookError`] unifies every error source (configuration, storage,
//! HTTP) behind a single enum so callers can match on the variant they
//! care about while still using the `?` operator for easy propagation.
//!
//! Ingestion failures are deliberately *not* represented here: the sync and
//! import pipelines return their diagnostics as result values
//! ([`crate::ingest::sheet::SyncError`], [`crate::ingest::file::ImportError`])
//! so the host can present the text verbatim.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlanbookError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum PlanbookError {
    /// A configuration value could not be read or was malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A storage read or write failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// An HTTP request failed outright.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
