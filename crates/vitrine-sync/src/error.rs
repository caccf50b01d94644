//! Error taxonomy for the sync engine.
//!
//! Three boundary errors (catalog, store, feed) with an umbrella
//! `SyncError` on top. Classification drives the orchestrator's policy:
//! transient and structural errors are caught at the per-item boundary
//! and become a status transition plus a log entry; fatal errors abort
//! the whole run.

use thiserror::Error;

/// Errors from the remote catalog API boundary.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Remote rate limit hit.
    #[error("rate limited by remote catalog")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Authentication or authorization rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Remote API returned an error status.
    #[error("catalog API error (status {status}): {detail}")]
    Api { status: u16, detail: String },

    /// A required remote object (variant, inventory item) is missing or
    /// malformed; retryable at item level but indicates an upstream
    /// data-quality problem.
    #[error("structural error: {0}")]
    Structural(String),

    /// Client-side configuration is unusable.
    #[error("invalid catalog configuration: {0}")]
    InvalidConfig(String),

    /// Response body could not be parsed.
    #[error("failed to parse catalog response: {0}")]
    Parse(String),

    /// Gave up after exhausting the retry budget.
    #[error("max retries exceeded after {attempts} attempt(s): {message}")]
    MaxRetriesExceeded { attempts: u32, message: String },
}

impl CatalogError {
    /// Whether a retried attempt has a chance of succeeding.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::Transport(_) | CatalogError::RateLimited { .. }
        )
    }

    /// Whether this is a server-side (5xx) error.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, CatalogError::Api { status, .. } if *status >= 500)
    }

    /// Fatal errors abort the whole run: subsequent calls would fail
    /// identically.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CatalogError::Auth(_) | CatalogError::InvalidConfig(_)
        )
    }

    /// Whether this marks a missing remote object.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }

    /// Structural errors are logged at higher severity than plain
    /// transient failures.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, CatalogError::Structural(_))
    }
}

/// Errors from the local item store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store database error: {0}")]
    Database(String),

    #[error("item not found in store: {key}")]
    NotFound { key: String },

    #[error("store serialization error: {0}")]
    Serialization(String),
}

/// Errors from the feed source boundary.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed parse error: {0}")]
    Parse(String),
}

/// Umbrella error for sync runs.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    /// A required parameter was missing or malformed; surfaced before
    /// any remote call is made.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Single-item mode referenced a business key the store does not hold.
    #[error("item not found: {key}")]
    ItemNotFound { key: String },
}

impl SyncError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error must abort the run instead of being isolated
    /// to one item.
    ///
    /// Store failures are fatal: a status write that did not land would
    /// break crash-resume accounting. Feed failures happen before any
    /// per-item work.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            SyncError::Catalog(e) => e.is_fatal(),
            SyncError::Store(_) | SyncError::Feed(_) => true,
            SyncError::Validation { .. } | SyncError::ItemNotFound { .. } => true,
        }
    }
}

/// Result alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
