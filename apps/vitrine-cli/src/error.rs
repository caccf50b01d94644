//! CLI error types and exit codes

use thiserror::Error;
use vitrine_sync::{CatalogError, SyncError};

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication error
/// - 3: Network error
/// - 4: Validation / not-found error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Sync failed: {0}")]
    Sync(String),

    #[error("Failure ceiling exceeded: {failed} item(s) failed this run")]
    FailureCeiling { failed: usize },

    #[error("I/O error: {0}")]
    Io(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Auth(_) => 2,
            CliError::Network(_) => 3,
            CliError::Validation(_) | CliError::NotFound(_) => 4,
            CliError::Api { status, .. } => {
                if *status >= 500 {
                    5
                } else if *status == 401 || *status == 403 {
                    2
                } else {
                    4
                }
            }
            CliError::Config(_)
            | CliError::Database(_)
            | CliError::Feed(_)
            | CliError::Sync(_)
            | CliError::FailureCeiling { .. }
            | CliError::Io(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {self}");
        } else {
            eprintln!("Error: {self}");
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {suggestion}");
            } else {
                eprintln!("\nSuggestion: {suggestion}");
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Auth(_) => {
                Some("Check VITRINE_API_TOKEN and the token's permissions in the storefront admin.")
            }
            CliError::Network(_) => Some("Check your network connection and try again."),
            CliError::FailureCeiling { .. } => {
                Some("Inspect the logged failures, then re-run 'vitrine retry'.")
            }
            CliError::NotFound(_) => Some("Run 'vitrine analyze' to see what the feed carries."),
            _ => None,
        }
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Catalog(catalog) => match catalog {
                CatalogError::Transport(e) => CliError::Network(e.to_string()),
                CatalogError::Auth(msg) => CliError::Auth(msg),
                CatalogError::RateLimited { .. } => {
                    CliError::Network("rate limited by remote catalog".into())
                }
                CatalogError::Api { status, detail } => CliError::Api {
                    status,
                    message: detail,
                },
                CatalogError::NotFound(msg) => CliError::NotFound(msg),
                CatalogError::InvalidConfig(msg) => CliError::Config(msg),
                other => CliError::Sync(other.to_string()),
            },
            SyncError::Store(store) => CliError::Database(store.to_string()),
            SyncError::Feed(feed) => CliError::Feed(feed.to_string()),
            SyncError::Validation { message } => CliError::Validation(message),
            SyncError::ItemNotFound { key } => {
                CliError::NotFound(format!("no item with key '{key}' in the local store"))
            }
        }
    }
}
