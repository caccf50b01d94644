//! Sync engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Number of items per batch; a fixed tunable, not derived from data.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause between batches (rate-limit courtesy toward the remote API).
    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,
    /// A run whose failed-item count exceeds this ceiling is flagged
    /// prominently in the summary (it does not abort).
    #[serde(default = "default_failure_ceiling")]
    pub failure_ceiling: usize,
    /// Maximum retries for transient catalog errors.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Request timeout toward the remote catalog.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_batch_size() -> usize {
    10
}

fn default_batch_pause_ms() -> u64 {
    1000
}

fn default_failure_ceiling() -> usize {
    25
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_pause_ms: default_batch_pause_ms(),
            failure_ceiling: default_failure_ceiling(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SyncConfig {
    /// Inter-batch pause as a [`Duration`].
    #[must_use]
    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
