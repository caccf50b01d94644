//! Per-item lifecycle status.
//!
//! Status is a closed enumeration with exhaustive matching at every
//! transition site; it is never compared as a string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a catalog item in the local system-of-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Present locally, never published to the remote catalog.
    NewWaitingPublish,
    /// Live on the remote catalog and in sync at last attempt.
    Published,
    /// Publish attempt failed before a remote product existed.
    PublishFailed,
    /// Update attempt failed; the remote product id is preserved.
    UpdateFailed,
}

impl ItemStatus {
    /// Whether this status marks a failed attempt that a later run may retry.
    #[must_use]
    pub fn is_retryable_failure(self) -> bool {
        matches!(self, ItemStatus::PublishFailed | ItemStatus::UpdateFailed)
    }

    /// Whether a record in this status is allowed to carry a remote product id.
    ///
    /// A record with no remote id must never be treated as existing by the
    /// reconcile operations, and vice versa.
    #[must_use]
    pub fn allows_remote_id(self) -> bool {
        matches!(self, ItemStatus::Published | ItemStatus::UpdateFailed)
    }

    /// All retryable failure statuses, in query order.
    #[must_use]
    pub fn retryable_failures() -> [ItemStatus; 2] {
        [ItemStatus::PublishFailed, ItemStatus::UpdateFailed]
    }

    /// Stable string form used for persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::NewWaitingPublish => "new_waiting_publish",
            ItemStatus::Published => "published",
            ItemStatus::PublishFailed => "publish_failed",
            ItemStatus::UpdateFailed => "update_failed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a persisted status string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for ItemStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_waiting_publish" => Ok(ItemStatus::NewWaitingPublish),
            "published" => Ok(ItemStatus::Published),
            "publish_failed" => Ok(ItemStatus::PublishFailed),
            "update_failed" => Ok(ItemStatus::UpdateFailed),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_failures() {
        assert!(ItemStatus::PublishFailed.is_retryable_failure());
        assert!(ItemStatus::UpdateFailed.is_retryable_failure());
        assert!(!ItemStatus::Published.is_retryable_failure());
        assert!(!ItemStatus::NewWaitingPublish.is_retryable_failure());
    }

    #[test]
    fn test_remote_id_allowance() {
        assert!(ItemStatus::Published.allows_remote_id());
        assert!(ItemStatus::UpdateFailed.allows_remote_id());
        assert!(!ItemStatus::NewWaitingPublish.allows_remote_id());
        assert!(!ItemStatus::PublishFailed.allows_remote_id());
    }

    #[test]
    fn test_string_round_trip() {
        for status in [
            ItemStatus::NewWaitingPublish,
            ItemStatus::Published,
            ItemStatus::PublishFailed,
            ItemStatus::UpdateFailed,
        ] {
            assert_eq!(status.as_str().parse::<ItemStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_parse_unknown_status() {
        let err = "FAILED".parse::<ItemStatus>().unwrap_err();
        assert_eq!(err, InvalidStatus("FAILED".to_string()));
    }
}
