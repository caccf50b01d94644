//! Feed source boundary.
//!
//! Feed acquisition and format parsing beyond JSON is out of scope; the
//! engine only requires a full current snapshot per fetch.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::warn;

use vitrine_core::{FeedRecord, MAX_IMAGES};

use crate::error::FeedError;

/// Supplies the full current vendor feed snapshot. No pagination cursor
/// semantics are exposed to the engine.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<FeedRecord>, FeedError>;
}

/// Feed source reading a JSON snapshot file (an array of feed records).
pub struct JsonFeedSource {
    path: PathBuf,
}

impl JsonFeedSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for JsonFeedSource {
    async fn fetch_all(&self) -> Result<Vec<FeedRecord>, FeedError> {
        let raw = tokio::fs::read(&self.path).await?;
        let mut records: Vec<FeedRecord> =
            serde_json::from_slice(&raw).map_err(|e| FeedError::Parse(e.to_string()))?;

        for record in &mut records {
            if record.content.images.len() > MAX_IMAGES {
                warn!(
                    business_key = %record.business_key,
                    count = record.content.images.len(),
                    "Feed record carries more than {MAX_IMAGES} images, truncating"
                );
                record.content.images.truncate(MAX_IMAGES);
            }
        }

        Ok(records)
    }
}

/// In-memory feed source with a fixed snapshot.
pub struct StaticFeedSource {
    records: Vec<FeedRecord>,
}

impl StaticFeedSource {
    #[must_use]
    pub fn new(records: Vec<FeedRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn fetch_all(&self) -> Result<Vec<FeedRecord>, FeedError> {
        Ok(self.records.clone())
    }
}
