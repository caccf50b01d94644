//! Run modes: full sync, single item, retry, analyze, and stage.
//!
//! The controller decides what work a run performs; the orchestrator only
//! executes the list it is handed.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use vitrine_core::{compare_business_keys, compute_change_set, Item, ItemStatus};

use crate::error::{SyncError, SyncResult};
use crate::feed::FeedSource;
use crate::orchestrator::{SyncOrchestrator, SyncSummary};
use crate::store::ItemStore;

/// What a full sync would do, without doing it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalyzeReport {
    pub new_keys: Vec<String>,
    pub changed_keys: Vec<String>,
    pub deleted_keys: Vec<String>,
    pub unchanged: usize,
}

impl AnalyzeReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_keys.is_empty() && self.changed_keys.is_empty() && self.deleted_keys.is_empty()
    }
}

/// Outcome of a database-only staging pass.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct StageSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Records removed locally; their remote products are left untouched.
    pub deleted: usize,
}

/// Builds work lists per mode and hands them to the orchestrator.
pub struct ModeController {
    feed: Arc<dyn FeedSource>,
    store: Arc<dyn ItemStore>,
    orchestrator: SyncOrchestrator,
}

impl ModeController {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        store: Arc<dyn ItemStore>,
        orchestrator: SyncOrchestrator,
    ) -> Self {
        Self {
            feed,
            store,
            orchestrator,
        }
    }

    /// Full feed-against-store sync. With `force` every item in the feed is
    /// treated as changed and every facet is resent.
    #[instrument(skip(self))]
    pub async fn sync(&self, force: bool) -> SyncResult<SyncSummary> {
        let records = self.feed.fetch_all().await?;
        let stored = self.store.find_all().await?;
        let change_set = compute_change_set(force, &stored, &records);

        info!(
            new = change_set.new_items.len(),
            changed = change_set.changed_items.len(),
            deleted = change_set.deleted_items.len(),
            unchanged = change_set.unchanged,
            "Change set computed"
        );

        self.orchestrator.apply(change_set, force).await
    }

    /// Converge a single stored item, resending every facet. Fails before
    /// any remote call when the store does not hold the key.
    #[instrument(skip(self))]
    pub async fn sync_item(&self, business_key: &str) -> SyncResult<SyncSummary> {
        let item = self
            .store
            .find_by_key(business_key)
            .await?
            .ok_or_else(|| SyncError::ItemNotFound {
                key: business_key.to_string(),
            })?;

        self.orchestrator
            .run_work(vec![item.to_feed_record()], Vec::new(), 0, true)
            .await
    }

    /// Re-run failed items that already hold a remote product id, routing
    /// them through update. Failures without a remote id never created a
    /// product, so they re-enter through publish instead (forced or
    /// single-item runs). The work list is rebuilt from the stored content,
    /// which already carries the most recent feed version of each item.
    #[instrument(skip(self))]
    pub async fn retry_failed(&self) -> SyncResult<SyncSummary> {
        let mut failed: Vec<Item> = Vec::new();
        for status in ItemStatus::retryable_failures() {
            failed.extend(self.store.find_by_status(status).await?);
        }
        failed.retain(|item| item.remote_product_id.is_some());

        let mut work: Vec<_> = failed.iter().map(Item::to_feed_record).collect();
        work.sort_by(|a, b| compare_business_keys(&a.business_key, &b.business_key));

        info!(count = work.len(), "Retrying failed items");
        self.orchestrator.run_work(work, Vec::new(), 0, true).await
    }

    /// Report what a non-forced sync would do. Read-only.
    #[instrument(skip(self))]
    pub async fn analyze(&self) -> SyncResult<AnalyzeReport> {
        let records = self.feed.fetch_all().await?;
        let stored = self.store.find_all().await?;
        let change_set = compute_change_set(false, &stored, &records);

        let sorted_keys = |mut keys: Vec<String>| {
            keys.sort_by(|a, b| compare_business_keys(a, b));
            keys
        };

        Ok(AnalyzeReport {
            new_keys: sorted_keys(
                change_set
                    .new_items
                    .iter()
                    .map(|r| r.business_key.clone())
                    .collect(),
            ),
            changed_keys: sorted_keys(
                change_set
                    .changed_items
                    .iter()
                    .map(|c| c.incoming.business_key.clone())
                    .collect(),
            ),
            deleted_keys: sorted_keys(
                change_set
                    .deleted_items
                    .iter()
                    .map(|i| i.business_key.clone())
                    .collect(),
            ),
            unchanged: change_set.unchanged,
        })
    }

    /// Stage the feed into the store without remote calls. New items land
    /// as `NewWaitingPublish`, changed items absorb the new content while
    /// keeping their status and linkage, and feed-absent items are removed
    /// locally only, orphaning any remote product they still point at.
    #[instrument(skip(self))]
    pub async fn stage(&self) -> SyncResult<StageSummary> {
        let records = self.feed.fetch_all().await?;
        let stored = self.store.find_all().await?;
        let change_set = compute_change_set(false, &stored, &records);

        let mut summary = StageSummary {
            unchanged: change_set.unchanged,
            ..StageSummary::default()
        };

        for record in change_set.new_items {
            let item = Item::from_feed(record);
            self.store.save(&item).await?;
            summary.inserted += 1;
        }

        for changed in change_set.changed_items {
            let mut item = changed.stored;
            item.absorb_content(changed.incoming.content);
            self.store.update(&item).await?;
            summary.updated += 1;
        }

        for item in change_set.deleted_items {
            if let Some(product_id) = &item.remote_product_id {
                warn!(
                    business_key = %item.business_key,
                    product_id = %product_id,
                    "Staged deletion orphans a remote product"
                );
            }
            self.store.delete(&item.business_key).await?;
            summary.deleted += 1;
        }

        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            unchanged = summary.unchanged,
            deleted = summary.deleted,
            "Staging finished"
        );
        Ok(summary)
    }
}
