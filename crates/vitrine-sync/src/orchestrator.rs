//! Batch execution of a reconciliation work list.
//!
//! Items are processed in business-key order, in batches, with a pause
//! between batches so the backend's rate limits are never brushed. One
//! item failing never stops the run; only fatal errors do. Crossing the
//! operator's failure ceiling is flagged on the summary, not thrown.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use vitrine_core::{ChangeSet, FeedRecord, Item};

use crate::catalog::CatalogApi;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::reconcile::Reconciler;
use crate::retry::RetryPolicy;
use crate::store::ItemStore;

/// Counters for one sync run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SyncSummary {
    /// Identifier tying together the log lines of one run.
    pub run_id: Uuid,
    pub processed: usize,
    pub published: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failed: usize,
    pub unchanged: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SyncSummary {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            processed: 0,
            published: 0,
            updated: 0,
            deleted: 0,
            failed: 0,
            unchanged: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Fraction of processed items that succeeded, 1.0 for an empty run.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            (self.processed - self.failed) as f64 / self.processed as f64
        }
    }

    #[must_use]
    pub fn over_failure_ceiling(&self, ceiling: usize) -> bool {
        self.failed >= ceiling
    }
}

/// Drives publish, update, and delete operations over a work list.
pub struct SyncOrchestrator {
    reconciler: Reconciler,
    store: Arc<dyn ItemStore>,
    config: SyncConfig,
}

impl SyncOrchestrator {
    pub fn new(catalog: Arc<dyn CatalogApi>, store: Arc<dyn ItemStore>, config: SyncConfig) -> Self {
        let retry = RetryPolicy::new(config.max_retries, 1);
        let reconciler = Reconciler::new(catalog, Arc::clone(&store), retry);
        Self {
            reconciler,
            store,
            config,
        }
    }

    /// Apply a computed change set: publish and update in batches, then
    /// process deletions.
    pub async fn apply(&self, change_set: ChangeSet, force_all: bool) -> SyncResult<SyncSummary> {
        let unchanged = change_set.unchanged;
        let deletions = change_set.deletions();
        let work = change_set.work_list();
        self.run_work(work, deletions, unchanged, force_all).await
    }

    /// Run an explicit work list. Used by the change-set path and by the
    /// retry and single-item modes, which build their lists from the store.
    #[instrument(skip_all, fields(work = work.len(), deletions = deletions.len()))]
    pub async fn run_work(
        &self,
        work: Vec<FeedRecord>,
        deletions: Vec<Item>,
        unchanged: usize,
        force_all: bool,
    ) -> SyncResult<SyncSummary> {
        let mut summary = SyncSummary::new();
        summary.unchanged = unchanged;

        info!(
            run_id = %summary.run_id,
            work = work.len(),
            deletions = deletions.len(),
            unchanged,
            force_all,
            "Starting sync run"
        );

        let batch_size = self.config.batch_size.max(1);
        let batches = work.len().div_ceil(batch_size);

        for (index, batch) in work.chunks(batch_size).enumerate() {
            for record in batch {
                if let Err(e) = self.process_record(record, force_all, &mut summary).await {
                    if e.is_fatal() {
                        error!(business_key = %record.business_key, error = %e, "Fatal error, aborting run");
                        return Err(e);
                    }
                    // Structural errors point at upstream data quality and
                    // get a louder log line than plain transient failures.
                    if matches!(&e, SyncError::Catalog(c) if c.is_structural()) {
                        error!(business_key = %record.business_key, error = %e, "Item failed on malformed remote state");
                    } else {
                        warn!(business_key = %record.business_key, error = %e, "Item failed");
                    }
                }
            }

            if index + 1 < batches {
                tokio::time::sleep(self.config.batch_pause()).await;
            }
        }

        for item in &deletions {
            summary.processed += 1;
            match self.reconciler.delete(item).await {
                Ok(()) => summary.deleted += 1,
                Err(e) if e.is_fatal() => {
                    error!(business_key = %item.business_key, error = %e, "Fatal error, aborting run");
                    return Err(e);
                }
                Err(e) => {
                    warn!(business_key = %item.business_key, error = %e, "Delete failed");
                    summary.failed += 1;
                }
            }
        }

        summary.finished_at = Some(Utc::now());
        if summary.over_failure_ceiling(self.config.failure_ceiling) {
            error!(
                failed = summary.failed,
                ceiling = self.config.failure_ceiling,
                "Failure ceiling exceeded"
            );
        }
        info!(
            run_id = %summary.run_id,
            processed = summary.processed,
            published = summary.published,
            updated = summary.updated,
            deleted = summary.deleted,
            failed = summary.failed,
            unchanged = summary.unchanged,
            "Sync run finished"
        );
        Ok(summary)
    }

    /// Route one record to publish or update based on its remote linkage.
    async fn process_record(
        &self,
        record: &FeedRecord,
        force_all: bool,
        summary: &mut SyncSummary,
    ) -> SyncResult<()> {
        summary.processed += 1;

        let stored = self.store.find_by_key(&record.business_key).await?;

        let result = match stored {
            None => {
                let mut item = Item::from_feed(record.clone());
                self.store.save(&item).await?;
                self.reconciler.publish(&mut item).await.map(|()| {
                    summary.published += 1;
                })
            }
            Some(mut item) if item.remote_product_id.is_some() => self
                .reconciler
                .update(&mut item, record.content.clone(), force_all)
                .await
                .map(|()| {
                    summary.updated += 1;
                }),
            Some(mut item) => {
                // Known item that never made it to the backend.
                item.absorb_content(record.content.clone());
                self.reconciler.publish(&mut item).await.map(|()| {
                    summary.published += 1;
                })
            }
        };

        if let Err(e) = result {
            summary.failed += 1;
            return Err(e);
        }
        Ok(())
    }
}
