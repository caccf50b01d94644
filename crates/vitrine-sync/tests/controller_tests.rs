//! Mode selection: full sync, single item, retry, analyze, stage.

mod support;

use std::sync::Arc;

use vitrine_core::{Item, ItemStatus};
use vitrine_sync::{
    FeedSource, ItemStore, MemoryItemStore, ModeController, StaticFeedSource, SyncError,
    SyncOrchestrator,
};

use support::{fast_config, record, MockCatalog};

fn controller(
    catalog: &MockCatalog,
    store: &Arc<MemoryItemStore>,
    feed: Vec<vitrine_core::FeedRecord>,
) -> ModeController {
    let orchestrator = SyncOrchestrator::new(
        Arc::new(catalog.clone()),
        Arc::clone(store) as Arc<dyn ItemStore>,
        fast_config(),
    );
    ModeController::new(
        Arc::new(StaticFeedSource::new(feed)) as Arc<dyn FeedSource>,
        Arc::clone(store) as Arc<dyn ItemStore>,
        orchestrator,
    )
}

#[tokio::test]
async fn test_full_sync_roundtrip() {
    let catalog = MockCatalog::new();
    let store = Arc::new(MemoryItemStore::new());
    let ctrl = controller(
        &catalog,
        &store,
        vec![record("100", "10.00"), record("200", "20.00")],
    );

    let summary = ctrl.sync(false).await.unwrap();
    assert_eq!(summary.published, 2);
    assert_eq!(store.len().await, 2);

    // Second run over the same feed is a no-op.
    let summary = ctrl.sync(false).await.unwrap();
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.unchanged, 2);
}

#[tokio::test]
async fn test_single_item_resends_every_facet() {
    let catalog = MockCatalog::new();
    let store = Arc::new(MemoryItemStore::new());
    let ctrl = controller(
        &catalog,
        &store,
        vec![record("100", "10.00"), record("200", "20.00")],
    );
    ctrl.sync(false).await.unwrap();

    let summary = ctrl.sync_item("100").await.unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.updated, 1);

    // Only item 100 saw a second facet pass, and it was a full one.
    let id_100 = store
        .find_by_key("100")
        .await
        .unwrap()
        .unwrap()
        .remote_product_id
        .unwrap();
    for op in ["options", "fields", "images", "metafields", "inventory"] {
        let calls = catalog.calls_of(op).await;
        assert!(
            calls.contains(&format!("{op} {id_100}")),
            "missing forced {op} call"
        );
    }
    let id_200 = store
        .find_by_key("200")
        .await
        .unwrap()
        .unwrap()
        .remote_product_id
        .unwrap();
    assert!(!catalog.calls_of("fields").await.contains(&format!("fields {id_200}")));
}

#[tokio::test]
async fn test_single_item_unknown_key_fails_before_any_remote_call() {
    let catalog = MockCatalog::new();
    let store = Arc::new(MemoryItemStore::new());
    let ctrl = controller(&catalog, &store, vec![record("100", "10.00")]);

    let err = ctrl.sync_item("999").await.unwrap_err();
    assert!(matches!(err, SyncError::ItemNotFound { ref key } if key == "999"));
    assert!(catalog.calls().await.is_empty());
}

#[tokio::test]
async fn test_retry_covers_only_failures_with_remote_ids() {
    let catalog = MockCatalog::new();
    let store = Arc::new(MemoryItemStore::new());
    let ctrl = controller(&catalog, &store, vec![record("100", "10.00")]);
    ctrl.sync(false).await.unwrap();

    // Fail an update for 100 and the initial create for 200.
    catalog.fail_op("options").await;
    catalog.fail_create_for("200").await;
    let ctrl = controller(
        &catalog,
        &store,
        vec![record("100", "15.00"), record("200", "20.00")],
    );
    let summary = ctrl.sync(false).await.unwrap();
    assert_eq!(summary.failed, 2);

    let id_100 = store
        .find_by_key("100")
        .await
        .unwrap()
        .unwrap()
        .remote_product_id
        .unwrap();
    let healthy = MockCatalog::new();
    healthy.seed_product(&id_100, "100", 1).await;
    let ctrl = controller(&healthy, &store, vec![]);

    // Only the update failure holds a remote id, so only it is retried.
    let summary = ctrl.retry_failed().await.unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.updated, 1);

    let item = store.find_by_key("100").await.unwrap().unwrap();
    assert_eq!(item.status, ItemStatus::Published);

    let stranded = store.find_by_key("200").await.unwrap().unwrap();
    assert_eq!(stranded.status, ItemStatus::PublishFailed);
    assert!(stranded.remote_product_id.is_none());
    assert!(healthy.calls_of("create").await.is_empty());

    // A failed publish re-enters through publish, here via a forced
    // single-item run.
    let ctrl = controller(&healthy, &store, vec![record("200", "20.00")]);
    let summary = ctrl.sync_item("200").await.unwrap();
    assert_eq!(summary.published, 1);
    let item = store.find_by_key("200").await.unwrap().unwrap();
    assert_eq!(item.status, ItemStatus::Published);
    assert!(item.remote_product_id.is_some());
}

#[tokio::test]
async fn test_retry_with_no_failures_is_a_noop() {
    let catalog = MockCatalog::new();
    let store = Arc::new(MemoryItemStore::new());
    let ctrl = controller(&catalog, &store, vec![record("100", "10.00")]);
    ctrl.sync(false).await.unwrap();

    let summary = ctrl.retry_failed().await.unwrap();
    assert_eq!(summary.processed, 0);
}

#[tokio::test]
async fn test_retry_uses_latest_absorbed_content() {
    let catalog = MockCatalog::new();
    let store = Arc::new(MemoryItemStore::new());

    // Publish, then fail an update carrying a new price.
    let ctrl = controller(&catalog, &store, vec![record("100", "10.00")]);
    ctrl.sync(false).await.unwrap();

    catalog.fail_op("options").await;
    let ctrl = controller(&catalog, &store, vec![record("100", "15.00")]);
    let summary = ctrl.sync(false).await.unwrap();
    assert_eq!(summary.failed, 1);

    let item = store.find_by_key("100").await.unwrap().unwrap();
    assert_eq!(item.status, ItemStatus::UpdateFailed);
    // The new price was absorbed even though the push failed.
    assert_eq!(item.content.price.to_string(), "15.00");

    // Retry pushes the absorbed content.
    let id = item.remote_product_id.unwrap();
    let healthy = MockCatalog::new();
    healthy.seed_product(&id, "100", 1).await;
    let ctrl = controller(&healthy, &store, vec![]);
    ctrl.retry_failed().await.unwrap();

    let product = healthy.product_by_sku("100").await.unwrap();
    assert_eq!(product.price, "15.00");
    let item = store.find_by_key("100").await.unwrap().unwrap();
    assert_eq!(item.status, ItemStatus::Published);
}

#[tokio::test]
async fn test_analyze_reports_without_writing() {
    let catalog = MockCatalog::new();
    let store = Arc::new(MemoryItemStore::new());
    let ctrl = controller(&catalog, &store, vec![record("100", "10.00")]);
    ctrl.sync(false).await.unwrap();

    let ctrl = controller(
        &catalog,
        &store,
        vec![record("100", "15.00"), record("50", "5.00")],
    );
    let calls_before = catalog.calls().await.len();

    let report = ctrl.analyze().await.unwrap();
    assert_eq!(report.new_keys, vec!["50"]);
    assert_eq!(report.changed_keys, vec!["100"]);
    assert!(report.deleted_keys.is_empty());
    assert_eq!(report.unchanged, 0);
    assert!(!report.is_empty());

    // Read-only: no catalog traffic, no store changes.
    assert_eq!(catalog.calls().await.len(), calls_before);
    assert_eq!(store.len().await, 1);
    let item = store.find_by_key("100").await.unwrap().unwrap();
    assert_eq!(item.content.price.to_string(), "10.00");
}

#[tokio::test]
async fn test_stage_fills_store_without_remote_calls() {
    let catalog = MockCatalog::new();
    let store = Arc::new(MemoryItemStore::new());

    // One already-published item whose feed content moved on, one new item,
    // one stored item missing from the feed.
    let ctrl = controller(&catalog, &store, vec![record("100", "10.00"), record("300", "30.00")]);
    ctrl.sync(false).await.unwrap();
    let calls_after_sync = catalog.calls().await.len();

    let ctrl = controller(
        &catalog,
        &store,
        vec![record("100", "12.00"), record("200", "20.00")],
    );
    let summary = ctrl.stage().await.unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.deleted, 1);

    assert_eq!(catalog.calls().await.len(), calls_after_sync);

    let new_item = store.find_by_key("200").await.unwrap().unwrap();
    assert_eq!(new_item.status, ItemStatus::NewWaitingPublish);
    assert!(new_item.remote_product_id.is_none());

    let updated = store.find_by_key("100").await.unwrap().unwrap();
    assert_eq!(updated.content.price.to_string(), "12.00");
    assert_eq!(updated.status, ItemStatus::Published);
    assert!(updated.remote_product_id.is_some());

    // The feed-absent item is gone locally, but its remote product stays.
    assert!(store.find_by_key("300").await.unwrap().is_none());
    assert!(catalog.product_by_sku("300").await.is_some());
}

#[tokio::test]
async fn test_staged_items_publish_on_next_sync() {
    let catalog = MockCatalog::new();
    let store = Arc::new(MemoryItemStore::new());

    let staged = Item::from_feed(record("100", "10.00"));
    store.seed(vec![staged]).await;

    // Identical feed content, but a staged item has no remote product yet,
    // so a plain sync still publishes it.
    let ctrl = controller(&catalog, &store, vec![record("100", "10.00")]);
    let summary = ctrl.sync(false).await.unwrap();
    assert_eq!(summary.published, 1);

    let item = store.find_by_key("100").await.unwrap().unwrap();
    assert_eq!(item.status, ItemStatus::Published);
    assert!(item.remote_product_id.is_some());
}
