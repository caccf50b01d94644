//! Catalog synchronization engine.
//!
//! Pulls the vendor feed, diffs it against the local item store, and
//! converges the remote storefront catalog through idempotent publish,
//! update, and delete operations.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod feed;
pub mod inventory;
pub mod orchestrator;
pub mod reconcile;
pub mod retry;
pub mod store;

pub use catalog::{CatalogApi, Metafield, ProductDraft, ProductFields, RemoteProduct, RestCatalog, RestCatalogConfig};
pub use config::SyncConfig;
pub use controller::{AnalyzeReport, ModeController, StageSummary};
pub use error::{CatalogError, FeedError, StoreError, SyncError, SyncResult};
pub use feed::{FeedSource, JsonFeedSource, StaticFeedSource};
pub use inventory::{InventoryDiscrepancy, InventoryEnforcer, InventoryReport};
pub use orchestrator::{SyncOrchestrator, SyncSummary};
pub use reconcile::{ChangeGroups, Reconciler};
pub use retry::RetryPolicy;
pub use store::{ItemStore, MemoryItemStore, SqliteItemStore};
