//! Local system-of-record boundary.
//!
//! The store is the single owner of persisted item state, mutated only
//! through explicit save/update/delete calls issued by the orchestrator,
//! one item at a time. The design assumes a single sync process instance
//! runs at a time; no lease or optimistic versioning is taken.

use async_trait::async_trait;

use vitrine_core::{Item, ItemStatus};

use crate::error::StoreError;

mod memory;
mod sqlite;

pub use memory::MemoryItemStore;
pub use sqlite::SqliteItemStore;

/// CRUD and query access to persisted item records.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Look up one record by business key.
    async fn find_by_key(&self, key: &str) -> Result<Option<Item>, StoreError>;

    /// All persisted records.
    async fn find_all(&self) -> Result<Vec<Item>, StoreError>;

    /// All records in the given lifecycle status.
    async fn find_by_status(&self, status: ItemStatus) -> Result<Vec<Item>, StoreError>;

    /// Insert a new record (or overwrite an existing one with the same key).
    async fn save(&self, item: &Item) -> Result<(), StoreError>;

    /// Update an existing record; fails with `NotFound` if absent.
    async fn update(&self, item: &Item) -> Result<(), StoreError>;

    /// Remove a record. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
