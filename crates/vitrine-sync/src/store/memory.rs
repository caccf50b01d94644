//! In-memory item store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use vitrine_core::{Item, ItemStatus};

use super::ItemStore;
use crate::error::StoreError;

/// `HashMap`-backed store, used by tests and read-only analysis runs.
#[derive(Default)]
pub struct MemoryItemStore {
    items: RwLock<HashMap<String, Item>>,
}

impl MemoryItemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub async fn seed(&self, items: Vec<Item>) {
        let mut guard = self.items.write().await;
        for item in items {
            guard.insert(item.business_key.clone(), item);
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn find_by_status(&self, status: ItemStatus) -> Result<Vec<Item>, StoreError> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|item| item.status == status)
            .cloned()
            .collect())
    }

    async fn save(&self, item: &Item) -> Result<(), StoreError> {
        self.items
            .write()
            .await
            .insert(item.business_key.clone(), item.clone());
        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<(), StoreError> {
        let mut guard = self.items.write().await;
        match guard.get_mut(&item.business_key) {
            Some(existing) => {
                *existing = item.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                key: item.business_key.clone(),
            }),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.items.write().await.remove(key);
        Ok(())
    }
}
