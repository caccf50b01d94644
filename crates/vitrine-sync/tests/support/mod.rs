//! In-memory catalog backend for engine tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use vitrine_core::{
    Availability, FeedRecord, Item, ItemContent, ItemStatus, MetadataAttributes, OptionAttributes,
};
use vitrine_sync::catalog::{CatalogApi, Metafield, ProductDraft, ProductFields, RemoteProduct};
use vitrine_sync::error::{CatalogError, CatalogResult, StoreError};
use vitrine_sync::{ItemStore, MemoryItemStore};

/// Full state of one fake remote product.
#[derive(Debug, Clone)]
pub struct FakeProduct {
    pub id: String,
    pub sku: String,
    pub title: String,
    pub price: String,
    pub quantity: u32,
    pub options: Vec<(String, String)>,
    pub images: Vec<String>,
    pub metafields: Vec<Metafield>,
}

#[derive(Default)]
struct State {
    products: HashMap<String, FakeProduct>,
    next_id: u64,
    calls: Vec<String>,
    fail_create_skus: HashSet<String>,
    fail_ops: HashSet<String>,
    auth_broken: bool,
}

/// Scriptable catalog double. Records every call as `"op key"` so tests
/// can assert which sub-operations ran and in what order.
#[derive(Clone, Default)]
pub struct MockCatalog {
    state: Arc<RwLock<State>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_product` fail with a 500 for this SKU.
    pub async fn fail_create_for(&self, sku: &str) {
        self.state
            .write()
            .await
            .fail_create_skus
            .insert(sku.to_string());
    }

    /// Make one operation kind fail with a 500 for every product.
    pub async fn fail_op(&self, op: &str) {
        self.state.write().await.fail_ops.insert(op.to_string());
    }

    /// Make every call fail authentication.
    pub async fn break_auth(&self) {
        self.state.write().await.auth_broken = true;
    }

    /// Seed a remote product directly, bypassing the client surface.
    pub async fn seed_product(&self, id: &str, sku: &str, quantity: u32) {
        let mut state = self.state.write().await;
        // Generated ids must never collide with seeded ones.
        if let Some(n) = id.strip_prefix("rp-").and_then(|s| s.parse::<u64>().ok()) {
            state.next_id = state.next_id.max(n);
        }
        state.products.insert(
            id.to_string(),
            FakeProduct {
                id: id.to_string(),
                sku: sku.to_string(),
                title: String::new(),
                price: String::new(),
                quantity,
                options: Vec::new(),
                images: Vec::new(),
                metafields: Vec::new(),
            },
        );
    }

    /// Overwrite a product's quantity to simulate drift.
    pub async fn drift_quantity(&self, id: &str, quantity: u32) {
        if let Some(p) = self.state.write().await.products.get_mut(id) {
            p.quantity = quantity;
        }
    }

    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    /// Calls of one kind, in order.
    pub async fn calls_of(&self, op: &str) -> Vec<String> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter(|c| c.starts_with(op))
            .cloned()
            .collect()
    }

    pub async fn product_by_sku(&self, sku: &str) -> Option<FakeProduct> {
        self.state
            .read()
            .await
            .products
            .values()
            .find(|p| p.sku == sku)
            .cloned()
    }

    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }

    async fn check(&self, op: &str, key: &str) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        state.calls.push(format!("{op} {key}"));
        if state.auth_broken {
            return Err(CatalogError::Auth("token rejected".into()));
        }
        if state.fail_ops.contains(op) {
            return Err(CatalogError::Api {
                status: 500,
                detail: format!("{op} exploded"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn create_product(&self, draft: &ProductDraft) -> CatalogResult<String> {
        self.check("create", &draft.sku).await?;
        let mut state = self.state.write().await;
        if state.fail_create_skus.contains(&draft.sku) {
            return Err(CatalogError::Api {
                status: 500,
                detail: "create exploded".into(),
            });
        }
        state.next_id += 1;
        let id = format!("rp-{}", state.next_id);
        state.products.insert(
            id.clone(),
            FakeProduct {
                id: id.clone(),
                sku: draft.sku.clone(),
                title: draft.title.clone(),
                price: draft.price.clone(),
                quantity: 0,
                options: Vec::new(),
                images: Vec::new(),
                metafields: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn update_product(&self, product_id: &str, fields: &ProductFields) -> CatalogResult<()> {
        self.check("fields", product_id).await?;
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.to_string()))?;
        product.title = fields.title.clone();
        product.price = fields.price.clone();
        Ok(())
    }

    async fn delete_product(&self, product_id: &str) -> CatalogResult<()> {
        self.check("delete", product_id).await?;
        // Absent products are not an error, matching the HTTP client.
        self.state.write().await.products.remove(product_id);
        Ok(())
    }

    async fn replace_options_and_variant(
        &self,
        product_id: &str,
        _sku: &str,
        price: &str,
        options: &[(String, String)],
    ) -> CatalogResult<()> {
        self.check("options", product_id).await?;
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.to_string()))?;
        product.options = options.to_vec();
        product.price = price.to_string();
        Ok(())
    }

    async fn replace_images(&self, product_id: &str, images: &[String]) -> CatalogResult<()> {
        self.check("images", product_id).await?;
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.to_string()))?;
        product.images = images.to_vec();
        Ok(())
    }

    async fn upsert_metafields(
        &self,
        product_id: &str,
        metafields: &[Metafield],
    ) -> CatalogResult<()> {
        self.check("metafields", product_id).await?;
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.to_string()))?;
        for incoming in metafields {
            match product.metafields.iter_mut().find(|m| m.key == incoming.key) {
                Some(existing) => existing.value = incoming.value.clone(),
                None => product.metafields.push(incoming.clone()),
            }
        }
        Ok(())
    }

    async fn set_inventory_absolute(&self, product_id: &str, quantity: u32) -> CatalogResult<()> {
        self.check("inventory", product_id).await?;
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.to_string()))?;
        product.quantity = quantity;
        Ok(())
    }

    async fn list_products(&self) -> CatalogResult<Vec<RemoteProduct>> {
        self.check("list", "*").await?;
        let state = self.state.read().await;
        let mut products: Vec<RemoteProduct> = state
            .products
            .values()
            .map(|p| RemoteProduct {
                id: p.id.clone(),
                sku: p.sku.clone(),
                quantity: p.quantity,
            })
            .collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }
}

/// One persisted write, as seen by the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreWrite {
    pub status: ItemStatus,
    pub has_remote_id: bool,
}

/// Store wrapper that journals every save/update so tests can assert
/// the exact sequence of persisted states for a key.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryItemStore,
    writes: RwLock<Vec<(String, StoreWrite)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persisted states for one key, in write order.
    pub async fn writes_for(&self, key: &str) -> Vec<StoreWrite> {
        self.writes
            .read()
            .await
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, w)| w.clone())
            .collect()
    }

    async fn journal(&self, item: &Item) {
        self.writes.write().await.push((
            item.business_key.clone(),
            StoreWrite {
                status: item.status,
                has_remote_id: item.remote_product_id.is_some(),
            },
        ));
    }
}

#[async_trait]
impl ItemStore for RecordingStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<Item>, StoreError> {
        self.inner.find_by_key(key).await
    }

    async fn find_all(&self) -> Result<Vec<Item>, StoreError> {
        self.inner.find_all().await
    }

    async fn find_by_status(&self, status: ItemStatus) -> Result<Vec<Item>, StoreError> {
        self.inner.find_by_status(status).await
    }

    async fn save(&self, item: &Item) -> Result<(), StoreError> {
        self.journal(item).await;
        self.inner.save(item).await
    }

    async fn update(&self, item: &Item) -> Result<(), StoreError> {
        self.journal(item).await;
        self.inner.update(item).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.delete(key).await
    }
}

/// Feed record builder with sensible defaults.
#[must_use]
pub fn record(key: &str, price: &str) -> FeedRecord {
    FeedRecord {
        business_key: key.to_string(),
        content: ItemContent {
            description: format!("Lot {key}"),
            price: price.parse().unwrap(),
            brand: "Heuerling".to_string(),
            category: "Chronograph".to_string(),
            condition: "Very good".to_string(),
            images: vec![format!("https://img.example/{key}.jpg")],
            options: OptionAttributes {
                dial_color: Some("black".to_string()),
                diameter: Some("40mm".to_string()),
                metal: Some("steel".to_string()),
            },
            metadata: MetadataAttributes {
                year: Some("1971".to_string()),
                ..Default::default()
            },
            availability: Availability::Available,
        },
    }
}

/// Fast test configuration: no batch pauses, no retry sleeps.
#[must_use]
pub fn fast_config() -> vitrine_sync::SyncConfig {
    vitrine_sync::SyncConfig {
        batch_size: 10,
        batch_pause_ms: 0,
        failure_ceiling: 25,
        max_retries: 0,
        request_timeout_secs: 5,
    }
}
