//! Remote catalog surface.
//!
//! [`CatalogApi`] is the seam between the reconciliation engine and the
//! storefront backend. Every call is an absolute write: the caller sends the
//! full desired state for a product facet and the backend converges to it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vitrine_core::ItemContent;

use crate::error::CatalogResult;

mod rest;

pub use rest::{RestCatalog, RestCatalogConfig};

/// Full payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Business key used as the remote SKU.
    pub sku: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub brand: String,
    pub category: String,
    pub condition: String,
}

/// Scalar product fields updated in place (never options or images).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFields {
    pub title: String,
    pub description: String,
    pub price: String,
    pub brand: String,
    pub category: String,
    pub condition: String,
}

/// One namespaced key/value attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub key: String,
    pub value: String,
}

/// Product as reported by the backend listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteProduct {
    pub id: String,
    pub sku: String,
    pub quantity: u32,
}

impl ProductDraft {
    /// Build the create payload from item content. The title is derived the
    /// same way the storefront renders listings.
    pub fn from_content(sku: &str, content: &ItemContent) -> Self {
        Self {
            sku: sku.to_string(),
            title: content.display_title(sku),
            description: content.description.clone(),
            price: content.price.to_string(),
            brand: content.brand.clone(),
            category: content.category.clone(),
            condition: content.condition.clone(),
        }
    }
}

impl ProductFields {
    pub fn from_content(sku: &str, content: &ItemContent) -> Self {
        Self {
            title: content.display_title(sku),
            description: content.description.clone(),
            price: content.price.to_string(),
            brand: content.brand.clone(),
            category: content.category.clone(),
            condition: content.condition.clone(),
        }
    }
}

/// Build the metafield set for an item's metadata attributes. Only populated
/// attributes are sent; the upsert is additive by key.
#[must_use]
pub fn metafields_for(content: &ItemContent) -> Vec<Metafield> {
    content
        .metadata
        .entries()
        .into_iter()
        .map(|(key, value)| Metafield {
            key: key.to_string(),
            value: value.to_string(),
        })
        .collect()
}

/// Operations the reconciliation engine needs from a catalog backend.
///
/// Implementations must treat `replace_*` calls as remove-and-recreate and
/// `upsert_metafields` / `set_inventory_absolute` as idempotent.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Create a product and return its remote id.
    async fn create_product(&self, draft: &ProductDraft) -> CatalogResult<String>;

    /// Update scalar fields on an existing product.
    async fn update_product(&self, product_id: &str, fields: &ProductFields) -> CatalogResult<()>;

    /// Delete a product. An already-deleted product is not an error.
    async fn delete_product(&self, product_id: &str) -> CatalogResult<()>;

    /// Replace the product's option set and its single variant. The variant
    /// carries the price and the SKU, so both are resent on every call.
    async fn replace_options_and_variant(
        &self,
        product_id: &str,
        sku: &str,
        price: &str,
        options: &[(String, String)],
    ) -> CatalogResult<()>;

    /// Replace all images in feed order.
    async fn replace_images(&self, product_id: &str, images: &[String]) -> CatalogResult<()>;

    /// Upsert metafields by key.
    async fn upsert_metafields(
        &self,
        product_id: &str,
        metafields: &[Metafield],
    ) -> CatalogResult<()>;

    /// Set the absolute stock level of the product's variant.
    async fn set_inventory_absolute(&self, product_id: &str, quantity: u32) -> CatalogResult<()>;

    /// List every product the backend knows about, following pagination.
    async fn list_products(&self) -> CatalogResult<Vec<RemoteProduct>>;
}
