//! Per-item reconciliation: publish, update, and delete against the catalog.
//!
//! Each operation converges one item and persists the resulting status
//! before returning, so an interrupted run never loses a remote linkage.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use vitrine_core::{Item, ItemContent};

use crate::catalog::{metafields_for, CatalogApi, ProductDraft, ProductFields};
use crate::error::{CatalogResult, SyncError, SyncResult};
use crate::retry::RetryPolicy;
use crate::store::ItemStore;

/// Which facets of a published product need to be resent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeGroups {
    pub fields: bool,
    pub options: bool,
    pub images: bool,
    pub metadata: bool,
    pub inventory: bool,
}

impl ChangeGroups {
    /// Every facet, for forced reapplication.
    #[must_use]
    pub fn all() -> Self {
        Self {
            fields: true,
            options: true,
            images: true,
            metadata: true,
            inventory: true,
        }
    }

    /// Facets on which `incoming` differs from `stored`.
    ///
    /// A price change touches both the scalar fields and the variant, so it
    /// sets `fields` and `options` together.
    #[must_use]
    pub fn between(stored: &ItemContent, incoming: &ItemContent) -> Self {
        let price_changed = stored.price != incoming.price;
        Self {
            fields: price_changed
                || stored.description != incoming.description
                || stored.brand != incoming.brand
                || stored.category != incoming.category
                || stored.condition != incoming.condition,
            options: price_changed || stored.options != incoming.options,
            images: stored.images != incoming.images,
            metadata: stored.metadata != incoming.metadata,
            inventory: stored.availability != incoming.availability,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.fields || self.options || self.images || self.metadata || self.inventory)
    }
}

/// Converges single items against the remote catalog.
pub struct Reconciler {
    catalog: Arc<dyn CatalogApi>,
    store: Arc<dyn ItemStore>,
    retry: RetryPolicy,
}

impl Reconciler {
    pub fn new(catalog: Arc<dyn CatalogApi>, store: Arc<dyn ItemStore>, retry: RetryPolicy) -> Self {
        Self {
            catalog,
            store,
            retry,
        }
    }

    /// Publish a new item: create the product, then send every facet.
    ///
    /// The remote id is persisted as soon as the create succeeds, under a
    /// retryable status; `Published` is only written once every facet call
    /// has landed. A failure before the create leaves the item in
    /// `PublishFailed`; a failure (or crash) after it leaves `UpdateFailed`
    /// with the id in place, so the next run routes through update and
    /// never creates a duplicate.
    #[instrument(skip(self, item), fields(business_key = %item.business_key))]
    pub async fn publish(&self, item: &mut Item) -> SyncResult<()> {
        let draft = ProductDraft::from_content(&item.business_key, &item.content);

        let created = self
            .retry
            .execute("create_product", || self.catalog.create_product(&draft))
            .await;

        let remote_id = match created {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Product create failed");
                item.mark_publish_failed();
                self.store.update(item).await?;
                return Err(e.into());
            }
        };

        item.mark_created(remote_id.clone());
        self.store.update(item).await?;
        info!(remote_id = %remote_id, "Product created");

        // The create payload already carries the scalar fields; only the
        // remaining facets need a follow-up call.
        let facets = ChangeGroups {
            fields: false,
            ..ChangeGroups::all()
        };
        if let Err(e) = self.apply_facets(&remote_id, item, facets).await {
            warn!(error = %e, "Facet upload failed after create");
            item.mark_update_failed();
            self.store.update(item).await?;
            return Err(e.into());
        }

        item.mark_published(remote_id);
        self.store.update(item).await?;

        Ok(())
    }

    /// Update an already-published item with `incoming` content.
    ///
    /// With `force_all` every facet is resent regardless of what changed.
    /// The incoming content is absorbed before the remote calls, so a failed
    /// attempt retries with the new content, not the stale copy.
    #[instrument(skip(self, item, incoming), fields(business_key = %item.business_key))]
    pub async fn update(
        &self,
        item: &mut Item,
        incoming: ItemContent,
        force_all: bool,
    ) -> SyncResult<()> {
        let Some(remote_id) = item.remote_product_id.clone() else {
            return Err(SyncError::validation(format!(
                "item {} routed to update without a remote product id",
                item.business_key
            )));
        };

        let mut groups = if force_all {
            ChangeGroups::all()
        } else {
            ChangeGroups::between(&item.content, &incoming)
        };

        item.absorb_content(incoming);

        if groups.is_empty() {
            debug!("No facet changes, nothing to send");
            item.mark_updated();
            self.store.update(item).await?;
            return Ok(());
        }

        // The quantity invariant is re-asserted on every update, not only
        // when the availability flag flipped.
        groups.inventory = true;

        if let Err(e) = self.apply_facets(&remote_id, item, groups).await {
            warn!(error = %e, "Product update failed");
            item.mark_update_failed();
            self.store.update(item).await?;
            return Err(e.into());
        }

        item.mark_updated();
        self.store.update(item).await?;
        debug!("Product updated");
        Ok(())
    }

    /// Delete an item remotely (when it was ever published) and locally.
    /// An already-missing remote product counts as success.
    #[instrument(skip(self, item), fields(business_key = %item.business_key))]
    pub async fn delete(&self, item: &Item) -> SyncResult<()> {
        if let Some(remote_id) = item.remote_product_id.as_deref() {
            self.retry
                .execute("delete_product", || self.catalog.delete_product(remote_id))
                .await?;
            info!(remote_id = %remote_id, "Product deleted");
        }
        self.store.delete(&item.business_key).await?;
        Ok(())
    }

    /// Send the selected facets, options first, idempotent upserts last.
    async fn apply_facets(
        &self,
        remote_id: &str,
        item: &Item,
        groups: ChangeGroups,
    ) -> CatalogResult<()> {
        let content = &item.content;

        if groups.options {
            let price = content.price.to_string();
            let options: Vec<(String, String)> = content
                .options
                .entries()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            self.retry
                .execute("replace_options_and_variant", || {
                    self.catalog.replace_options_and_variant(
                        remote_id,
                        &item.business_key,
                        &price,
                        &options,
                    )
                })
                .await?;
        }

        if groups.fields {
            let fields = ProductFields::from_content(&item.business_key, content);
            self.retry
                .execute("update_product", || {
                    self.catalog.update_product(remote_id, &fields)
                })
                .await?;
        }

        if groups.images {
            self.retry
                .execute("replace_images", || {
                    self.catalog.replace_images(remote_id, &content.images)
                })
                .await?;
        }

        if groups.metadata {
            let metafields = metafields_for(content);
            self.retry
                .execute("upsert_metafields", || {
                    self.catalog.upsert_metafields(remote_id, &metafields)
                })
                .await?;
        }

        if groups.inventory {
            let quantity = content.availability.expected_quantity();
            self.retry
                .execute("set_inventory", || {
                    self.catalog.set_inventory_absolute(remote_id, quantity)
                })
                .await?;
        }

        Ok(())
    }
}
