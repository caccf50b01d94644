//! Inventory audit and enforcement.
//!
//! Availability is the source of truth: an available item carries exactly
//! one unit of stock, a sold item carries zero. The enforcer compares the
//! backend's reported quantities against that rule and, in enforce mode,
//! overwrites divergent quantities with the absolute expected value.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use vitrine_core::{compare_business_keys, ItemStatus};

use crate::catalog::CatalogApi;
use crate::error::SyncResult;
use crate::retry::RetryPolicy;
use crate::store::ItemStore;

/// One product whose remote quantity disagrees with availability.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InventoryDiscrepancy {
    pub business_key: String,
    pub product_id: String,
    pub expected: u32,
    pub actual: u32,
    /// Set when enforce mode has written the expected quantity back.
    pub repaired: bool,
}

/// Outcome of an inventory pass.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct InventoryReport {
    /// Remote products matched to a local item and checked.
    pub checked: usize,
    /// Products with the wrong quantity, in business-key order.
    pub discrepancies: Vec<InventoryDiscrepancy>,
    /// Remote SKUs with no corresponding local item.
    pub unmatched_skus: Vec<String>,
}

impl InventoryReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty() && self.unmatched_skus.is_empty()
    }
}

/// Audits and repairs remote stock levels.
pub struct InventoryEnforcer {
    catalog: Arc<dyn CatalogApi>,
    store: Arc<dyn ItemStore>,
    retry: RetryPolicy,
}

impl InventoryEnforcer {
    pub fn new(catalog: Arc<dyn CatalogApi>, store: Arc<dyn ItemStore>, retry: RetryPolicy) -> Self {
        Self {
            catalog,
            store,
            retry,
        }
    }

    /// Report quantity discrepancies without touching the backend.
    #[instrument(skip(self))]
    pub async fn audit(&self) -> SyncResult<InventoryReport> {
        self.run(false).await
    }

    /// Report discrepancies and write the expected quantity for each one.
    #[instrument(skip(self))]
    pub async fn enforce(&self) -> SyncResult<InventoryReport> {
        self.run(true).await
    }

    async fn run(&self, repair: bool) -> SyncResult<InventoryReport> {
        let items = self.store.find_all().await?;
        let by_key: HashMap<&str, _> = items
            .iter()
            .filter(|i| matches!(i.status, ItemStatus::Published | ItemStatus::UpdateFailed))
            .map(|i| (i.business_key.as_str(), i))
            .collect();

        let remote = self
            .retry
            .execute("list_products", || self.catalog.list_products())
            .await?;

        let mut report = InventoryReport::default();

        for product in &remote {
            let expected = match by_key.get(product.sku.as_str()) {
                Some(item) => {
                    report.checked += 1;
                    item.content.availability.expected_quantity()
                }
                None => {
                    // No local record: treated as available, one unit.
                    report.unmatched_skus.push(product.sku.clone());
                    1
                }
            };

            if product.quantity == expected {
                continue;
            }

            let mut repaired = false;
            if repair {
                self.retry
                    .execute("set_inventory", || {
                        self.catalog.set_inventory_absolute(&product.id, expected)
                    })
                    .await?;
                info!(
                    business_key = %product.sku,
                    expected,
                    actual = product.quantity,
                    "Inventory repaired"
                );
                repaired = true;
            } else {
                warn!(
                    business_key = %product.sku,
                    expected,
                    actual = product.quantity,
                    "Inventory discrepancy"
                );
            }

            report.discrepancies.push(InventoryDiscrepancy {
                business_key: product.sku.clone(),
                product_id: product.id.clone(),
                expected,
                actual: product.quantity,
                repaired,
            });
        }

        report
            .discrepancies
            .sort_by(|a, b| compare_business_keys(&a.business_key, &b.business_key));
        report
            .unmatched_skus
            .sort_by(|a, b| compare_business_keys(a, b));

        Ok(report)
    }
}
