//! Catalog item records.
//!
//! `FeedRecord` is one entry of the vendor feed snapshot; `Item` is the
//! persisted counterpart carrying remote linkage, lifecycle status, and
//! timestamps. The business key (the vendor's tag number) correlates
//! feed, store, and remote records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::status::ItemStatus;

/// Maximum number of images carried per item.
pub const MAX_IMAGES: usize = 9;

/// Availability flag from the vendor feed.
///
/// Sold is not a lifecycle status; it only forces the expected remote
/// inventory quantity to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Sold,
}

impl Availability {
    /// Expected total remote quantity for this flag: 0 if sold, else 1.
    #[must_use]
    pub fn expected_quantity(self) -> u32 {
        match self {
            Availability::Available => 1,
            Availability::Sold => 0,
        }
    }
}

/// Option-determining attributes: the fields that define the remote
/// product's option set and variant. Changing any of these requires the
/// variant structure to be removed and recreated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dial_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metal: Option<String>,
}

impl OptionAttributes {
    /// Present option values as (name, value) pairs, in option order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        if let Some(v) = self.dial_color.as_deref() {
            out.push(("dial_color", v));
        }
        if let Some(v) = self.diameter.as_deref() {
            out.push(("diameter", v));
        }
        if let Some(v) = self.metal.as_deref() {
            out.push(("metal", v));
        }
        out
    }
}

/// Marketplace metadata attributes, synced to the remote catalog as
/// metafields. These never touch option/variant state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_papers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl MetadataAttributes {
    /// Present metadata values as (key, value) pairs.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        if let Some(v) = self.year.as_deref() {
            out.push(("year", v));
        }
        if let Some(v) = self.reference_number.as_deref() {
            out.push(("reference_number", v));
        }
        if let Some(v) = self.movement.as_deref() {
            out.push(("movement", v));
        }
        if let Some(v) = self.strap.as_deref() {
            out.push(("strap", v));
        }
        if let Some(v) = self.box_papers.as_deref() {
            out.push(("box_papers", v));
        }
        if let Some(v) = self.style.as_deref() {
            out.push(("style", v));
        }
        out
    }
}

/// The tracked content fields of one catalog entry.
///
/// Field comparison for diffing is exact equality per tracked attribute,
/// which the derived `PartialEq` provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemContent {
    pub description: String,
    pub price: Decimal,
    pub brand: String,
    pub category: String,
    pub condition: String,
    /// Ordered image URLs, at most [`MAX_IMAGES`].
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub options: OptionAttributes,
    #[serde(default)]
    pub metadata: MetadataAttributes,
    pub availability: Availability,
}

impl ItemContent {
    /// Listing title the storefront renders for this item.
    #[must_use]
    pub fn display_title(&self, business_key: &str) -> String {
        format!("{} {} #{business_key}", self.brand, self.category)
    }
}

/// One entry of the vendor feed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRecord {
    /// Immutable vendor tag number; unique across the feed.
    pub business_key: String,
    #[serde(flatten)]
    pub content: ItemContent,
}

/// A persisted catalog item: feed content plus remote linkage and
/// lifecycle state.
///
/// Invariant: `remote_product_id.is_some()` implies the status allows a
/// remote id (see [`ItemStatus::allows_remote_id`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub business_key: String,
    pub content: ItemContent,
    /// Remote catalog product id; `None` until the first successful publish.
    pub remote_product_id: Option<String>,
    pub status: ItemStatus,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create a fresh local record from a feed entry, waiting to publish.
    #[must_use]
    pub fn from_feed(record: FeedRecord) -> Self {
        Self {
            business_key: record.business_key,
            content: record.content,
            remote_product_id: None,
            status: ItemStatus::NewWaitingPublish,
            updated_at: Utc::now(),
            published_at: None,
        }
    }

    /// Whether any tracked content field differs from the feed version.
    #[must_use]
    pub fn content_differs(&self, record: &FeedRecord) -> bool {
        self.content != record.content
    }

    /// Overwrite content fields from the feed, preserving remote linkage,
    /// status, and the publish timestamp.
    pub fn absorb_content(&mut self, content: ItemContent) {
        self.content = content;
        self.updated_at = Utc::now();
    }

    /// Record the remote product a publish just created, before its
    /// facets have been attached. The status stays retryable so an
    /// interrupted run resumes through update instead of reading as done.
    pub fn mark_created(&mut self, remote_id: String) {
        self.remote_product_id = Some(remote_id);
        self.status = ItemStatus::UpdateFailed;
        self.updated_at = Utc::now();
    }

    /// Record a successful publish: remote id, status, timestamps.
    pub fn mark_published(&mut self, remote_id: String) {
        self.remote_product_id = Some(remote_id);
        self.status = ItemStatus::Published;
        let now = Utc::now();
        self.published_at = Some(now);
        self.updated_at = now;
    }

    /// Record a successful update of an already-published item.
    pub fn mark_updated(&mut self) {
        self.status = ItemStatus::Published;
        self.updated_at = Utc::now();
    }

    /// Record a failed publish attempt. Only valid while no remote
    /// product exists.
    pub fn mark_publish_failed(&mut self) {
        self.status = ItemStatus::PublishFailed;
        self.updated_at = Utc::now();
    }

    /// Record a failed update attempt; the remote id stays in place so a
    /// retried run routes back through Update.
    pub fn mark_update_failed(&mut self) {
        self.status = ItemStatus::UpdateFailed;
        self.updated_at = Utc::now();
    }

    /// Check the remote-linkage invariant.
    #[must_use]
    pub fn linkage_is_consistent(&self) -> bool {
        match self.remote_product_id {
            Some(_) => self.status.allows_remote_id(),
            None => !matches!(self.status, ItemStatus::UpdateFailed),
        }
    }

    /// Re-derive the feed-shaped view of this record, used when an
    /// explicit work list is built from the store instead of the feed.
    #[must_use]
    pub fn to_feed_record(&self) -> FeedRecord {
        FeedRecord {
            business_key: self.business_key.clone(),
            content: self.content.clone(),
        }
    }
}

/// Compare two business keys: ascending numeric when both parse as
/// integers, else lexical. This is the processing order for all work
/// lists.
#[must_use]
pub fn compare_business_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
