//! Classified diff output.

use serde::{Deserialize, Serialize};

use crate::item::{compare_business_keys, FeedRecord, Item};

/// An item present on both sides with differing (or force-marked) content.
///
/// Both versions are preserved: the stored side carries remote linkage and
/// status forward, the incoming side carries the new content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedItem {
    pub stored: Item,
    pub incoming: FeedRecord,
}

/// The output of the diff engine: three disjoint lists plus the count of
/// items dropped as unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Feed entries with no stored counterpart.
    pub new_items: Vec<FeedRecord>,
    /// Matched entries whose tracked content differs (or all matches,
    /// under force).
    pub changed_items: Vec<ChangedItem>,
    /// Stored records absent from the feed snapshot.
    pub deleted_items: Vec<Item>,
    /// Matched entries with identical content, dropped from the set.
    pub unchanged: usize,
}

impl ChangeSet {
    /// Whether the set contains no work at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_items.is_empty() && self.changed_items.is_empty() && self.deleted_items.is_empty()
    }

    /// Merge new items and the feed side of changed items into one work
    /// list, sorted in ascending business-key order.
    #[must_use]
    pub fn work_list(&self) -> Vec<FeedRecord> {
        let mut work: Vec<FeedRecord> = self
            .new_items
            .iter()
            .cloned()
            .chain(self.changed_items.iter().map(|c| c.incoming.clone()))
            .collect();
        work.sort_by(|a, b| compare_business_keys(&a.business_key, &b.business_key));
        work
    }

    /// Deleted records sorted in ascending business-key order.
    #[must_use]
    pub fn deletions(&self) -> Vec<Item> {
        let mut deleted = self.deleted_items.clone();
        deleted.sort_by(|a, b| compare_business_keys(&a.business_key, &b.business_key));
        deleted
    }
}
