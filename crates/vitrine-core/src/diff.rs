//! Diff engine: classify a feed snapshot against the local store.
//!
//! Pure computation over in-memory collections; errors originate only in
//! the collaborators that supplied the inputs.

use std::collections::{HashMap, HashSet};

use crate::changeset::{ChangeSet, ChangedItem};
use crate::item::{FeedRecord, Item};
use crate::status::ItemStatus;

/// Compare a feed snapshot against the stored records and classify every
/// item as new, changed, deleted, or unchanged.
///
/// With `force_all` set, field comparison is short-circuited and every
/// matched key is emitted as a changed pair. This is the mechanism behind
/// full-refresh operation, not a separate code path.
///
/// Deterministic: the same two input sets always produce the same
/// classification.
#[must_use]
pub fn compute_change_set(force_all: bool, stored: &[Item], feed: &[FeedRecord]) -> ChangeSet {
    let stored_by_key: HashMap<&str, &Item> = stored
        .iter()
        .map(|item| (item.business_key.as_str(), item))
        .collect();
    let feed_keys: HashSet<&str> = feed.iter().map(|r| r.business_key.as_str()).collect();

    let mut change_set = ChangeSet::default();

    for record in feed {
        match stored_by_key.get(record.business_key.as_str()) {
            None => change_set.new_items.push(record.clone()),
            Some(item)
                if force_all
                    || item.content_differs(record)
                    // Staged records are waiting for their first publish;
                    // identical content must not hide them from the run.
                    || item.status == ItemStatus::NewWaitingPublish =>
            {
                change_set.changed_items.push(ChangedItem {
                    stored: (*item).clone(),
                    incoming: record.clone(),
                });
            }
            Some(_) => change_set.unchanged += 1,
        }
    }

    for item in stored {
        if !feed_keys.contains(item.business_key.as_str()) {
            change_set.deleted_items.push(item.clone());
        }
    }

    change_set
}
