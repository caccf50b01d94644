//! Domain model and diff engine for the vitrine catalog sync.
//!
//! This crate is pure: item records, their lifecycle statuses, and the
//! feed-vs-store diff computation. All I/O (feed, store, remote catalog)
//! lives in `vitrine-sync` behind collaborator traits.

pub mod changeset;
pub mod diff;
pub mod item;
pub mod status;

pub use changeset::{ChangeSet, ChangedItem};
pub use diff::compute_change_set;
pub use item::{
    compare_business_keys, Availability, FeedRecord, Item, ItemContent, MetadataAttributes,
    OptionAttributes, MAX_IMAGES,
};
pub use status::{InvalidStatus, ItemStatus};
