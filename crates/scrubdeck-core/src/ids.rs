// crates/scrubdeck-core/src/ids.rs
//
// Stable ids for timeline nodes (§9 Design Note: "registry keyed by stable
// ids ... so the edit engine references items by id, not by pointer").
// Replaces the source's cyclic widget<->model ownership.

use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub usize);

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_TRANSITION_ID: AtomicU64 = AtomicU64::new(1);

impl ItemId {
    pub fn next() -> Self {
        ItemId(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl TransitionId {
    pub fn next() -> Self {
        TransitionId(NEXT_TRANSITION_ID.fetch_add(1, Ordering::Relaxed))
    }
}
