// crates/scrubdeck-core/src/timeline/item.rs
//
// §9 Design Note: the source's `IItem -> IBasicItem -> {VideoClipItem,
// AudioClipItem, GapItem, TransitionItem}` inheritance chain collapses to a
// tagged `Item` variant. Behaviour that used to dispatch virtually (thumbnail
// fetch vs waveform fetch) becomes a `match` at the call site instead.

use serde::{Deserialize, Serialize};
use crate::ids::ItemId;
use crate::path::MediaPath;
use crate::time::TimeRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Video,
    Audio,
    Gap,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Effect {
    pub name:   String,
    pub params: std::collections::BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaReference {
    pub path:            MediaPath,
    /// The full range the media can serve, once known (§3 "available range").
    pub available_range: Option<TimeRange>,
}

/// One entry in a track's item list — a clip or a gap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id:     ItemId,
    pub kind:   ItemKind,
    /// The portion of the media this item exposes to its parent track.
    pub trimmed_range: TimeRange,
    /// The trimmed range placed on the track's own timeline — what gets
    /// clicked on. Recomputed by `Track::relayout` whenever the track's
    /// item list changes.
    pub parent_range:  TimeRange,
    pub effects: Vec<Effect>,
    pub media:   Option<MediaReference>,
    /// Index of the corresponding node in the authoritative OTIO document,
    /// so edits can be round-tripped back (§4.F).
    pub otio_index: usize,
}

impl Item {
    pub fn new_gap(id: ItemId, duration: crate::time::RationalTime, otio_index: usize) -> Self {
        let rate = duration.rate;
        Self {
            id,
            kind: ItemKind::Gap,
            trimmed_range: TimeRange::new(crate::time::RationalTime::zero(rate), duration),
            parent_range: TimeRange::new(crate::time::RationalTime::zero(rate), duration),
            effects: Vec::new(),
            media: None,
            otio_index,
        }
    }

    pub fn is_gap(&self) -> bool {
        self.kind == ItemKind::Gap
    }

    /// The clip's available range in the media, if known — superset of
    /// `trimmed_range` per invariant 5.
    pub fn available_range(&self) -> Option<TimeRange> {
        self.media.as_ref().and_then(|m| m.available_range)
    }
}
