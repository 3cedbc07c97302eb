// crates/scrubdeck-core/src/timeline/track.rs
//
// A track: an ordered sequence alternating items and transitions. A
// transition's time range is *derived*, not stored — §3: "its time range is
// derived as `[prev.end - in_offset, next.start + out_offset)`".

use serde::{Deserialize, Serialize};
use crate::ids::{ItemId, TransitionId};
use crate::time::{RationalTime, TimeRange};
use crate::timeline::item::{Item, ItemKind};
use crate::transitions::TransitionType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transition {
    pub id:         TransitionId,
    pub in_offset:  RationalTime,
    pub out_offset: RationalTime,
    pub otio_index: usize,
    /// Which blend algorithm the save pipeline applies across this
    /// transition's range (§4.I). Separate from the OTIO offsets above,
    /// which define the range itself.
    #[serde(default)]
    pub render: TransitionType,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TrackEntry {
    Item(Item),
    Transition(Transition),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    pub kind:    TrackKind,
    pub entries: Vec<TrackEntry>,
}

impl Track {
    pub fn new(kind: TrackKind) -> Self {
        Self { kind, entries: Vec::new() }
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().filter_map(|e| match e {
            TrackEntry::Item(i) => Some(i),
            _ => None,
        })
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.entries.iter_mut().filter_map(|e| match e {
            TrackEntry::Item(i) => Some(i),
            _ => None,
        })
    }

    pub fn item_index(&self, id: ItemId) -> Option<usize> {
        self.entries.iter().position(|e| matches!(e, TrackEntry::Item(i) if i.id == id))
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items().find(|i| i.id == id)
    }

    /// Track duration = sum of item trimmed durations (invariant 6:
    /// transitions overlap items, they do not contribute duration).
    pub fn duration(&self, rate: f64) -> RationalTime {
        self.items().fold(RationalTime::zero(rate), |acc, item| {
            acc.add(item.trimmed_range.duration)
        })
    }

    /// Recompute every item's `parent_range` from the ordered item list —
    /// called after any structural edit (§4.F "derived parent ranges").
    pub fn relayout(&mut self, rate: f64) {
        let mut cursor = RationalTime::zero(rate);
        for entry in &mut self.entries {
            if let TrackEntry::Item(item) = entry {
                item.parent_range = TimeRange::new(cursor, item.trimmed_range.duration);
                cursor = cursor.add(item.trimmed_range.duration);
            }
        }
    }

    /// A transition's derived time range: `[prev.end - in_offset,
    /// next.start + out_offset)` (§3). `entry_index` is the transition's
    /// position in `entries`; both neighbouring items must exist.
    pub fn transition_range(&self, entry_index: usize) -> Option<TimeRange> {
        let TrackEntry::Transition(t) = &self.entries[entry_index] else { return None };
        let prev = self.entries[..entry_index].iter().rev().find_map(|e| match e {
            TrackEntry::Item(i) => Some(i),
            _ => None,
        })?;
        let next = self.entries[entry_index + 1..].iter().find_map(|e| match e {
            TrackEntry::Item(i) => Some(i),
            _ => None,
        })?;
        let start = prev.parent_range.end_time_exclusive().sub(t.in_offset);
        let end = next.parent_range.start_time.add(t.out_offset);
        Some(TimeRange::new(start, end.sub(start)))
    }

    pub fn transitions(&self) -> impl Iterator<Item = (usize, &Transition)> {
        self.entries.iter().enumerate().filter_map(|(idx, e)| match e {
            TrackEntry::Transition(t) => Some((idx, t)),
            _ => None,
        })
    }

    pub fn video_or_audio(&self, kind: ItemKind) -> bool {
        match (self.kind, kind) {
            (TrackKind::Video, ItemKind::Video | ItemKind::Gap) => true,
            (TrackKind::Audio, ItemKind::Audio | ItemKind::Gap) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;
    use crate::time::RationalTime;

    fn clip(id: u64, dur_frames: f64) -> Item {
        Item {
            id: ItemId(id),
            kind: ItemKind::Video,
            trimmed_range: TimeRange::new(RationalTime::zero(24.0), RationalTime::new(dur_frames, 24.0)),
            parent_range: TimeRange::new(RationalTime::zero(24.0), RationalTime::new(dur_frames, 24.0)),
            effects: Vec::new(),
            media: None,
            otio_index: 0,
        }
    }

    #[test]
    fn relayout_places_items_back_to_back() {
        let mut t = Track::new(TrackKind::Video);
        t.entries.push(TrackEntry::Item(clip(1, 48.0)));
        t.entries.push(TrackEntry::Item(clip(2, 72.0)));
        t.relayout(24.0);
        let second = t.item(ItemId(2)).unwrap();
        assert_eq!(second.parent_range.start_time, RationalTime::new(48.0, 24.0));
    }

    #[test]
    fn duration_ignores_transitions() {
        let mut t = Track::new(TrackKind::Video);
        t.entries.push(TrackEntry::Item(clip(1, 48.0)));
        t.entries.push(TrackEntry::Transition(Transition {
            id: TransitionId(1),
            in_offset: RationalTime::new(12.0, 24.0),
            out_offset: RationalTime::new(12.0, 24.0),
            otio_index: 0,
            render: TransitionType::default(),
        }));
        t.entries.push(TrackEntry::Item(clip(2, 48.0)));
        t.relayout(24.0);
        assert_eq!(t.duration(24.0), RationalTime::new(96.0, 24.0));
    }

    #[test]
    fn transition_range_is_derived_from_neighbours() {
        let mut t = Track::new(TrackKind::Video);
        t.entries.push(TrackEntry::Item(clip(1, 48.0)));
        t.entries.push(TrackEntry::Transition(Transition {
            id: TransitionId(1),
            in_offset: RationalTime::new(12.0, 24.0),
            out_offset: RationalTime::new(12.0, 24.0),
            otio_index: 0,
            render: TransitionType::default(),
        }));
        t.entries.push(TrackEntry::Item(clip(2, 48.0)));
        t.relayout(24.0);
        let range = t.transition_range(1).unwrap();
        assert_eq!(range.start_time, RationalTime::new(36.0, 24.0));
        assert_eq!(range.duration, RationalTime::new(24.0, 24.0));
    }
}
