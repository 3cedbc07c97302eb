// crates/scrubdeck-core/src/edit_engine/drop_target.rs
//
// Move-mode drop-target enumeration (§4.G). Grounded on
// `Private::MouseItemDropTarget` (`mouse` box for hit-testing, `draw` box
// for the indicator) and `DrawData::dropTargets`.

use crate::ids::{ItemId, TrackId};
use crate::time::RationalTime;
use crate::timeline::{Timeline, Track, TrackKind};

/// One candidate insertion slot between two items on a track (or at either
/// end). `index` is the position a `MoveData` would target.
#[derive(Clone, Copy, Debug)]
pub struct DropTarget {
    pub track: TrackId,
    pub index: usize,
    pub time:  RationalTime,
}

/// Enumerate every insertion slot on tracks of the same kind as
/// `source_track`, skipping the dragged item's own current slot.
pub fn enumerate_slots(
    timeline: &Timeline,
    dragged: ItemId,
    source_track: TrackId,
) -> Vec<DropTarget> {
    let Some(source) = timeline.track(source_track) else { return Vec::new() };
    let kind = source.kind;

    timeline
        .track_ids()
        .filter(|id| timeline.track(*id).map(|t| t.kind) == Some(kind))
        .flat_map(|track_id| slots_on_track(timeline.track(track_id).unwrap(), track_id, dragged))
        .collect()
}

fn slots_on_track(track: &Track, track_id: TrackId, dragged: ItemId) -> Vec<DropTarget> {
    let items: Vec<_> = track.items().collect();
    let mut slots = Vec::with_capacity(items.len() + 1);

    slots.push(DropTarget {
        track: track_id,
        index: 0,
        time: items.first().map(|i| i.parent_range.start_time).unwrap_or(RationalTime::zero(24.0)),
    });

    for (idx, item) in items.iter().enumerate() {
        if item.id == dragged {
            continue;
        }
        slots.push(DropTarget {
            track: track_id,
            index: idx + 1,
            time: item.parent_range.end_time_exclusive(),
        });
    }

    slots
}

/// §4.G "Associated-clip rule": a video clip and an audio clip on a paired
/// track whose parent ranges match (rescaled, fuzzy-compared) are treated
/// as one unit for selection and Move. Returns the paired item's id.
pub fn associated_clip(track: &Track, item_id: ItemId, other: &Track) -> Option<ItemId> {
    let item = track.item(item_id)?;
    if track.kind == other.kind {
        return None;
    }
    other
        .items()
        .find(|candidate| candidate.parent_range.start_time == item.parent_range.start_time
            && candidate.parent_range.duration == item.parent_range.duration)
        .map(|candidate| candidate.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;
    use crate::time::TimeRange;
    use crate::timeline::{Item, ItemKind, TrackEntry};

    fn clip(id: u64, start: f64, dur: f64) -> Item {
        Item {
            id: ItemId(id),
            kind: ItemKind::Video,
            trimmed_range: TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(dur, 24.0)),
            parent_range: TimeRange::new(RationalTime::new(start, 24.0), RationalTime::new(dur, 24.0)),
            effects: Vec::new(),
            media: None,
            otio_index: 0,
        }
    }

    #[test]
    fn enumerates_one_slot_per_item_boundary() {
        let mut timeline = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        track.entries.push(TrackEntry::Item(clip(1, 0.0, 48.0)));
        track.entries.push(TrackEntry::Item(clip(2, 48.0, 48.0)));
        timeline.tracks.push(track);

        let slots = enumerate_slots(&timeline, ItemId(99), TrackId(0));
        assert_eq!(slots.len(), 3); // before item 1, after item 1, after item 2
    }

    #[test]
    fn associated_clip_matches_equal_parent_ranges() {
        let mut video = Track::new(TrackKind::Video);
        video.entries.push(TrackEntry::Item(clip(1, 0.0, 48.0)));
        let mut audio = Track::new(TrackKind::Audio);
        audio.entries.push(TrackEntry::Item(clip(2, 0.0, 48.0)));

        assert_eq!(associated_clip(&video, ItemId(1), &audio), Some(ItemId(2)));
    }
}
