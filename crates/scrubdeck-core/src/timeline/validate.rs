// crates/scrubdeck-core/src/timeline/validate.rs
//
// The six invariants from §3, checked as a batch rather than prevented by
// construction everywhere — the edit engine calls this after every commit
// (debug builds) and it is exercised directly in tests (§8 property 3).

use thiserror::Error;
use crate::ids::{ItemId, TrackId};
use crate::timeline::model::Timeline;
use crate::timeline::track::TrackEntry;

#[derive(Debug, Error, PartialEq)]
pub enum InvariantViolation {
    #[error("track {0:?} item {1:?}: adjacent items do not touch")]
    ItemsDoNotTouch(TrackId, ItemId),
    #[error("track {0:?} transition at entry {1}: range not contained in neighbours")]
    TransitionOutsideNeighbours(TrackId, usize),
    #[error("track {0:?} transition at entry {1}: shorter than 2 frames")]
    TransitionTooShort(TrackId, usize),
    #[error("track {0:?} transition at entry {1}: offset below 1 frame")]
    TransitionOffsetTooSmall(TrackId, usize),
    #[error("track {0:?}: two transitions overlap")]
    OverlappingTransitions(TrackId),
    #[error("item {0:?}: trimmed range exceeds available range")]
    TrimmedRangeExceedsAvailable(ItemId),
    #[error("track {0:?}: total duration does not match sum of item durations")]
    DurationMismatch(TrackId),
}

pub fn validate(timeline: &Timeline) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (track_idx, track) in timeline.tracks.iter().enumerate() {
        let tid = TrackId(track_idx);

        // Invariant 1: adjacent items touch (no implicit gaps).
        let mut prev_end = None;
        for entry in &track.entries {
            if let TrackEntry::Item(item) = entry {
                if let Some(end) = prev_end {
                    if item.parent_range.start_time != end {
                        violations.push(InvariantViolation::ItemsDoNotTouch(tid, item.id));
                    }
                }
                prev_end = Some(item.parent_range.end_time_exclusive());
            }
        }

        // Invariants 2/3: transition range + offsets.
        let mut last_transition_end = None;
        for (idx, _t) in track.transitions() {
            let Some(range) = track.transition_range(idx) else { continue };
            let prev = track.entries[..idx].iter().rev().find_map(|e| match e {
                TrackEntry::Item(i) => Some(i),
                _ => None,
            });
            let next = track.entries[idx + 1..].iter().find_map(|e| match e {
                TrackEntry::Item(i) => Some(i),
                _ => None,
            });
            if let (Some(prev), Some(next)) = (prev, next) {
                let union = prev.parent_range.extended_by(&next.parent_range);
                if !union.contains_range(&range) {
                    violations.push(InvariantViolation::TransitionOutsideNeighbours(tid, idx));
                }
            }
            if range.duration < crate::time::RationalTime::new(2.0, range.duration.rate) {
                violations.push(InvariantViolation::TransitionTooShort(tid, idx));
            }
            if let TrackEntry::Transition(t) = &track.entries[idx] {
                let one_frame = crate::time::RationalTime::one_frame(t.in_offset.rate);
                if t.in_offset < one_frame || t.out_offset < one_frame {
                    violations.push(InvariantViolation::TransitionOffsetTooSmall(tid, idx));
                }
            }
            // Invariant 4: transitions never overlap.
            if let Some(last_end) = last_transition_end {
                if range.start_time < last_end {
                    violations.push(InvariantViolation::OverlappingTransitions(tid));
                }
            }
            last_transition_end = Some(range.end_time_exclusive());
        }

        // Invariant 5: trimmed range contained in available range, if known.
        for item in track.items() {
            if let Some(avail) = item.available_range() {
                if !avail.contains_range(&item.trimmed_range) {
                    violations.push(InvariantViolation::TrimmedRangeExceedsAvailable(item.id));
                }
            }
        }

        // Invariant 6: track duration equals sum of item durations.
        let sum = track.duration(timeline.rate);
        let derived_end = track.items().last().map(|i| i.parent_range.end_time_exclusive());
        if let Some(end) = derived_end {
            if end.sub(timeline.global_start_time) != sum {
                violations.push(InvariantViolation::DurationMismatch(tid));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;
    use crate::time::{RationalTime, TimeRange};
    use crate::timeline::item::{Item, ItemKind};
    use crate::timeline::track::{Track, TrackKind};

    fn clip(id: u64, dur: f64) -> Item {
        Item {
            id: ItemId(id),
            kind: ItemKind::Video,
            trimmed_range: TimeRange::new(RationalTime::zero(24.0), RationalTime::new(dur, 24.0)),
            parent_range: TimeRange::new(RationalTime::zero(24.0), RationalTime::new(dur, 24.0)),
            effects: Vec::new(),
            media: None,
            otio_index: 0,
        }
    }

    #[test]
    fn well_formed_timeline_has_no_violations() {
        let mut tl = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        track.entries.push(TrackEntry::Item(clip(1, 48.0)));
        track.entries.push(TrackEntry::Item(clip(2, 48.0)));
        track.relayout(24.0);
        tl.tracks.push(track);
        assert!(validate(&tl).is_empty());
    }

    #[test]
    fn gap_between_items_is_flagged() {
        let mut tl = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        let mut second = clip(2, 48.0);
        second.parent_range = TimeRange::new(RationalTime::new(60.0, 24.0), second.trimmed_range.duration);
        track.entries.push(TrackEntry::Item(clip(1, 48.0)));
        track.entries.push(TrackEntry::Item(second));
        tl.tracks.push(track); // no relayout — leaves the gap in place
        let violations = validate(&tl);
        assert!(violations.iter().any(|v| matches!(v, InvariantViolation::ItemsDoNotTouch(_, _))));
    }
}
