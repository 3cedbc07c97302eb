// crates/scrubdeck-core/src/edit_engine/clamp.rs
//
// Drag-preview clamp rules from §4.G. `roll_clamp` mirrors
// `TimelineItemRoll::_mouseMoveEventRoll`'s `MouseMode::Transition` branch:
// both the "offset below one frame" guard and the "range outside the
// neighbours' union" guard live in the same function, applied before any
// mutation is considered, not as two separate passes.

use crate::time::{RationalTime, TimeRange};

/// Clamp a dragged clip edge so it never crosses the opposite edge (minimum
/// one frame) and never exceeds the clip's available range, if known.
pub fn edge_clamp(proposed: TimeRange, available: Option<TimeRange>, rate: f64) -> TimeRange {
    let min_duration = RationalTime::one_frame(rate);
    let duration = if proposed.duration < min_duration { min_duration } else { proposed.duration };
    let mut range = TimeRange::new(proposed.start_time, duration);

    if let Some(avail) = available {
        if range.start_time < avail.start_time {
            range = TimeRange::new(avail.start_time, range.duration);
        }
        if range.end_time_exclusive() > avail.end_time_exclusive() {
            let capped_duration = avail.end_time_exclusive().sub(range.start_time);
            range = TimeRange::new(range.start_time, capped_duration);
        }
    } else if range.start_time < RationalTime::zero(rate) {
        range = TimeRange::new(RationalTime::zero(rate), range.duration);
    }

    range
}

/// A transition's legal drag range: the two guards from
/// `TimelineItemRoll::_mouseMoveEventRoll`'s `Transition` case, combined.
/// Returns `None` when the proposed range is illegal and the drag preview
/// should hold at its last valid position.
pub fn roll_clamp(
    proposed: TimeRange,
    neighbours_union: TimeRange,
    anchor: RationalTime,
    rate: f64,
) -> Option<TimeRange> {
    let one_frame = RationalTime::one_frame(rate);
    let two_frames = RationalTime::new(2.0, rate);

    if proposed.duration <= two_frames {
        return None;
    }
    if !neighbours_union.contains_range(&proposed) {
        return None;
    }

    let in_offset = anchor.sub(proposed.start_time);
    let out_offset = proposed.end_time_exclusive().sub(anchor);
    if in_offset <= one_frame || out_offset <= one_frame {
        return None;
    }

    Some(proposed)
}

/// True when `proposed` would overlap another transition already occupying
/// part of `neighbours_union` on the same track.
pub fn transition_intersects(proposed: &TimeRange, others: &[TimeRange]) -> bool {
    others.iter().any(|other| proposed.intersects(other))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_clamp_enforces_minimum_duration() {
        let proposed = TimeRange::new(RationalTime::zero(24.0), RationalTime::new(0.0, 24.0));
        let clamped = edge_clamp(proposed, None, 24.0);
        assert_eq!(clamped.duration, RationalTime::one_frame(24.0));
    }

    #[test]
    fn edge_clamp_respects_available_range() {
        let available = TimeRange::new(RationalTime::zero(24.0), RationalTime::new(50.0, 24.0));
        let proposed = TimeRange::new(RationalTime::new(-10.0, 24.0), RationalTime::new(30.0, 24.0));
        let clamped = edge_clamp(proposed, Some(available), 24.0);
        assert_eq!(clamped.start_time, RationalTime::zero(24.0));
    }

    #[test]
    fn roll_clamp_rejects_sub_frame_offsets() {
        let union = TimeRange::new(RationalTime::zero(24.0), RationalTime::new(100.0, 24.0));
        let anchor = RationalTime::new(50.0, 24.0);
        let proposed = TimeRange::new(RationalTime::new(49.5, 24.0), RationalTime::new(20.0, 24.0));
        assert!(roll_clamp(proposed, union, anchor, 24.0).is_none());
    }

    #[test]
    fn roll_clamp_accepts_well_formed_range() {
        let union = TimeRange::new(RationalTime::zero(24.0), RationalTime::new(100.0, 24.0));
        let anchor = RationalTime::new(50.0, 24.0);
        let proposed = TimeRange::new(RationalTime::new(40.0, 24.0), RationalTime::new(20.0, 24.0));
        assert!(roll_clamp(proposed, union, anchor, 24.0).is_some());
    }
}
