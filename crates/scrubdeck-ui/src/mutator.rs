// crates/scrubdeck-ui/src/mutator.rs
//
// The "opaque external mutator" from §9's Design Note: the edit engine never
// sees a document, only `MoveData`. `InMemoryMutator` is the one concrete
// implementation of `TimelineMutator` this app ships — it holds the
// authoritative `OtioDocument` plus the undo/redo history, and turns one
// gesture's batch of `MoveData` into a brand-new document every time
// (§4.F: "recreated wholesale").

use scrubdeck_core::edit_engine::DragSide;
use scrubdeck_core::ids::{ItemId, TrackId};
use scrubdeck_core::oplog::{MoveData, OpType, TimelineMutator};
use scrubdeck_core::otio::{OtioDocument, OtioError};
use scrubdeck_core::time::RationalTime;
use scrubdeck_core::timeline::{Item, ItemKind, MediaReference, Timeline, Track, TrackEntry, TrackKind};

pub struct InMemoryMutator {
    document:   OtioDocument,
    undo_stack: Vec<OtioDocument>,
    redo_stack: Vec<OtioDocument>,
    rate:       f64,
}

impl InMemoryMutator {
    pub fn new(document: OtioDocument, rate: f64) -> Self {
        Self { document, undo_stack: Vec::new(), redo_stack: Vec::new(), rate }
    }

    pub fn document(&self) -> &OtioDocument {
        &self.document
    }

    pub fn timeline(&self) -> Result<Timeline, OtioError> {
        self.document.to_timeline(self.rate)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.undo_stack.pop() else { return false };
        self.redo_stack.push(self.document.clone());
        self.document = prev;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else { return false };
        self.undo_stack.push(self.document.clone());
        self.document = next;
        true
    }

    fn move_clip(timeline: &mut Timeline, op: &MoveData) -> Option<()> {
        let entry = {
            let from_track = timeline.track_mut(op.from_track)?;
            if op.from_index >= from_track.entries.len() {
                return None;
            }
            from_track.entries.remove(op.from_index)
        };

        let to_track = timeline.track_mut(op.to_track)?;
        let insert_at = op.to_index.min(to_track.entries.len());
        to_track.entries.insert(insert_at, entry);
        Some(())
    }

    fn move_transition(timeline: &mut Timeline, op: &MoveData) -> Option<()> {
        let (in_offset, out_offset) = (op.in_offset?, op.out_offset?);
        let track = timeline.track_mut(op.from_track)?;
        if let Some(TrackEntry::Transition(t)) = track.entries.get_mut(op.from_index) {
            t.in_offset = in_offset;
            t.out_offset = out_offset;
        }
        Some(())
    }

    /// Trim/Ripple. Ripple just rewrites the dragged item's own
    /// `trimmed_range` — `Track::relayout` naturally shifts everything
    /// downstream from the new cumulative duration. True Trim additionally
    /// grows/shrinks (or inserts/removes) the adjacent gap so the rest of
    /// the track holds its position.
    fn resize_item(timeline: &mut Timeline, op: &MoveData) -> Option<()> {
        let side = op.side?;
        let mut new_range = op.new_trimmed_range?;
        let rate = timeline.rate;
        let track = timeline.track_mut(op.from_track)?;
        let idx = op.from_index;
        let old_duration = match track.entries.get(idx) {
            Some(TrackEntry::Item(i)) => i.trimmed_range.duration,
            _ => return None,
        };

        let neighbor_idx = match side {
            DragSide::Right => Some(idx + 1),
            DragSide::Left => idx.checked_sub(1),
            DragSide::Body => None,
        };

        if !op.ripple {
            let delta = new_range.duration.sub(old_duration);
            let capacity = neighbor_idx.map(|n| gap_capacity(track, n, rate)).unwrap_or(RationalTime::zero(rate));
            if delta.value > 0.0 && delta > capacity {
                new_range = clamp_growth(new_range, old_duration, capacity, side);
            }
        }

        if let Some(TrackEntry::Item(item)) = track.entries.get_mut(idx) {
            item.trimmed_range = new_range;
        }

        if !op.ripple {
            let final_delta = new_range.duration.sub(old_duration);
            compensate_with_gap(track, neighbor_idx, side, idx, final_delta, rate);
        }

        track.relayout(rate);
        Some(())
    }

    /// Slip: only the source window moves, never the track position, so no
    /// gap bookkeeping or relayout is needed — duration is unchanged.
    fn slip_item(timeline: &mut Timeline, op: &MoveData) -> Option<()> {
        let new_range = op.new_trimmed_range?;
        let track = timeline.track_mut(op.from_track)?;
        if let Some(TrackEntry::Item(item)) = track.entries.get_mut(op.from_index) {
            item.trimmed_range = new_range;
        }
        Some(())
    }

    /// Slide: the dragged item's own entry never moves; its two immediate
    /// neighbours grow/shrink by the same delta so the gesture "pushes"
    /// the dragged item's position without touching a drop target.
    fn slide_item(timeline: &mut Timeline, op: &MoveData) -> Option<()> {
        let delta = op.in_offset?;
        let rate = timeline.rate;
        let track = timeline.track_mut(op.from_track)?;
        let idx = op.from_index;
        let prev_idx = (0..idx).rev().find(|&i| matches!(track.entries.get(i), Some(TrackEntry::Item(_))))?;
        let next_idx = (idx + 1..track.entries.len()).find(|&i| matches!(track.entries.get(i), Some(TrackEntry::Item(_))))?;

        let prev_duration = match &track.entries[prev_idx] { TrackEntry::Item(i) => i.trimmed_range.duration, _ => return None };
        let next_duration = match &track.entries[next_idx] { TrackEntry::Item(i) => i.trimmed_range.duration, _ => return None };
        let new_prev = prev_duration.add(delta);
        let new_next = next_duration.sub(delta);
        if new_prev.value <= 0.0 || new_next.value <= 0.0 {
            return None;
        }

        if let TrackEntry::Item(item) = &mut track.entries[prev_idx] {
            item.trimmed_range.duration = new_prev;
        }
        if let TrackEntry::Item(item) = &mut track.entries[next_idx] {
            item.trimmed_range.duration = new_next;
        }
        track.relayout(rate);
        Some(())
    }

    /// Fill/Overwrite: unlike `move_clip`'s plain splice, the destination
    /// span is consumed exactly — entries fully inside the dragged item's
    /// duration are removed outright, the boundary entry is trimmed, and
    /// nothing past that point shifts.
    fn overwrite_clip(timeline: &mut Timeline, op: &MoveData) -> Option<()> {
        let entry = {
            let from_track = timeline.track_mut(op.from_track)?;
            if op.from_index >= from_track.entries.len() {
                return None;
            }
            from_track.entries.remove(op.from_index)
        };
        let dragged_duration = match &entry {
            TrackEntry::Item(i) => i.trimmed_range.duration,
            _ => return None,
        };

        let rate = timeline.rate;
        let to_track = timeline.track_mut(op.to_track)?;
        let mut insert_at = op.to_index.min(to_track.entries.len());
        let mut consumed = RationalTime::zero(rate);

        while insert_at < to_track.entries.len() && consumed < dragged_duration {
            match &to_track.entries[insert_at] {
                TrackEntry::Item(existing) => {
                    let remaining = dragged_duration.sub(consumed);
                    if existing.trimmed_range.duration <= remaining {
                        consumed = consumed.add(existing.trimmed_range.duration);
                        to_track.entries.remove(insert_at);
                    } else {
                        if let TrackEntry::Item(existing) = &mut to_track.entries[insert_at] {
                            existing.trimmed_range.start_time = existing.trimmed_range.start_time.add(remaining);
                            existing.trimmed_range.duration = existing.trimmed_range.duration.sub(remaining);
                        }
                        consumed = consumed.add(remaining);
                    }
                }
                TrackEntry::Transition(_) => {
                    to_track.entries.remove(insert_at);
                }
            }
        }

        to_track.entries.insert(insert_at, entry);
        to_track.relayout(rate);
        Some(())
    }

    /// Appends one new clip to the end of `track` (creating a video track
    /// if the document has none yet). Structural insertion from the
    /// library bin isn't a drag gesture over an existing item, so it
    /// bypasses `MoveData`/`OperationLog` the same way `split_entry` does —
    /// both mutate a rebuilt `Timeline` directly and re-serialize.
    pub fn append_clip(&mut self, track: TrackId, media: MediaReference, duration: scrubdeck_core::time::RationalTime) {
        self.undo_stack.push(self.document.clone());
        self.redo_stack.clear();

        let mut timeline = self.document.to_timeline(self.rate).unwrap_or_else(|_| Timeline::new(self.rate));
        while timeline.tracks.len() <= track.0 {
            timeline.tracks.push(Track::new(TrackKind::Video));
        }

        let range = scrubdeck_core::time::TimeRange::new(scrubdeck_core::time::RationalTime::zero(duration.rate), duration);
        let item = Item {
            id: ItemId::next(),
            kind: ItemKind::Video,
            trimmed_range: range,
            parent_range: range,
            effects: Vec::new(),
            media: Some(media),
            otio_index: 0,
        };
        timeline.tracks[track.0].entries.push(TrackEntry::Item(item));
        timeline.relayout();
        self.document = timeline.to_otio(&self.document.name);
    }

    /// Splits the entry on `track` under `at`, same bypass as `append_clip`.
    /// No-op (besides the wasted undo snapshot) if nothing sits under `at`.
    pub fn slice(&mut self, track: TrackId, at: scrubdeck_core::time::RationalTime) {
        self.undo_stack.push(self.document.clone());
        self.redo_stack.clear();

        let Ok(mut timeline) = self.document.to_timeline(self.rate) else {
            self.undo_stack.pop();
            return;
        };
        if split_entry(&mut timeline, track, at).is_none() {
            self.undo_stack.pop();
            return;
        }
        self.document = timeline.to_otio(&self.document.name);
    }

    /// Snapshots the current document for undo without mutating anything —
    /// used by edits that don't go through `apply`/`append_clip`/`slice`.
    pub fn push_undo_snapshot(&mut self) {
        self.undo_stack.push(self.document.clone());
        self.redo_stack.clear();
    }
}

impl TimelineMutator for InMemoryMutator {
    fn apply(&mut self, ops: &[MoveData]) -> Result<OtioDocument, OtioError> {
        let mut took_snapshot = false;
        let mut timeline = self.document.to_timeline(self.rate)?;

        for op in ops {
            match op.op_type {
                OpType::UndoOnly => {
                    if !took_snapshot {
                        self.undo_stack.push(self.document.clone());
                        self.redo_stack.clear();
                        took_snapshot = true;
                    }
                }
                OpType::Clip => {
                    Self::move_clip(&mut timeline, op);
                }
                OpType::Transition => {
                    Self::move_transition(&mut timeline, op);
                }
                OpType::Resize => {
                    Self::resize_item(&mut timeline, op);
                }
                OpType::Slip => {
                    Self::slip_item(&mut timeline, op);
                }
                OpType::Slide => {
                    Self::slide_item(&mut timeline, op);
                }
                OpType::Overwrite => {
                    Self::overwrite_clip(&mut timeline, op);
                }
            }
        }

        timeline.relayout();
        self.document = timeline.to_otio(&self.document.name);
        Ok(self.document.clone())
    }
}

/// How much a true Trim (non-ripple) may grow into the entry at `idx`
/// without displacing anything downstream — zero unless that entry is a gap.
fn gap_capacity(track: &Track, idx: usize, rate: f64) -> RationalTime {
    match track.entries.get(idx) {
        Some(TrackEntry::Item(i)) if i.is_gap() => i.trimmed_range.duration,
        _ => RationalTime::zero(rate),
    }
}

/// Re-derive `new_range` so its duration only grows by `allowed_delta`,
/// keeping the edge opposite `side` fixed.
fn clamp_growth(new_range: scrubdeck_core::time::TimeRange, old_duration: RationalTime, allowed_delta: RationalTime, side: DragSide) -> scrubdeck_core::time::TimeRange {
    let new_duration = old_duration.add(allowed_delta);
    match side {
        DragSide::Right => scrubdeck_core::time::TimeRange::new(new_range.start_time, new_duration),
        DragSide::Left => {
            let end = new_range.end_time_exclusive();
            scrubdeck_core::time::TimeRange::new(end.sub(new_duration), new_duration)
        }
        DragSide::Body => new_range,
    }
}

/// Absorb a Trim's duration delta into the adjacent gap: shrink/grow it
/// when one already exists at `neighbor_idx`, otherwise insert a fresh one
/// (when the item shrank) or do nothing (growth with no gap is already
/// capped to zero by `gap_capacity`/`clamp_growth`).
fn compensate_with_gap(track: &mut Track, neighbor_idx: Option<usize>, side: DragSide, idx: usize, delta: RationalTime, rate: f64) {
    if delta.value == 0.0 {
        return;
    }

    if let Some(n) = neighbor_idx {
        if let Some(TrackEntry::Item(gap_item)) = track.entries.get_mut(n) {
            if gap_item.is_gap() {
                let new_gap_duration = gap_item.trimmed_range.duration.sub(delta);
                if new_gap_duration.value <= 0.0 {
                    track.entries.remove(n);
                } else {
                    gap_item.trimmed_range.duration = new_gap_duration;
                    gap_item.parent_range.duration = new_gap_duration;
                }
                return;
            }
        }
    }

    if delta.value < 0.0 {
        let gap_duration = RationalTime::new(-delta.value, rate);
        let gap = Item::new_gap(ItemId::next(), gap_duration, 0);
        let insert_at = match side {
            DragSide::Right => idx + 1,
            DragSide::Left | DragSide::Body => idx,
        };
        track.entries.insert(insert_at, TrackEntry::Item(gap));
    }
}

/// Helper for `SliceAt`/other non-gesture edits the edit engine doesn't
/// batch through `MoveData` — callers snapshot for undo themselves since
/// these don't go through `OperationLog::commit_gesture`.
pub fn split_entry(timeline: &mut Timeline, track: TrackId, at: scrubdeck_core::time::RationalTime) -> Option<()> {
    let rate = timeline.rate;
    let track = timeline.track_mut(track)?;
    let idx = track.items().position(|item| item.parent_range.contains_time(at))?;
    let item = match &track.entries[idx] {
        TrackEntry::Item(item) => item.clone(),
        _ => return None,
    };
    if !item.parent_range.contains_time(at) {
        return None;
    }

    let split_offset = at.rescaled_to(item.trimmed_range.start_time.rate).sub(item.parent_range.start_time);
    let left_duration = split_offset;
    let right_duration = item.trimmed_range.duration.sub(split_offset);
    if left_duration.value <= 0.0 || right_duration.value <= 0.0 {
        return None;
    }

    let mut left = item.clone();
    left.trimmed_range.duration = left_duration;
    left.parent_range.duration = left_duration;

    let mut right = item;
    right.id = scrubdeck_core::ids::ItemId::next();
    right.trimmed_range.start_time = right.trimmed_range.start_time.add(left_duration);
    right.trimmed_range.duration = right_duration;
    right.parent_range.duration = right_duration;

    track.entries[idx] = TrackEntry::Item(left);
    track.entries.insert(idx + 1, TrackEntry::Item(right));
    track.relayout(rate);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubdeck_core::path::MediaPath;
    use scrubdeck_core::time::{RationalTime, TimeRange};
    use scrubdeck_core::timeline::{Item, ItemKind, MediaReference, Track, TrackKind};

    fn clip(id: u64, dur: f64) -> Item {
        let range = TimeRange::new(RationalTime::zero(24.0), RationalTime::new(dur, 24.0));
        Item {
            id: scrubdeck_core::ids::ItemId(id),
            kind: ItemKind::Video,
            trimmed_range: range,
            parent_range: range,
            effects: Vec::new(),
            media: Some(MediaReference { path: MediaPath::from_file("/media/a.mov"), available_range: Some(range) }),
            otio_index: 0,
        }
    }

    fn two_track_document() -> OtioDocument {
        let mut timeline = Timeline::new(24.0);
        let mut v1 = Track::new(TrackKind::Video);
        v1.entries.push(TrackEntry::Item(clip(1, 24.0)));
        v1.entries.push(TrackEntry::Item(clip(2, 24.0)));
        v1.relayout(24.0);
        let v2 = Track::new(TrackKind::Video);
        timeline.tracks.push(v1);
        timeline.tracks.push(v2);
        timeline.to_otio("test")
    }

    fn three_item_document() -> OtioDocument {
        let mut timeline = Timeline::new(24.0);
        let mut v1 = Track::new(TrackKind::Video);
        v1.entries.push(TrackEntry::Item(clip(1, 24.0)));
        v1.entries.push(TrackEntry::Item(clip(2, 24.0)));
        v1.entries.push(TrackEntry::Item(clip(3, 24.0)));
        v1.relayout(24.0);
        timeline.tracks.push(v1);
        timeline.to_otio("test")
    }

    fn document_with_target_track() -> OtioDocument {
        let mut timeline = Timeline::new(24.0);
        let mut v1 = Track::new(TrackKind::Video);
        v1.entries.push(TrackEntry::Item(clip(1, 10.0)));
        v1.relayout(24.0);
        let mut v2 = Track::new(TrackKind::Video);
        v2.entries.push(TrackEntry::Item(clip(2, 24.0)));
        v2.relayout(24.0);
        timeline.tracks.push(v1);
        timeline.tracks.push(v2);
        timeline.to_otio("test")
    }

    #[test]
    fn clip_move_relocates_entry_between_tracks() {
        let mut mutator = InMemoryMutator::new(two_track_document(), 24.0);
        let ops = vec![MoveData::clip_move(TrackId(0), 0, 0, TrackId(1), 0, 0)];
        mutator.apply(&ops).unwrap();

        let timeline = mutator.timeline().unwrap();
        assert_eq!(timeline.tracks[0].items().count(), 1);
        assert_eq!(timeline.tracks[1].items().count(), 1);
        assert_eq!(timeline.tracks[1].item(scrubdeck_core::ids::ItemId(1)).unwrap().id.0, 1);
    }

    #[test]
    fn undo_only_snapshots_before_mutation() {
        let mut mutator = InMemoryMutator::new(two_track_document(), 24.0);
        assert!(!mutator.can_undo());

        let ops = vec![MoveData::undo_only(), MoveData::clip_move(TrackId(0), 0, 0, TrackId(1), 0, 0)];
        mutator.apply(&ops).unwrap();
        assert!(mutator.can_undo());

        mutator.undo();
        assert!(!mutator.can_undo());
        assert!(mutator.can_redo());
        let timeline = mutator.timeline().unwrap();
        assert_eq!(timeline.tracks[0].items().count(), 2);
    }

    #[test]
    fn resize_trim_compensates_with_gap_to_hold_downstream() {
        let mut mutator = InMemoryMutator::new(two_track_document(), 24.0);
        let new_range = TimeRange::new(RationalTime::zero(24.0), RationalTime::new(19.0, 24.0));
        let ops = vec![MoveData::resize(TrackId(0), 0, 0, DragSide::Right, new_range, false)];
        mutator.apply(&ops).unwrap();

        let timeline = mutator.timeline().unwrap();
        let track = &timeline.tracks[0];
        assert_eq!(track.entries.len(), 3);
        match &track.entries[1] {
            TrackEntry::Item(gap) => {
                assert!(gap.is_gap());
                assert_eq!(gap.trimmed_range.duration, RationalTime::new(5.0, 24.0));
            }
            _ => panic!("expected a gap entry"),
        }
        let second = track.item(ItemId(2)).unwrap();
        assert_eq!(second.parent_range.start_time, RationalTime::new(24.0, 24.0));
    }

    #[test]
    fn resize_ripple_shifts_downstream_with_no_gap() {
        let mut mutator = InMemoryMutator::new(two_track_document(), 24.0);
        let new_range = TimeRange::new(RationalTime::zero(24.0), RationalTime::new(19.0, 24.0));
        let ops = vec![MoveData::resize(TrackId(0), 0, 0, DragSide::Right, new_range, true)];
        mutator.apply(&ops).unwrap();

        let timeline = mutator.timeline().unwrap();
        let track = &timeline.tracks[0];
        assert_eq!(track.entries.len(), 2);
        let second = track.item(ItemId(2)).unwrap();
        assert_eq!(second.parent_range.start_time, RationalTime::new(19.0, 24.0));
    }

    #[test]
    fn slip_shifts_source_window_without_moving_track_position() {
        let mut mutator = InMemoryMutator::new(two_track_document(), 24.0);
        let shifted = TimeRange::new(RationalTime::new(5.0, 24.0), RationalTime::new(24.0, 24.0));
        let ops = vec![MoveData::slip(TrackId(0), 0, 0, shifted)];
        mutator.apply(&ops).unwrap();

        let timeline = mutator.timeline().unwrap();
        let item = timeline.tracks[0].item(ItemId(1)).unwrap();
        assert_eq!(item.trimmed_range.start_time, RationalTime::new(5.0, 24.0));
        assert_eq!(item.parent_range.start_time, RationalTime::zero(24.0));
    }

    #[test]
    fn slide_grows_one_neighbour_and_shrinks_the_other() {
        let mut mutator = InMemoryMutator::new(three_item_document(), 24.0);
        let ops = vec![MoveData::slide(TrackId(0), 1, 1, RationalTime::new(4.0, 24.0))];
        mutator.apply(&ops).unwrap();

        let timeline = mutator.timeline().unwrap();
        let track = &timeline.tracks[0];
        let prev = track.item(ItemId(1)).unwrap();
        let next = track.item(ItemId(3)).unwrap();
        assert_eq!(prev.trimmed_range.duration, RationalTime::new(28.0, 24.0));
        assert_eq!(next.trimmed_range.duration, RationalTime::new(20.0, 24.0));
    }

    #[test]
    fn overwrite_trims_the_partially_covered_destination_entry() {
        let mut mutator = InMemoryMutator::new(document_with_target_track(), 24.0);
        let ops = vec![MoveData::overwrite(TrackId(0), 0, 0, TrackId(1), 0, 0)];
        mutator.apply(&ops).unwrap();

        let timeline = mutator.timeline().unwrap();
        assert_eq!(timeline.tracks[0].items().count(), 0);

        let track1 = &timeline.tracks[1];
        assert_eq!(track1.entries.len(), 2);
        let dragged = track1.item(ItemId(1)).unwrap();
        assert_eq!(dragged.trimmed_range.duration, RationalTime::new(10.0, 24.0));
        let remainder = track1.item(ItemId(2)).unwrap();
        assert_eq!(remainder.trimmed_range.start_time, RationalTime::new(10.0, 24.0));
        assert_eq!(remainder.trimmed_range.duration, RationalTime::new(14.0, 24.0));
    }

    #[test]
    fn split_entry_divides_duration_at_the_cut_point() {
        let mut timeline = two_track_document().to_timeline(24.0).unwrap();
        let at = RationalTime::new(10.0, 24.0);
        split_entry(&mut timeline, TrackId(0), at).unwrap();

        let items: Vec<_> = timeline.tracks[0].items().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].trimmed_range.duration, RationalTime::new(10.0, 24.0));
        assert_eq!(items[1].trimmed_range.duration, RationalTime::new(14.0, 24.0));
    }
}
