// crates/scrubdeck-core/src/edit_engine/engine.rs
//
// The state machine itself. Mirrors `TimelineItemPrivate::MouseData`: a
// current mode, the items under drag, and the pressed/current drag
// positions — but spelled out per named mode rather than one `MouseMode`
// enum, since Ripple/Roll/Trim/Slip/Slide/Slice all clamp differently.

use serde::{Deserialize, Serialize};

use crate::edit_engine::clamp::{edge_clamp, roll_clamp};
use crate::edit_engine::drop_target::{associated_clip, enumerate_slots, DropTarget};
use crate::edit_engine::geometry::RibbonScale;
use crate::edit_engine::mode::EditMode;
use crate::ids::{ItemId, TrackId};
use crate::oplog::{MoveData, OperationLog};
use crate::time::{RationalTime, TimeRange};
use crate::timeline::{Timeline, TrackEntry};

/// What's under the pointer when a drag starts.
#[derive(Clone, Copy, Debug)]
pub struct DragAnchor {
    pub item:        ItemId,
    pub track:       TrackId,
    pub press_pos:   i64,
    pub press_range: TimeRange,
    /// Left edge, right edge, or whole-clip body — determines which edge a
    /// Ripple/Roll/Trim drag mutates.
    pub side:        DragSide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragSide {
    Left,
    Right,
    Body,
}

pub struct EditEngine {
    pub mode:  EditMode,
    pub scale: RibbonScale,
    anchor:    Option<DragAnchor>,
    log:       OperationLog,
    hovered_slot: Option<DropTarget>,
    /// The last range `drag_preview` computed, consumed by `end_drag` to
    /// turn the preview into a commit — the preview and the commit must
    /// agree, so the commit never recomputes geometry on its own.
    last_preview: Option<TimeRange>,
    pub edit_associated_clips: bool,
}

impl EditEngine {
    pub fn new(scale: RibbonScale) -> Self {
        Self {
            mode: EditMode::Select,
            scale,
            anchor: None,
            log: OperationLog::new(),
            hovered_slot: None,
            last_preview: None,
            edit_associated_clips: true,
        }
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    /// Called on mouse-down over an item: pushes the undo sentinel (§4.G
    /// "the engine pushes a sentinel UndoOnly op before each geometry-
    /// mutating gesture starts") and records the drag anchor.
    pub fn begin_drag(&mut self, anchor: DragAnchor) {
        if self.mode != EditMode::Select {
            self.log.push(MoveData::undo_only());
        }
        self.anchor = Some(anchor);
        self.last_preview = None;
    }

    /// Mouse-move preview: returns the clamped proposed range for the
    /// dragged item, without mutating the timeline. The UI paints this;
    /// nothing commits until `end_drag`, which consumes `last_preview`.
    pub fn drag_preview(&mut self, timeline: &Timeline, pointer_pos: i64, rate: f64) -> Option<TimeRange> {
        let anchor = self.anchor?;
        let track = timeline.track(anchor.track)?;
        let item = track.item(anchor.item)?;
        let delta_px = pointer_pos - anchor.press_pos;
        let delta_time = self.scale.pos_to_time(anchor.press_pos + delta_px, rate)
            .sub(self.scale.pos_to_time(anchor.press_pos, rate));

        if self.mode == EditMode::Roll {
            let proposed = TimeRange::new(
                anchor.press_range.start_time.add(delta_time),
                anchor.press_range.duration,
            );
            let prev = track.items().take_while(|i| i.id != anchor.item).last();
            let next = track.items().skip_while(|i| i.id != anchor.item).nth(1);
            let result = if let (Some(prev), Some(next)) = (prev, next) {
                let union = prev.parent_range.extended_by(&next.parent_range);
                let anchor_time = item.parent_range.start_time;
                roll_clamp(proposed, union, anchor_time, rate)
            } else {
                None
            };
            self.last_preview = result;
            return result;
        }

        if self.mode == EditMode::Slip {
            let proposed = TimeRange::new(
                item.trimmed_range.start_time.add(delta_time),
                item.trimmed_range.duration,
            );
            let result = edge_clamp(proposed, item.available_range(), rate);
            self.last_preview = Some(result);
            return Some(result);
        }

        let proposed = match (self.mode, anchor.side) {
            (EditMode::Trim | EditMode::Ripple, DragSide::Right) => TimeRange::new(
                anchor.press_range.start_time,
                anchor.press_range.duration.add(delta_time),
            ),
            (EditMode::Trim | EditMode::Ripple, DragSide::Left) => {
                let new_start = anchor.press_range.start_time.add(delta_time);
                TimeRange::new(new_start, anchor.press_range.end_time_exclusive().sub(new_start))
            }
            (EditMode::Slide | EditMode::Move, _) => TimeRange::new(
                anchor.press_range.start_time.add(delta_time),
                anchor.press_range.duration,
            ),
            _ => anchor.press_range,
        };

        let result = edge_clamp(proposed, item.available_range(), rate);
        self.last_preview = Some(result);
        Some(result)
    }

    /// Recompute drop-target candidates for Move/Fill/Insert/Overwrite
    /// modes and remember which one is hovered.
    pub fn update_drop_targets(&mut self, timeline: &Timeline, pointer_pos: i64, rate: f64) -> Vec<DropTarget> {
        let Some(anchor) = self.anchor else { return Vec::new() };
        let slots = enumerate_slots(timeline, anchor.item, anchor.track);
        let pointer_time = self.scale.pos_to_time(pointer_pos, rate);
        self.hovered_slot = slots
            .iter()
            .min_by(|a, b| {
                let da = (a.time.to_seconds() - pointer_time.to_seconds()).abs();
                let db = (b.time.to_seconds() - pointer_time.to_seconds()).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied();
        slots
    }

    /// Commit the current gesture: push the appropriate `MoveData` (plus
    /// the associated-clip's, when enabled) and hand the batch to the
    /// mutator. Clears drag state regardless of outcome.
    pub fn end_drag(
        &mut self,
        timeline: &Timeline,
        mutator: &mut dyn crate::oplog::TimelineMutator,
    ) -> Result<Option<crate::otio::OtioDocument>, crate::otio::OtioError> {
        let Some(anchor) = self.anchor.take() else { return Ok(None) };
        let preview = self.last_preview.take();

        match self.mode {
            // Insert behaves as a plain splice on a gapless track — same
            // commit path as Move.
            EditMode::Move | EditMode::Insert => {
                if let Some(slot) = self.hovered_slot.take() {
                    let track = timeline.track(anchor.track);
                    let from_index = track.and_then(|t| t.item_index(anchor.item)).unwrap_or(0);
                    self.log.push(MoveData::clip_move(
                        anchor.track, from_index, from_index,
                        slot.track, slot.index, slot.index,
                    ));
                    self.push_associated_clip_move(timeline, &anchor, slot, false);
                }
            }
            // Fill consumes exactly the dragged item's span at the
            // destination, same as Overwrite.
            EditMode::Fill | EditMode::Overwrite => {
                if let Some(slot) = self.hovered_slot.take() {
                    let track = timeline.track(anchor.track);
                    let from_index = track.and_then(|t| t.item_index(anchor.item)).unwrap_or(0);
                    self.log.push(MoveData::overwrite(
                        anchor.track, from_index, from_index,
                        slot.track, slot.index, slot.index,
                    ));
                    self.push_associated_clip_move(timeline, &anchor, slot, true);
                }
            }
            EditMode::Trim | EditMode::Ripple => {
                if let Some(range) = preview {
                    let track = timeline.track(anchor.track);
                    let index = track.and_then(|t| t.item_index(anchor.item)).unwrap_or(0);
                    self.log.push(MoveData::resize(
                        anchor.track, index, index,
                        anchor.side, range, self.mode == EditMode::Ripple,
                    ));
                }
            }
            EditMode::Slip => {
                if let Some(range) = preview {
                    let track = timeline.track(anchor.track);
                    let index = track.and_then(|t| t.item_index(anchor.item)).unwrap_or(0);
                    self.log.push(MoveData::slip(anchor.track, index, index, range));
                }
            }
            EditMode::Slide => {
                if let Some(range) = preview {
                    let track = timeline.track(anchor.track);
                    let index = track.and_then(|t| t.item_index(anchor.item)).unwrap_or(0);
                    let delta = range.start_time.sub(anchor.press_range.start_time);
                    self.log.push(MoveData::slide(anchor.track, index, index, delta));
                }
            }
            EditMode::Roll => {
                if let (Some(range), Some(track)) = (preview, timeline.track(anchor.track)) {
                    if let Some(item_index) = track.item_index(anchor.item) {
                        let transition_index = match anchor.side {
                            DragSide::Left => item_index.checked_sub(1),
                            _ => Some(item_index + 1),
                        };
                        if let Some(t_idx) = transition_index {
                            if matches!(track.entries.get(t_idx), Some(TrackEntry::Transition(_))) {
                                if let Some(item) = track.item(anchor.item) {
                                    let anchor_time = item.parent_range.start_time;
                                    let in_offset = anchor_time.sub(range.start_time);
                                    let out_offset = range.end_time_exclusive().sub(anchor_time);
                                    self.log.push(MoveData::transition_move(
                                        anchor.track, t_idx, t_idx, in_offset, out_offset,
                                    ));
                                }
                            }
                        }
                    }
                }
            }
            EditMode::Select | EditMode::Slice => {}
        }

        if self.log.is_empty() {
            return Ok(None);
        }

        self.log.commit_gesture(mutator).map(Some)
    }

    /// Push the paired video/audio clip's own relocation into the same
    /// batch, when `edit_associated_clips` is on (§4.G "associated clip").
    fn push_associated_clip_move(&mut self, timeline: &Timeline, anchor: &DragAnchor, slot: DropTarget, overwrite: bool) {
        if !self.edit_associated_clips {
            return;
        }
        let (Some(src_track), Some(dst_track)) = (timeline.track(anchor.track), timeline.track(slot.track)) else { return };
        let Some(paired) = associated_clip(src_track, anchor.item, dst_track) else { return };
        let paired_index = dst_track.item_index(paired).unwrap_or(0);
        let op = if overwrite {
            MoveData::overwrite(slot.track, paired_index, paired_index, slot.track, slot.index, slot.index)
        } else {
            MoveData::clip_move(slot.track, paired_index, paired_index, slot.track, slot.index, slot.index)
        };
        self.log.push(op);
    }

    pub fn cancel_drag(&mut self) {
        self.anchor = None;
        self.hovered_slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;
    use crate::timeline::{Item, ItemKind, Track, TrackEntry, TrackKind};

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

    fn scale() -> RibbonScale {
        RibbonScale { track_origin_px: 0.0, track_start: RationalTime::zero(24.0), px_per_second: 24.0 }
    }

    struct Null;
    impl crate::oplog::TimelineMutator for Null {
        fn apply(&mut self, ops: &[MoveData]) -> Result<crate::otio::OtioDocument, crate::otio::OtioError> {
            assert!(!ops.is_empty());
            Ok(Timeline::new(24.0).to_otio("t"))
        }
    }

    #[test]
    fn trim_right_extends_duration() {
        let mut tl = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        track.entries.push(TrackEntry::Item(clip(1, 0.0, 48.0)));
        tl.tracks.push(track);

        let mut engine = EditEngine::new(scale());
        engine.set_mode(EditMode::Trim);
        engine.begin_drag(DragAnchor {
            item: ItemId(1), track: TrackId(0), press_pos: 0,
            press_range: TimeRange::new(RationalTime::zero(24.0), RationalTime::new(48.0, 24.0)),
            side: DragSide::Right,
        });
        let preview = engine.drag_preview(&tl, 24, 24.0).unwrap(); // +1s
        assert!(preview.duration > RationalTime::new(48.0, 24.0));
    }

    #[test]
    fn move_commit_emits_clip_move() {
        let mut tl = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        track.entries.push(TrackEntry::Item(clip(1, 0.0, 48.0)));
        track.entries.push(TrackEntry::Item(clip(2, 48.0, 48.0)));
        tl.tracks.push(track);

        let mut engine = EditEngine::new(scale());
        engine.set_mode(EditMode::Move);
        engine.begin_drag(DragAnchor {
            item: ItemId(2), track: TrackId(0), press_pos: 48,
            press_range: TimeRange::new(RationalTime::new(48.0, 24.0), RationalTime::new(48.0, 24.0)),
            side: DragSide::Body,
        });
        engine.update_drop_targets(&tl, 0, 24.0);
        let mut mutator = Null;
        let result = engine.end_drag(&tl, &mut mutator).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn trim_commit_pushes_resize_op() {
        let mut tl = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        track.entries.push(TrackEntry::Item(clip(1, 0.0, 48.0)));
        tl.tracks.push(track);

        let mut engine = EditEngine::new(scale());
        engine.set_mode(EditMode::Trim);
        engine.begin_drag(DragAnchor {
            item: ItemId(1), track: TrackId(0), press_pos: 0,
            press_range: TimeRange::new(RationalTime::zero(24.0), RationalTime::new(48.0, 24.0)),
            side: DragSide::Right,
        });
        engine.drag_preview(&tl, 24, 24.0).unwrap();
        let mut mutator = Null;
        let result = engine.end_drag(&tl, &mut mutator).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn slip_preview_shifts_with_delta_time() {
        let mut tl = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        let mut item = clip(1, 0.0, 48.0);
        item.media = Some(crate::timeline::MediaReference {
            path: crate::path::MediaPath::from_file("/media/a.mov"),
            available_range: Some(TimeRange::new(RationalTime::new(-100.0, 24.0), RationalTime::new(300.0, 24.0))),
        });
        track.entries.push(TrackEntry::Item(item));
        tl.tracks.push(track);

        let mut engine = EditEngine::new(scale());
        engine.set_mode(EditMode::Slip);
        engine.begin_drag(DragAnchor {
            item: ItemId(1), track: TrackId(0), press_pos: 0,
            press_range: TimeRange::new(RationalTime::zero(24.0), RationalTime::new(48.0, 24.0)),
            side: DragSide::Body,
        });
        let preview = engine.drag_preview(&tl, 24, 24.0).unwrap(); // +1s
        assert_eq!(preview.start_time, RationalTime::new(24.0, 24.0));
        assert_eq!(preview.duration, RationalTime::new(48.0, 24.0));

        let mut mutator = Null;
        let result = engine.end_drag(&tl, &mut mutator).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn roll_commit_pushes_transition_move() {
        // Three items with a transition on each side of the middle one —
        // `drag_preview`'s neighbour union needs both an item before *and*
        // after the anchor, which only the middle item of three provides.
        let mut tl = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        track.entries.push(TrackEntry::Item(clip(1, 0.0, 48.0)));
        track.entries.push(TrackEntry::Transition(crate::timeline::Transition {
            id: crate::ids::TransitionId(1),
            in_offset: RationalTime::new(12.0, 24.0),
            out_offset: RationalTime::new(12.0, 24.0),
            otio_index: 0,
            render: crate::transitions::TransitionType::default(),
        }));
        track.entries.push(TrackEntry::Item(clip(2, 48.0, 48.0)));
        track.entries.push(TrackEntry::Transition(crate::timeline::Transition {
            id: crate::ids::TransitionId(2),
            in_offset: RationalTime::new(12.0, 24.0),
            out_offset: RationalTime::new(12.0, 24.0),
            otio_index: 1,
            render: crate::transitions::TransitionType::default(),
        }));
        track.entries.push(TrackEntry::Item(clip(3, 96.0, 48.0)));
        track.relayout(24.0);
        tl.tracks.push(track);

        let mut engine = EditEngine::new(scale());
        engine.set_mode(EditMode::Roll);
        engine.begin_drag(DragAnchor {
            item: ItemId(2), track: TrackId(0), press_pos: 48,
            press_range: TimeRange::new(RationalTime::new(48.0, 24.0), RationalTime::new(48.0, 24.0)),
            side: DragSide::Left,
        });
        let preview = engine.drag_preview(&tl, 36, 24.0); // half a second earlier
        assert!(preview.is_some());

        let mut mutator = Null;
        let result = engine.end_drag(&tl, &mut mutator).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn slide_commit_pushes_slide_op() {
        let mut tl = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        track.entries.push(TrackEntry::Item(clip(1, 0.0, 48.0)));
        track.entries.push(TrackEntry::Item(clip(2, 48.0, 48.0)));
        track.entries.push(TrackEntry::Item(clip(3, 96.0, 48.0)));
        track.relayout(24.0);
        tl.tracks.push(track);

        let mut engine = EditEngine::new(scale());
        engine.set_mode(EditMode::Slide);
        engine.begin_drag(DragAnchor {
            item: ItemId(2), track: TrackId(0), press_pos: 48,
            press_range: TimeRange::new(RationalTime::new(48.0, 24.0), RationalTime::new(48.0, 24.0)),
            side: DragSide::Body,
        });
        engine.drag_preview(&tl, 72, 24.0).unwrap(); // +1s
        let mut mutator = Null;
        let result = engine.end_drag(&tl, &mut mutator).unwrap();
        assert!(result.is_some());
    }
}
