// crates/scrubdeck-core/src/oplog.rs
//
// §4.H Operation Log. `MoveData` mirrors tlRender's `timeline::MoveData`
// (see TimelineItemRoll.cpp's `moveData.push_back({...})` call) field for
// field, renamed to Rust case. The engine batches one gesture into one
// `OperationLog::commit_gesture` call.

use serde::{Deserialize, Serialize};

use crate::edit_engine::DragSide;
use crate::ids::TrackId;
use crate::otio::{OtioDocument, OtioError};
use crate::time::{RationalTime, TimeRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpType {
    Clip,
    Transition,
    /// Trim/Ripple: one edge of the item moves, carried in `new_trimmed_range`.
    Resize,
    /// Slip: the source window shifts under a fixed parent range.
    Slip,
    /// Slide: the dragged item stays put; its two neighbours absorb the motion.
    Slide,
    /// Fill/Overwrite: relocates like `Clip`, but consumes exactly the
    /// dragged item's duration at the destination instead of displacing it.
    Overwrite,
    /// A sentinel pushed before a geometry-mutating gesture starts so the
    /// external mutator can snapshot undo state; carries no geometry.
    UndoOnly,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MoveData {
    pub op_type:       OpType,
    pub from_track:    TrackId,
    pub from_index:    usize,
    pub from_otio_index: usize,
    pub to_track:      TrackId,
    pub to_index:      usize,
    pub to_otio_index: usize,
    pub in_offset:     Option<RationalTime>,
    pub out_offset:    Option<RationalTime>,
    /// Which edge a `Resize` drags. Unused by the other op types.
    pub side:          Option<DragSide>,
    /// The dragged-to range for `Resize`/`Slip`/`Slide`.
    pub new_trimmed_range: Option<TimeRange>,
    /// `Resize` only: true for Ripple (downstream shifts), false for Trim
    /// (downstream holds, absorbed by an adjacent gap).
    pub ripple:        bool,
}

impl MoveData {
    pub fn undo_only() -> Self {
        Self {
            op_type: OpType::UndoOnly,
            from_track: TrackId(0),
            from_index: 0,
            from_otio_index: 0,
            to_track: TrackId(0),
            to_index: 0,
            to_otio_index: 0,
            in_offset: None,
            out_offset: None,
            side: None,
            new_trimmed_range: None,
            ripple: false,
        }
    }

    pub fn clip_move(from_track: TrackId, from_index: usize, from_otio_index: usize,
                      to_track: TrackId, to_index: usize, to_otio_index: usize) -> Self {
        Self {
            op_type: OpType::Clip,
            from_track, from_index, from_otio_index,
            to_track, to_index, to_otio_index,
            in_offset: None,
            out_offset: None,
            side: None,
            new_trimmed_range: None,
            ripple: false,
        }
    }

    pub fn overwrite(from_track: TrackId, from_index: usize, from_otio_index: usize,
                      to_track: TrackId, to_index: usize, to_otio_index: usize) -> Self {
        Self {
            op_type: OpType::Overwrite,
            from_track, from_index, from_otio_index,
            to_track, to_index, to_otio_index,
            in_offset: None,
            out_offset: None,
            side: None,
            new_trimmed_range: None,
            ripple: false,
        }
    }

    pub fn transition_move(track: TrackId, index: usize, otio_index: usize,
                            in_offset: RationalTime, out_offset: RationalTime) -> Self {
        Self {
            op_type: OpType::Transition,
            from_track: track, from_index: index, from_otio_index: otio_index,
            to_track: track, to_index: index, to_otio_index: otio_index,
            in_offset: Some(in_offset),
            out_offset: Some(out_offset),
            side: None,
            new_trimmed_range: None,
            ripple: false,
        }
    }

    pub fn resize(track: TrackId, index: usize, otio_index: usize,
                  side: DragSide, new_trimmed_range: TimeRange, ripple: bool) -> Self {
        Self {
            op_type: OpType::Resize,
            from_track: track, from_index: index, from_otio_index: otio_index,
            to_track: track, to_index: index, to_otio_index: otio_index,
            in_offset: None,
            out_offset: None,
            side: Some(side),
            new_trimmed_range: Some(new_trimmed_range),
            ripple,
        }
    }

    pub fn slip(track: TrackId, index: usize, otio_index: usize, new_trimmed_range: TimeRange) -> Self {
        Self {
            op_type: OpType::Slip,
            from_track: track, from_index: index, from_otio_index: otio_index,
            to_track: track, to_index: index, to_otio_index: otio_index,
            in_offset: None,
            out_offset: None,
            side: None,
            new_trimmed_range: Some(new_trimmed_range),
            ripple: false,
        }
    }

    /// `delta` is the signed shift applied to the dragged item's position;
    /// the mutator grows one neighbour and shrinks the other by it.
    pub fn slide(track: TrackId, index: usize, otio_index: usize, delta: RationalTime) -> Self {
        Self {
            op_type: OpType::Slide,
            from_track: track, from_index: index, from_otio_index: otio_index,
            to_track: track, to_index: index, to_otio_index: otio_index,
            in_offset: Some(delta),
            out_offset: None,
            side: None,
            new_trimmed_range: None,
            ripple: false,
        }
    }
}

/// The opaque external mutator (§9 Design Note): owns the authoritative
/// document and the undo history, and knows how to turn one gesture's
/// `MoveData` batch into a new document. The engine never retains a
/// pre-image itself.
pub trait TimelineMutator {
    fn apply(&mut self, ops: &[MoveData]) -> Result<OtioDocument, OtioError>;
}

#[derive(Default)]
pub struct OperationLog {
    pending: Vec<MoveData>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: MoveData) {
        self.pending.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deliver everything accumulated during one gesture as a single call,
    /// then clear the pending buffer regardless of outcome.
    pub fn commit_gesture(&mut self, mutator: &mut dyn TimelineMutator) -> Result<OtioDocument, OtioError> {
        let ops = std::mem::take(&mut self.pending);
        mutator.apply(&ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullMutator;
    impl TimelineMutator for NullMutator {
        fn apply(&mut self, ops: &[MoveData]) -> Result<OtioDocument, OtioError> {
            assert!(!ops.is_empty());
            Ok(crate::timeline::Timeline::new(24.0).to_otio("test"))
        }
    }

    #[test]
    fn commit_gesture_batches_and_clears() {
        let mut log = OperationLog::new();
        log.push(MoveData::undo_only());
        log.push(MoveData::clip_move(TrackId(0), 0, 0, TrackId(0), 1, 1));
        assert!(!log.is_empty());

        let mut mutator = NullMutator;
        log.commit_gesture(&mut mutator).unwrap();
        assert!(log.is_empty());
    }
}
