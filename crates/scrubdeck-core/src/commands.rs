// crates/scrubdeck-core/src/commands.rs
//
// Every user action is expressed as an EditorCommand. Widgets emit these;
// the app processes them after the UI pass. Adding a feature = add a
// variant here plus one match arm in the app's command loop.

use std::path::PathBuf;

use crate::edit_engine::EditMode;
use crate::ids::{ItemId, TrackId};
use crate::time::RationalTime;

#[derive(Debug, Clone)]
pub enum EditorCommand {
    // ── Playback ─────────────────────────────────────────────────────────
    SetPlayhead(RationalTime),
    Play,
    Pause,
    Stop,
    SetVolume(f32),
    ToggleMute,

    // ── Library ──────────────────────────────────────────────────────────
    ImportFile(PathBuf),
    DeleteLibraryClip(PathBuf),
    SelectLibraryClip(Option<PathBuf>),

    // ── Timeline / edit engine ────────────────────────────────────────────
    SetEditMode(EditMode),
    SelectTimelineItem(Option<ItemId>),
    /// One gesture's worth of edits, already batched by the edit engine.
    CommitGesture(Vec<crate::oplog::MoveData>),
    SliceAt { track: TrackId, time: RationalTime },
    SetEditAssociatedClips(bool),

    // ── Undo/redo ─────────────────────────────────────────────────────────
    PushUndoSnapshot,
    Undo,
    Redo,

    // ── Export ────────────────────────────────────────────────────────────
    /// Emitted when the user clicks Render/Save. `filename` is the bare
    /// stem (no extension, no directory); the app resolves extension and
    /// directory from the save dialog before invoking the save pipeline.
    RenderTimeline { filename: String, width: u32, height: u32, fps: u32 },
    CancelRender,
    ClearRenderStatus,
    SetCrossfadeDuration(RationalTime),

    // ── View / UI ─────────────────────────────────────────────────────────
    SetTimelineZoom(f32),
    ClearSaveStatus,
    SaveFrameToDisk { path: PathBuf, timestamp: RationalTime },
    RequestSaveFramePicker { path: PathBuf, timestamp: RationalTime },
}
