// crates/scrubdeck-ui/src/modules/mod.rs
//
// Module registry. To add a new panel:
//   1. Create modules/mypanel.rs implementing EditorModule
//   2. Add `pub mod mypanel;` below
//   3. Add one line to register_modules() in app.rs
//
// Grounded on the 4-arg `ui(&mut self, ui, state, thumb_cache, cmd)` pattern
// every working teacher module actually implements, not the stale 2-arg
// declaration the teacher's own mod.rs carried (that version matched a
// trait nothing implemented, and named a file — `export.rs` — that didn't
// exist on disk either). `project` is `&mut` rather than `&`, the one
// deliberate departure: the edit engine's drag methods are inherently
// stateful across a mouse-down/move/up sequence, and deferring every
// intermediate preview through the command queue would mean redrawing a
// whole frame behind the pointer during a drag.

pub mod export;
pub mod library;
pub mod preview;
pub mod timeline;

use std::collections::HashMap;

use egui::{TextureHandle, Ui};
use scrubdeck_core::commands::EditorCommand;
use scrubdeck_core::ids::ItemId;

use crate::context::AppContext;
use crate::project::Project;

/// Decoded-frame/thumbnail texture cache: ItemId -> loaded texture.
pub type ThumbnailCache = HashMap<ItemId, TextureHandle>;

/// Every editor panel implements this trait.
pub trait EditorModule {
    fn name(&self) -> &str;
    fn ui(
        &mut self,
        ui: &mut Ui,
        project: &mut Project,
        ctx: &mut AppContext,
        thumb_cache: &mut ThumbnailCache,
        cmd: &mut Vec<EditorCommand>,
    );
}