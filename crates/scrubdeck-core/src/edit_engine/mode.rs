// crates/scrubdeck-core/src/edit_engine/mode.rs
//
// §4.G's nine edit modes plus Select. Grounded on tlTimelineUI's
// `Private::MouseMode` (kNone/Item/Transition) — we fan that one enum out
// into the named modes the spec distinguishes, since each clamps and
// commits differently.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditMode {
    Select,
    Move,
    Ripple,
    Roll,
    Trim,
    Slip,
    Slide,
    Slice,
    Fill,
    Insert,
    Overwrite,
}

impl EditMode {
    /// Modes that mutate a clip edge (as opposed to relocating a whole clip
    /// or splitting one).
    pub fn is_edge_trim(self) -> bool {
        matches!(self, EditMode::Ripple | EditMode::Roll | EditMode::Trim)
    }
}
