// crates/scrubdeck-ui/src/panel_state.rs
//
// Persisted collapse state for the four dockable sections (library,
// preview, timeline, export). No teacher analogue — `velocut-ui` never
// persisted panel layout — built from the same `eframe`/`AppStorage`
// pattern the teacher uses for `ProjectState` in app.rs.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelState {
    pub library_open:  bool,
    pub preview_open:   bool,
    pub timeline_open:  bool,
    pub export_open:    bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self { library_open: true, preview_open: true, timeline_open: true, export_open: false }
    }
}
