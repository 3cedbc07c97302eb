// crates/scrubdeck-ui/src/review_state.rs
//
// UI-only view state: playhead, transport, selection, edit mode. None of
// this lives in scrubdeck-core — the editorial model has no notion of "is
// playing" or "which item is selected". Implements `ExportHost` so
// `SavePipeline::run` can stop playback and restore the view around a
// render without the media crate knowing anything about egui.

use std::path::PathBuf;

use scrubdeck_core::edit_engine::EditMode;
use scrubdeck_core::ids::{ItemId, TrackId};
use scrubdeck_core::time::RationalTime;
use scrubdeck_media::save::ExportHost;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewState {
    pub playhead:      RationalTime,
    pub is_playing:    bool,
    pub volume:        f32,
    pub muted:         bool,
    pub timeline_zoom: f32,
    pub selected_item: Option<ItemId>,
    pub selected_track: Option<TrackId>,
    pub selected_library_clip: Option<PathBuf>,
    pub edit_mode:     EditMode,
    pub edit_associated_clips: bool,

    #[serde(skip)]
    saved_playhead: Option<RationalTime>,
    #[serde(skip)]
    was_playing: bool,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            playhead: RationalTime::zero(24.0),
            is_playing: false,
            volume: 1.0,
            muted: false,
            timeline_zoom: 1.0,
            selected_item: None,
            selected_track: None,
            selected_library_clip: None,
            edit_mode: EditMode::Select,
            edit_associated_clips: true,
            saved_playhead: None,
            was_playing: false,
        }
    }
}

impl ReviewState {
    pub fn seek(&mut self, t: RationalTime) {
        self.playhead = t;
    }
}

impl ExportHost for ReviewState {
    fn save_view_state_and_stop_playback(&mut self) {
        self.saved_playhead = Some(self.playhead);
        self.was_playing = self.is_playing;
        self.is_playing = false;
    }

    fn restore_view_state(&mut self) {
        if let Some(t) = self.saved_playhead.take() {
            self.playhead = t;
        }
        self.is_playing = self.was_playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_restore_round_trips_playhead_and_playing_flag() {
        let mut state = ReviewState { playhead: RationalTime::new(48.0, 24.0), is_playing: true, ..Default::default() };
        state.save_view_state_and_stop_playback();
        assert!(!state.is_playing);

        state.seek(RationalTime::new(0.0, 24.0));
        state.restore_view_state();
        assert_eq!(state.playhead, RationalTime::new(48.0, 24.0));
        assert!(state.is_playing);
    }
}
