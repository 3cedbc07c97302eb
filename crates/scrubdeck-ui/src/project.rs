// crates/scrubdeck-ui/src/project.rs
//
// `Project` is this app's `AppStorage`/`ProjectState` analogue: the
// authoritative document plus the edit engine plus the media bin, all
// serialized together so a saved session reopens exactly where it left off.
// Unlike the teacher's `ProjectState`, the timeline itself is never stored
// directly — only the `OtioDocument` the mutator owns is (§4.F "recreated
// wholesale"); `Project::timeline()` rebuilds the read-mostly tree on demand.

use std::path::PathBuf;

use scrubdeck_core::edit_engine::{EditEngine, RibbonScale};
use scrubdeck_core::otio::{OtioDocument, OtioError};
use scrubdeck_core::timeline::Timeline;
use serde::{Deserialize, Serialize};

use crate::mutator::InMemoryMutator;
use crate::review_state::ReviewState;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryClip {
    pub path: PathBuf,
}

#[derive(Serialize, Deserialize)]
pub struct Project {
    pub name:    String,
    pub rate:    f64,
    document:    OtioDocument,
    pub library: Vec<LibraryClip>,
    pub review:  ReviewState,
    /// Default duration applied to transitions inserted by the edit engine;
    /// not yet surfaced by a widget, but real state rather than a magic
    /// constant buried in the transition builders.
    pub default_crossfade: scrubdeck_core::time::RationalTime,

    #[serde(skip)]
    mutator: Option<InMemoryMutator>,
    #[serde(skip, default = "default_engine")]
    pub engine: EditEngine,
}

fn default_engine() -> EditEngine {
    EditEngine::new(RibbonScale { track_origin_px: 0.0, track_start: scrubdeck_core::time::RationalTime::zero(24.0), px_per_second: 48.0 })
}

impl Project {
    pub fn new(name: impl Into<String>, rate: f64) -> Self {
        let name = name.into();
        let document = Timeline::new(rate).to_otio(&name);
        Self {
            name, rate, document,
            library: Vec::new(),
            review: ReviewState { playhead: scrubdeck_core::time::RationalTime::zero(rate), ..Default::default() },
            default_crossfade: scrubdeck_core::time::RationalTime::new(12.0, rate),
            mutator: None,
            engine: default_engine(),
        }
    }

    /// Called once after deserialization (serde can't reconstruct the
    /// `#[serde(skip)]` mutator itself since it isn't `Deserialize`).
    pub fn ensure_mutator(&mut self) {
        if self.mutator.is_none() {
            self.mutator = Some(InMemoryMutator::new(self.document.clone(), self.rate));
        }
    }

    pub fn mutator_mut(&mut self) -> &mut InMemoryMutator {
        self.ensure_mutator();
        self.mutator.as_mut().unwrap()
    }

    /// Appends `media` to track 0 of the video track list, extending the
    /// available-range-derived duration the library bin already knows from
    /// its probed `IOInfo`.
    pub fn append_library_clip(&mut self, media: scrubdeck_core::timeline::MediaReference, duration: scrubdeck_core::time::RationalTime) {
        self.mutator_mut().append_clip(scrubdeck_core::ids::TrackId(0), media, duration);
    }

    /// Rebuilds the read-mostly `Timeline` tree from whichever document is
    /// authoritative right now — the mutator's, once one exists, since it
    /// may be ahead of the serialized `document` field by several gestures.
    pub fn timeline(&mut self) -> Result<Timeline, OtioError> {
        self.ensure_mutator();
        self.mutator.as_ref().unwrap().timeline()
    }

    /// Pulls the mutator's current document back into the persisted field —
    /// call before saving to storage.
    pub fn sync_from_mutator(&mut self) {
        if let Some(mutator) = &self.mutator {
            self.document = mutator.document().clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_has_an_empty_timeline() {
        let mut project = Project::new("untitled", 24.0);
        let timeline = project.timeline().unwrap();
        assert_eq!(timeline.tracks.len(), 0);
    }

    #[test]
    fn sync_from_mutator_persists_edits_into_the_document() {
        let mut project = Project::new("untitled", 24.0);
        project.ensure_mutator();
        project.sync_from_mutator();
        assert_eq!(project.document.name, "untitled");
    }
}
