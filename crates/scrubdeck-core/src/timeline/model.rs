// crates/scrubdeck-core/src/timeline/model.rs
//
// §4.F "Timeline Model" — a read-mostly tree mirroring the authoritative
// OTIO document. Recreated wholesale whenever the external mutator commits
// an operation (§3 lifecycle); widgets rebuild their item list from it.

use serde::{Deserialize, Serialize};
use crate::ids::TrackId;
use crate::time::RationalTime;
use crate::timeline::track::Track;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Timeline {
    pub tracks:            Vec<Track>,
    pub global_start_time: RationalTime,
    pub rate:              f64,
}

impl Timeline {
    pub fn new(rate: f64) -> Self {
        Self { tracks: Vec::new(), global_start_time: RationalTime::zero(rate), rate }
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id.0)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(id.0)
    }

    pub fn track_ids(&self) -> impl Iterator<Item = TrackId> {
        (0..self.tracks.len()).map(TrackId)
    }

    /// Recompute every track's derived layout — call after any structural
    /// edit and before reading `parent_range`/`transition_range` anywhere.
    pub fn relayout(&mut self) {
        for track in &mut self.tracks {
            track.relayout(self.rate);
        }
    }

    pub fn total_duration(&self) -> RationalTime {
        self.tracks.iter()
            .map(|t| t.duration(self.rate))
            .fold(RationalTime::zero(self.rate), |acc, d| if d > acc { d } else { acc })
    }
}
