// crates/scrubdeck-core/src/otio.rs
//
// §4.F "authoritative document": a native serde_json OTIO-shaped document,
// not an FFI binding (see DESIGN.md for why we didn't take the otio-rs/cmake
// dependency). Field names and the `OTIO_SCHEMA` tag mirror the real
// OpenTimelineIO JSON so files exported here open in other OTIO tools.
//
// Conversion is one-directional-per-call: `Timeline::to_otio` builds a fresh
// document every time (§4.F "recreated wholesale"), `OtioDocument::to_timeline`
// rebuilds the read-mostly tree an edit committed to.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{ItemId, TrackId, TransitionId};
use crate::time::{RationalTime, TimeRange};
use crate::timeline::{
    Effect as CoreEffect, Item as CoreItem, ItemKind, MediaReference, Timeline, Track, TrackEntry,
    TrackKind, Transition as CoreTransition,
};

#[derive(Debug, Error)]
pub enum OtioError {
    #[error("unsupported OTIO_SCHEMA value: {0}")]
    UnsupportedSchema(String),
    #[error("track {0} has a transition with no preceding clip")]
    DanglingTransition(usize),
    #[error("clip {0} is missing a media reference")]
    MissingMediaReference(usize),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OtioRationalTime {
    pub value: f64,
    pub rate:  f64,
}

impl From<RationalTime> for OtioRationalTime {
    fn from(t: RationalTime) -> Self {
        Self { value: t.value, rate: t.rate }
    }
}

impl From<OtioRationalTime> for RationalTime {
    fn from(t: OtioRationalTime) -> Self {
        RationalTime::new(t.value, t.rate)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OtioTimeRange {
    pub start_time: OtioRationalTime,
    pub duration:   OtioRationalTime,
}

impl From<TimeRange> for OtioTimeRange {
    fn from(r: TimeRange) -> Self {
        Self { start_time: r.start_time.into(), duration: r.duration.into() }
    }
}

impl From<OtioTimeRange> for TimeRange {
    fn from(r: OtioTimeRange) -> Self {
        TimeRange::new(r.start_time.into(), r.duration.into())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExternalReference {
    pub target_url:      String,
    pub available_range: Option<OtioTimeRange>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtioEffect {
    pub name:     String,
    pub effect_name: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtioClip {
    pub name:            String,
    pub source_range:    OtioTimeRange,
    pub media_reference: Option<ExternalReference>,
    #[serde(default)]
    pub effects:         Vec<OtioEffect>,
    /// Not part of real OTIO — round-trip hook back to our stable `ItemId`.
    #[serde(default)]
    pub scrubdeck_item_id: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtioGap {
    pub source_range: OtioTimeRange,
    #[serde(default)]
    pub scrubdeck_item_id: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtioTransition {
    pub name:           String,
    pub transition_type: String,
    pub in_offset:      OtioRationalTime,
    pub out_offset:     OtioRationalTime,
    #[serde(default)]
    pub scrubdeck_transition_id: Option<u64>,
    /// Not part of real OTIO — round-trip hook for the blend algorithm
    /// this transition renders with (`crate::transitions::TransitionType`).
    #[serde(default)]
    pub scrubdeck_duration_secs: f32,
}

fn transition_type_name(kind: crate::transitions::TransitionKind) -> &'static str {
    use crate::transitions::TransitionKind::*;
    match kind {
        Cut => "Cut",
        Crossfade => "SMPTE_Dissolve",
        Wipe => "Wipe",
        Push => "Push",
        Iris => "Iris",
        DipToBlack => "DipToBlack",
    }
}

fn transition_kind_from_name(name: &str) -> crate::transitions::TransitionKind {
    use crate::transitions::TransitionKind::*;
    match name {
        "Wipe" => Wipe,
        "Push" => Push,
        "Iris" => Iris,
        "DipToBlack" => DipToBlack,
        "Cut" => Cut,
        _ => Crossfade,
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "OTIO_SCHEMA")]
pub enum OtioTrackChild {
    #[serde(rename = "Clip.2")]
    Clip(OtioClip),
    #[serde(rename = "Gap.1")]
    Gap(OtioGap),
    #[serde(rename = "Transition.1")]
    Transition(OtioTransition),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum OtioTrackKind {
    Video,
    Audio,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtioTrack {
    pub name:     String,
    pub kind:     OtioTrackKind,
    pub children: Vec<OtioTrackChild>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtioStack {
    pub name:   String,
    pub tracks: Vec<OtioTrack>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtioDocument {
    #[serde(rename = "OTIO_SCHEMA")]
    pub schema:       String,
    pub name:         String,
    pub tracks:       OtioStack,
    pub global_start_time: Option<OtioRationalTime>,
}

const SUPPORTED_SCHEMA: &str = "Timeline.1";

impl OtioDocument {
    pub fn to_json_string_pretty(&self) -> Result<String, OtioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, OtioError> {
        let doc: OtioDocument = serde_json::from_str(s)?;
        if doc.schema != SUPPORTED_SCHEMA {
            return Err(OtioError::UnsupportedSchema(doc.schema));
        }
        Ok(doc)
    }

    /// Rebuild the editor's read-mostly [`Timeline`] tree from this document.
    pub fn to_timeline(&self, rate: f64) -> Result<Timeline, OtioError> {
        let global_start_time = self
            .global_start_time
            .map(RationalTime::from)
            .unwrap_or_else(|| RationalTime::zero(rate));

        let mut timeline = Timeline { tracks: Vec::new(), global_start_time, rate };

        for otio_track in &self.tracks.tracks {
            let kind = match otio_track.kind {
                OtioTrackKind::Video => TrackKind::Video,
                OtioTrackKind::Audio => TrackKind::Audio,
            };
            let mut track = Track::new(kind);

            for (idx, child) in otio_track.children.iter().enumerate() {
                let entry = match child {
                    OtioTrackChild::Clip(clip) => {
                        let media_ref = clip.media_reference.as_ref();
                        let media = Some(MediaReference {
                            path: media_ref
                                .map(|m| crate::path::MediaPath::from_file(&m.target_url))
                                .ok_or(OtioError::MissingMediaReference(idx))?,
                            available_range: media_ref.and_then(|m| m.available_range).map(TimeRange::from),
                        });
                        let trimmed_range = TimeRange::from(clip.source_range);
                        TrackEntry::Item(CoreItem {
                            id: clip
                                .scrubdeck_item_id
                                .map(ItemId)
                                .unwrap_or_else(ItemId::next),
                            kind: ItemKind::Video,
                            trimmed_range,
                            parent_range: trimmed_range,
                            effects: clip
                                .effects
                                .iter()
                                .map(|e| CoreEffect { name: e.effect_name.clone(), params: e.metadata.clone() })
                                .collect(),
                            media,
                            otio_index: idx,
                        })
                    }
                    OtioTrackChild::Gap(gap) => {
                        let trimmed_range = TimeRange::from(gap.source_range);
                        TrackEntry::Item(CoreItem {
                            id: gap
                                .scrubdeck_item_id
                                .map(ItemId)
                                .unwrap_or_else(ItemId::next),
                            kind: ItemKind::Gap,
                            trimmed_range,
                            parent_range: trimmed_range,
                            effects: Vec::new(),
                            media: None,
                            otio_index: idx,
                        })
                    }
                    OtioTrackChild::Transition(t) => TrackEntry::Transition(CoreTransition {
                        id: t
                            .scrubdeck_transition_id
                            .map(TransitionId)
                            .unwrap_or_else(TransitionId::next),
                        in_offset: t.in_offset.into(),
                        out_offset: t.out_offset.into(),
                        otio_index: idx,
                        render: crate::transitions::TransitionType::new(
                            transition_kind_from_name(&t.transition_type),
                            t.scrubdeck_duration_secs,
                        ),
                    }),
                };
                track.entries.push(entry);
            }
            track.relayout(rate);
            timeline.tracks.push(track);
        }

        Ok(timeline)
    }
}

impl Timeline {
    /// Serialize this timeline to an authoritative OTIO-shaped document.
    /// Always builds fresh — the timeline itself never holds JSON state.
    pub fn to_otio(&self, name: &str) -> OtioDocument {
        let tracks = self
            .tracks
            .iter()
            .enumerate()
            .map(|(i, track)| track_to_otio(track, i))
            .collect();

        OtioDocument {
            schema: SUPPORTED_SCHEMA.to_string(),
            name: name.to_string(),
            tracks: OtioStack { name: "tracks".to_string(), tracks },
            global_start_time: Some(self.global_start_time.into()),
        }
    }
}

fn track_to_otio(track: &Track, index: usize) -> OtioTrack {
    let kind = match track.kind {
        TrackKind::Video => OtioTrackKind::Video,
        TrackKind::Audio => OtioTrackKind::Audio,
    };
    let children = track
        .entries
        .iter()
        .map(|entry| match entry {
            TrackEntry::Item(item) if item.is_gap() => OtioTrackChild::Gap(OtioGap {
                source_range: item.trimmed_range.into(),
                scrubdeck_item_id: Some(item.id.0),
            }),
            TrackEntry::Item(item) => OtioTrackChild::Clip(OtioClip {
                name: format!("clip_{}", item.id.0),
                source_range: item.trimmed_range.into(),
                media_reference: item.media.as_ref().map(|m| ExternalReference {
                    target_url: m.path.to_string(),
                    available_range: m.available_range.map(Into::into),
                }),
                effects: item
                    .effects
                    .iter()
                    .map(|e| OtioEffect {
                        name: e.name.clone(),
                        effect_name: e.name.clone(),
                        metadata: e.params.clone(),
                    })
                    .collect(),
                scrubdeck_item_id: Some(item.id.0),
            }),
            TrackEntry::Transition(t) => OtioTrackChild::Transition(OtioTransition {
                name: format!("transition_{}", t.id.0),
                transition_type: transition_type_name(t.render.kind()).to_string(),
                in_offset: t.in_offset.into(),
                out_offset: t.out_offset.into(),
                scrubdeck_transition_id: Some(t.id.0),
                scrubdeck_duration_secs: t.render.duration_secs(),
            }),
        })
        .collect();

    OtioTrack { name: format!("track_{index}"), kind, children }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::ItemKind;

    fn clip(id: u64, dur: f64) -> CoreItem {
        let range = TimeRange::new(RationalTime::zero(24.0), RationalTime::new(dur, 24.0));
        CoreItem {
            id: ItemId(id),
            kind: ItemKind::Video,
            trimmed_range: range,
            parent_range: range,
            effects: Vec::new(),
            media: Some(MediaReference {
                path: crate::path::MediaPath::from_file("/media/a.mov"),
                available_range: Some(range),
            }),
            otio_index: 0,
        }
    }

    #[test]
    fn round_trips_through_json() {
        let mut timeline = Timeline::new(24.0);
        let mut track = Track::new(TrackKind::Video);
        track.entries.push(TrackEntry::Item(clip(1, 48.0)));
        track.relayout(24.0);
        timeline.tracks.push(track);

        let doc = timeline.to_otio("test");
        let json = doc.to_json_string_pretty().unwrap();
        let reparsed = OtioDocument::from_json_str(&json).unwrap();
        let rebuilt = reparsed.to_timeline(24.0).unwrap();

        assert_eq!(rebuilt.tracks.len(), 1);
        let item = rebuilt.tracks[0].item(ItemId(1)).unwrap();
        assert_eq!(item.trimmed_range.duration, RationalTime::new(48.0, 24.0));
    }

    #[test]
    fn rejects_unknown_schema() {
        let bad = r#"{"OTIO_SCHEMA":"Clip.2","name":"x","tracks":{"name":"t","tracks":[]}}"#;
        assert!(matches!(OtioDocument::from_json_str(bad), Err(OtioError::UnsupportedSchema(_))));
    }
}
