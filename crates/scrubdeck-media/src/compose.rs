// crates/scrubdeck-media/src/compose.rs
//
// OTIO-timeline thumbnail input (§4.D: "For OTIO timeline inputs, builds a
// sub-timeline, fetches the composed video frame at the requested time via
// a blocking future, then draws it"). We don't build a literal sub-timeline
// object — walking the already-decoded `Timeline` model and delegating to
// the winning item's reader achieves the same "composed frame" result with
// less machinery.

use scrubdeck_core::path::MediaPath;
use scrubdeck_core::time::RationalTime;
use scrubdeck_core::timeline::{ItemKind, Timeline, TrackEntry, TrackKind};

use crate::error::MediaError;
use crate::plugin::{DecodedFrame, MediaReader};

/// Find the topmost video track's active, non-gap item at `t` and decode its
/// frame. Tracks are walked in declaration order — the first (topmost) video
/// track with a clip covering `t` wins; lower tracks are not composited
/// under it (full alpha compositing is out of scope, per §1 non-goals on
/// anything beyond UI-quality thumbnails).
pub fn compose_frame_at<R, F>(timeline: &Timeline, t: RationalTime, mut open_reader: F) -> Option<DecodedFrame>
where
    R: MediaReader,
    F: FnMut(&MediaPath) -> Result<R, MediaError>,
{
    for track_id in timeline.track_ids() {
        let track = timeline.track(track_id)?;
        if track.kind != TrackKind::Video {
            continue;
        }
        for entry in &track.entries {
            let TrackEntry::Item(item) = entry else { continue };
            if item.kind != ItemKind::Video {
                continue;
            }
            if !item.parent_range.contains_time(t) {
                continue;
            }
            let Some(media) = &item.media else { continue };

            let offset_into_item = t.rescaled_to(item.parent_range.start_time.rate).sub(item.parent_range.start_time);
            let source_time = item.trimmed_range.start_time.add(offset_into_item);

            let mut reader = open_reader(&media.path).ok()?;
            return reader.frame_at(source_time).wait().flatten();
        }
    }
    None
}
