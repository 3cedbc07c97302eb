// crates/scrubdeck-media/src/save.rs
//
// Save Pipeline (§4.I). Adapted from the teacher's `encode_timeline`: same
// per-frame loop shape, the same `AtomicBool` cancel flag checked once per
// step, the same progress-interval reporting — rebuilt around
// `MediaReader`/`MediaWriter`/`compose_frame_at` instead of a single
// hard-coded source file, since this pipeline now walks an arbitrary
// OTIO-backed timeline rather than one clip.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::Pixel;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};
use ffmpeg::util::frame::video::Video as FfVideoFrame;

use scrubdeck_core::timeline::{Item, ItemKind, Timeline, TrackEntry, TrackKind};
use scrubdeck_core::time::{RationalTime, TimeRange};
use scrubdeck_core::transitions::{registry, TransitionKind, VideoTransition};

use crate::error::SaveError;
use crate::ffmpeg_reader::FfmpegReader;
use crate::helpers::yuv::{extract_yuv, write_yuv};
use crate::io_cache::IoReadCache;
use crate::plugin::{AudioBuffer, DecodedFrame, MediaReader, MediaWriter, WriterOptions};

/// UI-owned side effects around an export (§4.I steps 1 and 4). The media
/// crate has no player or view-state of its own; `scrubdeck-ui` implements
/// this to stop playback, mute audio, and snapshot/restore frame-view/HUD
/// state around the run.
pub trait ExportHost {
    fn save_view_state_and_stop_playback(&mut self);
    fn restore_view_state(&mut self);
}

#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub codec:            String,
    pub rate:             f64,
    pub audio_enabled:    bool,
    pub write_annotations: bool,
    pub writer_options:   WriterOptions,
}

/// Extension rewriting (§4.I): renaming into an existing path is fatal, the
/// caller checks that after this returns.
pub fn rewrite_extension(codec: &str, dest: &Path) -> Result<PathBuf, SaveError> {
    let mandated: &[&str] = match codec.to_ascii_lowercase().as_str() {
        "prores" => &["mov"],
        "vp9" => &["mp4", "mkv", "webm"],
        "av1" => &["mp4", "mkv"],
        "cineform" => &["mov"],
        "hap" => &["mov"],
        _ => return Ok(dest.to_path_buf()),
    };
    let current = dest.extension().and_then(|e| e.to_str()).unwrap_or("");
    if mandated.iter().any(|ext| ext.eq_ignore_ascii_case(current)) {
        return Ok(dest.to_path_buf());
    }
    Ok(dest.with_extension(mandated[0]))
}

pub struct SavePipeline {
    save_io_cache_capacity: usize,
}

impl SavePipeline {
    pub fn new(save_io_cache_capacity: usize) -> Self {
        Self { save_io_cache_capacity }
    }

    /// Drives `writer` over `range` of `timeline`. `annotation_overlay`, when
    /// present, is the UI-side "render the view composited with annotations"
    /// hook (§4.I step 3 first branch); without it the pipeline pulls plain
    /// composed frames (second branch).
    ///
    /// `writer` must already be open on the final destination path — the
    /// extension-rewrite and already-exists checks (§4.I) happen once,
    /// before the caller opens that writer, via `rewrite_extension` plus a
    /// plain `Path::exists` call. Doing either check in here would run
    /// against a path the writer has already created on disk.
    pub fn run(
        &self,
        timeline: &Timeline,
        range: TimeRange,
        options: &ExportOptions,
        writer: &mut dyn MediaWriter,
        host: &mut dyn ExportHost,
        cancel: &AtomicBool,
        mut annotation_overlay: Option<&mut dyn FnMut(RationalTime) -> Option<DecodedFrame>>,
        mut on_progress: impl FnMut(f64),
    ) -> Result<(), SaveError> {
        if range.duration.value <= 0.0 {
            return Err(SaveError::EmptyTimeline);
        }

        // Step 1.
        host.save_view_state_and_stop_playback();
        // Step 2: a dedicated reader pool for the duration of the export,
        // sized generously so a full second of audio lookahead never evicts
        // the video reader for the same clip.
        let mut readers: IoReadCache<FfmpegReader> = IoReadCache::new(self.save_io_cache_capacity);
        let transitions = registry();

        let step = RationalTime::new(1.0, options.rate);
        let end = range.end_time_exclusive();
        let total_secs = range.duration.to_seconds().max(1e-6);
        let mut t = range.start_time;

        // Step 3.
        let result = (|| -> Result<(), SaveError> {
            while t.rescaled_to(end.rate).value < end.rescaled_to(end.rate).value {
                if cancel.load(Ordering::Relaxed) {
                    return Err(SaveError::Cancelled);
                }

                let frame = if options.write_annotations {
                    annotation_overlay
                        .as_deref_mut()
                        .and_then(|overlay| overlay(t))
                        .or_else(|| compose_with_transitions(timeline, t, &transitions, &mut readers))
                } else {
                    compose_with_transitions(timeline, t, &transitions, &mut readers)
                };

                if let Some(frame) = frame {
                    writer.write_image(&frame, &options.writer_options).map_err(SaveError::Media)?;
                }

                if options.audio_enabled {
                    if let Some(audio) = audio_one_second(timeline, t, range, &mut readers) {
                        writer.write_audio(&audio, &options.writer_options).map_err(SaveError::Media)?;
                    }
                }

                // Frame-stepping (add) in both modes: seeking is what
                // `FfmpegReader::frame_at` does internally per call, and
                // §4.I's "prefer seeking in media-only mode" is about
                // avoiding redundant decode between steps, not about how
                // `t` itself advances — `t` always steps by exactly one
                // output frame so annotation overlays never skip a beat.
                t = t.add(step);
                let elapsed = (t.to_seconds() - range.start_time.to_seconds()).max(0.0);
                on_progress((elapsed / total_secs).min(1.0));
            }
            Ok(())
        })();

        // Step 4.
        host.restore_view_state();
        result
    }
}

fn item_source_time(item: &Item, t: RationalTime) -> RationalTime {
    let offset = t.rescaled_to(item.parent_range.start_time.rate).sub(item.parent_range.start_time);
    item.trimmed_range.start_time.add(offset)
}

fn reader_for<'a>(key: &str, path: &scrubdeck_core::path::MediaPath, readers: &'a mut IoReadCache<FfmpegReader>) -> Option<&'a mut FfmpegReader> {
    if readers.get_mut(key).is_none() {
        let (reader, _info) = FfmpegReader::open(path).ok()?;
        readers.put(key.to_string(), reader);
    }
    readers.get_mut(key)
}

fn decode_item_frame(item: &Item, t: RationalTime, readers: &mut IoReadCache<FfmpegReader>) -> Option<DecodedFrame> {
    let media = item.media.as_ref()?;
    let source_time = item_source_time(item, t);
    let key = media.path.to_string();
    reader_for(&key, &media.path, readers)?.frame_at(source_time).wait().flatten()
}

/// Walks the topmost video track's entries at `t`: if `t` falls inside a
/// transition's derived range, blends the two neighbouring clips through
/// the registered algorithm; otherwise behaves like `compose::compose_frame_at`.
fn compose_with_transitions(
    timeline: &Timeline,
    t: RationalTime,
    transitions: &std::collections::HashMap<TransitionKind, Box<dyn VideoTransition>>,
    readers: &mut IoReadCache<FfmpegReader>,
) -> Option<DecodedFrame> {
    for track_id in timeline.track_ids() {
        let track = timeline.track(track_id)?;
        if track.kind != TrackKind::Video {
            continue;
        }

        for (idx, transition) in track.transitions() {
            if transition.render.kind == TransitionKind::Cut {
                continue;
            }
            let Some(range) = track.transition_range(idx) else { continue };
            if !range.contains_time(t) {
                continue;
            }
            let Some(algo) = transitions.get(&transition.render.kind) else { continue };
            let prev = track.entries[..idx].iter().rev().find_map(|e| match e {
                TrackEntry::Item(i) => Some(i),
                _ => None,
            })?;
            let next = track.entries[idx + 1..].iter().find_map(|e| match e {
                TrackEntry::Item(i) => Some(i),
                _ => None,
            })?;
            let frame_a = decode_item_frame(prev, t, readers)?;
            let frame_b = decode_item_frame(next, t, readers)?;
            let alpha = ((t.to_seconds() - range.start_time.to_seconds()) / range.duration.to_seconds().max(1e-6)) as f32;
            return Some(blend_rgba(&frame_a, &frame_b, algo.as_ref(), alpha.clamp(0.0, 1.0)));
        }

        for entry in &track.entries {
            let TrackEntry::Item(item) = entry else { continue };
            if item.kind != ItemKind::Video {
                continue;
            }
            if !item.parent_range.contains_time(t) {
                continue;
            }
            return decode_item_frame(item, t, readers);
        }
    }
    None
}

fn audio_one_second(timeline: &Timeline, t: RationalTime, range: TimeRange, readers: &mut IoReadCache<FfmpegReader>) -> Option<AudioBuffer> {
    for track_id in timeline.track_ids() {
        let track = timeline.track(track_id)?;
        if track.kind != TrackKind::Audio {
            continue;
        }
        for entry in &track.entries {
            let TrackEntry::Item(item) = entry else { continue };
            if item.kind != ItemKind::Audio {
                continue;
            }
            if !item.parent_range.contains_time(t) {
                continue;
            }
            let media = item.media.as_ref()?;
            let source_time = item_source_time(item, t);
            let remaining_secs = (range.end_time_exclusive().to_seconds() - t.to_seconds()).max(0.0);
            let window_secs = remaining_secs.min(1.0);
            if window_secs <= 0.0 {
                return None;
            }
            let window = TimeRange::new(source_time, RationalTime::new(window_secs * source_time.rate, source_time.rate));
            let key = format!("{}#audio", media.path);
            return reader_for(&key, &media.path, readers)?.audio_range(window).wait().flatten();
        }
    }
    None
}

/// Blend two RGBA frames through a `VideoTransition`, which operates on
/// packed YUV420P (§4.I / transitions module doc: "no FFmpeg types cross
/// this boundary — the media crate handles extract_yuv/write_yuv on both
/// sides"). Round-trips RGBA -> YUV420P -> blend -> YUV420P -> RGBA so the
/// writer only ever sees the one pixel format it's contracted for.
fn blend_rgba(a: &DecodedFrame, b: &DecodedFrame, algo: &dyn VideoTransition, alpha: f32) -> DecodedFrame {
    let w = a.width;
    let h = a.height;
    let uv_w = (w as usize + 1) / 2;
    let uv_h = (h as usize + 1) / 2;

    let to_packed_yuv = |frame: &DecodedFrame| -> Vec<u8> {
        let mut rgba = FfVideoFrame::new(Pixel::RGBA, frame.width, frame.height);
        let stride = rgba.stride(0);
        let dst = rgba.data_mut(0);
        for row in 0..frame.height as usize {
            let s = row * frame.width as usize * 4;
            let d = row * stride;
            dst[d..d + frame.width as usize * 4].copy_from_slice(&frame.rgba[s..s + frame.width as usize * 4]);
        }
        let mut scaler = SwsContext::get(Pixel::RGBA, frame.width, frame.height, Pixel::YUV420P, frame.width, frame.height, Flags::BILINEAR)
            .expect("rgba->yuv420p scaler");
        let mut yuv = FfVideoFrame::empty();
        scaler.run(&rgba, &mut yuv).expect("scale rgba to yuv420p");
        extract_yuv(&yuv, frame.width as usize, frame.height as usize, uv_w, uv_h)
    };

    let packed_a = to_packed_yuv(a);
    let packed_b = to_packed_yuv(b);
    let blended = algo.apply(&packed_a, &packed_b, w, h, alpha);

    let mut yuv_frame = FfVideoFrame::new(Pixel::YUV420P, w, h);
    write_yuv(&blended, &mut yuv_frame, w as usize, h as usize, uv_w, uv_h);

    let mut scaler_back = SwsContext::get(Pixel::YUV420P, w, h, Pixel::RGBA, w, h, Flags::BILINEAR).expect("yuv420p->rgba scaler");
    let mut rgba_out = FfVideoFrame::empty();
    scaler_back.run(&yuv_frame, &mut rgba_out).expect("scale yuv420p to rgba");
    let stride = rgba_out.stride(0);
    let raw = rgba_out.data(0);
    let rgba: Vec<u8> = (0..h as usize)
        .flat_map(|row| {
            let s = row * stride;
            &raw[s..s + w as usize * 4]
        })
        .copied()
        .collect();

    DecodedFrame { width: w, height: h, rgba, timestamp: a.timestamp }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prores_is_rewritten_to_mov() {
        let dest = rewrite_extension("ProRes", Path::new("/tmp/out.mp4")).unwrap();
        assert_eq!(dest.extension().unwrap(), "mov");
    }

    #[test]
    fn vp9_into_an_already_mandated_extension_is_left_alone() {
        let dest = rewrite_extension("vp9", Path::new("/tmp/out.mkv")).unwrap();
        assert_eq!(dest, Path::new("/tmp/out.mkv"));
    }

    #[test]
    fn unknown_codec_keeps_original_extension() {
        let dest = rewrite_extension("h264", Path::new("/tmp/out.mp4")).unwrap();
        assert_eq!(dest, Path::new("/tmp/out.mp4"));
    }
}
