// crates/scrubdeck-media/src/plugin.rs
//
// Reader/writer plugin contract (§6). Only one of each is shipped — the
// ffmpeg-backed implementation in `ffmpeg_reader.rs` / `writer.rs` — but the
// trait boundary is real: nothing outside this module assumes ffmpeg types.

use std::collections::BTreeMap;

use scrubdeck_core::io_info::IOInfo;
use scrubdeck_core::path::MediaPath;
use scrubdeck_core::time::{RationalTime, TimeRange};

use crate::error::MediaError;
use crate::queue::RequestFuture;

/// One decoded video frame, RGBA8, row-major, no stride padding — the same
/// convention `CacheEntry::Thumbnail` uses, so reader output can be cached
/// directly without a repack.
#[derive(Clone, Debug)]
pub struct DecodedFrame {
    pub width:     u32,
    pub height:    u32,
    pub rgba:      Vec<u8>,
    pub timestamp: RationalTime,
}

#[derive(Clone, Debug)]
pub struct AudioBuffer {
    pub channels: u16,
    pub rate:     u32,
    /// Interleaved `f32` samples.
    pub samples:  Vec<f32>,
}

pub trait MediaReader: Send {
    fn open(path: &MediaPath) -> Result<(Self, IOInfo), MediaError>
    where
        Self: Sized;

    /// Decode the frame active at `t`. Returns a `RequestFuture` rather than
    /// the frame directly — for `compose::compose_frame_at`'s sub-timeline
    /// walk this is "the blocking future" §4.D describes; the ffmpeg reader
    /// decodes synchronously and hands back an already-resolved future.
    fn frame_at(&mut self, t: RationalTime) -> RequestFuture<Option<DecodedFrame>>;

    fn audio_range(&mut self, r: TimeRange) -> RequestFuture<Option<AudioBuffer>>;
}

/// Pass-through options for writer plugins (§6: "options: &WriterOptions
/// carrying exactly the pass-through keys listed in §6"). Namespaced keys
/// (`OpenEXR/Compression`, `FFmpeg/Preset`, ...) travel verbatim; `timecode`
/// is promoted to its own field since every writer needs to interpret it.
#[derive(Clone, Debug, Default)]
pub struct WriterOptions {
    pub timecode: Option<RationalTime>,
    pub pass_through: BTreeMap<String, String>,
}

impl WriterOptions {
    pub fn get(&self, namespaced_key: &str) -> Option<&str> {
        self.pass_through.get(namespaced_key).map(String::as_str)
    }
}

pub trait MediaWriter {
    fn write_image(&mut self, frame: &DecodedFrame, options: &WriterOptions) -> Result<(), MediaError>;
    fn write_audio(&mut self, audio: &AudioBuffer, options: &WriterOptions) -> Result<(), MediaError>;
}
