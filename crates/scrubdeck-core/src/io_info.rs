// crates/scrubdeck-core/src/io_info.rs
//
// Media-file metadata returned by the info worker (§3 "IOInfo"). Immutable
// once produced — the cache hands out `Arc<IOInfo>` so many clients can
// share one probe result for the lifetime of the cache entry.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::time::TimeRange;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PixelType {
    L8, L16, LA8, LA16,
    Rgb8, Rgb16, Rgba8, Rgba16,
    Yuv420P8, Yuv422P8, Yuv444P8,
    Yuv420P10, Yuv420P12,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum YuvCoefficients {
    Bt601,
    Bt709,
    Bt2020,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum VideoLevels {
    FullRange,
    LegalRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SampleFormat {
    S16,
    S32,
    F32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub width:               u32,
    pub height:              u32,
    pub pixel_type:          PixelType,
    pub name:                String,
    pub yuv_coefficients:    YuvCoefficients,
    pub video_levels:        VideoLevels,
    pub pixel_aspect_ratio:  f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    pub channel_count: u16,
    pub sample_rate:   u32,
    pub sample_format: SampleFormat,
    pub name:          String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IOInfo {
    pub video:            Vec<VideoStreamInfo>,
    pub audio:            Option<AudioInfo>,
    pub video_time_range: Option<TimeRange>,
    pub audio_time_range: Option<TimeRange>,
    pub tags:             BTreeMap<String, String>,
}

impl IOInfo {
    pub fn has_video(&self) -> bool {
        !self.video.is_empty()
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// The range the combined media can serve — union of video and audio
    /// ranges, or whichever one is present.
    pub fn available_range(&self) -> Option<TimeRange> {
        match (self.video_time_range, self.audio_time_range) {
            (Some(v), Some(a)) => Some(v.extended_by(&a)),
            (Some(v), None) => Some(v),
            (None, Some(a)) => Some(a),
            (None, None) => None,
        }
    }
}
