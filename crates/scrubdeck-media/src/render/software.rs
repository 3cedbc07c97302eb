// crates/scrubdeck-media/src/render/software.rs
//
// CPU thumbnail path — directly adapted from the teacher's scaler code in
// `decode.rs`/`probe.rs` (`SwsContext::get(..., Pixel::RGBA, thumb_w,
// thumb_h, Flags::BILINEAR)` then a destripe loop).

use std::sync::Arc;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::Pixel;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};
use ffmpeg::util::frame::video::Video as FfVideoFrame;

use scrubdeck_core::cache_entry::RasterImage;

use crate::error::MediaError;
use crate::plugin::DecodedFrame;
use crate::render::ThumbnailRenderer;

pub struct SoftwareRenderer {
    scaler: Option<SwsContext>,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self { scaler: None }
    }
}

impl ThumbnailRenderer for SoftwareRenderer {
    fn render(&mut self, frame: &DecodedFrame, out_width: u32, out_height: u32) -> Result<RasterImage, MediaError> {
        // The decoded frame already arrives as packed RGBA8 (see
        // `FfmpegReader::decode_frame_at`); re-scaling RGBA->RGBA with
        // swscale is still the simplest correct way to resize without
        // hand-rolling a filter.
        let mut src = FfVideoFrame::new(Pixel::RGBA, frame.width, frame.height);
        {
            let stride = src.stride(0);
            let dst = src.data_mut(0);
            for row in 0..frame.height as usize {
                let s = row * frame.width as usize * 4;
                let d = row * stride;
                dst[d..d + frame.width as usize * 4]
                    .copy_from_slice(&frame.rgba[s..s + frame.width as usize * 4]);
            }
        }

        let scaler = self.scaler.get_or_insert_with(|| {
            SwsContext::get(Pixel::RGBA, frame.width, frame.height, Pixel::RGBA, out_width, out_height, Flags::BILINEAR)
                .expect("create thumbnail scaler")
        });

        let mut out = FfVideoFrame::empty();
        scaler.run(&src, &mut out).map_err(|e| MediaError::Scale(e.to_string()))?;

        let stride = out.stride(0);
        let raw = out.data(0);
        let rgba: Vec<u8> = (0..out_height as usize)
            .flat_map(|row| {
                let s = row * stride;
                &raw[s..s + out_width as usize * 4]
            })
            .copied()
            .collect();

        Ok(RasterImage { width: out_width, height: out_height, rgba: Arc::new(rgba) })
    }
}
