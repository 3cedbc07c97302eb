// crates/scrubdeck-media/src/writer.rs
//
// The one `MediaWriter` this system ships — the encode-side mirror of
// `ffmpeg_reader.rs`. Opens an output muxer, adds a libx264 video stream
// and (when the export has audio) an AAC stream, and scales/resamples
// every frame the Save Pipeline hands it into the encoder's native format.

use std::path::{Path, PathBuf};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::codec;
use ffmpeg::format::{self, Pixel};
use ffmpeg::software::resampling;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};
use ffmpeg::util::channel_layout::ChannelLayout;
use ffmpeg::util::format::sample::{Sample, Type as SampleType};
use ffmpeg::util::frame::{audio::Audio as FfAudioFrame, video::Video as FfVideoFrame};

use crate::error::MediaError;
use crate::plugin::{AudioBuffer, DecodedFrame, MediaWriter, WriterOptions};

/// Named after the codec identifier the Export module hands through
/// `ExportOptions::codec` — currently only "h264" maps to a real encoder,
/// matching the one preset `save::rewrite_extension` leaves untouched.
fn video_codec_id(codec: &str) -> ffmpeg::codec::Id {
    match codec.to_ascii_lowercase().as_str() {
        "prores" => ffmpeg::codec::Id::PRORES,
        "vp9" => ffmpeg::codec::Id::VP9,
        "av1" => ffmpeg::codec::Id::AV1,
        _ => ffmpeg::codec::Id::H264,
    }
}

pub struct FfmpegWriter {
    octx: format::context::Output,
    video_stream_idx: usize,
    video_encoder: ffmpeg::encoder::Video,
    scaler: SwsContext,
    frame_count: i64,

    audio_stream_idx: Option<usize>,
    audio_encoder: Option<ffmpeg::encoder::Audio>,
    resampler: Option<resampling::Context>,
    audio_sample_count: i64,

    finished: bool,
}

impl FfmpegWriter {
    pub fn create(dest: &Path, width: u32, height: u32, fps: u32, with_audio: bool, codec: &str) -> Result<Self, MediaError> {
        let mut octx = format::output(dest).map_err(|e| open_err(dest, e))?;

        let codec_id = video_codec_id(codec);
        let encoder_codec = ffmpeg::encoder::find(codec_id).ok_or_else(|| MediaError::Open(dest.to_path_buf(), "no encoder for codec".into()))?;
        let mut video_stream = octx.add_stream(encoder_codec).map_err(|e| open_err(dest, e))?;
        let video_stream_idx = video_stream.index();

        let mut enc_ctx = ffmpeg::codec::context::Context::new_with_codec(encoder_codec)
            .encoder()
            .video()
            .map_err(|e| open_err(dest, e))?;
        enc_ctx.set_width(width);
        enc_ctx.set_height(height);
        enc_ctx.set_format(Pixel::YUV420P);
        enc_ctx.set_time_base(ffmpeg::Rational(1, fps as i32));
        enc_ctx.set_frame_rate(Some(ffmpeg::Rational(fps as i32, 1)));
        if octx.format().flags().contains(format::Flags::GLOBAL_HEADER) {
            enc_ctx.set_flags(codec::Flags::GLOBAL_HEADER);
        }
        let video_encoder = enc_ctx.open_as(encoder_codec).map_err(|e| open_err(dest, e))?;
        video_stream.set_time_base(ffmpeg::Rational(1, fps as i32));
        video_stream.set_parameters(&video_encoder);

        let scaler = SwsContext::get(Pixel::RGBA, width, height, Pixel::YUV420P, width, height, Flags::BILINEAR)
            .map_err(|e| MediaError::Scale(e.to_string()))?;

        let (audio_stream_idx, audio_encoder) = if with_audio {
            let aac = ffmpeg::encoder::find(ffmpeg::codec::Id::AAC).ok_or_else(|| MediaError::Open(dest.to_path_buf(), "no AAC encoder".into()))?;
            let mut audio_stream = octx.add_stream(aac).map_err(|e| open_err(dest, e))?;
            let idx = audio_stream.index();
            let mut actx = ffmpeg::codec::context::Context::new_with_codec(aac).encoder().audio().map_err(|e| open_err(dest, e))?;
            actx.set_rate(44100);
            actx.set_channel_layout(ChannelLayout::STEREO);
            actx.set_format(Sample::F32(SampleType::Planar));
            if octx.format().flags().contains(format::Flags::GLOBAL_HEADER) {
                actx.set_flags(codec::Flags::GLOBAL_HEADER);
            }
            let encoder = actx.open_as(aac).map_err(|e| open_err(dest, e))?;
            audio_stream.set_time_base(ffmpeg::Rational(1, 44100));
            audio_stream.set_parameters(&encoder);
            (Some(idx), Some(encoder))
        } else {
            (None, None)
        };

        format::context::output::dump(&octx, 0, dest.to_str());
        octx.write_header().map_err(|e| open_err(dest, e))?;

        Ok(Self {
            octx,
            video_stream_idx,
            video_encoder,
            scaler,
            frame_count: 0,
            audio_stream_idx,
            audio_encoder,
            resampler: None,
            audio_sample_count: 0,
            finished: false,
        })
    }

    /// Flushes both encoders and writes the trailer. Consumes `self` since
    /// nothing should be written after this — `SavePipeline::run` only ever
    /// calls it once, after the frame loop completes or errors out.
    pub fn finish(mut self) -> Result<(), MediaError> {
        self.flush_video()?;
        self.flush_audio()?;
        self.octx.write_trailer().map_err(|e| MediaError::Decode(PathBuf::new(), e.to_string()))?;
        self.finished = true;
        Ok(())
    }

    fn flush_video(&mut self) -> Result<(), MediaError> {
        self.video_encoder.send_eof().ok();
        let mut encoded = ffmpeg::Packet::empty();
        while self.video_encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.video_stream_idx);
            encoded.write_interleaved(&mut self.octx).ok();
        }
        Ok(())
    }

    fn flush_audio(&mut self) -> Result<(), MediaError> {
        let Some(encoder) = &mut self.audio_encoder else { return Ok(()) };
        let Some(idx) = self.audio_stream_idx else { return Ok(()) };
        encoder.send_eof().ok();
        let mut encoded = ffmpeg::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(idx);
            encoded.write_interleaved(&mut self.octx).ok();
        }
        Ok(())
    }
}

impl MediaWriter for FfmpegWriter {
    fn write_image(&mut self, frame: &DecodedFrame, _options: &WriterOptions) -> Result<(), MediaError> {
        let mut rgba = FfVideoFrame::new(Pixel::RGBA, frame.width, frame.height);
        let stride = rgba.stride(0);
        let dst = rgba.data_mut(0);
        for row in 0..frame.height as usize {
            let src_off = row * frame.width as usize * 4;
            dst[row * stride..row * stride + frame.width as usize * 4]
                .copy_from_slice(&frame.rgba[src_off..src_off + frame.width as usize * 4]);
        }

        let mut yuv = FfVideoFrame::empty();
        self.scaler.run(&rgba, &mut yuv).map_err(|e| MediaError::Scale(e.to_string()))?;
        yuv.set_pts(Some(self.frame_count));
        self.frame_count += 1;

        self.video_encoder.send_frame(&yuv).map_err(|e| MediaError::Decode(PathBuf::new(), e.to_string()))?;
        let mut encoded = ffmpeg::Packet::empty();
        while self.video_encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.video_stream_idx);
            encoded.write_interleaved(&mut self.octx).ok();
        }
        Ok(())
    }

    fn write_audio(&mut self, audio: &AudioBuffer, _options: &WriterOptions) -> Result<(), MediaError> {
        let (Some(encoder), Some(idx)) = (&mut self.audio_encoder, self.audio_stream_idx) else { return Ok(()) };

        let mut input = FfAudioFrame::new(Sample::F32(SampleType::Packed), audio.samples.len() / audio.channels.max(1) as usize, ChannelLayout::STEREO);
        input.set_rate(audio.rate);
        unsafe {
            let data = input.data_mut(0);
            let bytes = std::slice::from_raw_parts(audio.samples.as_ptr() as *const u8, audio.samples.len() * 4);
            data[..bytes.len()].copy_from_slice(bytes);
        }

        let resampler = self.resampler.get_or_insert_with(|| {
            resampling::Context::get2(
                Sample::F32(SampleType::Packed), ChannelLayout::STEREO, audio.rate,
                Sample::F32(SampleType::Planar), ChannelLayout::STEREO, 44100,
            ).expect("create export audio resampler")
        });
        let mut resampled = FfAudioFrame::empty();
        resampler.run(&input, &mut resampled).map_err(|e| MediaError::Decode(PathBuf::new(), e.to_string()))?;
        resampled.set_pts(Some(self.audio_sample_count));
        self.audio_sample_count += resampled.samples() as i64;

        encoder.send_frame(&resampled).map_err(|e| MediaError::Decode(PathBuf::new(), e.to_string()))?;
        let mut encoded = ffmpeg::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(idx);
            encoded.write_interleaved(&mut self.octx).ok();
        }
        Ok(())
    }
}

fn open_err(dest: &Path, e: ffmpeg::Error) -> MediaError {
    MediaError::Open(dest.to_path_buf(), e.to_string())
}
