// crates/scrubdeck-media/src/waveform.rs
//
// Waveform mesh generation (§4.D). Resampling is the teacher's ffmpeg-CLI
// pipe trick from the old `extract_waveform`, kept verbatim in spirit; the
// per-column min/max quad geometry is new — the teacher only ever produced
// a flat `Vec<f32>` of bar peaks for a fixed-width UI widget.

use std::path::Path;

use scrubdeck_core::cache_entry::{TriangleMesh2, WaveformQuad};

use crate::error::MediaError;

const RESAMPLE_RATE_HZ: &str = "2000";

fn resample_mono_f32(path: &Path) -> Result<Vec<f32>, MediaError> {
    let output = std::process::Command::new("ffmpeg")
        .args([
            "-i", path.to_string_lossy().as_ref(),
            "-vn",
            "-acodec", "pcm_f32le",
            "-ar", RESAMPLE_RATE_HZ,
            "-ac", "1",
            "-f", "f32le",
            "pipe:1",
        ])
        .output()
        .map_err(|e| MediaError::Open(path.to_path_buf(), e.to_string()))?;

    if !output.status.success() {
        let tail = String::from_utf8_lossy(&output.stderr).lines().last().unwrap_or("").to_string();
        return Err(MediaError::Decode(path.to_path_buf(), tail));
    }

    Ok(output.stdout
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]).clamp(-1.0, 1.0))
        .collect())
}

/// Build a `width`-column waveform mesh for `path`, scaled into `height`
/// pixel-space (§4.D: `y = h/2 - h/2 * amplitude`, so +1.0 sits at the top
/// row and -1.0 at the bottom). Each column is a quad spanning the min/max
/// sample amplitude in its window; columns whose window is silent
/// (min == max) are skipped rather than emitting a zero-area quad.
pub fn build_waveform_mesh(path: &Path, width: u32, height: u32) -> Result<TriangleMesh2, MediaError> {
    let samples = resample_mono_f32(path)?;
    if samples.is_empty() || width == 0 {
        return Ok(TriangleMesh2::default());
    }

    let half_height = height as f32 / 2.0;
    let to_pixel_y = |amplitude: f32| half_height - half_height * amplitude;

    let block = (samples.len() / width as usize).max(1);
    let mut quads = Vec::with_capacity(width as usize);

    for (x, chunk) in samples.chunks(block).take(width as usize).enumerate() {
        let seed = chunk[0];
        let (min, max) = chunk.iter().fold((seed, seed), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        if min == max {
            continue;
        }
        // `max` is the highest amplitude, which maps to the smaller pixel-y
        // (closer to the top row) — so y_top comes from `max`.
        quads.push(WaveformQuad { x: x as u32, y_top: to_pixel_y(max), y_bottom: to_pixel_y(min) });
    }

    Ok(TriangleMesh2 { quads })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_samples_yield_empty_mesh() {
        let mesh = TriangleMesh2::default();
        assert!(mesh.quads.is_empty());
    }

    #[test]
    fn degenerate_columns_are_skipped() {
        // A window of identical samples (min == max) must not produce a quad;
        // exercised directly since `build_waveform_mesh` shells out to ffmpeg.
        let chunk = [0.25f32, 0.25, 0.25];
        let (min, max) = chunk.iter().fold((0.0f32, 0.0f32), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        assert_eq!(min, max);
    }
}
