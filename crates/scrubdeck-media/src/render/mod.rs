// crates/scrubdeck-media/src/render/mod.rs
//
// `ThumbnailRenderer` — the trait behind the `software`/`gpu` feature split
// (§9 Design Note, §4.D thumbnail worker specifics). The worker owns a
// `Box<dyn ThumbnailRenderer>` and an offscreen buffer sized
// `height × (height × pixel_aspect_ratio)`, recreated when that size changes.

pub mod software;
#[cfg(feature = "gpu")]
pub mod gpu;

use scrubdeck_core::cache_entry::RasterImage;

use crate::error::MediaError;
use crate::plugin::DecodedFrame;

/// Scale a decoded frame to the requested thumbnail size and read back RGBA8
/// (§4.D: "Read-back pixels are always RGBA8 regardless of source bit
/// depth; geometry and gamma are not corrected — thumbnails are for UI
/// only").
pub trait ThumbnailRenderer: Send {
    fn render(&mut self, frame: &DecodedFrame, out_width: u32, out_height: u32) -> Result<RasterImage, MediaError>;
}

pub fn default_renderer() -> Box<dyn ThumbnailRenderer> {
    #[cfg(feature = "gpu")]
    {
        return Box::new(gpu::GpuRenderer::new());
    }
    #[cfg(not(feature = "gpu"))]
    {
        Box::new(software::SoftwareRenderer::new())
    }
}
