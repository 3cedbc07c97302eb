// crates/scrubdeck-core/src/cache_entry.rs
//
// What the Thumbnail Cache stores (§3 "CacheEntry", §4.A). Every payload is
// `Arc`-wrapped so a handle a client is still holding stays valid after the
// entry is evicted from the cache's own map.

use std::sync::Arc;
use crate::io_info::IOInfo;

/// A single filled-quad triangle pair for one waveform column (§4.D).
#[derive(Clone, Copy, Debug)]
pub struct WaveformQuad {
    /// Output-space column index, `[0, width)`.
    pub x:       u32,
    pub y_top:    f32,
    pub y_bottom: f32,
}

#[derive(Clone, Debug, Default)]
pub struct TriangleMesh2 {
    pub quads: Vec<WaveformQuad>,
}

#[derive(Clone, Debug)]
pub struct RasterImage {
    pub width:  u32,
    pub height: u32,
    /// Packed RGBA8, row-major, no stride padding.
    pub rgba:   Arc<Vec<u8>>,
}

impl RasterImage {
    pub fn byte_cost(&self) -> usize {
        self.rgba.len()
    }
}

#[derive(Clone, Debug)]
pub enum CacheEntry {
    Info(Arc<IOInfo>),
    Thumbnail(RasterImage),
    Waveform(Arc<TriangleMesh2>),
    /// A request that resolved with nothing (unreadable/malformed input,
    /// cancellation). Still cached, per §4.D "Failure policy", so repeated
    /// requests for a known-bad file don't re-trigger IO.
    Empty,
}

impl CacheEntry {
    /// Approximate byte cost used to weigh the cache's configurable capacity.
    /// Info/Empty entries are cheap and charged a flat cost so they still
    /// count against capacity without dominating eviction decisions.
    pub fn approx_cost(&self) -> usize {
        match self {
            CacheEntry::Info(_) => 256,
            CacheEntry::Thumbnail(img) => img.byte_cost(),
            CacheEntry::Waveform(mesh) => mesh.quads.len() * std::mem::size_of::<WaveformQuad>(),
            CacheEntry::Empty => 64,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CacheEntry::Empty)
    }
}
