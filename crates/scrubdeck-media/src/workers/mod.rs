// crates/scrubdeck-media/src/workers/mod.rs
//
// The three long-lived worker threads (§4.D) and the job types that travel
// through each `RequestQueue`. One module per worker, `spawn_*` wires a
// queue + the shared cache into a `JoinHandle`, mirroring how the teacher's
// `worker.rs` spawns its decode/playback threads from `MediaWorker::new`.

mod info;
mod thumbnail;
mod waveform;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;

use scrubdeck_core::cache_entry::{RasterImage, TriangleMesh2};
use scrubdeck_core::io_info::IOInfo;
use scrubdeck_core::options::RequestOptions;
use scrubdeck_core::path::MediaPath;
use scrubdeck_core::time::{RationalTime, TimeRange};
use scrubdeck_core::timeline::Timeline;

use crate::cache::ThumbnailCache;
use crate::queue::{Identified, RequestQueue};

pub(crate) struct InfoJob {
    pub id:          u64,
    pub path:        MediaPath,
    pub options:     RequestOptions,
    pub fingerprint: String,
    pub result_tx:   Sender<Option<Arc<IOInfo>>>,
}
impl Identified for InfoJob {
    fn id(&self) -> u64 { self.id }
}

/// What a thumbnail decodes from: a single media file, or the composed
/// frame of an OTIO timeline (§4.D "For OTIO timeline inputs...").
pub(crate) enum ThumbnailSource {
    Path(MediaPath),
    Otio(Arc<Timeline>),
}

impl std::fmt::Display for ThumbnailSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThumbnailSource::Path(path) => write!(f, "{path}"),
            ThumbnailSource::Otio(_) => write!(f, "<otio composition>"),
        }
    }
}

pub(crate) struct ThumbnailJob {
    pub id:          u64,
    pub source:      ThumbnailSource,
    pub height:      u32,
    pub time:        RationalTime,
    pub options:     RequestOptions,
    pub fingerprint: String,
    pub result_tx:   Sender<Option<RasterImage>>,
}
impl Identified for ThumbnailJob {
    fn id(&self) -> u64 { self.id }
}

pub(crate) struct WaveformJob {
    pub id:          u64,
    pub path:        MediaPath,
    pub size:        (u32, u32),
    pub range:       TimeRange,
    pub options:     RequestOptions,
    pub fingerprint: String,
    pub result_tx:   Sender<Option<Arc<TriangleMesh2>>>,
}
impl Identified for WaveformJob {
    fn id(&self) -> u64 { self.id }
}

pub(crate) fn spawn_info_worker(
    queue: Arc<RequestQueue<InfoJob>>,
    cache: Arc<ThumbnailCache>,
    io_cache_capacity: usize,
) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("scrubdeck-info-worker".into())
        .spawn(move || info::run(queue, cache, io_cache_capacity))
        .expect("spawn info worker")
}

pub(crate) fn spawn_thumbnail_worker(
    queue: Arc<RequestQueue<ThumbnailJob>>,
    cache: Arc<ThumbnailCache>,
    io_cache_capacity: usize,
) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("scrubdeck-thumbnail-worker".into())
        .spawn(move || thumbnail::run(queue, cache, io_cache_capacity))
        .expect("spawn thumbnail worker")
}

pub(crate) fn spawn_waveform_worker(
    queue: Arc<RequestQueue<WaveformJob>>,
    cache: Arc<ThumbnailCache>,
) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("scrubdeck-waveform-worker".into())
        .spawn(move || waveform::run(queue, cache))
        .expect("spawn waveform worker")
}

/// Shared by all three workers: a fresh probe/open of `path`, used both to
/// prime the info cache and (for waveform/thumbnail) just to get a concrete
/// on-disk path out of a `MediaPath`.
pub(crate) fn concrete_path(path: &MediaPath) -> PathBuf {
    path.render_frame(0)
}
