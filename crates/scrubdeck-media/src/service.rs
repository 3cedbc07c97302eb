// crates/scrubdeck-media/src/service.rs
//
// `MediaService` — the public facade (§4.E). Owns the three queues, their
// worker threads, the shared cache, and the id counter that is monotonic
// *across* all three queues (§3: "Id is monotonic across the service").

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use scrubdeck_core::cache_entry::{RasterImage, TriangleMesh2};
use scrubdeck_core::io_info::IOInfo;
use scrubdeck_core::options::{info_fingerprint, otio_thumbnail_fingerprint, thumbnail_fingerprint, waveform_fingerprint, RequestOptions};
use scrubdeck_core::path::MediaPath;
use scrubdeck_core::time::{RationalTime, TimeRange};
use scrubdeck_core::timeline::Timeline;

use crate::cache::ThumbnailCache;
use crate::config::ServiceConfig;
use crate::queue::RequestFuture;
use crate::workers::{spawn_info_worker, spawn_thumbnail_worker, spawn_waveform_worker, InfoJob, ThumbnailJob, ThumbnailSource, WaveformJob};
use crate::queue::RequestQueue;

pub struct InfoRequest {
    pub id:     u64,
    pub future: RequestFuture<Option<Arc<IOInfo>>>,
}

pub struct ThumbnailRequest {
    pub id:     u64,
    pub height: u32,
    pub time:   RationalTime,
    pub future: RequestFuture<Option<RasterImage>>,
}

pub struct WaveformRequest {
    pub id:         u64,
    pub size:       (u32, u32),
    pub time_range: TimeRange,
    pub future:     RequestFuture<Option<Arc<TriangleMesh2>>>,
}

pub struct MediaService {
    info_queue:     Arc<RequestQueue<InfoJob>>,
    thumb_queue:    Arc<RequestQueue<ThumbnailJob>>,
    waveform_queue: Arc<RequestQueue<WaveformJob>>,
    cache:          Arc<ThumbnailCache>,
    next_id:        AtomicU64,
    handles:        Vec<JoinHandle<()>>,
    // Temp files backing byte-buffer overloads, kept alive for the service's
    // lifetime since a worker may still be holding the path open via its
    // IoReadCache when the request resolves.
    temp_files:     parking_lot::Mutex<Vec<tempfile::TempPath>>,
}

impl MediaService {
    pub fn new(config: ServiceConfig) -> Self {
        let cache = ThumbnailCache::new(config.cache_max_bytes);
        let info_queue = Arc::new(RequestQueue::new());
        let thumb_queue = Arc::new(RequestQueue::new());
        let waveform_queue = Arc::new(RequestQueue::new());

        let handles = vec![
            spawn_info_worker(info_queue.clone(), cache.clone(), config.io_cache_capacity),
            spawn_thumbnail_worker(thumb_queue.clone(), cache.clone(), config.io_cache_capacity),
            spawn_waveform_worker(waveform_queue.clone(), cache.clone()),
        ];

        Self {
            info_queue,
            thumb_queue,
            waveform_queue,
            cache,
            next_id: AtomicU64::new(1),
            handles,
            temp_files: parking_lot::Mutex::new(Vec::new()),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn get_info(&self, path: MediaPath, options: RequestOptions) -> InfoRequest {
        let id = self.next_id();
        let fingerprint = info_fingerprint(&path, &options);
        if let Some(cached) = self.cache_hit_info(&fingerprint) {
            return cached_info_request(id, cached);
        }
        let (tx, future) = RequestFuture::pair();
        self.info_queue.submit(InfoJob { id, path, options, fingerprint, result_tx: tx });
        InfoRequest { id, future }
    }

    pub fn get_thumbnail(&self, path: MediaPath, height: u32, time: RationalTime, options: RequestOptions) -> ThumbnailRequest {
        let id = self.next_id();
        let fingerprint = thumbnail_fingerprint(height, &path, time, &options);
        if let Some(cached) = self.cache_hit_thumbnail(&fingerprint) {
            return cached_thumbnail_request(id, height, time, cached);
        }
        let (tx, future) = RequestFuture::pair();
        self.thumb_queue.submit(ThumbnailJob { id, source: ThumbnailSource::Path(path), height, time, options, fingerprint, result_tx: tx });
        ThumbnailRequest { id, height, time, future }
    }

    /// §4.D "For OTIO timeline inputs": decodes the composed frame of a full
    /// timeline rather than a single file. `composition_id` is the caller's
    /// own stable-enough identity for the composition (e.g. a serialized
    /// snapshot), since the facade has no document revision of its own.
    pub fn get_thumbnail_otio(
        &self, timeline: Arc<Timeline>, composition_id: &str, height: u32, time: RationalTime, options: RequestOptions,
    ) -> ThumbnailRequest {
        let id = self.next_id();
        let fingerprint = otio_thumbnail_fingerprint(composition_id, height, time, &options);
        if let Some(cached) = self.cache_hit_thumbnail(&fingerprint) {
            return cached_thumbnail_request(id, height, time, cached);
        }
        let (tx, future) = RequestFuture::pair();
        self.thumb_queue.submit(ThumbnailJob { id, source: ThumbnailSource::Otio(timeline), height, time, options, fingerprint, result_tx: tx });
        ThumbnailRequest { id, height, time, future }
    }

    pub fn get_waveform(&self, path: MediaPath, size: (u32, u32), time_range: TimeRange, options: RequestOptions) -> WaveformRequest {
        let id = self.next_id();
        let fingerprint = waveform_fingerprint(size, &path, time_range, &options);
        if let Some(cached) = self.cache_hit_waveform(&fingerprint) {
            return cached_waveform_request(id, size, time_range, cached);
        }
        let (tx, future) = RequestFuture::pair();
        self.waveform_queue.submit(WaveformJob { id, path, size, range: time_range, options, fingerprint, result_tx: tx });
        WaveformRequest { id, size, time_range, future }
    }

    /// Byte-buffer overload (§4.E: "Overloads accepting in-memory byte
    /// buffers"). Spills to a temp file the way the teacher's `tempfile`
    /// dependency is already used for scratch media elsewhere in the pack.
    pub fn get_info_bytes(&self, bytes: &[u8], suggested_extension: &str, options: RequestOptions) -> anyhow::Result<InfoRequest> {
        let path = self.spill_to_temp(bytes, suggested_extension)?;
        Ok(self.get_info(path, options))
    }

    pub fn get_thumbnail_bytes(
        &self, bytes: &[u8], suggested_extension: &str, height: u32, time: RationalTime, options: RequestOptions,
    ) -> anyhow::Result<ThumbnailRequest> {
        let path = self.spill_to_temp(bytes, suggested_extension)?;
        Ok(self.get_thumbnail(path, height, time, options))
    }

    pub fn get_waveform_bytes(
        &self, bytes: &[u8], suggested_extension: &str, size: (u32, u32), time_range: TimeRange, options: RequestOptions,
    ) -> anyhow::Result<WaveformRequest> {
        let path = self.spill_to_temp(bytes, suggested_extension)?;
        Ok(self.get_waveform(path, size, time_range, options))
    }

    fn spill_to_temp(&self, bytes: &[u8], extension: &str) -> anyhow::Result<MediaPath> {
        let mut file = tempfile::Builder::new().suffix(&format!(".{extension}")).tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        let temp_path = file.into_temp_path();
        let media_path = MediaPath::from_file(&temp_path);
        // Keep the guard alive for the service's lifetime — dropping it
        // deletes the file, and a worker may still have it open.
        self.temp_files.lock().push(temp_path);
        Ok(media_path)
    }

    /// Cancels across all three queues (§4.E: "atomically with respect to
    /// each queue's own lock" — each queue's cancel call takes only its own
    /// lock, so there's no single cross-queue lock to hold; an id only ever
    /// lives in one queue, so per-queue atomicity is all correctness needs).
    pub fn cancel_requests(&self, ids: &[u64]) {
        self.info_queue.cancel(ids);
        self.thumb_queue.cancel(ids);
        self.waveform_queue.cancel(ids);
    }

    pub fn cache(&self) -> &Arc<ThumbnailCache> {
        &self.cache
    }

    fn cache_hit_info(&self, fingerprint: &str) -> Option<Arc<IOInfo>> {
        match self.cache.get(fingerprint) {
            Some(scrubdeck_core::cache_entry::CacheEntry::Info(info)) => Some(info),
            _ => None,
        }
    }

    fn cache_hit_thumbnail(&self, fingerprint: &str) -> Option<RasterImage> {
        match self.cache.get(fingerprint) {
            Some(scrubdeck_core::cache_entry::CacheEntry::Thumbnail(img)) => Some(img),
            _ => None,
        }
    }

    fn cache_hit_waveform(&self, fingerprint: &str) -> Option<Arc<TriangleMesh2>> {
        match self.cache.get(fingerprint) {
            Some(scrubdeck_core::cache_entry::CacheEntry::Waveform(mesh)) => Some(mesh),
            _ => None,
        }
    }
}

fn cached_info_request(id: u64, info: Arc<IOInfo>) -> InfoRequest {
    let (tx, future) = RequestFuture::pair();
    let _ = tx.send(Some(info));
    InfoRequest { id, future }
}

fn cached_thumbnail_request(id: u64, height: u32, time: RationalTime, img: RasterImage) -> ThumbnailRequest {
    let (tx, future) = RequestFuture::pair();
    let _ = tx.send(Some(img));
    ThumbnailRequest { id, height, time, future }
}

fn cached_waveform_request(id: u64, size: (u32, u32), time_range: TimeRange, mesh: Arc<TriangleMesh2>) -> WaveformRequest {
    let (tx, future) = RequestFuture::pair();
    let _ = tx.send(Some(mesh));
    WaveformRequest { id, size, time_range, future }
}

impl Drop for MediaService {
    fn drop(&mut self) {
        self.info_queue.shutdown();
        self.thumb_queue.shutdown();
        self.waveform_queue.shutdown();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_across_queue_kinds() {
        let service = MediaService::new(ServiceConfig::default());
        let path = MediaPath::from_file("/nonexistent/clip.mov");
        let a = service.get_info(path.clone(), RequestOptions::new());
        let b = service.get_thumbnail(path.clone(), 64, RationalTime::zero(24.0), RequestOptions::new());
        let c = service.get_waveform(path, (256, 48), TimeRange::new(RationalTime::zero(24.0), RationalTime::new(24.0, 24.0)), RequestOptions::new());
        assert!(a.id < b.id);
        assert!(b.id < c.id);
    }

    #[test]
    fn unreadable_file_resolves_empty_not_hang() {
        let service = MediaService::new(ServiceConfig::default());
        let path = MediaPath::from_file("/nonexistent/clip.mov");
        let req = service.get_info(path, RequestOptions::new());
        assert_eq!(req.future.wait(), Some(None));
    }

    #[test]
    fn cancel_resolves_empty() {
        let service = MediaService::new(ServiceConfig::default());
        let path = MediaPath::from_file("/nonexistent/clip.mov");
        let req = service.get_info(path, RequestOptions::new());
        service.cancel_requests(&[req.id]);
        assert_eq!(req.future.wait(), Some(None));
    }

    #[test]
    fn otio_thumbnail_on_empty_timeline_resolves_empty() {
        let service = MediaService::new(ServiceConfig::default());
        let timeline = Arc::new(Timeline::new(24.0));
        let req = service.get_thumbnail_otio(timeline, "empty", 64, RationalTime::zero(24.0), RequestOptions::new());
        assert_eq!(req.future.wait(), Some(None));
    }
}
