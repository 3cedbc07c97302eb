// crates/scrubdeck-media/src/workers/info.rs
//
// Info worker (§4.D): the six-step loop specialized to probing. Adapted
// from the teacher's `probe.rs`, which only pulled duration + one thumbnail
// out of a probe; here the full `IOInfo` (every stream, tags) comes back
// from `FfmpegReader::open`.

use std::sync::Arc;

use scrubdeck_core::cache_entry::CacheEntry;

use crate::cache::ThumbnailCache;
use crate::ffmpeg_reader::FfmpegReader;
use crate::plugin::MediaReader;
use crate::queue::RequestQueue;
use crate::workers::InfoJob;

pub(crate) fn run(queue: Arc<RequestQueue<InfoJob>>, cache: Arc<ThumbnailCache>, _io_cache_capacity: usize) {
    // IOInfo::open() needs the whole file opened fresh; there's nothing to
    // reuse from a pooled reader handle the way frame/audio decode can, so
    // this worker has no IoReadCache of its own (unlike thumbnail/waveform).
    while let Some(job) = queue.recv() {
        if queue.is_shutdown() || queue.is_cancelled(job.id) {
            tracing::debug!(id = job.id, "info request resolved empty (cancelled or shutting down)");
            let _ = job.result_tx.send(None);
            continue;
        }

        if let Some(CacheEntry::Info(info)) = cache.get(&job.fingerprint) {
            let _ = job.result_tx.send(Some(info));
            continue;
        }

        let path = job.path.clone();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| FfmpegReader::open(&path)));

        let info = match outcome {
            Ok(Ok((_reader, info))) => Some(Arc::new(info)),
            Ok(Err(e)) => {
                tracing::debug!(id = job.id, path = %job.path, error = %e, "info probe failed");
                None
            }
            Err(_) => {
                tracing::debug!(id = job.id, path = %job.path, "info probe panicked");
                None
            }
        };

        match &info {
            Some(info) => cache.add(job.fingerprint.clone(), CacheEntry::Info(info.clone())),
            None => cache.add(job.fingerprint.clone(), CacheEntry::Empty),
        }
        let _ = job.result_tx.send(info);
    }
}
