// crates/scrubdeck-media/src/workers/waveform.rs
//
// Waveform worker (§4.D): resample + mesh-build, both CPU-only, no GPU
// renderer and no reusable reader handle (the ffmpeg CLI subprocess opens
// and closes the file itself), so this worker carries no `IoReadCache`.

use std::sync::Arc;

use scrubdeck_core::cache_entry::CacheEntry;

use crate::cache::ThumbnailCache;
use crate::queue::RequestQueue;
use crate::waveform::build_waveform_mesh;
use crate::workers::{concrete_path, WaveformJob};

pub(crate) fn run(queue: Arc<RequestQueue<WaveformJob>>, cache: Arc<ThumbnailCache>) {
    while let Some(job) = queue.recv() {
        if queue.is_shutdown() || queue.is_cancelled(job.id) {
            tracing::debug!(id = job.id, "waveform request resolved empty (cancelled or shutting down)");
            let _ = job.result_tx.send(None);
            continue;
        }

        if let Some(CacheEntry::Waveform(mesh)) = cache.get(&job.fingerprint) {
            let _ = job.result_tx.send(Some(mesh));
            continue;
        }

        let path = concrete_path(&job.path);
        let (width, height) = job.size;
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| build_waveform_mesh(&path, width, height)));

        let mesh = match outcome {
            Ok(Ok(mesh)) => Some(Arc::new(mesh)),
            Ok(Err(e)) => {
                tracing::debug!(id = job.id, path = %job.path, error = %e, "waveform build failed");
                None
            }
            Err(_) => {
                tracing::debug!(id = job.id, path = %job.path, "waveform worker panicked");
                None
            }
        };

        match &mesh {
            Some(mesh) => cache.add(job.fingerprint.clone(), CacheEntry::Waveform(mesh.clone())),
            None => cache.add(job.fingerprint.clone(), CacheEntry::Empty),
        }
        let _ = job.result_tx.send(mesh);
    }
}
