// crates/scrubdeck-media/src/workers/thumbnail.rs
//
// Thumbnail worker (§4.D): owns the offscreen renderer and an `IoReadCache`
// of opened `FfmpegReader`s so repeated scrubs of the same file don't pay
// to reopen it. The renderer itself is resolution-agnostic (it resizes its
// internal scaler/textures on demand), so there is no separate "recreate
// on size change" bookkeeping here beyond what `ThumbnailRenderer` impls
// already do.

use std::sync::Arc;

use scrubdeck_core::cache_entry::CacheEntry;

use crate::cache::ThumbnailCache;
use crate::compose::compose_frame_at;
use crate::ffmpeg_reader::FfmpegReader;
use crate::io_cache::IoReadCache;
use crate::plugin::{DecodedFrame, MediaReader};
use crate::queue::RequestQueue;
use crate::render::{default_renderer, ThumbnailRenderer};
use crate::workers::{concrete_path, ThumbnailJob, ThumbnailSource};

pub(crate) fn run(queue: Arc<RequestQueue<ThumbnailJob>>, cache: Arc<ThumbnailCache>, io_cache_capacity: usize) {
    let mut readers: IoReadCache<FfmpegReader> = IoReadCache::new(io_cache_capacity);
    let mut renderer: Box<dyn ThumbnailRenderer> = default_renderer();

    while let Some(job) = queue.recv() {
        if queue.is_shutdown() || queue.is_cancelled(job.id) {
            tracing::debug!(id = job.id, "thumbnail request resolved empty (cancelled or shutting down)");
            let _ = job.result_tx.send(None);
            continue;
        }

        if let Some(CacheEntry::Thumbnail(img)) = cache.get(&job.fingerprint) {
            let _ = job.result_tx.send(Some(img));
            continue;
        }

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| match &job.source {
            ThumbnailSource::Path(path) => {
                let key = concrete_path(path).to_string_lossy().into_owned();
                if readers.get_mut(&key).is_none() {
                    let (reader, _info) = FfmpegReader::open(path)?;
                    readers.put(key.clone(), reader);
                }
                let reader = readers.get_mut(&key).expect("just inserted");
                let frame = reader.frame_at(job.time).wait().flatten();
                Ok::<Option<DecodedFrame>, crate::error::MediaError>(frame)
            }
            ThumbnailSource::Otio(timeline) => {
                let frame = compose_frame_at(timeline, job.time, |path| FfmpegReader::open(path).map(|(reader, _info)| reader));
                Ok(frame)
            }
        }));

        let image = match outcome {
            Ok(Ok(Some(frame))) => {
                let out_height = job.height;
                let out_width = ((frame.width as f32 / frame.height.max(1) as f32) * out_height as f32).round() as u32;
                match renderer.render(&frame, out_width.max(1), out_height.max(1)) {
                    Ok(img) => Some(img),
                    Err(e) => {
                        tracing::debug!(id = job.id, source = %job.source, error = %e, "thumbnail render failed");
                        None
                    }
                }
            }
            Ok(Ok(None)) => {
                tracing::debug!(id = job.id, source = %job.source, "thumbnail decode found no frame");
                None
            }
            Ok(Err(e)) => {
                tracing::debug!(id = job.id, source = %job.source, error = %e, "thumbnail decode failed");
                None
            }
            Err(_) => {
                tracing::debug!(id = job.id, source = %job.source, "thumbnail worker panicked");
                None
            }
        };

        match &image {
            Some(img) => cache.add(job.fingerprint.clone(), CacheEntry::Thumbnail(img.clone())),
            None => cache.add(job.fingerprint.clone(), CacheEntry::Empty),
        }
        let _ = job.result_tx.send(image);
    }
}
