// crates/scrubdeck-ui/src/context.rs
//
// AppContext owns all runtime handles that are NOT part of the serializable
// project state: the media service, in-flight request bookkeeping, and
// texture caches. ScrubdeckApp holds one of these plus a Project and the
// module list — nothing else, mirroring the teacher's `VeloCutApp{state,
// context, modules}` split in app.rs.
//
// The teacher's `AppContext` drained a `crossbeam_channel` of `MediaResult`
// once per frame (`ingest_media_results`). `MediaService` instead hands back
// a `RequestFuture` per call, polled with `.poll()` — so this context keeps
// pending requests in small maps and drains them with `try_recv`-style
// polling each tick instead of matching on a result enum.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use egui::{ColorImage, TextureHandle, TextureOptions};
use scrubdeck_core::cache_entry::{RasterImage, TriangleMesh2};
use scrubdeck_core::ids::ItemId;
use scrubdeck_core::io_info::IOInfo;
use scrubdeck_core::options::RequestOptions;
use scrubdeck_core::path::MediaPath;
use scrubdeck_core::time::{RationalTime, TimeRange};
use scrubdeck_core::timeline::Timeline;
use scrubdeck_media::{MediaService, ServiceConfig};
use scrubdeck_media::service::{InfoRequest, ThumbnailRequest, WaveformRequest};

/// Height the preview monitor decodes at — the same request path as
/// timeline thumbnails (`MediaService::get_thumbnail`), just a bigger one.
const PREVIEW_HEIGHT_PX: u32 = 720;

use crate::modules::ThumbnailCache;

fn raster_to_color_image(raster: &RasterImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied([raster.width as usize, raster.height as usize], &raster.rgba)
}

/// One pending "import this file" probe, keyed by the path the user dropped
/// or picked — resolves into a library entry once `InfoRequest::future`
/// yields.
pub struct PendingImport {
    pub path:    PathBuf,
    pub request: InfoRequest,
}

pub struct RenderJob {
    pub cancel:   Arc<AtomicBool>,
    pub progress: std::sync::Arc<parking_lot::Mutex<f64>>,
    pub handle:   std::thread::JoinHandle<Result<(), scrubdeck_media::error::SaveError>>,
}

pub struct AppContext {
    pub media: MediaService,

    pub pending_imports:    Vec<PendingImport>,
    pub pending_thumbnails: HashMap<ItemId, ThumbnailRequest>,
    pub library_info:       HashMap<PathBuf, Arc<IOInfo>>,

    /// Item thumbnails / decoded preview frame, loaded into egui textures.
    pub thumbnail_cache: ThumbnailCache,
    pub preview_texture: Option<TextureHandle>,

    pending_waveforms: HashMap<ItemId, WaveformRequest>,
    pub waveform_cache: HashMap<ItemId, Arc<TriangleMesh2>>,

    pub render_job: Option<RenderJob>,
    pub render_status: Option<String>,

    pending_preview: Option<ThumbnailRequest>,
    last_preview_key: Option<(String, i64)>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            media: MediaService::new(ServiceConfig::default()),
            pending_imports: Vec::new(),
            pending_thumbnails: HashMap::new(),
            library_info: HashMap::new(),
            thumbnail_cache: HashMap::new(),
            preview_texture: None,
            pending_waveforms: HashMap::new(),
            waveform_cache: HashMap::new(),
            render_job: None,
            render_status: None,
            pending_preview: None,
            last_preview_key: None,
        }
    }

    /// Requests the composed frame of `timeline` at `time` for the preview
    /// monitor (§4.D: OTIO-timeline thumbnail input), de-duplicating against
    /// the last frame already requested or in flight. The composition's
    /// identity is its own serialized content, since the facade has no
    /// revision counter to key on.
    pub fn request_preview_frame(&mut self, timeline: &Timeline, time: RationalTime) {
        let composition_id = serde_json::to_string(timeline).unwrap_or_default();
        let key = (composition_id.clone(), time.value.round() as i64);
        if self.last_preview_key.as_ref() == Some(&key) {
            return;
        }
        self.last_preview_key = Some(key);
        self.pending_preview = Some(self.media.get_thumbnail_otio(Arc::new(timeline.clone()), &composition_id, PREVIEW_HEIGHT_PX, time, RequestOptions::new()));
    }

    pub fn begin_import(&mut self, path: PathBuf) {
        let media_path = MediaPath::from_file(&path);
        let request = self.media.get_info(media_path, RequestOptions::new());
        self.pending_imports.push(PendingImport { path, request });
    }

    pub fn request_thumbnail(&mut self, item: ItemId, path: &MediaPath, height: u32, time: RationalTime) {
        if self.pending_thumbnails.contains_key(&item) {
            return;
        }
        let request = self.media.get_thumbnail(path.clone(), height, time, RequestOptions::new());
        self.pending_thumbnails.insert(item, request);
    }

    /// Requests a waveform mesh for a timeline clip (§4.D), cached per item
    /// the same way thumbnails are — one in-flight request per item at a
    /// time, result kept around until the item or its media changes.
    pub fn request_waveform(&mut self, item: ItemId, path: &MediaPath, size: (u32, u32), time_range: TimeRange) {
        if self.waveform_cache.contains_key(&item) || self.pending_waveforms.contains_key(&item) {
            return;
        }
        let request = self.media.get_waveform(path.clone(), size, time_range, RequestOptions::new());
        self.pending_waveforms.insert(item, request);
    }

    /// Drains every in-flight request once per frame (§4.E "clients poll
    /// them on a periodic tick"). Returns the paths that just finished
    /// importing so the caller can add them to the project's library.
    pub fn poll(&mut self, egui_ctx: &egui::Context) -> Vec<(PathBuf, Option<Arc<IOInfo>>)> {
        let mut finished_imports = Vec::new();
        self.pending_imports.retain(|pending| {
            match pending.request.future.poll() {
                Some(info) => {
                    if let Some(info) = &info {
                        self.library_info.insert(pending.path.clone(), info.clone());
                    }
                    finished_imports.push((pending.path.clone(), info));
                    false
                }
                None => true,
            }
        });

        let mut resolved_thumbs = Vec::new();
        self.pending_thumbnails.retain(|item, request| match request.future.poll() {
            Some(raster) => {
                resolved_thumbs.push((*item, raster));
                false
            }
            None => true,
        });
        for (item, raster) in resolved_thumbs {
            let Some(raster) = raster else { continue };
            let image = raster_to_color_image(&raster);
            let tex = egui_ctx.load_texture(format!("thumb-{}", item.0), image, TextureOptions::LINEAR);
            self.thumbnail_cache.insert(item, tex);
        }

        let mut resolved_waveforms = Vec::new();
        self.pending_waveforms.retain(|item, request| match request.future.poll() {
            Some(mesh) => {
                resolved_waveforms.push((*item, mesh));
                false
            }
            None => true,
        });
        for (item, mesh) in resolved_waveforms {
            if let Some(mesh) = mesh {
                self.waveform_cache.insert(item, mesh);
            }
        }

        let resolved_preview = self.pending_preview.as_ref().and_then(|r| r.future.poll());
        if let Some(raster) = resolved_preview {
            self.pending_preview = None;
            if let Some(raster) = raster {
                let image = raster_to_color_image(&raster);
                self.preview_texture = Some(egui_ctx.load_texture("preview", image, TextureOptions::LINEAR));
                egui_ctx.request_repaint();
            }
        }

        if let Some(job) = &self.render_job {
            if job.handle.is_finished() {
                let job = self.render_job.take().unwrap();
                match job.handle.join() {
                    Ok(Ok(())) => self.render_status = Some("render complete".to_string()),
                    Ok(Err(e)) => self.render_status = Some(format!("render failed: {e}")),
                    Err(_) => self.render_status = Some("render thread panicked".to_string()),
                }
            }
        }

        finished_imports
    }

    pub fn render_progress(&self) -> Option<f64> {
        self.render_job.as_ref().map(|j| *j.progress.lock())
    }

    pub fn cancel_render(&mut self) {
        if let Some(job) = &self.render_job {
            job.cancel.store(true, Ordering::Relaxed);
        }
    }

}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
