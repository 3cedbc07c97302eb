// crates/scrubdeck-ui/src/modules/export.rs
//
// Export panel. Grounded on the teacher's `modules/export.rs` layout:
// same filename/resolution/fps fields, same stats frame, same single
// "Render" call-to-action button. The teacher's `RenderMP4` command just
// queued a render in `VeloCutApp`'s own worker; here the module spawns the
// background thread itself and hands `AppContext::render_job` the handle,
// since `SavePipeline::run` is a long blocking call with no async story of
// its own (§4.I).

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use egui::{RichText, Stroke, Ui};
use parking_lot::Mutex;
use rfd::FileDialog;

use scrubdeck_core::commands::EditorCommand;
use scrubdeck_core::time::{RationalTime, TimeRange};
use scrubdeck_media::error::SaveError;
use scrubdeck_media::plugin::WriterOptions;
use scrubdeck_media::writer::FfmpegWriter;
use scrubdeck_media::save::{rewrite_extension, ExportHost, ExportOptions, SavePipeline};

use crate::context::{AppContext, RenderJob};
use crate::modules::{EditorModule, ThumbnailCache};
use crate::project::Project;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM};

/// View-state save/restore already happened on the main thread (the module
/// pushes `EditorCommand::Pause` before spawning) — the background thread
/// only runs the frame loop, so it gets a host with nothing left to do.
struct NoopExportHost;
impl ExportHost for NoopExportHost {
    fn save_view_state_and_stop_playback(&mut self) {}
    fn restore_view_state(&mut self) {}
}

#[derive(PartialEq, Clone, Copy)]
enum ResolutionPreset {
    Hd,
    Fhd,
    Uhd,
}

impl ResolutionPreset {
    fn dims(self) -> (u32, u32) {
        match self {
            ResolutionPreset::Hd => (1280, 720),
            ResolutionPreset::Fhd => (1920, 1080),
            ResolutionPreset::Uhd => (3840, 2160),
        }
    }
}

pub struct ExportModule {
    filename: String,
    resolution: ResolutionPreset,
    fps: u32,
    codec: String,
}

impl Default for ExportModule {
    fn default() -> Self {
        Self { filename: "sequence_01.mp4".into(), resolution: ResolutionPreset::Fhd, fps: 30, codec: "h264".into() }
    }
}

impl EditorModule for ExportModule {
    fn name(&self) -> &str {
        "Export"
    }

    fn ui(&mut self, ui: &mut Ui, project: &mut Project, ctx: &mut AppContext, _thumb_cache: &mut ThumbnailCache, cmd: &mut Vec<EditorCommand>) {
        ui.vertical(|ui| {
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(egui::Margin { left: 8, right: 8, top: 6, bottom: 6 })
                .show(ui, |ui| {
                    ui.label(RichText::new("🚀 Export").size(12.0).strong());
                });

            ui.separator();
            ui.add_space(6.0);

            ui.label(RichText::new("Output Name").size(11.0).color(DARK_TEXT_DIM));
            ui.add_space(2.0);
            ui.add(egui::TextEdit::singleline(&mut self.filename).desired_width(f32::INFINITY).hint_text("filename.mp4"));

            ui.add_space(10.0);

            ui.label(RichText::new("Resolution").size(11.0).color(DARK_TEXT_DIM));
            ui.add_space(2.0);
            egui::ComboBox::from_id_salt("resolution_preset")
                .selected_text(match self.resolution {
                    ResolutionPreset::Hd => "1280 × 720  (HD)",
                    ResolutionPreset::Fhd => "1920 × 1080 (FHD)",
                    ResolutionPreset::Uhd => "3840 × 2160 (4K)",
                })
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.resolution, ResolutionPreset::Hd, "1280 × 720  (HD)");
                    ui.selectable_value(&mut self.resolution, ResolutionPreset::Fhd, "1920 × 1080 (FHD)");
                    ui.selectable_value(&mut self.resolution, ResolutionPreset::Uhd, "3840 × 2160 (4K)");
                });

            ui.add_space(10.0);

            ui.label(RichText::new("Frame Rate").size(11.0).color(DARK_TEXT_DIM));
            ui.add_space(2.0);
            ui.horizontal(|ui| {
                for &rate in &[24u32, 30, 60] {
                    let selected = self.fps == rate;
                    let btn = egui::Button::new(RichText::new(format!("{rate} fps")).size(11.0).color(if selected { ACCENT } else { DARK_TEXT_DIM }))
                        .stroke(Stroke::new(1.0, if selected { ACCENT } else { DARK_BORDER }))
                        .fill(if selected { DARK_BG_3 } else { DARK_BG_2 });
                    if ui.add(btn).clicked() {
                        self.fps = rate;
                    }
                }
            });

            ui.add_space(10.0);

            if let Ok(timeline) = project.timeline() {
                egui::Frame::new()
                    .fill(DARK_BG_3)
                    .stroke(Stroke::new(1.0, DARK_BORDER))
                    .corner_radius(egui::CornerRadius::same(4))
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(format!("Duration:  {:.1}s", timeline.total_duration().to_seconds())).size(11.0).monospace());
                        ui.label(RichText::new(format!("Tracks:    {}", timeline.tracks.len())).size(11.0).monospace());
                        ui.label(RichText::new("Format:    MP4 / H.264").size(11.0).monospace());
                    });
            }

            ui.add_space(12.0);

            if let Some(progress) = ctx.render_progress() {
                ui.add(egui::ProgressBar::new(progress as f32).desired_width(ui.available_width()).show_percentage());
                if ui.button("Cancel render").clicked() {
                    ctx.cancel_render();
                }
            } else {
                let render_btn = egui::Button::new(RichText::new("⚡ Render MP4").size(13.0).strong().color(egui::Color32::BLACK))
                    .fill(ACCENT)
                    .stroke(Stroke::NONE)
                    .min_size(egui::vec2(ui.available_width(), 34.0));
                if ui.add(render_btn).clicked() {
                    if let Some(dest) = FileDialog::new().set_file_name(&self.filename).add_filter("MP4", &["mp4"]).save_file() {
                        cmd.push(EditorCommand::Pause);
                        self.start_render(project, ctx, dest);
                    }
                }
            }

            if let Some(status) = &ctx.render_status {
                ui.add_space(6.0);
                ui.label(RichText::new(status).size(10.5).color(DARK_TEXT_DIM));
            }
        });
    }
}

impl ExportModule {
    fn start_render(&mut self, project: &mut Project, ctx: &mut AppContext, dest: PathBuf) {
        let Ok(timeline) = project.timeline() else { return };
        let (width, height) = self.resolution.dims();
        let range = TimeRange::new(RationalTime::zero(project.rate), timeline.total_duration());
        let options = ExportOptions {
            codec: self.codec.clone(),
            rate: self.fps as f64,
            audio_enabled: timeline.tracks.iter().any(|t| t.kind == scrubdeck_core::timeline::TrackKind::Audio),
            write_annotations: false,
            writer_options: WriterOptions::default(),
        };

        let dest = match rewrite_extension(&options.codec, &dest) {
            Ok(dest) => dest,
            Err(_) => return,
        };
        if dest.exists() {
            ctx.render_status = Some(format!("destination '{}' already exists", dest.display()));
            return;
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let progress = Arc::new(Mutex::new(0.0));
        let job_cancel = cancel.clone();
        let job_progress = progress.clone();
        let fps = self.fps;
        let audio_enabled = options.audio_enabled;
        let codec = options.codec.clone();

        let handle = std::thread::spawn(move || -> Result<(), SaveError> {
            let pipeline = SavePipeline::new(1024);
            let mut writer = FfmpegWriter::create(&dest, width, height, fps, audio_enabled, &codec).map_err(SaveError::Media)?;
            let mut host = NoopExportHost;
            pipeline.run(&timeline, range, &options, &mut writer, &mut host, &job_cancel, None, |p| {
                *job_progress.lock() = p;
            })?;
            writer.finish().map_err(SaveError::Media)
        });

        ctx.render_job = Some(RenderJob { cancel, progress, handle });
        ctx.render_status = None;
    }
}
