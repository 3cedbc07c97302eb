// crates/scrubdeck-ui/src/modules/preview.rs
//
// Monitor panel. Grounded on the teacher's `modules/preview.rs`: same
// centred aspect-correct canvas, same "LIVE" badge while playing, same
// transport bar laid out in a child `Ui` pinned under the canvas. The
// teacher pulled frames out of a `MediaWorker` scrub-frame cache keyed by
// `(media_id, bucket)`; this module instead walks `project.timeline()` for
// the clip under the playhead each frame and asks `AppContext` for that
// frame through `request_preview_frame`, which itself de-duplicates
// against the last request so this module never needs its own cache.

use egui::{Color32, Pos2, Rect, RichText, Sense, Stroke, Ui};

use scrubdeck_core::commands::EditorCommand;

use crate::context::AppContext;
use crate::modules::{EditorModule, ThumbnailCache};
use crate::project::Project;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER};

const DEFAULT_RATIO: f32 = 16.0 / 9.0;

pub struct PreviewModule;

impl EditorModule for PreviewModule {
    fn name(&self) -> &str {
        "Preview"
    }

    fn ui(&mut self, ui: &mut Ui, project: &mut Project, ctx: &mut AppContext, _thumb_cache: &mut ThumbnailCache, cmd: &mut Vec<EditorCommand>) {
        let timeline = project.timeline().ok();
        if let Some(timeline) = &timeline {
            ctx.request_preview_frame(timeline, project.review.playhead);
        }

        ui.vertical(|ui| {
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(egui::Margin { left: 8, right: 8, top: 5, bottom: 5 })
                .show(ui, |ui| {
                    ui.label(RichText::new("📺 Monitor").size(12.0).strong());
                });

            ui.add_space(4.0);

            let ratio = DEFAULT_RATIO;
            let panel_w = ui.available_width();
            let controls_h = 48.0;
            let panel_h = (ui.available_height() - controls_h - 8.0).max(80.0);

            let (canvas_w, canvas_h) = {
                let w = panel_w;
                let h = w / ratio;
                if h <= panel_h { (w, h) } else { (panel_h * ratio, panel_h) }
            };

            let (outer_rect, _) = ui.allocate_exact_size(egui::vec2(panel_w, canvas_h), Sense::hover());
            let rect = egui::Rect::from_center_size(outer_rect.center(), egui::vec2(canvas_w, canvas_h));
            let painter = ui.painter();

            if project.review.is_playing {
                painter.rect_stroke(rect.expand(2.0), 4, Stroke::new(1.5, ACCENT.gamma_multiply(0.6)), egui::StrokeKind::Outside);
            } else {
                painter.rect_stroke(rect.expand(1.0), 4, Stroke::new(1.0, DARK_BORDER), egui::StrokeKind::Outside);
            }
            painter.rect_filled(rect, 3.0, Color32::BLACK);

            if let Some(tex) = &ctx.preview_texture {
                painter.image(tex.id(), rect, Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)), Color32::WHITE);
                if project.review.is_playing {
                    let bp = Pos2::new(rect.max.x - 42.0, rect.min.y + 6.0);
                    painter.rect_filled(Rect::from_min_size(bp, egui::vec2(38.0, 15.0)), 3.0, Color32::from_rgb(200, 30, 30));
                    painter.text(bp + egui::vec2(19.0, 7.5), egui::Align2::CENTER_CENTER, "● LIVE", egui::FontId::monospace(8.0), Color32::WHITE);
                }
            } else {
                painter.text(rect.center(), egui::Align2::CENTER_CENTER, "NO SIGNAL", egui::FontId::monospace(16.0), Color32::from_gray(48));
                let mut y = rect.min.y;
                while y < rect.max.y {
                    painter.line_segment([Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)], Stroke::new(0.5, Color32::from_rgba_unmultiplied(255, 255, 255, 3)));
                    y += 4.0;
                }
            }

            ui.add_space(6.0);

            let bar_w = 560.0_f32;
            let bar_h = 48.0_f32;
            let panel = ui.max_rect();
            let center_x = panel.center().x;
            let bar_rect = egui::Rect::from_center_size(egui::pos2(center_x, ui.cursor().top() + bar_h * 0.5), egui::vec2(bar_w, bar_h));
            ui.allocate_rect(bar_rect, egui::Sense::hover());

            let mut child = ui.new_child(egui::UiBuilder::new().max_rect(bar_rect).layout(egui::Layout::left_to_right(egui::Align::Center)));

            egui::Frame::new()
                .fill(DARK_BG_3)
                .stroke(Stroke::new(1.0, DARK_BORDER))
                .corner_radius(egui::CornerRadius::same(6))
                .inner_margin(egui::Margin::same(8))
                .show(&mut child, |ui| {
                    ui.set_width(bar_w - 16.0);
                    ui.horizontal(|ui| {
                        if ui.button(RichText::new("⏮").size(14.0)).clicked() {
                            cmd.push(EditorCommand::Stop);
                        }
                        let play_lbl = if project.review.is_playing {
                            RichText::new("⏸").size(18.0).color(ACCENT)
                        } else {
                            RichText::new("▶").size(18.0).color(ACCENT)
                        };
                        if ui.button(play_lbl).clicked() {
                            cmd.push(if project.review.is_playing { EditorCommand::Pause } else { EditorCommand::Play });
                        }
                        if ui.button(RichText::new("⏹").size(14.0)).clicked() {
                            cmd.push(EditorCommand::Stop);
                        }

                        ui.add_space(24.0);

                        let t = project.review.playhead.to_seconds();
                        let mins = (t / 60.0) as u32;
                        let secs = (t % 60.0) as u32;
                        let frames = ((t * project.rate) as u32) % project.rate.max(1.0) as u32;
                        ui.label(RichText::new(format!("{mins:02}:{secs:02}:{frames:02}")).monospace().size(12.0).color(ACCENT));

                        ui.add_space(24.0);

                        let total = timeline.as_ref().map(|t| t.total_duration().to_seconds()).unwrap_or(0.0).max(1.0);
                        let progress = (t / total).clamp(0.0, 1.0) as f32;
                        ui.add(egui::ProgressBar::new(progress).desired_width(280.0).fill(ACCENT));

                        ui.add_space(24.0);

                        let mute_label = if project.review.muted { "🔇" } else if project.review.volume > 0.5 { "🔊" } else { "🔉" };
                        let mute_btn = egui::Button::new(RichText::new(mute_label).size(14.0).color(if project.review.muted { DARK_BORDER } else { ACCENT })).frame(false);
                        if ui.add(mute_btn).on_hover_text("Toggle mute").clicked() {
                            cmd.push(EditorCommand::ToggleMute);
                        }

                        let mut vol = project.review.volume;
                        ui.add_enabled_ui(!project.review.muted, |ui| {
                            let changed = ui.add_sized([90.0, 16.0], egui::Slider::new(&mut vol, 0.0..=1.0).show_value(false).trailing_fill(true))
                                .on_hover_text(format!("Volume: {}%", (project.review.volume * 100.0) as u32))
                                .changed();
                            if changed {
                                cmd.push(EditorCommand::SetVolume(vol));
                            }
                        });
                    });
                });
        });
    }
}
