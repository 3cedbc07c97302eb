// crates/scrubdeck-ui/src/modules/library.rs
//
// Media bin panel — thumbnail grid with multi-select and drag-to-timeline.
// Grounded on the teacher's `modules/library.rs`: same selection model,
// same manual row-chunked grid inside a `ScrollArea`, same card/context
// menu/drag-ghost painters. Rewired from the teacher's Uuid-keyed
// `velocut_core::state::LibraryClip` to this app's path-keyed
// `Project::library: Vec<LibraryClip>` — a clip's identity is its
// `PathBuf`, probed info lives in `ctx.library_info`, and thumbnails are
// fetched on demand through `ctx.request_thumbnail` the same way timeline
// clips are, keyed by a synthetic `ItemId` minted once per path.
//
// Selection model:
//   • Plain click      → single-select (clears multi-select)
//   • Ctrl+click       → toggle clip in multi-select set
//   • Shift+click      → range-select from last single-selected to clicked
//   • Delete/Backspace → delete all selected (multi or single)
//   • Bg click         → clear all selection

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use egui::{Align, Color32, Id, LayerId, Layout, Order, RichText, Sense, Stroke, Ui};
use rfd::FileDialog;

use scrubdeck_core::commands::EditorCommand;
use scrubdeck_core::helpers::time::format_duration;
use scrubdeck_core::ids::ItemId;
use scrubdeck_core::io_info::IOInfo;
use scrubdeck_core::path::MediaPath;
use scrubdeck_core::time::{RationalTime, TimeRange};
use scrubdeck_core::timeline::MediaReference;

use crate::context::AppContext;
use crate::helpers::format::truncate;
use crate::modules::{EditorModule, ThumbnailCache};
use crate::project::Project;
use crate::theme::{ACCENT, DARK_BG_0, DARK_BG_2, DARK_BG_3, DARK_BG_4, DARK_BORDER, DARK_TEXT, DARK_TEXT_DIM};

const CARD_W: f32 = 96.0;
const CARD_H: f32 = 94.0;
const THUMB_W: f32 = 86.0;
const THUMB_H: f32 = 48.0;
const CARD_GAP: f32 = 6.0;
const CARD_PAD: f32 = 8.0;

const SEL_MULTI: Color32 = Color32::from_rgb(255, 160, 50);
const SEL_CHECK: Color32 = Color32::from_rgb(255, 200, 80);

pub struct LibraryModule {
    pub multi_selection: HashSet<PathBuf>,
    /// Stable per-path ids so the shared `ThumbnailCache`/`request_thumbnail`
    /// machinery — keyed on `ItemId`, since it exists to serve timeline
    /// clips — can serve library cards too without a second cache type.
    card_ids: HashMap<PathBuf, ItemId>,
}

impl LibraryModule {
    pub fn new() -> Self {
        Self { multi_selection: HashSet::new(), card_ids: HashMap::new() }
    }

    fn card_id(&mut self, path: &Path) -> ItemId {
        *self.card_ids.entry(path.to_path_buf()).or_insert_with(ItemId::next)
    }

    fn clear_selection(&mut self, cmd: &mut Vec<EditorCommand>) {
        self.multi_selection.clear();
        cmd.push(EditorCommand::SelectLibraryClip(None));
        cmd.push(EditorCommand::SelectTimelineItem(None));
    }
}

impl Default for LibraryModule {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorModule for LibraryModule {
    fn name(&self) -> &str {
        "Media Library"
    }

    fn ui(&mut self, ui: &mut Ui, project: &mut Project, ctx: &mut AppContext, thumb_cache: &mut ThumbnailCache, cmd: &mut Vec<EditorCommand>) {
        let ctrl = ui.input(|i| i.modifiers.ctrl || i.modifiers.mac_cmd);
        let shift = ui.input(|i| i.modifiers.shift);
        let selected_path = project.review.selected_library_clip.clone();

        if ui.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
            if !self.multi_selection.is_empty() {
                for path in self.multi_selection.drain() {
                    cmd.push(EditorCommand::DeleteLibraryClip(path));
                }
                cmd.push(EditorCommand::SelectLibraryClip(None));
            } else if let Some(path) = &selected_path {
                cmd.push(EditorCommand::DeleteLibraryClip(path.clone()));
            }
        }

        if ctrl && ui.input(|i| i.key_pressed(egui::Key::A)) {
            for clip in &project.library {
                self.multi_selection.insert(clip.path.clone());
            }
            if let Some(last) = project.library.last() {
                cmd.push(EditorCommand::SelectLibraryClip(Some(last.path.clone())));
            }
        }

        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.clear_selection(cmd);
        }

        let usable_w = (ui.available_width() - CARD_PAD * 2.0).max(CARD_W);
        let cols = (((usable_w + CARD_GAP) / (CARD_W + CARD_GAP)).floor() as usize).max(1);

        ui.vertical(|ui| {
            header_bar(ui, ctx);
            status_strip(ui, project.library.len(), &selected_path, &self.multi_selection);
            ui.add_space(1.0);

            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                let bg = ui.interact(ui.available_rect_before_wrap(), Id::new("library_bg"), Sense::click());
                if bg.clicked() && !ctrl {
                    self.clear_selection(cmd);
                }

                if project.library.is_empty() {
                    empty_state(ui);
                    return;
                }

                ui.add_space(CARD_PAD);

                let paths: Vec<PathBuf> = project.library.iter().map(|c| c.path.clone()).collect();
                let anchor_idx = selected_path.as_ref().and_then(|a| paths.iter().position(|p| p == a));

                let mut to_delete: Vec<PathBuf> = Vec::new();
                let mut new_single: Option<PathBuf> = None;
                let mut toggle_path: Option<PathBuf> = None;
                let mut range_to_idx: Option<usize> = None;
                let mut drag_started_path: Option<PathBuf> = None;
                let mut add_to_timeline: Option<PathBuf> = None;

                for row in paths.chunks(cols) {
                    ui.horizontal(|ui| {
                        ui.add_space(CARD_PAD);
                        for path in row {
                            let item_id = Id::new("lib_clip").with(path);
                            let in_multi = self.multi_selection.contains(path);
                            let is_anchor = selected_path.as_deref() == Some(path.as_path());
                            let is_selected = in_multi || is_anchor;
                            let is_dragging = ui.ctx().is_being_dragged(item_id);
                            let card_id = self.card_id(path);
                            let info = ctx.library_info.get(path).cloned();

                            if is_dragging {
                                paint_drag_ghost(ui, card_id, path, thumb_cache);
                                ui.memory_mut(|m| m.data.insert_temp(Id::new("DND_PAYLOAD"), card_id));
                            }

                            let card_resp = paint_card(ui, path, card_id, info.as_deref(), is_selected, in_multi, thumb_cache);

                            let interact = ui.interact(card_resp.rect, item_id, Sense::click_and_drag());

                            if interact.clicked() {
                                if shift {
                                    if let Some(to) = paths.iter().position(|p| p == path) {
                                        range_to_idx = Some(to);
                                    }
                                } else if ctrl {
                                    toggle_path = Some(path.clone());
                                } else {
                                    new_single = Some(path.clone());
                                }
                            }

                            if interact.double_clicked() {
                                add_to_timeline = Some(path.clone());
                            }

                            if interact.drag_started() {
                                drag_started_path = Some(path.clone());
                            }

                            ui.ctx().set_cursor_icon(if interact.dragged() {
                                egui::CursorIcon::Grabbing
                            } else if interact.hovered() {
                                egui::CursorIcon::Grab
                            } else {
                                egui::CursorIcon::Default
                            });

                            interact.context_menu(|ui| {
                                context_menu(ui, path, info.as_deref(), is_selected, &self.multi_selection, &mut to_delete, &mut add_to_timeline);
                            });

                            ui.add_space(CARD_GAP);
                        }
                    });
                    ui.add_space(CARD_GAP);
                }

                if let Some(path) = drag_started_path {
                    cmd.push(EditorCommand::SelectLibraryClip(Some(path.clone())));
                    ui.memory_mut(|m| m.data.insert_temp(Id::new("DND_PAYLOAD"), self.card_id(&path)));
                }

                if let Some(path) = toggle_path {
                    if self.multi_selection.contains(&path) {
                        self.multi_selection.remove(&path);
                        if selected_path.as_ref() == Some(&path) {
                            let next = self.multi_selection.iter().next().cloned();
                            cmd.push(EditorCommand::SelectLibraryClip(next));
                        }
                    } else {
                        self.multi_selection.insert(path.clone());
                        cmd.push(EditorCommand::SelectLibraryClip(Some(path)));
                    }
                } else if let Some(to) = range_to_idx {
                    if let Some(from) = anchor_idx {
                        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
                        for range_path in &paths[lo..=hi] {
                            self.multi_selection.insert(range_path.clone());
                        }
                        cmd.push(EditorCommand::SelectLibraryClip(Some(paths[to].clone())));
                    }
                } else if let Some(path) = new_single {
                    self.multi_selection.clear();
                    cmd.push(EditorCommand::SelectLibraryClip(Some(path)));
                    cmd.push(EditorCommand::SelectTimelineItem(None));
                }

                for path in &to_delete {
                    self.multi_selection.remove(path);
                    cmd.push(EditorCommand::DeleteLibraryClip(path.clone()));
                }
                if !to_delete.is_empty() {
                    cmd.push(EditorCommand::SelectLibraryClip(None));
                }

                if let Some(path) = add_to_timeline {
                    if let Some(info) = ctx.library_info.get(&path) {
                        append_to_timeline(project, &path, info);
                    }
                }

                ui.add_space(CARD_PAD);
            });
        });
    }
}

/// "Add to Timeline" bypasses the command queue the same way a drag-drop
/// gesture's landing spot would (§ structural inserts, not drag edits):
/// no `EditorCommand` variant exists for it, so the module calls
/// `Project::append_library_clip` directly — the one place in this UI a
/// module mutates the document outside of `process_command`.
fn append_to_timeline(project: &mut Project, path: &Path, info: &IOInfo) {
    let media_path = MediaPath::from_file(path);
    let available_range = info.available_range();
    let duration = available_range.map(|r| r.duration).unwrap_or_else(|| RationalTime::new(project.rate, project.rate));
    let media = MediaReference { path: media_path, available_range };
    project.append_library_clip(media, duration);
}

fn header_bar(ui: &mut Ui, ctx: &mut AppContext) {
    egui::Frame::new()
        .fill(DARK_BG_2)
        .inner_margin(egui::Margin { left: 10, right: 8, top: 7, bottom: 7 })
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("MEDIA BIN").size(10.0).strong().color(DARK_TEXT_DIM).extra_letter_spacing(1.5));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let btn = egui::Button::new(RichText::new("＋ Import").size(11.0)).corner_radius(egui::CornerRadius::same(4)).fill(DARK_BG_4);
                    if ui.add(btn).clicked() {
                        if let Some(paths) = FileDialog::new().add_filter("Media", &["mp4", "mov", "mkv", "avi", "mp3", "wav", "webm", "m4v"]).pick_files() {
                            for path in paths {
                                ctx.begin_import(path);
                            }
                        }
                    }
                });
            });
        });
}

fn status_strip(ui: &mut Ui, count: usize, selected: &Option<PathBuf>, multi: &HashSet<PathBuf>) {
    if count == 0 {
        return;
    }

    egui::Frame::new()
        .fill(DARK_BG_0)
        .inner_margin(egui::Margin { left: 10, right: 8, top: 3, bottom: 3 })
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("{count} clip{}", if count == 1 { "" } else { "s" })).size(10.0).color(DARK_TEXT_DIM));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if multi.len() > 1 {
                        ui.label(RichText::new(format!("{} selected  ⌫", multi.len())).size(9.5).color(ACCENT));
                    } else if !multi.is_empty() || selected.is_some() {
                        ui.label(RichText::new("⌫ delete  •  ⇧click range  •  ⌃click multi  •  dbl-click add").size(8.5).color(Color32::from_rgb(72, 72, 88)));
                    }
                });
            });
        });
}

fn paint_card(ui: &mut Ui, path: &Path, card_id: ItemId, info: Option<&IOInfo>, is_selected: bool, in_multi: bool, thumb_cache: &ThumbnailCache) -> egui::Response {
    let highlight = is_selected;
    let fill_col = if highlight { DARK_BG_4 } else { DARK_BG_3 };
    let border_col = if highlight { SEL_MULTI } else { DARK_BORDER };
    let border_w = if highlight { 1.5 } else { 1.0 };
    let name_col = if is_selected { DARK_TEXT } else { DARK_TEXT_DIM };
    let dur_col = if is_selected { ACCENT } else { Color32::from_rgb(130, 90, 35) };
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| path.to_string_lossy().to_string());

    let resp = egui::Frame::new()
        .fill(fill_col)
        .stroke(Stroke::new(border_w, border_col))
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::same(4))
        .show(ui, |ui| {
            ui.set_width(CARD_W - 8.0);
            ui.set_height(CARD_H - 8.0);
            ui.vertical_centered(|ui| {
                if let Some(tex) = thumb_cache.get(&card_id) {
                    ui.add(egui::Image::new((tex.id(), egui::vec2(THUMB_W, THUMB_H))).corner_radius(egui::CornerRadius::same(3)));
                } else {
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(THUMB_W, THUMB_H), Sense::hover());
                    ui.painter().rect_filled(rect, 3.0, Color32::from_rgb(14, 14, 20));
                    ui.painter().text(rect.center(), egui::Align2::CENTER_CENTER, clip_icon(info), egui::FontId::proportional(20.0), Color32::from_gray(50));
                }
                ui.add_space(4.0);
                ui.add(egui::Label::new(RichText::new(name.as_str()).size(10.0).color(name_col)).truncate());
                let dur = match info.and_then(|i| i.available_range()) {
                    Some(range) => format_duration(range.duration),
                    None => "⏳".into(),
                };
                ui.label(RichText::new(dur).size(9.0).monospace().color(dur_col));
            });
        })
        .response;

    if in_multi {
        let badge_size = 14.0_f32;
        let badge_rect = egui::Rect::from_min_size(egui::pos2(resp.rect.max.x - badge_size, resp.rect.min.y), egui::vec2(badge_size, badge_size));
        let p = ui.painter();
        p.rect_filled(badge_rect, egui::CornerRadius::same(3), ACCENT);
        p.text(badge_rect.center(), egui::Align2::CENTER_CENTER, "✓", egui::FontId::proportional(9.0), SEL_CHECK);
    }

    resp
}

fn context_menu(ui: &mut Ui, path: &Path, info: Option<&IOInfo>, is_sel: bool, multi: &HashSet<PathBuf>, to_delete: &mut Vec<PathBuf>, add_to_timeline: &mut Option<PathBuf>) {
    ui.set_min_width(160.0);

    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    ui.label(RichText::new(truncate(&name, 28)).size(10.5).color(DARK_TEXT));
    if let Some(range) = info.and_then(|i| i.available_range()) {
        ui.label(RichText::new(format_duration(range.duration)).size(10.0).color(DARK_TEXT_DIM));
    }
    if let Some(video) = info.and_then(|i| i.video.first()) {
        ui.label(RichText::new(format!("{} × {}", video.width, video.height)).size(9.5).color(DARK_TEXT_DIM));
    }

    ui.separator();

    if ui.button("⏵  Add to timeline").clicked() {
        *add_to_timeline = Some(path.to_path_buf());
        ui.close();
    }

    ui.separator();

    let multi_count = multi.len();
    if is_sel && multi_count > 1 {
        if ui.button(format!("🗑  Remove {multi_count} clips")).clicked() {
            to_delete.extend(multi.iter().cloned());
            ui.close();
        }
    }

    if ui.button("🗑  Remove from project").clicked() {
        to_delete.push(path.to_path_buf());
        ui.close();
    }
}

fn paint_drag_ghost(ui: &Ui, card_id: ItemId, path: &Path, thumb_cache: &ThumbnailCache) {
    let Some(ptr) = ui.ctx().pointer_interact_pos() else { return };
    let rect = egui::Rect::from_center_size(ptr, egui::vec2(CARD_W + 10.0, THUMB_H + 20.0));
    let layer = LayerId::new(Order::Tooltip, Id::new("drag_ghost"));
    let p = ui.ctx().layer_painter(layer);

    p.rect_filled(rect.translate(egui::vec2(3.0, 4.0)), egui::CornerRadius::same(6), Color32::from_black_alpha(80));
    p.rect_filled(rect, egui::CornerRadius::same(6), Color32::from_rgba_unmultiplied(34, 62, 120, 220));
    p.rect_stroke(rect, egui::CornerRadius::same(6), Stroke::new(1.5, ACCENT), egui::StrokeKind::Outside);

    let thumb_rect = rect.shrink2(egui::vec2(5.0, 3.0)).with_max_y(rect.max.y - 16.0);
    if let Some(tex) = thumb_cache.get(&card_id) {
        p.image(tex.id(), thumb_rect, egui::Rect::from_min_max(egui::Pos2::ZERO, egui::Pos2::new(1.0, 1.0)), Color32::from_rgba_unmultiplied(255, 255, 255, 210));
    } else {
        p.rect_filled(thumb_rect, 3.0, Color32::from_rgb(14, 14, 20));
        p.text(thumb_rect.center(), egui::Align2::CENTER_CENTER, "🎬", egui::FontId::proportional(18.0), Color32::WHITE);
    }
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    p.text(egui::pos2(rect.center().x, rect.max.y - 9.0), egui::Align2::CENTER_CENTER, truncate(&name, 18), egui::FontId::proportional(10.0), Color32::from_rgba_unmultiplied(210, 210, 225, 220));
}

fn empty_state(ui: &mut Ui) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("🎬").size(36.0));
        ui.add_space(8.0);
        ui.label(RichText::new("Drop files here").size(12.0).color(DARK_TEXT_DIM));
        ui.label(RichText::new("or click  ＋ Import  above").size(10.5).color(Color32::from_gray(62)));
        ui.add_space(16.0);
        ui.label(RichText::new("Supports MP4, MOV, MKV, AVI, MP3, WAV").size(9.0).color(Color32::from_gray(48)));
    });
}

fn clip_icon(info: Option<&IOInfo>) -> &'static str {
    match info {
        Some(info) if info.has_video() => "🎬",
        Some(_) => "🎵",
        None => "⏳",
    }
}
