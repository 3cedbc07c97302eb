// crates/scrubdeck-ui/src/modules/timeline.rs
//
// Timeline ribbon. Grounded on the teacher's `modules/timeline.rs`: same
// toolbar-then-ruler-then-lanes layout, same trim-handle-at-each-edge
// idiom on every clip, same playhead line with a draggable ruler. The
// interaction model is different — the teacher mutated `TimelineClip.
// start_time`/`duration` fields directly; this widget only ever calls
// `EditEngine::begin_drag` / `drag_preview` / `update_drop_targets` /
// `end_drag` / `cancel_drag`, turning their `TimeRange` previews into pixel
// geometry via `RibbonScale`.

use egui::{Color32, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use scrubdeck_core::cache_entry::TriangleMesh2;
use scrubdeck_core::commands::EditorCommand;
use scrubdeck_core::edit_engine::{DragAnchor, DragSide, EditMode};
use scrubdeck_core::ids::{ItemId, TrackId};
use scrubdeck_core::time::RationalTime;
use scrubdeck_core::timeline::{Timeline, TrackEntry, TrackKind};

use crate::context::AppContext;
use crate::modules::{EditorModule, ThumbnailCache};
use crate::project::Project;
use crate::theme;

const TRACK_HEIGHT: f32 = 64.0;
const RULER_HEIGHT: f32 = 24.0;
const TRIM_HANDLE_PX: f32 = 7.0;

#[derive(Default)]
pub struct TimelineModule {
    dragging: Option<ItemId>,
    last_scrub_time: Option<f64>,
}

impl TimelineModule {
    fn draw_toolbar(&mut self, ui: &mut Ui, project: &Project, cmd: &mut Vec<EditorCommand>) {
        ui.horizontal(|ui| {
            if ui.button(if project.review.is_playing { "⏸" } else { "▶" }).clicked() {
                cmd.push(if project.review.is_playing { EditorCommand::Pause } else { EditorCommand::Play });
            }
            if ui.button("⏹").clicked() {
                cmd.push(EditorCommand::Stop);
            }
            ui.separator();

            for (mode, label) in [
                (EditMode::Select, "Select"),
                (EditMode::Move, "Move"),
                (EditMode::Trim, "Trim"),
                (EditMode::Ripple, "Ripple"),
                (EditMode::Roll, "Roll"),
                (EditMode::Slip, "Slip"),
                (EditMode::Slide, "Slide"),
                (EditMode::Slice, "Slice"),
                (EditMode::Fill, "Fill"),
                (EditMode::Insert, "Insert"),
                (EditMode::Overwrite, "Overwrite"),
            ] {
                let selected = project.engine.mode == mode;
                if ui.selectable_label(selected, label).clicked() {
                    cmd.push(EditorCommand::SetEditMode(mode));
                }
            }

            ui.separator();
            if ui.button("Undo").clicked() {
                cmd.push(EditorCommand::Undo);
            }
            if ui.button("Redo").clicked() {
                cmd.push(EditorCommand::Redo);
            }
            ui.separator();
            ui.label(format!("{:.2}s", project.review.playhead.to_seconds()));
        });
    }

    fn draw_ruler(&mut self, ui: &mut Ui, rect: Rect, scale: &egui_scale::Scale, rate: f64, cmd: &mut Vec<EditorCommand>) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, theme::DARK_BG_1);

        let response = ui.interact(rect, ui.id().with("ruler"), Sense::click_and_drag());
        if response.dragged() || response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let t = scale.pos_to_time(pos.x, rate);
                let secs = t.to_seconds();
                if self.last_scrub_time != Some(secs) {
                    self.last_scrub_time = Some(secs);
                    cmd.push(EditorCommand::SetPlayhead(t));
                }
            }
        }
    }

    /// Drives the shared `EditEngine` for one clip's body/edges. Returns
    /// `true` once a gesture completes (either committed or cancelled) so
    /// the caller can clear `self.dragging`.
    fn handle_clip_drag(
        &mut self,
        ui: &mut Ui,
        project: &mut Project,
        timeline: &Timeline,
        item_id: ItemId,
        track_id: TrackId,
        start: RationalTime,
        duration: RationalTime,
        body: &egui::Response,
        left: &egui::Response,
        right: &egui::Response,
        rate: f64,
    ) {
        let press_range = scrubdeck_core::time::TimeRange::new(start, duration);

        let start_side = if left.drag_started() {
            Some(DragSide::Left)
        } else if right.drag_started() {
            Some(DragSide::Right)
        } else if body.drag_started() {
            Some(DragSide::Body)
        } else {
            None
        };

        if let Some(side) = start_side {
            if let Some(pos) = ui.ctx().pointer_interact_pos() {
                project.engine.begin_drag(DragAnchor { item: item_id, track: track_id, press_pos: pos.x as i64, press_range, side });
                self.dragging = Some(item_id);
            }
        }

        if self.dragging != Some(item_id) {
            return;
        }

        let pointer = ui.ctx().pointer_hover_pos().or_else(|| body.interact_pointer_pos());
        if let Some(pos) = pointer {
            let _ = project.engine.drag_preview(timeline, pos.x as i64, rate);
            if matches!(project.engine.mode, EditMode::Move | EditMode::Fill | EditMode::Insert | EditMode::Overwrite) {
                project.engine.update_drop_targets(timeline, pos.x as i64, rate);
            }
        }

        let released = body.drag_stopped() || left.drag_stopped() || right.drag_stopped();
        if released {
            self.dragging = None;
            let result = project.engine.end_drag(timeline, project.mutator_mut());
            if !matches!(result, Ok(None)) {
                // Mutation already lives in the mutator's document; the
                // widget just needs to stop treating this item as dragging.
            }
        } else if ui.input(|i| i.pointer.button_released(egui::PointerButton::Secondary)) {
            project.engine.cancel_drag();
            self.dragging = None;
        }
    }

    fn draw_track(
        &mut self,
        ui: &mut Ui,
        rect: Rect,
        track_id: TrackId,
        timeline: &Timeline,
        project: &mut Project,
        ctx: &mut AppContext,
        thumb_cache: &ThumbnailCache,
        scale: &egui_scale::Scale,
        rate: f64,
        cmd: &mut Vec<EditorCommand>,
    ) {
        let Some(track) = timeline.track(track_id) else { return };
        let painter = ui.painter_at(rect);
        let lane_color = match track.kind {
            TrackKind::Video => theme::DARK_BG_2,
            TrackKind::Audio => theme::DARK_BG_3,
        };
        painter.rect_filled(rect, 2.0, lane_color);

        for entry in &track.entries {
            let TrackEntry::Item(item) = entry else { continue };
            if item.is_gap() {
                continue;
            }

            let x0 = scale.time_to_pos(item.parent_range.start_time) as f32;
            let x1 = scale.time_to_pos(item.parent_range.end_time_exclusive()) as f32;
            let clip_rect = Rect::from_min_max(Pos2::new(x0, rect.top() + 2.0), Pos2::new(x1, rect.bottom() - 2.0));
            if !ui.is_rect_visible(clip_rect) {
                continue;
            }

            let selected = project.review.selected_item == Some(item.id);
            let fill = match (track.kind, selected) {
                (_, true) => theme::CLIP_SELECTED,
                (TrackKind::Video, false) => theme::CLIP_VIDEO,
                (TrackKind::Audio, false) => theme::CLIP_AUDIO,
            };
            painter.rect_filled(clip_rect, 3.0, fill);
            painter.rect_stroke(clip_rect, 3.0, Stroke::new(1.0, theme::DARK_BORDER));

            if let Some(media) = &item.media {
                if track.kind == TrackKind::Audio {
                    if let Some(mesh) = ctx.waveform_cache.get(&item.id) {
                        draw_waveform(&painter, clip_rect, mesh);
                    } else {
                        let size = (clip_rect.width().round().max(1.0) as u32, clip_rect.height().round().max(1.0) as u32);
                        ctx.request_waveform(item.id, &media.path, size, item.trimmed_range);
                    }
                } else if let Some(tex) = thumb_cache.get(&item.id) {
                    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                    painter.image(tex.id(), clip_rect, uv, Color32::WHITE);
                } else {
                    ctx.request_thumbnail(item.id, &media.path, TRACK_HEIGHT as u32, item.trimmed_range.start_time);
                }
            }

            let name = item
                .media
                .as_ref()
                .map(|m| m.path.to_string())
                .unwrap_or_else(|| format!("clip {}", item.id.0));
            painter.text(
                clip_rect.left_top() + Vec2::new(4.0, 2.0),
                egui::Align2::LEFT_TOP,
                crate::helpers::format::truncate(&name, 28),
                egui::FontId::proportional(11.0),
                theme::DARK_TEXT,
            );

            let body = ui.interact(clip_rect, ui.id().with(("clip", item.id.0)), Sense::click_and_drag());
            let left_rect = Rect::from_min_max(clip_rect.left_top(), Pos2::new(clip_rect.left() + TRIM_HANDLE_PX, clip_rect.bottom()));
            let right_rect = Rect::from_min_max(Pos2::new(clip_rect.right() - TRIM_HANDLE_PX, clip_rect.top()), clip_rect.right_bottom());
            let left = ui.interact(left_rect, ui.id().with(("trim-l", item.id.0)), Sense::drag());
            let right = ui.interact(right_rect, ui.id().with(("trim-r", item.id.0)), Sense::drag());

            if body.clicked() {
                cmd.push(EditorCommand::SelectTimelineItem(Some(item.id)));
            }

            let start = item.trimmed_range.start_time;
            let duration = item.trimmed_range.duration;
            self.handle_clip_drag(ui, project, timeline, item.id, track_id, start, duration, &body, &left, &right, rate);
        }
    }
}

/// Renders a waveform mesh's per-column quads as vertical segments within
/// `clip_rect`. The mesh's `y_top`/`y_bottom` are already pixel-space
/// offsets (§4.D) measured against the height it was built at, so each
/// column just needs to shift into the clip rect's own origin.
fn draw_waveform(painter: &egui::Painter, clip_rect: Rect, mesh: &TriangleMesh2) {
    for quad in &mesh.quads {
        let x = clip_rect.left() + quad.x as f32;
        if x > clip_rect.right() {
            break;
        }
        let y_top = clip_rect.top() + quad.y_top;
        let y_bottom = clip_rect.top() + quad.y_bottom;
        painter.line_segment([Pos2::new(x, y_top), Pos2::new(x, y_bottom)], Stroke::new(1.0, theme::ACCENT.gamma_multiply(0.7)));
    }
}

mod egui_scale {
    use scrubdeck_core::time::RationalTime;

    /// Pixel/time mapping for the ribbon — a thin local wrapper over the
    /// same `trackOrigin + (t - trackStart) * pxPerSecond` formula
    /// `RibbonScale` uses, kept separate since the widget's origin tracks
    /// scroll position, not the engine's anchor geometry.
    pub struct Scale {
        pub origin_px: f64,
        pub px_per_second: f64,
    }

    impl Scale {
        pub fn time_to_pos(&self, t: RationalTime) -> i64 {
            (self.origin_px + t.to_seconds() * self.px_per_second).round() as i64
        }

        pub fn pos_to_time(&self, x: f32, rate: f64) -> RationalTime {
            let secs = (x as f64 - self.origin_px) / self.px_per_second;
            RationalTime::from_seconds(secs, rate)
        }
    }
}

impl EditorModule for TimelineModule {
    fn name(&self) -> &str {
        "Timeline"
    }

    fn ui(&mut self, ui: &mut Ui, project: &mut Project, ctx: &mut AppContext, thumb_cache: &mut ThumbnailCache, cmd: &mut Vec<EditorCommand>) {
        let Ok(timeline) = project.timeline() else {
            ui.label("timeline failed to load");
            return;
        };

        self.draw_toolbar(ui, project, cmd);
        ui.separator();

        let available = ui.available_rect_before_wrap();
        let scale = egui_scale::Scale { origin_px: available.left() as f64, px_per_second: 48.0 * project.review.timeline_zoom as f64 };
        let rate = project.rate;

        let ruler_rect = Rect::from_min_size(available.left_top(), Vec2::new(available.width(), RULER_HEIGHT));
        self.draw_ruler(ui, ruler_rect, &scale, rate, cmd);

        let mut y = ruler_rect.bottom();
        let track_ids: Vec<TrackId> = timeline.track_ids().collect();
        for track_id in track_ids {
            let track_rect = Rect::from_min_size(Pos2::new(available.left(), y), Vec2::new(available.width(), TRACK_HEIGHT));
            self.draw_track(ui, track_rect, track_id, &timeline, project, ctx, thumb_cache, &scale, rate, cmd);
            y += TRACK_HEIGHT + 2.0;
        }
        ui.allocate_rect(Rect::from_min_max(available.left_top(), Pos2::new(available.right(), y)), Sense::hover());

        let playhead_x = scale.time_to_pos(project.review.playhead) as f32;
        let painter = ui.painter();
        painter.line_segment(
            [Pos2::new(playhead_x, ruler_rect.top()), Pos2::new(playhead_x, y)],
            Stroke::new(2.0, theme::ACCENT),
        );
    }
}
