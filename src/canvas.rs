//! Rendering and pointer interaction for the arrangement board.
//!
//! The board owns the state; this view only translates between screen and canvas space,
//! paints nodes in render order, and turns pointer input into board operations.

use crate::board::{Board, CategoryNode, Entity, ModNode, NodeId};
use crate::constants::{
    CANVAS_PADDING, CATEGORY_CORNER_RADIUS, CATEGORY_FILL_ALPHA, COLOR_CANVAS_BG,
    COLOR_DROP_TARGET, COLOR_MOD_FILL, COLOR_MOD_STROKE, LABEL_INSET, MOD_CORNER_RADIUS,
    RESIZE_HANDLE_SIZE,
};
use crate::payload::{DraggedMod, ModPayload};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use egui::{pos2, vec2};

/// Requests the canvas cannot fulfil on its own because they need a dialog.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasAction {
    CreateCategoryAt(Pos2),
    EditCategory(NodeId),
    Status(String),
}

/// Board mutations collected while iterating, applied once painting is done.
enum Pending {
    Raise(NodeId),
    Drag(Entity, Vec2),
    Resize(NodeId, Vec2),
    DeleteCategory(NodeId),
    RemoveMod(NodeId),
}

#[derive(Default)]
pub struct CanvasView {
    drop_target: Option<NodeId>,
    /// Canvas-space point where the background context menu was opened.
    menu_origin: Pos2,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, board: &mut Board) -> Vec<CanvasAction> {
        let mut actions = Vec::new();

        egui::ScrollArea::both()
            .id_salt("arrangement_canvas")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // MMB panning works over nodes too.
                if ui.input(|i| i.pointer.button_down(egui::PointerButton::Middle)) {
                    let delta = ui.input(|i| i.pointer.delta());
                    ui.scroll_with_delta(delta);
                }

                let extent = content_extent(board) + Vec2::splat(CANVAS_PADDING);
                let size = vec2(
                    extent.x.max(ui.available_width()),
                    extent.y.max(ui.available_height()),
                );
                let (canvas_rect, canvas_response) = ui.allocate_exact_size(size, Sense::click());
                let origin = canvas_rect.min.to_vec2();
                let painter = ui.painter_at(canvas_rect);
                painter.rect_filled(canvas_rect, 0.0, COLOR_CANVAS_BG);
                if board.is_empty() {
                    painter.text(
                        canvas_rect.center(),
                        Align2::CENTER_CENTER,
                        "Right-click to create a category, or drag a search result here",
                        FontId::proportional(14.0),
                        Color32::from_gray(110),
                    );
                }

                let mut pending = Vec::new();

                if canvas_response.secondary_clicked() {
                    if let Some(pointer) = canvas_response.interact_pointer_pos() {
                        self.menu_origin = pointer - origin;
                    }
                }
                let menu_origin = self.menu_origin;
                canvas_response.context_menu(|ui| {
                    if ui.button("Create category here").clicked() {
                        actions.push(CanvasAction::CreateCategoryAt(menu_origin));
                        ui.close_menu();
                    }
                });

                self.drop_target = canvas_response
                    .dnd_hover_payload::<DraggedMod>()
                    .and_then(|_| ui.input(|i| i.pointer.hover_pos()))
                    .and_then(|p| board.containing_category(p - origin));

                for category in board.categories() {
                    self.show_category(
                        ui,
                        &painter,
                        origin,
                        category,
                        &mut pending,
                        &mut actions,
                    );
                }
                for node in board.floating_mods() {
                    let rect = node.local_rect().translate(origin);
                    show_mod(ui, &painter, rect, node, None, &mut pending);
                }

                if let Some(dragged) = canvas_response.dnd_release_payload::<DraggedMod>() {
                    if let Some(pointer) = ui.input(|i| i.pointer.interact_pos()) {
                        match ModPayload::decode(&dragged.0) {
                            Ok(payload) => {
                                let title = payload.title.clone();
                                board.insert_mod(payload, pointer - origin);
                                actions.push(CanvasAction::Status(format!("Added {title}")));
                            }
                            Err(err) => {
                                log::warn!("Ignoring dropped payload: {err}");
                            }
                        }
                    }
                    self.drop_target = None;
                }

                apply_pending(board, pending);
            });

        actions
    }

    fn show_category(
        &self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        origin: Vec2,
        category: &CategoryNode,
        pending: &mut Vec<Pending>,
        actions: &mut Vec<CanvasAction>,
    ) {
        let rect = category.rect().translate(origin);
        let response = ui.interact(
            rect,
            ui.id().with(("category", category.id)),
            Sense::click_and_drag(),
        );

        if response.drag_started_by(egui::PointerButton::Primary) || response.clicked() {
            pending.push(Pending::Raise(category.id));
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            pending.push(Pending::Drag(
                Entity::Category(category.id),
                response.drag_delta(),
            ));
        }
        response.context_menu(|ui| {
            if ui.button("Edit…").clicked() {
                actions.push(CanvasAction::EditCategory(category.id));
                ui.close_menu();
            }
            if ui.button("Delete").clicked() {
                pending.push(Pending::DeleteCategory(category.id));
                ui.close_menu();
            }
        });

        let fill = Color32::from_rgba_unmultiplied(
            category.color.r(),
            category.color.g(),
            category.color.b(),
            CATEGORY_FILL_ALPHA,
        );
        let outline = if self.drop_target == Some(category.id) {
            Stroke::new(2.0, COLOR_DROP_TARGET)
        } else {
            Stroke::new(1.0, category.color)
        };
        painter.rect(rect, CATEGORY_CORNER_RADIUS, fill, outline);
        painter.with_clip_rect(rect).text(
            rect.min + Vec2::splat(LABEL_INSET),
            Align2::LEFT_TOP,
            &category.name,
            FontId::proportional(14.0),
            Color32::WHITE,
        );

        for node in &category.mods {
            let rect = category.mod_rect(node).translate(origin);
            show_mod(ui, painter, rect, node, Some(category), pending);
        }

        let handle_rect = Rect::from_min_max(rect.max - Vec2::splat(RESIZE_HANDLE_SIZE), rect.max);
        let handle = ui
            .interact(
                handle_rect,
                ui.id().with(("resize", category.id)),
                Sense::drag(),
            )
            .on_hover_cursor(egui::CursorIcon::ResizeNwSe);
        if handle.dragged_by(egui::PointerButton::Primary) {
            pending.push(Pending::Resize(
                category.id,
                category.size + handle.drag_delta(),
            ));
        }
        let grip = if handle.hovered() || handle.dragged() {
            Color32::WHITE
        } else {
            Color32::from_white_alpha(120)
        };
        painter.line_segment(
            [
                pos2(handle_rect.min.x, handle_rect.max.y),
                pos2(handle_rect.max.x, handle_rect.min.y),
            ],
            Stroke::new(1.5, grip),
        );
    }
}

fn show_mod(
    ui: &mut egui::Ui,
    painter: &egui::Painter,
    rect: Rect,
    node: &ModNode,
    owner: Option<&CategoryNode>,
    pending: &mut Vec<Pending>,
) {
    let response = ui
        .interact(rect, ui.id().with(("mod", node.id)), Sense::click_and_drag())
        .on_hover_text(mod_tooltip(node));

    if let Some(owner) = owner {
        if response.drag_started_by(egui::PointerButton::Primary) {
            pending.push(Pending::Raise(owner.id));
        }
    }
    if response.dragged_by(egui::PointerButton::Primary) {
        pending.push(Pending::Drag(Entity::Mod(node.id), response.drag_delta()));
    }
    response.context_menu(|ui| {
        if ui.button("Open in browser").clicked() {
            ui.ctx()
                .open_url(egui::OpenUrl::new_tab(node.record.url.clone()));
            ui.close_menu();
        }
        if ui.button("Remove").clicked() {
            pending.push(Pending::RemoveMod(node.id));
            ui.close_menu();
        }
    });

    painter.rect(
        rect,
        MOD_CORNER_RADIUS,
        COLOR_MOD_FILL,
        Stroke::new(1.0, COLOR_MOD_STROKE),
    );
    painter.with_clip_rect(rect.shrink(1.0)).text(
        rect.min + Vec2::splat(LABEL_INSET),
        Align2::LEFT_TOP,
        &node.record.title,
        FontId::proportional(13.0),
        Color32::WHITE,
    );
}

fn mod_tooltip(node: &ModNode) -> String {
    let record = &node.record;
    let mut text = format!("{} ({})", record.title, record.version);
    if !record.author.is_empty() {
        text.push_str(&format!("\nby {}", record.author));
    }
    if !record.description.is_empty() {
        text.push_str(&format!("\n\n{}", record.description));
    }
    text
}

fn apply_pending(board: &mut Board, pending: Vec<Pending>) {
    for action in pending {
        match action {
            Pending::Raise(id) => board.bring_to_front(id),
            Pending::Drag(entity, delta) => {
                if let Some(current) = board.entity_position(entity) {
                    board.move_entity(entity, current + delta);
                }
            }
            Pending::Resize(id, size) => {
                board.resize_category(id, size);
            }
            Pending::DeleteCategory(id) => {
                board.delete_category(id);
            }
            Pending::RemoveMod(id) => {
                board.remove_mod(id);
            }
        }
    }
}

/// Bottom-right corner of everything on the board, in canvas space.
fn content_extent(board: &Board) -> Vec2 {
    let categories = board.categories().iter().flat_map(|c| {
        std::iter::once(c.rect().max).chain(c.mods.iter().map(|m| c.mod_rect(m).max))
    });
    let floating = board.floating_mods().iter().map(|m| m.local_rect().max);
    categories
        .chain(floating)
        .fold(Vec2::ZERO, |acc, p| vec2(acc.x.max(p.x), acc.y.max(p.y)))
}
