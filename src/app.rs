use crate::board::{Board, NodeId};
use crate::canvas::{CanvasAction, CanvasView};
use crate::config::AppConfig;
use crate::constants::{
    COLOR_ERROR_TEXT, COLOR_TOOLBAR_BG, SEARCH_PANEL_WIDTH, TOOLBAR_BUTTON_SIZE,
    TOOLBAR_ICON_SIZE, TOOLBAR_START_SPACING,
};
use crate::model::default_category_color;
use crate::paths::AppPaths;
use crate::search_panel::SearchPanel;
use crate::storage::{self, StorageResult};
use eframe::egui::{self, Color32, Pos2, RichText, Vec2};
use std::path::{Path, PathBuf};

struct CategoryDialog {
    name: String,
    color: Color32,
    position: Option<Pos2>,
}

struct EditDialog {
    id: NodeId,
    name: String,
    color: Color32,
}

struct Status {
    text: String,
    is_error: bool,
}

pub struct ModpackDesignerApp {
    board: Board,
    canvas: CanvasView,
    search: SearchPanel,
    paths: Option<AppPaths>,
    document_file: Option<PathBuf>,
    category_dialog: Option<CategoryDialog>,
    edit_dialog: Option<EditDialog>,
    status: Option<Status>,
}

impl ModpackDesignerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        paths: Option<AppPaths>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        Self::with_config(&config, paths)
    }

    fn with_config(config: &AppConfig, paths: Option<AppPaths>) -> Self {
        Self {
            board: Board::new(),
            canvas: CanvasView::new(),
            search: SearchPanel::new(config),
            paths,
            document_file: None,
            category_dialog: None,
            edit_dialog: None,
            status: None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(Status {
            text: text.into(),
            is_error,
        });
    }

    fn open_category_dialog(&mut self, position: Option<Pos2>) {
        self.category_dialog = Some(CategoryDialog {
            name: String::new(),
            color: default_category_color(),
            position,
        });
    }

    fn dialog_directory(&self) -> Option<PathBuf> {
        self.document_file
            .as_ref()
            .and_then(|f| f.parent().map(Path::to_path_buf))
            .or_else(|| self.paths.as_ref().map(|p| p.arrangements.clone()))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Save / Load
    // ─────────────────────────────────────────────────────────────────────────────

    fn save_arrangement(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("JSON Files", &["json"])
            .set_file_name("arrangement.json");
        if let Some(dir) = self.dialog_directory() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.save_file() {
            match self.save_to(&path) {
                Ok(()) => {
                    let floating = self.board.floating_mods().len();
                    let text = if floating > 0 {
                        format!(
                            "Saved {} ({floating} mod(s) outside categories were not saved)",
                            path.display()
                        )
                    } else {
                        format!("Saved {}", path.display())
                    };
                    self.set_status(text, false);
                }
                Err(err) => {
                    log::error!("Saving {} failed: {err}", path.display());
                    self.set_status(format!("Save failed: {err}"), true);
                }
            }
        }
    }

    fn save_to(&mut self, path: &Path) -> StorageResult<()> {
        let document = self.board.extract_document();
        storage::save_arrangement(&document, path)?;
        self.document_file = Some(path.to_path_buf());
        Ok(())
    }

    fn load_arrangement(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("JSON Files", &["json"]);
        if let Some(dir) = self.dialog_directory() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            match self.load_from(&path) {
                Ok(()) => self.set_status(format!("Loaded {}", path.display()), false),
                Err(err) => {
                    log::error!("Loading {} failed: {err}", path.display());
                    self.set_status(format!("Load failed: {err}"), true);
                }
            }
        }
    }

    /// Replaces the board only when the whole file parsed.
    fn load_from(&mut self, path: &Path) -> StorageResult<()> {
        let document = storage::load_arrangement(path)?;
        self.board.rebuild_from_document(&document);
        self.document_file = Some(path.to_path_buf());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Panels and dialogs
    // ─────────────────────────────────────────────────────────────────────────────

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::default()
                    .fill(COLOR_TOOLBAR_BG)
                    .inner_margin(4.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(TOOLBAR_START_SPACING);
                    if toolbar_button(ui, "➕", "Add Category") {
                        self.open_category_dialog(None);
                    }
                    if toolbar_button(ui, "💾", "Save (Ctrl+S)") {
                        self.save_arrangement();
                    }
                    if toolbar_button(ui, "📂", "Load (Ctrl+O)") {
                        self.load_arrangement();
                    }
                    if toolbar_button(ui, "🗑", "Clear canvas") {
                        self.board.clear();
                        self.set_status("Canvas cleared", false);
                    }

                    if let Some(status) = &self.status {
                        ui.separator();
                        let color = if status.is_error {
                            COLOR_ERROR_TEXT
                        } else {
                            Color32::LIGHT_GRAY
                        };
                        ui.label(RichText::new(&status.text).color(color));
                    }
                });
            });
    }

    fn show_category_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.category_dialog else {
            return;
        };

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("New category")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Grid::new("new_category_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Name");
                        let response = ui.text_edit_singleline(&mut dialog.name);
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            confirmed = true;
                        }
                        ui.end_row();
                        ui.label("Color");
                        ui.color_edit_button_srgba(&mut dialog.color);
                        ui.end_row();
                    });
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            let name = dialog.name.trim().to_string();
            // Blank names are not accepted from the dialog; the dialog stays open.
            if !name.is_empty() {
                let color = dialog.color.to_opaque();
                let position = dialog.position;
                self.board.create_category(name, color, position);
                self.category_dialog = None;
            }
        } else if cancelled {
            self.category_dialog = None;
        }
    }

    fn show_edit_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.edit_dialog else {
            return;
        };

        let mut done = None;
        egui::Window::new("Edit category")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Grid::new("edit_category_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Name");
                        let response = ui.text_edit_singleline(&mut dialog.name);
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            done = Some(true);
                        }
                        ui.end_row();
                        ui.label("Color");
                        ui.color_edit_button_srgba(&mut dialog.color);
                        ui.end_row();
                    });
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        done = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        done = Some(false);
                    }
                });
            });

        match done {
            Some(true) => {
                let id = dialog.id;
                let name = dialog.name.trim().to_string();
                if !name.is_empty() {
                    let color = dialog.color.to_opaque();
                    self.board.rename_category(id, name);
                    self.board.set_category_color(id, color);
                    self.edit_dialog = None;
                }
            }
            Some(false) => self.edit_dialog = None,
            None => {}
        }
    }

    fn handle_canvas_action(&mut self, action: CanvasAction) {
        match action {
            CanvasAction::CreateCategoryAt(position) => self.open_category_dialog(Some(position)),
            CanvasAction::EditCategory(id) => {
                if let Some(category) = self.board.category(id) {
                    self.edit_dialog = Some(EditDialog {
                        id,
                        name: category.name.clone(),
                        color: category.color,
                    });
                }
            }
            CanvasAction::Status(text) => self.set_status(text, false),
        }
    }
}

fn toolbar_button(ui: &mut egui::Ui, icon: &str, hover: &str) -> bool {
    ui.add(
        egui::Button::new(RichText::new(icon).size(TOOLBAR_ICON_SIZE))
            .min_size(Vec2::splat(TOOLBAR_BUTTON_SIZE))
            .frame(false),
    )
    .on_hover_text(hover)
    .clicked()
}

impl eframe::App for ModpackDesignerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S)) {
            self.save_arrangement();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::O)) {
            self.load_arrangement();
        }

        self.show_toolbar(ctx);

        egui::SidePanel::left("search_panel")
            .default_width(SEARCH_PANEL_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                self.search.show(ui);
            });

        let actions = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas.show(ui, &mut self.board))
            .inner;
        for action in actions {
            self.handle_canvas_action(action);
        }

        self.show_category_dialog(ctx);
        self.show_edit_dialog(ctx);
    }
}
