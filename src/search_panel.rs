//! Search side panel: query and filter inputs, paginated result cards, and drag sources.

use crate::config::AppConfig;
use crate::constants::{COLOR_ERROR_TEXT, RESULT_ICON_SIZE};
use crate::payload::ModPayload;
use crate::search::{SearchHit, SearchOutcome, SearchPage, SearchQuery, SearchWorker, KNOWN_LOADERS};
use eframe::egui::{self, RichText, Vec2};

pub struct SearchPanel {
    worker: SearchWorker,
    page_size: u32,
    query_text: String,
    versions_text: String,
    loaders: [bool; KNOWN_LOADERS.len()],
    last_query: Option<SearchQuery>,
    page: SearchPage,
    error: Option<String>,
}

impl SearchPanel {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            worker: SearchWorker::new(config),
            page_size: config.page_size,
            query_text: String::new(),
            versions_text: String::new(),
            loaders: [false; KNOWN_LOADERS.len()],
            last_query: None,
            page: SearchPage::default(),
            error: None,
        }
    }

    /// Builds a query for page zero from the current inputs.
    fn build_query(&self) -> SearchQuery {
        SearchQuery {
            text: self.query_text.trim().to_string(),
            versions: split_list(&self.versions_text),
            loaders: KNOWN_LOADERS
                .iter()
                .zip(self.loaders.iter())
                .filter(|(_, enabled)| **enabled)
                .map(|(loader, _)| loader.to_string())
                .collect(),
            offset: 0,
            limit: self.page_size,
        }
    }

    fn submit(&mut self, ctx: &egui::Context, query: SearchQuery) {
        self.error = None;
        if query.is_blank() {
            self.page = SearchPage::default();
            self.last_query = None;
            return;
        }
        self.last_query = Some(query.clone());
        let ctx = ctx.clone();
        self.worker.submit(query, move || ctx.request_repaint());
    }

    fn apply(&mut self, outcome: SearchOutcome) {
        log::debug!(
            "Showing {} result(s) for '{}'",
            outcome.page.hits.len(),
            outcome.query.text
        );
        self.page = outcome.page;
        self.error = outcome.error;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        for outcome in self.worker.poll() {
            self.apply(outcome);
        }

        let ctx = ui.ctx().clone();
        ui.heading("Search mods");
        let mut run_search = false;
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.query_text)
                    .hint_text("Search Modrinth…")
                    .desired_width(ui.available_width() - 70.0),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                run_search = true;
            }
            if ui.button("Search").clicked() {
                run_search = true;
            }
        });

        egui::CollapsingHeader::new("Filters")
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Versions");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.versions_text)
                            .hint_text("1.20.1, 1.21"),
                    );
                });
                ui.horizontal_wrapped(|ui| {
                    for (loader, enabled) in KNOWN_LOADERS.iter().zip(self.loaders.iter_mut()) {
                        ui.checkbox(enabled, *loader);
                    }
                });
            });

        if run_search {
            let query = self.build_query();
            self.submit(&ctx, query);
        }

        ui.separator();

        if self.worker.is_busy() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Searching…");
            });
        }
        if let Some(error) = &self.error {
            ui.label(RichText::new(error).color(COLOR_ERROR_TEXT));
        }

        self.show_pagination(ui, &ctx);

        egui::ScrollArea::vertical()
            .id_salt("search_results")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.page.hits.is_empty() && self.last_query.is_some() && !self.worker.is_busy()
                {
                    ui.weak("No results");
                }
                for (index, hit) in self.page.hits.iter().enumerate() {
                    show_result_card(ui, index, hit);
                }
            });
    }

    fn show_pagination(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(last) = self.last_query.clone() else {
            return;
        };
        let pager = Pager::new(&self.page, last.limit);
        let (limit, offset) = (pager.limit, pager.offset);
        let (current, total_pages) = (pager.current, pager.total);

        let mut target = None;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(offset > 0, egui::Button::new("◀ Previous"))
                .clicked()
            {
                target = Some(offset.saturating_sub(limit));
            }
            ui.label(format!("Page {current} of {total_pages}"));
            if ui
                .add_enabled(current < total_pages, egui::Button::new("Next ▶"))
                .clicked()
            {
                target = Some(offset + limit);
            }
        });

        if let Some(offset) = target {
            self.submit(
                ctx,
                SearchQuery {
                    offset,
                    limit,
                    ..last
                },
            );
        }
    }
}

/// Page numbers for the pager, 1-based.
#[derive(Debug, PartialEq)]
struct Pager {
    limit: u32,
    offset: u32,
    current: u32,
    total: u32,
}

impl Pager {
    /// A failed request reports no hits at its offset, so the total never drops below
    /// the page being shown.
    fn new(page: &SearchPage, fallback_limit: u32) -> Self {
        let limit = if page.limit > 0 {
            page.limit
        } else {
            fallback_limit.max(1)
        };
        let current = page.offset / limit + 1;
        let total = page.total_hits.div_ceil(limit).max(current);
        Self {
            limit,
            offset: page.offset,
            current,
            total,
        }
    }
}

fn show_result_card(ui: &mut egui::Ui, index: usize, hit: &SearchHit) {
    let payload = ModPayload::from(hit);
    let drag = match payload.to_drag() {
        Ok(drag) => drag,
        Err(err) => {
            log::warn!("Cannot offer '{}' for dragging: {err}", hit.slug);
            return;
        }
    };

    let id = egui::Id::new(("search_result", index, &hit.slug));
    ui.dnd_drag_source(id, drag, |ui| {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                match &hit.icon_url {
                    Some(url) if !url.is_empty() => {
                        ui.add(
                            egui::Image::new(url.as_str())
                                .fit_to_exact_size(Vec2::splat(RESULT_ICON_SIZE)),
                        );
                    }
                    _ => {
                        ui.add_space(RESULT_ICON_SIZE);
                    }
                }
                ui.vertical(|ui| {
                    ui.label(RichText::new(&hit.title).strong());
                    if !hit.author.is_empty() {
                        ui.weak(format!("by {} · {} downloads", hit.author, hit.downloads));
                    }
                });
            });
            ui.add(egui::Label::new(hit.description.as_str()).wrap());
        });
    })
    .response
    .on_hover_text("Drag onto the canvas");
}

/// Splits a comma-separated list, dropping blanks.
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
