mod app;
mod board;
mod canvas;
mod config;
mod constants;
mod model;
mod paths;
mod payload;
mod search;
mod search_panel;
mod storage;

use app::ModpackDesignerApp;
use config::AppConfig;
use constants::{INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH};
use eframe::egui;
use paths::AppPaths;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let paths = AppPaths::from_project_dirs();
    if let Some(paths) = &paths {
        if let Err(err) = paths.ensure_dirs_exist() {
            log::warn!("Could not create application directories: {err}");
        }
    }
    let config = AppConfig::load(paths.as_ref().map(|p| p.config_file()).as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Modpack Designer")
            .with_inner_size([INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT]),
        ..Default::default()
    };

    eframe::run_native(
        "Modpack Designer",
        options,
        Box::new(move |cc| Ok(Box::new(ModpackDesignerApp::new(cc, config, paths)))),
    )
}
