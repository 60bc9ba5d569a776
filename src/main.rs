mod app;
mod compositor;
mod config;
mod export;
mod image;
mod panel;
mod preset;
mod router;
mod schema;
mod session;
mod surface;
mod util;

use app::FilterlabApp;
use config::AppConfig;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Filterlab — Image Filters",
        native_options,
        Box::new(move |_cc| Ok(Box::new(FilterlabApp::new(config)))),
    )
}
