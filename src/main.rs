mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod saw;
mod state;
mod ui;

use app::SawPlotterApp;
use config::PlotterConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = PlotterConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 750.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SAW Filter Plotter",
        options,
        Box::new(|_cc| Ok(Box::new(SawPlotterApp::new(config)))),
    )
}
