use eframe::egui;

use crate::config::PlotterConfig;
use crate::state::{AppState, Tool};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SawPlotterApp {
    pub state: AppState,
}

impl SawPlotterApp {
    pub fn new(config: PlotterConfig) -> Self {
        Self {
            state: AppState::from_config(config),
        }
    }
}

impl eframe::App for SawPlotterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: inputs of the active tool ----
        egui::SidePanel::left("input_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| match self.state.tool {
                Tool::FilterPlotter => panels::filter_panel(ui, &mut self.state),
                Tool::SweepViewer => panels::sweep_panel(ui, &mut self.state),
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tool {
            Tool::FilterPlotter => plot::filter_plot(ui, &mut self.state),
            Tool::SweepViewer => plot::sweep_plot(ui, &mut self.state),
        });
    }
}
