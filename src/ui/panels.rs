use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::saw::ScalePolarity;
use crate::state::{AppState, Tool};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Load CSV…").clicked() {
                open_datasets_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open sweep…").clicked() {
                browse_sweep_file(state);
                state.tool = Tool::SweepViewer;
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.tool, Tool::FilterPlotter, "SAW Filter Plotter");
        ui.selectable_value(&mut state.tool, Tool::SweepViewer, "Sweep Viewer");

        ui.separator();

        if !state.datasets.is_empty() {
            ui.label(format!("{} files loaded", state.datasets.len()))
                .on_hover_text(state.datasets.names().join("\n"));
        }
    });

    if !state.status_messages.is_empty() {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for msg in &state.status_messages {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            if ui.small_button("Dismiss").clicked() {
                state.status_messages.clear();
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Filter plotter side panel
// ---------------------------------------------------------------------------

/// Parameters, plot options, and loaded datasets.
pub fn filter_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Filter Parameters");
            ui.separator();
            parameter_grid(ui, state);

            ui.add_space(8.0);
            ui.heading("Plot Options");
            ui.separator();

            ui.label("Chart Title:");
            ui.text_edit_singleline(&mut state.form.title);
            ui.label("Legend Labels (comma-separated):");
            ui.text_edit_singleline(&mut state.form.legend_labels);

            ui.checkbox(&mut state.show_theory, "Theoretical");
            ui.checkbox(&mut state.show_parameter_note, "Annotate λ / τ");
            ui.checkbox(&mut state.show_measured, "CSV Data");

            if ui.button("Load CSV…").clicked() {
                open_datasets_dialog(state);
            }
            dataset_list(ui, state);

            ui.add_space(8.0);
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Plot").clicked() {
                    state.draw_plot();
                }
                if ui.button("Clear").clicked() {
                    state.clear_plot();
                }
            });
        });
}

fn parameter_grid(ui: &mut Ui, state: &mut AppState) {
    let form = &mut state.form;
    egui::Grid::new("filter_parameters")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Center Frequency (MHz):");
            ui.add(DragValue::new(&mut form.center_frequency_mhz).speed(0.5));
            ui.end_row();

            ui.label("Number of Fingers:");
            ui.add(DragValue::new(&mut form.finger_count).speed(1.0));
            ui.end_row();

            ui.label("Span (fraction):");
            ui.add(DragValue::new(&mut form.span_fraction).speed(0.01));
            ui.end_row();

            ui.label("Wavelength (µm):");
            ui.add(DragValue::new(&mut form.wavelength_um).speed(0.1));
            ui.end_row();

            ui.label("Delay Time (ms):");
            ui.add(DragValue::new(&mut form.delay_ms).speed(0.01));
            ui.end_row();

            ui.label("Zero BW (MHz):");
            ui.add(DragValue::new(&mut form.zero_bandwidth_mhz).speed(0.1));
            ui.end_row();

            ui.label("Scale:");
            egui::ComboBox::from_id_salt("scale_polarity")
                .selected_text(form.polarity.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for polarity in ScalePolarity::ALL {
                        ui.selectable_value(&mut form.polarity, polarity, polarity.to_string());
                    }
                });
            ui.end_row();

            ui.label("X Range (MHz):");
            ui.horizontal(|ui: &mut Ui| {
                ui.add(DragValue::new(&mut form.x_range.min).speed(0.5));
                ui.add(DragValue::new(&mut form.x_range.max).speed(0.5));
            });
            ui.end_row();

            ui.label("Y Range (dB):");
            ui.horizontal(|ui: &mut Ui| {
                ui.add(DragValue::new(&mut form.y_range.min).speed(0.5));
                ui.add(DragValue::new(&mut form.y_range.max).speed(0.5));
            });
            ui.end_row();
        });
}

/// One checkbox per loaded file, with per-column selection for files that
/// carry more than one amplitude column.
fn dataset_list(ui: &mut Ui, state: &mut AppState) {
    if state.datasets.is_empty() {
        ui.label("No CSV files loaded.");
        return;
    }

    // Collect first so the loop can mutate the selection.
    let entries: Vec<(String, Vec<String>)> = state
        .datasets
        .iter()
        .map(|ds| (ds.source_name.clone(), ds.amplitude_columns.clone()))
        .collect();
    let mut to_remove = None;

    for (name, columns) in &entries {
        ui.horizontal(|ui: &mut Ui| {
            let mut checked = state.is_selected(name);
            if ui.checkbox(&mut checked, name).changed() {
                state.toggle_dataset(name);
            }
            if ui.small_button("Remove").clicked() {
                to_remove = Some(name.clone());
            }
        });

        if columns.len() > 1 && state.is_selected(name) {
            egui::CollapsingHeader::new(format!("{name} columns"))
                .id_salt(name)
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for column in columns {
                        let mut checked = state
                            .selection
                            .get(name)
                            .is_some_and(|s| s.contains(column));
                        if ui.checkbox(&mut checked, column).changed() {
                            state.toggle_column(name, column);
                        }
                    }
                });
        }
    }

    if let Some(name) = to_remove {
        state.remove_dataset(&name);
    }
}

// ---------------------------------------------------------------------------
// Sweep viewer side panel
// ---------------------------------------------------------------------------

pub fn sweep_panel(ui: &mut Ui, state: &mut AppState) {
    let form = &mut state.sweep_form;
    ui.heading("Sweep File");
    ui.separator();

    egui::Grid::new("sweep_form")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("CSV File:");
            ui.text_edit_singleline(&mut form.path);
            ui.end_row();

            ui.label("Title:");
            ui.text_edit_singleline(&mut form.title);
            ui.end_row();

            ui.label("X Label:");
            ui.text_edit_singleline(&mut form.x_label);
            ui.end_row();

            ui.label("Y Label:");
            ui.text_edit_singleline(&mut form.y_label);
            ui.end_row();

            ui.label("X Min / Max (MHz):");
            ui.horizontal(|ui: &mut Ui| {
                ui.add(egui::TextEdit::singleline(&mut form.x_min).desired_width(60.0));
                ui.add(egui::TextEdit::singleline(&mut form.x_max).desired_width(60.0));
            });
            ui.end_row();

            ui.label("Y Min / Max (dB):");
            ui.horizontal(|ui: &mut Ui| {
                ui.add(egui::TextEdit::singleline(&mut form.y_min).desired_width(60.0));
                ui.add(egui::TextEdit::singleline(&mut form.y_max).desired_width(60.0));
            });
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Browse…").clicked() {
            browse_sweep_file(state);
        }
        if ui.button("Plot").clicked() {
            state.plot_sweep();
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_datasets_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Load measured data")
        .add_filter("CSV files", &["csv"])
        .pick_files();

    if let Some(paths) = files {
        state.load_datasets(&paths);
    }
}

fn browse_sweep_file(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sweep file")
        .add_filter("CSV Files", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.sweep_form.path = path.display().to_string();
    }
}
