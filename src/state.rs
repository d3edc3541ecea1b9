use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chart::compose::MeasuredSelection;
use crate::chart::{compose, compose_sweep, AxisRange, PlotRequest, RenderedChart, SweepRequest};
use crate::config::{IngestConfig, PlotterConfig};
use crate::data::loader;
use crate::data::model::DatasetStore;
use crate::saw::{FilterParameters, ScalePolarity};

// ---------------------------------------------------------------------------
// Parameter form – what the user typed, in display units
// ---------------------------------------------------------------------------

/// Widget-bound inputs of the filter plotter. Copied into core types only at
/// the moment an action is triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterForm {
    pub center_frequency_mhz: f64,
    pub finger_count: u32,
    pub span_fraction: f64,
    pub wavelength_um: f64,
    pub delay_ms: f64,
    pub zero_bandwidth_mhz: f64,
    pub polarity: ScalePolarity,
    /// MHz; `0..0` means auto.
    pub x_range: AxisRange,
    /// dB; `0..0` means auto.
    pub y_range: AxisRange,
    pub title: String,
    pub legend_labels: String,
}

impl Default for ParameterForm {
    fn default() -> Self {
        Self {
            center_frequency_mhz: 100.0,
            finger_count: 50,
            span_fraction: 0.5,
            wavelength_um: 48.8,
            delay_ms: 0.7,
            zero_bandwidth_mhz: 0.0,
            polarity: ScalePolarity::Direct,
            x_range: AxisRange::default(),
            y_range: AxisRange::default(),
            title: String::new(),
            legend_labels: String::new(),
        }
    }
}

impl ParameterForm {
    /// Model parameters in SI units.
    pub fn to_parameters(&self) -> FilterParameters {
        FilterParameters {
            center_frequency: self.center_frequency_mhz * 1e6,
            finger_count: self.finger_count,
            span_fraction: self.span_fraction,
            wavelength: self.wavelength_um,
            delay_time: self.delay_ms,
            zero_bandwidth: self.zero_bandwidth_mhz * 1e6,
            scale_polarity: self.polarity,
        }
    }
}

/// Inputs of the sweep viewer. Range bounds are free text; a bound that does
/// not parse leaves the axis on its default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepForm {
    pub path: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_min: String,
    pub x_max: String,
    pub y_min: String,
    pub y_max: String,
}

impl SweepForm {
    pub fn x_range(&self) -> Option<AxisRange> {
        parse_range(&self.x_min, &self.x_max)
    }

    pub fn y_range(&self) -> Option<AxisRange> {
        parse_range(&self.y_min, &self.y_max)
    }
}

fn parse_range(min: &str, max: &str) -> Option<AxisRange> {
    let min = min.trim().parse::<f64>().ok()?;
    let max = max.trim().parse::<f64>().ok()?;
    Some(AxisRange::new(min, max))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    FilterPlotter,
    SweepViewer,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub ingest: IngestConfig,
    pub tool: Tool,

    pub form: ParameterForm,
    pub show_theory: bool,
    pub show_measured: bool,
    pub show_parameter_note: bool,

    /// Session cache of loaded measurement files.
    pub datasets: DatasetStore,
    /// Dataset name → selected amplitude columns. Absent means not selected.
    pub selection: BTreeMap<String, BTreeSet<String>>,

    pub chart: RenderedChart,
    /// Bumped on every redraw so the plot widget resets its view.
    pub chart_generation: u64,
    /// Generation the plot widget last drew.
    pub shown_chart_generation: u64,

    pub sweep_form: SweepForm,
    pub sweep_chart: Option<RenderedChart>,
    pub sweep_generation: u64,
    pub shown_sweep_generation: u64,

    /// Errors shown in the UI until dismissed.
    pub status_messages: Vec<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(PlotterConfig::default())
    }
}

impl AppState {
    pub fn from_config(config: PlotterConfig) -> Self {
        let chart = RenderedChart::empty(config.defaults.polarity.axis_label());
        Self {
            ingest: config.ingest,
            tool: Tool::default(),
            form: config.defaults,
            show_theory: true,
            show_measured: false,
            show_parameter_note: true,
            datasets: DatasetStore::default(),
            selection: BTreeMap::new(),
            chart,
            chart_generation: 0,
            shown_chart_generation: 0,
            sweep_form: SweepForm::default(),
            sweep_chart: None,
            sweep_generation: 0,
            shown_sweep_generation: 0,
            status_messages: Vec::new(),
        }
    }

    // ---- Measured datasets ----

    /// Load every file on its own; failures become status messages.
    pub fn load_datasets(&mut self, paths: &[PathBuf]) {
        let results = loader::load_datasets(
            paths,
            self.ingest.header_row,
            self.ingest.fallback_header_row,
        );
        for (path, result) in results {
            match result {
                Ok(dataset) => {
                    log::info!(
                        "Loaded {}: {} rows, frequency column '{}', amplitude columns {:?}",
                        dataset.source_name,
                        dataset.len(),
                        dataset.frequency_column,
                        dataset.amplitude_columns
                    );
                    if dataset.is_empty() {
                        log::warn!("{} has a header but no data rows", dataset.source_name);
                    }
                    let name = dataset.source_name.clone();
                    let columns: BTreeSet<String> =
                        dataset.amplitude_columns.iter().cloned().collect();
                    if self.datasets.insert(dataset) {
                        log::info!("{name} replaced an earlier load");
                        if let Some(selected) = self.selection.get_mut(&name) {
                            *selected = columns;
                        }
                    }
                }
                Err(e) => {
                    log::error!("Failed to load {}: {e}", path.display());
                    self.status_messages.push(format!("Error: {e}"));
                }
            }
        }
    }

    pub fn remove_dataset(&mut self, name: &str) {
        if self.datasets.remove(name).is_some() {
            self.selection.remove(name);
            log::info!("Removed {name}");
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.contains_key(name)
    }

    /// Select a dataset with all its amplitude columns, or deselect it.
    pub fn toggle_dataset(&mut self, name: &str) {
        if self.selection.remove(name).is_some() {
            return;
        }
        if let Some(ds) = self.datasets.get(name) {
            let columns = ds.amplitude_columns.iter().cloned().collect();
            self.selection.insert(name.to_string(), columns);
        }
    }

    pub fn toggle_column(&mut self, name: &str, column: &str) {
        if let Some(selected) = self.selection.get_mut(name) {
            if !selected.remove(column) {
                selected.insert(column.to_string());
            }
        }
    }

    // ---- Filter plotter ----

    /// Snapshot the form into a request over the current cache.
    pub fn plot_request(&self) -> PlotRequest<'_> {
        let measured = if self.show_measured {
            self.datasets
                .iter()
                .filter_map(|ds| {
                    let selected = self.selection.get(&ds.source_name)?;
                    let columns = ds
                        .amplitude_columns
                        .iter()
                        .filter(|c| selected.contains(*c))
                        .cloned()
                        .collect();
                    Some(MeasuredSelection { dataset: ds, columns })
                })
                .collect()
        } else {
            Vec::new()
        };

        PlotRequest {
            theory: self.show_theory.then(|| self.form.to_parameters()),
            show_parameter_note: self.show_parameter_note,
            measured,
            polarity: self.form.polarity,
            x_range: self.form.x_range,
            y_range: self.form.y_range,
            title: self.form.title.clone(),
            legend_labels: self.form.legend_labels.clone(),
        }
    }

    pub fn draw_plot(&mut self) {
        let chart = compose(&self.plot_request());
        if let Some(e) = &chart.theory_error {
            self.status_messages.push(format!("Theoretical curve: {e}"));
        }
        self.chart = chart;
        self.chart_generation += 1;
    }

    pub fn clear_plot(&mut self) {
        self.chart = RenderedChart::empty(self.form.polarity.axis_label());
        self.chart_generation += 1;
    }

    // ---- Sweep viewer ----

    /// Read the file named in the sweep form and redraw it.
    pub fn plot_sweep(&mut self) {
        let path = self.sweep_form.path.trim();
        if path.is_empty() {
            return;
        }
        match loader::load_sweep(Path::new(path), self.ingest.sweep_skip_lines) {
            Ok(trace) => {
                log::info!("Loaded sweep {} with {} points", trace.source_name, trace.len());
                let chart = compose_sweep(&SweepRequest {
                    trace: &trace,
                    title: self.sweep_form.title.clone(),
                    x_label: self.sweep_form.x_label.clone(),
                    y_label: self.sweep_form.y_label.clone(),
                    x_range: self.sweep_form.x_range(),
                    y_range: self.sweep_form.y_range(),
                });
                self.sweep_chart = Some(chart);
                self.sweep_generation += 1;
            }
            Err(e) => {
                log::error!("Failed to load sweep: {e}");
                self.status_messages.push(format!("Failed to load sweep: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("saw_plotter_{tag}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_form_converts_to_hz() {
        let form = ParameterForm {
            zero_bandwidth_mhz: 2.5,
            ..ParameterForm::default()
        };
        let p = form.to_parameters();
        assert_eq!(p.center_frequency, 100e6);
        assert_eq!(p.zero_bandwidth, 2.5e6);
        assert_eq!(p.finger_count, 50);
        assert_eq!(p.scale_polarity, ScalePolarity::Direct);
    }

    #[test]
    fn test_sweep_form_ranges() {
        let form = SweepForm {
            x_min: " 95 ".to_string(),
            x_max: "105".to_string(),
            y_min: "".to_string(),
            y_max: "0".to_string(),
            ..SweepForm::default()
        };
        assert_eq!(form.x_range(), Some(AxisRange::new(95.0, 105.0)));
        assert_eq!(form.y_range(), None);
    }

    #[test]
    fn test_batch_load_and_selection() {
        let dir = temp_dir("state");
        let a = dir.join("a.csv");
        let b = dir.join("b.csv");
        let broken = dir.join("broken.csv");
        std::fs::write(&a, "m\nm\nFrequency,S21,S11\n1e6,-1,-9\n2e6,-2,-8\n").unwrap();
        std::fs::write(&b, "Freq,S21\n1e6,-5\n").unwrap();
        std::fs::write(&broken, "Frequency\n1e6\n").unwrap();

        let mut state = AppState::default();
        state.load_datasets(&[a.clone(), broken, b]);
        assert_eq!(state.datasets.names(), vec!["a.csv", "b.csv"]);
        assert_eq!(state.status_messages.len(), 1);
        assert!(state.status_messages[0].contains("broken.csv"));

        state.show_theory = false;
        state.show_measured = true;
        state.toggle_dataset("b.csv");
        state.toggle_dataset("a.csv");
        state.toggle_column("a.csv", "S11");

        // Curves follow load order, columns follow file order.
        let request = state.plot_request();
        let names: Vec<_> = request
            .measured
            .iter()
            .map(|m| (m.dataset.source_name.as_str(), m.columns.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a.csv", vec!["S21".to_string()]),
                ("b.csv", vec!["S21".to_string()]),
            ]
        );

        state.draw_plot();
        assert_eq!(state.chart.labels(), vec!["a.csv:S21", "b.csv:S21"]);
        assert_eq!(state.chart_generation, 1);

        // Reloading a name replaces the entry and reselects its new columns.
        std::fs::write(&a, "Frequency,X\n1e6,0\n").unwrap();
        state.load_datasets(&[a]);
        assert_eq!(state.datasets.len(), 2);
        assert!(state.selection["a.csv"].contains("X"));

        state.remove_dataset("a.csv");
        assert!(!state.is_selected("a.csv"));
        assert_eq!(state.datasets.names(), vec!["b.csv"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_header_only_file_loads_empty() {
        let dir = temp_dir("header_only");
        let path = dir.join("blank.csv");
        std::fs::write(&path, "Frequency,S21\n").unwrap();

        let mut state = AppState::default();
        state.load_datasets(&[path]);
        assert!(state.status_messages.is_empty());
        assert!(state.datasets.get("blank.csv").unwrap().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_model_reports_status() {
        let mut state = AppState::default();
        state.form.span_fraction = 2.0;
        state.draw_plot();
        assert!(state.chart.elements.is_empty());
        assert_eq!(state.status_messages.len(), 1);
        assert!(state.status_messages[0].starts_with("Theoretical curve"));
    }

    #[test]
    fn test_clear_keeps_axis_labels() {
        let mut state = AppState::default();
        state.draw_plot();
        assert!(!state.chart.elements.is_empty());
        state.form.polarity = ScalePolarity::Inverted;
        state.clear_plot();
        assert!(state.chart.elements.is_empty());
        assert_eq!(state.chart.y_label, "Insertion Loss (dB)");
    }

    #[test]
    fn test_sweep_plot() {
        let dir = temp_dir("sweep");
        let path = dir.join("sweep.csv");
        std::fs::write(&path, "a\nb\nc\n\"99000000\",\"-20\",\"\"\n\"100000000\",\"-3\",\"\"\n").unwrap();

        let mut state = AppState::default();
        state.sweep_form.path = path.display().to_string();
        state.plot_sweep();
        let chart = state.sweep_chart.as_ref().unwrap();
        assert_eq!(chart.x_bounds, Some((99.0, 100.0)));
        assert_eq!(chart.y_bounds, Some((-20.0, 0.0)));

        state.sweep_form.path = dir.join("nope.csv").display().to_string();
        state.plot_sweep();
        assert_eq!(state.status_messages.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
