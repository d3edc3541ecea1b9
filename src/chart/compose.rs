use super::{AxisRange, ChartElement, LineKind, RenderedChart, Role, Shape, FREQUENCY_AXIS_LABEL};
use crate::data::model::{MeasuredDataset, SweepTrace};
use crate::saw::{evaluate, FilterParameters, ScalePolarity};

pub const THEORETICAL_LABEL: &str = "Theoretical (split-finger)";
pub const BW_START_LABEL: &str = "BW start";
pub const BW_END_LABEL: &str = "BW end";
pub const CENTER_LABEL: &str = "Center f₀";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Amplitude columns to draw from one loaded dataset.
#[derive(Debug, Clone)]
pub struct MeasuredSelection<'a> {
    pub dataset: &'a MeasuredDataset,
    pub columns: Vec<String>,
}

/// Everything the filter plotter draws in one pass.
#[derive(Debug, Clone)]
pub struct PlotRequest<'a> {
    /// Theoretical model to draw, if enabled.
    pub theory: Option<FilterParameters>,
    /// Add the wavelength / delay note next to the theoretical curve.
    pub show_parameter_note: bool,
    pub measured: Vec<MeasuredSelection<'a>>,
    /// Chooses the y-axis label, also when no model is drawn.
    pub polarity: ScalePolarity,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub title: String,
    /// Comma-separated legend override.
    pub legend_labels: String,
}

/// Single-trace view of a fixed-format sweep.
#[derive(Debug, Clone)]
pub struct SweepRequest<'a> {
    pub trace: &'a SweepTrace,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// `None` when the user left a bound empty or unparsable.
    pub x_range: Option<AxisRange>,
    pub y_range: Option<AxisRange>,
}

// ---------------------------------------------------------------------------
// Filter plotter
// ---------------------------------------------------------------------------

/// Build the full chart from scratch.
///
/// Draw order: theoretical curve, zero-bandwidth markers, measured curves,
/// center marker. A model that fails validation is left out and reported in
/// [`RenderedChart::theory_error`]; measured curves are drawn regardless.
pub fn compose(request: &PlotRequest<'_>) -> RenderedChart {
    let mut chart = RenderedChart::empty(request.polarity.axis_label());
    chart.show_legend = true;
    chart.title = non_empty(&request.title);

    let mut center_mhz = None;
    if let Some(params) = &request.theory {
        match evaluate(params) {
            Ok(series) => {
                let (start, stop) = params.band();
                log::debug!(
                    "theoretical curve: {} samples over {:.3}-{:.3} MHz",
                    series.len(),
                    start / 1e6,
                    stop / 1e6
                );
                chart.elements.push(ChartElement::curve(
                    THEORETICAL_LABEL,
                    Role::Theoretical,
                    series.points_mhz(),
                ));
                if let Some((lo, hi)) = params.zero_bandwidth_markers() {
                    for (label, f) in [(BW_START_LABEL, lo), (BW_END_LABEL, hi)] {
                        chart.elements.push(ChartElement::vline(
                            label,
                            Role::BandwidthMarker,
                            LineKind::Dashed,
                            f / 1e6,
                        ));
                    }
                }
                if request.show_parameter_note {
                    chart.notes.push(format!(
                        "λ={:.1} µm, τ={:.2} ms",
                        params.wavelength, params.delay_time
                    ));
                }
                center_mhz = Some(params.center_frequency / 1e6);
            }
            Err(e) => {
                log::warn!("theoretical curve skipped: {e}");
                chart.theory_error = Some(e);
            }
        }
    }

    for selection in &request.measured {
        let ds = selection.dataset;
        for column in &selection.columns {
            match ds.curve_mhz(column) {
                Some(points) => chart.elements.push(ChartElement::curve(
                    format!("{}:{column}", ds.source_name),
                    Role::Measured,
                    points,
                )),
                None => log::warn!("{}: no amplitude column '{column}'", ds.source_name),
            }
        }
    }

    if let Some(x) = center_mhz {
        chart.elements.push(ChartElement::vline(
            CENTER_LABEL,
            Role::CenterMarker,
            LineKind::Dotted,
            x,
        ));
    }

    apply_legend_override(&mut chart, &request.legend_labels);

    chart.x_bounds = resolve_logged(request.x_range, "x");
    chart.y_bounds = resolve_logged(request.y_range, "y");

    log::info!(
        "composed chart: {} curves, {} elements",
        chart.curve_count(),
        chart.elements.len()
    );
    log::debug!("legend entries: {:?}", chart.labels());
    chart
}

/// Split a comma-separated label list, dropping empty entries.
pub fn parse_legend_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Replace every element label, but only when the counts match exactly.
fn apply_legend_override(chart: &mut RenderedChart, raw: &str) {
    let labels = parse_legend_labels(raw);
    if labels.is_empty() {
        return;
    }
    if labels.len() != chart.elements.len() {
        log::warn!(
            "legend override has {} labels for {} plot elements, using defaults",
            labels.len(),
            chart.elements.len()
        );
        return;
    }
    for (element, label) in chart.elements.iter_mut().zip(labels) {
        element.label = label;
    }
}

fn resolve_logged(range: AxisRange, axis: &str) -> Option<(f64, f64)> {
    let resolved = range.resolve();
    if resolved.is_none() && range != AxisRange::default() {
        log::warn!(
            "ignoring {axis} range {}..{}: min must be below max",
            range.min,
            range.max
        );
    }
    resolved
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

// ---------------------------------------------------------------------------
// Sweep viewer
// ---------------------------------------------------------------------------

/// One trace with a dashed 0 dB rule and no legend.
///
/// Missing x bounds fall back to the frequency extent, missing y bounds to
/// `(lowest dB, 0)`. An inverted or empty range (`min >= max`) counts as
/// missing, the same guard the filter plotter applies, so the sweep axes
/// are never drawn flipped.
pub fn compose_sweep(request: &SweepRequest<'_>) -> RenderedChart {
    let trace = request.trace;
    let x_label = non_empty(&request.x_label).unwrap_or_else(|| FREQUENCY_AXIS_LABEL.to_string());
    let y_label = non_empty(&request.y_label).unwrap_or_else(|| "dB".to_string());

    let x_bounds = request
        .x_range
        .and_then(AxisRange::resolve)
        .or_else(|| {
            let (lo, hi) = trace.frequency_extent_mhz()?;
            AxisRange::new(lo, hi).resolve()
        });
    let y_bounds = request
        .y_range
        .and_then(AxisRange::resolve)
        .or_else(|| {
            let (lo, _) = trace.magnitude_extent()?;
            AxisRange::new(lo, 0.0).resolve()
        });

    RenderedChart {
        title: non_empty(&request.title),
        x_label,
        y_label,
        elements: vec![
            ChartElement::curve(trace.source_name.clone(), Role::Measured, trace.points_mhz()),
            ChartElement {
                label: String::new(),
                role: Role::ZeroDbRule,
                line: LineKind::Dashed,
                shape: Shape::HLine(0.0),
            },
        ],
        notes: Vec::new(),
        x_bounds,
        y_bounds,
        show_legend: false,
        theory_error: None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::DomainError;

    fn params() -> FilterParameters {
        FilterParameters {
            center_frequency: 100e6,
            finger_count: 50,
            span_fraction: 0.5,
            wavelength: 48.8,
            delay_time: 0.7,
            zero_bandwidth: 0.0,
            scale_polarity: ScalePolarity::Direct,
        }
    }

    fn dataset() -> MeasuredDataset {
        let mut columns = BTreeMap::new();
        columns.insert("Frequency_Hz".to_string(), vec![99e6, 100e6, 101e6]);
        columns.insert("S21_dB".to_string(), vec![-3.0, -1.0, -3.0]);
        MeasuredDataset {
            source_name: "run1.csv".to_string(),
            frequency_column: "Frequency_Hz".to_string(),
            amplitude_columns: vec!["S21_dB".to_string()],
            columns,
        }
    }

    fn request<'a>(ds: &'a MeasuredDataset) -> PlotRequest<'a> {
        PlotRequest {
            theory: Some(params()),
            show_parameter_note: true,
            measured: vec![MeasuredSelection {
                dataset: ds,
                columns: ds.amplitude_columns.clone(),
            }],
            polarity: ScalePolarity::Direct,
            x_range: AxisRange::default(),
            y_range: AxisRange::default(),
            title: String::new(),
            legend_labels: String::new(),
        }
    }

    #[test]
    fn test_default_draw_order_and_labels() {
        let ds = dataset();
        let chart = compose(&request(&ds));
        assert_eq!(
            chart.labels(),
            vec![THEORETICAL_LABEL, "run1.csv:S21_dB", CENTER_LABEL]
        );
        assert_eq!(chart.elements[2].shape, Shape::VLine(100.0));
        assert_eq!(chart.notes, vec!["λ=48.8 µm, τ=0.70 ms"]);
        assert_eq!(chart.x_label, "Frequency (MHz)");
        assert_eq!(chart.y_label, "Amplitude (dB)");
        assert_eq!(chart.title, None);
    }

    #[test]
    fn test_measured_frequencies_in_mhz() {
        let ds = dataset();
        let chart = compose(&request(&ds));
        assert_eq!(
            chart.elements[1].shape,
            Shape::Curve(vec![[99.0, -3.0], [100.0, -1.0], [101.0, -3.0]])
        );
    }

    #[test]
    fn test_zero_bandwidth_markers() {
        let ds = dataset();
        let mut req = request(&ds);
        req.theory = Some(FilterParameters { zero_bandwidth: 4e6, ..params() });
        let chart = compose(&req);
        assert_eq!(
            chart.labels(),
            vec![THEORETICAL_LABEL, BW_START_LABEL, BW_END_LABEL, "run1.csv:S21_dB", CENTER_LABEL]
        );
        assert_eq!(chart.elements[1].shape, Shape::VLine(98.0));
        assert_eq!(chart.elements[2].shape, Shape::VLine(102.0));
        assert_eq!(chart.elements[1].line, LineKind::Dashed);
    }

    #[test]
    fn test_legend_override_needs_exact_count() {
        let ds = dataset();
        let mut req = request(&ds);

        req.legend_labels = "model, measured".to_string();
        let chart = compose(&req);
        assert_eq!(
            chart.labels(),
            vec![THEORETICAL_LABEL, "run1.csv:S21_dB", CENTER_LABEL]
        );

        req.legend_labels = "model, measured ,f0,".to_string();
        let chart = compose(&req);
        assert_eq!(chart.labels(), vec!["model", "measured", "f0"]);
    }

    #[test]
    fn test_inverted_axis_override_is_ignored() {
        let ds = dataset();
        let mut req = request(&ds);
        req.x_range = AxisRange::new(5.0, 2.0);
        req.y_range = AxisRange::new(-60.0, 5.0);
        let chart = compose(&req);
        assert_eq!(chart.x_bounds, None);
        assert_eq!(chart.y_bounds, Some((-60.0, 5.0)));
    }

    #[test]
    fn test_invalid_model_keeps_measured_curves() {
        let ds = dataset();
        let mut req = request(&ds);
        req.theory = Some(FilterParameters { center_frequency: 0.0, ..params() });
        let chart = compose(&req);
        assert_eq!(chart.labels(), vec!["run1.csv:S21_dB"]);
        assert_eq!(chart.theory_error, Some(DomainError::CenterFrequency(0.0)));
        assert!(chart.notes.is_empty());
    }

    #[test]
    fn test_measured_only_uses_polarity_label() {
        let ds = dataset();
        let mut req = request(&ds);
        req.theory = None;
        req.polarity = ScalePolarity::Inverted;
        req.title = "  Lot 7  ".to_string();
        let chart = compose(&req);
        assert_eq!(chart.labels(), vec!["run1.csv:S21_dB"]);
        assert_eq!(chart.y_label, "Insertion Loss (dB)");
        assert_eq!(chart.title.as_deref(), Some("Lot 7"));
    }

    #[test]
    fn test_parse_legend_labels() {
        assert_eq!(parse_legend_labels(" a, ,b ,"), vec!["a", "b"]);
        assert!(parse_legend_labels("").is_empty());
    }

    fn sweep_trace() -> SweepTrace {
        SweepTrace {
            source_name: "sweep.csv".to_string(),
            frequency_hz: vec![90e6, 100e6, 110e6],
            magnitude_db: vec![-40.0, -3.5, -38.0],
        }
    }

    #[test]
    fn test_sweep_defaults() {
        let trace = sweep_trace();
        let chart = compose_sweep(&SweepRequest {
            trace: &trace,
            title: String::new(),
            x_label: String::new(),
            y_label: " ".to_string(),
            x_range: None,
            y_range: None,
        });
        assert_eq!(chart.x_label, "Frequency (MHz)");
        assert_eq!(chart.y_label, "dB");
        assert_eq!(chart.x_bounds, Some((90.0, 110.0)));
        assert_eq!(chart.y_bounds, Some((-40.0, 0.0)));
        assert!(!chart.show_legend);
        assert_eq!(chart.elements[1].shape, Shape::HLine(0.0));
    }

    #[test]
    fn test_sweep_inverted_range_is_not_flipped() {
        // A reversed range is treated like an empty field rather than
        // flipping the axis.
        let trace = sweep_trace();
        let chart = compose_sweep(&SweepRequest {
            trace: &trace,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x_range: Some(AxisRange::new(105.0, 95.0)),
            y_range: Some(AxisRange::new(0.0, -10.0)),
        });
        assert_eq!(chart.x_bounds, Some((90.0, 110.0)));
        assert_eq!(chart.y_bounds, Some((-40.0, 0.0)));
    }

    #[test]
    fn test_sweep_explicit_ranges() {
        let trace = SweepTrace {
            source_name: "sweep.csv".to_string(),
            frequency_hz: vec![90e6, 110e6],
            magnitude_db: vec![-40.0, -38.0],
        };
        let chart = compose_sweep(&SweepRequest {
            trace: &trace,
            title: "S21".to_string(),
            x_label: "f".to_string(),
            y_label: "S21 (dB)".to_string(),
            x_range: Some(AxisRange::new(95.0, 105.0)),
            y_range: Some(AxisRange::new(-50.0, 5.0)),
        });
        assert_eq!(chart.title.as_deref(), Some("S21"));
        assert_eq!(chart.x_label, "f");
        assert_eq!(chart.x_bounds, Some((95.0, 105.0)));
        assert_eq!(chart.y_bounds, Some((-50.0, 5.0)));
    }
}
