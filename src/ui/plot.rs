use eframe::egui::{Align2, Ui};
use egui_plot::{
    HLine, Legend, Line, LineStyle, Plot, PlotBounds, PlotPoint, PlotPoints, Text, VLine,
};

use crate::chart::{LineKind, RenderedChart, Shape};
use crate::color::element_colors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel plots
// ---------------------------------------------------------------------------

/// Frequency-response plot of the filter plotter.
pub fn filter_plot(ui: &mut Ui, state: &mut AppState) {
    let generation = state.chart_generation;
    draw_chart(ui, "filter_plot", &state.chart, generation, &mut state.shown_chart_generation);
}

/// Single-trace plot of the sweep viewer.
pub fn sweep_plot(ui: &mut Ui, state: &mut AppState) {
    let Some(chart) = &state.sweep_chart else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Choose a sweep file and press Plot");
        });
        return;
    };
    let generation = state.sweep_generation;
    draw_chart(ui, "sweep_plot", chart, generation, &mut state.shown_sweep_generation);
}

/// Draw a composed chart. When `generation` differs from `shown`, the view is
/// reset and any fixed axis bounds are applied once; afterwards the user can
/// pan and zoom freely.
fn draw_chart(ui: &mut Ui, id: &str, chart: &RenderedChart, generation: u64, shown: &mut u64) {
    if let Some(title) = &chart.title {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(title);
        });
    }

    let fresh = *shown != generation;
    *shown = generation;
    let fixed = if fresh { fixed_bounds(chart) } else { None };
    let colors = element_colors(&chart.elements);

    let mut plot = Plot::new(id)
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if chart.show_legend {
        plot = plot.legend(legend());
    }
    if fresh {
        plot = plot.reset();
    }

    plot.show(ui, |plot_ui| {
        if let Some(bounds) = fixed {
            plot_ui.set_plot_bounds(bounds);
        }

        for (element, &color) in chart.elements.iter().zip(&colors) {
            let style = line_style(element.line);
            match &element.shape {
                Shape::Curve(points) => {
                    let points: PlotPoints = points.iter().copied().collect();
                    plot_ui.line(
                        Line::new(points)
                            .name(&element.label)
                            .color(color)
                            .style(style)
                            .width(1.5),
                    );
                }
                Shape::VLine(x) => {
                    plot_ui.vline(VLine::new(*x).name(&element.label).color(color).style(style));
                }
                Shape::HLine(y) => {
                    plot_ui.hline(
                        HLine::new(*y)
                            .name(&element.label)
                            .color(color)
                            .style(style)
                            .width(1.0),
                    );
                }
            }
        }

        if !chart.notes.is_empty() {
            let b = plot_ui.plot_bounds();
            let corner = PlotPoint::new(
                b.min()[0] + 0.05 * b.width(),
                b.max()[1] - 0.05 * b.height(),
            );
            plot_ui.text(Text::new(corner, chart.notes.join("\n")).anchor(Align2::LEFT_TOP));
        }
    });
}

/// Legend listing entries in draw order, so a comma-separated label override
/// reads in the same order the user typed it.
fn legend() -> Legend {
    Legend::default().follow_insertion_order(true)
}

fn line_style(kind: LineKind) -> LineStyle {
    match kind {
        LineKind::Solid => LineStyle::Solid,
        LineKind::Dashed => LineStyle::dashed_loose(),
        LineKind::Dotted => LineStyle::dotted_dense(),
    }
}

/// Bounds to apply on a fresh chart, or `None` to let the plot auto-scale.
/// An axis without a fixed range takes the data extent plus a small margin.
fn fixed_bounds(chart: &RenderedChart) -> Option<PlotBounds> {
    if chart.x_bounds.is_none() && chart.y_bounds.is_none() {
        return None;
    }
    let (data_x, data_y) = chart
        .data_extent()
        .map(|(x, y)| (padded(x[0], x[1]), padded(y[0], y[1])))
        .unwrap_or(((0.0, 1.0), (0.0, 1.0)));
    let (x0, x1) = chart.x_bounds.unwrap_or(data_x);
    let (y0, y1) = chart.y_bounds.unwrap_or(data_y);
    Some(PlotBounds::from_min_max([x0, y0], [x1, y1]))
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    let margin = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    (lo - margin, hi + margin)
}
