//! Chart composition: turns a plot request into a fully resolved,
//! toolkit-independent description of what to draw.

pub mod compose;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub use compose::{compose, compose_sweep, PlotRequest, SweepRequest};

pub const FREQUENCY_AXIS_LABEL: &str = "Frequency (MHz)";

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// A user-entered axis range. Only applied when `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `Some((min, max))` for a usable range, `None` to auto-scale.
    pub fn resolve(self) -> Option<(f64, f64)> {
        (self.min < self.max).then_some((self.min, self.max))
    }
}

// ---------------------------------------------------------------------------
// RenderedChart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Theoretical,
    Measured,
    BandwidthMarker,
    CenterMarker,
    ZeroDbRule,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// `[x, y]` points, x in MHz.
    Curve(Vec<[f64; 2]>),
    /// Vertical line at x (MHz).
    VLine(f64),
    /// Horizontal line at y.
    HLine(f64),
}

/// One drawable item, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartElement {
    /// Legend label; empty means "not in the legend".
    pub label: String,
    pub role: Role,
    pub line: LineKind,
    pub shape: Shape,
}

impl ChartElement {
    pub fn curve(label: impl Into<String>, role: Role, points: Vec<[f64; 2]>) -> Self {
        Self {
            label: label.into(),
            role,
            line: LineKind::Solid,
            shape: Shape::Curve(points),
        }
    }

    pub fn vline(label: impl Into<String>, role: Role, line: LineKind, x: f64) -> Self {
        Self {
            label: label.into(),
            role,
            line,
            shape: Shape::VLine(x),
        }
    }

    pub fn is_curve(&self) -> bool {
        matches!(self.shape, Shape::Curve(_))
    }
}

/// Everything needed to draw one chart. Built fresh per render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedChart {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub elements: Vec<ChartElement>,
    /// Free text placed at the top-left of the plot area.
    pub notes: Vec<String>,
    /// Fixed axis bounds; `None` auto-scales to the data.
    pub x_bounds: Option<(f64, f64)>,
    pub y_bounds: Option<(f64, f64)>,
    pub show_legend: bool,
    /// Why the theoretical curve is missing, if it was requested and failed.
    pub theory_error: Option<DomainError>,
}

impl RenderedChart {
    /// A blank canvas with axis labels only.
    pub fn empty(y_label: &str) -> Self {
        Self {
            x_label: FREQUENCY_AXIS_LABEL.to_string(),
            y_label: y_label.to_string(),
            ..Default::default()
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn curve_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_curve()).count()
    }

    /// `(min, max)` over all drawn x and y values, for filling in an axis
    /// that has no fixed bounds.
    pub fn data_extent(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut xs: Option<(f64, f64)> = None;
        let mut ys: Option<(f64, f64)> = None;
        let widen = |acc: &mut Option<(f64, f64)>, v: f64| {
            if v.is_finite() {
                *acc = Some(match *acc {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
        };
        for e in &self.elements {
            match &e.shape {
                Shape::Curve(points) => {
                    for p in points {
                        widen(&mut xs, p[0]);
                        widen(&mut ys, p[1]);
                    }
                }
                Shape::VLine(x) => widen(&mut xs, *x),
                Shape::HLine(y) => widen(&mut ys, *y),
            }
        }
        let (xs, ys) = (xs?, ys?);
        Some(([xs.0, xs.1], [ys.0, ys.1]))
    }
}
