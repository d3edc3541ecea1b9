//! Closed-form split-finger SAW filter model.
//!
//! ```text
//!   FilterParameters ──validate──▶ evaluate ──▶ FrequencyResponseSeries
//!                                     │
//!                    sinc(x/π) · cos(½π·Δf / (span·f0)) ──▶ 20·log10|H|
//! ```

pub mod params;
pub mod response;

pub use params::{FilterParameters, ScalePolarity};
pub use response::evaluate;
