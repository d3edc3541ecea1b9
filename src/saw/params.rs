use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

use super::response::SAMPLE_COUNT;

// ---------------------------------------------------------------------------
// ScalePolarity – sign convention of the dB axis
// ---------------------------------------------------------------------------

/// How the magnitude is expressed on the dB axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScalePolarity {
    /// `20·log10|H|`, peaks at 0 dB and lobes go negative.
    #[default]
    Direct,
    /// The negated value, read as insertion loss.
    Inverted,
}

impl ScalePolarity {
    pub const ALL: [ScalePolarity; 2] = [ScalePolarity::Direct, ScalePolarity::Inverted];

    /// Label for the y axis.
    pub fn axis_label(self) -> &'static str {
        match self {
            ScalePolarity::Direct => "Amplitude (dB)",
            ScalePolarity::Inverted => "Insertion Loss (dB)",
        }
    }

    /// Apply the sign convention to a `20·log10` value.
    pub fn apply(self, db: f64) -> f64 {
        match self {
            ScalePolarity::Direct => db,
            ScalePolarity::Inverted => -db,
        }
    }
}

impl fmt::Display for ScalePolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalePolarity::Direct => write!(f, "Direct (amplitude)"),
            ScalePolarity::Inverted => write!(f, "Inverted (insertion loss)"),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterParameters
// ---------------------------------------------------------------------------

/// Inputs of one model evaluation. All frequencies are in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    pub center_frequency: f64,
    /// Physical finger count; the model uses `finger_count / 2` pairs.
    pub finger_count: u32,
    pub span_fraction: f64,
    /// Display only (µm).
    pub wavelength: f64,
    /// Display only (ms).
    pub delay_time: f64,
    /// Width between the two annotation markers; 0 disables them.
    pub zero_bandwidth: f64,
    pub scale_polarity: ScalePolarity,
}

impl FilterParameters {
    /// Reject parameters the model cannot evaluate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.center_frequency.is_finite() || self.center_frequency <= 0.0 {
            return Err(DomainError::CenterFrequency(self.center_frequency));
        }
        if !(self.span_fraction > 0.0 && self.span_fraction <= 1.0) {
            return Err(DomainError::Span(self.span_fraction));
        }
        // Each step must clear the float spacing at the top of the band,
        // otherwise neighbouring samples round to the same frequency.
        let (_, stop) = self.band();
        if self.sample_step() <= 4.0 * stop * f64::EPSILON {
            return Err(DomainError::Span(self.span_fraction));
        }
        if self.finger_count < 2 {
            return Err(DomainError::FingerCount(self.finger_count));
        }
        if !self.zero_bandwidth.is_finite() || self.zero_bandwidth < 0.0 {
            return Err(DomainError::ZeroBandwidth(self.zero_bandwidth));
        }
        Ok(())
    }

    /// Number of finger pairs. Odd finger counts give a half pair.
    pub fn pair_count(&self) -> f64 {
        self.finger_count as f64 / 2.0
    }

    /// Lower and upper edge of the evaluated band.
    pub fn band(&self) -> (f64, f64) {
        (
            self.center_frequency * (1.0 - self.span_fraction),
            self.center_frequency * (1.0 + self.span_fraction),
        )
    }

    /// Spacing of the evaluation grid in Hz.
    pub fn sample_step(&self) -> f64 {
        let (start, stop) = self.band();
        (stop - start) / (SAMPLE_COUNT - 1) as f64
    }

    /// Marker frequencies at `f0 ± bw/2`, when a zero bandwidth is set.
    pub fn zero_bandwidth_markers(&self) -> Option<(f64, f64)> {
        if self.zero_bandwidth > 0.0 {
            let half = self.zero_bandwidth / 2.0;
            Some((self.center_frequency - half, self.center_frequency + half))
        } else {
            None
        }
    }
}
