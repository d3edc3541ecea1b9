use std::f64::consts::PI;

use crate::error::DomainError;

use super::params::FilterParameters;

/// Number of frequency samples per evaluation.
pub const SAMPLE_COUNT: usize = 1000;

/// Guards `log10(0)` in the dB conversion.
const DB_FLOOR: f64 = 1e-12;

// ---------------------------------------------------------------------------
// FrequencyResponseSeries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseSample {
    pub frequency_hz: f64,
    pub magnitude_db: f64,
}

/// Samples of the theoretical response, strictly increasing in frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponseSeries {
    samples: Vec<ResponseSample>,
}

impl FrequencyResponseSeries {
    #[cfg(test)]
    pub fn samples(&self) -> &[ResponseSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `[MHz, dB]` pairs for plotting.
    pub fn points_mhz(&self) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .map(|s| [s.frequency_hz / 1e6, s.magnitude_db])
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Split-finger model
// ---------------------------------------------------------------------------

/// Normalized sinc, `sin(πt)/(πt)` with `sinc(0) = 1`.
pub fn sinc(t: f64) -> f64 {
    if t == 0.0 {
        1.0
    } else {
        let a = PI * t;
        a.sin() / a
    }
}

/// Linear transfer value `H(f)`: sinc main lobe times a cosine roll-off
/// spanning the evaluated band. May be negative on odd side lobes.
pub fn transfer(params: &FilterParameters, f: f64) -> f64 {
    let f0 = params.center_frequency;
    let x = params.pair_count() * PI * (f - f0) / f0;
    let envelope = sinc(x / PI);
    let rolloff = (0.5 * PI * (f - f0) / (params.span_fraction * f0)).cos();
    envelope * rolloff
}

/// `H(f)` in dB under the parameters' scale polarity.
pub fn magnitude_db(params: &FilterParameters, f: f64) -> f64 {
    let db = 20.0 * (transfer(params, f).abs() + DB_FLOOR).log10();
    params.scale_polarity.apply(db)
}

/// Evaluate the response over `[f0(1-span), f0(1+span)]`.
pub fn evaluate(params: &FilterParameters) -> Result<FrequencyResponseSeries, DomainError> {
    params.validate()?;

    let (start, stop) = params.band();
    let step = params.sample_step();
    let samples = (0..SAMPLE_COUNT)
        .map(|i| {
            // Pin the last sample to the band edge instead of accumulating rounding.
            let f = if i == SAMPLE_COUNT - 1 {
                stop
            } else {
                start + step * i as f64
            };
            ResponseSample {
                frequency_hz: f,
                magnitude_db: magnitude_db(params, f),
            }
        })
        .collect();

    Ok(FrequencyResponseSeries { samples })
}
