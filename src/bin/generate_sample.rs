//! Writes synthetic SAW filter measurements in both supported CSV layouts:
//! `sample_saw_sweep.csv` (metadata lines, header on row 2, two amplitude
//! columns) and `sample_saw_strict.csv` (three preamble lines, quoted
//! `frequency,dB,extra` rows).
//!
//! The generator is a standalone binary and does not link the plotter. Its
//! `response_db` is a copy of the split-finger model in `saw::response`
//! (`transfer` then `20·log10`), clipped at a -80 dB noise floor and offset by
//! an insertion loss. Keep the two in step when the model changes.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

const CENTER_HZ: f64 = 100e6;
const FINGER_PAIRS: f64 = 25.0;
const SPAN: f64 = 0.5;
const POINTS: usize = 801;

/// Split-finger magnitude in dB with an insertion-loss offset. Mirrors
/// `saw::response::transfer`.
fn response_db(f: f64, loss_db: f64) -> f64 {
    let x = FINGER_PAIRS * PI * (f - CENTER_HZ) / CENTER_HZ;
    let envelope = if x == 0.0 { 1.0 } else { x.sin() / x };
    let rolloff = (0.5 * PI * (f - CENTER_HZ) / (SPAN * CENTER_HZ)).cos();
    // Real devices bottom out at the analyzer's noise floor.
    (20.0 * (envelope * rolloff).abs().max(1e-4).log10()) - loss_db
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

fn frequencies() -> Vec<f64> {
    let (start, stop) = (CENTER_HZ * (1.0 - SPAN), CENTER_HZ * (1.0 + SPAN));
    (0..POINTS)
        .map(|i| start + (stop - start) * i as f64 / (POINTS - 1) as f64)
        .collect()
}

fn write_sweep_export(path: &str, rng: &mut SimpleRng) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "# SAW filter S-parameter export")?;
    writeln!(out, "# Device: synthetic, f0 = {} MHz", CENTER_HZ / 1e6)?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["Frequency (Hz)", "S21 (dB)", "S11 (dB)"])?;
    for f in frequencies() {
        let s21 = response_db(f, 6.0) + rng.gauss(0.0, 0.2);
        let s11 = -3.0 - 12.0 * (1.0 - (f - CENTER_HZ).abs() / (SPAN * CENTER_HZ))
            + rng.gauss(0.0, 0.3);
        writer.write_record(&[format!("{f:.0}"), format!("{s21:.3}"), format!("{s11:.3}")])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_strict_export(path: &str, rng: &mut SimpleRng) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "!Synthetic SAW sweep")?;
    writeln!(out, "!Points: {POINTS}")?;
    writeln!(out, "Frequency,Magnitude,Phase")?;
    for f in frequencies() {
        let db = response_db(f, 8.0) + rng.gauss(0.0, 0.2);
        let phase = rng.gauss(0.0, 90.0);
        writeln!(out, "\"{f:.0}\",\"{db:.3}\",\"{phase:.1}\"")?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let sweep_path = "sample_saw_sweep.csv";
    write_sweep_export(sweep_path, &mut rng)?;
    println!("Wrote {POINTS} points (S21, S11) to {sweep_path}");

    let strict_path = "sample_saw_strict.csv";
    write_strict_export(strict_path, &mut rng)?;
    println!("Wrote {POINTS} points to {strict_path}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_matches_plotter_model() {
        // Reference values of the plotter's model at 25 pairs, span 0.5.
        assert!(response_db(CENTER_HZ, 0.0).abs() < 1e-12);
        assert!((response_db(CENTER_HZ, 6.0) + 6.0).abs() < 1e-12);

        // First null of the main lobe at f0(1 + 1/N) hits the noise floor.
        let null = CENTER_HZ * (1.0 + 1.0 / FINGER_PAIRS);
        assert!((response_db(null, 0.0) + 80.0).abs() < 1e-9);

        // Inside the lobe: sinc(x/π) · cos roll-off, in dB.
        let f = CENTER_HZ * 1.01;
        let x = FINGER_PAIRS * PI * 0.01;
        let expected = 20.0 * ((x.sin() / x) * (0.5 * PI * 0.01 / SPAN).cos()).log10();
        assert!((response_db(f, 0.0) - expected).abs() < 1e-9);
    }
}
