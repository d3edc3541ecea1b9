use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use super::model::{MeasuredDataset, SweepTrace};
use crate::error::{FormatError, LoadError};

/// Header row of an instrument export with metadata lines on top.
pub const DEFAULT_HEADER_ROW: usize = 2;
/// Header row tried when the default one has no frequency column.
pub const FALLBACK_HEADER_ROW: usize = 0;
/// Preamble lines of the fixed three-field sweep format.
pub const SWEEP_SKIP_LINES: usize = 3;

const SWEEP_FIELDS: usize = 3;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a measured dataset, detecting the frequency column by name.
///
/// The (non-blank) line `header_row` is tried as the header first. When none
/// of its names contains "freq", `fallback_header_row` is used instead and
/// the first column becomes the frequency column if nothing matches there.
pub fn load_dataset(
    path: &Path,
    header_row: usize,
    fallback_header_row: usize,
) -> Result<MeasuredDataset, LoadError> {
    let name = source_name(path);
    let text = read_text(path)?;
    parse_dataset(&name, &text, header_row, fallback_header_row)
        .map_err(|e| LoadError::format(&name, e))
}

/// Load several files independently. One failure never stops the others.
pub fn load_datasets(
    paths: &[PathBuf],
    header_row: usize,
    fallback_header_row: usize,
) -> Vec<(PathBuf, Result<MeasuredDataset, LoadError>)> {
    paths
        .iter()
        .map(|p| (p.clone(), load_dataset(p, header_row, fallback_header_row)))
        .collect()
}

/// Load a fixed-format `frequency,dB,extra` sweep after `skip_lines` lines.
pub fn load_sweep(path: &Path, skip_lines: usize) -> Result<SweepTrace, LoadError> {
    let name = source_name(path);
    let text = read_text(path)?;
    parse_sweep(&name, &text, skip_lines).map_err(|e| LoadError::format(&name, e))
}

/// File base name used as the dataset key.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Instrument exports are not always UTF-8 (e.g. a Latin-1 "µ" in a comment line).
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ---------------------------------------------------------------------------
// Header-detecting loader
// ---------------------------------------------------------------------------

/// A non-blank CSV record with its 1-based line number.
struct Row {
    line: usize,
    record: StringRecord,
}

pub fn parse_dataset(
    name: &str,
    text: &str,
    header_row: usize,
    fallback_header_row: usize,
) -> Result<MeasuredDataset, FormatError> {
    let rows = read_rows(text)?;

    let header_idx = if rows.get(header_row).is_some_and(|r| has_frequency_column(&r.record)) {
        header_row
    } else {
        log::debug!(
            "{name}: no frequency column on row {header_row}, using row {fallback_header_row}"
        );
        fallback_header_row
    };
    let header = rows
        .get(header_idx)
        .ok_or(FormatError::MissingHeader(header_idx))?;

    let names = column_names(&header.record);
    let freq_idx = names.iter().position(|n| is_frequency_name(n)).unwrap_or(0);
    let frequency_column = names[freq_idx].clone();
    let amplitude_columns: Vec<String> = names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != freq_idx)
        .map(|(_, n)| n.clone())
        .collect();
    if amplitude_columns.is_empty() {
        return Err(FormatError::NoAmplitudeColumn(frequency_column));
    }

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for row in &rows[header_idx + 1..] {
        for (col, column_values) in values.iter_mut().enumerate() {
            let cell = row.record.get(col).unwrap_or("");
            column_values.push(parse_cell(cell, row.line, &names[col])?);
        }
    }

    let columns: BTreeMap<String, Vec<f64>> = names.into_iter().zip(values).collect();

    Ok(MeasuredDataset {
        source_name: name.to_string(),
        frequency_column,
        amplitude_columns,
        columns,
    })
}

fn read_rows(text: &str) -> Result<Vec<Row>, FormatError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line() as usize);
        rows.push(Row { line, record });
    }
    Ok(rows)
}

fn is_frequency_name(name: &str) -> bool {
    name.to_lowercase().contains("freq")
}

fn has_frequency_column(record: &StringRecord) -> bool {
    record.iter().any(is_frequency_name)
}

/// Trimmed header names. Blank names become `Unnamed: <i>` and repeats get a
/// `.1`, `.2`, … suffix so every column stays addressable.
fn column_names(header: &StringRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (i, raw) in header.iter().enumerate() {
        let base = match raw.trim() {
            "" => format!("Unnamed: {i}"),
            s => s.to_string(),
        };
        let mut name = base.clone();
        let mut n = 1;
        while names.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        names.push(name);
    }
    names
}

fn parse_cell(cell: &str, line: usize, column: &str) -> Result<f64, FormatError> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| FormatError::NotNumeric {
        line,
        column: column.to_string(),
        value: cell.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Fixed-format sweep loader
// ---------------------------------------------------------------------------

/// Parse `frequency,dB,extra` lines. Fields may be wrapped in double quotes;
/// the third field is ignored. Blank lines are skipped.
pub fn parse_sweep(name: &str, text: &str, skip_lines: usize) -> Result<SweepTrace, FormatError> {
    let mut frequency_hz = Vec::new();
    let mut magnitude_db = Vec::new();

    for (idx, raw) in text.lines().enumerate().skip(skip_lines) {
        let line = raw.trim().trim_matches('"');
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields: Vec<&str> = line
            .split(',')
            .map(|f| f.trim().trim_matches('"').trim())
            .collect();
        if fields.len() != SWEEP_FIELDS {
            return Err(FormatError::FieldCount {
                line: line_no,
                expected: SWEEP_FIELDS,
                found: fields.len(),
            });
        }
        frequency_hz.push(parse_field(fields[0], line_no, "Frequency")?);
        magnitude_db.push(parse_field(fields[1], line_no, "dB")?);
    }

    if frequency_hz.is_empty() {
        return Err(FormatError::Empty);
    }

    Ok(SweepTrace {
        source_name: name.to_string(),
        frequency_hz,
        magnitude_db,
    })
}

fn parse_field(field: &str, line: usize, column: &str) -> Result<f64, FormatError> {
    field.parse::<f64>().map_err(|_| FormatError::NotNumeric {
        line,
        column: column.to_string(),
        value: field.to_string(),
    })
}
