use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Invalid physical filter parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("center frequency must be positive, got {0} Hz")]
    CenterFrequency(f64),

    #[error("span fraction must lie in (0, 1] and be wide enough to sample, got {0}")]
    Span(f64),

    #[error("finger count must be at least 2, got {0}")]
    FingerCount(u32),

    #[error("zero bandwidth must be a non-negative number, got {0} Hz")]
    ZeroBandwidth(f64),
}

/// The file was readable but its contents do not match the expected layout.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("no header row at line {0}")]
    MissingHeader(usize),

    #[error("no amplitude column besides '{0}'")]
    NoAmplitudeColumn(String),

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column '{column}': '{value}' is not a number")]
    NotNumeric {
        line: usize,
        column: String,
        value: String,
    },

    #[error("no data rows")]
    Empty,

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Failure to ingest one measurement file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}: {source}")]
    Format {
        file: String,
        #[source]
        source: FormatError,
    },
}

impl LoadError {
    pub fn format(file: &str, source: FormatError) -> Self {
        LoadError::Format {
            file: file.to_string(),
            source,
        }
    }
}
