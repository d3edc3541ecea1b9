use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// MeasuredDataset – one loaded instrument export
// ---------------------------------------------------------------------------

/// A measured sweep with one frequency column and one or more amplitude
/// columns. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredDataset {
    /// File base name; the key in [`DatasetStore`].
    pub source_name: String,
    pub frequency_column: String,
    /// Every other column, in file order.
    pub amplitude_columns: Vec<String>,
    /// Column name → values. Missing cells are `NaN`.
    pub columns: BTreeMap<String, Vec<f64>>,
}

impl MeasuredDataset {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.columns
            .get(&self.frequency_column)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `[MHz, value]` pairs for one amplitude column, skipping rows where
    /// either cell is missing.
    pub fn curve_mhz(&self, column: &str) -> Option<Vec<[f64; 2]>> {
        if column == self.frequency_column {
            return None;
        }
        let freq = self.columns.get(&self.frequency_column)?;
        let amp = self.columns.get(column)?;
        Some(
            freq.iter()
                .zip(amp)
                .filter(|(f, a)| f.is_finite() && a.is_finite())
                .map(|(&f, &a)| [f / 1e6, a])
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// SweepTrace – strict three-field export
// ---------------------------------------------------------------------------

/// Frequency/dB pairs from the fixed-format loader.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepTrace {
    pub source_name: String,
    pub frequency_hz: Vec<f64>,
    pub magnitude_db: Vec<f64>,
}

impl SweepTrace {
    pub fn len(&self) -> usize {
        self.frequency_hz.len()
    }

    pub fn points_mhz(&self) -> Vec<[f64; 2]> {
        self.frequency_hz
            .iter()
            .zip(&self.magnitude_db)
            .map(|(&f, &db)| [f / 1e6, db])
            .collect()
    }

    /// `(min, max)` of the frequency axis in MHz.
    pub fn frequency_extent_mhz(&self) -> Option<(f64, f64)> {
        extent(self.frequency_hz.iter().map(|f| f / 1e6))
    }

    /// `(min, max)` of the dB values.
    pub fn magnitude_extent(&self) -> Option<(f64, f64)> {
        extent(self.magnitude_db.iter().copied())
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ---------------------------------------------------------------------------
// DatasetStore – session cache keyed by source name
// ---------------------------------------------------------------------------

/// Loaded datasets in load order. A load with an existing name replaces the
/// old entry in place.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    entries: Vec<MeasuredDataset>,
}

impl DatasetStore {
    /// Insert or replace by `source_name`. Returns `true` on replacement.
    pub fn insert(&mut self, dataset: MeasuredDataset) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|d| d.source_name == dataset.source_name)
        {
            Some(slot) => {
                *slot = dataset;
                true
            }
            None => {
                self.entries.push(dataset);
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MeasuredDataset> {
        self.entries.iter().find(|d| d.source_name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<MeasuredDataset> {
        let idx = self.entries.iter().position(|d| d.source_name == name)?;
        Some(self.entries.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeasuredDataset> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|d| d.source_name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(name: &str, amp: &[f64]) -> MeasuredDataset {
        let mut columns = BTreeMap::new();
        columns.insert("Freq".to_string(), vec![1e6, 2e6, 3e6]);
        columns.insert("S21".to_string(), amp.to_vec());
        MeasuredDataset {
            source_name: name.to_string(),
            frequency_column: "Freq".to_string(),
            amplitude_columns: vec!["S21".to_string()],
            columns,
        }
    }

    #[test]
    fn test_store_last_load_wins() {
        let mut store = DatasetStore::default();
        assert!(!store.insert(dataset("a.csv", &[1.0, 2.0, 3.0])));
        assert!(!store.insert(dataset("b.csv", &[1.0, 2.0, 3.0])));
        assert!(store.insert(dataset("a.csv", &[9.0, 9.0, 9.0])));

        assert_eq!(store.len(), 2);
        assert_eq!(store.names(), vec!["a.csv", "b.csv"]);
        assert_eq!(store.get("a.csv").unwrap().columns["S21"], vec![9.0, 9.0, 9.0]);
    }

    #[test]
    fn test_store_remove() {
        let mut store = DatasetStore::default();
        store.insert(dataset("a.csv", &[1.0, 2.0, 3.0]));
        assert!(store.remove("a.csv").is_some());
        assert!(store.remove("a.csv").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_curve_skips_missing_cells() {
        let ds = dataset("a.csv", &[-1.0, f64::NAN, -3.0]);
        let curve = ds.curve_mhz("S21").unwrap();
        assert_eq!(curve, vec![[1.0, -1.0], [3.0, -3.0]]);
        assert!(ds.curve_mhz("Freq").is_none());
        assert!(ds.curve_mhz("nope").is_none());
    }

    #[test]
    fn test_sweep_extents() {
        let trace = SweepTrace {
            source_name: "s.csv".to_string(),
            frequency_hz: vec![2e6, 1e6, 3e6],
            magnitude_db: vec![-3.0, -10.0, -1.5],
        };
        assert_eq!(trace.frequency_extent_mhz(), Some((1.0, 3.0)));
        assert_eq!(trace.magnitude_extent(), Some((-10.0, -1.5)));
    }
}
