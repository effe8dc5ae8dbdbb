use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};

use crate::data::model::CellValue;
use crate::eval::Metrics;

/// Column holding the subset size.
pub const K_COLUMN: &str = "k";
/// Column holding the subset's feature names.
pub const FEATURES_COLUMN: &str = "features";
/// Separator between feature names in [`FEATURES_COLUMN`]. Feature tables
/// whose column names contain it are rejected when loaded.
pub const FEATURE_SEPARATOR: &str = ";";

// ---------------------------------------------------------------------------
// ScoreRecord – one evaluated subset
// ---------------------------------------------------------------------------

/// Evaluator metrics plus subset size and feature names, as ordered
/// key/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    fields: Vec<(String, CellValue)>,
}

impl ScoreRecord {
    pub fn new(metrics: Metrics, features: &[String]) -> Self {
        let mut fields: Vec<(String, CellValue)> = metrics
            .into_iter()
            .map(|(k, v)| (k, CellValue::Float(v)))
            .collect();
        fields.push((K_COLUMN.to_string(), CellValue::Integer(features.len() as i64)));
        fields.push((
            FEATURES_COLUMN.to_string(),
            CellValue::String(features.join(FEATURE_SEPARATOR)),
        ));
        ScoreRecord { fields }
    }

    /// Set a field, replacing any existing value under the same key.
    #[cfg(test)]
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: CellValue) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Subset size.
    pub fn k(&self) -> Option<i64> {
        match self.get(K_COLUMN) {
            Some(CellValue::Integer(k)) => Some(*k),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ResultsTable – records aligned by key name
// ---------------------------------------------------------------------------

/// Rows in insertion order, columns in first-seen order.
///
/// A record bringing a key no earlier record had extends the schema: the new
/// column is appended and earlier rows read [`CellValue::Null`] there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultsTable {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ScoreRecord>,
    {
        let mut table = ResultsTable::default();
        for record in records {
            table.push(record);
        }
        table
    }

    pub fn push(&mut self, record: ScoreRecord) {
        for key in record.keys() {
            if !self.columns.iter().any(|c| c == key) {
                if !self.rows.is_empty() {
                    log::warn!("Score record introduced new column '{key}', extending table");
                }
                self.columns.push(key.to_string());
                for row in &mut self.rows {
                    row.push(CellValue::Null);
                }
            }
        }

        let row = self
            .columns
            .iter()
            .map(|c| record.get(c).cloned().unwrap_or(CellValue::Null))
            .collect();
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer
            .write_record(&self.columns)
            .context("writing results header")?;
        for (i, row) in self.rows.iter().enumerate() {
            writer
                .write_record(row.iter().map(|v| v.to_string()))
                .with_context(|| format!("writing results row {i}"))?;
        }
        writer.flush().context("flushing results file")?;
        Ok(())
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let columns: Vec<String> = reader
            .headers()
            .context("reading results header")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_no, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("results row {row_no}"))?;
            rows.push(
                (0..columns.len())
                    .map(|i| CellValue::guess(record.get(i).unwrap_or("")))
                    .collect(),
            );
        }
        Ok(ResultsTable { columns, rows })
    }
}

/// `<dir>/<prefix>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn timestamped_path<Tz>(dir: &Path, prefix: &str, ext: &str, at: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    dir.join(format!("{prefix}_{}.{ext}", at.format("%Y%m%d_%H%M%S")))
}
