use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell as read from a feature file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` feature value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Null and NaN both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Parse a text cell, guessing the narrowest type.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// RawTable – one file as loaded, before any cleaning
// ---------------------------------------------------------------------------

/// Rectangular table straight from the loader. Every row has
/// `headers.len()` cells; absent cells are [`CellValue::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FeatureTable – cleaned numeric features plus separated group labels
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("group column '{0}' not found")]
    MissingGroupColumn(String),
    #[error("feature column '{column}' holds non-numeric value '{value}'")]
    NonNumeric { column: String, value: String },
    #[error("feature column name '{0}' contains ';', which separates feature names in results")]
    ReservedCharacter(String),
    #[error("held-out table is missing feature column '{0}'")]
    MissingFeatureColumn(String),
    #[error("feature index {index} out of range for {width} columns")]
    IndexOutOfRange { index: usize, width: usize },
}

/// Numeric feature rows with the group-identifier column separated out.
///
/// Invariant: no row holds a missing value and `groups.len() == rows.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    /// Feature column names, in column order.
    pub columns: Vec<String>,
    /// One `Vec<f64>` per sample, `columns.len()` wide.
    pub rows: Vec<Vec<f64>>,
    /// Group identifier (class label) per sample.
    pub groups: Vec<String>,
}

/// Owned column selection of a [`FeatureTable`], ready for an evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRows<'a> {
    pub features: Vec<Vec<f64>>,
    pub labels: &'a [String],
}

impl LabeledRows<'_> {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of selected feature columns.
    pub fn width(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }

    /// Values of one selected column, top to bottom.
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.features.iter().map(move |row| row[j])
    }
}

impl FeatureTable {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Resolve column indices to their names.
    pub fn names_for(&self, indices: &[usize]) -> Result<Vec<String>, DataError> {
        indices
            .iter()
            .map(|&i| {
                self.columns
                    .get(i)
                    .cloned()
                    .ok_or(DataError::IndexOutOfRange {
                        index: i,
                        width: self.columns.len(),
                    })
            })
            .collect()
    }

    /// Copy out the given columns, joined with the group labels.
    pub fn select(&self, indices: &[usize]) -> Result<LabeledRows<'_>, DataError> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.columns.len()) {
            return Err(DataError::IndexOutOfRange {
                index: bad,
                width: self.columns.len(),
            });
        }
        let features = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i]).collect())
            .collect();
        Ok(LabeledRows {
            features,
            labels: &self.groups,
        })
    }

    /// Reorder this table's columns to match `columns`, erroring on any
    /// column it does not have. Extra columns are discarded.
    pub fn aligned_to(&self, columns: &[String]) -> Result<FeatureTable, DataError> {
        let positions = columns
            .iter()
            .map(|name| {
                self.columns
                    .iter()
                    .position(|c| c == name)
                    .ok_or_else(|| DataError::MissingFeatureColumn(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureTable {
            columns: columns.to_vec(),
            rows: self
                .rows
                .iter()
                .map(|row| positions.iter().map(|&p| row[p]).collect())
                .collect(),
            groups: self.groups.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> FeatureTable {
        FeatureTable {
            columns: vec!["a".into(), "b".into(), "c".into()],
            rows: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            groups: vec!["x".into(), "y".into()],
        }
    }

    #[test]
    fn guess_picks_narrowest_type() {
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("7"), CellValue::Integer(7));
        assert_eq!(CellValue::guess("0.5"), CellValue::Float(0.5));
        assert_eq!(CellValue::guess("true"), CellValue::Bool(true));
        assert_eq!(CellValue::guess("abc"), CellValue::String("abc".into()));
    }

    #[test]
    fn nan_counts_as_missing() {
        assert!(CellValue::Float(f64::NAN).is_missing());
        assert!(CellValue::Null.is_missing());
        assert!(!CellValue::Integer(0).is_missing());
    }

    #[test]
    fn select_copies_requested_columns() {
        let t = table();
        let sel = t.select(&[2, 0]).unwrap();
        assert_eq!(sel.features, vec![vec![3.0, 1.0], vec![6.0, 4.0]]);
        assert_eq!(sel.labels, &["x".to_string(), "y".to_string()][..]);
        assert_eq!(sel.width(), 2);
    }

    #[test]
    fn select_rejects_out_of_range_index() {
        let err = table().select(&[0, 3]).unwrap_err();
        assert_eq!(err, DataError::IndexOutOfRange { index: 3, width: 3 });
    }

    #[test]
    fn aligned_to_reorders_and_reports_missing() {
        let t = table();
        let aligned = t.aligned_to(&["c".into(), "a".into()]).unwrap();
        assert_eq!(aligned.rows, vec![vec![3.0, 1.0], vec![6.0, 4.0]]);

        let err = t.aligned_to(&["zzz".into()]).unwrap_err();
        assert_eq!(err, DataError::MissingFeatureColumn("zzz".into()));
    }
}
