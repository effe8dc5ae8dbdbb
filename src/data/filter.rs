use super::model::{CellValue, DataError, FeatureTable, RawTable};
use crate::results::FEATURE_SEPARATOR;

// ---------------------------------------------------------------------------
// Cleaning: raw file table → FeatureTable
// ---------------------------------------------------------------------------

/// Remove the named columns. Names the table does not have are ignored.
pub fn drop_columns(raw: &mut RawTable, names: &[String]) {
    let keep: Vec<bool> = raw
        .headers
        .iter()
        .map(|h| !names.iter().any(|n| n == h))
        .collect();
    if keep.iter().all(|&k| k) {
        return;
    }

    raw.headers = retain_by_mask(std::mem::take(&mut raw.headers), &keep);
    for row in &mut raw.rows {
        *row = retain_by_mask(std::mem::take(row), &keep);
    }
}

fn retain_by_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, &k)| k.then_some(item))
        .collect()
}

/// Return indices of rows holding no missing value in any column.
pub fn complete_rows(raw: &RawTable) -> Vec<usize> {
    raw.rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.iter().any(CellValue::is_missing))
        .map(|(i, _)| i)
        .collect()
}

/// Turn a loaded file into a [`FeatureTable`].
///
/// * `drop` columns (the row identifier) are removed if present.
/// * Rows with any missing cell are removed entirely.
/// * `group_column` is separated out as the label vector.
/// * Every remaining column must be numeric, and its name must not contain
///   [`FEATURE_SEPARATOR`].
pub fn into_feature_table(
    mut raw: RawTable,
    group_column: &str,
    drop: &[String],
) -> Result<FeatureTable, DataError> {
    drop_columns(&mut raw, drop);

    let group_idx = raw
        .column_index(group_column)
        .ok_or_else(|| DataError::MissingGroupColumn(group_column.to_string()))?;

    let complete = complete_rows(&raw);
    let dropped = raw.len() - complete.len();
    if dropped > 0 {
        log::info!("Dropped {dropped} of {} rows with missing values", raw.len());
    }

    let columns: Vec<String> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != group_idx)
        .map(|(_, h)| h.clone())
        .collect();
    if let Some(bad) = columns.iter().find(|c| c.contains(FEATURE_SEPARATOR)) {
        return Err(DataError::ReservedCharacter(bad.clone()));
    }

    let mut rows = Vec::with_capacity(complete.len());
    let mut groups = Vec::with_capacity(complete.len());

    for row_idx in complete {
        let record = &raw.rows[row_idx];
        let mut values = Vec::with_capacity(columns.len());
        for (col_idx, cell) in record.iter().enumerate() {
            if col_idx == group_idx {
                continue;
            }
            let v = cell.as_f64().ok_or_else(|| DataError::NonNumeric {
                column: raw.headers[col_idx].clone(),
                value: cell.to_string(),
            })?;
            values.push(v);
        }
        rows.push(values);
        groups.push(record[group_idx].to_string());
    }

    Ok(FeatureTable {
        columns,
        rows,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw() -> RawTable {
        RawTable {
            headers: vec!["id".into(), "speed_average_1".into(), "group".into(), "turn_iqr_1".into()],
            rows: vec![
                vec![CellValue::Integer(0), CellValue::Float(1.5), CellValue::String("a".into()), CellValue::Integer(2)],
                vec![CellValue::Integer(1), CellValue::Null, CellValue::String("b".into()), CellValue::Integer(3)],
                vec![CellValue::Integer(2), CellValue::Float(f64::NAN), CellValue::String("b".into()), CellValue::Integer(3)],
                vec![CellValue::Integer(3), CellValue::Float(0.5), CellValue::String("b".into()), CellValue::Integer(4)],
                vec![CellValue::Integer(4), CellValue::Float(0.5), CellValue::Null, CellValue::Integer(4)],
            ],
        }
    }

    #[test]
    fn cleans_identifier_group_and_missing_rows() {
        let table = into_feature_table(raw(), "group", &["id".into()]).unwrap();
        assert_eq!(table.columns, vec!["speed_average_1".to_string(), "turn_iqr_1".to_string()]);
        assert_eq!(table.rows, vec![vec![1.5, 2.0], vec![0.5, 4.0]]);
        assert_eq!(table.groups, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn absent_drop_columns_are_ignored() {
        let mut t = raw();
        drop_columns(&mut t, &["not_there".into(), "row_uuid".into()]);
        assert_eq!(t.headers.len(), 4);
        assert!(t.rows.iter().all(|r| r.len() == 4));
    }

    #[test]
    fn missing_group_column_is_an_error() {
        let err = into_feature_table(raw(), "label", &[]).unwrap_err();
        assert_eq!(err, DataError::MissingGroupColumn("label".into()));
    }

    #[test]
    fn text_in_feature_column_is_an_error() {
        let t = RawTable {
            headers: vec!["f".into(), "group".into()],
            rows: vec![vec![CellValue::String("fast".into()), CellValue::Integer(1)]],
        };
        let err = into_feature_table(t, "group", &[]).unwrap_err();
        assert_eq!(
            err,
            DataError::NonNumeric {
                column: "f".into(),
                value: "fast".into()
            }
        );
    }

    #[test]
    fn separator_in_feature_name_is_an_error() {
        let t = RawTable {
            headers: vec!["speed;turn_average_1".into(), "group".into()],
            rows: vec![vec![CellValue::Float(1.0), CellValue::String("a".into())]],
        };
        let err = into_feature_table(t, "group", &[]).unwrap_err();
        assert_eq!(err, DataError::ReservedCharacter("speed;turn_average_1".into()));
    }

    #[test]
    fn separator_in_dropped_or_group_column_is_allowed() {
        let t = RawTable {
            headers: vec!["row;id".into(), "f".into(), "class;label".into()],
            rows: vec![vec![CellValue::Integer(0), CellValue::Float(1.0), CellValue::String("a".into())]],
        };
        let table = into_feature_table(t, "class;label", &["row;id".into()]).unwrap();
        assert_eq!(table.columns, vec!["f".to_string()]);
    }
}
