use std::path::PathBuf;

use anyhow::{Context, Result};

use super::filter::into_feature_table;
use super::loader::load_file;
use super::model::FeatureTable;

// ---------------------------------------------------------------------------
// File-backed feature store
// ---------------------------------------------------------------------------

/// Training and held-out tables, cleaned and column-aligned.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub train: FeatureTable,
    pub test: FeatureTable,
}

/// Where the training and held-out feature files live and how to clean them.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub group_column: String,
    pub drop_columns: Vec<String>,
}

impl FeatureStore {
    /// Load both tables. The held-out table is reordered to the training
    /// table's feature columns.
    pub fn load(&self) -> Result<FeatureSet> {
        let train = self
            .load_one(&self.train_path)
            .context("preparing training table")?;
        let test = self
            .load_one(&self.test_path)
            .context("preparing held-out table")?
            .aligned_to(&train.columns)?;

        log::info!(
            "Feature set ready: {} features, {} training rows, {} held-out rows",
            train.n_features(),
            train.len(),
            test.len()
        );
        Ok(FeatureSet { train, test })
    }

    fn load_one(&self, path: &std::path::Path) -> Result<FeatureTable> {
        let raw = load_file(path)?;
        let table = into_feature_table(raw, &self.group_column, &self.drop_columns)
            .with_context(|| format!("cleaning {}", path.display()))?;
        Ok(table)
    }
}
