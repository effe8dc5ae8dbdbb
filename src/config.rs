use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;
use crate::data::store::FeatureStore;
use crate::select::Strategy;

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

/// Optional JSON settings; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub train: PathBuf,
    pub test: PathBuf,
    pub group_column: String,
    pub drop_columns: Vec<String>,
    pub neighbors: usize,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            train: PathBuf::from("train.parquet"),
            test: PathBuf::from("test.parquet"),
            group_column: "group".to_string(),
            drop_columns: vec!["id".to_string()],
            neighbors: 5,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing settings {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// RunConfig – everything one run needs, passed down explicitly
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub strategy: Strategy,
    pub workers: usize,
    pub store: FeatureStore,
    pub neighbors: usize,
    pub output_dir: PathBuf,
    pub chart: bool,
}

impl RunConfig {
    /// Settings file (if any) overlaid with command-line flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let settings = match &cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Ok(Self::from_parts(cli, settings))
    }

    pub fn from_parts(cli: &Cli, settings: Settings) -> Self {
        let drop_columns = if cli.drop_columns.is_empty() {
            settings.drop_columns
        } else {
            cli.drop_columns.clone()
        };
        RunConfig {
            strategy: cli.strategy,
            workers: worker_count(cli.workers),
            store: FeatureStore {
                train_path: cli.train.clone().unwrap_or(settings.train),
                test_path: cli.test.clone().unwrap_or(settings.test),
                group_column: cli.group_column.clone().unwrap_or(settings.group_column),
                drop_columns,
            },
            neighbors: cli.neighbors.unwrap_or(settings.neighbors),
            output_dir: cli.output_dir.clone().unwrap_or(settings.output_dir),
            chart: cli.chart,
        }
    }
}

/// Requested pool size, with anything below one meaning one.
pub fn worker_count(requested: i64) -> usize {
    usize::try_from(requested).unwrap_or(0).max(1)
}
