use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use crate::config::RunConfig;
use crate::data::store::FeatureSet;
use crate::dispatch::{dispatch, run_kbest};
use crate::eval::KnnEvaluator;
use crate::report::chart::write_metric_chart;
use crate::results::{timestamped_path, ResultsTable, ScoreRecord};
use crate::select::Strategy;

// ---------------------------------------------------------------------------
// One sweep: load → enumerate → evaluate → aggregate → persist
// ---------------------------------------------------------------------------

/// What a finished run left on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub results: PathBuf,
    pub chart: Option<PathBuf>,
    pub rows: usize,
}

pub struct SweepApp {
    pub config: RunConfig,
}

impl SweepApp {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<RunOutput> {
        let cfg = &self.config;
        log::info!(
            "Starting {} sweep with {} worker(s), k-NN k={}",
            cfg.strategy,
            cfg.workers,
            cfg.neighbors
        );

        let set = cfg.store.load()?;
        let records = self.evaluate(&set)?;
        let table = ResultsTable::from_records(records);

        std::fs::create_dir_all(&cfg.output_dir)
            .with_context(|| format!("creating output directory {}", cfg.output_dir.display()))?;
        let results = timestamped_path(&cfg.output_dir, cfg.strategy.as_str(), "csv", &Local::now());
        table.write_csv(&results)?;
        log::info!("Wrote {} score records to {}", table.len(), results.display());

        let chart = match (cfg.chart, cfg.strategy) {
            (true, Strategy::Kbest) => {
                let path = results.with_extension("png");
                write_metric_chart(&table, &path)?;
                log::info!("Wrote metric chart to {}", path.display());
                Some(path)
            }
            (true, other) => {
                log::warn!("--chart only applies to kbest, ignoring for {other}");
                None
            }
            (false, _) => None,
        };

        Ok(RunOutput {
            results,
            chart,
            rows: table.len(),
        })
    }

    /// Score every candidate subset of the configured strategy.
    pub fn evaluate(&self, set: &FeatureSet) -> Result<Vec<ScoreRecord>> {
        let cfg = &self.config;
        let neighbors = cfg.neighbors;
        let make = || KnnEvaluator::new(neighbors);

        match cfg.strategy.candidates(&set.train.columns)? {
            Some(candidates) => {
                log::info!("Evaluating {} candidate subsets", candidates.total());
                dispatch(set, candidates, cfg.workers, make)
            }
            None => {
                if cfg.workers > 1 {
                    log::info!("kbest runs sequentially, ignoring {} workers", cfg.workers);
                }
                run_kbest(set, make)
            }
        }
    }
}
