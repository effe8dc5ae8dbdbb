//! Subset evaluation: one fresh evaluator per subset, run inline or on a
//! fixed pool of worker threads.
//!
//! The pool bridges the lazy subset generator into a rayon thread pool and
//! collects self-contained [`ScoreRecord`]s in completion order. The first
//! failure stops the pool and is returned.

use anyhow::{Context, Result};
use rayon::iter::{ParallelBridge, ParallelIterator};

use crate::data::store::FeatureSet;
use crate::eval::Evaluator;
use crate::results::ScoreRecord;
use crate::select::kbest;
use crate::select::subsets::Subset;

/// Fit `evaluator` on the subset's training columns and score it on the
/// same columns of the held-out table.
pub fn evaluate_subset<E: Evaluator>(
    mut evaluator: E,
    set: &FeatureSet,
    subset: &[usize],
) -> Result<ScoreRecord> {
    let names = set.train.names_for(subset)?;
    let train = set.train.select(subset)?;
    let test = set.test.select(subset)?;

    evaluator
        .fit(&train)
        .with_context(|| format!("fitting on [{}]", names.join(", ")))?;
    let evaluation = evaluator
        .evaluate(&test)
        .with_context(|| format!("evaluating on [{}]", names.join(", ")))?;

    log::debug!(
        "k={} [{}] {:?}\n{}",
        names.len(),
        names.join(", "),
        evaluation.metrics,
        evaluation.confusion
    );
    Ok(ScoreRecord::new(evaluation.metrics, &names))
}

/// Evaluate every subset from `subsets` with `workers` threads (at least one).
///
/// Records come back in completion order. With one worker everything runs
/// on the calling thread in generation order.
pub fn dispatch<I, F, E>(set: &FeatureSet, subsets: I, workers: usize, make: F) -> Result<Vec<ScoreRecord>>
where
    I: Iterator<Item = Subset> + Send,
    F: Fn() -> E + Sync + Send,
    E: Evaluator,
{
    let workers = workers.max(1);
    if workers == 1 {
        return subsets
            .map(|subset| evaluate_subset(make(), set, &subset))
            .collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("sweep-worker-{i}"))
        .build()
        .context("building worker pool")?;
    log::debug!("evaluating on {} worker threads", pool.current_num_threads());

    pool.install(|| {
        subsets
            .par_bridge()
            .map(|subset| evaluate_subset(make(), set, &subset))
            .collect::<Result<Vec<_>>>()
    })
}

/// Sequential k-best run: rank features once by ANOVA F against the
/// training labels, then evaluate the top `k` for `k = m` down to 1.
pub fn run_kbest<F, E>(set: &FeatureSet, make: F) -> Result<Vec<ScoreRecord>>
where
    F: Fn() -> E,
    E: Evaluator,
{
    let scores = kbest::f_scores(&set.train);
    let ranking = kbest::rank(&scores);
    log::info!(
        "k-best ranking: {:?}",
        ranking
            .iter()
            .map(|&i| (set.train.columns[i].as_str(), scores[i]))
            .collect::<Vec<_>>()
    );

    kbest::descending_subsets(&ranking)
        .map(|(k, subset)| {
            evaluate_subset(make(), set, &subset).with_context(|| format!("k-best at k={k}"))
        })
        .collect()
}
