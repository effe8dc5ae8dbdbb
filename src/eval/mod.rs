//! The evaluator seam: fit on a training subset, score on a held-out one.

use thiserror::Error;

use crate::data::model::LabeledRows;

pub mod knn;
pub mod metrics;

pub use knn::KnnEvaluator;
pub use metrics::ConfusionMatrix;

/// Metric name → value, in the order the evaluator reports them.
pub type Metrics = Vec<(String, f64)>;

#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("training subset has no rows")]
    EmptyTraining,
    #[error("held-out subset has no rows")]
    EmptyHeldOut,
    #[error("subset selects no feature columns")]
    NoFeatures,
    #[error("expected n_neighbors <= n_samples, got {neighbors} > {samples}")]
    TooFewSamples { neighbors: usize, samples: usize },
    #[error("held-out subset has {found} columns, model was fitted on {expected}")]
    WidthMismatch { expected: usize, found: usize },
    #[error("evaluate called before fit")]
    NotFitted,
}

/// Outcome of one held-out evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub metrics: Metrics,
    pub confusion: ConfusionMatrix,
}

/// A model that can be fitted on labelled rows and scored on held-out rows.
///
/// The dispatcher builds a fresh instance per subset, so implementations
/// never see two subsets.
pub trait Evaluator {
    fn fit(&mut self, train: &LabeledRows<'_>) -> Result<(), EvalError>;

    fn evaluate(&self, held_out: &LabeledRows<'_>) -> Result<Evaluation, EvalError>;
}
