use std::collections::BTreeMap;

use crate::data::model::LabeledRows;

use super::{ConfusionMatrix, EvalError, Evaluation, Evaluator};

// ---------------------------------------------------------------------------
// k-nearest-neighbour classifier
// ---------------------------------------------------------------------------

/// Nearest-neighbour classifier over z-scored features.
///
/// Standardisation is fitted on the training rows only. Prediction is a
/// majority vote of the `neighbors` closest training rows (Euclidean);
/// ties go to the label whose voters are closer in total, then to the
/// smaller label.
#[derive(Debug, Clone)]
pub struct KnnEvaluator {
    neighbors: usize,
    model: Option<Fitted>,
}

#[derive(Debug, Clone)]
struct Fitted {
    mean: Vec<f64>,
    scale: Vec<f64>,
    points: Vec<Vec<f64>>,
    labels: Vec<String>,
}

impl KnnEvaluator {
    pub fn new(neighbors: usize) -> Self {
        KnnEvaluator {
            neighbors: neighbors.max(1),
            model: None,
        }
    }
}

impl Fitted {
    fn standardise(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((v, m), s)| (v - m) / s)
            .collect()
    }

    fn predict(&self, row: &[f64], k: usize) -> String {
        let query = self.standardise(row);
        let mut distances: Vec<(f64, usize)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let d: f64 = p.iter().zip(&query).map(|(a, b)| (a - b).powi(2)).sum();
                (d.sqrt(), i)
            })
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        // label -> (votes, summed distance)
        let mut votes: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for &(d, i) in distances.iter().take(k) {
            let entry = votes.entry(self.labels[i].as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += d;
        }

        let mut best: Option<(&str, usize, f64)> = None;
        for (label, (count, dist)) in votes {
            let better = match best {
                None => true,
                Some((_, best_count, best_dist)) => {
                    count > best_count || (count == best_count && dist < best_dist)
                }
            };
            if better {
                best = Some((label, count, dist));
            }
        }
        best.map(|(label, _, _)| label.to_string()).unwrap_or_default()
    }
}

impl Evaluator for KnnEvaluator {
    fn fit(&mut self, train: &LabeledRows<'_>) -> Result<(), EvalError> {
        if train.is_empty() {
            return Err(EvalError::EmptyTraining);
        }
        let width = train.width();
        if width == 0 {
            return Err(EvalError::NoFeatures);
        }
        if self.neighbors > train.len() {
            return Err(EvalError::TooFewSamples {
                neighbors: self.neighbors,
                samples: train.len(),
            });
        }

        let n = train.len() as f64;
        let mut mean = Vec::with_capacity(width);
        let mut scale = Vec::with_capacity(width);
        for j in 0..width {
            let m = train.column(j).sum::<f64>() / n;
            let var = train.column(j).map(|v| (v - m).powi(2)).sum::<f64>() / n;
            mean.push(m);
            // constant columns are centred but left unscaled
            scale.push(if var > 0.0 { var.sqrt() } else { 1.0 });
        }

        let mut fitted = Fitted {
            mean,
            scale,
            points: Vec::with_capacity(train.len()),
            labels: train.labels.to_vec(),
        };
        fitted.points = train
            .features
            .iter()
            .map(|row| fitted.standardise(row))
            .collect();

        self.model = Some(fitted);
        Ok(())
    }

    fn evaluate(&self, held_out: &LabeledRows<'_>) -> Result<Evaluation, EvalError> {
        let model = self.model.as_ref().ok_or(EvalError::NotFitted)?;
        if held_out.is_empty() {
            return Err(EvalError::EmptyHeldOut);
        }
        if held_out.width() != model.mean.len() {
            return Err(EvalError::WidthMismatch {
                expected: model.mean.len(),
                found: held_out.width(),
            });
        }

        let predicted: Vec<String> = held_out
            .features
            .iter()
            .map(|row| model.predict(row, self.neighbors))
            .collect();
        let confusion = ConfusionMatrix::from_predictions(held_out.labels, &predicted);

        Ok(Evaluation {
            metrics: confusion.metrics(),
            confusion,
        })
    }
}
