use std::collections::BTreeSet;
use std::fmt;

use super::Metrics;

// ---------------------------------------------------------------------------
// Confusion matrix
// ---------------------------------------------------------------------------

/// Counts of (true label, predicted label) pairs. Rows are true labels,
/// columns predicted labels, both in `labels` order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Build from paired truth and predictions. Labels are the sorted union
    /// of both.
    pub fn from_predictions(truth: &[String], predicted: &[String]) -> Self {
        let labels: Vec<String> = truth
            .iter()
            .chain(predicted)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (t, p) in truth.iter().zip(predicted) {
            // both labels are in `labels` by construction
            if let (Ok(i), Ok(j)) = (labels.binary_search(t), labels.binary_search(p)) {
                counts[i][j] += 1;
            }
        }
        ConfusionMatrix { labels, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    fn row_sum(&self, i: usize) -> usize {
        self.counts[i].iter().sum()
    }

    fn col_sum(&self, j: usize) -> usize {
        self.counts.iter().map(|row| row[j]).sum()
    }

    /// Classification metrics derived from the counts.
    ///
    /// Macro averages run over every label; a zero denominator scores 0.
    /// Balanced accuracy averages recall over labels present in the truth.
    pub fn metrics(&self) -> Metrics {
        let n = self.labels.len();
        let total = self.total();
        let correct: usize = (0..n).map(|i| self.counts[i][i]).sum();

        let recall: Vec<f64> = (0..n).map(|i| ratio(self.counts[i][i], self.row_sum(i))).collect();
        let precision: Vec<f64> = (0..n).map(|j| ratio(self.counts[j][j], self.col_sum(j))).collect();
        let f1: Vec<f64> = precision
            .iter()
            .zip(&recall)
            .map(|(p, r)| if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) })
            .collect();
        let present_recall: Vec<f64> = (0..n)
            .filter(|&i| self.row_sum(i) > 0)
            .map(|i| recall[i])
            .collect();

        vec![
            ("accuracy".to_string(), ratio(correct, total)),
            ("balanced_accuracy".to_string(), mean(&present_recall)),
            ("precision_macro".to_string(), mean(&precision)),
            ("recall_macro".to_string(), mean(&recall)),
            ("f1_macro".to_string(), mean(&f1)),
        ]
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "true\\pred")?;
        for label in &self.labels {
            write!(f, "\t{label}")?;
        }
        for (label, row) in self.labels.iter().zip(&self.counts) {
            write!(f, "\n{label}")?;
            for c in row {
                write!(f, "\t{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn s(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|x| x.to_string()).collect()
    }

    fn metric(m: &Metrics, name: &str) -> f64 {
        m.iter().find(|(k, _)| k == name).map(|(_, v)| *v).unwrap()
    }

    #[test]
    fn counts_true_by_predicted() {
        let cm = ConfusionMatrix::from_predictions(&s(&["a", "a", "b", "b"]), &s(&["a", "b", "b", "b"]));
        assert_eq!(cm.labels, s(&["a", "b"]));
        assert_eq!(cm.counts, vec![vec![1, 1], vec![0, 2]]);
        assert_eq!(cm.total(), 4);
    }

    #[test]
    fn metrics_follow_counts() {
        let cm = ConfusionMatrix::from_predictions(&s(&["a", "a", "b", "b"]), &s(&["a", "b", "b", "b"]));
        let m = cm.metrics();
        assert_eq!(metric(&m, "accuracy"), 0.75);
        // recall a = 0.5, b = 1.0
        assert_eq!(metric(&m, "balanced_accuracy"), 0.75);
        assert_eq!(metric(&m, "recall_macro"), 0.75);
        // precision a = 1.0, b = 2/3
        assert!((metric(&m, "precision_macro") - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn label_only_predicted_is_excluded_from_balanced_accuracy() {
        let cm = ConfusionMatrix::from_predictions(&s(&["a", "a"]), &s(&["a", "c"]));
        let m = cm.metrics();
        assert_eq!(metric(&m, "balanced_accuracy"), 0.5);
        assert_eq!(metric(&m, "recall_macro"), 0.25);
    }
}
