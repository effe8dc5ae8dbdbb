use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::data::model::FeatureTable;

use super::subsets::Subset;

// ---------------------------------------------------------------------------
// Univariate ANOVA F-test against the group labels
// ---------------------------------------------------------------------------

/// One-way ANOVA F-statistic of a single feature across label classes.
///
/// NaN when it is undefined: fewer than two classes, no within-class
/// degrees of freedom, or a feature constant everywhere.
pub fn f_statistic(values: &[f64], labels: &[String]) -> f64 {
    let mut classes: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for (v, label) in values.iter().zip(labels) {
        let entry = classes.entry(label.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += v;
    }

    let n = values.len();
    let g = classes.len();
    if g < 2 || n <= g {
        return f64::NAN;
    }

    let grand_mean = values.iter().sum::<f64>() / n as f64;
    let class_means: BTreeMap<&str, f64> = classes
        .iter()
        .map(|(k, (count, sum))| (*k, sum / *count as f64))
        .collect();

    let between: f64 = classes
        .iter()
        .map(|(k, (count, _))| *count as f64 * (class_means[k] - grand_mean).powi(2))
        .sum();
    let within: f64 = values
        .iter()
        .zip(labels)
        .map(|(v, label)| (v - class_means[label.as_str()]).powi(2))
        .sum();

    let df_between = (g - 1) as f64;
    let df_within = (n - g) as f64;
    if within == 0.0 {
        return if between == 0.0 { f64::NAN } else { f64::INFINITY };
    }
    (between / df_between) / (within / df_within)
}

/// F-statistic for every feature column of `table`.
pub fn f_scores(table: &FeatureTable) -> Vec<f64> {
    (0..table.n_features())
        .map(|j| {
            let column: Vec<f64> = table.rows.iter().map(|row| row[j]).collect();
            f_statistic(&column, &table.groups)
        })
        .collect()
}

/// Column indices from best to worst score. NaN ranks last; ties keep
/// column order.
pub fn rank(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| match (scores[a].is_nan(), scores[b].is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => scores[b].total_cmp(&scores[a]),
    });
    order
}

/// The `k` best-ranked columns, in column order.
pub fn top_k(ranking: &[usize], k: usize) -> Subset {
    let mut subset: Subset = ranking.iter().take(k).copied().collect();
    subset.sort_unstable();
    subset
}

/// Subsets for `k = m, m-1, ..., 1` over a fixed ranking.
pub fn descending_subsets(ranking: &[usize]) -> impl Iterator<Item = (usize, Subset)> + '_ {
    (1..=ranking.len()).rev().map(move |k| (k, top_k(ranking, k)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(ls: &[&str]) -> Vec<String> {
        ls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn f_statistic_matches_hand_computation() {
        // classes a: [1, 2, 3], b: [5, 6, 7]; grand mean 4
        // between = 3*4 + 3*4 = 24, df 1; within = 2 + 2 = 4, df 4
        let f = f_statistic(&[1.0, 2.0, 3.0, 5.0, 6.0, 7.0], &labels(&["a", "a", "a", "b", "b", "b"]));
        assert!((f - 24.0).abs() < 1e-12, "f = {f}");
    }

    #[test]
    fn constant_feature_scores_nan() {
        let f = f_statistic(&[2.0, 2.0, 2.0, 2.0], &labels(&["a", "a", "b", "b"]));
        assert!(f.is_nan());
    }

    #[test]
    fn single_class_scores_nan() {
        assert!(f_statistic(&[1.0, 2.0], &labels(&["a", "a"])).is_nan());
    }

    #[test]
    fn rank_puts_nan_last_and_keeps_ties_stable() {
        let order = rank(&[1.0, f64::NAN, 5.0, 1.0, f64::INFINITY]);
        assert_eq!(order, vec![4, 2, 0, 3, 1]);
    }

    #[test]
    fn descending_subsets_shrink_one_at_a_time() {
        let ranking = vec![2, 0, 1];
        let all: Vec<(usize, Subset)> = descending_subsets(&ranking).collect();
        assert_eq!(all, vec![(3, vec![0, 1, 2]), (2, vec![0, 2]), (1, vec![2])]);
    }
}
