use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Column-name conventions: <metric>_<statistic>_<n>
// ---------------------------------------------------------------------------

/// Closed set of statistic suffixes a feature column may carry.
pub const STATISTICS: [&str; 6] = ["average", "median", "std_dev", "iqr", "minimum", "maximum"];

/// Substitutions applied to metric-name tokens before alias-merged bucketing.
const ALIASES: [(&str, &str); 4] = [
    ("median", "average"),
    ("std_dev", "maximum"),
    ("minimum", "maximum"),
    ("acceleration", "velocity"),
];

/// Strip a trailing `_<digits>` suffix, if any.
pub fn strip_numeric_suffix(name: &str) -> &str {
    match name.rsplit_once('_') {
        Some((head, tail)) if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) => head,
        _ => name,
    }
}

/// The statistic a column summarises, e.g. `speed_average_3` → `average`.
pub fn statistic_of(column: &str) -> Option<&'static str> {
    let base = strip_numeric_suffix(column);
    STATISTICS.iter().copied().find(|stat| {
        base == *stat
            || base
                .strip_suffix(stat)
                .is_some_and(|head| head.ends_with('_'))
    })
}

/// The metric a column measures, e.g. `speed_median_7` → `speed`.
///
/// A name that is itself a statistic name keeps that name as its metric.
pub fn metric_name(column: &str) -> String {
    let base = strip_numeric_suffix(column);
    for stat in STATISTICS {
        if let Some(head) = base.strip_suffix(stat).and_then(|h| h.strip_suffix('_')) {
            if !head.is_empty() {
                return head.to_string();
            }
        }
    }
    base.to_string()
}

/// [`metric_name`] with every alias in [`ALIASES`] substituted token-wise.
pub fn canonical_metric(column: &str) -> String {
    let metric = metric_name(column);
    let tokens: Vec<&str> = metric.split('_').collect();
    let mut out: Vec<&str> = Vec::with_capacity(tokens.len());

    let mut i = 0;
    'tokens: while i < tokens.len() {
        for (from, to) in ALIASES {
            let pattern: Vec<&str> = from.split('_').collect();
            if tokens[i..].starts_with(&pattern) {
                out.push(to);
                i += pattern.len();
                continue 'tokens;
            }
        }
        out.push(tokens[i]);
        i += 1;
    }
    out.join("_")
}

// ---------------------------------------------------------------------------
// FeatureGroups – named buckets of column indices
// ---------------------------------------------------------------------------

/// Buckets of feature-column indices, keyed and iterated in key order.
/// Built once per run and never modified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureGroups {
    buckets: BTreeMap<String, Vec<usize>>,
}

impl FeatureGroups {
    /// Bucket by a key function; columns mapped to `None` join no bucket.
    pub fn build<F>(columns: &[String], key: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, col) in columns.iter().enumerate() {
            if let Some(k) = key(col) {
                buckets.entry(k).or_default().push(idx);
            }
        }
        FeatureGroups { buckets }
    }

    pub fn by_statistic(columns: &[String]) -> Self {
        Self::build(columns, |c| statistic_of(c).map(str::to_string))
    }

    pub fn by_metric(columns: &[String]) -> Self {
        Self::build(columns, |c| Some(metric_name(c)))
    }

    pub fn by_alias(columns: &[String]) -> Self {
        Self::build(columns, |c| Some(canonical_metric(c)))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[usize]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Keys holding column `idx`.
    #[cfg(test)]
    pub(crate) fn keys_of(&self, idx: usize) -> Vec<&str> {
        self.buckets
            .iter()
            .filter(|(_, cols)| cols.contains(&idx))
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Column index lists, one per bucket, in key order.
    pub fn members(&self) -> Vec<Vec<usize>> {
        self.buckets.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numeric_suffix_is_stripped_only_when_all_digits() {
        assert_eq!(strip_numeric_suffix("speed_average_3"), "speed_average");
        assert_eq!(strip_numeric_suffix("speed_average"), "speed_average");
        assert_eq!(strip_numeric_suffix("speed_3a"), "speed_3a");
        assert_eq!(strip_numeric_suffix("speed_"), "speed_");
    }

    #[test]
    fn statistic_bucket_is_unique() {
        let groups = FeatureGroups::by_statistic(&cols(&["speed_average_3", "heading_2"]));
        assert_eq!(groups.keys_of(0), vec!["average"]);
        assert!(groups.keys_of(1).is_empty());
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn statistic_needs_a_token_boundary() {
        assert_eq!(statistic_of("speed_std_dev_1"), Some("std_dev"));
        assert_eq!(statistic_of("speediqr"), None);
        assert_eq!(statistic_of("median_4"), Some("median"));
    }

    #[test]
    fn metric_name_strips_number_then_statistic() {
        assert_eq!(metric_name("speed_average_3"), "speed");
        assert_eq!(metric_name("speed_median_7"), "speed");
        assert_eq!(metric_name("turn_rate_std_dev_2"), "turn_rate");
        assert_eq!(metric_name("heading_2"), "heading");
        assert_eq!(metric_name("median_2"), "median");
    }

    #[test]
    fn metric_groups_collect_statistics_of_one_metric() {
        let groups = FeatureGroups::by_metric(&cols(&["speed_average_3", "speed_median_7", "turn_iqr_1"]));
        assert_eq!(groups.get("speed"), Some(&[0, 1][..]));
        assert_eq!(groups.get("turn"), Some(&[2][..]));
    }

    #[test]
    fn alias_merges_related_metrics() {
        let groups = FeatureGroups::by_alias(&cols(&[
            "median_1",
            "average_2",
            "acceleration_average_1",
            "velocity_iqr_1",
            "std_dev_1",
            "minimum_2",
            "maximum_3",
        ]));
        assert_eq!(groups.get("average"), Some(&[0, 1][..]));
        assert_eq!(groups.get("velocity"), Some(&[2, 3][..]));
        assert_eq!(groups.get("maximum"), Some(&[4, 5, 6][..]));
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn alias_substitutes_inside_compound_names() {
        assert_eq!(canonical_metric("angular_acceleration_median_2"), "angular_velocity");
        assert_eq!(canonical_metric("gap_std_dev_x_1"), "gap_maximum_x");
    }
}
