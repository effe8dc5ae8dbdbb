use super::grouping::FeatureGroups;
use super::SelectError;

/// A candidate subset: sorted, de-duplicated feature column indices.
pub type Subset = Vec<usize>;

/// Largest item count whose powerset size still fits in a `u64`.
pub const MAX_ITEMS: usize = 63;

// ---------------------------------------------------------------------------
// Powerset – lazy enumeration of every non-empty index combination
// ---------------------------------------------------------------------------

/// Every non-empty subset of `0..n`, by ascending size, lexicographic
/// within a size. Yields exactly `2^n - 1` items.
#[derive(Debug, Clone)]
pub struct Powerset {
    n: usize,
    current: Vec<usize>,
    done: bool,
}

impl Powerset {
    pub fn new(n: usize) -> Result<Self, SelectError> {
        if n > MAX_ITEMS {
            return Err(SelectError::TooManyItems { n, max: MAX_ITEMS });
        }
        Ok(Powerset {
            n,
            current: Vec::new(),
            done: n == 0,
        })
    }

    /// Total number of subsets this powerset yields from the start.
    pub fn total(&self) -> u64 {
        if self.n == 0 {
            0
        } else {
            (1u64 << self.n) - 1
        }
    }
}

impl Iterator for Powerset {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if self.current.is_empty() {
            self.current.push(0);
            return Some(self.current.clone());
        }

        let n = self.n;
        let r = self.current.len();
        match (0..r).rev().find(|&i| self.current[i] < n - r + i) {
            Some(i) => {
                self.current[i] += 1;
                for j in i + 1..r {
                    self.current[j] = self.current[j - 1] + 1;
                }
            }
            None if r == n => {
                self.done = true;
                return None;
            }
            None => self.current = (0..=r).collect(),
        }
        Some(self.current.clone())
    }
}

// ---------------------------------------------------------------------------
// Candidates – powerset over items, each item a set of columns
// ---------------------------------------------------------------------------

/// Lazy candidate subsets for one run. Items are either single columns or
/// whole feature groups; each powerset pick is flattened into column indices.
#[derive(Debug, Clone)]
pub struct Candidates {
    items: Vec<Vec<usize>>,
    powerset: Powerset,
}

impl Candidates {
    /// Powerset over individual columns `0..n`.
    pub fn columns(n: usize) -> Result<Self, SelectError> {
        Self::over((0..n).map(|i| vec![i]).collect())
    }

    /// Powerset over group keys.
    pub fn groups(groups: &FeatureGroups) -> Result<Self, SelectError> {
        Self::over(groups.members())
    }

    fn over(items: Vec<Vec<usize>>) -> Result<Self, SelectError> {
        let powerset = Powerset::new(items.len())?;
        Ok(Candidates { items, powerset })
    }

    /// Number of subsets the run will evaluate.
    pub fn total(&self) -> u64 {
        self.powerset.total()
    }
}

impl Iterator for Candidates {
    type Item = Subset;

    fn next(&mut self) -> Option<Subset> {
        let pick = self.powerset.next()?;
        let mut subset: Subset = pick
            .into_iter()
            .flat_map(|i| self.items[i].iter().copied())
            .collect();
        subset.sort_unstable();
        subset.dedup();
        Some(subset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn powerset_counts_and_uniqueness() {
        for n in 1..=8 {
            let all: Vec<Vec<usize>> = Powerset::new(n).unwrap().collect();
            assert_eq!(all.len() as u64, (1u64 << n) - 1, "n = {n}");
            assert!(all.iter().all(|s| !s.is_empty()));
            let unique: BTreeSet<_> = all.iter().cloned().collect();
            assert_eq!(unique.len(), all.len());
        }
    }

    #[test]
    fn powerset_orders_by_size_then_lexicographically() {
        let all: Vec<Vec<usize>> = Powerset::new(3).unwrap().collect();
        assert_eq!(
            all,
            vec![
                vec![0],
                vec![1],
                vec![2],
                vec![0, 1],
                vec![0, 2],
                vec![1, 2],
                vec![0, 1, 2],
            ]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(Powerset::new(0).unwrap().count(), 0);
        assert_eq!(Candidates::columns(0).unwrap().total(), 0);
    }

    #[test]
    fn too_many_items_is_rejected() {
        let err = Powerset::new(64).unwrap_err();
        assert_eq!(err, SelectError::TooManyItems { n: 64, max: 63 });
    }

    #[test]
    fn group_candidates_flatten_to_columns() {
        let names: Vec<String> = ["speed_average_1", "turn_average_1", "speed_iqr_1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let groups = FeatureGroups::by_metric(&names);
        let subsets: Vec<Subset> = Candidates::groups(&groups).unwrap().collect();
        assert_eq!(subsets, vec![vec![0, 2], vec![1], vec![0, 1, 2]]);
    }

    #[test]
    fn regenerating_gives_the_same_sequence() {
        let a: Vec<Subset> = Candidates::columns(5).unwrap().collect();
        let b: Vec<Subset> = Candidates::columns(5).unwrap().collect();
        assert_eq!(a, b);
    }
}
