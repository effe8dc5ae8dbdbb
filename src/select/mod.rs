//! Candidate subset generation.
//!
//! ```text
//!   feature columns
//!        │
//!        ├── powerset ─────────────────┐
//!        ├── statistic ─┐              │
//!        ├── metric ────┼─ grouping ───┼─ subsets::Candidates → dispatch
//!        ├── alias ─────┘              │
//!        └── kbest ── kbest::rank ─────┴─ (sequential)
//! ```

use std::fmt;

use thiserror::Error;

pub mod grouping;
pub mod kbest;
pub mod subsets;

use grouping::FeatureGroups;
use subsets::Candidates;

#[derive(Debug, Error, PartialEq)]
pub enum SelectError {
    #[error("cannot enumerate the powerset of {n} items (at most {max})")]
    TooManyItems { n: usize, max: usize },
}

/// How candidate subsets are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Powerset of individual feature columns.
    Powerset,
    /// Powerset of statistic-suffix groups.
    Statistic,
    /// Powerset of metric-name groups.
    Metric,
    /// Powerset of alias-merged metric groups.
    Alias,
    /// Univariate top-k, k from all features down to one.
    Kbest,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Powerset => "powerset",
            Strategy::Statistic => "statistic",
            Strategy::Metric => "metric",
            Strategy::Alias => "alias",
            Strategy::Kbest => "kbest",
        }
    }

    /// Groups the strategy enumerates over, for the grouped strategies.
    pub fn groups(self, columns: &[String]) -> Option<FeatureGroups> {
        match self {
            Strategy::Statistic => Some(FeatureGroups::by_statistic(columns)),
            Strategy::Metric => Some(FeatureGroups::by_metric(columns)),
            Strategy::Alias => Some(FeatureGroups::by_alias(columns)),
            Strategy::Powerset | Strategy::Kbest => None,
        }
    }

    /// Lazy candidates for the powerset strategies; `None` for k-best,
    /// which ranks features instead of enumerating.
    pub fn candidates(self, columns: &[String]) -> Result<Option<Candidates>, SelectError> {
        match self {
            Strategy::Kbest => Ok(None),
            Strategy::Powerset => Candidates::columns(columns.len()).map(Some),
            grouped => {
                let groups = grouped.groups(columns).unwrap_or_default();
                log::info!(
                    "{} grouping: {} groups {:?}",
                    grouped,
                    groups.len(),
                    groups.keys().collect::<Vec<_>>()
                );
                Candidates::groups(&groups).map(Some)
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
