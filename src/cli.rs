use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::select::Strategy;

/// Evaluate feature subsets of precomputed statistics against a classifier.
#[derive(Debug, Parser)]
#[command(name = "rusty-sweep", version, about)]
pub struct Cli {
    /// How candidate feature subsets are enumerated
    #[arg(value_enum)]
    pub strategy: Strategy,

    /// Worker threads for the powerset strategies (values <= 0 run on one)
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub workers: i64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// JSON settings file; flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Training feature table (.parquet, .json or .csv)
    #[arg(long, value_name = "PATH")]
    pub train: Option<PathBuf>,

    /// Held-out feature table (.parquet, .json or .csv)
    #[arg(long, value_name = "PATH")]
    pub test: Option<PathBuf>,

    /// Column holding the group identifier (class label)
    #[arg(long, value_name = "NAME")]
    pub group_column: Option<String>,

    /// Identifier column to drop before analysis; repeatable
    #[arg(long = "drop-column", value_name = "NAME")]
    pub drop_columns: Vec<String>,

    /// Neighbours consulted by the k-NN evaluator
    #[arg(long, value_name = "K")]
    pub neighbors: Option<usize>,

    /// Directory the results file is written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Render a PNG of each metric versus k (kbest only)
    #[arg(long)]
    pub chart: bool,
}

impl Cli {
    /// Default log filter for the requested verbosity.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_strategy_and_flags() {
        let cli = Cli::try_parse_from([
            "rusty-sweep",
            "alias",
            "--workers",
            "4",
            "-vv",
            "--drop-column",
            "id",
            "--drop-column",
            "uuid",
        ])
        .unwrap();
        assert_eq!(cli.strategy, Strategy::Alias);
        assert_eq!(cli.workers, 4);
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
        assert_eq!(cli.drop_columns, vec!["id".to_string(), "uuid".to_string()]);
    }

    #[test]
    fn negative_worker_count_parses() {
        let cli = Cli::try_parse_from(["rusty-sweep", "kbest", "--workers", "-2"]).unwrap();
        assert_eq!(cli.workers, -2);
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(Cli::try_parse_from(["rusty-sweep", "random"]).is_err());
    }
}
