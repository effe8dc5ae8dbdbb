use std::collections::BTreeSet;
use std::path::Path;

use clap::Parser;
use pretty_assertions::assert_eq;

use rusty_sweep::app::SweepApp;
use rusty_sweep::cli::Cli;
use rusty_sweep::config::RunConfig;
use rusty_sweep::results::ResultsTable;

/// Records-oriented JSON with an id column, one incomplete row, and columns
/// that the alias table folds together.
fn write_json(path: &Path, rows: usize) {
    let records: Vec<serde_json::Value> = (0..rows)
        .map(|i| {
            let class = i % 3;
            let base = class as f64 * 2.0 + (i % 4) as f64 * 0.05;
            let spread = if i == 1 {
                serde_json::Value::Null
            } else {
                serde_json::json!((i % 5) as f64)
            };
            serde_json::json!({
                "row_id": i,
                "velocity_average_1": base,
                "acceleration_median_1": base / 2.0,
                "heading_std_dev_1": spread,
                "heading_minimum_1": (i % 7) as f64,
                "label": (["walk", "run", "cycle"][class]),
            })
        })
        .collect();
    std::fs::write(path, serde_json::to_string(&records).unwrap()).unwrap();
}

fn run(dir: &Path, strategy: &str, workers: &str) -> (ResultsTable, usize) {
    let train = dir.join("train.json");
    let test = dir.join("test.json");
    write_json(&train, 24);
    write_json(&test, 9);
    let settings = dir.join("sweep.json");
    std::fs::write(
        &settings,
        serde_json::json!({
            "train": train,
            "test": test,
            "group_column": "label",
            "drop_columns": ["row_id"],
            "neighbors": 3,
            "output_dir": dir.join("results"),
        })
        .to_string(),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "rusty-sweep",
        strategy,
        "--workers",
        workers,
        "--config",
        settings.to_str().unwrap(),
    ])
    .unwrap();
    let output = SweepApp::new(RunConfig::resolve(&cli).unwrap()).run().unwrap();
    (ResultsTable::read_csv(&output.results).unwrap(), output.rows)
}

#[test]
fn alias_strategy_merges_velocity_and_acceleration() {
    let dir = tempfile::tempdir().unwrap();
    let (table, rows) = run(dir.path(), "alias", "3");

    // buckets: heading, velocity
    assert_eq!(rows, 3);
    assert_eq!(table.len(), 3);
    let feature_sets: BTreeSet<String> = table
        .column("features")
        .unwrap()
        .into_iter()
        .map(|v| v.to_string())
        .collect();
    assert!(feature_sets.contains("acceleration_median_1;velocity_average_1"));
}

#[test]
fn statistic_strategy_with_non_positive_workers() {
    let dir = tempfile::tempdir().unwrap();
    let (table, rows) = run(dir.path(), "statistic", "-1");

    // buckets: average, median, minimum, std_dev
    assert_eq!(rows, 15);
    let columns: BTreeSet<&str> = table.columns.iter().map(String::as_str).collect();
    for expected in ["accuracy", "balanced_accuracy", "f1_macro", "k", "features"] {
        assert!(columns.contains(expected), "missing {expected}");
    }
}
