//! Writes a synthetic training and held-out feature table as Parquet.
//!
//! Each row summarises a simulated movement trace: for every metric, the
//! trace's average, median, std_dev and iqr, named `<metric>_<stat>_1`.
//!
//! Usage:
//!   cargo run --bin generate_sample -- --out-dir data/

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

const METRICS: [&str; 3] = ["speed", "acceleration", "velocity"];
const STATS: [&str; 4] = ["average", "median", "std_dev", "iqr"];

/// (group, per-metric (mean, spread) of the simulated trace)
const GROUPS: [(&str, [(f64, f64); 3]); 3] = [
    ("walk", [(1.4, 0.3), (0.2, 0.1), (1.3, 0.4)]),
    ("run", [(3.5, 0.8), (0.6, 0.3), (3.2, 0.9)]),
    ("cycle", [(5.0, 1.2), (0.4, 0.2), (5.5, 1.5)]),
];

#[derive(Parser, Debug)]
#[command(about = "Generate synthetic train/test feature tables")]
struct Args {
    /// Output directory for train.parquet and test.parquet
    #[arg(short = 'o', long = "out-dir", value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Training rows per group
    #[arg(long, default_value_t = 40)]
    train_rows: usize,

    /// Held-out rows per group
    #[arg(long, default_value_t = 15)]
    test_rows: usize,

    /// Fraction of feature cells left empty
    #[arg(long, default_value_t = 0.01)]
    missing: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Linear-interpolated quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// average, median, std_dev, iqr of one simulated trace
fn summarise(trace: &mut [f64]) -> [f64; 4] {
    trace.sort_by(f64::total_cmp);
    let n = trace.len() as f64;
    let mean = trace.iter().sum::<f64>() / n;
    let var = trace.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    [
        mean,
        quantile(trace, 0.5),
        var.sqrt(),
        quantile(trace, 0.75) - quantile(trace, 0.25),
    ]
}

fn feature_names() -> Vec<String> {
    METRICS
        .iter()
        .flat_map(|m| STATS.iter().map(move |s| format!("{m}_{s}_1")))
        .collect()
}

fn build_batch(rows_per_group: usize, missing: f64, first_id: i64, rng: &mut SimpleRng) -> Result<RecordBatch> {
    let names = feature_names();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];
    let mut ids: Vec<i64> = Vec::new();
    let mut groups: Vec<&str> = Vec::new();

    let mut id = first_id;
    for (group, params) in &GROUPS {
        for _ in 0..rows_per_group {
            let mut col = 0;
            for &(mean, spread) in params {
                let mut trace: Vec<f64> = (0..50).map(|_| rng.gauss(mean, spread)).collect();
                for value in summarise(&mut trace) {
                    let cell = (rng.next_f64() >= missing).then_some(value);
                    columns[col].push(cell);
                    col += 1;
                }
            }
            ids.push(id);
            groups.push(*group);
            id += 1;
        }
    }

    let mut fields = vec![Field::new("id", DataType::Int64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(ids))];
    for (name, values) in names.iter().zip(columns) {
        fields.push(Field::new(name, DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(values)));
    }
    fields.push(Field::new("group", DataType::Utf8, false));
    arrays.push(Arc::new(StringArray::from(groups)));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building record batch")
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output directory {}", args.out_dir.display()))?;

    let train = build_batch(args.train_rows, args.missing, 0, &mut rng)?;
    let test = build_batch(args.test_rows, args.missing, train.num_rows() as i64, &mut rng)?;

    for (name, batch) in [("train.parquet", &train), ("test.parquet", &test)] {
        let path = args.out_dir.join(name);
        write_parquet(&path, batch)?;
        println!(
            "Wrote {} rows x {} features to {}",
            batch.num_rows(),
            feature_names().len(),
            path.display()
        );
    }
    Ok(())
}
