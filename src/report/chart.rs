use std::ops::Range;
use std::path::Path;

use anyhow::{bail, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::color::generate_palette;
use crate::results::{ResultsTable, FEATURES_COLUMN, K_COLUMN};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 500;

// ---------------------------------------------------------------------------
// Metric-versus-k series
// ---------------------------------------------------------------------------

/// One named line: `(k, value)` points in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Every numeric metric column of `table` against its `k` column.
pub fn metric_series(table: &ResultsTable) -> Result<Vec<Series>> {
    let k_idx = table
        .column_index(K_COLUMN)
        .context("results table has no k column")?;

    let series = table
        .columns
        .iter()
        .enumerate()
        .filter(|(i, name)| *i != k_idx && name.as_str() != FEATURES_COLUMN)
        .map(|(i, name)| Series {
            name: name.clone(),
            points: table
                .rows
                .iter()
                .filter_map(|row| Some((row[k_idx].as_f64()?, row[i].as_f64()?)))
                .collect(),
        })
        .filter(|s| !s.points.is_empty())
        .collect();
    Ok(series)
}

// ---------------------------------------------------------------------------
// PNG rendering
// ---------------------------------------------------------------------------

/// x spans the observed `k` values; y spans `[0, 1]` unless a value falls
/// outside it.
fn axis_ranges(series: &[Series]) -> (Range<f64>, Range<f64>) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (0.0f64, 1.0f64);
    for &(x, y) in series.iter().flat_map(|s| s.points.iter()) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        if y.is_finite() {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if x_max <= x_min {
        x_min -= 1.0;
        x_max += 1.0;
    }
    (x_min..x_max, y_min..y_max)
}

/// Draw one coloured line per series, with a legend, onto `root`.
fn draw(root: &DrawingArea<BitMapBackend<'_>, Shift>, series: &[Series]) -> Result<()> {
    root.fill(&WHITE).context("clearing chart")?;

    let (x_range, y_range) = axis_ranges(series);
    let mut chart = ChartBuilder::on(root)
        .caption("Metrics by number of selected features", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .context("building chart axes")?;

    chart
        .configure_mesh()
        .x_desc("k (features kept)")
        .y_desc("metric value")
        .draw()
        .context("drawing chart mesh")?;

    let palette = generate_palette(series.len());
    for (s, &color) in series.iter().zip(&palette) {
        let mut points: Vec<(f64, f64)> = s.points.iter().copied().filter(|(_, y)| y.is_finite()).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .with_context(|| format!("drawing series {}", s.name))?
            .label(s.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart
            .draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))
            .with_context(|| format!("drawing markers for {}", s.name))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .context("drawing chart legend")?;
    Ok(())
}

/// Render the metric-versus-k chart of `table` to a PNG at `path`.
pub fn write_metric_chart(table: &ResultsTable, path: &Path) -> Result<()> {
    let series = metric_series(table)?;
    if series.is_empty() {
        bail!("no numeric metric columns to chart");
    }

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    draw(&root, &series)?;
    root.present()
        .with_context(|| format!("writing chart {}", path.display()))?;
    log::debug!(
        "chart series: {}",
        series.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", ")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::results::ScoreRecord;
    use pretty_assertions::assert_eq;

    fn table() -> ResultsTable {
        let names: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        ResultsTable::from_records((1..=3).rev().map(|k| {
            ScoreRecord::new(
                vec![("accuracy".to_string(), 0.2 * k as f64), ("f1_macro".to_string(), 0.1 * k as f64)],
                &names[..k],
            )
        }))
    }

    #[test]
    fn series_skip_k_and_feature_columns() {
        let series = metric_series(&table()).unwrap();
        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["accuracy", "f1_macro"]);
        assert_eq!(series[0].points.len(), 3);
        assert_eq!(series[0].points[0].0, 3.0);
    }

    #[test]
    fn missing_k_column_is_an_error() {
        let t = ResultsTable {
            columns: vec!["accuracy".into()],
            rows: vec![vec![CellValue::Float(0.5)]],
        };
        assert!(metric_series(&t).is_err());
    }

    #[test]
    fn draw_uses_each_series_colour() {
        let series = metric_series(&table()).unwrap();
        let mut buf = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (WIDTH, HEIGHT)).into_drawing_area();
            draw(&root, &series).unwrap();
            root.present().unwrap();
        }
        for color in generate_palette(series.len()) {
            let rgb = [color.0, color.1, color.2];
            assert!(buf.chunks_exact(3).any(|p| p == rgb.as_slice()), "{rgb:?} not drawn");
        }
    }

    #[test]
    fn constant_k_still_gets_a_usable_axis() {
        let series = vec![Series {
            name: "accuracy".into(),
            points: vec![(2.0, 1.4)],
        }];
        let (x, y) = axis_ranges(&series);
        assert_eq!(x, 1.0..3.0);
        assert_eq!(y, 0.0..1.4);
    }

    #[test]
    fn chart_is_written_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kbest.png");
        write_metric_chart(&table(), &path).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (WIDTH, HEIGHT));
    }
}
