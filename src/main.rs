use anyhow::Result;
use clap::Parser;

use rusty_sweep::app::SweepApp;
use rusty_sweep::cli::Cli;
use rusty_sweep::config::RunConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let config = RunConfig::resolve(&cli)?;
    let output = SweepApp::new(config).run()?;

    println!("{} rows -> {}", output.rows, output.results.display());
    if let Some(chart) = &output.chart {
        println!("chart -> {}", chart.display());
    }
    Ok(())
}
