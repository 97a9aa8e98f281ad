use std::fs::{create_dir_all, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use terminal_presence::io::{load_flights, write_grid, write_series};
use terminal_presence::{aggregate_grid, logging, series_for_flights, ModelConfig};

/// Writes per-flight passenger series and the combined presence grid as CSV.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Flights CSV (id,type,scheduled,actual,estimated_passengers)
    #[arg(long, default_value = "data.csv")]
    input: PathBuf,
    #[arg(long, default_value = "processed")]
    output_dir: PathBuf,
    /// TOML file overriding curve and grid constants
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match &args.config {
        Some(path) => ModelConfig::load(path)
            .with_context(|| format!("loading model config {}", path.display()))?,
        None => ModelConfig::default(),
    };

    let flights = load_flights(&args.input)
        .with_context(|| format!("reading flights from {}", args.input.display()))?;
    info!(flights = flights.len(), "flights loaded");

    create_dir_all(&args.output_dir)?;

    let series = series_for_flights(&flights, &config);
    let series_path = args.output_dir.join("series.csv");
    write_series(File::create(&series_path)?, &series)?;

    let grid = aggregate_grid(&flights, &config);
    let grid_path = args.output_dir.join("grid.csv");
    write_grid(File::create(&grid_path)?, &grid)?;

    match grid.peak() {
        Some(peak) => info!(at = %peak.label, passengers = peak.total, "peak presence"),
        None => info!("no flight has a usable time, grid is empty"),
    }

    println!("Processed data saved in '{}'.", args.output_dir.display());

    Ok(())
}
