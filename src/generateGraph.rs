use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use terminal_presence::chart::draw_stacked_grid;
use terminal_presence::flight::select_flights;
use terminal_presence::io::load_flights;
use terminal_presence::{aggregate_grid, logging, ModelConfig};

/// Renders the combined presence grid as a stacked area chart.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value = "data.csv")]
    input: PathBuf,
    #[arg(long, default_value = "presence_chart.png")]
    output: PathBuf,
    /// Only chart these flight ids (repeatable); all flights when omitted
    #[arg(long = "flight")]
    flights: Vec<String>,
    #[arg(long, default_value = "Passengers in Terminal")]
    caption: String,
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

    let mut flights = load_flights(&args.input)
        .with_context(|| format!("reading flights from {}", args.input.display()))?;
    if !args.flights.is_empty() {
        let (selected, missing) = select_flights(flights, &args.flights);
        for id in missing {
            warn!(flight = %id, "requested flight not found in input");
        }
        flights = selected;
    }

    let grid = aggregate_grid(&flights, &config);
    if grid.is_empty() {
        warn!("nothing to chart: no selected flight has a usable time");
        return Ok(());
    }
    info!(flights = grid.flight_ids.len(), rows = grid.rows.len(), "drawing chart");

    draw_stacked_grid(&args.output, &args.caption, &grid)?;

    println!("\nChart generated successfully.");
    Ok(())
}
