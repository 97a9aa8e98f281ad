use std::fmt::Display;
use std::path::Path;

use plotters::prelude::*;

use crate::error::{PresenceError, Result};
use crate::grid::PassengerGrid;
use crate::time::format_label;

fn band_palette() -> Vec<RGBColor> {
    vec![
        RGBColor(31, 119, 180),   // blue
        RGBColor(255, 127, 14),   // orange
        RGBColor(44, 160, 44),    // green
        RGBColor(214, 39, 40),    // red
        RGBColor(148, 103, 189),  // purple
        RGBColor(140, 86, 75),    // brown
        RGBColor(227, 119, 194),  // pink
        RGBColor(127, 127, 127),  // grey
        RGBColor(188, 189, 34),   // olive
        RGBColor(23, 190, 207),   // cyan
        RGBColor(0, 128, 128),    // teal
        RGBColor(255, 215, 0),    // gold
    ]
}

fn chart_err<E: Display>(err: E) -> PresenceError {
    PresenceError::Chart(err.to_string())
}

/// Running sum of the grid columns: `bands[i][row]` is the top edge of
/// flight `i`'s band.
fn stacked_bands(grid: &PassengerGrid) -> Vec<Vec<u64>> {
    let mut bands = Vec::with_capacity(grid.flight_ids.len());
    let mut running = vec![0u64; grid.rows.len()];
    for column in 0..grid.flight_ids.len() {
        for (row, acc) in grid.rows.iter().zip(running.iter_mut()) {
            *acc += u64::from(row.counts[column]);
        }
        bands.push(running.clone());
    }
    bands
}

/// Renders the grid as a stacked area chart, one band per flight, to a PNG.
pub fn draw_stacked_grid(filename: &Path, caption: &str, grid: &PassengerGrid) -> Result<()> {
    let (Some(first), Some(last)) = (grid.rows.first(), grid.rows.last()) else {
        return Err(PresenceError::Chart("grid has no rows to draw".to_string()));
    };
    let start = first.time;
    let end = last.time.max(start + 1);

    let root = BitMapBackend::new(filename, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let max_total = grid.rows.iter().map(|row| row.total).max().unwrap_or(0);
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 50))
        .margin(60)
        .set_label_area_size(LabelAreaPosition::Left, 100)
        .set_label_area_size(LabelAreaPosition::Bottom, 80)
        .build_cartesian_2d(start..end, 0u64..(max_total + max_total / 10 + 1))
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&|ts| format_label(*ts))
        .x_desc("Time (UTC)")
        .y_desc("Passengers in terminal")
        .label_style(("sans-serif", 30))
        .draw()
        .map_err(chart_err)?;

    let palette = band_palette();
    let bands = stacked_bands(grid);

    // Top band first so lower bands paint over it.
    for (column, band) in bands.iter().enumerate().rev() {
        let color = palette[column % palette.len()];
        let points: Vec<(i64, u64)> = grid
            .rows
            .iter()
            .zip(band.iter())
            .map(|(row, &height)| (row.time, height))
            .collect();

        chart
            .draw_series(
                AreaSeries::new(points, 0u64, color.filled()).border_style(BLACK.stroke_width(1)),
            )
            .map_err(chart_err)?
            .label(grid.flight_ids[column].as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 8), (x + 20, y + 8)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 30))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}
