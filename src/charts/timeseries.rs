//! Time-series chart: daily new cases against the 7-day average.

use std::path::Path;

use anyhow::{Result, ensure};
use plotters::prelude::*;
use tracing::debug;

use crate::stats::calc_7_day_avg;
use crate::table::CaseTable;

const WIDTH: u32 = 900;
const HEIGHT: u32 = 540;

/// Renders a per-region chart PNG: new-case bars with the 7-day-average
/// line on top.
///
/// The table is expected to hold one region's rows sorted by ascending
/// date (callers roll up or filter first). Negative correction days are
/// plotted as-is, below the axis.
#[tracing::instrument(skip(table), fields(region, rows = table.len()))]
pub fn render_timeseries(table: &CaseTable, region: &str, path: &Path) -> Result<()> {
    ensure!(!table.is_empty(), "no records to plot for {region}");

    let dates = table.dates();
    let new_cases = table.new_cases();
    let averages = calc_7_day_avg(&new_cases);
    let n = new_cases.len() as i32;

    let y_min = new_cases.iter().copied().min().unwrap_or(0).min(0);
    let y_max = new_cases
        .iter()
        .chain(averages.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1);
    // Headroom so the tallest bar doesn't touch the frame.
    let y_max = y_max + y_max / 20 + 1;

    debug!(y_min, y_max, "Rendering time series");

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("COVID-19 in {region}"), ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(46)
        .y_label_area_size(64)
        .build_cartesian_2d(0..n, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Date")
        .y_desc("New Cases")
        .x_labels(8)
        .x_label_formatter(&|i| {
            dates
                .get(*i as usize)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .label_style(("sans-serif", 13))
        .draw()?;

    let bar_style = RED.mix(0.45).filled();
    chart
        .draw_series(new_cases.iter().enumerate().map(|(i, v)| {
            Rectangle::new([(i as i32, 0), (i as i32 + 1, *v)], bar_style)
        }))?
        .label("New Cases")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], RED.mix(0.45).filled()));

    chart
        .draw_series(LineSeries::new(
            averages.iter().enumerate().map(|(i, v)| (i as i32, *v)),
            BLUE.stroke_width(2),
        ))?
        .label("7 Day Avg")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], BLUE.stroke_width(2)));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}
