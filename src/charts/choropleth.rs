//! Tile-grid choropleth of one day's case counts.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Result, ensure};
use chrono::NaiveDate;
use plotters::prelude::*;
use tracing::debug;

use crate::charts::color::{ColorRamp, MATTER, REDS};
use crate::charts::grid::{GRID_COLS, GRID_ROWS, STATE_TILES, tile_for};
use crate::charts::{CaseKind, format_thousands};
use crate::table::CaseTable;

const WIDTH: u32 = 700;
const HEIGHT: u32 = 500;
const MISSING: RGBColor = RGBColor(224, 224, 224);

fn ramp_for(kind: CaseKind) -> &'static ColorRamp {
    match kind {
        CaseKind::New => &REDS,
        CaseKind::Total => &MATTER,
    }
}

/// Renders one date's counts as a shaded tile map PNG.
///
/// Shading is scaled to `0..=max+1` for the day (the `+1` keeps an
/// all-zero day from dividing by zero); regions without a tile position
/// or without a row for the date are drawn in gray.
#[tracing::instrument(skip(table), fields(date = %date, kind = kind.file_kind()))]
pub fn render_choropleth(
    table: &CaseTable,
    date: NaiveDate,
    kind: CaseKind,
    path: &Path,
) -> Result<()> {
    let day = table.for_date(date);
    ensure!(!day.is_empty(), "no records for date {date}");

    let values: HashMap<&str, i64> = day
        .records()
        .iter()
        .map(|r| (r.region.as_str(), kind.value(r)))
        .collect();

    let total: i64 = values.values().sum();
    let vmax = values.values().copied().max().unwrap_or(0).max(0) + 1;
    let ramp = ramp_for(kind);

    // Reporting units without a tile (e.g. the separate NYC row) are
    // counted in the title total but not drawn.
    let unmapped = values
        .keys()
        .filter(|region| tile_for(region).is_none())
        .count();
    debug!(regions = values.len(), unmapped, total, vmax, "Rendering tile map");

    let title = format!(
        "{} {} COVID-19 Cases - {}",
        format_thousands(total),
        kind.label(),
        date.format("%B %d, %Y")
    );

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let map_area = root.titled(&title, ("sans-serif", 22))?;

    let (w, h) = map_area.dim_in_pixel();
    // Reserve a right margin for the colorbar.
    let bar_width = 46i32;
    let cell = (((w as i32 - bar_width) / GRID_COLS).min(h as i32 / GRID_ROWS)).max(8);
    let x_off = (w as i32 - bar_width - cell * GRID_COLS) / 2;
    let y_off = (h as i32 - cell * GRID_ROWS) / 2;

    for (abbr, col, row) in STATE_TILES {
        let x0 = x_off + col * cell;
        let y0 = y_off + row * cell;
        let x1 = x0 + cell - 2;
        let y1 = y0 + cell - 2;

        let (fill, label_color) = match values.get(abbr) {
            Some(v) => {
                let t = *v as f64 / vmax as f64;
                let label = if ramp.is_dark_at(t) { WHITE } else { BLACK };
                (ramp.sample(t), label)
            }
            None => (MISSING, BLACK),
        };

        map_area.draw(&Rectangle::new([(x0, y0), (x1, y1)], fill.filled()))?;
        map_area.draw(&Text::new(
            *abbr,
            (x0 + 4, y0 + 3),
            ("sans-serif", 13).into_font().color(&label_color),
        ))?;
    }

    draw_colorbar(&map_area, ramp, vmax, w as i32, y_off, cell)?;

    root.present()?;
    Ok(())
}

fn draw_colorbar(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    ramp: &ColorRamp,
    vmax: i64,
    area_width: i32,
    y_off: i32,
    cell: i32,
) -> Result<()> {
    let bar_x0 = area_width - 36;
    let bar_x1 = area_width - 20;
    let bar_y0 = y_off + cell;
    let bar_y1 = y_off + cell * (GRID_ROWS - 1);
    let steps = (bar_y1 - bar_y0).max(1);

    for i in 0..steps {
        // Top of the bar is the maximum.
        let t = 1.0 - i as f64 / steps as f64;
        let y = bar_y0 + i;
        area.draw(&Rectangle::new(
            [(bar_x0, y), (bar_x1, y + 1)],
            ramp.sample(t).filled(),
        ))?;
    }

    let label_font = ("sans-serif", 12).into_font().color(&BLACK);
    area.draw(&Text::new(
        format_thousands(vmax),
        (bar_x0 - 4, bar_y0 - 14),
        label_font.clone(),
    ))?;
    area.draw(&Text::new("0", (bar_x0 + 4, bar_y1 + 4), label_font))?;

    Ok(())
}
