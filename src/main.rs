//! CLI entry point for the COVID case mapper.
//!
//! Provides subcommands for fetching case datasets into CSV snapshots,
//! rendering choropleth-style maps and time-series charts, and
//! assembling dated map frames into animated GIFs.

mod infra;
mod services;

use crate::infra::socrata::SocrataClient;
use crate::services::case_api::{CaseApi, Dataset};
use anyhow::{Context, Result, bail, ensure};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use covid_case_mapper::{
    charts::{CaseKind, choropleth::render_choropleth, timeseries::render_timeseries},
    dates::date_range,
    export::{assemble_gif, frame_path},
    output::{append_record, write_snapshot},
    stats::summarize,
    table::CaseTable,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "covid_case_mapper")]
#[command(about = "Fetch, chart, and animate COVID-19 case data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a dataset and write a per-date summary CSV
    Fetch {
        /// Dataset to fetch: "cdc" (states) or "va" (localities)
        #[arg(short, long, default_value = "cdc")]
        dataset: String,

        /// State abbreviation or locality name; omit for the national roll-up
        #[arg(short, long)]
        region: Option<String>,

        /// CSV file to write
        #[arg(short, long, default_value = "data.csv")]
        output: String,

        /// Append rows to the CSV instead of replacing it
        #[arg(short, long, default_value_t = false)]
        append: bool,
    },
    /// Render a single-date case map
    Map {
        /// Date to map, YYYY-MM-DD
        #[arg(value_name = "DATE")]
        date: String,

        /// Shade cumulative totals instead of daily new cases
        #[arg(short, long, default_value_t = false)]
        total: bool,

        /// Output PNG path (defaults to <date>_<kind>_cases.png)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Render one map frame per date in a range
    Frames {
        /// First date, YYYY-MM-DD (no earlier than 2020-01-22)
        #[arg(short, long)]
        start: String,

        /// Last date, YYYY-MM-DD
        #[arg(short, long)]
        end: String,

        /// Shade cumulative totals instead of daily new cases
        #[arg(short, long, default_value_t = false)]
        total: bool,

        /// Directory for frames (defaults to new_cases/ or total_cases/)
        #[arg(short = 'd', long)]
        output_dir: Option<String>,
    },
    /// Assemble PNG frames from a directory into an animated GIF
    Gif {
        /// Directory containing .png frames
        #[arg(short, long)]
        input_dir: String,

        /// Output GIF path (defaults to <input_dir>.gif)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Render a new-cases vs. 7-day-average chart for a region
    Timeline {
        /// Dataset to chart: "cdc" (states) or "va" (localities)
        #[arg(short, long, default_value = "cdc")]
        dataset: String,

        /// State abbreviation or locality name; omit for the national roll-up
        #[arg(short, long)]
        region: Option<String>,

        /// Output PNG path
        #[arg(short, long, default_value = "timeline.png")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covid_case_mapper.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covid_case_mapper.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            dataset,
            region,
            output,
            append,
        } => {
            let dataset: Dataset = dataset.parse()?;
            fetch_snapshot(dataset, region.as_deref(), &output, append).await?;
        }
        Commands::Map {
            date,
            total,
            output,
        } => {
            let date = parse_cli_date(&date)?;
            // Single-date range doubles as the epoch check.
            date_range(date, date)?;

            let kind = kind_for(total);
            let out = output
                .unwrap_or_else(|| format!("{date}_{}_cases.png", kind.file_kind()));

            let table = fetch_table(Dataset::CdcStates).await?;
            render_choropleth(&table, date, kind, Path::new(&out))?;
            info!(output = %out, "Map rendered");
        }
        Commands::Frames {
            start,
            end,
            total,
            output_dir,
        } => {
            let start = parse_cli_date(&start)?;
            let end = parse_cli_date(&end)?;
            let range = date_range(start, end)?;

            let kind = kind_for(total);
            let dir = output_dir.unwrap_or_else(|| format!("{}_cases", kind.file_kind()));
            render_frames(&range, kind, &dir).await?;
        }
        Commands::Gif { input_dir, output } => {
            let input_dir = PathBuf::from(input_dir);
            let output = output.map(PathBuf::from).unwrap_or_else(|| {
                let stem = input_dir
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("cases");
                PathBuf::from(format!("{}.gif", stem.to_lowercase()))
            });

            let frames = assemble_gif(&input_dir, &output)?;
            info!(frames, output = %output.display(), "GIF written");
        }
        Commands::Timeline {
            dataset,
            region,
            output,
        } => {
            let dataset: Dataset = dataset.parse()?;
            require_region(dataset, region.as_deref())?;

            let table = fetch_table(dataset).await?;
            let (series, label) =
                region_series(&table, region.as_deref(), dataset.cumulative_only())?;

            render_timeseries(&series, &label, Path::new(&output))?;
            info!(region = %label, output = %output, "Timeline rendered");
        }
    }

    Ok(())
}

fn kind_for(total: bool) -> CaseKind {
    if total { CaseKind::Total } else { CaseKind::New }
}

/// Cumulative-only datasets have no national roll-up; they need a
/// locality to diff. Checked before fetching.
fn require_region(dataset: Dataset, region: Option<&str>) -> Result<()> {
    if dataset.cumulative_only() && region.is_none() {
        bail!("this dataset publishes per-locality totals; pass --region <locality>");
    }
    Ok(())
}

fn parse_cli_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("'{s}' is not a date; expected YYYY-MM-DD"))
}

/// Fetches a dataset once and wraps it in a table handle.
#[tracing::instrument(fields(dataset = ?dataset))]
async fn fetch_table(dataset: Dataset) -> Result<CaseTable> {
    let client = SocrataClient::from_env();
    let records = client.fetch_cases(dataset).await?;
    Ok(CaseTable::new(records))
}

/// Extracts one region's date-ascending series from a fetched table,
/// deriving new cases by differencing when the dataset only publishes
/// cumulative totals.
fn region_series(
    table: &CaseTable,
    region: Option<&str>,
    cumulative_only: bool,
) -> Result<(CaseTable, String)> {
    let (series, label) = match region {
        Some(r) => {
            let mut series = table.for_region(r);
            if cumulative_only {
                // Diff against the next-older row, then flip ascending.
                series.sort_by_date_desc();
                series = series.diff_by_offset(-1);
            }
            series.sort_by_date_asc();
            (series, r.to_string())
        }
        None => (table.group_sum_by_date("USA"), "USA".to_string()),
    };

    ensure!(
        !series.is_empty(),
        "no rows for region '{label}' in the fetched dataset"
    );
    Ok((series, label))
}

/// Fetches the dataset, summarizes one region (or the national roll-up),
/// and writes the per-date CSV snapshot.
#[tracing::instrument(skip(region), fields(dataset = ?dataset, output, append))]
async fn fetch_snapshot(
    dataset: Dataset,
    region: Option<&str>,
    output: &str,
    append: bool,
) -> Result<()> {
    require_region(dataset, region)?;

    let table = fetch_table(dataset).await?;
    let (series, label) = region_series(&table, region, dataset.cumulative_only())?;

    let summaries = summarize(&series);
    if append {
        for summary in &summaries {
            append_record(output, summary)?;
        }
    } else {
        write_snapshot(output, &summaries)?;
    }
    info!(region = %label, rows = summaries.len(), output, append, "Snapshot written");

    Ok(())
}

/// Renders one choropleth frame per date into `dir`, skipping dates the
/// dataset has no rows for.
#[tracing::instrument(skip(range), fields(frames = range.len(), kind = kind.file_kind(), dir))]
async fn render_frames(range: &[String], kind: CaseKind, dir: &str) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let table = fetch_table(Dataset::CdcStates).await?;

    let mut rendered = 0usize;
    for date_str in range {
        let date = parse_cli_date(date_str)?;
        let path = frame_path(Path::new(dir), date_str, kind);

        match render_choropleth(&table, date, kind, &path) {
            Ok(()) => rendered += 1,
            Err(e) => warn!(date = %date_str, error = %e, "Skipping frame"),
        }
    }

    ensure!(rendered > 0, "no frames rendered; is the range inside the dataset?");
    info!(rendered, dir, "Frames rendered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use covid_case_mapper::table::CaseRecord;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, day).unwrap()
    }

    #[test]
    fn test_region_series_diffs_cumulative_only_datasets() {
        // Locality rows as the VA dataset publishes them: cumulative
        // totals only, new-case column zeroed.
        let table = CaseTable::new(vec![
            CaseRecord::new(d(5, 1), "Fairfax", 0, 40),
            CaseRecord::new(d(5, 2), "Fairfax", 0, 45),
            CaseRecord::new(d(5, 3), "Fairfax", 0, 60),
            CaseRecord::new(d(5, 3), "Loudoun", 0, 9),
        ]);

        let (series, label) = region_series(&table, Some("Fairfax"), true).unwrap();

        assert_eq!(label, "Fairfax");
        assert_eq!(series.dates(), vec![d(5, 1), d(5, 2), d(5, 3)]);
        // Oldest row has nothing to diff against; later days are derived.
        assert_eq!(series.new_cases(), vec![0, 5, 15]);
    }

    #[test]
    fn test_region_series_state_passthrough() {
        let table = CaseTable::new(vec![
            CaseRecord::new(d(5, 2), "VA", 20, 30),
            CaseRecord::new(d(5, 1), "VA", 10, 10),
        ]);

        let (series, _) = region_series(&table, Some("VA"), false).unwrap();
        assert_eq!(series.new_cases(), vec![10, 20]);
    }

    #[test]
    fn test_require_region_for_cumulative_only_dataset() {
        assert!(require_region(Dataset::VaLocalities, None).is_err());
        assert!(require_region(Dataset::VaLocalities, Some("Fairfax")).is_ok());
        assert!(require_region(Dataset::CdcStates, None).is_ok());
    }
}
