//! Parser for Socrata SODA JSON responses.
//!
//! Socrata delivers every column as a string, including counts and
//! timestamps, so numeric fields are parsed float-then-truncate and the
//! date field accepts either a bare date or a floating timestamp.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::table::CaseRecord;

/// Column names of a case dataset, as they appear in the SODA response.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub date_col: &'static str,
    pub region_col: &'static str,
    /// Absent for datasets that publish cumulative totals only.
    pub new_cases_col: Option<&'static str>,
    pub total_cases_col: &'static str,
}

/// Decodes a SODA JSON array into typed case records.
///
/// Rows missing the date, region, or total column are skipped rather
/// than failing the whole response; upstream occasionally publishes
/// partial rows.
pub fn parse_records(bytes: &[u8], schema: &RecordSchema) -> Result<Vec<CaseRecord>> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_slice(bytes).context("response is not a SODA JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in &rows {
        match parse_row(row, schema) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, total = rows.len(), "Skipped rows with missing or malformed fields");
    }

    Ok(records)
}

fn parse_row(row: &serde_json::Value, schema: &RecordSchema) -> Option<CaseRecord> {
    let date = parse_soda_date(row[schema.date_col].as_str()?)?;
    let region = row[schema.region_col].as_str()?.to_string();
    let total_cases = parse_count(row[schema.total_cases_col].as_str()?)?;

    // New-case counts arrive as floats ("12.0"); a dataset without the
    // column gets 0 here and derives new cases by differencing totals.
    let new_cases = match schema.new_cases_col {
        Some(col) => parse_count(row[col].as_str()?)?,
        None => 0,
    };

    Some(CaseRecord {
        date,
        region,
        new_cases,
        total_cases,
    })
}

/// Parses `"2020-03-15T00:00:00.000"` or `"2020-03-15"`.
fn parse_soda_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parses a count column float-then-truncate, mirroring how the source
/// publishes integer counts with a decimal suffix.
fn parse_count(s: &str) -> Option<i64> {
    s.trim().parse::<f64>().ok().map(|v| v.trunc() as i64)
}
