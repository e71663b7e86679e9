//! Rolling statistics over daily case counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::CaseTable;

/// Computes the 7-day trailing average for each position of `values`.
///
/// Element `i` of the result is the mean of `values[max(0, i-6)..=i]`,
/// rounded half-away-from-zero, so the first 6 positions ramp up using
/// the cumulative mean of everything seen so far.
///
/// Negative inputs pass through unvalidated: upstream datasets contain
/// negative new-case corrections that distort the window they fall in.
pub fn calc_7_day_avg(values: &[i64]) -> Vec<i64> {
    let mut averages = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let window = &values[i.saturating_sub(6)..=i];
        let sum: i64 = window.iter().sum();
        averages.push((sum as f64 / window.len() as f64).round() as i64);
    }

    averages
}

/// One summary row per date for a single region, written to CSV snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub date: NaiveDate,
    pub region: String,
    pub new_cases: i64,
    pub total_cases: i64,
    pub avg_7_day: i64,
}

/// Builds per-date summary rows from a table, in table order, attaching
/// the 7-day average of the new-case column.
///
/// The table is expected to hold one region sorted by ascending date;
/// callers filter and sort before summarizing.
pub fn summarize(table: &CaseTable) -> Vec<CaseSummary> {
    let averages = calc_7_day_avg(&table.new_cases());

    table
        .records()
        .iter()
        .zip(averages)
        .map(|(r, avg_7_day)| CaseSummary {
            date: r.date,
            region: r.region.clone(),
            new_cases: r.new_cases,
            total_cases: r.total_cases,
            avg_7_day,
        })
        .collect()
}
