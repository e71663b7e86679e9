//! Explicit in-memory table of daily case records.
//!
//! A deliberately small replacement for dataframe-style filtering and
//! grouping: an ordered collection of [`CaseRecord`] rows with
//! filter-by-predicate, group-and-sum, and diff-by-offset operations.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One reporting unit's counts for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub date: NaiveDate,
    /// State abbreviation (CDC dataset) or locality name (VA dataset).
    pub region: String,
    pub new_cases: i64,
    pub total_cases: i64,
}

impl CaseRecord {
    pub fn new(date: NaiveDate, region: &str, new_cases: i64, total_cases: i64) -> Self {
        Self {
            date,
            region: region.to_string(),
            new_cases,
            total_cases,
        }
    }
}

/// Ordered collection of case records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseTable {
    records: Vec<CaseRecord>,
}

impl CaseTable {
    pub fn new(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a new table holding only the rows matching `predicate`,
    /// preserving order.
    pub fn filter(&self, predicate: impl Fn(&CaseRecord) -> bool) -> CaseTable {
        CaseTable {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// Rows for a single submission date, all regions.
    pub fn for_date(&self, date: NaiveDate) -> CaseTable {
        self.filter(|r| r.date == date)
    }

    /// Rows for a single region, all dates.
    pub fn for_region(&self, region: &str) -> CaseTable {
        self.filter(|r| r.region == region)
    }

    /// Sums per-region rows into one row per date labelled `region`,
    /// sorted by ascending date. This is the national roll-up when
    /// applied to the full CDC table.
    pub fn group_sum_by_date(&self, region: &str) -> CaseTable {
        let mut by_date: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();

        for r in &self.records {
            let entry = by_date.entry(r.date).or_insert((0, 0));
            entry.0 += r.new_cases;
            entry.1 += r.total_cases;
        }

        CaseTable {
            records: by_date
                .into_iter()
                .map(|(date, (new_cases, total_cases))| {
                    CaseRecord::new(date, region, new_cases, total_cases)
                })
                .collect(),
        }
    }

    /// Rewrites the new-case column as the difference between each row's
    /// cumulative total and the total `offset` rows earlier; rows whose
    /// reference falls outside the table get 0.
    ///
    /// The VA dataset publishes cumulative totals only; with rows sorted
    /// by descending date, `diff_by_offset(-1)` recovers daily new cases.
    pub fn diff_by_offset(&self, offset: i64) -> CaseTable {
        let records = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let reference = i as i64 - offset;
                let new_cases = if reference >= 0 && (reference as usize) < self.records.len() {
                    r.total_cases - self.records[reference as usize].total_cases
                } else {
                    0
                };
                CaseRecord {
                    new_cases,
                    ..r.clone()
                }
            })
            .collect();

        CaseTable { records }
    }

    pub fn sort_by_date_asc(&mut self) {
        self.records.sort_by_key(|r| r.date);
    }

    pub fn sort_by_date_desc(&mut self) {
        self.records.sort_by_key(|r| std::cmp::Reverse(r.date));
    }

    /// Date column, in table order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// New-case column, in table order.
    pub fn new_cases(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.new_cases).collect()
    }

    /// Cumulative-total column, in table order.
    pub fn total_cases(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.total_cases).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, day).unwrap()
    }

    fn sample() -> CaseTable {
        CaseTable::new(vec![
            CaseRecord::new(d(5, 1), "VA", 10, 100),
            CaseRecord::new(d(5, 1), "MD", 5, 50),
            CaseRecord::new(d(5, 2), "VA", 20, 120),
            CaseRecord::new(d(5, 2), "MD", 8, 58),
        ])
    }

    #[test]
    fn test_filter_preserves_order() {
        let va = sample().for_region("VA");
        assert_eq!(va.len(), 2);
        assert_eq!(va.records()[0].date, d(5, 1));
        assert_eq!(va.records()[1].new_cases, 20);
    }

    #[test]
    fn test_for_date() {
        let day = sample().for_date(d(5, 2));
        assert_eq!(day.len(), 2);
        assert!(day.records().iter().all(|r| r.date == d(5, 2)));
    }

    #[test]
    fn test_group_sum_by_date_rolls_up_regions() {
        let usa = sample().group_sum_by_date("USA");

        assert_eq!(usa.len(), 2);
        assert_eq!(usa.records()[0].date, d(5, 1));
        assert_eq!(usa.records()[0].new_cases, 15);
        assert_eq!(usa.records()[0].total_cases, 150);
        assert_eq!(usa.records()[1].new_cases, 28);
        assert_eq!(usa.records()[1].region, "USA");
    }

    #[test]
    fn test_diff_by_offset_descending_totals() {
        // Descending dates with cumulative totals, as VA publishes them.
        let table = CaseTable::new(vec![
            CaseRecord::new(d(5, 3), "Fairfax", 0, 60),
            CaseRecord::new(d(5, 2), "Fairfax", 0, 45),
            CaseRecord::new(d(5, 1), "Fairfax", 0, 40),
        ]);

        let diffed = table.diff_by_offset(-1);

        assert_eq!(diffed.new_cases(), vec![15, 5, 0]);
        // Totals are untouched.
        assert_eq!(diffed.total_cases(), vec![60, 45, 40]);
    }

    #[test]
    fn test_diff_by_offset_positive() {
        let table = CaseTable::new(vec![
            CaseRecord::new(d(5, 1), "X", 0, 10),
            CaseRecord::new(d(5, 2), "X", 0, 25),
        ]);

        let diffed = table.diff_by_offset(1);
        assert_eq!(diffed.new_cases(), vec![0, 15]);
    }

    #[test]
    fn test_sort_by_date() {
        let mut table = CaseTable::new(vec![
            CaseRecord::new(d(5, 3), "VA", 1, 1),
            CaseRecord::new(d(5, 1), "VA", 2, 2),
            CaseRecord::new(d(5, 2), "VA", 3, 3),
        ]);

        table.sort_by_date_asc();
        assert_eq!(table.dates(), vec![d(5, 1), d(5, 2), d(5, 3)]);

        table.sort_by_date_desc();
        assert_eq!(table.dates(), vec![d(5, 3), d(5, 2), d(5, 1)]);
    }

    #[test]
    fn test_empty_table() {
        let table = CaseTable::default();
        assert!(table.is_empty());
        assert!(table.group_sum_by_date("USA").is_empty());
        assert!(table.diff_by_offset(-1).is_empty());
    }
}
