//! CSV persistence for case summaries.

use anyhow::Result;
use tracing::debug;

use crate::stats::CaseSummary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Appends a [`CaseSummary`] row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, summary: &CaseSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

/// Writes a whole snapshot of summary rows, replacing any existing file.
pub fn write_snapshot(path: &str, summaries: &[CaseSummary]) -> Result<()> {
    debug!(path, rows = summaries.len(), "Writing snapshot");

    let mut writer = csv::Writer::from_path(path)?;

    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_summary() -> CaseSummary {
        CaseSummary {
            date: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            region: "VA".to_string(),
            new_cases: 700,
            total_cases: 15_846,
            avg_7_day: 652,
        }
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("covid_case_mapper_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &sample_summary()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("2020-05-01"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("covid_case_mapper_test_header.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &sample_summary()).unwrap();
        append_record(&path, &sample_summary()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("avg_7_day")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_accumulates_rows() {
        let path = temp_path("covid_case_mapper_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &sample_summary()).unwrap();
        append_record(&path, &sample_summary()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_snapshot_replaces_file() {
        let path = temp_path("covid_case_mapper_test_snapshot.csv");
        let _ = fs::remove_file(&path);

        write_snapshot(&path, &[sample_summary(), sample_summary()]).unwrap();
        write_snapshot(&path, &[sample_summary()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 1 data row
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }
}
