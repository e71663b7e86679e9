//! Date-range validation and enumeration.
//!
//! The upstream CDC dataset has no records before 2020-01-22, so every
//! date range is validated against that epoch before enumeration.

use chrono::NaiveDate;

/// Earliest date for which the upstream case-count dataset has records.
pub fn dataset_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 22).unwrap()
}

/// Range violations reported by [`date_range`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// `end` precedes `start`.
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    /// `start` precedes the dataset epoch (2020-01-22).
    BeforeEpoch { start: NaiveDate },
}

impl std::fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRangeError::EndBeforeStart { start, end } => {
                write!(f, "end date {end} is before start date {start}")
            }
            DateRangeError::BeforeEpoch { start } => {
                write!(
                    f,
                    "start date {start} is out of range; dataset begins {}",
                    dataset_epoch()
                )
            }
        }
    }
}

impl std::error::Error for DateRangeError {}

/// Returns every date from `start` to `end` inclusive as `YYYY-MM-DD` strings.
///
/// Pure and deterministic. Fails when `end < start` or when `start` is
/// earlier than [`dataset_epoch`].
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<String>, DateRangeError> {
    if end < start {
        return Err(DateRangeError::EndBeforeStart { start, end });
    }

    if start < dataset_epoch() {
        return Err(DateRangeError::BeforeEpoch { start });
    }

    Ok(start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_may_2020_has_31_entries() {
        let range = date_range(d(2020, 5, 1), d(2020, 5, 31)).unwrap();
        assert_eq!(range.len(), 31);
        assert_eq!(range.first().unwrap(), "2020-05-01");
        assert_eq!(range.last().unwrap(), "2020-05-31");
    }

    #[test]
    fn test_single_day_range() {
        let range = date_range(d(2020, 1, 22), d(2020, 1, 22)).unwrap();
        assert_eq!(range, vec!["2020-01-22".to_string()]);
    }

    #[test]
    fn test_length_matches_day_count() {
        let start = d(2020, 3, 1);
        let end = d(2020, 6, 15);
        let range = date_range(start, end).unwrap();
        assert_eq!(range.len() as i64, (end - start).num_days() + 1);
    }

    #[test]
    fn test_strictly_increasing_and_contiguous() {
        let range = date_range(d(2020, 2, 26), d(2020, 3, 3)).unwrap();
        for pair in range.windows(2) {
            let a = NaiveDate::parse_from_str(&pair[0], "%Y-%m-%d").unwrap();
            let b = NaiveDate::parse_from_str(&pair[1], "%Y-%m-%d").unwrap();
            assert_eq!((b - a).num_days(), 1);
        }
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = date_range(d(2020, 10, 5), d(2020, 3, 14)).unwrap_err();
        assert!(matches!(err, DateRangeError::EndBeforeStart { .. }));
    }

    #[test]
    fn test_start_before_epoch_is_rejected() {
        let err = date_range(d(2020, 1, 1), d(2020, 6, 15)).unwrap_err();
        assert!(matches!(err, DateRangeError::BeforeEpoch { .. }));
    }

    #[test]
    fn test_leap_day_is_included() {
        let range = date_range(d(2020, 2, 28), d(2020, 3, 1)).unwrap();
        assert_eq!(range, vec!["2020-02-28", "2020-02-29", "2020-03-01"]);
    }
}
