//! Chart rendering: tile-grid US maps and time-series charts.

pub mod choropleth;
pub mod color;
pub mod grid;
pub mod timeseries;

use crate::table::CaseRecord;

/// Which case column a chart shades or plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    New,
    Total,
}

impl CaseKind {
    /// Title word: "New" or "Total".
    pub fn label(&self) -> &'static str {
        match self {
            CaseKind::New => "New",
            CaseKind::Total => "Total",
        }
    }

    /// File-name fragment: `<date>_<kind>_cases.png`.
    pub fn file_kind(&self) -> &'static str {
        match self {
            CaseKind::New => "new",
            CaseKind::Total => "total",
        }
    }

    pub fn value(&self, record: &CaseRecord) -> i64 {
        match self {
            CaseKind::New => record.new_cases,
            CaseKind::Total => record.total_cases,
        }
    }
}

/// Formats a count with thousands separators for chart titles.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
