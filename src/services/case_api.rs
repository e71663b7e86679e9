//! Trait and descriptors for case-count dataset providers.

use anyhow::Result;
use std::str::FromStr;

use covid_case_mapper::parser::RecordSchema;
use covid_case_mapper::table::CaseRecord;

/// A known upstream case-count dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// CDC "United States COVID-19 Cases and Deaths by State over Time"
    /// (data.cdc.gov `9mfq-cb36`): one row per state per day, with both
    /// daily new cases and cumulative totals.
    CdcStates,
    /// VDH "COVID-19 Public Use Dataset - Cases" (data.virginia.gov
    /// `bre9-aqqr`): one row per locality per day, cumulative totals only.
    VaLocalities,
}

impl Dataset {
    pub fn domain(&self) -> &'static str {
        match self {
            Dataset::CdcStates => "data.cdc.gov",
            Dataset::VaLocalities => "data.virginia.gov",
        }
    }

    pub fn resource_id(&self) -> &'static str {
        match self {
            Dataset::CdcStates => "9mfq-cb36",
            Dataset::VaLocalities => "bre9-aqqr",
        }
    }

    /// Row limit for the SODA `$limit` parameter. Both datasets grow by
    /// one row per reporting unit per day, so these need headroom.
    pub fn row_limit(&self) -> usize {
        match self {
            Dataset::CdcStates => 25_000,
            Dataset::VaLocalities => 50_000,
        }
    }

    pub fn schema(&self) -> RecordSchema {
        match self {
            Dataset::CdcStates => RecordSchema {
                date_col: "submission_date",
                region_col: "state",
                new_cases_col: Some("new_case"),
                total_cases_col: "tot_cases",
            },
            Dataset::VaLocalities => RecordSchema {
                date_col: "report_date",
                region_col: "locality",
                new_cases_col: None,
                total_cases_col: "total_cases",
            },
        }
    }

    /// Whether daily new cases must be derived by differencing totals.
    pub fn cumulative_only(&self) -> bool {
        self.schema().new_cases_col.is_none()
    }
}

impl FromStr for Dataset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cdc" => Ok(Dataset::CdcStates),
            "va" => Ok(Dataset::VaLocalities),
            other => Err(anyhow::anyhow!(
                "unknown dataset '{other}' (expected 'cdc' or 'va')"
            )),
        }
    }
}

/// Abstraction over a case-count data provider (e.g. Socrata).
#[async_trait::async_trait]
pub trait CaseApi {
    /// Fetches all rows of `dataset` as typed records.
    async fn fetch_cases(&self, dataset: Dataset) -> Result<Vec<CaseRecord>>;
}
