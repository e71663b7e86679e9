use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use covid_case_mapper::fetch::auth::AppToken;
use covid_case_mapper::fetch::{BasicClient, HttpClient, fetch_bytes};
use covid_case_mapper::parser::parse_records;
use covid_case_mapper::table::CaseRecord;

use crate::services::case_api::{CaseApi, Dataset};

/// Case-data provider backed by Socrata SODA endpoints.
pub struct SocrataClient {
    app_token: Option<String>,
}

impl SocrataClient {
    /// Builds a client, picking up an optional `SOCRATA_APP_TOKEN` from
    /// the environment. Public datasets work without one; the token only
    /// lifts Socrata's shared-pool throttling.
    pub fn from_env() -> Self {
        let app_token = std::env::var("SOCRATA_APP_TOKEN").ok();
        if app_token.is_some() {
            debug!("Using SOCRATA_APP_TOKEN for requests");
        }
        Self { app_token }
    }

    fn resource_url(dataset: Dataset) -> String {
        format!(
            "https://{}/resource/{}.json?$limit={}",
            dataset.domain(),
            dataset.resource_id(),
            dataset.row_limit()
        )
    }
}

#[async_trait]
impl CaseApi for SocrataClient {
    #[tracing::instrument(skip(self), fields(dataset = ?dataset))]
    async fn fetch_cases(&self, dataset: Dataset) -> Result<Vec<CaseRecord>> {
        let url = Self::resource_url(dataset);
        let base = BasicClient::new();

        let bytes = match &self.app_token {
            Some(token) => {
                let client = AppToken::new(base, token.clone());
                fetch_bytes(&client, &url).await?
            }
            None => fetch_bytes(&base, &url).await?,
        };

        debug!(bytes = bytes.len(), "Dataset bytes received, parsing");
        let records = parse_records(&bytes, &dataset.schema())?;
        info!(rows = records.len(), "Dataset fetched");

        Ok(records)
    }
}
