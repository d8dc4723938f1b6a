//! Greenhouse collector
//!
//! One GET to the board's combined listing endpoint with `content=true`
//! returns every posting with its description inline. Any non-success
//! status is a hard failure; there is no fallback and no retry.

use crate::board::{BoardReference, Provider};
use crate::collectors::http::{build_http_client, encode_path_segment, endpoint, get_json, FetchResult};
use crate::collectors::{unavailable, PostingsCollector};
use crate::config::{CollectorConfig, GreenhouseConfig};
use crate::postings::{normalize_greenhouse, PostingsTable};
use crate::PostingsError;
use async_trait::async_trait;
use reqwest::Client;

/// Collector for `boards.greenhouse.io` boards
pub struct GreenhouseCollector {
    client: Client,
    config: GreenhouseConfig,
}

impl GreenhouseCollector {
    pub fn new(config: &CollectorConfig) -> Result<Self, PostingsError> {
        Ok(Self {
            client: build_http_client(&config.http)?,
            config: config.greenhouse.clone(),
        })
    }

    /// URL of the combined listing for a board token
    pub fn jobs_url(&self, token: &str) -> String {
        endpoint(
            &self.config.api_base,
            &format!("/v1/boards/{}/jobs?content=true", encode_path_segment(token)),
        )
    }
}

#[async_trait]
impl PostingsCollector for GreenhouseCollector {
    fn provider(&self) -> Provider {
        Provider::Greenhouse
    }

    async fn fetch(&self, board_url: &str) -> Result<PostingsTable, PostingsError> {
        let board = BoardReference::for_provider(board_url, Provider::Greenhouse)?;
        let url = self.jobs_url(&board.token);

        match get_json(&self.client, &url, self.config.timeout()).await {
            FetchResult::Success { body, .. } => Ok(normalize_greenhouse(&board.token, body)),
            result @ FetchResult::InvalidBody { .. } => Ok(PostingsTable::empty_with_envelope(
                Provider::Greenhouse,
                &board.token,
                &result.diagnostic_payload(),
            )),
            result => Err(unavailable(Provider::Greenhouse, &url, result.describe())),
        }
    }
}

/// Fetches the postings of a Greenhouse board
///
/// # Example
///
/// ```no_run
/// use ats_postings::collectors::greenhouse;
/// use ats_postings::CollectorConfig;
///
/// # async fn example() -> ats_postings::Result<()> {
/// let table = greenhouse::get_postings("https://boards.greenhouse.io/carta", &CollectorConfig::default()).await?;
/// println!("{} postings", table.len());
/// # Ok(())
/// # }
/// ```
pub async fn get_postings(
    board_url: &str,
    config: &CollectorConfig,
) -> Result<PostingsTable, PostingsError> {
    GreenhouseCollector::new(config)?.fetch(board_url).await
}
