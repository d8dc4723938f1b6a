//! Lever collector
//!
//! Same shape as Greenhouse: one GET to the combined postings endpoint,
//! descriptions inline, hard failure on any non-success status.

use crate::board::{BoardReference, Provider};
use crate::collectors::http::{build_http_client, encode_path_segment, endpoint, get_json, FetchResult};
use crate::collectors::{unavailable, PostingsCollector};
use crate::config::{CollectorConfig, LeverConfig};
use crate::postings::{normalize_lever, PostingsTable};
use crate::PostingsError;
use async_trait::async_trait;
use reqwest::Client;

/// Collector for `jobs.lever.co` boards
pub struct LeverCollector {
    client: Client,
    config: LeverConfig,
}

impl LeverCollector {
    pub fn new(config: &CollectorConfig) -> Result<Self, PostingsError> {
        Ok(Self {
            client: build_http_client(&config.http)?,
            config: config.lever.clone(),
        })
    }

    /// URL of the postings listing for a board token
    pub fn postings_url(&self, token: &str) -> String {
        endpoint(
            &self.config.api_base,
            &format!("/v0/postings/{}?mode=json", encode_path_segment(token)),
        )
    }
}

#[async_trait]
impl PostingsCollector for LeverCollector {
    fn provider(&self) -> Provider {
        Provider::Lever
    }

    async fn fetch(&self, board_url: &str) -> Result<PostingsTable, PostingsError> {
        let board = BoardReference::for_provider(board_url, Provider::Lever)?;
        let url = self.postings_url(&board.token);

        match get_json(&self.client, &url, self.config.timeout()).await {
            FetchResult::Success { body, .. } => Ok(normalize_lever(&board.token, body)),
            result @ FetchResult::InvalidBody { .. } => Ok(PostingsTable::empty_with_envelope(
                Provider::Lever,
                &board.token,
                &result.diagnostic_payload(),
            )),
            result => Err(unavailable(Provider::Lever, &url, result.describe())),
        }
    }
}

/// Fetches the postings of a Lever board
pub async fn get_postings(
    board_url: &str,
    config: &CollectorConfig,
) -> Result<PostingsTable, PostingsError> {
    LeverCollector::new(config)?.fetch(board_url).await
}
