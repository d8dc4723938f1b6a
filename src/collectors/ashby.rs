//! Ashby collector
//!
//! # Request Flow
//!
//! 1. GET the REST job board listing
//!    - HTTP 200 with a `jobs` array → use it
//! 2. Otherwise fall back once to the GraphQL `ApiJobBoardWithTeams` query
//!    - transport failure → `UpstreamUnavailable`
//!    - no `data.jobBoard` envelope → empty table with a diagnostic
//! 3. For each listed posting, one GraphQL `ApiJobPosting` query for its HTML
//!    description
//!    - no `data.jobPosting` envelope or a failed request drops only that
//!      posting
//!
//! Detail requests are issued one at a time, after the listing completes.

use crate::board::{BoardReference, Provider};
use crate::collectors::http::{build_http_client, endpoint, get_json, post_json, FetchResult};
use crate::collectors::{unavailable, PostingsCollector};
use crate::config::{AshbyConfig, CollectorConfig};
use crate::postings::{decode_records, AshbyListing, AshbyTeam, PostingsTable, TableBuilder};
use crate::PostingsError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use url::Url;

const JOB_BOARD_OPERATION: &str = "ApiJobBoardWithTeams";
const JOB_POSTING_OPERATION: &str = "ApiJobPosting";

const JOB_BOARD_QUERY: &str = r#"query ApiJobBoardWithTeams($organizationHostedJobsPageName: String!) {
  jobBoard: jobBoardWithTeams(
    organizationHostedJobsPageName: $organizationHostedJobsPageName
  ) {
    teams { id name }
    jobPostings { id title teamId locationName }
  }
}"#;

const JOB_POSTING_QUERY: &str = r#"query ApiJobPosting(
  $organizationHostedJobsPageName: String!,
  $jobPostingId: String!
) {
  jobPosting(
    organizationHostedJobsPageName: $organizationHostedJobsPageName,
    jobPostingId: $jobPostingId
  ) { id title descriptionHtml }
}"#;

/// Listing of a board, or the reason it has no data
enum Listing {
    Postings(Vec<AshbyListing>),
    Envelope(Value),
}

/// Collector for `jobs.ashbyhq.com` boards
pub struct AshbyCollector {
    client: Client,
    config: AshbyConfig,
}

impl AshbyCollector {
    pub fn new(config: &CollectorConfig) -> Result<Self, PostingsError> {
        Ok(Self {
            client: build_http_client(&config.http)?,
            config: config.ashby.clone(),
        })
    }

    /// URL of the primary REST listing for an organization slug
    pub fn job_board_url(&self, token: &str) -> String {
        let base = endpoint(&self.config.api_base, "/posting-api/job-board");
        match Url::parse_with_params(&base, &[("organizationSlug", token)]) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}?organizationSlug={}", base, token),
        }
    }

    /// URL of a GraphQL operation
    pub fn graphql_url(&self, operation: &str) -> String {
        endpoint(
            &self.config.graphql_base,
            &format!("/api/non-user-graphql?op={}", operation),
        )
    }

    /// Lists the board's postings, falling back to GraphQL once
    async fn fetch_listing(
        &self,
        token: &str,
        builder: &mut TableBuilder,
    ) -> Result<Listing, PostingsError> {
        let rest_url = self.job_board_url(token);
        let primary = get_json(&self.client, &rest_url, self.config.list_timeout()).await;

        if let FetchResult::Success { status, body } = &primary {
            if *status == StatusCode::OK.as_u16() {
                if let Some(jobs) = body.get("jobs").and_then(Value::as_array) {
                    tracing::debug!(token = %token, postings = jobs.len(), "Listed board via REST");
                    return Ok(Listing::Postings(decode_records(jobs.clone(), builder)));
                }
            }
        }

        tracing::info!(
            token = %token,
            reason = %primary.describe(),
            "REST listing unusable, falling back to GraphQL"
        );
        self.fetch_listing_graphql(token, builder).await
    }

    async fn fetch_listing_graphql(
        &self,
        token: &str,
        builder: &mut TableBuilder,
    ) -> Result<Listing, PostingsError> {
        let url = self.graphql_url(JOB_BOARD_OPERATION);
        let payload = json!({
            "operationName": JOB_BOARD_OPERATION,
            "query": JOB_BOARD_QUERY,
            "variables": { "organizationHostedJobsPageName": token },
        });

        let result = post_json(&self.client, &url, &payload, self.config.graphql_timeout()).await;
        if !result.is_response() {
            return Err(unavailable(Provider::Ashby, &url, result.describe()));
        }

        let Some(board) = result
            .json()
            .and_then(|body| body.pointer("/data/jobBoard"))
            .filter(|board| board.is_object())
        else {
            return Ok(Listing::Envelope(result.diagnostic_payload()));
        };

        let teams: HashMap<String, String> = board
            .get("teams")
            .and_then(Value::as_array)
            .map(|teams| {
                teams
                    .iter()
                    .filter_map(|team| serde_json::from_value::<AshbyTeam>(team.clone()).ok())
                    .filter_map(|team| Some((team.id, team.name?)))
                    .collect()
            })
            .unwrap_or_default();

        let records = board
            .get("jobPostings")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut listings: Vec<AshbyListing> = decode_records(records, builder);
        for listing in &mut listings {
            listing.resolve_team(&teams);
        }

        tracing::debug!(token = %token, postings = listings.len(), "Listed board via GraphQL");
        Ok(Listing::Postings(listings))
    }

    /// Fetches one posting's description HTML
    ///
    /// `Err` carries the reason the posting has to be dropped.
    async fn fetch_description(&self, token: &str, posting_id: &str) -> Result<Option<String>, String> {
        let url = self.graphql_url(JOB_POSTING_OPERATION);
        let payload = json!({
            "operationName": JOB_POSTING_OPERATION,
            "query": JOB_POSTING_QUERY,
            "variables": {
                "organizationHostedJobsPageName": token,
                "jobPostingId": posting_id,
            },
        });

        let result = post_json(&self.client, &url, &payload, self.config.graphql_timeout()).await;
        if !result.is_response() {
            return Err(format!("detail request failed: {}", result.describe()));
        }

        match result
            .json()
            .and_then(|body| body.pointer("/data/jobPosting"))
            .filter(|posting| posting.is_object())
        {
            Some(posting) => Ok(posting
                .get("descriptionHtml")
                .and_then(Value::as_str)
                .map(str::to_string)),
            None => Err(format!(
                "detail response lacked data envelope ({})",
                result.describe()
            )),
        }
    }
}

#[async_trait]
impl PostingsCollector for AshbyCollector {
    fn provider(&self) -> Provider {
        Provider::Ashby
    }

    async fn fetch(&self, board_url: &str) -> Result<PostingsTable, PostingsError> {
        let board = BoardReference::for_provider(board_url, Provider::Ashby)?;
        let token = board.token.as_str();
        let mut builder = TableBuilder::new(Provider::Ashby, token);

        let listings = match self.fetch_listing(token, &mut builder).await? {
            Listing::Postings(listings) => listings,
            Listing::Envelope(payload) => {
                builder.envelope(&payload);
                return Ok(builder.finish());
            }
        };

        for listing in listings {
            match self.fetch_description(token, &listing.id).await {
                Ok(description_html) => builder.push(listing.into_posting(description_html)),
                Err(reason) => builder.drop_posting(Some(listing.id), reason),
            }
        }

        Ok(builder.finish())
    }
}

/// Fetches the postings of an Ashby board
pub async fn get_postings(
    board_url: &str,
    config: &CollectorConfig,
) -> Result<PostingsTable, PostingsError> {
    AshbyCollector::new(config)?.fetch(board_url).await
}
