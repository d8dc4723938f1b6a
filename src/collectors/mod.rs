//! Collectors module: per-provider retrieval of job postings
//!
//! This module contains:
//! - The `PostingsCollector` capability shared by every provider
//! - Host-based selection of the collector for a board URL
//! - The Ashby, Greenhouse and Lever retrieval protocols
//! - HTTP plumbing with per-request timeouts

pub mod ashby;
pub mod greenhouse;
mod http;
pub mod lever;

pub use ashby::AshbyCollector;
pub use greenhouse::GreenhouseCollector;
pub use http::{build_http_client, FetchResult};
pub use lever::LeverCollector;

use crate::board::{BoardReference, Provider};
use crate::config::CollectorConfig;
use crate::postings::PostingsTable;
use crate::PostingsError;
use async_trait::async_trait;

/// Retrieves and normalizes the postings of one public board
///
/// Implementations hold no state between calls beyond their HTTP client and
/// configuration; every call is an independent invocation.
#[async_trait]
pub trait PostingsCollector: Send + Sync {
    /// The provider this collector talks to
    fn provider(&self) -> Provider;

    /// Fetches every open posting of the board at `board_url`
    ///
    /// # Returns
    ///
    /// * `Ok(PostingsTable)` - The board's postings, possibly empty or with dropped rows
    /// * `Err(PostingsError::InvalidBoardUrl)` - No token could be derived from the URL
    /// * `Err(PostingsError::UpstreamUnavailable)` - The provider could not be reached
    async fn fetch(&self, board_url: &str) -> Result<PostingsTable, PostingsError>;
}

/// Selects the collector for a board URL by matching its host
///
/// # Example
///
/// ```
/// use ats_postings::{collector_for, CollectorConfig, Provider};
///
/// let collector = collector_for("https://jobs.lever.co/kong", &CollectorConfig::default()).unwrap();
/// assert_eq!(collector.provider(), Provider::Lever);
/// ```
pub fn collector_for(
    board_url: &str,
    config: &CollectorConfig,
) -> Result<Box<dyn PostingsCollector>, PostingsError> {
    let board = BoardReference::parse(board_url)?;

    let collector: Box<dyn PostingsCollector> = match board.provider {
        Provider::Ashby => Box::new(AshbyCollector::new(config)?),
        Provider::Greenhouse => Box::new(GreenhouseCollector::new(config)?),
        Provider::Lever => Box::new(LeverCollector::new(config)?),
    };

    Ok(collector)
}

/// Fetches the postings of any supported board
///
/// This is the one-call entry point: the provider is chosen from the URL's
/// host and the board is collected with a fresh client.
pub async fn collect_postings(
    board_url: &str,
    config: &CollectorConfig,
) -> Result<PostingsTable, PostingsError> {
    let collector = collector_for(board_url, config)?;
    tracing::info!(provider = %collector.provider(), board_url = %board_url, "Collecting board");
    collector.fetch(board_url).await
}

/// Builds the hard failure for an unreachable provider endpoint
fn unavailable(provider: Provider, url: &str, reason: impl Into<String>) -> PostingsError {
    let reason = reason.into();
    tracing::error!(provider = %provider, url = %url, reason = %reason, "Upstream unavailable");
    PostingsError::UpstreamUnavailable {
        provider,
        url: url.to_string(),
        reason,
    }
}
