use serde::Deserialize;
use std::time::Duration;

pub const ASHBY_API_BASE: &str = "https://api.ashbyhq.com";
pub const ASHBY_GRAPHQL_BASE: &str = "https://jobs.ashbyhq.com";
pub const GREENHOUSE_API_BASE: &str = "https://boards-api.greenhouse.io";
pub const LEVER_API_BASE: &str = "https://api.lever.co";

/// Main configuration structure for postings collection
///
/// Every section is optional; a missing section or key falls back to the
/// public provider endpoints and their default timeouts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub http: HttpConfig,
    pub ashby: AshbyConfig,
    pub greenhouse: GreenhouseConfig,
    pub lever: LeverConfig,
}

/// HTTP client configuration shared by all collectors
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// TCP connect timeout (seconds)
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            connect_timeout_secs: 10,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Ashby endpoints and timeouts
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AshbyConfig {
    /// Base of the REST posting API (primary listing)
    pub api_base: String,

    /// Base of the non-user GraphQL API (fallback listing and details)
    pub graphql_base: String,

    /// Timeout of the primary REST listing request (seconds)
    pub list_timeout_secs: u64,

    /// Timeout of each GraphQL request (seconds)
    pub graphql_timeout_secs: u64,
}

impl Default for AshbyConfig {
    fn default() -> Self {
        Self {
            api_base: ASHBY_API_BASE.to_string(),
            graphql_base: ASHBY_GRAPHQL_BASE.to_string(),
            list_timeout_secs: 15,
            graphql_timeout_secs: 30,
        }
    }
}

impl AshbyConfig {
    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    pub fn graphql_timeout(&self) -> Duration {
        Duration::from_secs(self.graphql_timeout_secs)
    }
}

/// Greenhouse endpoint and timeout
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GreenhouseConfig {
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for GreenhouseConfig {
    fn default() -> Self {
        Self {
            api_base: GREENHOUSE_API_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

impl GreenhouseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Lever endpoint and timeout
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LeverConfig {
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for LeverConfig {
    fn default() -> Self {
        Self {
            api_base: LEVER_API_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

impl LeverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
