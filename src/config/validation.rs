use crate::config::types::{CollectorConfig, HttpConfig};
use crate::ConfigError;
use url::Url;

const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &CollectorConfig) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;

    validate_base_url("ashby.api-base", &config.ashby.api_base)?;
    validate_base_url("ashby.graphql-base", &config.ashby.graphql_base)?;
    validate_timeout("ashby.list-timeout-secs", config.ashby.list_timeout_secs)?;
    validate_timeout("ashby.graphql-timeout-secs", config.ashby.graphql_timeout_secs)?;

    validate_base_url("greenhouse.api-base", &config.greenhouse.api_base)?;
    validate_timeout("greenhouse.timeout-secs", config.greenhouse.timeout_secs)?;

    validate_base_url("lever.api-base", &config.lever.api_base)?;
    validate_timeout("lever.timeout-secs", config.lever.timeout_secs)?;

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "http.user-agent cannot be empty".to_string(),
        ));
    }

    validate_timeout("http.connect-timeout-secs", config.connect_timeout_secs)
}

/// Validates that an endpoint base is an absolute HTTP(S) URL
fn validate_base_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("{} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            key, value
        )));
    }

    Ok(())
}

fn validate_timeout(key: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            key, MAX_TIMEOUT_SECS, secs
        )));
    }

    Ok(())
}
