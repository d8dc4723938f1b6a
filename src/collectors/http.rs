//! HTTP plumbing shared by the collectors
//!
//! This module handles:
//! - Building the HTTP client with the configured user agent
//! - GET and POST requests with a per-request timeout
//! - Classifying responses into success, HTTP error, transport error and
//!   unreadable body, without any retry

use crate::config::HttpConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Characters escaped when a token is placed in a URL path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Longest unreadable body kept for diagnostics, in characters
const MAX_BODY_CHARS: usize = 300;

/// Result of one request
#[derive(Debug)]
pub enum FetchResult {
    /// 2xx response with a JSON body
    Success {
        /// HTTP status code
        status: u16,
        /// Parsed JSON body
        body: Value,
    },

    /// Non-2xx response
    HttpError {
        /// HTTP status code
        status: u16,
        /// The body, when it was JSON
        body: Option<Value>,
    },

    /// Response whose body could not be read as JSON
    InvalidBody {
        /// HTTP status code
        status: u16,
        /// Start of the raw body
        text: String,
    },

    /// Transport failure (connect, timeout, TLS, ...)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// The JSON body of any response that had one
    pub fn json(&self) -> Option<&Value> {
        match self {
            Self::Success { body, .. } => Some(body),
            Self::HttpError { body, .. } => body.as_ref(),
            Self::InvalidBody { .. } | Self::NetworkError { .. } => None,
        }
    }

    /// Whether the server answered at all
    pub fn is_response(&self) -> bool {
        !matches!(self, Self::NetworkError { .. })
    }

    /// Short human-readable description of a failed request
    pub fn describe(&self) -> String {
        match self {
            Self::Success { status, .. } => format!("HTTP {}", status),
            Self::HttpError { status, .. } => format!("HTTP {}", status),
            Self::InvalidBody { status, .. } => format!("HTTP {} with unreadable body", status),
            Self::NetworkError { error } => error.clone(),
        }
    }

    /// A diagnostic payload for envelope errors
    pub fn diagnostic_payload(&self) -> Value {
        match self {
            Self::Success { body, .. } => body.clone(),
            Self::HttpError { body: Some(body), .. } => body.clone(),
            Self::InvalidBody { text, .. } => Value::String(text.clone()),
            _ => Value::String(self.describe()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Per-request timeouts are set by each collector; the client only carries
/// the connect timeout.
///
/// # Example
///
/// ```
/// use ats_postings::collectors::build_http_client;
/// use ats_postings::config::HttpConfig;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a GET request expecting JSON
pub async fn get_json(client: &Client, url: &str, timeout: Duration) -> FetchResult {
    tracing::debug!(url = %url, "GET");
    send(client.get(url).timeout(timeout)).await
}

/// Sends a POST request with a JSON payload, expecting JSON back
pub async fn post_json(client: &Client, url: &str, payload: &Value, timeout: Duration) -> FetchResult {
    tracing::debug!(url = %url, "POST");
    send(client.post(url).json(payload).timeout(timeout)).await
}

async fn send(request: RequestBuilder) -> FetchResult {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return classify_error(e),
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(body) if status.is_success() => FetchResult::Success {
            status: status.as_u16(),
            body,
        },
        Ok(body) => FetchResult::HttpError {
            status: status.as_u16(),
            body: Some(body),
        },
        Err(_) if !status.is_success() => FetchResult::HttpError {
            status: status.as_u16(),
            body: None,
        },
        Err(_) => FetchResult::InvalidBody {
            status: status.as_u16(),
            text: text.chars().take(MAX_BODY_CHARS).collect(),
        },
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };

    FetchResult::NetworkError { error }
}

/// Escapes a board token for use as a URL path segment
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Joins an endpoint base and a path, tolerating a trailing slash on the base
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
