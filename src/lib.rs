//! ats-postings: job postings from public ATS boards
//!
//! This crate fetches the open postings of a public Applicant Tracking System
//! board (Ashby, Greenhouse or Lever) and normalizes them into one common
//! tabular schema, tolerating per-posting and per-board failures.

pub mod board;
pub mod collectors;
pub mod config;
pub mod html;
pub mod postings;

use thiserror::Error;

/// Main error type for postings retrieval
#[derive(Debug, Error)]
pub enum PostingsError {
    #[error("Invalid board URL: {0}")]
    InvalidBoardUrl(String),

    #[error("Unsupported job board host: {0}")]
    UnsupportedBoard(String),

    #[error("{provider} upstream unavailable at {url}: {reason}")]
    UpstreamUnavailable {
        provider: board::Provider,
        url: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for postings operations
pub type Result<T> = std::result::Result<T, PostingsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use board::{extract_board_token, token_from_url, BoardReference, Provider, SlugRule};
pub use collectors::{collect_postings, collector_for, PostingsCollector};
pub use config::CollectorConfig;
pub use html::html_to_text;
pub use postings::{CollectionIssue, JobPosting, PostingsTable};
