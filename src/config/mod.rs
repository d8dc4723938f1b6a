//! Configuration module for postings collection
//!
//! Provider endpoint bases, per-request timeouts and the HTTP user agent.
//! The defaults target the public provider APIs, so a configuration file is
//! optional; when given it is TOML and is validated before use.
//!
//! # Example
//!
//! ```no_run
//! use ats_postings::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("postings.toml")).unwrap();
//! println!("Greenhouse timeout: {}s", config.greenhouse.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AshbyConfig, CollectorConfig, GreenhouseConfig, HttpConfig, LeverConfig, ASHBY_API_BASE,
    ASHBY_GRAPHQL_BASE, GREENHOUSE_API_BASE, LEVER_API_BASE,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
