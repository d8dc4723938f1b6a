//! Postings module: the normalized output schema and response normalization
//!
//! This module contains:
//! - `JobPosting` and `PostingsTable`, the stable output contract
//! - `CollectionIssue`, the diagnostics recorded for degraded boards
//! - Per-provider normalization of raw API records

mod normalize;
mod types;

pub use normalize::{normalize_greenhouse, normalize_lever, TEAM_SEPARATOR};
pub use types::{CollectionIssue, DescriptionSource, JobPosting, PostingsTable};

pub(crate) use normalize::{decode_records, AshbyListing, AshbyTeam};
pub(crate) use types::TableBuilder;
