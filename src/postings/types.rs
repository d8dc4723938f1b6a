//! Posting and table types
//!
//! This module defines the normalized output schema shared by every provider
//! and the diagnostics recorded when a board or posting degrades.

use crate::board::Provider;
use crate::html::html_to_text;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Longest diagnostic payload kept on a table, in characters
const MAX_PAYLOAD_CHARS: usize = 500;

/// Where a posting's description comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionSource {
    /// Raw HTML that is kept as `description_html`
    Html(String),
    /// Inline content that is converted but not kept
    Inline(String),
    /// No description delivered
    Missing,
}

/// One normalized job posting
///
/// `description` is always derived from the description source through
/// [`html_to_text`], so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobPosting {
    posting_id: String,
    title: String,
    location: Option<String>,
    team: Option<String>,
    description_html: Option<String>,
    description: String,
}

impl JobPosting {
    pub fn new(
        posting_id: impl Into<String>,
        title: impl Into<String>,
        location: Option<String>,
        team: Option<String>,
        source: DescriptionSource,
    ) -> Self {
        let (description_html, description) = match source {
            DescriptionSource::Html(html) => {
                let text = html_to_text(&html);
                (Some(html), text)
            }
            DescriptionSource::Inline(content) => (None, html_to_text(&content)),
            DescriptionSource::Missing => (None, String::new()),
        };

        Self {
            posting_id: posting_id.into(),
            title: title.into(),
            location,
            team,
            description_html,
            description,
        }
    }

    pub fn posting_id(&self) -> &str {
        &self.posting_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    pub fn description_html(&self) -> Option<&str> {
        self.description_html.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A degradation recorded while collecting a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectionIssue {
    /// The provider answered without its data envelope; the board is empty
    Envelope { payload: String },

    /// A single posting was left out of the table
    DroppedPosting {
        posting_id: Option<String>,
        reason: String,
    },
}

/// Ordered postings collected from one board in one invocation
///
/// A table cannot be modified once returned. Rows may be fewer than the
/// board's real posting count; [`PostingsTable::dropped`] and
/// [`PostingsTable::issues`] tell why.
#[derive(Debug, Clone, Serialize)]
pub struct PostingsTable {
    provider: Provider,
    token: String,
    rows: Vec<JobPosting>,
    issues: Vec<CollectionIssue>,
}

impl PostingsTable {
    /// Builds the empty result for a response that lacked its data envelope
    pub fn empty_with_envelope(provider: Provider, token: &str, payload: &Value) -> Self {
        let mut builder = TableBuilder::new(provider, token);
        builder.envelope(payload);
        builder.finish()
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn rows(&self) -> &[JobPosting] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobPosting> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<JobPosting> {
        self.rows
    }

    pub fn issues(&self) -> &[CollectionIssue] {
        &self.issues
    }

    /// Number of postings left out of the table
    pub fn dropped(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, CollectionIssue::DroppedPosting { .. }))
            .count()
    }

    /// The recorded error payload if the board answered without data
    pub fn envelope_error(&self) -> Option<&str> {
        self.issues.iter().find_map(|issue| match issue {
            CollectionIssue::Envelope { payload } => Some(payload.as_str()),
            _ => None,
        })
    }

    /// Finds a row by its posting id
    pub fn get(&self, posting_id: &str) -> Option<&JobPosting> {
        self.rows.iter().find(|row| row.posting_id == posting_id)
    }
}

impl<'a> IntoIterator for &'a PostingsTable {
    type Item = &'a JobPosting;
    type IntoIter = std::slice::Iter<'a, JobPosting>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Accumulates rows and diagnostics for one board
///
/// Keeps `posting_id` unique: a repeated id is dropped and recorded.
#[derive(Debug)]
pub(crate) struct TableBuilder {
    provider: Provider,
    token: String,
    rows: Vec<JobPosting>,
    issues: Vec<CollectionIssue>,
    seen: HashSet<String>,
}

impl TableBuilder {
    pub(crate) fn new(provider: Provider, token: &str) -> Self {
        Self {
            provider,
            token: token.to_string(),
            rows: Vec::new(),
            issues: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub(crate) fn push(&mut self, posting: JobPosting) {
        if !self.seen.insert(posting.posting_id.clone()) {
            let posting_id = posting.posting_id;
            self.drop_posting(Some(posting_id), "duplicate posting id");
            return;
        }

        self.rows.push(posting);
    }

    pub(crate) fn drop_posting(&mut self, posting_id: Option<String>, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(
            provider = %self.provider,
            token = %self.token,
            posting_id = posting_id.as_deref().unwrap_or("<unknown>"),
            reason = %reason,
            "Dropping posting"
        );
        self.issues
            .push(CollectionIssue::DroppedPosting { posting_id, reason });
    }

    pub(crate) fn envelope(&mut self, payload: &Value) {
        let payload = summarize_payload(payload);
        tracing::warn!(
            provider = %self.provider,
            token = %self.token,
            payload = %payload,
            "Response lacked data envelope, returning empty table"
        );
        self.issues.push(CollectionIssue::Envelope { payload });
    }

    pub(crate) fn finish(self) -> PostingsTable {
        let table = PostingsTable {
            provider: self.provider,
            token: self.token,
            rows: self.rows,
            issues: self.issues,
        };

        tracing::info!(
            provider = %table.provider,
            token = %table.token,
            rows = table.len(),
            dropped = table.dropped(),
            "Collected postings"
        );

        table
    }
}

/// Renders an error payload for diagnostics, preferring its `errors` member
fn summarize_payload(payload: &Value) -> String {
    let focus = payload.get("errors").unwrap_or(payload);
    let rendered = focus.to_string();

    if rendered.chars().count() <= MAX_PAYLOAD_CHARS {
        rendered
    } else {
        let mut truncated: String = rendered.chars().take(MAX_PAYLOAD_CHARS).collect();
        truncated.push_str("...");
        truncated
    }
}
