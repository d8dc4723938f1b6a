//! Response normalization
//!
//! Each provider's raw records are decoded one at a time into a typed
//! record, so a single malformed record is skipped instead of failing the
//! board. Only the id and title are required; optional fields that are
//! missing, null or oddly shaped become `None`.

use crate::board::Provider;
use crate::postings::types::{DescriptionSource, JobPosting, PostingsTable, TableBuilder};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Separator used when several team or department names are joined
pub const TEAM_SEPARATOR: &str = ", ";

/// Accepts posting ids delivered as JSON strings or numbers
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) if !id.trim().is_empty() => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(de::Error::custom(format!("unusable posting id: {}", other))),
    }
}

/// Reads a display value out of a loosely typed optional field
///
/// Strings and numbers are used as-is, objects contribute their `name`,
/// arrays are joined with [`TEAM_SEPARATOR`]. Anything else is `None`.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(map) => map.get("name").and_then(text_of),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(text_of).collect();
            (!parts.is_empty()).then(|| parts.join(TEAM_SEPARATOR))
        }
        _ => None,
    }
}

/// Optional display field; an unexpected shape becomes `None`
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(&Value::deserialize(deserializer)?))
}

/// Optional HTML field; anything but a string becomes `None`
fn deserialize_html<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(html) => Ok(Some(html)),
        _ => Ok(None),
    }
}

/// List of named objects; entries without a usable name are skipped
fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.iter().filter_map(text_of).collect()),
        _ => Ok(Vec::new()),
    }
}

/// Best-effort id of a raw record, for diagnostics only
fn raw_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Decodes raw records into `T`, dropping the ones that do not fit
pub(crate) fn decode_records<T: DeserializeOwned>(
    records: Vec<Value>,
    builder: &mut TableBuilder,
) -> Vec<T> {
    let mut decoded = Vec::with_capacity(records.len());

    for record in records {
        match T::deserialize(&record) {
            Ok(value) => decoded.push(value),
            Err(e) => builder.drop_posting(raw_id(&record), format!("malformed record: {}", e)),
        }
    }

    decoded
}

/// A Greenhouse job from `/v1/boards/{token}/jobs?content=true`
///
/// Only `id` and `title` are required; every other field is read leniently.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GreenhouseJob {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_names")]
    departments: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_html")]
    content: Option<String>,
}

impl From<GreenhouseJob> for JobPosting {
    fn from(job: GreenhouseJob) -> Self {
        let team = job.departments.join(TEAM_SEPARATOR);
        let source = match job.content {
            Some(content) => DescriptionSource::Inline(content),
            None => DescriptionSource::Missing,
        };

        JobPosting::new(job.id, job.title, job.location, Some(team), source)
    }
}

/// A Lever posting from `/v0/postings/{token}?mode=json`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LeverPosting {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    text: String,
    #[serde(default)]
    categories: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_html")]
    description: Option<String>,
}

impl From<LeverPosting> for JobPosting {
    fn from(posting: LeverPosting) -> Self {
        let category = |key: &str| {
            posting
                .categories
                .as_ref()
                .and_then(|categories| categories.get(key))
                .and_then(text_of)
        };
        let location = category("location");
        let team = category("team");
        let source = match posting.description {
            Some(html) => DescriptionSource::Html(html),
            None => DescriptionSource::Missing,
        };

        JobPosting::new(posting.id, posting.text, location, team, source)
    }
}

/// An Ashby posting from either listing shape
///
/// The REST listing names the fields `location` and `team`; the GraphQL
/// listing uses `locationName` and `teamId`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AshbyListing {
    #[serde(deserialize_with = "deserialize_id")]
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(default, alias = "locationName", deserialize_with = "deserialize_text")]
    location: Option<String>,
    #[serde(default, alias = "teamId", deserialize_with = "deserialize_text")]
    team: Option<String>,
}

impl AshbyListing {
    /// Replaces a team id with the team's name when the board lists it
    pub(crate) fn resolve_team(&mut self, teams: &HashMap<String, String>) {
        if let Some(name) = self.team.as_ref().and_then(|id| teams.get(id)) {
            self.team = Some(name.clone());
        }
    }

    /// Builds the row once the posting's description has been fetched
    pub(crate) fn into_posting(self, description_html: Option<String>) -> JobPosting {
        let source = match description_html {
            Some(html) => DescriptionSource::Html(html),
            None => DescriptionSource::Missing,
        };

        JobPosting::new(self.id, self.title, self.location, self.team, source)
    }
}

/// An Ashby team from the GraphQL board listing
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AshbyTeam {
    #[serde(deserialize_with = "deserialize_id")]
    pub(crate) id: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub(crate) name: Option<String>,
}

/// Normalizes a Greenhouse response body
///
/// The body must be an object with a `jobs` array; anything else is an
/// envelope error and yields an empty table.
pub fn normalize_greenhouse(token: &str, body: Value) -> PostingsTable {
    let Some(jobs) = body.get("jobs").and_then(Value::as_array) else {
        return PostingsTable::empty_with_envelope(Provider::Greenhouse, token, &body);
    };

    let mut builder = TableBuilder::new(Provider::Greenhouse, token);
    for job in decode_records::<GreenhouseJob>(jobs.clone(), &mut builder) {
        builder.push(job.into());
    }
    builder.finish()
}

/// Normalizes a Lever response body
///
/// The body must be a top-level array of postings; anything else is an
/// envelope error and yields an empty table.
pub fn normalize_lever(token: &str, body: Value) -> PostingsTable {
    let Value::Array(postings) = body else {
        return PostingsTable::empty_with_envelope(Provider::Lever, token, &body);
    };

    let mut builder = TableBuilder::new(Provider::Lever, token);
    for posting in decode_records::<LeverPosting>(postings, &mut builder) {
        builder.push(posting.into());
    }
    builder.finish()
}
