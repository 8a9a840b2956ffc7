//! Data model shared by stores, the tracker and the HTTP layer.
//!
//! All JSON field names are camelCase, which is what the browser clients
//! expect.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Current time at the precision stores persist (microseconds).
///
/// Timestamps handed out by a store must compare equal to the ones read back
/// later, so they are truncated before being returned.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A URL registered for repeated snapshot capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedWebsite {
    pub id: String,
    pub url: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Request to register a website.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWebsite {
    pub url: String,
    pub name: Option<String>,
}

impl NewWebsite {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A website together with the capture time of its newest snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteSummary {
    pub website: TrackedWebsite,
    pub latest_snapshot: Option<DateTime<Utc>>,
}

/// A captured serialization of a page's DOM at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub website_id: String,
    pub content: String,
    pub captured_at: DateTime<Utc>,
}

/// A snapshot with its content cut down to a leading excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotExcerpt {
    pub id: String,
    pub captured_at: DateTime<Utc>,
    pub excerpt: String,
}

/// Take the first `max_chars` characters of `content`.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => content[..idx].to_string(),
        None => content.to_string(),
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
