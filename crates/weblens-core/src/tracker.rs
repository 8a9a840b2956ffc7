//! Snapshot tracker service.
//!
//! Validates requests, composes store queries and runs the diff. The HTTP
//! layer maps [`TrackerError`] kinds onto status codes and does nothing else.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use weblens_protocols::{
    InsertOutcome, NewWebsite, Snapshot, SnapshotStore, TrackedWebsite, WebsiteSummary,
};

use crate::diff::{diff_lines, DiffChunk, DiffStats};
use crate::error::TrackerError;

/// Suffix appended to every history preview.
pub const PREVIEW_ELLIPSIS: &str = "...";

/// Tracker limits.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Maximum number of snapshots returned by [`Tracker::history`].
    pub history_limit: usize,
    /// Number of leading characters kept in a history preview.
    pub preview_chars: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            preview_chars: 100,
        }
    }
}

/// Result of [`Tracker::track_website`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tracked {
    Created(TrackedWebsite),
    AlreadyTracked(TrackedWebsite),
}

impl From<InsertOutcome> for Tracked {
    fn from(outcome: InsertOutcome) -> Self {
        match outcome {
            InsertOutcome::Created(w) => Self::Created(w),
            InsertOutcome::Exists(w) => Self::AlreadyTracked(w),
        }
    }
}

/// A website as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteOverview {
    pub id: String,
    pub url: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub latest_snapshot: Option<DateTime<Utc>>,
}

impl From<WebsiteSummary> for WebsiteOverview {
    fn from(summary: WebsiteSummary) -> Self {
        let WebsiteSummary {
            website,
            latest_snapshot,
        } = summary;
        Self {
            id: website.id,
            url: website.url,
            name: website.name,
            created_at: website.created_at,
            latest_snapshot,
        }
    }
}

/// Acknowledgement for a stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotReceipt {
    pub id: String,
    pub website_id: String,
    pub captured_at: DateTime<Utc>,
    /// Length in UTF-16 code units, the unit browser clients measure in.
    pub content_length: usize,
}

impl From<&Snapshot> for SnapshotReceipt {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            website_id: snapshot.website_id.clone(),
            captured_at: snapshot.captured_at,
            content_length: snapshot.content.encode_utf16().count(),
        }
    }
}

/// One entry of a website's capture history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPreview {
    pub id: String,
    pub captured_at: DateTime<Utc>,
    pub content_preview: String,
}

/// Diff between the two newest snapshots of a website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDiff {
    /// Capture time of the older snapshot.
    pub older: DateTime<Utc>,
    /// Capture time of the newer snapshot.
    pub newer: DateTime<Utc>,
    pub older_id: String,
    pub newer_id: String,
    pub changes: Vec<DiffChunk>,
    pub stats: DiffStats,
}

/// Result of [`Tracker::diff_latest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    Ready(SnapshotDiff),
    /// Fewer than two snapshots exist; `available` says how many do.
    NotEnoughSnapshots { available: usize },
}

/// The tracker service.
#[derive(Clone)]
pub struct Tracker {
    store: Arc<dyn SnapshotStore>,
    config: TrackerConfig,
}

impl Tracker {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self::with_config(store, TrackerConfig::default())
    }

    pub fn with_config(store: Arc<dyn SnapshotStore>, config: TrackerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Register a website, or report the existing registration for its URL.
    pub async fn track_website(
        &self,
        url: Option<&str>,
        name: Option<String>,
    ) -> Result<Tracked, TrackerError> {
        let url = require(url, "URL is required")?;
        let mut website = NewWebsite::new(url);
        website.name = name;

        let tracked: Tracked = self.store.insert_website(website).await?.into();
        match &tracked {
            Tracked::Created(w) => info!("Tracking website {} ({})", w.url, w.id),
            Tracked::AlreadyTracked(w) => debug!("Website {} already tracked as {}", w.url, w.id),
        }
        Ok(tracked)
    }

    /// Store a snapshot for a known website.
    pub async fn capture(
        &self,
        website_id: &str,
        content: Option<String>,
    ) -> Result<SnapshotReceipt, TrackerError> {
        let content = require_content(content)?;
        let snapshot = self.store.insert_snapshot(website_id, content).await?;
        let receipt = SnapshotReceipt::from(&snapshot);
        info!(
            "Captured snapshot {} for website {} ({} chars)",
            receipt.id, website_id, receipt.content_length
        );
        Ok(receipt)
    }

    /// Store a snapshot keyed by URL, registering the website on first capture.
    pub async fn capture_by_url(
        &self,
        url: Option<&str>,
        content: Option<String>,
    ) -> Result<SnapshotReceipt, TrackerError> {
        let url = require(url, "URL is required")?;
        let content = require_content(content)?;

        let website = self
            .store
            .insert_website(NewWebsite::new(url))
            .await?
            .into_website();
        self.capture(&website.id, Some(content)).await
    }

    /// All active websites with their newest capture time.
    pub async fn list_websites(&self) -> Result<Vec<WebsiteOverview>, TrackerError> {
        let websites = self.store.list_websites().await?;
        Ok(websites.into_iter().map(WebsiteOverview::from).collect())
    }

    /// A single website with its newest capture time.
    pub async fn website(&self, website_id: &str) -> Result<WebsiteOverview, TrackerError> {
        let website = self.require_website(website_id).await?;
        let latest_snapshot = self.store.latest_capture_time(website_id).await?;
        Ok(WebsiteSummary {
            website,
            latest_snapshot,
        }
        .into())
    }

    /// Newest-first capture history with content previews.
    pub async fn history(&self, website_id: &str) -> Result<Vec<SnapshotPreview>, TrackerError> {
        self.require_website(website_id).await?;
        let excerpts = self
            .store
            .recent_excerpts(
                website_id,
                self.config.history_limit,
                self.config.preview_chars,
            )
            .await?;

        Ok(excerpts
            .into_iter()
            .map(|e| SnapshotPreview {
                id: e.id,
                captured_at: e.captured_at,
                content_preview: format!("{}{}", e.excerpt, PREVIEW_ELLIPSIS),
            })
            .collect())
    }

    /// Full content of the newest snapshot of a website.
    pub async fn latest_content(&self, website_id: &str) -> Result<Snapshot, TrackerError> {
        self.require_website(website_id).await?;
        self.store
            .recent_snapshots(website_id, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TrackerError::not_found("No snapshots found"))
    }

    /// A snapshot by ID.
    pub async fn snapshot(&self, snapshot_id: &str) -> Result<Snapshot, TrackerError> {
        self.store
            .get_snapshot(snapshot_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Snapshot not found"))
    }

    /// Diff the two newest snapshots of a website.
    pub async fn diff_latest(&self, website_id: &str) -> Result<DiffOutcome, TrackerError> {
        self.require_website(website_id).await?;
        let mut recent = self.store.recent_snapshots(website_id, 2).await?;
        if recent.len() < 2 {
            debug!(
                "Not enough snapshots to diff website {} ({} available)",
                website_id,
                recent.len()
            );
            return Ok(DiffOutcome::NotEnoughSnapshots {
                available: recent.len(),
            });
        }

        let older = recent.remove(1);
        let newer = recent.remove(0);

        // Whole-page HTML can be large; keep the line diff off the async workers.
        let (older, newer, changes) = tokio::task::spawn_blocking(move || {
            let changes = diff_lines(&older.content, &newer.content);
            (older, newer, changes)
        })
        .await
        .map_err(|e| TrackerError::Internal(e.to_string()))?;

        let stats = DiffStats::from_chunks(&changes);
        debug!(
            "Diffed {} -> {}: +{} -{} lines",
            older.id, newer.id, stats.added, stats.removed
        );

        Ok(DiffOutcome::Ready(SnapshotDiff {
            older: older.captured_at,
            newer: newer.captured_at,
            older_id: older.id,
            newer_id: newer.id,
            changes,
            stats,
        }))
    }

    async fn require_website(&self, website_id: &str) -> Result<TrackedWebsite, TrackerError> {
        self.store
            .get_website(website_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Website not found"))
    }
}

fn require<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, TrackerError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(TrackerError::validation(message)),
    }
}

fn require_content(content: Option<String>) -> Result<String, TrackerError> {
    match content {
        Some(c) if !c.is_empty() => Ok(c),
        _ => Err(TrackerError::validation("Content is required")),
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
