//! Snapshot store protocol definitions.
//!
//! A store persists tracked websites and their append-only snapshot history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::types::{NewWebsite, Snapshot, SnapshotExcerpt, TrackedWebsite, WebsiteSummary};

/// Result of registering a website.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new website row was written.
    Created(TrackedWebsite),
    /// The URL was already tracked; nothing was written.
    Exists(TrackedWebsite),
}

impl InsertOutcome {
    pub fn into_website(self) -> TrackedWebsite {
        match self {
            Self::Created(w) | Self::Exists(w) => w,
        }
    }
}

/// Core trait for snapshot stores.
///
/// Snapshot ordering is by capture time, newest first, with ties broken by
/// insertion order.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns the backend ID.
    fn id(&self) -> &str;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Register a website unless its URL is already tracked.
    async fn insert_website(&self, website: NewWebsite) -> Result<InsertOutcome, StoreError>;

    /// Get a website by ID.
    async fn get_website(&self, id: &str) -> Result<Option<TrackedWebsite>, StoreError>;

    /// List active websites in creation order with their newest capture time.
    async fn list_websites(&self) -> Result<Vec<WebsiteSummary>, StoreError>;

    /// Capture time of the newest snapshot of a website.
    async fn latest_capture_time(
        &self,
        website_id: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Append a snapshot. Fails with [`StoreError::WebsiteNotFound`] before
    /// writing anything if the website does not exist.
    async fn insert_snapshot(&self, website_id: &str, content: String)
        -> Result<Snapshot, StoreError>;

    /// Newest `limit` snapshots of a website, with full content.
    async fn recent_snapshots(
        &self,
        website_id: &str,
        limit: usize,
    ) -> Result<Vec<Snapshot>, StoreError>;

    /// Newest `limit` snapshots of a website, content cut to `max_chars`.
    async fn recent_excerpts(
        &self,
        website_id: &str,
        limit: usize,
        max_chars: usize,
    ) -> Result<Vec<SnapshotExcerpt>, StoreError>;

    /// Get a snapshot by ID.
    async fn get_snapshot(&self, id: &str) -> Result<Option<Snapshot>, StoreError>;
}
