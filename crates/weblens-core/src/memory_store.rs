//! In-memory snapshot store.
//!
//! Used by tests and by the server's `--in-memory` mode. Nothing survives a
//! restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use weblens_protocols::{
    excerpt, timestamp_now, InsertOutcome, NewWebsite, Snapshot, SnapshotExcerpt, SnapshotStore,
    StoreError, TrackedWebsite, WebsiteSummary,
};

#[derive(Default)]
struct Tables {
    websites: Vec<TrackedWebsite>,
    /// Insertion order; later entries are newer on equal capture time.
    snapshots: Vec<Snapshot>,
}

impl Tables {
    fn newest_first(&self, website_id: &str) -> Vec<&Snapshot> {
        let mut matching: Vec<(usize, &Snapshot)> = self
            .snapshots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.website_id == website_id)
            .collect();
        matching.sort_by(|(ia, a), (ib, b)| {
            b.captured_at.cmp(&a.captured_at).then_with(|| ib.cmp(ia))
        });
        matching.into_iter().map(|(_, s)| s).collect()
    }

    fn latest_capture(&self, website_id: &str) -> Option<DateTime<Utc>> {
        self.snapshots
            .iter()
            .filter(|s| s.website_id == website_id)
            .map(|s| s.captured_at)
            .max()
    }
}

/// Snapshot store kept entirely in process memory.
pub struct MemorySnapshotStore {
    tables: RwLock<Tables>,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    fn id(&self) -> &str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_website(&self, website: NewWebsite) -> Result<InsertOutcome, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.websites.iter().find(|w| w.url == website.url) {
            return Ok(InsertOutcome::Exists(existing.clone()));
        }

        let created = TrackedWebsite {
            id: Uuid::new_v4().to_string(),
            url: website.url,
            name: website.name,
            created_at: timestamp_now(),
            is_active: true,
        };
        tables.websites.push(created.clone());
        Ok(InsertOutcome::Created(created))
    }

    async fn get_website(&self, id: &str) -> Result<Option<TrackedWebsite>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.websites.iter().find(|w| w.id == id).cloned())
    }

    async fn list_websites(&self) -> Result<Vec<WebsiteSummary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .websites
            .iter()
            .filter(|w| w.is_active)
            .map(|w| WebsiteSummary {
                website: w.clone(),
                latest_snapshot: tables.latest_capture(&w.id),
            })
            .collect())
    }

    async fn latest_capture_time(
        &self,
        website_id: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.latest_capture(website_id))
    }

    async fn insert_snapshot(
        &self,
        website_id: &str,
        content: String,
    ) -> Result<Snapshot, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.websites.iter().any(|w| w.id == website_id) {
            return Err(StoreError::WebsiteNotFound(website_id.to_string()));
        }

        let snapshot = Snapshot {
            id: Uuid::new_v4().to_string(),
            website_id: website_id.to_string(),
            content,
            captured_at: timestamp_now(),
        };
        tables.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn recent_snapshots(
        &self,
        website_id: &str,
        limit: usize,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .newest_first(website_id)
            .into_iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn recent_excerpts(
        &self,
        website_id: &str,
        limit: usize,
        max_chars: usize,
    ) -> Result<Vec<SnapshotExcerpt>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .newest_first(website_id)
            .into_iter()
            .take(limit)
            .map(|s| SnapshotExcerpt {
                id: s.id.clone(),
                captured_at: s.captured_at,
                excerpt: excerpt(&s.content, max_chars),
            })
            .collect())
    }

    async fn get_snapshot(&self, id: &str) -> Result<Option<Snapshot>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.snapshots.iter().find(|s| s.id == id).cloned())
    }
}
