//! SQLite snapshot store implementation.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};
use tokio_rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use weblens_protocols::{
    InsertOutcome, NewWebsite, Snapshot, SnapshotExcerpt, SnapshotStore, StoreError,
    TrackedWebsite, WebsiteSummary, timestamp_now,
};

use crate::schema::init_schema;

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;

const WEBSITE_COLUMNS: &str = "id, url, name, created_at, is_active";

/// SQLite-based snapshot store.
pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        Self::with_connection(conn).await
    }

    /// Open (or create) a file-backed database, creating parent directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::StorageError(e.to_string()))?;
        }

        debug!("Opening snapshot database at {}", path.display());
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        Ok(Self { conn })
    }
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let text: Option<String> = row.get(idx)?;
    match text {
        Some(_) => parse_time(row, idx).map(Some),
        None => Ok(None),
    }
}

fn website_from_row(row: &Row<'_>) -> rusqlite::Result<TrackedWebsite> {
    Ok(TrackedWebsite {
        id: row.get(0)?,
        url: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_time(row, 3)?,
        is_active: row.get(4)?,
    })
}

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<Snapshot> {
    Ok(Snapshot {
        id: row.get(0)?,
        website_id: row.get(1)?,
        content: row.get(2)?,
        captured_at: parse_time(row, 3)?,
    })
}

fn website_by_url(
    conn: &rusqlite::Connection,
    url: &str,
) -> rusqlite::Result<Option<TrackedWebsite>> {
    conn.query_row(
        &format!("SELECT {} FROM websites WHERE url = ?1", WEBSITE_COLUMNS),
        [url],
        website_from_row,
    )
    .optional()
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    fn id(&self) -> &str {
        "sqlite"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))
    }

    async fn insert_website(&self, website: NewWebsite) -> Result<InsertOutcome, StoreError> {
        let created = TrackedWebsite {
            id: Uuid::new_v4().to_string(),
            url: website.url,
            name: website.name,
            created_at: timestamp_now(),
            is_active: true,
        };

        self.conn
            .call(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO websites (id, url, name, created_at, is_active)
                     VALUES (?1, ?2, ?3, ?4, 1)
                     ON CONFLICT(url) DO NOTHING",
                    params![
                        created.id,
                        created.url,
                        created.name,
                        format_time(&created.created_at)
                    ],
                )?;

                if inserted == 1 {
                    return Ok(InsertOutcome::Created(created));
                }

                match website_by_url(conn, &created.url)? {
                    Some(existing) => Ok(InsertOutcome::Exists(existing)),
                    None => Err(rusqlite::Error::QueryReturnedNoRows.into()),
                }
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    async fn get_website(&self, id: &str) -> Result<Option<TrackedWebsite>, StoreError> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM websites WHERE id = ?1", WEBSITE_COLUMNS),
                        [&id],
                        website_from_row,
                    )
                    .optional()?)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    async fn list_websites(&self) -> Result<Vec<WebsiteSummary>, StoreError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT w.id, w.url, w.name, w.created_at, w.is_active,
                            (SELECT MAX(s.captured_at) FROM snapshots s WHERE s.website_id = w.id)
                     FROM websites w
                     WHERE w.is_active = 1
                     ORDER BY w.created_at ASC, w.rowid ASC",
                )?;

                let summaries = stmt
                    .query_map([], |row| {
                        Ok(WebsiteSummary {
                            website: website_from_row(row)?,
                            latest_snapshot: parse_optional_time(row, 5)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(summaries)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    async fn latest_capture_time(
        &self,
        website_id: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let website_id = website_id.to_string();
        self.conn
            .call(move |conn| {
                Ok(conn.query_row(
                    "SELECT MAX(captured_at) FROM snapshots WHERE website_id = ?1",
                    [&website_id],
                    |row| parse_optional_time(row, 0),
                )?)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    async fn insert_snapshot(
        &self,
        website_id: &str,
        content: String,
    ) -> Result<Snapshot, StoreError> {
        let snapshot = Snapshot {
            id: Uuid::new_v4().to_string(),
            website_id: website_id.to_string(),
            content,
            captured_at: timestamp_now(),
        };

        let written = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let exists = tx
                    .prepare("SELECT 1 FROM websites WHERE id = ?1")?
                    .exists([&snapshot.website_id])?;
                if !exists {
                    return Ok(None);
                }

                tx.execute(
                    "INSERT INTO snapshots (id, website_id, content, captured_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        snapshot.id,
                        snapshot.website_id,
                        snapshot.content,
                        format_time(&snapshot.captured_at)
                    ],
                )?;

                tx.commit()?;
                Ok(Some(snapshot))
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        written.ok_or_else(|| StoreError::WebsiteNotFound(website_id.to_string()))
    }

    async fn recent_snapshots(
        &self,
        website_id: &str,
        limit: usize,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let website_id = website_id.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, website_id, content, captured_at
                     FROM snapshots
                     WHERE website_id = ?1
                     ORDER BY captured_at DESC, rowid DESC
                     LIMIT ?2",
                )?;

                let snapshots = stmt
                    .query_map(params![website_id, limit], snapshot_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(snapshots)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    async fn recent_excerpts(
        &self,
        website_id: &str,
        limit: usize,
        max_chars: usize,
    ) -> Result<Vec<SnapshotExcerpt>, StoreError> {
        let website_id = website_id.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let max_chars = i64::try_from(max_chars).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| {
                // substr counts characters for TEXT values
                let mut stmt = conn.prepare(
                    "SELECT id, captured_at, substr(content, 1, ?2)
                     FROM snapshots
                     WHERE website_id = ?1
                     ORDER BY captured_at DESC, rowid DESC
                     LIMIT ?3",
                )?;

                let excerpts = stmt
                    .query_map(params![website_id, max_chars, limit], |row| {
                        Ok(SnapshotExcerpt {
                            id: row.get(0)?,
                            captured_at: parse_time(row, 1)?,
                            excerpt: row.get(2)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(excerpts)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    async fn get_snapshot(&self, id: &str) -> Result<Option<Snapshot>, StoreError> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, website_id, content, captured_at
                         FROM snapshots WHERE id = ?1",
                        [&id],
                        snapshot_from_row,
                    )
                    .optional()?)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }
}
