//! Website and snapshot API handlers.
//!
//! Every body extractor is taken as `Result<Json<T>, JsonRejection>` so that
//! malformed JSON turns into a `400 {"error": ...}` like any other bad input.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use weblens_core::{DiffOutcome, SnapshotReceipt, Tracked};

use crate::error::ApiError;
use crate::state::AppState;

/// Request to register a website.
#[derive(Debug, Deserialize)]
pub struct CreateWebsiteRequest {
    pub url: Option<String>,
    pub name: Option<String>,
}

/// A newly registered website.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteCreatedResponse {
    pub id: String,
    pub url: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to capture a snapshot of a known website.
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub content: Option<String>,
}

/// Request to capture a snapshot keyed by URL.
#[derive(Debug, Deserialize)]
pub struct CaptureByUrlRequest {
    pub url: Option<String>,
    pub content: Option<String>,
}

/// Acknowledgement for a stored snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCreatedResponse {
    pub id: String,
    /// Only set for URL-keyed captures, where the caller may not know it yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_id: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub content_length: usize,
}

impl SnapshotCreatedResponse {
    fn from_receipt(receipt: SnapshotReceipt, include_website: bool) -> Self {
        Self {
            id: receipt.id,
            website_id: include_website.then_some(receipt.website_id),
            captured_at: receipt.captured_at,
            content_length: receipt.content_length,
        }
    }
}

/// Full content of the newest snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSnapshotResponse {
    pub id: String,
    pub captured_at: DateTime<Utc>,
    pub content: String,
}

/// Register a website.
///
/// POST /api/websites
pub async fn create_website(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateWebsiteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    match state
        .tracker
        .track_website(req.url.as_deref(), req.name)
        .await?
    {
        Tracked::Created(website) => Ok((
            StatusCode::CREATED,
            Json(WebsiteCreatedResponse {
                id: website.id,
                url: website.url,
                name: website.name,
                created_at: website.created_at,
            }),
        )),
        Tracked::AlreadyTracked(existing) => Err(ApiError::Conflict {
            message: "Website already tracked".to_string(),
            website_id: existing.id,
        }),
    }
}

/// List tracked websites.
///
/// GET /api/websites
pub async fn list_websites(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.tracker.list_websites().await?))
}

/// GET /api/websites/{website_id}
pub async fn get_website(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.tracker.website(&website_id).await?))
}

/// Capture a snapshot of a tracked website.
///
/// POST /api/websites/{website_id}/snapshots
pub async fn capture_snapshot(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
    payload: Result<Json<CaptureRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let receipt = state.tracker.capture(&website_id, req.content).await?;

    Ok((
        StatusCode::CREATED,
        Json(SnapshotCreatedResponse::from_receipt(receipt, false)),
    ))
}

/// Capture history, newest first.
///
/// GET /api/websites/{website_id}/snapshots
pub async fn list_snapshots(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.tracker.history(&website_id).await?))
}

/// GET /api/websites/{website_id}/snapshots/latest
pub async fn latest_snapshot(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.tracker.latest_content(&website_id).await?;
    Ok(Json(LatestSnapshotResponse {
        id: snapshot.id,
        captured_at: snapshot.captured_at,
        content: snapshot.content,
    }))
}

/// Diff the two newest snapshots of a website.
///
/// GET /api/websites/{website_id}/diff
pub async fn diff_latest(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.tracker.diff_latest(&website_id).await? {
        DiffOutcome::Ready(diff) => Ok(Json(diff)),
        DiffOutcome::NotEnoughSnapshots { .. } => {
            Err(ApiError::NotFound("Not enough snapshots".to_string()))
        }
    }
}

/// Capture a snapshot keyed by URL, registering the website if needed.
///
/// POST /api/snapshots
pub async fn capture_by_url(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CaptureByUrlRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let receipt = state
        .tracker
        .capture_by_url(req.url.as_deref(), req.content)
        .await?;
    info!("Stored URL-keyed snapshot {}", receipt.id);

    Ok((
        StatusCode::CREATED,
        Json(SnapshotCreatedResponse::from_receipt(receipt, true)),
    ))
}

/// GET /api/snapshots/{snapshot_id}
pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Path(snapshot_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.tracker.snapshot(&snapshot_id).await?))
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
