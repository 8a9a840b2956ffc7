//! # WebLens API
//!
//! REST interface over the snapshot [`Tracker`](weblens_core::Tracker).
//!
//! ```text
//! browser extension / front-ends
//!            │  JSON over HTTP
//!            ▼
//! ┌──────────────────────────────┐
//! │  http::routes  (axum Router) │  CORS, body limit, request tracing
//! │  http::handlers              │  request parsing, status mapping
//! └──────────────┬───────────────┘
//!                ▼
//!        weblens_core::Tracker ──► SnapshotStore (sqlite | memory)
//! ```
//!
//! Handlers stay thin: validation and query composition live in the tracker,
//! and [`ApiError`] turns tracker failures into `{"error": ...}` responses.

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::routes::{create_router, RouterOptions};
pub use server::{InterfaceConfig, InterfaceServer};
pub use state::AppState;
