//! HTTP interface module.
//!
//! Provides REST API endpoints for:
//! - Website registration and listing
//! - Snapshot capture, history and retrieval
//! - Diffing the two newest snapshots of a website
//! - Health checks

pub mod handlers;
pub mod routes;

pub(crate) mod monitoring;
