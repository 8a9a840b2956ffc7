//! # WebLens Core
//!
//! Snapshot tracking and line diffing for the WebLens DOM tracker.
//!
//! - [`diff`] - line-based diff between two snapshot contents
//! - [`Tracker`] - validation and query composition over a [`SnapshotStore`]
//! - [`MemorySnapshotStore`] - in-process store for tests and ephemeral runs
//!
//! [`SnapshotStore`]: weblens_protocols::SnapshotStore

pub mod diff;
pub mod error;
pub mod memory_store;
pub mod tracker;

pub use diff::{diff_lines, DiffChunk, DiffStats};
pub use error::TrackerError;
pub use memory_store::MemorySnapshotStore;
pub use tracker::{
    DiffOutcome, SnapshotDiff, SnapshotPreview, SnapshotReceipt, Tracked, Tracker, TrackerConfig,
    WebsiteOverview,
};
