//! SQLite snapshot store for WebLens.
//!
//! Keeps tracked websites and their snapshot history in a single SQLite file.

mod backend;
mod schema;

pub use backend::SqliteSnapshotStore;
