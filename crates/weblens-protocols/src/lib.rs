//! # WebLens Protocols
//!
//! Core protocol definitions for the WebLens DOM tracker.
//! Contains the data model and the storage trait - no implementations.
//!
//! ## Core Items
//!
//! - [`TrackedWebsite`] - A URL registered for repeated snapshot capture
//! - [`Snapshot`] - A captured serialization of a page's DOM
//! - [`SnapshotStore`] - Trait for snapshot storage implementations
//! - [`StoreError`] - Errors raised by storage implementations

pub mod error;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::{InsertOutcome, SnapshotStore};
pub use types::*;
