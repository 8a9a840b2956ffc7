//! Tracker error types.

use thiserror::Error;

use weblens_protocols::StoreError;

/// Errors returned by [`crate::Tracker`] operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The request was missing a required field or was malformed.
    #[error("{0}")]
    Validation(String),

    /// A referenced website or snapshot does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The backing store failed.
    #[error("Store failure: {0}")]
    Store(StoreError),

    /// A background task failed to complete.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<StoreError> for TrackerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::WebsiteNotFound(_) => Self::not_found("Website not found"),
            other => Self::Store(other),
        }
    }
}
