//! Application state.

use std::time::{Duration, Instant};

use weblens_core::Tracker;

/// Application state shared across handlers.
pub struct AppState {
    pub tracker: Tracker,
    start_time: Instant,
}

impl AppState {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            start_time: Instant::now(),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
