//! Rate-limit bookkeeping.

use std::sync::Mutex;

use faq_core::RateStatus;

/// Holds the most recently observed rate-limit headers.
///
/// Only records what the service reports; nothing here throttles requests.
#[derive(Debug, Default)]
pub struct RateTracker {
    status: Mutex<RateStatus>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored status.
    pub fn update(&self, status: RateStatus) {
        if let Ok(mut current) = self.status.lock() {
            *current = status;
        }
    }

    /// Update from raw `x-ratelimit-remaining` / `x-ratelimit-reset` values.
    /// Missing or non-numeric values count as 0.
    pub fn update_from_headers(&self, remaining: Option<&str>, reset: Option<&str>) {
        self.update(RateStatus {
            remaining: parse_header(remaining),
            reset: parse_header(reset),
        });
    }

    /// Current snapshot.
    pub fn status(&self) -> RateStatus {
        self.status.lock().map(|s| *s).unwrap_or_default()
    }
}

fn parse_header(value: Option<&str>) -> u64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
