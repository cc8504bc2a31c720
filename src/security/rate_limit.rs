//! Per-organization fixed-window rate limiting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;

use crate::observability::metrics;

/// Length of one counting window in seconds.
pub const WINDOW_SECS: u64 = 60;

/// Default number of requests admitted per organization per window.
pub const DEFAULT_CEILING: u32 = 100;

/// Fixed-window request counter keyed by organization.
///
/// A client may send `ceiling` requests at the end of one window and
/// `ceiling` more at the start of the next. Past windows stay in memory for
/// the life of the process and are never read again.
pub struct RateLimiter {
    /// org_id -> (window index -> requests seen)
    windows: DashMap<String, HashMap<u64, u32>>,
    ceiling: AtomicU32,
}

impl RateLimiter {
    pub fn new(ceiling: u32) -> Self {
        Self {
            windows: DashMap::new(),
            ceiling: AtomicU32::new(ceiling),
        }
    }

    /// Admit or reject a request for `org_id` in the current window.
    pub fn admit(&self, org_id: &str) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.admit_at(org_id, now)
    }

    /// Admit or reject a request for `org_id` at `unix_secs`.
    pub fn admit_at(&self, org_id: &str, unix_secs: u64) -> bool {
        if org_id.trim().is_empty() {
            tracing::error!("Rate limiter called without an organization");
            return false;
        }

        let window = unix_secs / WINDOW_SECS;
        let ceiling = self.ceiling();

        // The entry guard holds the shard lock across the read and the increment.
        let mut org_windows = self.windows.entry(org_id.to_string()).or_default();
        let count = org_windows.entry(window).or_insert(0);
        if *count >= ceiling {
            drop(org_windows);
            tracing::warn!(org_id = %org_id, window, ceiling, "Rate limit exceeded");
            metrics::record_rate_limited();
            return false;
        }
        *count += 1;
        true
    }

    /// Current per-window ceiling.
    pub fn ceiling(&self) -> u32 {
        self.ceiling.load(Ordering::Relaxed)
    }

    /// Replace the ceiling; applies to the current window immediately.
    pub fn set_ceiling(&self, ceiling: u32) {
        let previous = self.ceiling.swap(ceiling, Ordering::Relaxed);
        if previous != ceiling {
            tracing::info!(previous, ceiling, "Rate limit ceiling updated");
        }
    }

    /// Requests counted for `org_id` in the window containing `unix_secs`.
    pub fn count_at(&self, org_id: &str, unix_secs: u64) -> u32 {
        self.windows
            .get(org_id)
            .and_then(|w| w.get(&(unix_secs / WINDOW_SECS)).copied())
            .unwrap_or(0)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CEILING)
    }
}
