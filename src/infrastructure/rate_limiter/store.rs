//! Fixed-window store
//!
//! One store tracks one policy's consumption, keyed by client. Buckets are
//! created lazily on a client's first request, reset in place when their
//! window elapses, and removed by periodic sweeps so the key set stays
//! bounded.

use dashmap::DashMap;

use super::types::{Decision, Policy, WindowBucket};

/// Concurrent mapping from client key to the window bucket governing it
/// under this store's policy.
///
/// All bucket mutation happens while holding the map's per-entry guard, so
/// a reset and the increment that follows it are observed as one step by
/// concurrent callers on the same key, and a sweep cannot remove a bucket
/// out from under an in-flight consume.
pub struct WindowStore {
    policy: Policy,
    buckets: DashMap<String, WindowBucket>,
}

impl WindowStore {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            buckets: DashMap::new(),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Record one attempt for `key` at `now_ms` and decide admission.
    ///
    /// The attempt is counted whether or not it is admitted, so a client
    /// over its limit keeps consuming its window by retrying.
    pub fn check_and_consume(&self, key: &str, now_ms: u64) -> Decision {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| WindowBucket::new(now_ms));

        if bucket.is_stale(now_ms, self.policy.window_millis()) {
            bucket.reset(now_ms);
        }

        if bucket.consume() <= self.policy.max_requests {
            Decision::Admitted
        } else {
            Decision::Rejected
        }
    }

    /// Drop every bucket whose window has fully elapsed.
    ///
    /// Housekeeping only: a stale bucket that survives a sweep is still
    /// reset on its next lookup. Returns the number of buckets removed.
    pub fn sweep_expired(&self, now_ms: u64) -> usize {
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| !bucket.is_stale(now_ms, self.policy.window_millis()));
        before.saturating_sub(self.buckets.len())
    }

    /// Snapshot of the bucket currently governing `key`, if any
    pub fn peek(&self, key: &str) -> Option<WindowBucket> {
        self.buckets.get(key).map(|bucket| *bucket)
    }

    /// Number of client keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}
