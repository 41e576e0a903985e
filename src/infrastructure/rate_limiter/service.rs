//! Rate Limiter Service
//!
//! The main service that coordinates admission control across policies.
//! A request may fall under several policies (authentication endpoints are
//! also API endpoints); they are checked in priority order and the first
//! rejection wins without touching any later policy's counter.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::debug;

use super::store::WindowStore;
use super::types::{Decision, PolicyKind, current_time_millis};
use crate::config::RateLimitConfig;

/// Outcome of running a request through every applicable policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Every applicable policy admitted the request (or none applied)
    Admitted,
    /// The named policy rejected the request
    Rejected(PolicyKind),
}

impl AdmissionDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionDecision::Admitted)
    }
}

/// Main admission-control service
///
/// Owns one window store per policy. Callers only ever see admission
/// decisions; the stores and their synchronization never leak out.
pub struct RateLimiterService {
    /// Stores in evaluation order: authentication before general
    stores: Vec<WindowStore>,
    enabled: bool,
    cleanup_interval: Duration,
}

impl RateLimiterService {
    /// Create a service with the configured authentication and general tiers
    pub fn new(config: &RateLimitConfig) -> Self {
        let stores = vec![
            WindowStore::new(config.auth.to_policy(PolicyKind::Auth)),
            WindowStore::new(config.general.to_policy(PolicyKind::General)),
        ];

        Self {
            stores,
            enabled: config.enabled,
            cleanup_interval: Duration::from_secs(config.cleanup_interval_seconds),
        }
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run `path` through every policy matching it, consuming one attempt
    /// from each store reached.
    ///
    /// Policies are evaluated in order; a rejection short-circuits, so the
    /// counters of later policies stay untouched for that request. A path
    /// matching no policy is admitted without consuming anything.
    pub fn check(&self, key: &str, path: &str) -> AdmissionDecision {
        self.check_at(key, path, current_time_millis())
    }

    /// `check` with an explicit clock, for deterministic window tests
    pub fn check_at(&self, key: &str, path: &str, now_ms: u64) -> AdmissionDecision {
        if !self.enabled {
            return AdmissionDecision::Admitted;
        }

        for store in &self.stores {
            if !store.policy().matches(path) {
                continue;
            }

            if store.check_and_consume(key, now_ms) == Decision::Rejected {
                debug!(
                    key = %key,
                    path = %path,
                    policy = %store.policy().kind,
                    "Admission check failed"
                );
                return AdmissionDecision::Rejected(store.policy().kind);
            }
        }

        AdmissionDecision::Admitted
    }

    /// Sweep expired buckets out of every store
    pub fn sweep_expired(&self) -> usize {
        let now_ms = current_time_millis();
        self.stores
            .iter()
            .map(|store| store.sweep_expired(now_ms))
            .sum()
    }

    /// Start the background sweep task
    pub fn start_cleanup_task(self: Arc<Self>) {
        let cleanup_interval = self.cleanup_interval;

        tokio::spawn(async move {
            let mut interval = interval(cleanup_interval);

            loop {
                interval.tick().await;
                let removed = self.sweep_expired();
                debug!(removed_buckets = removed, "Rate limiter cleanup completed");
            }
        });
    }
}
