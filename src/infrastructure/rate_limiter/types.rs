//! Rate limiter types and core data structures

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Policy tier an admission check runs under.
///
/// Determines which limits apply and which rejection message the client sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Authentication endpoints (login/register) - strict brute-force limits
    Auth,
    /// All API endpoints - loose general limit
    General,
}

impl PolicyKind {
    /// Get the policy name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Auth => "auth",
            PolicyKind::General => "general",
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable rate-limit policy: a path-prefix match rule paired with the
/// fixed window it enforces.
#[derive(Debug, Clone)]
pub struct Policy {
    pub kind: PolicyKind,
    /// Request paths starting with this prefix fall under the policy
    pub prefix: String,
    /// Maximum requests admitted per window
    pub max_requests: u32,
    /// Window length; buckets created under this policy never change it
    pub window: Duration,
}

impl Policy {
    pub fn new(kind: PolicyKind, prefix: &str, max_requests: u32, window: Duration) -> Self {
        Self {
            kind,
            prefix: prefix.to_string(),
            max_requests,
            window,
        }
    }

    /// Whether a request path falls under this policy
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    pub fn window_millis(&self) -> u64 {
        self.window.as_millis() as u64
    }
}

/// One client's consumption within the current fixed window.
///
/// `count` reflects every consume attempt answered with this bucket since
/// `window_start`, admitted or not.
#[derive(Debug, Clone, Copy)]
pub struct WindowBucket {
    /// Unix timestamp in milliseconds marking when the current window began
    pub window_start: u64,
    /// Consume attempts recorded in the current window
    pub count: u32,
}

impl WindowBucket {
    pub fn new(now_ms: u64) -> Self {
        Self {
            window_start: now_ms,
            count: 0,
        }
    }

    /// A bucket whose window has fully elapsed must be reset before use
    pub fn is_stale(&self, now_ms: u64, window_ms: u64) -> bool {
        now_ms.saturating_sub(self.window_start) >= window_ms
    }

    /// Start a fresh window in place
    pub fn reset(&mut self, now_ms: u64) {
        self.window_start = now_ms;
        self.count = 0;
    }

    /// Record one attempt and return the post-increment count
    pub fn consume(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }
}

/// Outcome of a single `check_and_consume` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Admitted,
    Rejected,
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admitted)
    }
}

/// Get current time in milliseconds since Unix epoch
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}
