//! Response models produced by the gate itself

use serde::Serialize;

use crate::infrastructure::rate_limiter::PolicyKind;

/// Body written on a rate-limit rejection.
///
/// The shape and wording are part of the public contract; clients match on
/// these exact literals, so they carry no timestamps or request ids.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitExceeded {
    pub status: u16,
    pub message: &'static str,
}

impl RateLimitExceeded {
    pub fn for_policy(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Auth => Self {
                status: 429,
                message: "Too many authentication attempts. Try again later.",
            },
            PolicyKind::General => Self {
                status: 429,
                message: "Rate limit exceeded. Try again later.",
            },
        }
    }
}

/// Body written when the upstream backend cannot be reached
#[derive(Debug, Clone, Serialize)]
pub struct GatewayError {
    pub status: u16,
    pub message: String,
}

impl GatewayError {
    pub fn unavailable() -> Self {
        Self {
            status: 502,
            message: "Upstream service unavailable.".to_string(),
        }
    }
}
