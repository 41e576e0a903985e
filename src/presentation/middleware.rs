//! HTTP middleware for the gate

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::infrastructure::rate_limiter::{AdmissionDecision, RateLimiterService};
use crate::presentation::models::RateLimitExceeded;

/// Shared state for the admission middleware
#[derive(Clone)]
pub struct RateLimiterState {
    /// The rate limiter service
    pub service: Arc<RateLimiterService>,
}

impl RateLimiterState {
    /// Create a new rate limiter state
    pub fn new(service: Arc<RateLimiterService>) -> Self {
        Self { service }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("enabled", &self.service.is_enabled())
            .finish()
    }
}

/// Derive the client key a request's consumption is tracked under.
///
/// The gate sits behind a reverse proxy in production, so proxy-supplied
/// headers win over the transport peer: the first forwarded-for hop, then
/// the real-ip header verbatim, then the socket address. The forwarded-for
/// value is client-controlled and is deliberately not validated against a
/// trusted proxy list; addresses are not normalized either, so two
/// spellings of one address count separately.
pub fn extract_client_key(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        })
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Admission middleware
///
/// Runs ahead of everything else in the pipeline: a rejected request is
/// answered directly with the fixed 429 body for the failing policy and
/// never reaches authentication or forwarding.
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimiterState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.service.is_enabled() {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let key = extract_client_key(&request);

    match state.service.check(&key, &path) {
        AdmissionDecision::Admitted => next.run(request).await,
        AdmissionDecision::Rejected(kind) => {
            tracing::warn!(
                key = %key,
                path = %path,
                policy = %kind,
                "Request rejected by rate limiter"
            );

            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitExceeded::for_policy(kind)),
            )
                .into_response()
        }
    }
}

/// Request logging middleware with timing and request ID
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Processing request"
    );

    let response = next.run(request).await;
    let duration = start_time.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}
