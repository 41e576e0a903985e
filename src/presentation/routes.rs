//! Route definitions

use std::sync::Arc;

use axum::{Json, Router, middleware, response::IntoResponse, routing::get};

use crate::app::AppState;
use crate::presentation::forward::forward_upstream;
use crate::presentation::middleware::{
    RateLimiterState, logging_middleware, rate_limit_middleware,
};

/// Assemble the gate's router.
///
/// Every request passes the admission middleware before anything else runs;
/// admitted API traffic falls through to the upstream forwarder. The health
/// endpoint carries no API prefix and so is never rate limited.
pub fn create_router(state: AppState, limiter: Arc<RateLimiterState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(forward_upstream)
        .with_state(state)
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

/// Health check for load balancers and probes
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy"
    }))
}
