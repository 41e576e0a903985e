//! Application setup and wiring

use std::sync::Arc;

use axum::Router;

use crate::config::Config;
use crate::infrastructure::rate_limiter::RateLimiterService;
use crate::presentation::middleware::RateLimiterState;
use crate::presentation::routes::create_router;

/// Shared state for the forwarding handler
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub upstream_url: String,
    pub max_body_bytes: usize,
}

/// Create the application router from configuration.
///
/// Spawns the rate limiter's background sweep task, so this must run inside
/// a Tokio runtime.
pub fn create_app(config: &Config) -> Router {
    let service = Arc::new(RateLimiterService::new(&config.rate_limit));
    Arc::clone(&service).start_cleanup_task();

    let limiter = Arc::new(RateLimiterState::new(service));

    let state = AppState {
        client: reqwest::Client::new(),
        upstream_url: config.server.upstream_url.clone(),
        max_body_bytes: config.server.max_body_bytes,
    };

    create_router(state, limiter)
}
