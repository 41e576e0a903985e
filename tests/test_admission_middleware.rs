//! HTTP-level tests for the admission middleware
//!
//! Drives a router with the admission layer mounted ahead of a stub
//! downstream stage, the way the gate mounts it ahead of forwarding.
//! Covers client key derivation from proxy headers, the fixed 429 bodies,
//! and tier interaction as observed by an HTTP client.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
    middleware,
    routing::get,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use budget_gate::config::{PolicyConfig, RateLimitConfig};
use budget_gate::infrastructure::rate_limiter::RateLimiterService;
use budget_gate::presentation::middleware::{RateLimiterState, rate_limit_middleware};

const AUTH_BODY: &str =
    r#"{"status":429,"message":"Too many authentication attempts. Try again later."}"#;
const GENERAL_BODY: &str = r#"{"status":429,"message":"Rate limit exceeded. Try again later."}"#;

fn test_config(auth_max: u32, general_max: u32) -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        cleanup_interval_seconds: 300,
        auth: PolicyConfig {
            prefix: "/api/auth/".to_string(),
            max_requests: auth_max,
            window_seconds: 60,
        },
        general: PolicyConfig {
            prefix: "/api/".to_string(),
            max_requests: general_max,
            window_seconds: 60,
        },
    }
}

/// Router with the admission middleware in front of a stub downstream stage
fn test_app(config: RateLimitConfig) -> Router {
    let service = Arc::new(RateLimiterService::new(&config));
    let state = Arc::new(RateLimiterState::new(service));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .fallback(|| async { "downstream" })
        .layer(middleware::from_fn_with_state(state, rate_limit_middleware))
}

fn get_from(path: &str, client: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("x-forwarded-for", client)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_admitted_request_reaches_downstream() {
    let app = test_app(test_config(5, 100));

    let response = app.oneshot(get_from("/api/accounts", "203.0.113.5")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "downstream");
}

#[tokio::test]
async fn test_auth_rejection_has_fixed_body() {
    let app = test_app(test_config(1, 100));

    let first = app
        .clone()
        .oneshot(get_from("/api/auth/login", "203.0.113.5"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(get_from("/api/auth/login", "203.0.113.5"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        second
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(body_string(second).await, AUTH_BODY);
}

#[tokio::test]
async fn test_general_rejection_has_fixed_body() {
    let app = test_app(test_config(5, 1));

    let first = app
        .clone()
        .oneshot(get_from("/api/accounts", "203.0.113.5"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(get_from("/api/expenses", "203.0.113.5"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_string(second).await, GENERAL_BODY);
}

#[tokio::test]
async fn test_forwarded_for_uses_first_hop_only() {
    let app = test_app(test_config(5, 1));

    // proxy chain: original client first, then intermediate hops
    let first = app
        .clone()
        .oneshot(get_from("/api/accounts", "203.0.113.5, 10.0.0.1"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    // same originating client through a different hop chain: same key
    let second = app
        .clone()
        .oneshot(get_from("/api/accounts", "203.0.113.5"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    // a different originating client is unaffected
    let third = app
        .oneshot(get_from("/api/accounts", "198.51.100.7, 10.0.0.1"))
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_real_ip_header_partitions_clients() {
    let app = test_app(test_config(5, 1));

    let request = |ip: &str| {
        Request::builder()
            .uri("/api/accounts")
            .header("x-real-ip", ip)
            .body(Body::empty())
            .unwrap()
    };

    assert_eq!(
        app.clone().oneshot(request("192.0.2.9")).await.unwrap().status(),
        StatusCode::OK
    );
    assert_eq!(
        app.clone().oneshot(request("192.0.2.9")).await.unwrap().status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(
        app.oneshot(request("192.0.2.10")).await.unwrap().status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_peer_address_is_the_fallback_key() {
    let app = test_app(test_config(5, 1));

    let request = |addr: &str| {
        let addr: SocketAddr = addr.parse().unwrap();
        Request::builder()
            .uri("/api/accounts")
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap()
    };

    assert_eq!(
        app.clone()
            .oneshot(request("198.51.100.7:40000"))
            .await
            .unwrap()
            .status(),
        StatusCode::OK
    );
    // same peer on a different source port is still the same client
    assert_eq!(
        app.clone()
            .oneshot(request("198.51.100.7:40001"))
            .await
            .unwrap()
            .status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(
        app.oneshot(request("198.51.100.8:40000")).await.unwrap().status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_auth_rejection_preserves_general_budget() {
    let app = test_app(test_config(1, 3));
    let client = "203.0.113.5";

    // admitted login consumes one slot of each tier
    let login1 = app.clone().oneshot(get_from("/api/auth/login", client)).await.unwrap();
    assert_eq!(login1.status(), StatusCode::OK);

    // rejected login: auth tier exhausted, general tier untouched
    let login2 = app.clone().oneshot(get_from("/api/auth/login", client)).await.unwrap();
    assert_eq!(login2.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_string(login2).await, AUTH_BODY);

    // general tier still has exactly two of three slots left
    for _ in 0..2 {
        let ok = app.clone().oneshot(get_from("/api/accounts", client)).await.unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
    }
    let exhausted = app.oneshot(get_from("/api/accounts", client)).await.unwrap();
    assert_eq!(exhausted.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_string(exhausted).await, GENERAL_BODY);
}

#[tokio::test]
async fn test_unprefixed_paths_are_never_limited() {
    let app = test_app(test_config(1, 1));

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(get_from("/health", "203.0.113.5"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_disabled_limiter_admits_everything() {
    let mut config = test_config(1, 1);
    config.enabled = false;
    let app = test_app(config);

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(get_from("/api/auth/login", "203.0.113.5"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
