//! Upstream forwarding
//!
//! Admitted requests are relayed to the backend unchanged: method, path,
//! query, headers and body all pass through. The gate buffers bodies up to
//! the configured cap rather than streaming them.

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};

use crate::app::AppState;
use crate::presentation::models::GatewayError;

/// Headers that describe the connection to the gate itself and must not be
/// relayed to the upstream (nor back to the client).
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(*name);
    }
}

/// Relay a request to the configured upstream and return its response.
pub async fn forward_upstream(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let body_bytes = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to buffer request body");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(GatewayError {
                    status: 413,
                    message: "Request body too large.".to_string(),
                }),
            )
                .into_response();
        }
    };

    let target = format!(
        "{}{}",
        state.upstream_url.trim_end_matches('/'),
        parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path())
    );

    let mut headers = parts.headers.clone();
    strip_hop_by_hop(&mut headers);
    // the client sets these for the gate, not for the upstream
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    let result = state
        .client
        .request(parts.method.clone(), &target)
        .headers(headers)
        .body(body_bytes)
        .send()
        .await;

    let upstream_response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, target = %target, "Failed to reach upstream");
            return (StatusCode::BAD_GATEWAY, Json(GatewayError::unavailable())).into_response();
        }
    };

    let status = upstream_response.status();
    let mut response_headers = upstream_response.headers().clone();
    strip_hop_by_hop(&mut response_headers);
    response_headers.remove(header::CONTENT_LENGTH);

    match upstream_response.bytes().await {
        Ok(bytes) => (status, response_headers, bytes).into_response(),
        Err(e) => {
            tracing::error!(error = %e, target = %target, "Failed to read upstream response");
            (StatusCode::BAD_GATEWAY, Json(GatewayError::unavailable())).into_response()
        }
    }
}
