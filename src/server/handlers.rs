//! Route handlers.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;

use super::types::{ApiInfo, AppState, ErrorResponse, HealthResponse, VerifyRequest};
use crate::config::CLIENT_VERSION;
use crate::error_handling::VerifyError;

/// API information
pub async fn root_handler() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "PhishGuard API",
        version: CLIENT_VERSION,
    })
}

/// Liveness probe
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// `POST /verify-url` with a JSON body
pub async fn verify_post_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(request): Json<VerifyRequest>,
) -> Response {
    verify_for_caller(&state, peer, &request.url).await
}

/// `GET /verify-url?url=...`
pub async fn verify_get_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(request): Query<VerifyRequest>,
) -> Response {
    verify_for_caller(&state, peer, &request.url).await
}

async fn verify_for_caller(state: &AppState, peer: SocketAddr, url: &str) -> Response {
    if !state.rate_limiter.check(peer.ip()) {
        warn!("Rate limit exceeded for {}", peer.ip());
        return error_response(StatusCode::TOO_MANY_REQUESTS, None, "Rate limit exceeded");
    }

    match state
        .verifier
        .verify_until_cancelled(url, &state.shutdown)
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(VerifyError::Validation(e)) => {
            error_response(StatusCode::BAD_REQUEST, Some(e.code()), &e.to_string())
        }
        Err(VerifyError::Cancelled) => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            None,
            "Server is shutting down",
        ),
    }
}

fn error_response(status: StatusCode, code: Option<&'static str>, detail: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            code,
            detail: detail.to_string(),
        }),
    )
        .into_response()
}
