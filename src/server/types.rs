//! HTTP transport data structures.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::rate_limit::RateLimiter;
use crate::verify::Verifier;

/// Shared state for the HTTP transport
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator shared by all requests
    pub verifier: Arc<Verifier>,
    /// Per-caller request ceiling
    pub rate_limiter: Arc<RateLimiter>,
    /// Fires on server shutdown; in-flight verifications are abandoned.
    pub shutdown: CancellationToken,
}

/// Body of `POST /verify-url` and query of `GET /verify-url`
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// Raw URL as submitted
    pub url: String,
}

/// JSON response for `/`
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    /// Service name
    pub message: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// JSON response for `/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy`
    pub status: &'static str,
}

/// JSON body of every non-2xx response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable validation code, only present for rejected URLs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Human-readable reason
    pub detail: String,
}
