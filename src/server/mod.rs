//! HTTP transport.
//!
//! Provides:
//! - `GET /` - API name and version
//! - `GET /health` - liveness probe
//! - `POST /verify-url` (JSON `{"url": ...}`) and `GET /verify-url?url=...` -
//!   the verification report
//!
//! Verification routes are rate limited per caller IP. The orchestrator
//! knows nothing about HTTP; this module maps its results onto status codes.

mod handlers;
mod rate_limit;
mod types;

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use handlers::{health_handler, root_handler, verify_get_handler, verify_post_handler};
pub use rate_limit::RateLimiter;
pub use types::{AppState, ErrorResponse, VerifyRequest};

/// Builds the router. Serve it with connect info (see [`serve`]) so the rate
/// limiter can see caller addresses.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/verify-url",
            get(verify_get_handler).post(verify_post_handler),
        )
        .with_state(state)
}

/// Binds `bind_addr` and serves until `state.shutdown` fires.
pub async fn start_server(bind_addr: SocketAddr, state: AppState) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}: {}", bind_addr, e))?;

    log::info!("PhishGuard API listening on http://{}/", bind_addr);
    log::info!("  - Verify: http://{}/verify-url", bind_addr);
    log::info!("  - Health: http://{}/health", bind_addr);

    serve(listener, state).await
}

/// Serves on an already bound listener until `state.shutdown` fires.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), anyhow::Error> {
    let shutdown = state.shutdown.clone();
    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    log::info!("PhishGuard API stopped");
    Ok(())
}
