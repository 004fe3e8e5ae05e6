//! Liveness listener for hosting platforms that expect an open port.
//!
//! Answers `200 OK` to any GET. Runs as its own supervised task and shares
//! no state with message handling.

use axum::{routing::get, Router};
use promptwright_core::config::HealthConfig;
use std::time::Duration;
use tracing::{error, info, warn};

/// Longest pause between restart attempts.
const MAX_RESTART_BACKOFF_SECS: u64 = 60;

async fn ok() -> &'static str {
    "OK"
}

/// Build the router: every path answers GET, other methods get 405.
pub fn build_router() -> Router {
    Router::new()
        .route("/", get(ok))
        .route("/{*path}", get(ok))
}

/// Bind and serve until the server stops or fails.
async fn serve(addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("health listener on {addr}");
    axum::serve(listener, build_router()).await
}

/// Keep the listener running, restarting with capped backoff.
///
/// Never returns; abort the task to stop it.
pub async fn supervise(config: HealthConfig) {
    let addr = format!("{}:{}", config.host, config.port);
    let mut backoff_secs: u64 = 1;

    loop {
        match serve(&addr).await {
            Ok(()) => warn!("health listener on {addr} stopped (restart in {backoff_secs}s)"),
            Err(e) => error!("health listener on {addr} failed (restart in {backoff_secs}s): {e}"),
        }
        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
        backoff_secs = (backoff_secs * 2).min(MAX_RESTART_BACKOFF_SECS);
    }
}
