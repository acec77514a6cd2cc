//! HTTP status server for monitoring extraction batches.
//!
//! Provides two endpoints:
//! - `/status` - live extraction status with progress percentage
//! - `/results` - stored extraction results and report
//!
//! The server runs in the background and does not block extraction.

mod handlers;
mod types;

use axum::routing::get;
use axum::Router;

use handlers::{results_handler, status_handler};
pub use types::{StatusResponse, StatusState};

/// Builds the status router.
pub fn status_router(state: StatusState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/results", get(results_handler))
        .with_state(state)
}

/// Creates and starts the status server
pub async fn start_status_server(port: u16, state: StatusState) -> Result<(), anyhow::Error> {
    let app = status_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind status server to port {}: {}", port, e))?;

    log::info!("Status server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Status: http://127.0.0.1:{}/status", port);
    log::info!("  - Results: http://127.0.0.1:{}/results", port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Status server error: {}", e))?;

    Ok(())
}
