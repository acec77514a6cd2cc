//! JSON status handler.

use axum::{extract::State, response::Response};

use super::super::types::{StatusResponse, StatusState};
use super::{json_response, store_failure};

/// JSON status endpoint with batch progress
pub async fn status_handler(State(state): State<StatusState>) -> Response {
    let status = match state.store.get_extraction_status().await {
        Ok(status) => status,
        Err(e) => return store_failure(e),
    };
    let last_extraction_time = match state.store.last_extraction_time().await {
        Ok(time) => time,
        Err(e) => return store_failure(e),
    };

    let percentage = match &status {
        Some(s) if s.total > 0 => (s.processed as f64 / s.total as f64) * 100.0,
        _ => 0.0,
    };

    let response = StatusResponse {
        in_progress: status.as_ref().is_some_and(|s| s.in_progress),
        percentage_complete: percentage,
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        last_extraction_time,
        status,
    };

    json_response(&response)
}
