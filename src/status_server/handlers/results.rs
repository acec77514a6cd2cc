//! Stored results handler.

use axum::{extract::State, response::Response};

use super::super::types::StatusState;
use super::{json_response, store_failure};

/// Stored extraction results with their report
pub async fn results_handler(State(state): State<StatusState>) -> Response {
    match state.store.get_extraction_results().await {
        Ok(results) => json_response(&results),
        Err(e) => store_failure(e),
    }
}
