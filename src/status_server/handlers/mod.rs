//! Status server HTTP handlers.

mod results;
mod status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error_handling::StoreError;

pub use results::results_handler;
pub use status::status_handler;

fn json_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_string_pretty(value) {
        Ok(json) => (
            StatusCode::OK,
            [("content-type", "application/json")],
            json,
        )
            .into_response(),
        Err(e) => {
            log::error!("Failed to serialize status response: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Serialization error").into_response()
        }
    }
}

fn store_failure(e: StoreError) -> Response {
    log::error!("Status server failed to read store: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}
