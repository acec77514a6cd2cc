//! Status server data structures.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::store::{ExtractionStatus, Store};

/// Shared state for the status server
#[derive(Clone)]
pub struct StatusState {
    /// Store the status and results are read from
    pub store: Store,
    /// Server start, for uptime
    pub start_time: Arc<Instant>,
}

impl StatusState {
    /// State serving `store`, with uptime counted from now.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            start_time: Arc::new(Instant::now()),
        }
    }
}

/// JSON response for `/status` endpoint
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Whether a batch is running
    pub in_progress: bool,
    /// Processed share of the batch, 0-100
    pub percentage_complete: f64,
    /// Seconds since the server started
    pub uptime_seconds: f64,
    /// Unix millis of the last finished extraction
    pub last_extraction_time: Option<i64>,
    /// Raw persisted status, `null` when nothing has run
    pub status: Option<ExtractionStatus>,
}
