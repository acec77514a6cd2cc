//! Error handling.
//!
//! This module provides:
//! - Error type definitions per layer (initialization, store, validation, page host, webhook)
//! - The failure taxonomy recorded for each identifier during extraction
//!
//! Layer errors are raised with `?`; extraction failures are recorded per
//! identifier and never abort a batch.

mod retry;
mod types;

// Re-export public API
pub use retry::get_retry_strategy;
pub use types::{
    BatchError, ExtractionFailure, FailureReason, InitializationError, PageError, StoreError,
    ValidationError, WebhookError,
};
