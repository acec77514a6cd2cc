//! Error type definitions.
//!
//! This module defines all error types used throughout the application, plus the
//! failure taxonomy recorded per identifier during extraction.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for key-value store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// An import envelope is missing its data section.
    #[error("Invalid export data format: {0}")]
    InvalidImport(String),
}

/// Input validation errors, raised before any page is opened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more identifiers are malformed.
    #[error("Invalid ASINs: {}", .0.join(", "))]
    InvalidAsins(Vec<String>),

    /// The batch is empty.
    #[error("No ASINs provided")]
    EmptyBatch,

    /// The batch exceeds the per-batch limit.
    #[error("Maximum {max} ASINs allowed (got {size})")]
    BatchTooLarge {
        /// Number of identifiers submitted
        size: usize,
        /// Configured limit
        max: usize,
    },

    /// The batch contains the same identifier more than once.
    #[error("Duplicate ASINs found: {0}")]
    DuplicateAsin(String),

    /// A webhook URL is not an absolute http(s) URL.
    #[error("Invalid webhook URL: {0}")]
    InvalidWebhookUrl(String),
}

/// Failures of the page host (open, snapshot or close).
#[derive(Error, Debug)]
pub enum PageError {
    /// The hidden page could not be created.
    #[error("Failed to open page {url}: {reason}")]
    OpenFailed {
        /// URL the page was opened at
        url: String,
        /// Underlying cause
        reason: String,
    },

    /// The host has no page with this id (already closed).
    #[error("Unknown page {0}")]
    UnknownPage(u64),

    /// The page's document could not be read.
    #[error("Failed to read page state: {0}")]
    SnapshotFailed(String),
}

/// Webhook delivery errors.
///
/// A non-2xx response is not an error; it is reported through
/// `WebhookResponse::success`.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// The configured URL is not an absolute http(s) URL.
    #[error(transparent)]
    InvalidUrl(#[from] ValidationError),

    /// Network or protocol failure.
    #[error("Webhook request failed: {0}")]
    Transport(#[from] ReqwestError),

    /// Payload could not be serialized.
    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The payload could not be assembled from stored data.
    #[error("Failed to build payload: {0}")]
    Store(#[from] StoreError),
}

/// Reason tag of a per-identifier extraction failure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The page URL carries no product identifier.
    InvalidUrl,
    /// The page shows a CAPTCHA challenge.
    CaptchaRequired,
    /// The page is an error page or the product does not exist.
    PageError,
    /// No image URL survived extraction.
    NoImagesFound,
    /// Extraction raised inside the page.
    ScriptError,
    /// The page never reached a terminal state before the deadline.
    TimedOut,
    /// The page could not be opened or read.
    PageUnavailable,
}

impl FailureReason {
    /// Wire tag of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::InvalidUrl => "invalid_url",
            FailureReason::CaptchaRequired => "captcha_required",
            FailureReason::PageError => "page_error",
            FailureReason::NoImagesFound => "no_images_found",
            FailureReason::ScriptError => "script_error",
            FailureReason::TimedOut => "timed_out",
            FailureReason::PageUnavailable => "page_unavailable",
        }
    }

    /// Human-readable summary of the reason.
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::InvalidUrl => "Invalid URL",
            FailureReason::CaptchaRequired => "CAPTCHA required",
            FailureReason::PageError => "Product page error",
            FailureReason::NoImagesFound => "No gallery images found",
            FailureReason::ScriptError => "Script execution error",
            FailureReason::TimedOut => "Page load timeout",
            FailureReason::PageUnavailable => "Page unavailable",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Batch-level extraction errors.
///
/// Per-identifier failures never surface here; they are recorded as results.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The batch was rejected before any page opened.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Status or results could not be persisted.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A tagged extraction failure for a single identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}: {details}", reason.message())]
pub struct ExtractionFailure {
    /// Failure tag
    pub reason: FailureReason,
    /// Free-form detail
    pub details: String,
}

impl ExtractionFailure {
    /// Creates a failure with the given reason and detail.
    pub fn new(reason: FailureReason, details: impl Into<String>) -> Self {
        Self {
            reason,
            details: details.into(),
        }
    }
}

impl From<PageError> for ExtractionFailure {
    fn from(e: PageError) -> Self {
        ExtractionFailure::new(FailureReason::PageUnavailable, e.to_string())
    }
}
