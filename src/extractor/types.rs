//! Extractor data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error_handling::{ExtractionFailure, FailureReason};

/// Document loading state of a page, as a browser reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    /// The document is still being fetched.
    Loading,
    /// The document is parsed but sub-resources are still loading.
    Interactive,
    /// The document and its resources are loaded.
    Complete,
}

/// Point-in-time view of a hidden page: where it is, how far it has loaded,
/// and its current markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Current page URL
    pub url: String,
    /// Document loading state
    pub ready_state: ReadyState,
    /// Serialized document
    pub html: String,
}

impl PageSnapshot {
    /// A page still loading, with no markup yet.
    pub fn loading(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ready_state: ReadyState::Loading,
            html: String::new(),
        }
    }

    /// A fully loaded page.
    pub fn complete(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ready_state: ReadyState::Complete,
            html: html.into(),
        }
    }
}

/// Outcome of one readiness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Loaded, with a product title and no blocking markers.
    Ready,
    /// Keep polling.
    Loading,
    /// CAPTCHA challenge shown.
    Blocked,
    /// Error page or blocking keyword in the document title.
    NotFound,
}

/// Raw result of running the extractor against one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtraction {
    /// Identifier derived from the page URL
    pub asin: String,
    /// Product title, whitespace-collapsed; empty when no title element matched
    pub title: String,
    /// Image URLs in first-seen order (at most 10)
    pub images: Vec<String>,
    /// Page URL
    pub page_url: String,
}

/// Images extracted for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImages {
    /// Product identifier
    pub asin: String,
    /// Product title (`Unknown Product` when none was found)
    pub title: String,
    /// Full-size image URLs, first is the main image
    pub images: Vec<String>,
    /// Same as `images[0]`
    pub thumbnail: String,
    /// Page the images were read from
    pub page_url: String,
    /// Number of images
    pub image_count: usize,
    /// Extraction time
    pub extracted_at: DateTime<Utc>,
}

/// Per-identifier result of an extraction batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionResult {
    /// At least one image was extracted.
    Success(ProductImages),
    /// Extraction failed after all attempts.
    Error(FailedExtraction),
}

/// Failed extraction for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedExtraction {
    /// Product identifier
    pub asin: String,
    /// Failure tag
    pub error: FailureReason,
    /// Free-form detail
    pub details: String,
}

impl ExtractionResult {
    /// Builds a failed result for `asin` from a tagged failure.
    pub fn failed(asin: impl Into<String>, failure: ExtractionFailure) -> Self {
        ExtractionResult::Error(FailedExtraction {
            asin: asin.into(),
            error: failure.reason,
            details: failure.details,
        })
    }

    /// Identifier this result answers.
    pub fn asin(&self) -> &str {
        match self {
            ExtractionResult::Success(p) => &p.asin,
            ExtractionResult::Error(f) => &f.asin,
        }
    }

    /// `true` for a successful extraction.
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    /// Extracted images; empty on failure.
    pub fn images(&self) -> &[String] {
        match self {
            ExtractionResult::Success(p) => &p.images,
            ExtractionResult::Error(_) => &[],
        }
    }

    /// Failure tag, if this is a failure.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            ExtractionResult::Success(_) => None,
            ExtractionResult::Error(f) => Some(f.error),
        }
    }
}
