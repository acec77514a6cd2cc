//! Records persisted under the store's schema keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::AggregatedReport;
use crate::config::{WebhookMode, DEFAULT_WEBHOOK_URL, DEFAULT_WEBHOOK_USERNAME};
use crate::extractor::ProductImages;

/// Collected product list.
pub const ASIN_LIST_KEY: &str = "asinList";
/// Search keywords.
pub const KEYWORDS_KEY: &str = "amazon_keywords";
/// Webhook settings.
pub const WEBHOOK_SETTINGS_KEY: &str = "webhook_settings";
/// Extraction results and report.
pub const EXTRACTOR_RESULTS_KEY: &str = "extractorResults";
/// Live extraction status.
pub const EXTRACTION_STATUS_KEY: &str = "extractionStatus";
/// Unix millis of the last finished extraction.
pub const LAST_EXTRACTION_TIME_KEY: &str = "lastExtractionTime";

/// A product collected from a search page or entered manually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedItem {
    /// Product identifier
    pub asin: String,
    /// Product title
    pub title: String,
    /// Thumbnail URL, empty when unknown
    #[serde(default)]
    pub img: String,
    /// Product page URL
    #[serde(default)]
    pub link: String,
}

impl CollectedItem {
    /// Item for an identifier entered by hand.
    pub fn manual(asin: &str, link: String) -> Self {
        Self {
            asin: asin.to_string(),
            title: format!("Manual ASIN: {asin}"),
            img: String::new(),
            link,
        }
    }
}

/// Collected identifiers split into the top three and the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAsins {
    /// First three items
    pub top3: Vec<CollectedItem>,
    /// Everything after the first three
    pub others: Vec<CollectedItem>,
}

/// Progress of the running (or last) extraction batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStatus {
    /// `false` once the batch has finished or failed
    pub in_progress: bool,
    /// Identifiers in the batch
    pub total: usize,
    /// Identifiers finished so far
    pub processed: usize,
    /// Finished with at least one image
    pub successful: usize,
    /// Finished without images
    pub failed: usize,
    /// Human-readable progress line
    pub current_message: String,
    /// Batch start
    pub start_time: DateTime<Utc>,
    /// Extraction kind, always `images`
    #[serde(rename = "type")]
    pub kind: String,
    /// Batch end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Batch-level error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionStatus {
    /// Fresh status for a batch of `total` identifiers.
    pub fn started(total: usize) -> Self {
        Self {
            in_progress: true,
            total,
            processed: 0,
            successful: 0,
            failed: 0,
            current_message: "Starting image extraction...".to_string(),
            start_time: Utc::now(),
            kind: "images".to_string(),
            completed_at: None,
            error: None,
        }
    }
}

/// Extraction output kept between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorResults {
    /// Successful extractions, one per identifier
    pub images: Vec<ProductImages>,
    /// Report of the last finished run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AggregatedReport>,
    /// Last write
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Webhook endpoint and credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint URL
    pub url: String,
    /// Basic auth user
    pub username: String,
    /// Basic auth password (plain in memory, obfuscated at rest)
    pub password: String,
    /// Payload mode
    pub mode: WebhookMode,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WEBHOOK_URL.to_string(),
            username: DEFAULT_WEBHOOK_USERNAME.to_string(),
            password: String::new(),
            mode: WebhookMode::default(),
        }
    }
}

/// Partial webhook settings; `None` fields keep their default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfigUpdate {
    /// Endpoint URL
    pub url: Option<String>,
    /// Basic auth user
    pub username: Option<String>,
    /// Basic auth password, plain
    pub password: Option<String>,
    /// Payload mode
    pub mode: Option<WebhookMode>,
}

impl WebhookConfigUpdate {
    /// Applies the set fields on top of `base`.
    pub fn apply_to(self, base: WebhookConfig) -> WebhookConfig {
        WebhookConfig {
            url: self.url.unwrap_or(base.url),
            username: self.username.unwrap_or(base.username),
            password: self.password.unwrap_or(base.password),
            mode: self.mode.unwrap_or(base.mode),
        }
    }
}

/// Snapshot of the user-facing data.
///
/// `webhook_config` is kept exactly as stored, password obfuscated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllData {
    /// Collected products
    pub asin_list: Option<Vec<CollectedItem>>,
    /// Search keywords
    pub amazon_keywords: Option<String>,
    /// Extraction output
    pub extractor_results: Option<ExtractorResults>,
    /// Stored webhook settings
    pub webhook_config: Option<WebhookConfig>,
    /// Snapshot time
    pub timestamp: Option<DateTime<Utc>>,
}

/// Versioned export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEnvelope {
    /// Export format version
    pub version: String,
    /// Export time
    pub export_date: DateTime<Utc>,
    /// Exported data
    pub data: AllData,
}

/// Entry counts per data kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageBreakdown {
    /// Collected products
    pub asin_list: usize,
    /// Stored image results
    pub extractor_images: usize,
    /// Products in the stored report
    pub extractor_products: usize,
}

/// Rough storage footprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Number of stored keys
    pub total_keys: usize,
    /// Serialized size, rounded to KiB
    pub estimated_size_kb: usize,
    /// Counts per kind
    pub breakdown: UsageBreakdown,
}
