//! Persistent key-value store.
//!
//! One SQLite table of JSON values keyed by name, plus typed accessors for
//! the schema keys (`asinList`, `amazon_keywords`, `webhook_settings`,
//! `extractorResults`, `extractionStatus`, `lastExtractionTime`).
//! Every write is published to [`Store::subscribe`] receivers.

mod accessors;
mod kv;
mod migrations;
mod models;
mod pool;

pub use kv::{StorageChange, Store, LOCAL_NAMESPACE};
pub use migrations::run_migrations;
pub use models::{
    AllData, ClassifiedAsins, CollectedItem, ExportEnvelope, ExtractionStatus, ExtractorResults,
    StorageUsage, UsageBreakdown, WebhookConfig, WebhookConfigUpdate, ASIN_LIST_KEY,
    EXTRACTION_STATUS_KEY, EXTRACTOR_RESULTS_KEY, KEYWORDS_KEY, LAST_EXTRACTION_TIME_KEY,
    WEBHOOK_SETTINGS_KEY,
};
pub use pool::init_db_pool_with_path;
