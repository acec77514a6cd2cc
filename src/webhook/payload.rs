//! Webhook payload builders and validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::ProcessedProduct;
use crate::config::{
    WebhookMode, PAYLOAD_SOURCE, PAYLOAD_VERSION, TEST_CONNECTION_MESSAGE, TEST_PAYLOAD_SOURCE,
};
use crate::error_handling::StoreError;
use crate::extractor::ProductImages;
use crate::store::{CollectedItem, Store};

/// Keywords plus the collected identifiers, split top three / rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicPayload {
    /// Search keywords
    pub amazon_keywords: String,
    /// First three identifiers, comma-joined
    pub asin_top3: String,
    /// Remaining identifiers, comma-joined
    pub asin_list: String,
}

/// Extraction section of the enhanced payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionData {
    /// Stored per-product images
    pub images: Vec<ProductImages>,
    /// Per-product analysis of the last report
    pub processed_products: Vec<ProcessedProduct>,
    /// Strategy of the last report, `{}` when none
    pub product_strategy: Value,
    /// Content packages of the last report, `{}` when none
    pub content_ready_packages: Value,
}

/// Basic payload plus extraction data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedPayload {
    /// Always `amz-extractor-all`
    pub source: String,
    /// Payload version
    pub version: String,
    /// Build time
    pub timestamp: DateTime<Utc>,
    /// Basic fields
    #[serde(flatten)]
    pub basic: BasicPayload,
    /// Extraction data
    pub extraction_data: ExtractionData,
}

/// Payload of a connection test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPayload {
    /// Always `true`
    pub test: bool,
    /// Build time
    pub timestamp: DateTime<Utc>,
    /// Always `amz-extractor-all-test`
    pub source: String,
    /// Payload version
    pub version: String,
    /// Fixed greeting
    pub message: String,
}

impl TestPayload {
    /// Test payload stamped now.
    pub fn new() -> Self {
        Self {
            test: true,
            timestamp: Utc::now(),
            source: TEST_PAYLOAD_SOURCE.to_string(),
            version: PAYLOAD_VERSION.to_string(),
            message: TEST_CONNECTION_MESSAGE.to_string(),
        }
    }
}

impl Default for TestPayload {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape check of a payload before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadValidation {
    /// Required fields of the mode are present
    pub valid: bool,
    /// Serialized size in bytes
    pub size: usize,
    /// Serialized size, rounded to KiB
    pub size_kb: usize,
    /// Top-level field count
    pub fields: usize,
    /// Mode checked against
    pub mode: WebhookMode,
}

fn join_asins(items: &[CollectedItem]) -> String {
    items
        .iter()
        .map(|i| i.asin.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Builds the basic payload from the collected list and keywords.
pub async fn build_basic_payload(store: &Store) -> Result<BasicPayload, StoreError> {
    let classified = store.classify_asins().await?;
    Ok(BasicPayload {
        amazon_keywords: store.get_keywords().await?,
        asin_top3: join_asins(&classified.top3),
        asin_list: join_asins(&classified.others),
    })
}

/// Builds the enhanced payload from the collected list and stored results.
pub async fn build_enhanced_payload(store: &Store) -> Result<EnhancedPayload, StoreError> {
    let basic = build_basic_payload(store).await?;
    let results = store.get_extraction_results().await?;
    let empty = || Value::Object(Default::default());

    let (processed_products, product_strategy, content_ready_packages) = match results.report {
        Some(report) => (
            report.analysis.processed_products,
            serde_json::to_value(report.analysis.product_strategy)?,
            serde_json::to_value(report.content)?,
        ),
        None => (Vec::new(), empty(), empty()),
    };

    Ok(EnhancedPayload {
        source: PAYLOAD_SOURCE.to_string(),
        version: PAYLOAD_VERSION.to_string(),
        timestamp: Utc::now(),
        basic,
        extraction_data: ExtractionData {
            images: results.images,
            processed_products,
            product_strategy,
            content_ready_packages,
        },
    })
}

/// Builds the payload of `mode` as JSON.
pub async fn build_payload(store: &Store, mode: WebhookMode) -> Result<Value, StoreError> {
    let value = match mode {
        WebhookMode::Basic => serde_json::to_value(build_basic_payload(store).await?)?,
        WebhookMode::Enhanced => serde_json::to_value(build_enhanced_payload(store).await?)?,
    };
    Ok(value)
}

/// Payload of `mode` together with its validation, for display before sending.
pub async fn payload_preview(
    store: &Store,
    mode: WebhookMode,
) -> Result<(Value, PayloadValidation), StoreError> {
    let payload = build_payload(store, mode).await?;
    let validation = validate_payload(&payload, mode);
    Ok((payload, validation))
}

/// Checks that `payload` carries the fields `mode` requires and measures it.
pub fn validate_payload(payload: &Value, mode: WebhookMode) -> PayloadValidation {
    let size = payload.to_string().len();
    let has = |field: &str| payload.get(field).is_some_and(|v| !v.is_null());
    let valid = match mode {
        WebhookMode::Basic => has("amazon_keywords") && has("asin_top3"),
        WebhookMode::Enhanced => has("source") && has("extraction_data"),
    };
    PayloadValidation {
        valid,
        size,
        size_kb: (size as f64 / 1024.0).round() as usize,
        fields: payload.as_object().map_or(0, |o| o.len()),
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_helpers::create_test_store;
    use serde_json::json;

    fn item(asin: &str) -> CollectedItem {
        CollectedItem {
            asin: asin.to_string(),
            title: String::new(),
            img: String::new(),
            link: String::new(),
        }
    }

    #[tokio::test]
    async fn test_basic_payload_splits_top_three() {
        let store = create_test_store().await;
        for asin in ["B000000001", "B000000002", "B000000003", "B000000004", "B000000005"] {
            store.add_asin(item(asin)).await.unwrap();
        }
        store.set_keywords("coffee mug").await.unwrap();

        let payload = build_basic_payload(&store).await.unwrap();
        assert_eq!(payload.amazon_keywords, "coffee mug");
        assert_eq!(payload.asin_top3, "B000000001,B000000002,B000000003");
        assert_eq!(payload.asin_list, "B000000004,B000000005");
    }

    #[tokio::test]
    async fn test_enhanced_payload_on_empty_store() {
        let store = create_test_store().await;
        let payload = build_payload(&store, WebhookMode::Enhanced).await.unwrap();

        assert_eq!(payload["source"], "amz-extractor-all");
        assert_eq!(payload["version"], "1.0.0");
        assert_eq!(payload["asin_top3"], "");
        assert_eq!(payload["extraction_data"]["images"], json!([]));
        assert_eq!(payload["extraction_data"]["product_strategy"], json!({}));
        assert!(validate_payload(&payload, WebhookMode::Enhanced).valid);
    }

    #[tokio::test]
    async fn test_payload_preview_matches_validation() {
        let store = create_test_store().await;
        store.add_asin(item("B000000001")).await.unwrap();

        let (payload, validation) = payload_preview(&store, WebhookMode::Basic).await.unwrap();
        assert_eq!(payload["asin_top3"], "B000000001");
        assert!(validation.valid);
        assert_eq!(validation, validate_payload(&payload, WebhookMode::Basic));
    }

    #[test]
    fn test_validate_payload() {
        let basic = json!({"amazon_keywords": "", "asin_top3": "", "asin_list": ""});
        let check = validate_payload(&basic, WebhookMode::Basic);
        assert!(check.valid);
        assert_eq!(check.fields, 3);
        assert_eq!(check.size, basic.to_string().len());
        assert_eq!(check.size_kb, 0);

        assert!(!validate_payload(&basic, WebhookMode::Enhanced).valid);
        assert!(!validate_payload(&json!({"asin_top3": ""}), WebhookMode::Basic).valid);
    }

    #[test]
    fn test_test_payload_fields() {
        let value = serde_json::to_value(TestPayload::new()).unwrap();
        assert_eq!(value["test"], true);
        assert_eq!(value["source"], "amz-extractor-all-test");
        assert_eq!(value["message"], "Test connection from AMZ Extractor ALL");
    }
}
