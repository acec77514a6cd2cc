//! Typed accessors for every schema key.

use chrono::Utc;
use log::{debug, info};
use serde_json::Value;

use crate::analysis::AggregatedReport;
use crate::config::PAYLOAD_VERSION;
use crate::error_handling::StoreError;
use crate::extractor::ProductImages;
use crate::webhook::{decode_password, encode_password};

use super::kv::Store;
use super::models::{
    AllData, ClassifiedAsins, CollectedItem, ExportEnvelope, ExtractionStatus, ExtractorResults,
    StorageUsage, UsageBreakdown, WebhookConfig, WebhookConfigUpdate, ASIN_LIST_KEY,
    EXTRACTION_STATUS_KEY, EXTRACTOR_RESULTS_KEY, KEYWORDS_KEY, LAST_EXTRACTION_TIME_KEY,
    WEBHOOK_SETTINGS_KEY,
};

const TOP_COUNT: usize = crate::config::TOP_PRODUCT_COUNT;

impl Store {
    /// Collected products, in insertion order.
    pub async fn get_asin_list(&self) -> Result<Vec<CollectedItem>, StoreError> {
        self.get_or(ASIN_LIST_KEY, Vec::new()).await
    }

    /// Replaces the collected list.
    pub async fn set_asin_list(&self, items: &[CollectedItem]) -> Result<(), StoreError> {
        self.set_typed(ASIN_LIST_KEY, &items).await
    }

    /// Appends an item unless its identifier is already collected.
    ///
    /// Returns `true` when the item was added.
    pub async fn add_asin(&self, item: CollectedItem) -> Result<bool, StoreError> {
        let mut items = self.get_asin_list().await?;
        if items.iter().any(|i| i.asin == item.asin) {
            debug!("ASIN {} already collected", item.asin);
            return Ok(false);
        }
        items.push(item);
        self.set_asin_list(&items).await?;
        Ok(true)
    }

    /// Removes an identifier. Returns `true` when something was removed.
    pub async fn remove_asin(&self, asin: &str) -> Result<bool, StoreError> {
        let mut items = self.get_asin_list().await?;
        let before = items.len();
        items.retain(|i| i.asin != asin);
        if items.len() == before {
            return Ok(false);
        }
        self.set_asin_list(&items).await?;
        Ok(true)
    }

    /// Splits the collected list into the top three and the rest.
    pub async fn classify_asins(&self) -> Result<ClassifiedAsins, StoreError> {
        let mut top3 = self.get_asin_list().await?;
        let others = top3.split_off(top3.len().min(TOP_COUNT));
        Ok(ClassifiedAsins { top3, others })
    }

    /// Search keywords; empty when unset.
    pub async fn get_keywords(&self) -> Result<String, StoreError> {
        self.get_or(KEYWORDS_KEY, String::new()).await
    }

    /// Stores the search keywords.
    pub async fn set_keywords(&self, keywords: &str) -> Result<(), StoreError> {
        self.set(KEYWORDS_KEY, Value::String(keywords.to_string()))
            .await
    }

    /// Webhook settings with the password decoded.
    ///
    /// On first read the defaults are persisted and returned.
    pub async fn get_webhook_config(&self) -> Result<WebhookConfig, StoreError> {
        match self.get_typed::<WebhookConfig>(WEBHOOK_SETTINGS_KEY).await? {
            Some(mut config) => {
                config.password = decode_password(&config.password);
                Ok(config)
            }
            None => {
                let config = WebhookConfig::default();
                self.store_webhook_config(&config).await?;
                Ok(config)
            }
        }
    }

    /// Merges `update` over the stored settings and stores the result.
    pub async fn set_webhook_config(
        &self,
        update: WebhookConfigUpdate,
    ) -> Result<WebhookConfig, StoreError> {
        let config = update.apply_to(self.get_webhook_config().await?);
        self.store_webhook_config(&config).await?;
        info!("Webhook settings saved for {}", config.url);
        Ok(config)
    }

    async fn store_webhook_config(&self, config: &WebhookConfig) -> Result<(), StoreError> {
        let stored = WebhookConfig {
            password: encode_password(&config.password),
            ..config.clone()
        };
        self.set_typed(WEBHOOK_SETTINGS_KEY, &stored).await
    }

    /// Stored extraction output; empty when unset.
    pub async fn get_extraction_results(&self) -> Result<ExtractorResults, StoreError> {
        self.get_or(EXTRACTOR_RESULTS_KEY, ExtractorResults::default())
            .await
    }

    /// Stores extraction output, stamping `timestamp`.
    pub async fn set_extraction_results(
        &self,
        mut results: ExtractorResults,
    ) -> Result<(), StoreError> {
        results.timestamp = Some(Utc::now());
        self.set_typed(EXTRACTOR_RESULTS_KEY, &results).await
    }

    /// Inserts or replaces the images of one product.
    pub async fn add_image_result(&self, product: ProductImages) -> Result<(), StoreError> {
        let mut results = self.get_extraction_results().await?;
        match results.images.iter_mut().find(|p| p.asin == product.asin) {
            Some(existing) => *existing = product,
            None => results.images.push(product),
        }
        self.set_extraction_results(results).await
    }

    /// Stores the report of a finished run and records the finish time.
    pub async fn set_report(&self, report: AggregatedReport) -> Result<(), StoreError> {
        let mut results = self.get_extraction_results().await?;
        results.report = Some(report);
        self.set_extraction_results(results).await?;
        self.set(
            LAST_EXTRACTION_TIME_KEY,
            Value::from(Utc::now().timestamp_millis()),
        )
        .await
    }

    /// Unix millis of the last finished extraction.
    pub async fn last_extraction_time(&self) -> Result<Option<i64>, StoreError> {
        self.get_typed(LAST_EXTRACTION_TIME_KEY).await
    }

    /// Current extraction status, if any.
    pub async fn get_extraction_status(&self) -> Result<Option<ExtractionStatus>, StoreError> {
        self.get_typed(EXTRACTION_STATUS_KEY).await
    }

    /// Overwrites the extraction status.
    pub async fn set_extraction_status(&self, status: &ExtractionStatus) -> Result<(), StoreError> {
        self.set_typed(EXTRACTION_STATUS_KEY, status).await
    }

    /// Removes the extraction status.
    pub async fn clear_extraction_status(&self) -> Result<(), StoreError> {
        self.remove(&[EXTRACTION_STATUS_KEY]).await
    }

    /// Removes extraction output and status, keeping the collected list.
    pub async fn clear_extraction_data(&self) -> Result<(), StoreError> {
        self.remove(&[EXTRACTOR_RESULTS_KEY, EXTRACTION_STATUS_KEY])
            .await
    }

    /// Snapshot of the user-facing data.
    pub async fn get_all_data(&self) -> Result<AllData, StoreError> {
        Ok(AllData {
            asin_list: Some(self.get_asin_list().await?),
            amazon_keywords: Some(self.get_keywords().await?),
            extractor_results: Some(self.get_extraction_results().await?),
            webhook_config: self.get_typed(WEBHOOK_SETTINGS_KEY).await?,
            timestamp: Some(Utc::now()),
        })
    }

    /// Versioned export of [`Store::get_all_data`].
    pub async fn export_data(&self) -> Result<ExportEnvelope, StoreError> {
        Ok(ExportEnvelope {
            version: PAYLOAD_VERSION.to_string(),
            export_date: Utc::now(),
            data: self.get_all_data().await?,
        })
    }

    /// Restores the sections present in an export document.
    pub async fn import_data(&self, document: &Value) -> Result<(), StoreError> {
        let data = document
            .get("data")
            .filter(|d| d.is_object())
            .ok_or_else(|| StoreError::InvalidImport("missing data section".to_string()))?;
        let data: AllData = serde_json::from_value(data.clone())?;

        if let Some(items) = data.asin_list {
            self.set_asin_list(&items).await?;
        }
        if let Some(keywords) = data.amazon_keywords.filter(|k| !k.is_empty()) {
            self.set_keywords(&keywords).await?;
        }
        if let Some(results) = data.extractor_results {
            self.set_extraction_results(results).await?;
        }
        if let Some(config) = data.webhook_config {
            // Already obfuscated.
            self.set_typed(WEBHOOK_SETTINGS_KEY, &config).await?;
        }
        info!("Imported data");
        Ok(())
    }

    /// Key count, serialized size and per-kind counts.
    pub async fn storage_usage(&self) -> Result<StorageUsage, StoreError> {
        let all = self.all().await?;
        let size = serde_json::to_string(&all)?.len();
        let count = |key: &str, field: Option<&str>| -> usize {
            let value = all.get(key);
            let value = match field {
                Some(f) => value.and_then(|v| v.get(f)),
                None => value,
            };
            value.and_then(Value::as_array).map_or(0, Vec::len)
        };
        let extractor_products = all
            .get(EXTRACTOR_RESULTS_KEY)
            .and_then(|r| r.pointer("/report/analysis/processed_products"))
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        Ok(StorageUsage {
            total_keys: all.len(),
            estimated_size_kb: (size as f64 / 1024.0).round() as usize,
            breakdown: UsageBreakdown {
                asin_list: count(ASIN_LIST_KEY, None),
                extractor_images: count(EXTRACTOR_RESULTS_KEY, Some("images")),
                extractor_products,
            },
        })
    }
}
