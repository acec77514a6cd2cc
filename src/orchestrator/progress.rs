//! Extraction status bookkeeping.

use chrono::Utc;
use log::{info, warn};

use crate::error_handling::StoreError;
use crate::extractor::ExtractionResult;
use crate::messages::{Message, NotificationBus};
use crate::store::{ExtractionStatus, Store};

/// Owns the [`ExtractionStatus`] of one batch.
///
/// Every change is persisted under `extractionStatus` and announced on the
/// notification bus. Successful results are upserted into the stored
/// results as soon as they are known.
pub struct ProgressReporter {
    store: Store,
    bus: NotificationBus,
    status: ExtractionStatus,
}

impl ProgressReporter {
    /// Writes the initial status for a batch of `total` identifiers.
    pub async fn start(
        store: Store,
        bus: NotificationBus,
        total: usize,
    ) -> Result<Self, StoreError> {
        let status = ExtractionStatus::started(total);
        store.set_extraction_status(&status).await?;
        Ok(Self { store, bus, status })
    }

    /// Current status.
    pub fn status(&self) -> &ExtractionStatus {
        &self.status
    }

    /// Announces that `asin` is being processed.
    pub async fn begin(&mut self, asin: &str) -> Result<(), StoreError> {
        self.status.current_message = format!("Processing images for {asin}...");
        self.store.set_extraction_status(&self.status).await
    }

    /// Records the final result of one identifier.
    pub async fn record(&mut self, result: &ExtractionResult) -> Result<(), StoreError> {
        match result {
            ExtractionResult::Success(product) => {
                self.status.successful += 1;
                self.store.add_image_result(product.clone()).await?;
            }
            ExtractionResult::Error(_) => self.status.failed += 1,
        }
        self.status.processed += 1;
        self.store.set_extraction_status(&self.status).await?;
        self.bus.publish(Message::ExtractionProgress {
            data: self.status.clone(),
        });
        Ok(())
    }

    /// Marks the batch finished.
    ///
    /// On error the reporter is kept so the caller can still [`fail`](Self::fail) it.
    pub async fn complete(&mut self) -> Result<ExtractionStatus, StoreError> {
        self.status.in_progress = false;
        self.status.current_message = format!(
            "Image extraction completed: {} successful, {} failed",
            self.status.successful, self.status.failed
        );
        self.status.completed_at = Some(Utc::now());
        self.store.set_extraction_status(&self.status).await?;
        info!("{}", self.status.current_message);
        self.bus.publish(Message::ExtractionComplete {
            data: self.status.clone(),
        });
        Ok(self.status.clone())
    }

    /// Marks the batch failed with `error`.
    ///
    /// The status is still announced if persisting it fails.
    pub async fn fail(mut self, error: &str) -> ExtractionStatus {
        self.status.in_progress = false;
        self.status.current_message = format!("Image extraction failed: {error}");
        self.status.error = Some(error.to_string());
        self.status.completed_at = Some(Utc::now());
        if let Err(e) = self.store.set_extraction_status(&self.status).await {
            warn!("Could not persist failed extraction status: {}", e);
        }
        self.bus.publish(Message::ExtractionFailed {
            data: self.status.clone(),
        });
        self.status
    }
}
