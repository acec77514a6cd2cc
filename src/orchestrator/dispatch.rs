//! Request message handling.

use log::{error, info};
use tokio::task::JoinHandle;

use crate::error_handling::{BatchError, StoreError, ValidationError};
use crate::extractor::{extract_product_images, format_extraction_result, ExtractionResult};
use crate::identifier::{asin_from_product_url, validate_batch};
use crate::messages::{Message, Reply};

use super::batch::{ExtractionRun, Orchestrator};

impl Orchestrator {
    /// Validates `asins` and runs the extraction pipeline in the background.
    pub fn spawn_extraction(
        &self,
        asins: Vec<String>,
    ) -> Result<JoinHandle<Result<ExtractionRun, BatchError>>, ValidationError> {
        validate_batch(&asins, self.config().max_batch_size)?;
        let orchestrator = self.clone();
        Ok(tokio::spawn(async move {
            let run = orchestrator.run_extraction(&asins).await;
            if let Err(e) = &run {
                error!("Background extraction failed: {}", e);
            }
            run
        }))
    }

    /// Answers a request message.
    ///
    /// `EXTRACT_IMAGES` is acknowledged immediately and the batch continues
    /// in the background. Notification messages are not requests and are
    /// rejected.
    pub async fn handle_message(&self, message: Message) -> Result<Reply, StoreError> {
        let reply = match message {
            Message::ExtractImages { asins } => match self.spawn_extraction(asins) {
                Ok(_) => {
                    info!("Image extraction started");
                    Reply::ack("Image extraction started")
                }
                Err(e) => Reply::rejected(e.to_string()),
            },
            Message::ExtractGalleryImages { snapshot } => {
                let result = match extract_product_images(&snapshot) {
                    Ok(extraction) => ExtractionResult::Success(format_extraction_result(extraction)),
                    Err(failure) => ExtractionResult::failed(
                        asin_from_product_url(&snapshot.url).unwrap_or_default(),
                        failure,
                    ),
                };
                Reply::Extraction(result)
            }
            Message::GetExtractionStatus => {
                Reply::Status(self.store().get_extraction_status().await?)
            }
            Message::ExtractionProgress { .. }
            | Message::ExtractionComplete { .. }
            | Message::ExtractionFailed { .. } => {
                Reply::rejected("Notifications are not requests")
            }
        };
        Ok(reply)
    }
}
