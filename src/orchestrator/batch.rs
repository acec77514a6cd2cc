//! Sequential batch extraction.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::{info, warn};
use tokio::time::{sleep, Instant};

use crate::analysis::{build_report, AggregatedReport};
use crate::config::ExtractionConfig;
use crate::error_handling::{get_retry_strategy, BatchError};
use crate::extractor::ExtractionResult;
use crate::identifier::{validate_batch, Asin};
use crate::messages::NotificationBus;
use crate::store::{ExtractionStatus, Store};

use super::lifecycle::extract_from_page;
use super::page_host::PageHost;
use super::progress::ProgressReporter;

/// Everything a finished extraction run produced.
#[derive(Debug, Clone)]
pub struct ExtractionRun {
    /// One result per identifier, in input order
    pub results: Vec<ExtractionResult>,
    /// Final status
    pub status: ExtractionStatus,
    /// Aggregated report, also stored under `extractorResults`
    pub report: AggregatedReport,
}

/// Drives identifiers through hidden pages one at a time.
#[derive(Clone)]
pub struct Orchestrator {
    host: Arc<dyn PageHost>,
    store: Store,
    bus: NotificationBus,
    config: ExtractionConfig,
}

impl Orchestrator {
    /// Creates an orchestrator over `host`, persisting progress to `store`.
    pub fn new(
        host: Arc<dyn PageHost>,
        store: Store,
        bus: NotificationBus,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            host,
            store,
            bus,
            config,
        }
    }

    /// Store progress and results are written to.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Timing and limits in use.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Bus notifications are published on.
    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Extracts images for every identifier, strictly in input order.
    ///
    /// The batch is validated before any page opens. Per-identifier failures
    /// are returned as `error` results; only store failures abort the batch,
    /// in which case the status is marked failed before the error is
    /// returned.
    pub async fn extract_batch<S: AsRef<str>>(
        &self,
        asins: &[S],
    ) -> Result<Vec<ExtractionResult>, BatchError> {
        self.execute(asins).await.map(|(results, _)| results)
    }

    async fn execute<S: AsRef<str>>(
        &self,
        asins: &[S],
    ) -> Result<(Vec<ExtractionResult>, ExtractionStatus), BatchError> {
        let batch = validate_batch(asins, self.config.max_batch_size)?;
        info!("Starting image extraction for {} ASINs", batch.len());

        let mut progress =
            ProgressReporter::start(self.store.clone(), self.bus.clone(), batch.len()).await?;
        let outcome = match self.run_batch(&batch, &mut progress).await {
            Ok(results) => match progress.complete().await {
                Ok(status) => Ok((results, status)),
                Err(e) => Err(BatchError::from(e)),
            },
            Err(e) => Err(e),
        };
        if let Err(e) = &outcome {
            warn!("Image extraction failed: {}", e);
            progress.fail(&e.to_string()).await;
        }
        outcome
    }

    async fn run_batch(
        &self,
        batch: &[Asin],
        progress: &mut ProgressReporter,
    ) -> Result<Vec<ExtractionResult>, BatchError> {
        let mut results = Vec::with_capacity(batch.len());
        for (index, asin) in batch.iter().enumerate() {
            progress.begin(asin.as_str()).await?;
            let result = self.extract_with_retry(asin).await;
            progress.record(&result).await?;
            results.push(result);

            if index + 1 < batch.len() {
                sleep(self.config.request_delay).await;
            }
        }
        Ok(results)
    }

    /// Extracts one identifier, retrying failed attempts.
    ///
    /// An attempt that yields at least one image is final; the last failed
    /// attempt becomes the result.
    pub async fn extract_with_retry(&self, asin: &Asin) -> ExtractionResult {
        let strategy = get_retry_strategy(self.config.max_attempts, self.config.retry_backoff);
        let attempt_count = Arc::new(AtomicU32::new(0));

        let outcome = tokio_retry::Retry::spawn(strategy, {
            let attempt_count = Arc::clone(&attempt_count);
            move || {
                let attempt = attempt_count.fetch_add(1, Ordering::SeqCst) + 1;
                let host = Arc::clone(&self.host);
                async move {
                    if attempt > 1 {
                        info!(
                            "Retrying {} (attempt {}/{})",
                            asin, attempt, self.config.max_attempts
                        );
                    }
                    extract_from_page(host, asin, &self.config).await
                }
            }
        })
        .await;

        match outcome {
            Ok(product) => ExtractionResult::Success(product),
            Err(failure) => {
                let attempts = attempt_count.load(Ordering::SeqCst);
                warn!(
                    "{} failed after {} attempt(s): {}",
                    asin, attempts, failure
                );
                ExtractionResult::failed(asin.as_str(), failure)
            }
        }
    }

    /// Runs a batch, then builds and stores the aggregated report.
    pub async fn run_extraction<S: AsRef<str>>(
        &self,
        asins: &[S],
    ) -> Result<ExtractionRun, BatchError> {
        let started = Instant::now();
        let (results, status) = self.execute(asins).await?;
        let identifiers: Vec<&str> = results.iter().map(ExtractionResult::asin).collect();
        let report = build_report(&results, &identifiers, started.elapsed());
        self.store.set_report(report.clone()).await?;
        info!(
            "Extraction {} stored: {} products, {} images",
            report.extraction_id, report.summary.total_asins, report.summary.total_images
        );
        Ok(ExtractionRun {
            results,
            status,
            report,
        })
    }
}
