//! Lifecycle of one hidden product page.
//!
//! ```text
//! Created -> Loading -> {Ready | Blocked | NotFound | TimedOut} -> {Extracted | Failed} -> Closed
//! ```
//!
//! The page is closed on every path, including cancellation of the future.

use std::sync::Arc;

use log::{debug, info, warn};
use strum_macros::Display;
use tokio::time::{sleep, timeout_at, Instant};

use crate::config::ExtractionConfig;
use crate::error_handling::{ExtractionFailure, FailureReason};
use crate::extractor::{
    extract_product_images, format_extraction_result, probe_readiness, PageSnapshot,
    ProductImages, Readiness,
};
use crate::identifier::Asin;

use super::guard::PageGuard;
use super::page_host::PageHost;

/// States a page passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleState {
    /// Page opened
    Created,
    /// Waiting for the document
    Loading,
    /// Document complete with a product title
    Ready,
    /// CAPTCHA shown
    Blocked,
    /// Error page
    NotFound,
    /// Deadline passed before a terminal state
    TimedOut,
    /// Images extracted
    Extracted,
    /// Extraction produced no images
    Failed,
    /// Page closed
    Closed,
}

fn transition(asin: &Asin, state: LifecycleState) {
    debug!("{}: {}", asin, state);
}

/// Settles, then polls the page until it is ready or terminally unusable.
async fn wait_until_ready(
    guard: &PageGuard,
    asin: &Asin,
    config: &ExtractionConfig,
) -> Result<PageSnapshot, ExtractionFailure> {
    transition(asin, LifecycleState::Loading);
    sleep(config.settle_delay).await;
    loop {
        let snapshot = guard.snapshot().await?;
        match probe_readiness(&snapshot) {
            Readiness::Ready => {
                transition(asin, LifecycleState::Ready);
                return Ok(snapshot);
            }
            Readiness::Blocked => {
                transition(asin, LifecycleState::Blocked);
                return Err(ExtractionFailure::new(
                    FailureReason::CaptchaRequired,
                    "Amazon blocked request (CAPTCHA)",
                ));
            }
            Readiness::NotFound => {
                transition(asin, LifecycleState::NotFound);
                return Err(ExtractionFailure::new(
                    FailureReason::PageError,
                    "ASIN not found or product unavailable",
                ));
            }
            Readiness::Loading => sleep(config.poll_interval).await,
        }
    }
}

async fn drive(
    guard: &PageGuard,
    asin: &Asin,
    config: &ExtractionConfig,
    deadline: Instant,
) -> Result<ProductImages, ExtractionFailure> {
    match timeout_at(deadline, wait_until_ready(guard, asin, config)).await {
        Ok(ready) => {
            ready?;
        }
        Err(_) => {
            transition(asin, LifecycleState::TimedOut);
            return Err(ExtractionFailure::new(
                FailureReason::TimedOut,
                format!("Page load timeout ({}s)", config.page_timeout.as_secs()),
            ));
        }
    }

    let snapshot = guard.snapshot().await?;
    match extract_product_images(&snapshot) {
        Ok(extraction) => {
            transition(asin, LifecycleState::Extracted);
            Ok(format_extraction_result(extraction))
        }
        Err(failure) => {
            transition(asin, LifecycleState::Failed);
            Err(failure)
        }
    }
}

/// Opens the product page of `asin`, extracts its images and closes the page.
///
/// Every failure is returned as a tagged [`ExtractionFailure`]; a page that
/// cannot be opened or read becomes `page_unavailable`.
pub async fn extract_from_page(
    host: Arc<dyn PageHost>,
    asin: &Asin,
    config: &ExtractionConfig,
) -> Result<ProductImages, ExtractionFailure> {
    let url = asin.product_url(&config.product_base_url);
    let deadline = Instant::now() + config.page_timeout;
    let guard = PageGuard::open(host, &url).await.map_err(|e| {
        warn!("Could not open page for {}: {}", asin, e);
        ExtractionFailure::from(e)
    })?;
    transition(asin, LifecycleState::Created);

    let outcome = drive(&guard, asin, config, deadline).await;
    guard.close().await;
    transition(asin, LifecycleState::Closed);

    match &outcome {
        Ok(product) => info!("{}: extracted {} images", asin, product.image_count),
        Err(failure) => info!("{}: {}", asin, failure),
    }
    outcome
}
