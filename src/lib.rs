//! asin_extractor library: Amazon product collection and image extraction
//!
//! This library collects Amazon product identifiers (ASINs) from saved search
//! pages or manual input, loads each product page in a hidden page, extracts
//! its gallery images, scores and aggregates them, and forwards the result to
//! a webhook.
//!
//! # Example
//!
//! ```no_run
//! use asin_extractor::{run_extraction_job, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     db_path: std::path::PathBuf::from("products.db"),
//!     ..Default::default()
//! };
//!
//! let report = run_extraction_job(config, vec!["B0ABCDEFGH".to_string()], false).await?;
//! println!("Extracted {} of {} products", report.successful, report.total);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod analysis;
mod app;
pub mod collector;
pub mod config;
pub mod error_handling;
pub mod export;
pub mod extractor;
pub mod identifier;
pub mod initialization;
pub mod messages;
pub mod orchestrator;
pub mod status_server;
pub mod store;
pub mod webhook;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, WebhookMode};
pub use orchestrator::{HttpPageHost, Orchestrator, PageHost};
pub use run::{run_extraction_job, ExtractionReport};
pub use store::Store;

// Internal run module (wires the extraction job together)
mod run {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{bail, Context, Result};
    use chrono::Utc;
    use log::{info, warn};
    use tokio_util::sync::CancellationToken;

    use crate::app::{shutdown_gracefully, spawn_progress_logger};
    use crate::config::{Config, WebhookMode};
    use crate::initialization::init_client;
    use crate::messages::NotificationBus;
    use crate::orchestrator::{HttpPageHost, Orchestrator, PageHost};
    use crate::status_server::{start_status_server, StatusState};
    use crate::store::Store;
    use crate::webhook::{WebhookClient, WebhookResponse};

    /// Results of an extraction job.
    #[derive(Debug, Clone)]
    pub struct ExtractionReport {
        /// Identifiers in the batch
        pub total: usize,
        /// Identifiers with at least one image
        pub successful: usize,
        /// Identifiers without images
        pub failed: usize,
        /// Report identifier (format: `ext_<millis>_<random>`)
        pub extraction_id: String,
        /// Path to the SQLite database holding the results
        pub db_path: PathBuf,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
        /// Webhook response when the payload was sent
        pub webhook: Option<WebhookResponse>,
    }

    /// Runs one extraction batch with the provided configuration.
    ///
    /// With an empty `asins` the collected list from the store is used. The
    /// batch is bounded by `config.batch_timeout_secs`; when `send` is set the
    /// enhanced payload goes to the configured webhook afterwards.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The store cannot be opened
    /// - There is nothing to extract or the batch fails validation
    /// - The batch does not finish in time
    /// - Sending the payload fails
    pub async fn run_extraction_job(
        config: Config,
        asins: Vec<String>,
        send: bool,
    ) -> Result<ExtractionReport> {
        let store = Store::open(&config.db_path)
            .await
            .context("Failed to open store")?;

        let asins = if asins.is_empty() {
            let collected = store.get_asin_list().await?;
            info!("Using {} collected products", collected.len());
            collected.into_iter().map(|item| item.asin).collect()
        } else {
            asins
        };
        if asins.is_empty() {
            bail!("No products to extract: pass identifiers or collect some first");
        }

        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let host: Arc<dyn PageHost> = Arc::new(HttpPageHost::new(Arc::clone(&client)));
        let bus = NotificationBus::new();
        let orchestrator =
            Orchestrator::new(host, store.clone(), bus.clone(), config.extraction.clone());

        if let Some(port) = config.status_port {
            let status_state = StatusState::new(store.clone());
            tokio::spawn(async move {
                if let Err(e) = start_status_server(port, status_state).await {
                    warn!("Status server error: {}", e);
                }
            });
        }

        let cancel = CancellationToken::new();
        let logging_task = Some(spawn_progress_logger(&bus, cancel.child_token()));

        let start_time = std::time::Instant::now();
        let batch_timeout = Duration::from_secs(config.batch_timeout_secs);
        let outcome = tokio::time::timeout(batch_timeout, orchestrator.run_extraction(&asins)).await;

        shutdown_gracefully(cancel, logging_task).await;

        let run = match outcome {
            Ok(run) => run.context("Extraction batch failed")?,
            Err(_) => {
                mark_timed_out(&store, config.batch_timeout_secs).await;
                bail!(
                    "Extraction batch timed out after {}s",
                    config.batch_timeout_secs
                );
            }
        };

        let webhook = if send {
            let webhook_config = store.get_webhook_config().await?;
            let response = WebhookClient::new(client)
                .send(&store, WebhookMode::Enhanced, &webhook_config)
                .await
                .context("Failed to send payload")?;
            Some(response)
        } else {
            None
        };

        Ok(ExtractionReport {
            total: run.status.total,
            successful: run.status.successful,
            failed: run.status.failed,
            extraction_id: run.report.extraction_id,
            db_path: config.db_path,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            webhook,
        })
    }

    async fn mark_timed_out(store: &Store, timeout_secs: u64) {
        let mut status = match store.get_extraction_status().await {
            Ok(Some(status)) => status,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to read extraction status: {}", e);
                return;
            }
        };
        let message = format!("Timed out after {}s", timeout_secs);
        status.in_progress = false;
        status.current_message = format!("Image extraction failed: {}", message);
        status.error = Some(message);
        status.completed_at = Some(Utc::now());
        if let Err(e) = store.set_extraction_status(&status).await {
            warn!("Failed to store timed-out status: {}", e);
        }
    }
}
