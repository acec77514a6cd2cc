//! Scoped ownership of an open page.

use std::sync::Arc;

use log::{debug, warn};

use crate::error_handling::PageError;
use crate::extractor::PageSnapshot;

use super::page_host::{PageHost, PageId};

/// Owns one open page and guarantees it is closed.
///
/// [`PageGuard::close`] is the normal path. If the guard is dropped instead
/// (an early return, a cancelled future, a timeout), the close is spawned on
/// the runtime the guard was created on.
pub struct PageGuard {
    host: Arc<dyn PageHost>,
    id: Option<PageId>,
    url: String,
    runtime_handle: tokio::runtime::Handle,
}

impl PageGuard {
    /// Opens `url` on `host`.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn open(host: Arc<dyn PageHost>, url: &str) -> Result<Self, PageError> {
        let id = host.open(url).await?;
        Ok(Self {
            host,
            id: Some(id),
            url: url.to_string(),
            runtime_handle: tokio::runtime::Handle::current(),
        })
    }

    /// URL the page was opened at.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current state of the page.
    pub async fn snapshot(&self) -> Result<PageSnapshot, PageError> {
        match self.id {
            Some(id) => self.host.snapshot(id).await,
            None => Err(PageError::SnapshotFailed(format!(
                "page for {} already closed",
                self.url
            ))),
        }
    }

    /// Closes the page, consuming the guard. Close failures are logged.
    pub async fn close(mut self) {
        if let Some(id) = self.id.take() {
            match self.host.close(id).await {
                Ok(()) => debug!("Closed {} for {}", id, self.url),
                Err(e) => warn!("Failed to close {} for {}: {}", id, self.url, e),
            }
        }
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            let host = Arc::clone(&self.host);
            let url = std::mem::take(&mut self.url);
            self.runtime_handle.spawn(async move {
                match host.close(id).await {
                    Ok(()) => debug!("Closed {} for {} on drop", id, url),
                    Err(e) => warn!("Drop cleanup failed for {} ({}): {}", url, id, e),
                }
            });
        }
    }
}
