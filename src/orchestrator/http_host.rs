//! Page host backed by plain HTTP fetches.
//!
//! Each opened page is a background fetch of the product URL. While the
//! fetch runs the page reports `loading`; once the body has arrived it
//! reports `complete` with the received markup. Closing a page aborts a
//! fetch still in flight. No JavaScript runs, so only server-rendered
//! markup is visible to the extractor.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use log::debug;
use reqwest::header::{HeaderName, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::MAX_PAGE_SIZE;
use crate::error_handling::PageError;
use crate::extractor::PageSnapshot;

use super::page_host::{PageHost, PageId};

/// Browser-like headers for product page requests.
fn apply_browser_headers(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    builder
        .header(
            ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        )
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .header(ACCEPT_ENCODING, "gzip, deflate, br")
        .header(HeaderName::from_static("sec-fetch-dest"), "document")
        .header(HeaderName::from_static("sec-fetch-mode"), "navigate")
        .header(HeaderName::from_static("sec-fetch-site"), "none")
        .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
        .header(CACHE_CONTROL, "max-age=0")
}

/// Fetches a page body, refusing bodies above [`MAX_PAGE_SIZE`].
async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, String> {
    let response = apply_browser_headers(client.get(url))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    debug!("Page {} responded {}", url, response.status());

    let mut stream = response.bytes_stream();
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| e.to_string())?;
        if buf.len() + chunk.len() > MAX_PAGE_SIZE {
            return Err(format!(
                "page body exceeds {}KB limit",
                MAX_PAGE_SIZE / 1024
            ));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

enum PageLoad {
    Pending(JoinHandle<Result<String, String>>),
    Loaded(String),
    Failed(String),
}

struct HostedPage {
    url: String,
    load: PageLoad,
}

/// [`PageHost`] that loads pages with a shared `reqwest` client.
pub struct HttpPageHost {
    client: Arc<reqwest::Client>,
    pages: Mutex<HashMap<PageId, HostedPage>>,
    next_id: AtomicU64,
}

impl HttpPageHost {
    /// Creates a host using `client` for every page load.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self {
            client,
            pages: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of pages currently open.
    pub async fn open_pages(&self) -> usize {
        self.pages.lock().await.len()
    }
}

#[async_trait]
impl PageHost for HttpPageHost {
    async fn open(&self, url: &str) -> Result<PageId, PageError> {
        let parsed = url::Url::parse(url).map_err(|e| PageError::OpenFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let id = PageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let client = Arc::clone(&self.client);
        let target = parsed.to_string();
        let handle = tokio::spawn(async move { fetch_page(&client, &target).await });

        self.pages.lock().await.insert(
            id,
            HostedPage {
                url: url.to_string(),
                load: PageLoad::Pending(handle),
            },
        );
        debug!("Opened {} for {}", id, url);
        Ok(id)
    }

    async fn snapshot(&self, id: PageId) -> Result<PageSnapshot, PageError> {
        let mut pages = self.pages.lock().await;
        let page = pages.get_mut(&id).ok_or(PageError::UnknownPage(id.0))?;

        if matches!(&page.load, PageLoad::Pending(handle) if handle.is_finished()) {
            if let PageLoad::Pending(handle) =
                std::mem::replace(&mut page.load, PageLoad::Failed(String::new()))
            {
                page.load = match handle.await {
                    Ok(Ok(html)) => PageLoad::Loaded(html),
                    Ok(Err(reason)) => PageLoad::Failed(reason),
                    Err(join_error) => PageLoad::Failed(join_error.to_string()),
                };
            }
        }

        match &page.load {
            PageLoad::Pending(_) => Ok(PageSnapshot::loading(page.url.as_str())),
            PageLoad::Loaded(html) => Ok(PageSnapshot::complete(page.url.as_str(), html.as_str())),
            PageLoad::Failed(reason) => Err(PageError::SnapshotFailed(format!(
                "{}: {}",
                page.url, reason
            ))),
        }
    }

    async fn close(&self, id: PageId) -> Result<(), PageError> {
        let page = self
            .pages
            .lock()
            .await
            .remove(&id)
            .ok_or(PageError::UnknownPage(id.0))?;
        if let PageLoad::Pending(handle) = page.load {
            handle.abort();
        }
        debug!("Closed {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use std::time::Duration;

    async fn wait_complete(host: &HttpPageHost, id: PageId) -> PageSnapshot {
        for _ in 0..200 {
            let snapshot = host.snapshot(id).await.unwrap();
            if snapshot.ready_state == crate::extractor::ReadyState::Complete {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("page never completed");
    }

    #[tokio::test]
    async fn test_open_snapshot_close() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/dp/B0ABCDEFGH"))
                .respond_with(status_code(200).body("<html><title>Widget</title></html>")),
        );

        let host = HttpPageHost::new(Arc::new(reqwest::Client::new()));
        let url = server.url("/dp/B0ABCDEFGH").to_string();
        let id = host.open(&url).await.unwrap();
        assert_eq!(host.open_pages().await, 1);

        let snapshot = wait_complete(&host, id).await;
        assert_eq!(snapshot.url, url);
        assert!(snapshot.html.contains("Widget"));

        host.close(id).await.unwrap();
        assert_eq!(host.open_pages().await, 0);
        assert!(matches!(
            host.snapshot(id).await,
            Err(PageError::UnknownPage(_))
        ));
    }

    #[tokio::test]
    async fn test_open_rejects_malformed_url() {
        let host = HttpPageHost::new(Arc::new(reqwest::Client::new()));
        assert!(matches!(
            host.open("not a url").await,
            Err(PageError::OpenFailed { .. })
        ));
        assert_eq!(host.open_pages().await, 0);
    }

    #[tokio::test]
    async fn test_close_unknown_page() {
        let host = HttpPageHost::new(Arc::new(reqwest::Client::new()));
        assert!(matches!(
            host.close(PageId(42)).await,
            Err(PageError::UnknownPage(42))
        ));
    }
}
