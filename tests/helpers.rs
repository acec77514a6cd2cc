// Shared test helpers: a scripted page host and store setup.
//
// Each identifier gets one script per attempt; every snapshot call on a page
// returns the next snapshot of its script, repeating the last one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use asin_extractor::error_handling::PageError;
use asin_extractor::extractor::PageSnapshot;
use asin_extractor::orchestrator::{PageHost, PageId};
use asin_extractor::Store;

pub const BASE_URL: &str = "https://www.amazon.com/dp/";

/// Full-size image URL number `i`.
#[allow(dead_code)]
pub fn hi_res(i: usize) -> String {
    format!("https://m.media-amazon.com/images/I/71image{i:02}abcdefgh._AC_SL1500_.jpg")
}

/// Loaded product page carrying `count` gallery images in its script data.
#[allow(dead_code)]
pub fn product_page(asin: &str, count: usize) -> PageSnapshot {
    let entries: Vec<String> = (0..count)
        .map(|i| format!("{{\"hiRes\": \"{}\", \"thumb\": null}}", hi_res(i)))
        .collect();
    let html = format!(
        "<html><head><title>Amazon.com: Product {asin}</title></head><body>\
         <span id=\"productTitle\">Product {asin}</span>\
         <script>var data = {{'colorImages': {{'initial': [{}]}}}};</script>\
         </body></html>",
        entries.join(",")
    );
    PageSnapshot::complete(format!("{BASE_URL}{asin}"), html)
}

/// Loaded product page without any image.
#[allow(dead_code)]
pub fn imageless_page(asin: &str) -> PageSnapshot {
    product_page(asin, 0)
}

/// CAPTCHA challenge page.
#[allow(dead_code)]
pub fn captcha_page(asin: &str) -> PageSnapshot {
    PageSnapshot::complete(
        format!("{BASE_URL}{asin}"),
        "<html><head><title>Robot Check</title></head><body>\
         <form action=\"/errors/validateCaptcha\"><input name=\"cvf_captcha_input\"></form>\
         </body></html>",
    )
}

/// Page that never leaves the loading state.
#[allow(dead_code)]
pub fn loading_page(asin: &str) -> PageSnapshot {
    PageSnapshot::loading(format!("{BASE_URL}{asin}"))
}

struct OpenPage {
    asin: String,
    attempt: usize,
    polls: usize,
}

/// Page host answering from per-identifier scripts.
#[derive(Default)]
pub struct ScriptedHost {
    scripts: HashMap<String, Vec<Vec<PageSnapshot>>>,
    pages: Mutex<HashMap<u64, OpenPage>>,
    open_log: Mutex<Vec<String>>,
    next_id: AtomicU64,
    opens: AtomicUsize,
    closes: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every attempt for `asin` shows `snapshots` in order.
    pub fn with_page(self, asin: &str, snapshots: Vec<PageSnapshot>) -> Self {
        self.with_attempts(asin, vec![snapshots])
    }

    /// Attempt `n` for `asin` uses `attempts[n]`, the last one repeating.
    pub fn with_attempts(mut self, asin: &str, attempts: Vec<Vec<PageSnapshot>>) -> Self {
        self.scripts.insert(asin.to_string(), attempts);
        self
    }

    /// Pages opened so far.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Pages closed so far.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Pages currently open.
    pub fn open_pages(&self) -> usize {
        self.pages.lock().unwrap().len()
    }

    /// Identifiers in the order their pages were opened.
    pub fn open_log(&self) -> Vec<String> {
        self.open_log.lock().unwrap().clone()
    }

    /// Pages opened for `asin`.
    pub fn attempts_for(&self, asin: &str) -> usize {
        self.open_log
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.as_str() == asin)
            .count()
    }
}

#[async_trait]
impl PageHost for ScriptedHost {
    async fn open(&self, url: &str) -> Result<PageId, PageError> {
        let asin = url.trim_start_matches(BASE_URL).to_string();
        if !self.scripts.contains_key(&asin) {
            return Err(PageError::OpenFailed {
                url: url.to_string(),
                reason: "no script".to_string(),
            });
        }
        let attempt = self.attempts_for(&asin);
        self.open_log.lock().unwrap().push(asin.clone());
        self.opens.fetch_add(1, Ordering::SeqCst);

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.pages.lock().unwrap().insert(
            id,
            OpenPage {
                asin,
                attempt,
                polls: 0,
            },
        );
        Ok(PageId(id))
    }

    async fn snapshot(&self, id: PageId) -> Result<PageSnapshot, PageError> {
        let mut pages = self.pages.lock().unwrap();
        let page = pages.get_mut(&id.0).ok_or(PageError::UnknownPage(id.0))?;
        let attempts = &self.scripts[&page.asin];
        let script = &attempts[page.attempt.min(attempts.len() - 1)];
        let snapshot = script[page.polls.min(script.len() - 1)].clone();
        page.polls += 1;
        Ok(snapshot)
    }

    async fn close(&self, id: PageId) -> Result<(), PageError> {
        self.pages
            .lock()
            .unwrap()
            .remove(&id.0)
            .ok_or(PageError::UnknownPage(id.0))?;
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Opens a store in a fresh temporary directory.
///
/// The directory must outlive the store.
#[allow(dead_code)]
pub async fn create_temp_store() -> (Store, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = Store::open(&dir.path().join("test.db"))
        .await
        .expect("Failed to open store");
    (store, dir)
}
