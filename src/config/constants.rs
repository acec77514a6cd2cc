//! Configuration constants.
//!
//! Timing, size limits and wire-level identifiers used throughout the application.

use std::time::Duration;

/// Default SQLite database file
pub const DB_PATH: &str = "./asin_extractor.db";

/// Default User-Agent for product page loads.
///
/// Product pages are fetched the way a desktop browser would request them;
/// users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Per-request HTTP timeout in seconds (page loads and webhook posts)
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Product page bodies above this size are abandoned (8 MiB)
pub const MAX_PAGE_SIZE: usize = 8 * 1024 * 1024;

// Product pages
/// Base URL product pages are opened from; the identifier is appended.
pub const PRODUCT_PAGE_BASE_URL: &str = "https://www.amazon.com/dp/";
/// Storefront used for canonical product links
pub const DEFAULT_AMAZON_DOMAIN: &str = "amazon.com";
/// Storefront domains recognised as Amazon product or search pages.
pub const AMAZON_DOMAINS: [&str; 20] = [
    "amazon.com",
    "amazon.co.uk",
    "amazon.ca",
    "amazon.com.au",
    "amazon.de",
    "amazon.fr",
    "amazon.it",
    "amazon.es",
    "amazon.in",
    "amazon.co.jp",
    "amazon.com.mx",
    "amazon.nl",
    "amazon.sg",
    "amazon.ae",
    "amazon.com.tr",
    "amazon.se",
    "amazon.pl",
    "amazon.sa",
    "amazon.eg",
    "amazon.com.be",
];

// Batch limits
/// Maximum identifiers accepted in one extraction batch
pub const MAX_BATCH_SIZE: usize = 10;
/// Maximum images kept per product
pub const MAX_IMAGES_PER_PRODUCT: usize = 10;
/// Maximum raw `hiRes` matches considered by the script strategy
pub const MAX_SCRIPT_MATCHES: usize = 10;
/// Minimum accepted length of an image URL
pub const MIN_IMAGE_URL_LENGTH: usize = 50;
/// Number of collected items that count as "top" products
pub const TOP_PRODUCT_COUNT: usize = 3;

// Page lifecycle timing
/// Delay before the first readiness poll
pub const PAGE_SETTLE_DELAY: Duration = Duration::from_secs(2);
/// Interval between readiness polls
pub const PAGE_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Hard deadline for a page to reach a terminal state, measured from open
pub const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(20);

// Retry strategy
/// Attempts per identifier (initial attempt included)
pub const MAX_EXTRACTION_ATTEMPTS: u32 = 2;
/// Backoff unit; the delay before attempt `n` is `n` times this value
pub const RETRY_BACKOFF: Duration = Duration::from_secs(3);

// Rate limiting
/// Pause between two identifiers of a batch
pub const REQUEST_DELAY: Duration = Duration::from_secs(2);
/// Pause between two payloads of a webhook batch
pub const WEBHOOK_BATCH_DELAY: Duration = Duration::from_secs(1);
/// Overall wait for a batch started from the CLI, in seconds
pub const BATCH_TIMEOUT_SECS: u64 = 300;

// Payload identity
/// `source` field of webhook payloads and reports
pub const PAYLOAD_SOURCE: &str = "amz-extractor-all";
/// `source` field of the connection test payload
pub const TEST_PAYLOAD_SOURCE: &str = "amz-extractor-all-test";
/// Payload, report and export format version
pub const PAYLOAD_VERSION: &str = "1.0.0";
/// User-Agent of webhook requests
pub const WEBHOOK_USER_AGENT: &str = "AMZ-Extractor-ALL/1.0.0";
/// `message` field of the connection test payload
pub const TEST_CONNECTION_MESSAGE: &str = "Test connection from AMZ Extractor ALL";

// Webhook defaults
/// Webhook URL until one is configured
pub const DEFAULT_WEBHOOK_URL: &str = "https://n8n.azsmarthub.com/webhook/amz-extractor-all";
/// Basic auth username until one is configured
pub const DEFAULT_WEBHOOK_USERNAME: &str = "amzextractor";

/// Default status server port for `serve`
pub const STATUS_SERVER_PORT: u16 = 8787;
