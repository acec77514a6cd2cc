//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::constants::{
    BATCH_TIMEOUT_SECS, DB_PATH, DEFAULT_USER_AGENT, HTTP_TIMEOUT_SECS, MAX_BATCH_SIZE,
    MAX_EXTRACTION_ATTEMPTS, PAGE_LOAD_TIMEOUT, PAGE_POLL_INTERVAL, PAGE_SETTLE_DELAY,
    PRODUCT_PAGE_BASE_URL, REQUEST_DELAY, RETRY_BACKOFF, STATUS_SERVER_PORT,
};
use crate::export::ExportFormat;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Webhook payload mode.
///
/// `Basic` ships only the collected identifiers and keywords; `Enhanced` adds
/// the extracted images, per-product analysis and content packages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookMode {
    /// Identifiers and keywords only
    Basic,
    /// Identifiers, keywords and extraction data (default)
    #[default]
    Enhanced,
}

impl WebhookMode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookMode::Basic => "basic",
            WebhookMode::Enhanced => "enhanced",
        }
    }
}

/// Timing and limits of the page-based extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Base URL the identifier is appended to when opening a product page
    pub product_base_url: String,
    /// Delay before the first readiness poll
    pub settle_delay: Duration,
    /// Interval between readiness polls
    pub poll_interval: Duration,
    /// Hard deadline for a page to reach a terminal state
    pub page_timeout: Duration,
    /// Attempts per identifier, initial attempt included
    pub max_attempts: u32,
    /// Backoff unit between attempts
    pub retry_backoff: Duration,
    /// Pause between two identifiers
    pub request_delay: Duration,
    /// Maximum identifiers per batch
    pub max_batch_size: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            product_base_url: PRODUCT_PAGE_BASE_URL.to_string(),
            settle_delay: PAGE_SETTLE_DELAY,
            poll_interval: PAGE_POLL_INTERVAL,
            page_timeout: PAGE_LOAD_TIMEOUT,
            max_attempts: MAX_EXTRACTION_ATTEMPTS,
            retry_backoff: RETRY_BACKOFF,
            request_delay: REQUEST_DELAY,
            max_batch_size: MAX_BATCH_SIZE,
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use asin_extractor::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("products.db"),
///     timeout_seconds: 15,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value for product page loads
    pub user_agent: String,

    /// Overall wait for one extraction batch, in seconds
    pub batch_timeout_secs: u64,

    /// HTTP status server port (optional, disabled by default)
    pub status_port: Option<u16>,

    /// Page lifecycle timing and limits
    pub extraction: ExtractionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            timeout_seconds: HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            batch_timeout_secs: BATCH_TIMEOUT_SECS,
            status_port: None,
            extraction: ExtractionConfig::default(),
        }
    }
}

/// Command-line interface.
///
/// # Examples
///
/// ```bash
/// # Collect products from a saved search results page
/// asin_extractor collect search.html
///
/// # Extract images for two identifiers and watch progress on :8787
/// asin_extractor --status-port 8787 extract B0ABCDEFGH B012345678
///
/// # Ship everything to the configured webhook
/// asin_extractor send --mode enhanced
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "asin_extractor",
    about = "Collects Amazon product identifiers, extracts product images and forwards them to a webhook."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, global = true, value_parser, env = "ASIN_EXTRACTOR_DB_PATH", default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value for product page loads
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Serve extraction status on this port while the command runs
    #[arg(long, global = true)]
    pub status_port: Option<u16>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add identifiers to the collected list (comma or newline separated)
    Add {
        /// Identifiers, e.g. `B0ABCDEFGH,B012345678`
        #[arg(required = true)]
        input: Vec<String>,
    },
    /// Remove an identifier from the collected list
    Remove {
        /// Identifier to remove
        asin: String,
    },
    /// Print the collected list (top products first)
    List,
    /// Collect products from a saved search results or product page
    Collect {
        /// HTML file to scan
        #[arg(value_parser)]
        file: PathBuf,
        /// URL the page was saved from; product URLs select detail-page reading
        #[arg(long)]
        url: Option<String>,
    },
    /// Show or set the search keywords sent with the payload
    Keywords {
        /// New keywords; omitted prints the current value
        value: Option<String>,
    },
    /// Extract images for identifiers (defaults to the collected list)
    Extract(ExtractCommand),
    /// Print the current extraction status
    Status,
    /// Print or export the stored extraction results
    Results {
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Send the payload to the configured webhook
    Send {
        /// Payload mode (defaults to the configured mode)
        #[arg(long, value_enum)]
        mode: Option<WebhookMode>,
        /// Print the payload and its validation instead of sending it
        #[arg(long)]
        preview: bool,
    },
    /// Send a test payload to a webhook
    TestWebhook(WebhookArgs),
    /// Store webhook settings (unset fields keep their defaults)
    ConfigureWebhook(WebhookArgs),
    /// Write all stored data to a JSON file
    Export {
        /// Destination file
        #[arg(value_parser)]
        output: PathBuf,
    },
    /// Load stored data from a JSON export
    Import {
        /// Export file
        #[arg(value_parser)]
        input: PathBuf,
    },
    /// Clear stored data
    Clear {
        /// Only clear extraction results and status
        #[arg(long)]
        extraction_only: bool,
    },
    /// Print storage usage statistics
    Usage,
    /// Serve `/status` and `/results` until interrupted
    Serve {
        /// Port to bind on 127.0.0.1
        #[arg(long, default_value_t = STATUS_SERVER_PORT)]
        port: u16,
    },
}

/// Arguments of the `extract` subcommand.
#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Identifiers to extract; the collected list is used when omitted
    pub asins: Vec<String>,

    /// Give up waiting for the batch after this many seconds
    #[arg(long, default_value_t = BATCH_TIMEOUT_SECS)]
    pub batch_timeout_secs: u64,

    /// Send the enhanced payload once extraction finishes
    #[arg(long)]
    pub send: bool,
}

/// Webhook overrides shared by `test-webhook` and `configure-webhook`.
#[derive(Debug, Args)]
pub struct WebhookArgs {
    /// Webhook URL (http or https)
    #[arg(long)]
    pub url: Option<String>,

    /// Basic Auth username
    #[arg(long)]
    pub username: Option<String>,

    /// Basic Auth password
    #[arg(long, env = "WEBHOOK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Payload mode
    #[arg(long, value_enum)]
    pub mode: Option<WebhookMode>,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        let batch_timeout_secs = match &cli.command {
            Command::Extract(cmd) => cmd.batch_timeout_secs,
            _ => BATCH_TIMEOUT_SECS,
        };
        Self {
            log_level: cli.log_level.clone(),
            log_format: cli.log_format.clone(),
            db_path: cli.db_path.clone(),
            timeout_seconds: cli.timeout_seconds,
            user_agent: cli.user_agent.clone(),
            batch_timeout_secs,
            status_port: cli.status_port,
            extraction: ExtractionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_webhook_mode_wire_names() {
        assert_eq!(WebhookMode::Basic.as_str(), "basic");
        assert_eq!(WebhookMode::Enhanced.as_str(), "enhanced");
        assert_eq!(
            serde_json::to_string(&WebhookMode::Enhanced).unwrap(),
            "\"enhanced\""
        );
        let parsed: WebhookMode = serde_json::from_str("\"basic\"").unwrap();
        assert_eq!(parsed, WebhookMode::Basic);
        assert_eq!(WebhookMode::default(), WebhookMode::Enhanced);
    }

    #[test]
    fn test_extraction_config_default() {
        let config = ExtractionConfig::default();
        assert_eq!(config.settle_delay, Duration::from_secs(2));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.page_timeout, Duration::from_secs(20));
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.retry_backoff, Duration::from_secs(3));
        assert_eq!(config.request_delay, Duration::from_secs(2));
        assert_eq!(config.max_batch_size, 10);
        assert_eq!(config.product_base_url, "https://www.amazon.com/dp/");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.batch_timeout_secs, 300);
        assert!(config.status_port.is_none());
        assert_eq!(config.db_path, PathBuf::from("./asin_extractor.db"));
    }

    #[test]
    fn test_config_from_cli_extract() {
        let cli = Cli::try_parse_from([
            "asin_extractor",
            "--db-path",
            "custom.db",
            "extract",
            "B0ABCDEFGH",
            "--batch-timeout-secs",
            "60",
        ])
        .expect("Should parse extract command");
        let config = Config::from(&cli);
        assert_eq!(config.db_path, PathBuf::from("custom.db"));
        assert_eq!(config.batch_timeout_secs, 60);
    }
}
