//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, payload identity)
//! - CLI option types and parsing
//! - Library configuration for the extraction pipeline

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    Cli, Command, Config, ExtractCommand, ExtractionConfig, LogFormat, LogLevel, WebhookArgs,
    WebhookMode,
};
