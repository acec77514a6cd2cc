//! Logger setup for the CLI and the status server.

use std::io::Write;

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter};
use serde_json::json;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies that are chatty at the requested level.
const QUIET_MODULES: [(&str, LevelFilter); 6] = [
    ("html5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("axum", LevelFilter::Warn),
    ("sqlx", LevelFilter::Info),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
];

fn level_tag(level: Level) -> ColoredString {
    let tag = format!("{:<5}", level);
    match level {
        Level::Error => tag.red().bold(),
        Level::Warn => tag.yellow(),
        Level::Info => tag.green(),
        Level::Debug => tag.blue(),
        Level::Trace => tag.dimmed(),
    }
}

/// Installs the global logger.
///
/// `RUST_LOG` is read first so per-module directives such as
/// `RUST_LOG=asin_extractor::orchestrator=trace` still apply; `level` then
/// sets the floor for everything else. Plain output is one colored line per
/// record, JSON output one object per line with `ts` in unix milliseconds.
///
/// Fails with [`InitializationError::LoggerError`] when a logger is already
/// installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, filter) in QUIET_MODULES {
        builder.filter_module(module, filter.min(level));
    }
    builder.filter_module("asin_extractor", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let line = json!({
                    "ts": chrono::Utc::now().timestamp_millis(),
                    "level": record.level().as_str(),
                    "target": record.target(),
                    "msg": record.args().to_string(),
                });
                writeln!(buf, "{}", line)
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} {} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                    level_tag(record.level()),
                    record.target().cyan(),
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_tag_is_padded() {
        assert_eq!(&*level_tag(Level::Info), "INFO ");
        assert_eq!(&*level_tag(Level::Error), "ERROR");
    }

    #[test]
    fn test_init_logger_only_once() {
        // env_logger can only be installed once per process
        let first = init_logger_with(LevelFilter::Info, LogFormat::Json);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Plain);
        if first.is_ok() {
            assert!(matches!(second, Err(InitializationError::LoggerError(_))));
        } else {
            assert!(second.is_err());
        }
    }
}
