//! Export format selection.

use clap::ValueEnum;

/// Output format of `results`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Full stored results, pretty-printed (default)
    #[default]
    Json,
    /// One row per processed product (for Excel/Sheets)
    Csv,
    /// Human-readable summary
    Txt,
}

impl ExportFormat {
    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
        }
    }
}
