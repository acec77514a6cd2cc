//! Export of stored extraction results.
//!
//! JSON carries the full stored results. CSV and plain text are flattened
//! views of the last report, one entry per processed product.

mod csv;
mod text;
mod types;

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::store::ExtractorResults;

pub use csv::write_csv;
pub use text::write_text;
pub use types::ExportFormat;

/// Writes `results` to `writer` in `format`.
///
/// CSV and text need a finished report; JSON is written even when there is
/// none yet.
pub fn export_results<W: Write>(
    results: &ExtractorResults,
    format: ExportFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, results)
                .context("Failed to write JSON results")?;
            writeln!(writer)?;
            writer.flush()?;
        }
        ExportFormat::Csv | ExportFormat::Txt => {
            let report = results
                .report
                .as_ref()
                .context("No extraction report stored; run an extraction first")?;
            if format == ExportFormat::Csv {
                write_csv(report, writer)?;
            } else {
                write_text(report, writer).context("Failed to write text report")?;
            }
        }
    }
    Ok(())
}

/// Default file name for an export of `results`.
///
/// Named after the report's extraction id, or the current time when there is
/// no report.
pub fn export_file_name(results: &ExtractorResults, format: ExportFormat) -> String {
    let id = results
        .report
        .as_ref()
        .map(|r| r.extraction_id.clone())
        .unwrap_or_else(|| Utc::now().timestamp_millis().to_string());
    format!("amz-extraction-{}.{}", id, format.extension())
}
