//! CSV export: one row per processed product.

use std::io::Write;

use anyhow::{Context, Result};
use csv::Writer;

use crate::analysis::AggregatedReport;

const HEADERS: [&str; 8] = [
    "ASIN",
    "Total Images",
    "Main Images",
    "Variant Images",
    "Lifestyle Images",
    "Quality Score",
    "Variant Coverage",
    "Lifestyle Score",
];

/// Writes the processed products of `report` as CSV.
///
/// Returns the number of product rows written.
pub fn write_csv<W: Write>(report: &AggregatedReport, output: W) -> Result<usize> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(HEADERS)?;

    let products = &report.analysis.processed_products;
    for product in products {
        writer.write_record([
            product.asin.clone(),
            product.images.total_count.to_string(),
            product.images.main_images.len().to_string(),
            product.images.variant_images.len().to_string(),
            product.images.lifestyle_images.len().to_string(),
            product.analysis.image_quality_score.to_string(),
            format!("{:.1}", product.analysis.variant_coverage.coverage_score),
            product.analysis.lifestyle_score.lifestyle_score.to_string(),
        ])?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(products.len())
}
