//! Plain-text report.

use std::io::{self, Write};

use chrono::Utc;

use crate::analysis::AggregatedReport;

/// Writes a human-readable summary of `report`.
pub fn write_text<W: Write>(report: &AggregatedReport, mut out: W) -> io::Result<()> {
    writeln!(out, "AMZ Extractor ALL - Extraction Report")?;
    writeln!(out, "Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "Extraction ID: {}", report.extraction_id)?;
    writeln!(out)?;

    let summary = &report.summary;
    writeln!(out, "SUMMARY")?;
    writeln!(out, "=======")?;
    writeln!(out, "Total Products: {}", summary.total_asins)?;
    writeln!(out, "Total Images: {}", summary.total_images)?;
    writeln!(
        out,
        "Average Images per Product: {:.1}",
        summary.avg_images_per_product
    )?;
    writeln!(out)?;

    writeln!(out, "PRODUCT DETAILS")?;
    writeln!(out, "===============")?;
    for (index, product) in report.analysis.processed_products.iter().enumerate() {
        let images = &product.images;
        writeln!(out, "{}. ASIN: {}", index + 1, product.asin)?;
        writeln!(out, "   Total Images: {}", images.total_count)?;
        writeln!(
            out,
            "   Quality Score: {}%",
            product.analysis.image_quality_score
        )?;
        writeln!(
            out,
            "   Main: {}, Variants: {}, Lifestyle: {}",
            images.main_images.len(),
            images.variant_images.len(),
            images.lifestyle_images.len()
        )?;
        writeln!(out)?;
    }
    out.flush()
}
