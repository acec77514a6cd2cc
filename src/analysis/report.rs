//! Aggregated report assembly.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;

use crate::config::{PAYLOAD_SOURCE, PAYLOAD_VERSION};
use crate::extractor::ExtractionResult;

use super::content::create_content_packages;
use super::scores::{image_records_from_results, process_products};
use super::strategy::generate_strategy;
use super::types::{
    AggregatedReport, ImageStats, ProcessingStats, RawData, ReportAnalysis, ReportSummary,
};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates an extraction id of the form `ext_{unix_millis}_{9 base36 chars}`.
pub fn generate_extraction_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("ext_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Builds the aggregated report for one extraction run.
///
/// Every identifier of the batch gets a processed product, including the
/// ones that failed (with zero images). `elapsed` is the wall time of the
/// batch.
pub fn build_report<S: AsRef<str>>(
    results: &[ExtractionResult],
    asins: &[S],
    elapsed: Duration,
) -> AggregatedReport {
    let now = Utc::now();
    let images = image_records_from_results(results);
    let processed_products = process_products(asins, &images);
    let product_strategy = generate_strategy(&processed_products);
    let content = create_content_packages(&processed_products, &product_strategy);

    let total_images = images.len();
    let total_asins = processed_products.len();
    let avg_images_per_product = if total_asins == 0 {
        0.0
    } else {
        total_images as f64 / total_asins as f64
    };
    let quality_scores = processed_products
        .iter()
        .map(|p| p.analysis.image_quality_score)
        .collect();

    AggregatedReport {
        source: PAYLOAD_SOURCE.to_string(),
        version: PAYLOAD_VERSION.to_string(),
        extraction_id: generate_extraction_id(),
        timestamp: now,
        raw_data: RawData {
            images,
            image_stats: ImageStats {
                total_images,
                asins_processed: asins.len(),
                extracted_at: now,
            },
        },
        analysis: ReportAnalysis {
            processing_stats: ProcessingStats {
                total_products: total_asins,
                total_images,
                processed_at: now,
            },
            processed_products,
            product_strategy,
        },
        content,
        summary: ReportSummary {
            total_asins,
            total_images,
            avg_images_per_product,
            processing_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            quality_scores,
        },
    }
}
