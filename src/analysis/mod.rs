//! Product analysis and report aggregation.
//!
//! Everything here is a pure function of the batch results: per-product
//! scores, a cross-product strategy, content packages and the aggregated
//! report stored after each run. Nothing is cached between runs.

mod content;
mod report;
mod scores;
mod strategy;
mod types;

pub use content::{create_content_packages, ContentPackages};
pub use report::{build_report, generate_extraction_id};
pub use scores::{
    image_quality_score, image_records, image_records_from_results, infer_dimensions,
    lifestyle_score, process_product, process_products, variant_coverage,
};
pub use strategy::{
    average_images, content_gaps, generate_strategy, improvement_list, quality_distribution,
    top_performer,
};
pub use types::{
    AggregatedReport, ImageKind, ImageRecord, ImageStats, LifestyleScore, ProcessedProduct,
    ProcessingStats, ProductAnalysis, ProductImageSet, ProductStrategy, QualityDistribution,
    RawData, ReportAnalysis, ReportSummary, StrategyInsights, StrategyOverview,
    StrategyRecommendations, VariantCoverage,
};
