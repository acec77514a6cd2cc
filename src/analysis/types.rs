//! Analysis data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::ContentPackages;

/// Role of an image within a product's gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// Primary product shot
    Main,
    /// Colour/size variant shot
    Variant,
    /// In-use or lifestyle shot
    Lifestyle,
    /// Any other gallery image
    Gallery,
}

/// One image with the metadata the scorers look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Product the image belongs to
    pub asin: String,
    /// Image URL
    pub url: String,
    /// Image role
    #[serde(rename = "type")]
    pub kind: ImageKind,
    /// Width in pixels, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Height in pixels, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// File size in bytes, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// A product's images grouped by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImageSet {
    /// Main images
    pub main_images: Vec<ImageRecord>,
    /// Variant images
    pub variant_images: Vec<ImageRecord>,
    /// Lifestyle images
    pub lifestyle_images: Vec<ImageRecord>,
    /// All images of the product, whatever their role
    pub total_count: usize,
}

/// Variant coverage of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantCoverage {
    /// Number of variant images
    pub variant_count: usize,
    /// Number of main images
    pub main_count: usize,
    /// `min(variant / max(main, 1) * 100, 100)`
    pub coverage_score: f64,
}

/// Lifestyle content of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleScore {
    /// Number of lifestyle images
    pub lifestyle_count: usize,
    /// Share of lifestyle images, in percent
    pub lifestyle_ratio: f64,
    /// `min(count * 20, 100)`
    pub lifestyle_score: u32,
}

/// Scores of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAnalysis {
    /// Mean per-image quality, 0..=100
    pub image_quality_score: u32,
    /// Variant coverage
    pub variant_coverage: VariantCoverage,
    /// Lifestyle content
    pub lifestyle_score: LifestyleScore,
}

/// A product with grouped images and scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedProduct {
    /// Product identifier
    pub asin: String,
    /// Images grouped by role
    pub images: ProductImageSet,
    /// Scores
    pub analysis: ProductAnalysis,
    /// Analysis time
    pub extracted_at: DateTime<Utc>,
}

/// Counts of products per quality band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityDistribution {
    /// Quality >= 80
    pub high: usize,
    /// 60 <= quality < 80
    pub medium: usize,
    /// Quality < 60
    pub low: usize,
}

/// Batch-level overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOverview {
    /// Number of products analysed
    pub total_products: usize,
    /// Average images per product, one decimal
    pub avg_images_per_product: f64,
    /// Quality bands
    pub quality_distribution: QualityDistribution,
}

/// Cross-product findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInsights {
    /// Product maximising quality plus image count
    pub top_performing_product: Option<ProcessedProduct>,
    /// Per-product shortcomings
    pub improvement_opportunities: Vec<String>,
    /// Product-line shortcomings
    pub content_gaps: Vec<String>,
}

/// Actionable recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecommendations {
    /// Image quality and count
    pub image_optimization: Vec<String>,
    /// Lifestyle content
    pub content_creation: Vec<String>,
    /// Variant coverage
    pub variant_expansion: Vec<String>,
}

/// Strategy summary across a batch of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStrategy {
    /// Overview
    pub overview: StrategyOverview,
    /// Insights
    pub insights: StrategyInsights,
    /// Recommendations
    pub recommendations: StrategyRecommendations,
    /// Generation time
    pub generated_at: DateTime<Utc>,
}

/// Statistics of the raw image set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageStats {
    /// Images across all products
    pub total_images: usize,
    /// Identifiers in the batch
    pub asins_processed: usize,
    /// Time the stats were taken
    pub extracted_at: DateTime<Utc>,
}

/// Raw extraction data section of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    /// Every image of every successful product
    pub images: Vec<ImageRecord>,
    /// Statistics
    pub image_stats: ImageStats,
}

/// Processing statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Products analysed
    pub total_products: usize,
    /// Images analysed
    pub total_images: usize,
    /// Processing time
    pub processed_at: DateTime<Utc>,
}

/// Analysis section of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAnalysis {
    /// Per-product analysis, in batch order
    pub processed_products: Vec<ProcessedProduct>,
    /// Strategy summary
    pub product_strategy: ProductStrategy,
    /// Statistics
    pub processing_stats: ProcessingStats,
}

/// Summary section of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Products in the report
    pub total_asins: usize,
    /// Images in the report
    pub total_images: usize,
    /// Images per product (0 for an empty report)
    pub avg_images_per_product: f64,
    /// Wall time of the extraction
    pub processing_time_ms: u64,
    /// Quality score of each product, in order
    pub quality_scores: Vec<u32>,
}

/// Everything one extraction run produced, recomputed wholesale each run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedReport {
    /// Always `amz-extractor-all`
    pub source: String,
    /// Payload version
    pub version: String,
    /// `ext_{millis}_{random}`
    pub extraction_id: String,
    /// Report time
    pub timestamp: DateTime<Utc>,
    /// Raw image data
    pub raw_data: RawData,
    /// Analysis
    pub analysis: ReportAnalysis,
    /// Content packages
    pub content: ContentPackages,
    /// Summary
    pub summary: ReportSummary,
}
