//! Cross-product strategy summary.

use chrono::Utc;

use super::types::{
    ProcessedProduct, ProductStrategy, QualityDistribution, StrategyInsights, StrategyOverview,
    StrategyRecommendations,
};

fn quality(p: &ProcessedProduct) -> u32 {
    p.analysis.image_quality_score
}

/// Average images per product, rounded to one decimal; 0 for no products.
pub fn average_images(products: &[ProcessedProduct]) -> f64 {
    if products.is_empty() {
        return 0.0;
    }
    let total: usize = products.iter().map(|p| p.images.total_count).sum();
    (total as f64 / products.len() as f64 * 10.0).round() / 10.0
}

/// Counts products per quality band.
pub fn quality_distribution(products: &[ProcessedProduct]) -> QualityDistribution {
    products
        .iter()
        .fold(QualityDistribution::default(), |mut dist, p| {
            match quality(p) {
                q if q >= 80 => dist.high += 1,
                q if q >= 60 => dist.medium += 1,
                _ => dist.low += 1,
            }
            dist
        })
}

/// Product with the highest quality score plus image count; the first wins ties.
pub fn top_performer(products: &[ProcessedProduct]) -> Option<&ProcessedProduct> {
    let score = |p: &ProcessedProduct| quality(p) as usize + p.images.total_count;
    products.iter().fold(None, |best, current| match best {
        Some(b) if score(current) <= score(b) => Some(b),
        _ => Some(current),
    })
}

/// Per-product shortcomings: low quality, too few images, little lifestyle content.
pub fn improvement_list(products: &[ProcessedProduct]) -> Vec<String> {
    let mut improvements = Vec::new();
    for p in products {
        if quality(p) < 70 {
            improvements.push(format!("{}: Low image quality ({}%)", p.asin, quality(p)));
        }
        if p.images.total_count < 5 {
            improvements.push(format!(
                "{}: Insufficient images ({})",
                p.asin, p.images.total_count
            ));
        }
        if p.analysis.lifestyle_score.lifestyle_score < 40 {
            improvements.push(format!("{}: Needs more lifestyle content", p.asin));
        }
    }
    improvements
}

/// Shortcomings across the whole product line.
pub fn content_gaps(products: &[ProcessedProduct]) -> Vec<String> {
    let mut gaps = Vec::new();
    let total_lifestyle: usize = products
        .iter()
        .map(|p| p.images.lifestyle_images.len())
        .sum();
    if total_lifestyle < products.len() * 2 {
        gaps.push("Insufficient lifestyle imagery across product line".to_string());
    }
    let low_quality = products.iter().filter(|p| quality(p) < 60).count();
    if low_quality > 0 {
        gaps.push(format!(
            "{} products need image quality improvement",
            low_quality
        ));
    }
    gaps
}

fn image_recommendations(products: &[ProcessedProduct]) -> Vec<String> {
    let mut recs = Vec::new();
    for p in products {
        if quality(p) < 70 {
            recs.push(format!(
                "{}: Improve image quality - current score {}%",
                p.asin,
                quality(p)
            ));
        }
        if p.images.total_count < 7 {
            recs.push(format!(
                "{}: Add more images - current count {}",
                p.asin, p.images.total_count
            ));
        }
    }
    recs
}

fn content_recommendations(products: &[ProcessedProduct]) -> Vec<String> {
    let low = products
        .iter()
        .filter(|p| p.analysis.lifestyle_score.lifestyle_score < 40)
        .count();
    if low > 0 {
        vec![format!("Add lifestyle imagery for {} products", low)]
    } else {
        Vec::new()
    }
}

fn variant_recommendations(products: &[ProcessedProduct]) -> Vec<String> {
    products
        .iter()
        .filter(|p| p.images.variant_images.len() < 3)
        .map(|p| {
            format!(
                "{}: Expand variant coverage - current {} variants",
                p.asin,
                p.images.variant_images.len()
            )
        })
        .collect()
}

/// Builds the strategy summary for a batch.
pub fn generate_strategy(products: &[ProcessedProduct]) -> ProductStrategy {
    ProductStrategy {
        overview: StrategyOverview {
            total_products: products.len(),
            avg_images_per_product: average_images(products),
            quality_distribution: quality_distribution(products),
        },
        insights: StrategyInsights {
            top_performing_product: top_performer(products).cloned(),
            improvement_opportunities: improvement_list(products),
            content_gaps: content_gaps(products),
        },
        recommendations: StrategyRecommendations {
            image_optimization: image_recommendations(products),
            content_creation: content_recommendations(products),
            variant_expansion: variant_recommendations(products),
        },
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_helpers::product;

    #[test]
    fn test_top_performer_and_improvements() {
        let strong = product("B0AAAAAAAA", 90, 8, 3);
        let weak = product("B0BBBBBBBB", 50, 3, 0);
        let products = vec![strong, weak];

        assert_eq!(top_performer(&products).map(|p| p.asin.as_str()), Some("B0AAAAAAAA"));

        let improvements = improvement_list(&products);
        assert!(!improvements.is_empty());
        assert!(improvements.iter().all(|i| i.starts_with("B0BBBBBBBB")));
        assert!(improvements.contains(&"B0BBBBBBBB: Low image quality (50%)".to_string()));
        assert!(improvements.contains(&"B0BBBBBBBB: Insufficient images (3)".to_string()));
    }

    #[test]
    fn test_top_performer_tie_keeps_first() {
        let products = vec![
            product("B0AAAAAAAA", 70, 5, 0),
            product("B0BBBBBBBB", 74, 1, 0),
        ];
        assert_eq!(top_performer(&products).map(|p| p.asin.as_str()), Some("B0AAAAAAAA"));
        assert!(top_performer(&[]).is_none());
    }

    #[test]
    fn test_overview_numbers() {
        let products = vec![
            product("B0AAAAAAAA", 85, 8, 0),
            product("B0BBBBBBBB", 65, 3, 0),
            product("B0CCCCCCCC", 40, 0, 0),
        ];
        assert_eq!(average_images(&products), 3.7);
        assert_eq!(
            quality_distribution(&products),
            QualityDistribution {
                high: 1,
                medium: 1,
                low: 1
            }
        );
        assert_eq!(average_images(&[]), 0.0);
    }

    #[test]
    fn test_content_gaps() {
        let products = vec![product("B0AAAAAAAA", 55, 4, 1), product("B0BBBBBBBB", 90, 4, 0)];
        let gaps = content_gaps(&products);
        assert_eq!(
            gaps,
            vec![
                "Insufficient lifestyle imagery across product line".to_string(),
                "1 products need image quality improvement".to_string(),
            ]
        );
        assert!(content_gaps(&[product("B0AAAAAAAA", 90, 4, 2)]).is_empty());
    }

    #[test]
    fn test_recommendations() {
        let strategy = generate_strategy(&[product("B0AAAAAAAA", 65, 4, 0)]);
        assert_eq!(
            strategy.recommendations.image_optimization,
            vec![
                "B0AAAAAAAA: Improve image quality - current score 65%".to_string(),
                "B0AAAAAAAA: Add more images - current count 4".to_string(),
            ]
        );
        assert_eq!(
            strategy.recommendations.content_creation,
            vec!["Add lifestyle imagery for 1 products".to_string()]
        );
        assert_eq!(strategy.recommendations.variant_expansion.len(), 1);
    }
}
