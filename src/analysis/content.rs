//! Content-ready packages built from the analysed products.
//!
//! Template copy for blogs, social media, listings and marketing assets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::strategy::top_performer;
use super::types::{ProcessedProduct, ProductStrategy};

/// Comparison points for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductComparison {
    /// Product identifier
    pub asin: String,
    /// Comparison lines
    pub comparison_points: Vec<String>,
}

/// Buying guide section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideSection {
    /// Section title
    pub title: String,
    /// Section body
    pub content: String,
}

/// Buying guide across the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyingGuide {
    /// Guide title
    pub title: String,
    /// Sections
    pub sections: Vec<GuideSection>,
}

/// Feature highlights for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureHighlight {
    /// Product identifier
    pub asin: String,
    /// Feature lines
    pub features: Vec<String>,
}

/// Blog content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogContent {
    /// One comparison per product
    pub product_comparisons: Vec<ProductComparison>,
    /// Batch buying guide
    pub buying_guides: BuyingGuide,
    /// One highlight per product
    pub feature_highlights: Vec<FeatureHighlight>,
}

/// Instagram post ideas for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramPost {
    /// Product identifier
    pub asin: String,
    /// Post ideas
    pub post_ideas: Vec<String>,
}

/// Facebook ad for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacebookAd {
    /// Product identifier
    pub asin: String,
    /// Ad copy
    pub ad_copy: String,
    /// Audience suggestion
    pub targeting_suggestions: String,
}

/// Pinterest pin ideas for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinterestPin {
    /// Product identifier
    pub asin: String,
    /// Pin ideas
    pub pin_ideas: Vec<String>,
}

/// Social media content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMedia {
    /// One entry per product
    pub instagram_posts: Vec<InstagramPost>,
    /// Top three products only
    pub facebook_ads: Vec<FacebookAd>,
    /// One entry per product
    pub pinterest_pins: Vec<PinterestPin>,
}

/// Listing title suggestions for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedTitle {
    /// Product identifier
    pub asin: String,
    /// Suggested title
    pub title: String,
    /// Alternatives
    pub variations: Vec<String>,
}

/// Listing bullets for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletPoints {
    /// Product identifier
    pub asin: String,
    /// Bullet lines
    pub bullets: Vec<String>,
}

/// Listing description for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDescription {
    /// Product identifier
    pub asin: String,
    /// Description text
    pub description: String,
}

/// Product listing content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListings {
    /// Titles
    pub optimized_titles: Vec<OptimizedTitle>,
    /// Bullets
    pub bullet_points: Vec<BulletPoints>,
    /// Descriptions
    pub descriptions: Vec<ProductDescription>,
}

/// Email campaign draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailCampaign {
    /// Subject line
    pub subject: String,
    /// Body
    pub content: String,
    /// First three products
    pub product_highlights: Vec<ProcessedProduct>,
}

/// Landing page grid tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridTile {
    /// Product identifier
    pub asin: String,
    /// Image count
    pub image_count: usize,
    /// Quality badge text
    pub quality_badge: String,
}

/// Landing page draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    /// Hero headline
    pub hero_section: String,
    /// One tile per product
    pub product_grid: Vec<GridTile>,
    /// Trust line
    pub trust_indicators: String,
}

/// Ad creative concepts for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdCreative {
    /// Product identifier
    pub asin: String,
    /// Concepts
    pub creative_concepts: Vec<String>,
}

/// Marketing assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingAssets {
    /// Email draft
    pub email_campaigns: EmailCampaign,
    /// Landing page draft
    pub landing_pages: LandingPage,
    /// Top two products only
    pub ad_creatives: Vec<AdCreative>,
}

/// All content packages of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPackages {
    /// Blog content
    pub blog_content: BlogContent,
    /// Social media content
    pub social_media: SocialMedia,
    /// Listing content
    pub product_listings: ProductListings,
    /// Marketing assets
    pub marketing_assets: MarketingAssets,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

struct Facts<'a> {
    asin: &'a str,
    quality: u32,
    total: usize,
    main: usize,
    variants: usize,
    lifestyle: usize,
    lifestyle_score: u32,
}

impl<'a> From<&'a ProcessedProduct> for Facts<'a> {
    fn from(p: &'a ProcessedProduct) -> Self {
        Facts {
            asin: &p.asin,
            quality: p.analysis.image_quality_score,
            total: p.images.total_count,
            main: p.images.main_images.len(),
            variants: p.images.variant_images.len(),
            lifestyle: p.images.lifestyle_images.len(),
            lifestyle_score: p.analysis.lifestyle_score.lifestyle_score,
        }
    }
}

fn blog_content(products: &[ProcessedProduct], strategy: &ProductStrategy) -> BlogContent {
    let dist = &strategy.overview.quality_distribution;
    BlogContent {
        product_comparisons: products
            .iter()
            .map(Facts::from)
            .map(|f| ProductComparison {
                asin: f.asin.to_string(),
                comparison_points: vec![
                    format!("Image quality: {}%", f.quality),
                    format!("Total images: {}", f.total),
                    format!("Lifestyle content: {}%", f.lifestyle_score),
                ],
            })
            .collect(),
        buying_guides: BuyingGuide {
            title: "Complete Buying Guide - Top Product Analysis".to_string(),
            sections: vec![
                GuideSection {
                    title: "Product Overview".to_string(),
                    content: format!(
                        "Analyzed {} products with {} average images per product",
                        products.len(),
                        strategy.overview.avg_images_per_product
                    ),
                },
                GuideSection {
                    title: "Quality Analysis".to_string(),
                    content: format!(
                        "Quality distribution: {} high, {} medium, {} low",
                        dist.high, dist.medium, dist.low
                    ),
                },
            ],
        },
        feature_highlights: products
            .iter()
            .map(Facts::from)
            .map(|f| FeatureHighlight {
                asin: f.asin.to_string(),
                features: vec![
                    format!("{} main product images", f.main),
                    format!("{} variant options", f.variants),
                    format!("{} lifestyle shots", f.lifestyle),
                    format!("{}% image quality score", f.quality),
                ],
            })
            .collect(),
    }
}

fn social_media(products: &[ProcessedProduct]) -> SocialMedia {
    SocialMedia {
        instagram_posts: products
            .iter()
            .map(Facts::from)
            .map(|f| InstagramPost {
                asin: f.asin.to_string(),
                post_ideas: vec![
                    format!("Showcase main product with {} angle variations", f.main),
                    format!(
                        "Lifestyle content featuring {} real-world scenarios",
                        f.lifestyle
                    ),
                    format!("Quality comparison highlighting {}% excellence", f.quality),
                ],
            })
            .collect(),
        facebook_ads: products
            .iter()
            .take(3)
            .map(Facts::from)
            .map(|f| FacebookAd {
                asin: f.asin.to_string(),
                ad_copy: format!(
                    "Discover this amazing product with {} detailed images. Quality score: {}%",
                    f.total, f.quality
                ),
                targeting_suggestions: if f.lifestyle > 0 {
                    "Lifestyle-focused audience".to_string()
                } else {
                    "Product-focused audience".to_string()
                },
            })
            .collect(),
        pinterest_pins: products
            .iter()
            .map(Facts::from)
            .map(|f| PinterestPin {
                asin: f.asin.to_string(),
                pin_ideas: vec![
                    format!("Product showcase - {} views", f.main),
                    format!("Lifestyle inspiration - {} scenarios", f.lifestyle),
                ],
            })
            .collect(),
    }
}

fn product_listings(products: &[ProcessedProduct]) -> ProductListings {
    ProductListings {
        optimized_titles: products
            .iter()
            .map(Facts::from)
            .map(|f| OptimizedTitle {
                asin: f.asin.to_string(),
                title: format!(
                    "Premium Product - {} Images - {}% Quality",
                    f.total, f.quality
                ),
                variations: vec![
                    format!("High-Quality Product with {} Detailed Views", f.total),
                    format!(
                        "Professional Product - {}% Quality Guaranteed",
                        f.quality
                    ),
                ],
            })
            .collect(),
        bullet_points: products
            .iter()
            .map(Facts::from)
            .map(|f| BulletPoints {
                asin: f.asin.to_string(),
                bullets: vec![
                    format!("📸 {} high-quality product images", f.total),
                    format!("⭐ {}% image quality score", f.quality),
                    format!("🎯 {} variant options available", f.variants),
                    format!("🌟 {} lifestyle scenarios shown", f.lifestyle),
                ],
            })
            .collect(),
        descriptions: products
            .iter()
            .map(Facts::from)
            .map(|f| ProductDescription {
                asin: f.asin.to_string(),
                description: format!(
                    "Experience this exceptional product through {} carefully curated images, \
                     achieving {}% quality excellence. With {} variants and {} lifestyle \
                     demonstrations, you'll have complete confidence in your choice.",
                    f.total, f.quality, f.variants, f.lifestyle
                ),
            })
            .collect(),
    }
}

fn marketing_assets(products: &[ProcessedProduct]) -> MarketingAssets {
    let top = top_performer(products);
    let total_images: usize = products.iter().map(|p| p.images.total_count).sum();
    MarketingAssets {
        email_campaigns: EmailCampaign {
            subject: format!("New Product Analysis: {} Products Reviewed", products.len()),
            content: match top {
                Some(p) => format!(
                    "Our latest analysis reveals {} as the top performer with {}% quality score.",
                    p.asin, p.analysis.image_quality_score
                ),
                None => "No products were analyzed.".to_string(),
            },
            product_highlights: products.iter().take(3).cloned().collect(),
        },
        landing_pages: LandingPage {
            hero_section: format!("{} Premium Products Analyzed", products.len()),
            product_grid: products
                .iter()
                .map(|p| GridTile {
                    asin: p.asin.clone(),
                    image_count: p.images.total_count,
                    quality_badge: if p.analysis.image_quality_score >= 80 {
                        "Premium Quality".to_string()
                    } else {
                        "Good Quality".to_string()
                    },
                })
                .collect(),
            trust_indicators: format!("{} total images analyzed", total_images),
        },
        ad_creatives: products
            .iter()
            .take(2)
            .map(Facts::from)
            .map(|f| AdCreative {
                asin: f.asin.to_string(),
                creative_concepts: vec![
                    format!("High-quality showcase: {}% excellence", f.quality),
                    format!("Complete view: {} detailed angles", f.total),
                    format!("Lifestyle integration: {} real scenarios", f.lifestyle),
                ],
            })
            .collect(),
    }
}

/// Builds every content package for a batch.
pub fn create_content_packages(
    products: &[ProcessedProduct],
    strategy: &ProductStrategy,
) -> ContentPackages {
    ContentPackages {
        blog_content: blog_content(products, strategy),
        social_media: social_media(products),
        product_listings: product_listings(products),
        marketing_assets: marketing_assets(products),
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::strategy::generate_strategy;
    use crate::analysis::test_helpers::product;

    #[test]
    fn test_packages_respect_per_channel_limits() {
        let products: Vec<ProcessedProduct> = ["B0AAAAAAAA", "B0BBBBBBBB", "B0CCCCCCCC", "B0DDDDDDDD"]
            .iter()
            .map(|a| product(a, 80, 6, 1))
            .collect();
        let strategy = generate_strategy(&products);
        let packages = create_content_packages(&products, &strategy);

        assert_eq!(packages.blog_content.product_comparisons.len(), 4);
        assert_eq!(packages.social_media.facebook_ads.len(), 3);
        assert_eq!(packages.marketing_assets.ad_creatives.len(), 2);
        assert_eq!(packages.marketing_assets.email_campaigns.product_highlights.len(), 3);
        assert_eq!(
            packages.marketing_assets.landing_pages.trust_indicators,
            "24 total images analyzed"
        );
        assert_eq!(
            packages.social_media.facebook_ads[0].targeting_suggestions,
            "Lifestyle-focused audience"
        );
    }

    #[test]
    fn test_templates_fill_product_facts() {
        let products = vec![product("B0AAAAAAAA", 91, 7, 0)];
        let strategy = generate_strategy(&products);
        let packages = create_content_packages(&products, &strategy);

        assert_eq!(
            packages.product_listings.optimized_titles[0].title,
            "Premium Product - 7 Images - 91% Quality"
        );
        assert_eq!(
            packages.marketing_assets.landing_pages.product_grid[0].quality_badge,
            "Premium Quality"
        );
        assert_eq!(
            packages.marketing_assets.email_campaigns.content,
            "Our latest analysis reveals B0AAAAAAAA as the top performer with 91% quality score."
        );
        assert_eq!(
            packages.blog_content.buying_guides.sections[0].content,
            "Analyzed 1 products with 7 average images per product"
        );
    }
}
