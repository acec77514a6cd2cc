//! Per-product scoring.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use crate::extractor::{ExtractionResult, ProductImages};

use super::types::{
    ImageKind, ImageRecord, LifestyleScore, ProcessedProduct, ProductAnalysis, ProductImageSet,
    VariantCoverage,
};

static SIZE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_(?:AC_)?(?:SL|UL|SS|SX|SY)(\d{2,5})_").expect("size token regex is valid")
});

const BASE_IMAGE_SCORE: u32 = 50;

/// Estimates image dimensions from an Amazon size token (`_SL1500_`, `_SX679_`, ...).
///
/// The token bounds the longest side, so the estimate is a square.
pub fn infer_dimensions(url: &str) -> Option<(u32, u32)> {
    let side: u32 = SIZE_TOKEN_RE
        .captures(url)?
        .get(1)?
        .as_str()
        .parse()
        .ok()?;
    Some((side, side))
}

/// Turns one product's images into records: the first is `main`, the rest `gallery`.
pub fn image_records(product: &ProductImages) -> Vec<ImageRecord> {
    product
        .images
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let dims = infer_dimensions(url);
            ImageRecord {
                asin: product.asin.clone(),
                url: url.clone(),
                kind: if i == 0 {
                    ImageKind::Main
                } else {
                    ImageKind::Gallery
                },
                width: dims.map(|d| d.0),
                height: dims.map(|d| d.1),
                file_size: None,
            }
        })
        .collect()
}

/// Image records for every successful result, in batch order.
pub fn image_records_from_results(results: &[ExtractionResult]) -> Vec<ImageRecord> {
    results
        .iter()
        .filter_map(|r| match r {
            ExtractionResult::Success(p) => Some(image_records(p)),
            ExtractionResult::Error(_) => None,
        })
        .flatten()
        .collect()
}

fn score_image(image: &ImageRecord) -> u32 {
    let mut score = BASE_IMAGE_SCORE;
    if let (Some(w), Some(h)) = (image.width, image.height) {
        let pixels = u64::from(w) * u64::from(h);
        if pixels > 1_000_000 {
            score += 20;
        } else if pixels > 500_000 {
            score += 10;
        }
    }
    if let Some(size) = image.file_size {
        if size > 100_000 && size < 5_000_000 {
            score += 15;
        }
    }
    if image.kind == ImageKind::Main {
        score += 15;
    }
    score.min(100)
}

/// Mean per-image quality, rounded; 0 for no images.
pub fn image_quality_score(images: &[ImageRecord]) -> u32 {
    if images.is_empty() {
        return 0;
    }
    let total: u32 = images.iter().map(score_image).sum();
    (f64::from(total) / images.len() as f64).round() as u32
}

fn count_kind(images: &[ImageRecord], kind: ImageKind) -> usize {
    images.iter().filter(|i| i.kind == kind).count()
}

/// Ratio of variant to main images, as a capped percentage.
pub fn variant_coverage(images: &[ImageRecord]) -> VariantCoverage {
    let variant_count = count_kind(images, ImageKind::Variant);
    let main_count = count_kind(images, ImageKind::Main);
    let coverage_score = (variant_count as f64 / main_count.max(1) as f64 * 100.0).min(100.0);
    VariantCoverage {
        variant_count,
        main_count,
        coverage_score,
    }
}

/// Lifestyle image count, share and capped score.
pub fn lifestyle_score(images: &[ImageRecord]) -> LifestyleScore {
    let lifestyle_count = count_kind(images, ImageKind::Lifestyle);
    let lifestyle_ratio = if images.is_empty() {
        0.0
    } else {
        lifestyle_count as f64 / images.len() as f64 * 100.0
    };
    LifestyleScore {
        lifestyle_count,
        lifestyle_ratio,
        lifestyle_score: (lifestyle_count as u32).saturating_mul(20).min(100),
    }
}

/// Groups and scores the images belonging to `asin`.
pub fn process_product(asin: &str, all_images: &[ImageRecord]) -> ProcessedProduct {
    let images: Vec<ImageRecord> = all_images
        .iter()
        .filter(|i| i.asin == asin)
        .cloned()
        .collect();
    let by_kind = |kind: ImageKind| -> Vec<ImageRecord> {
        images.iter().filter(|i| i.kind == kind).cloned().collect()
    };

    ProcessedProduct {
        asin: asin.to_string(),
        images: ProductImageSet {
            main_images: by_kind(ImageKind::Main),
            variant_images: by_kind(ImageKind::Variant),
            lifestyle_images: by_kind(ImageKind::Lifestyle),
            total_count: images.len(),
        },
        analysis: ProductAnalysis {
            image_quality_score: image_quality_score(&images),
            variant_coverage: variant_coverage(&images),
            lifestyle_score: lifestyle_score(&images),
        },
        extracted_at: Utc::now(),
    }
}

/// Processes every identifier of a batch, in order.
pub fn process_products<S: AsRef<str>>(asins: &[S], images: &[ImageRecord]) -> Vec<ProcessedProduct> {
    asins
        .iter()
        .map(|a| process_product(a.as_ref(), images))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(kind: ImageKind, dims: Option<(u32, u32)>, file_size: Option<u64>) -> ImageRecord {
        ImageRecord {
            asin: "B0ABCDEFGH".into(),
            url: "https://m.media-amazon.com/images/I/71abc._AC_SL1500_.jpg".into(),
            kind,
            width: dims.map(|d| d.0),
            height: dims.map(|d| d.1),
            file_size,
        }
    }

    #[test]
    fn test_quality_empty_is_zero() {
        assert_eq!(image_quality_score(&[]), 0);
    }

    #[test]
    fn test_quality_factors() {
        assert_eq!(image_quality_score(&[record(ImageKind::Gallery, None, None)]), 50);
        assert_eq!(
            image_quality_score(&[record(ImageKind::Gallery, Some((800, 800)), None)]),
            60
        );
        assert_eq!(
            image_quality_score(&[record(ImageKind::Main, Some((1500, 1500)), Some(200_000))]),
            100
        );
        // (50 + 65) / 2 = 57.5 rounds up
        assert_eq!(
            image_quality_score(&[
                record(ImageKind::Gallery, None, None),
                record(ImageKind::Main, None, None),
            ]),
            58
        );
    }

    #[test]
    fn test_variant_coverage_caps() {
        let images = vec![
            record(ImageKind::Variant, None, None),
            record(ImageKind::Variant, None, None),
            record(ImageKind::Main, None, None),
        ];
        let coverage = variant_coverage(&images);
        assert_eq!(coverage.variant_count, 2);
        assert_eq!(coverage.main_count, 1);
        assert_eq!(coverage.coverage_score, 100.0);

        let none = variant_coverage(&[record(ImageKind::Main, None, None)]);
        assert_eq!(none.coverage_score, 0.0);
    }

    #[test]
    fn test_lifestyle_score() {
        let images: Vec<ImageRecord> = (0..6)
            .map(|_| record(ImageKind::Lifestyle, None, None))
            .chain(std::iter::once(record(ImageKind::Main, None, None)))
            .collect();
        let score = lifestyle_score(&images);
        assert_eq!(score.lifestyle_count, 6);
        assert_eq!(score.lifestyle_score, 100);
        assert!((score.lifestyle_ratio - 600.0 / 7.0).abs() < 1e-9);
        assert_eq!(lifestyle_score(&[]).lifestyle_ratio, 0.0);
    }

    #[test]
    fn test_infer_dimensions() {
        assert_eq!(
            infer_dimensions("https://m.media-amazon.com/images/I/71abc._AC_SL1500_.jpg"),
            Some((1500, 1500))
        );
        assert_eq!(
            infer_dimensions("https://m.media-amazon.com/images/I/71abc._SX679_.jpg"),
            Some((679, 679))
        );
        assert_eq!(
            infer_dimensions("https://m.media-amazon.com/images/I/71abc.jpg"),
            None
        );
    }

    #[test]
    fn test_process_product_filters_by_asin() {
        let mut other = record(ImageKind::Main, None, None);
        other.asin = "B0ZZZZZZZZ".into();
        let images = vec![record(ImageKind::Main, None, None), other];
        let product = process_product("B0ABCDEFGH", &images);
        assert_eq!(product.images.total_count, 1);
        assert_eq!(product.images.main_images.len(), 1);
        assert_eq!(product.analysis.image_quality_score, 65);
    }

    fn arb_kind() -> impl Strategy<Value = ImageKind> {
        prop_oneof![
            Just(ImageKind::Main),
            Just(ImageKind::Variant),
            Just(ImageKind::Lifestyle),
            Just(ImageKind::Gallery),
        ]
    }

    proptest! {
        #[test]
        fn prop_quality_within_bounds(
            specs in prop::collection::vec(
                (arb_kind(), prop::option::of((0u32..5000, 0u32..5000)), prop::option::of(0u64..10_000_000)),
                0..20,
            )
        ) {
            let images: Vec<ImageRecord> = specs
                .into_iter()
                .map(|(kind, dims, size)| record(kind, dims, size))
                .collect();
            let score = image_quality_score(&images);
            prop_assert!(score <= 100);
            if images.is_empty() {
                prop_assert_eq!(score, 0);
            } else {
                prop_assert!(score >= 50);
            }
        }
    }
}
