//! DOM extractor for Amazon product pages.
//!
//! Pure functions over a [`PageSnapshot`]:
//! - [`probe_readiness`] classifies a page while it loads
//! - [`extract_product_images`] reads the title and up to ten full-size image URLs
//! - [`is_valid_image_url`] filters placeholders, icons and non-Amazon hosts
//!
//! Selectors are heuristics; a layout change degrades to `no_images_found`
//! rather than an error.

mod images;
mod page;
pub(crate) mod selectors;
mod types;

pub use images::{is_valid_image_url, upgrade_thumbnail};
pub use page::{extract_product_images, extract_title, format_extraction_result, probe_readiness};
pub use types::{
    ExtractionResult, FailedExtraction, PageExtraction, PageSnapshot, ProductImages, ReadyState,
    Readiness,
};
