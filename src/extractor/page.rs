//! Product page evaluation: readiness probe and image extraction.
//!
//! Both functions are pure over a [`PageSnapshot`]; the orchestrator decides
//! when to take snapshots.

use chrono::Utc;
use scraper::Html;
use url::Url;

use crate::error_handling::{ExtractionFailure, FailureReason};
use crate::identifier::asin_from_product_url;

use super::images::{finalize_images, images_from_dom, images_from_scripts};
use super::selectors::{
    BLOCKING_TITLE_KEYWORDS, CAPTCHA_SELECTOR, DOCUMENT_TITLE_SELECTOR, ERROR_PAGE_SELECTOR,
    READY_TITLE_SELECTOR, TITLE_SELECTOR_LIST, WHITESPACE_RE,
};
use super::types::{PageExtraction, PageSnapshot, ProductImages, ReadyState, Readiness};

const UNKNOWN_PRODUCT: &str = "Unknown Product";

fn document_title(document: &Html) -> String {
    document
        .select(&DOCUMENT_TITLE_SELECTOR)
        .next()
        .map(|t| t.text().collect::<String>())
        .unwrap_or_default()
}

fn has_blocking_title(document: &Html) -> bool {
    let title = document_title(document);
    BLOCKING_TITLE_KEYWORDS.iter().any(|k| title.contains(k))
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Classifies a page for the load-wait loop.
///
/// Checked in order: CAPTCHA marker, error-page marker, blocking keyword in
/// the document title, document not yet complete, product title not yet
/// rendered. A page passing all checks is [`Readiness::Ready`].
pub fn probe_readiness(snapshot: &PageSnapshot) -> Readiness {
    let document = Html::parse_document(&snapshot.html);

    if document.select(&CAPTCHA_SELECTOR).next().is_some() {
        return Readiness::Blocked;
    }
    if document.select(&ERROR_PAGE_SELECTOR).next().is_some() || has_blocking_title(&document) {
        return Readiness::NotFound;
    }
    if snapshot.ready_state != ReadyState::Complete {
        return Readiness::Loading;
    }
    if document.select(&READY_TITLE_SELECTOR).next().is_none() {
        return Readiness::Loading;
    }
    Readiness::Ready
}

/// First non-empty product title among the ordered title selectors.
pub fn extract_title(document: &Html) -> Option<String> {
    TITLE_SELECTOR_LIST.iter().find_map(|selector| {
        document
            .select(selector)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .find(|t| !t.is_empty())
    })
}

/// Runs the DOM extractor against a page.
///
/// # Errors
///
/// Returns a tagged [`ExtractionFailure`] when the URL carries no identifier,
/// the page shows a CAPTCHA or error page, or no image survives filtering.
pub fn extract_product_images(snapshot: &PageSnapshot) -> Result<PageExtraction, ExtractionFailure> {
    let Some(asin) = asin_from_product_url(&snapshot.url) else {
        return Err(ExtractionFailure::new(
            FailureReason::InvalidUrl,
            "No ASIN found in URL",
        ));
    };

    let document = Html::parse_document(&snapshot.html);

    if document.select(&CAPTCHA_SELECTOR).next().is_some() {
        return Err(ExtractionFailure::new(
            FailureReason::CaptchaRequired,
            "Amazon is blocking automated requests",
        ));
    }
    if document.select(&ERROR_PAGE_SELECTOR).next().is_some() {
        return Err(ExtractionFailure::new(
            FailureReason::PageError,
            "ASIN may not exist or product unavailable",
        ));
    }
    if has_blocking_title(&document) {
        return Err(ExtractionFailure::new(
            FailureReason::PageError,
            "ASIN not found: product does not exist or access blocked",
        ));
    }

    let title = extract_title(&document).unwrap_or_default();

    let mut candidates = images_from_scripts(&document);
    if candidates.is_empty() {
        let base = Url::parse(&snapshot.url).ok();
        candidates = images_from_dom(&document, base.as_ref());
    }
    let images = finalize_images(candidates);

    if images.is_empty() {
        return Err(ExtractionFailure::new(
            FailureReason::NoImagesFound,
            "Could not locate any product images",
        ));
    }

    log::debug!("Extracted {} images for {}", images.len(), asin);
    Ok(PageExtraction {
        asin,
        title,
        images,
        page_url: snapshot.url.clone(),
    })
}

/// Shapes a raw page extraction into the stored per-product record.
pub fn format_extraction_result(extraction: PageExtraction) -> ProductImages {
    let title = if extraction.title.is_empty() {
        UNKNOWN_PRODUCT.to_string()
    } else {
        extraction.title
    };
    let thumbnail = extraction.images.first().cloned().unwrap_or_default();
    ProductImages {
        asin: extraction.asin,
        title,
        image_count: extraction.images.len(),
        thumbnail,
        images: extraction.images,
        page_url: extraction.page_url,
        extracted_at: Utc::now(),
    }
}
