//! CSS selectors and patterns for Amazon product pages.
//!
//! Selector lists are ordered; callers take the first one that yields a usable
//! value.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

/// Parses a CSS selector, falling back to one that matches nothing.
///
/// A parse failure is logged instead of panicking so a bad heuristic only
/// disables itself.
pub(crate) fn parse_selector_with_fallback(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse CSS selector '{}' in {}: {}. Using fallback selector.",
            selector_str,
            context,
            e
        );
        Selector::parse("*:not(*)").unwrap_or_else(|_| unreachable!("'*:not(*)' always parses"))
    })
}

fn parse_all(selectors: &[&str], context: &str) -> Vec<Selector> {
    selectors
        .iter()
        .map(|s| parse_selector_with_fallback(s, context))
        .collect()
}

/// Compiles a static pattern; a failure is a programming error.
pub(crate) fn compile_regex_unsafe(pattern: &str, name: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Failed to compile regex {name}: {e}"))
}

pub(crate) const CAPTCHA_MARKER: &str = r#"[name="cvf_captcha_input"]"#;
pub(crate) const ERROR_PAGE_MARKER: &str = "#error-page, .a-error-page, .error-page";
/// Title element that marks a product page as rendered.
pub(crate) const READY_TITLE_MARKER: &str = "#productTitle, .product-title, h1.a-size-large";
/// Substrings of the document title that mean the product is unavailable.
pub(crate) const BLOCKING_TITLE_KEYWORDS: [&str; 3] = ["404", "Error", "Robot Check"];

pub(crate) const TITLE_SELECTORS: [&str; 9] = [
    "#productTitle",
    ".product-title",
    "h1.a-size-large",
    r#"h1[data-automation-id="product-title"]"#,
    ".a-size-large.a-spacing-none.a-color-base",
    "h1.a-size-base-plus",
    "span#productTitle",
    ".pdp-product-name",
    r#"[data-testid="product-title"]"#,
];

pub(crate) const MAIN_IMAGE_SELECTORS: [&str; 5] = [
    "#landingImage",
    r#".a-dynamic-image[data-a-image-name="landingImage"]"#,
    "#imgTagWrapperId img",
    ".imgTagWrapper img",
    "#main-image-container img",
];

pub(crate) const GALLERY_SELECTORS: [&str; 3] = [
    "#altImages .imageThumbnail img",
    "#altImages img",
    ".item.imageThumbnail img",
];

/// Script bodies carrying the image block data contain one of these markers.
pub(crate) const IMAGE_SCRIPT_MARKERS: [&str; 2] = ["colorImages", "ImageBlockATF"];

pub(crate) static CAPTCHA_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(CAPTCHA_MARKER, "CAPTCHA marker"));
pub(crate) static ERROR_PAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(ERROR_PAGE_MARKER, "error page marker"));
pub(crate) static READY_TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback(READY_TITLE_MARKER, "readiness title"));
pub(crate) static DOCUMENT_TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("title", "document title"));
pub(crate) static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("script", "script scan"));

pub(crate) static TITLE_SELECTOR_LIST: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_all(&TITLE_SELECTORS, "product title"));
pub(crate) static MAIN_IMAGE_SELECTOR_LIST: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_all(&MAIN_IMAGE_SELECTORS, "main image"));
pub(crate) static GALLERY_SELECTOR_LIST: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_all(&GALLERY_SELECTORS, "gallery thumbnails"));

pub(crate) static HI_RES_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r#""hiRes":\s*"([^"]+)""#, "HI_RES_RE"));
pub(crate) static AC_THUMB_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"_AC_US\d+_", "AC_THUMB_SIZE_RE"));
pub(crate) static THUMB_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"_US\d+_", "THUMB_SIZE_RE"));
pub(crate) static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\s+", "WHITESPACE_RE"));
