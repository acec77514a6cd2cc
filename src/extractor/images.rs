//! Image URL discovery on product pages.
//!
//! Two strategies, tried in order:
//! 1. the embedded image block script (`"hiRes"` entries),
//! 2. the rendered main image plus gallery thumbnails, upgraded to full size.

use scraper::{ElementRef, Html};
use url::Url;

use crate::config::{MAX_IMAGES_PER_PRODUCT, MAX_SCRIPT_MATCHES, MIN_IMAGE_URL_LENGTH};

use super::selectors::{
    AC_THUMB_SIZE_RE, GALLERY_SELECTOR_LIST, HI_RES_RE, IMAGE_SCRIPT_MARKERS,
    MAIN_IMAGE_SELECTOR_LIST, SCRIPT_SELECTOR, THUMB_SIZE_RE,
};

const REJECTED_MARKERS: [&str; 7] = [
    "data:image",
    "loading",
    "placeholder",
    "transparent",
    "1x1",
    "pixel",
    "spacer",
];
const MEDIA_HOST_TOKENS: [&str; 3] = ["amazon.com", "media-amazon.com", "ssl-images-amazon.com"];
const UI_MARKERS: [&str; 5] = ["play-button", "pkplay-button", "video-thumb", "ui-", "icon-"];

/// Returns `true` if `url` looks like a real product image on an Amazon media host.
///
/// Rejects short URLs, GIFs, data URLs, loading/placeholder/tracking images,
/// video thumbnails and UI sprites.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.len() < MIN_IMAGE_URL_LENGTH || url.contains(".gif") {
        return false;
    }
    let lower = url.to_lowercase();
    if REJECTED_MARKERS.iter().any(|m| lower.contains(m)) {
        return false;
    }
    if !MEDIA_HOST_TOKENS.iter().any(|h| lower.contains(h)) {
        return false;
    }
    !UI_MARKERS.iter().any(|m| lower.contains(m))
}

/// Rewrites a thumbnail size token to the 1500px rendition.
pub fn upgrade_thumbnail(url: &str) -> String {
    let upgraded = AC_THUMB_SIZE_RE.replace_all(url, "_AC_SL1500_");
    THUMB_SIZE_RE
        .replace_all(&upgraded, "_SL1500_")
        .into_owned()
}

fn is_candidate(url: &str) -> bool {
    url.contains("amazon.com") && url.len() > MIN_IMAGE_URL_LENGTH
}

/// Collects `hiRes` URLs from the first image block script that yields any.
///
/// Only the first ten raw matches of a script are considered.
pub(crate) fn images_from_scripts(document: &Html) -> Vec<String> {
    for script in document.select(&SCRIPT_SELECTOR) {
        let text: String = script.text().collect();
        if !IMAGE_SCRIPT_MARKERS.iter().any(|m| text.contains(m)) {
            continue;
        }
        let urls: Vec<String> = HI_RES_RE
            .captures_iter(&text)
            .take(MAX_SCRIPT_MATCHES)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|u| is_candidate(u))
            .collect();
        if !urls.is_empty() {
            log::debug!("Found {} hiRes images in image block script", urls.len());
            return urls;
        }
    }
    Vec::new()
}

fn resolve(src: &str, base: Option<&Url>) -> String {
    match base.and_then(|b| b.join(src).ok()) {
        Some(u) => u.to_string(),
        None => src.to_string(),
    }
}

fn main_image_source(img: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
    let el = img.value();
    el.attr("data-old-hires")
        .filter(|s| !s.is_empty())
        .or_else(|| el.attr("data-a-hires").filter(|s| !s.is_empty()))
        .or_else(|| el.attr("src").filter(|s| !s.is_empty()))
        .map(|s| resolve(s, base))
}

/// Reads the rendered main image and gallery thumbnails.
///
/// The first main-image selector with a usable URL wins. Gallery selectors are
/// probed in order until the collection is non-empty; thumbnails are upgraded
/// to full size and de-duplicated, stopping at ten URLs.
pub(crate) fn images_from_dom(document: &Html, base: Option<&Url>) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();

    for selector in MAIN_IMAGE_SELECTOR_LIST.iter() {
        if let Some(img) = document.select(selector).next() {
            if let Some(src) = main_image_source(img, base).filter(|u| is_candidate(u)) {
                urls.push(src);
                break;
            }
        }
    }

    for selector in GALLERY_SELECTOR_LIST.iter() {
        for img in document.select(selector) {
            if urls.len() >= MAX_IMAGES_PER_PRODUCT {
                break;
            }
            let Some(src) = img.value().attr("src").map(|s| resolve(s, base)) else {
                continue;
            };
            if !is_candidate(&src) {
                continue;
            }
            let full = upgrade_thumbnail(&src);
            if !urls.contains(&full) {
                urls.push(full);
            }
        }
        if !urls.is_empty() {
            break;
        }
    }

    urls
}

/// Keeps the first ten candidates that are absolute, long enough and valid.
pub(crate) fn finalize_images(candidates: Vec<String>) -> Vec<String> {
    candidates
        .into_iter()
        .take(MAX_IMAGES_PER_PRODUCT)
        .filter(|u| u.starts_with("http") && u.len() > MIN_IMAGE_URL_LENGTH)
        .filter(|u| is_valid_image_url(u))
        .collect()
}
