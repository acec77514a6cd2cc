//! Search result scanning.

use std::collections::HashSet;
use std::sync::LazyLock;

use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::extractor::selectors::parse_selector_with_fallback;
use crate::identifier::{asin_from_link, is_valid_asin, Asin};

use crate::store::CollectedItem;

use super::canonical_link;

const CONTEXT: &str = "search results";

static RESULT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback(r#"div[data-component-type="s-search-result"]"#, CONTEXT)
});
static ASIN_INPUT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback(r#"input[name="asin"], input[name="ASIN"]"#, CONTEXT)
});
static PRODUCT_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback(r#"a[href*="/dp/"], a[href*="/gp/product/"]"#, CONTEXT)
});
static TITLE_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback(
        r#"h2 a, a.a-link-normal.s-line-clamp-2, a.a-link-normal.s-line-clamp-4, a[href*="/dp/"]"#,
        CONTEXT,
    )
});
static H2_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("h2", CONTEXT));
static IMAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback(".s-product-image-container img.s-image, img.s-image", CONTEXT)
});

const UNKNOWN_TITLE: &str = "Unknown Title";

fn well_formed(candidate: &str) -> Option<String> {
    let candidate = candidate.trim().to_uppercase();
    is_valid_asin(&candidate).then_some(candidate)
}

/// Finds the identifier of one search result.
///
/// Sources in order: `data-asin`, a hidden `asin` input, product links,
/// the element id.
fn asin_in_block(block: &ElementRef) -> Option<String> {
    let attr = block.value().attr("data-asin").and_then(well_formed);
    let input = || {
        block
            .select(&ASIN_INPUT_SELECTOR)
            .filter_map(|i| i.value().attr("value"))
            .find_map(well_formed)
    };
    let link = || {
        block
            .select(&PRODUCT_LINK_SELECTOR)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(asin_from_link)
            .find_map(|a| well_formed(&a))
    };
    let id = || {
        block
            .value()
            .id()
            .and_then(|id| id.split(|c: char| !c.is_ascii_alphanumeric()).find_map(well_formed))
    };
    attr.or_else(input).or_else(link).or_else(id)
}

fn title_in_block(block: &ElementRef) -> String {
    let from_link = block
        .select(&TITLE_LINK_SELECTOR)
        .next()
        .map(|a| a.text().collect::<Vec<_>>().join(" "))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.is_empty());
    let from_heading = || {
        block
            .select(&H2_SELECTOR)
            .filter_map(|h| h.value().attr("aria-label"))
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
    };
    from_link
        .or_else(from_heading)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Collects every product of a search result page, first occurrence wins.
pub fn scan_search_results(html: &str) -> Vec<CollectedItem> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for block in document.select(&RESULT_SELECTOR) {
        let Some(asin) = asin_in_block(&block) else {
            debug!("Search result without identifier skipped");
            continue;
        };
        if !seen.insert(asin.clone()) {
            continue;
        }
        let Ok(parsed) = Asin::parse(&asin) else {
            continue;
        };
        let img = block
            .select(&IMAGE_SELECTOR)
            .filter_map(|i| i.value().attr("src"))
            .next()
            .unwrap_or_default()
            .to_string();
        items.push(CollectedItem {
            title: title_in_block(&block),
            img,
            link: canonical_link(&parsed),
            asin,
        });
    }
    debug!("Found {} products in search results", items.len());
    items
}
