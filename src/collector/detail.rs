//! Product detail page reading.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::extractor::selectors::parse_selector_with_fallback;
use crate::identifier::{asin_from_link, Asin};
use crate::store::CollectedItem;

use super::canonical_link;

const CONTEXT: &str = "product detail";

const DETAIL_TITLE_SELECTORS: [&str; 4] = [
    "#productTitle",
    ".product-title",
    ".a-size-large.product-title-word-break",
    "h1.a-size-large span",
];

const DETAIL_IMAGE_SELECTORS: [&str; 5] = [
    "#landingImage",
    ".a-dynamic-image",
    ".s-image",
    ".product-image img",
    "img[data-old-hires]",
];

static TITLE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    DETAIL_TITLE_SELECTORS
        .iter()
        .map(|s| parse_selector_with_fallback(s, CONTEXT))
        .collect()
});
static IMAGE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    DETAIL_IMAGE_SELECTORS
        .iter()
        .map(|s| parse_selector_with_fallback(s, CONTEXT))
        .collect()
});
static ASIN_INPUT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("input#ASIN, input[name=\"ASIN\"]", CONTEXT));

const DEFAULT_TITLE: &str = "Product Detail";

/// `true` for `/dp/` and `/gp/product/` URLs.
pub fn is_product_detail_url(url: &str) -> bool {
    url.contains("/dp/") || url.contains("/gp/product/")
}

/// Reads the product shown on a detail page.
///
/// The identifier comes from the URL, falling back to the page's `ASIN`
/// input. Returns `None` when neither yields a valid identifier.
pub fn product_details(url: &str, html: &str) -> Option<CollectedItem> {
    let document = Html::parse_document(html);

    let from_url = asin_from_link(url).and_then(|a| Asin::parse(&a).ok());
    let asin = from_url.or_else(|| {
        document
            .select(&ASIN_INPUT_SELECTOR)
            .filter_map(|i| i.value().attr("value"))
            .find_map(|v| Asin::parse(v).ok())
    })?;

    let title = TITLE_SELECTORS
        .iter()
        .find_map(|selector| {
            document
                .select(selector)
                .map(|el| el.text().collect::<Vec<_>>().join(" "))
                .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
                .find(|t| !t.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let img = IMAGE_SELECTORS
        .iter()
        .find_map(|selector| {
            document
                .select(selector)
                .filter_map(|el| el.value().attr("src"))
                .find(|src| !src.is_empty())
        })
        .unwrap_or_default()
        .to_string();

    Some(CollectedItem {
        asin: asin.as_str().to_string(),
        title,
        img,
        link: canonical_link(&asin),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_details_from_url() {
        let html = r#"<html><body>
            <span id="productTitle">  Insulated
               Bottle </span>
            <img id="landingImage" src="https://m.media-amazon.com/images/I/61b._AC_SX679_.jpg">
        </body></html>"#;
        let item = product_details("https://www.amazon.com/Bottle/dp/B0ABCDEFGH?th=1", html).unwrap();
        assert_eq!(item.asin, "B0ABCDEFGH");
        assert_eq!(item.title, "Insulated Bottle");
        assert_eq!(item.img, "https://m.media-amazon.com/images/I/61b._AC_SX679_.jpg");
        assert_eq!(item.link, "https://www.amazon.com/dp/B0ABCDEFGH/");
    }

    #[test]
    fn test_product_details_fallbacks() {
        let html = r#"<input type="hidden" id="ASIN" value="B0ABCDEFGH">"#;
        let item = product_details("https://www.amazon.com/gp/cart", html).unwrap();
        assert_eq!(item.asin, "B0ABCDEFGH");
        assert_eq!(item.title, "Product Detail");
        assert_eq!(item.img, "");

        assert!(product_details("https://www.amazon.com/gp/cart", "<p></p>").is_none());
    }

    #[test]
    fn test_is_product_detail_url() {
        assert!(is_product_detail_url("https://www.amazon.com/dp/B0ABCDEFGH"));
        assert!(is_product_detail_url("https://www.amazon.de/gp/product/B0ABCDEFGH"));
        assert!(!is_product_detail_url("https://www.amazon.com/s?k=mug"));
    }
}
