//! Product collection from saved Amazon pages.
//!
//! Search result pages yield one [`CollectedItem`] per result; product
//! detail pages yield the product they show. Links are normalised to
//! `https://www.amazon.com/dp/{asin}/`.

mod detail;
mod search;

pub use detail::{is_product_detail_url, product_details};
pub use search::scan_search_results;

use crate::config::DEFAULT_AMAZON_DOMAIN;
use crate::identifier::{build_amazon_url, Asin};
use crate::store::CollectedItem;

fn canonical_link(asin: &Asin) -> String {
    build_amazon_url(asin, DEFAULT_AMAZON_DOMAIN)
}

/// Collects products from a saved page.
///
/// With a product detail `url` the page is read as a detail page; otherwise
/// it is scanned as search results.
pub fn collect_from_html(url: Option<&str>, html: &str) -> Vec<CollectedItem> {
    match url {
        Some(url) if is_product_detail_url(url) => product_details(url, html).into_iter().collect(),
        _ => scan_search_results(html),
    }
}
