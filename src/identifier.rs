//! Product identifiers (ASINs).
//!
//! An identifier is exactly ten characters: a leading `B` followed by nine
//! upper-case letters or digits. Input is trimmed before validation.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::AMAZON_DOMAINS;
use crate::error_handling::ValidationError;

static ASIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^B[0-9A-Z]{9}$").expect("ASIN regex is valid"));
static INPUT_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\n\r]+").expect("separator regex is valid"));
static PRODUCT_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/dp/([A-Z0-9]{10})").expect("product path regex is valid"));
static LINK_ASIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([A-Z0-9]{10})(?:[/?]|$)").expect("link identifier regex is valid")
});

/// A validated product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asin(String);

impl Asin {
    /// Parses and validates an identifier, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if is_valid_asin(trimmed) {
            Ok(Asin(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidAsins(vec![raw.to_string()]))
        }
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Product page URL under the given base (e.g. `https://www.amazon.com/dp/`).
    pub fn product_url(&self, base: &str) -> String {
        format!("{}{}", base, self.0)
    }
}

impl fmt::Display for Asin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Asin {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Asin::parse(&value)
    }
}

impl From<Asin> for String {
    fn from(asin: Asin) -> Self {
        asin.0
    }
}

impl AsRef<str> for Asin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns `true` if the trimmed input is a well-formed identifier.
pub fn is_valid_asin(raw: &str) -> bool {
    ASIN_RE.is_match(raw.trim())
}

/// Validates a batch of identifiers.
///
/// Checks, in order: every entry is well-formed, the batch is non-empty, the
/// batch holds at most `max` entries, and no identifier repeats. Returns the
/// parsed identifiers in input order.
pub fn validate_batch<S: AsRef<str>>(
    raw: &[S],
    max: usize,
) -> Result<Vec<Asin>, ValidationError> {
    let invalid: Vec<String> = raw
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !is_valid_asin(s))
        .map(str::to_string)
        .collect();
    if !invalid.is_empty() {
        return Err(ValidationError::InvalidAsins(invalid));
    }
    if raw.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    if raw.len() > max {
        return Err(ValidationError::BatchTooLarge {
            size: raw.len(),
            max,
        });
    }

    let mut seen = HashSet::new();
    let mut batch = Vec::with_capacity(raw.len());
    for s in raw {
        let asin = Asin::parse(s.as_ref())?;
        if !seen.insert(asin.clone()) {
            return Err(ValidationError::DuplicateAsin(asin.0));
        }
        batch.push(asin);
    }
    Ok(batch)
}

/// Splits free-form input on commas and line breaks, dropping blank entries.
pub fn parse_asin_input(input: &str) -> Vec<String> {
    INPUT_SEPARATOR_RE
        .split(input)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derives the identifier from a product page URL (`/dp/{asin}`).
pub fn asin_from_product_url(url: &str) -> Option<String> {
    PRODUCT_PATH_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Finds an identifier-shaped path segment in a product link.
///
/// Accepts `/dp/{asin}`, `/gp/product/{asin}` and similar shapes; the match
/// is case-insensitive and returned upper-cased.
pub fn asin_from_link(link: &str) -> Option<String> {
    LINK_ASIN_RE
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
}

/// Canonical product link on a storefront domain, e.g. `https://www.amazon.de/dp/B0ABCDEFGH/`.
pub fn build_amazon_url(asin: &Asin, domain: &str) -> String {
    format!("https://www.{}/dp/{}/", domain, asin)
}

/// Returns `true` for absolute http(s) URLs on a recognised storefront domain.
pub fn is_amazon_url(raw: &str) -> bool {
    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    AMAZON_DOMAINS
        .iter()
        .any(|d| host == *d || host.strip_prefix("www.") == Some(*d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_asin() {
        assert!(is_valid_asin("B0ABCDEFGH"));
        assert!(is_valid_asin("  B012345678 "));
        assert!(!is_valid_asin("A0ABCDEFGH"));
        assert!(!is_valid_asin("B0abcdefgh"));
        assert!(!is_valid_asin("B0ABCDEFG"));
        assert!(!is_valid_asin("B0ABCDEFGHI"));
        assert!(!is_valid_asin(""));
    }

    #[test]
    fn test_parse_trims() {
        let asin = Asin::parse(" B0ABCDEFGH\n").expect("should parse");
        assert_eq!(asin.as_str(), "B0ABCDEFGH");
    }

    #[test]
    fn test_validate_batch_rejects_invalid_first() {
        let err = validate_batch(&["B0ABCDEFGH", "bad"], 10).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAsins(vec!["bad".into()]));
    }

    #[test]
    fn test_validate_batch_limits() {
        let empty: [&str; 0] = [];
        assert_eq!(
            validate_batch(&empty, 10).unwrap_err(),
            ValidationError::EmptyBatch
        );

        let many: Vec<String> = (0..11).map(|i| format!("B00000000{}", i % 10)).collect();
        assert!(matches!(
            validate_batch(&many, 10).unwrap_err(),
            ValidationError::BatchTooLarge { size: 11, max: 10 }
        ));

        assert_eq!(
            validate_batch(&["B0ABCDEFGH", "B0ABCDEFGH"], 10).unwrap_err(),
            ValidationError::DuplicateAsin("B0ABCDEFGH".into())
        );
    }

    #[test]
    fn test_validate_batch_keeps_order() {
        let batch = validate_batch(&["B0ZZZZZZZZ", "B0AAAAAAAA"], 10).expect("valid batch");
        let ids: Vec<&str> = batch.iter().map(Asin::as_str).collect();
        assert_eq!(ids, vec!["B0ZZZZZZZZ", "B0AAAAAAAA"]);
    }

    #[test]
    fn test_parse_asin_input() {
        let parsed = parse_asin_input("B0ABCDEFGH, B012345678\r\n\nB0ZZZZZZZZ,,");
        assert_eq!(parsed, vec!["B0ABCDEFGH", "B012345678", "B0ZZZZZZZZ"]);
        assert!(parse_asin_input("  ").is_empty());
    }

    #[test]
    fn test_asin_from_product_url() {
        assert_eq!(
            asin_from_product_url("https://www.amazon.com/dp/B0ABCDEFGH?th=1").as_deref(),
            Some("B0ABCDEFGH")
        );
        assert_eq!(asin_from_product_url("https://www.amazon.com/s?k=mug"), None);
    }

    #[test]
    fn test_asin_from_link() {
        assert_eq!(
            asin_from_link("/Some-Product/dp/b0abcdefgh/ref=sr_1_1").as_deref(),
            Some("B0ABCDEFGH")
        );
        assert_eq!(
            asin_from_link("/gp/product/B012345678").as_deref(),
            Some("B012345678")
        );
    }

    #[test]
    fn test_build_and_recognise_urls() {
        let asin = Asin::parse("B0ABCDEFGH").unwrap();
        assert_eq!(
            build_amazon_url(&asin, "amazon.de"),
            "https://www.amazon.de/dp/B0ABCDEFGH/"
        );
        assert_eq!(
            asin.product_url("https://www.amazon.com/dp/"),
            "https://www.amazon.com/dp/B0ABCDEFGH"
        );
        assert!(is_amazon_url("https://www.amazon.co.uk/dp/B0ABCDEFGH"));
        assert!(is_amazon_url("https://amazon.com/"));
        assert!(!is_amazon_url("https://amazon.example.com/"));
        assert!(!is_amazon_url("ftp://www.amazon.com/"));
    }

    #[test]
    fn test_serde_rejects_malformed() {
        let ok: Asin = serde_json::from_str("\"B0ABCDEFGH\"").unwrap();
        assert_eq!(ok.as_str(), "B0ABCDEFGH");
        assert!(serde_json::from_str::<Asin>("\"nope\"").is_err());
    }
}
