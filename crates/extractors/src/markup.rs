//! Strategy 4 — markup-structure extraction.
//!
//! Last resort when nothing machine-readable is left in the page:
//! match repeated container elements by a cascade of class/attribute
//! patterns (most to least specific), then pull fields from descendant
//! elements and short-distance text patterns.

use common::{RawCandidate, SourceId};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::fields::{find_mileage, parse_year};

/// Container cascades, most specific first. The first selector that
/// matches at least one candidate wins; later patterns exist because
/// marketplaces periodically rename their classes.
const CONTAINER_SELECTORS: &[&str] = &[
    "article[data-testid*='listing']",
    "li.search-page__result",
    "article.listing-card",
    "div.ad-listing",
    "li.natural",
    "article[class*='listing']",
    "div[class*='search-result']",
    "li[class*='result']",
];

const TITLE_SELECTORS: &[&str] = &["h3", "h2", "a[class*='title']", "[class*='headline']"];

const PRICE_SELECTORS: &[&str] = &[
    "div[class*='product-card-pricing__price']",
    "span[class*='listing-price']",
    "strong[class*='amount']",
    "[class*='price']",
];

const LOCATION_SELECTORS: &[&str] = &[
    "span[class*='seller-location']",
    "div[class*='listing-location']",
    "span[class*='location']",
    "span[class*='truncate-line']",
];

const IMAGE_SELECTORS: &[&str] = &["img[src]"];

/// Extract candidates by walking repeated container elements.
pub fn extract(content: &str, source: SourceId) -> Vec<RawCandidate> {
    let document = Html::parse_document(content);
    let mut candidates = Vec::new();

    for container in CONTAINER_SELECTORS {
        let Ok(selector) = Selector::parse(container) else {
            continue;
        };
        for element in document.select(&selector) {
            if let Some(candidate) = candidate_from_element(element, source) {
                candidates.push(candidate);
            }
        }
        if !candidates.is_empty() {
            debug!(
                "markup strategy matched {} candidates via `{}`",
                candidates.len(),
                container
            );
            break;
        }
    }

    candidates
}

/// Pull listing fields out of one container element. Returns `None`
/// for containers with neither a title nor a price — navigation and
/// ad slots match broad class patterns too.
fn candidate_from_element(element: ElementRef<'_>, source: SourceId) -> Option<RawCandidate> {
    let mut candidate = RawCandidate::empty(source);

    candidate.title = text_from(element, TITLE_SELECTORS).unwrap_or_default();
    candidate.price_text = text_from(element, PRICE_SELECTORS).unwrap_or_default();
    candidate.location = text_from(element, LOCATION_SELECTORS).unwrap_or_default();
    candidate.url = href_from(element).unwrap_or_default();
    candidate.image_url = attr_from(element, IMAGE_SELECTORS, "src");

    // Year and mileage rarely get their own element; scan the
    // container's full text for the usual short patterns.
    let full_text = collapsed_text(element);
    if let Some(year) = parse_year(&full_text) {
        candidate.year_text = year.to_string();
    }
    if let Some(mileage) = find_mileage(&full_text) {
        candidate.mileage_text = mileage;
    }

    if candidate.title.is_empty() && candidate.price_text.is_empty() {
        return None;
    }
    Some(candidate)
}

/// First non-empty text under any of the selectors, in cascade order.
fn text_from(element: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(found) = element.select(&selector).next() {
            let text = collapsed_text(found);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First attribute value under any of the selectors.
fn attr_from(element: ElementRef<'_>, selectors: &[&str], attr: &str) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(found) = element.select(&selector).next() {
            if let Some(value) = found.value().attr(attr) {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// The detail-page link: prefer an anchor wrapping the title, fall
/// back to the first anchor in the container.
fn href_from(element: ElementRef<'_>) -> Option<String> {
    attr_from(
        element,
        &["a[class*='title']", "a[href*='car-details']", "a[href*='classifieds']", "a[href]"],
        "href",
    )
}

/// Element text with whitespace collapsed to single spaces.
fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
