//! Listing normalizer and model-match filter.
//!
//! Converts a raw candidate plus its model context into a fully
//! computed `EvaluatedListing`, or rejects it. All rejection rules
//! live here so the arbitrage filter downstream stays a pure
//! threshold check.

use common::{Coordinates, EvaluatedListing, ModelConfig, RawCandidate, UNKNOWN};
use extractors::{parse_price, parse_year};
use geocode::{haversine_miles, Gazetteer};
use tracing::debug;

/// Phrases that mark a buy-request post — demand, not supply.
/// Matched as case-insensitive substrings.
const BUY_REQUEST_PHRASES: &[&str] = &["wanted", "looking for", "want to buy", "searching for"];

/// Short buy-request tokens matched on word boundaries only, so a
/// title like "Isofix fitted" is not mistaken for "in search of".
const BUY_REQUEST_TOKENS: &[&str] = &["wtb", "iso"];

/// Body styles the profit model does not cover — each model key
/// assumes the coupe/saloon variant the destination market wants.
const BODY_STYLE_EXCLUSIONS: &[&str] = &["estate", "touring"];

/// Builds `EvaluatedListing`s from raw candidates.
pub struct Normalizer<'a> {
    gazetteer: &'a Gazetteer,
    origin: Coordinates,
    fixed_transaction_cost: i64,
}

impl<'a> Normalizer<'a> {
    pub fn new(gazetteer: &'a Gazetteer, fixed_transaction_cost: i64) -> Self {
        Self {
            gazetteer,
            origin: gazetteer.origin(),
            fixed_transaction_cost,
        }
    }

    /// Normalize one candidate against its model context.
    ///
    /// `keyword_match_required` is set for adapters whose pages mix
    /// multiple models of one make. Returns `None` on rejection.
    pub fn normalize(
        &self,
        candidate: &RawCandidate,
        model: &ModelConfig,
        keyword_match_required: bool,
    ) -> Option<EvaluatedListing> {
        let title_lower = candidate.title.to_lowercase();

        // 1. Price: 0 means unparseable, and unparseable means reject —
        //    never "free".
        let price = parse_price(&candidate.price_text);
        if price == 0 {
            debug!("{}: rejected, no parseable price", model.key);
            return None;
        }

        // 2. Model match on mixed-model pages.
        if keyword_match_required && !matches_model(&title_lower, model) {
            debug!("{}: rejected, title does not match model keywords", model.key);
            return None;
        }

        // 3. Buy-request posts are listings of demand, never supply.
        if is_buy_request(&title_lower) {
            debug!("{}: rejected buy-request post '{}'", model.key, candidate.title);
            return None;
        }

        // 4. Wrong body style.
        if BODY_STYLE_EXCLUSIONS.iter().any(|kw| title_lower.contains(kw)) {
            debug!("{}: rejected body-style variant '{}'", model.key, candidate.title);
            return None;
        }

        // 5. Per-model exclusion keywords (similar trims/generations
        //    sharing a search term).
        if model
            .exclude_keywords
            .iter()
            .any(|kw| title_lower.contains(&kw.to_lowercase()))
        {
            debug!("{}: rejected by exclusion keyword '{}'", model.key, candidate.title);
            return None;
        }

        // 6. Year bounds. An unparseable year is permissive, not
        //    restrictive.
        let year = parse_year(&candidate.year_text).or_else(|| parse_year(&candidate.title));
        if let (Some(range), Some(year)) = (&model.year_range, year) {
            if !range.contains(year) {
                debug!("{}: rejected, {} outside year range", model.key, year);
                return None;
            }
        }

        // Accepted — resolve geography and compute every derived field
        // exactly once.
        let coordinates = self.gazetteer.resolve(&candidate.location);
        let distance = haversine_miles(self.origin, coordinates);

        let expected_resale_price = price + model.markup;
        let net_profit = model.markup - self.fixed_transaction_cost;
        let profit_margin = if price > 0 {
            net_profit as f64 / price as f64 * 100.0
        } else {
            0.0
        };

        Some(EvaluatedListing {
            url: candidate.url.clone(),
            model_key: model.key.clone(),
            title: or_unknown(&candidate.title),
            year: year
                .map(|y| y.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            mileage: or_unknown(&candidate.mileage_text),
            location: or_unknown(&candidate.location),
            source: candidate.source,
            image: candidate
                .image_url
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            price,
            coordinates,
            distance,
            expected_resale_price,
            net_profit,
            profit_margin,
            avg_origin_price: model.avg_origin_price,
            avg_destination_price: model.avg_destination_price,
            origin_saving: model.avg_origin_price - price,
            destination_margin: model.avg_destination_price - expected_resale_price,
        })
    }
}

/// Whether a lowercased title carries at least one of the model's
/// matching keywords.
fn matches_model(title_lower: &str, model: &ModelConfig) -> bool {
    model
        .match_keywords
        .iter()
        .any(|kw| title_lower.contains(&kw.to_lowercase()))
}

/// Buy-request heuristic over a lowercased title.
fn is_buy_request(title_lower: &str) -> bool {
    if BUY_REQUEST_PHRASES.iter().any(|p| title_lower.contains(p)) {
        return true;
    }
    title_lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| BUY_REQUEST_TOKENS.contains(&word))
}

fn or_unknown(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{RawCandidate, SourceId, YearRange};

    fn liverpool() -> Coordinates {
        Coordinates::new(53.4084, -2.9916)
    }

    fn test_model() -> ModelConfig {
        ModelConfig {
            key: "test_model_x".into(),
            search_terms: vec!["Model X".into(), "X Sport".into()],
            make: Some("TestMake".into()),
            model_hint: None,
            match_keywords: vec!["model x".into()],
            exclude_keywords: vec!["mk2".into()],
            max_price: 10_000,
            markup: 2_700,
            min_profit: 1_000,
            year_range: Some(YearRange { min: 1998, max: 2006 }),
            avg_origin_price: 6_000,
            avg_destination_price: 8_500,
        }
    }

    fn make_candidate(title: &str, price_text: &str, location: &str) -> RawCandidate {
        RawCandidate {
            title: title.into(),
            price_text: price_text.into(),
            location: location.into(),
            year_text: String::new(),
            mileage_text: "89,000".into(),
            url: "https://example.com/ad/1".into(),
            image_url: None,
            source: SourceId::AutoTrader,
        }
    }

    fn normalizer(gaz: &Gazetteer) -> Normalizer<'_> {
        Normalizer::new(gaz, 650)
    }

    #[test]
    fn test_derived_arithmetic_scenario_a() {
        // max_price=10000, markup=2700, min_profit=1000, fixed cost 650;
        // price 5000 in Chester.
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        let listing = n
            .normalize(&make_candidate("Model X Sport 2004", "£5,000", "Chester"), &test_model(), false)
            .expect("candidate should normalize");

        assert_eq!(listing.price, 5_000);
        assert_eq!(listing.expected_resale_price, 7_700);
        assert_eq!(listing.net_profit, 2_050);
        assert!((listing.profit_margin - 41.0).abs() < 1e-6);
        assert_eq!(listing.origin_saving, 1_000);
        assert_eq!(listing.destination_margin, 800);
        assert!(listing.distance < 30.0, "Chester is close to Liverpool");
    }

    #[test]
    fn test_net_profit_independent_of_price() {
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        let model = test_model();
        for price in ["£1,200", "£5,000", "£9,999"] {
            let listing = n
                .normalize(&make_candidate("Model X 2003", price, "Leeds"), &model, false)
                .unwrap();
            assert_eq!(listing.net_profit, model.markup - 650);
            assert_eq!(listing.expected_resale_price, listing.price + model.markup);
        }
    }

    #[test]
    fn test_zero_price_always_rejected() {
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        for bad in ["", "POA", "£0"] {
            assert!(
                n.normalize(&make_candidate("Model X 2004", bad, "Chester"), &test_model(), false)
                    .is_none(),
                "price text {:?} must be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_buy_request_rejected_scenario_c() {
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        let rejects = [
            "Wanted: Model X, any condition",
            "WANTED model x",
            "Looking for Model X project",
            "WTB Model X shell",
            "Model X ISO, cash waiting",
            "want to buy Model X",
            "Searching for Model X",
        ];
        for title in rejects {
            assert!(
                n.normalize(&make_candidate(title, "£4,000", "Chester"), &test_model(), false)
                    .is_none(),
                "{:?} must be rejected as a buy request",
                title
            );
        }
    }

    #[test]
    fn test_iso_token_needs_word_boundary() {
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        // "Isofix" contains "iso" but is a genuine sale listing.
        let listing = n.normalize(
            &make_candidate("Model X 2004, Isofix fitted", "£4,000", "Chester"),
            &test_model(),
            false,
        );
        assert!(listing.is_some());
    }

    #[test]
    fn test_body_style_exclusion() {
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        assert!(n
            .normalize(
                &make_candidate("Model X Touring 2004", "£4,000", "Chester"),
                &test_model(),
                false,
            )
            .is_none());
        assert!(n
            .normalize(
                &make_candidate("Model X Estate 2004", "£4,000", "Chester"),
                &test_model(),
                false,
            )
            .is_none());
    }

    #[test]
    fn test_exclusion_keywords() {
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        assert!(n
            .normalize(
                &make_candidate("Model X Mk2 2004", "£4,000", "Chester"),
                &test_model(),
                false,
            )
            .is_none());
    }

    #[test]
    fn test_keyword_match_only_on_mixed_model_pages() {
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        let other = make_candidate("Completely Different Car 2004", "£4,000", "Chester");

        // Mixed-model page: no keyword, rejected.
        assert!(n.normalize(&other, &test_model(), true).is_none());
        // Query-scoped page: title is trusted.
        assert!(n.normalize(&other, &test_model(), false).is_some());
    }

    #[test]
    fn test_year_range_enforced_but_unknown_year_permissive() {
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        let model = test_model();

        // 1995 is before the 1998–2006 window.
        assert!(n
            .normalize(&make_candidate("Model X 1995", "£4,000", "Chester"), &model, false)
            .is_none());
        // No year anywhere: permissive.
        let listing = n
            .normalize(&make_candidate("Model X low miles", "£4,000", "Chester"), &model, false)
            .unwrap();
        assert_eq!(listing.year, "Unknown");
    }

    #[test]
    fn test_unknown_sentinels_and_origin_fallback() {
        let gaz = Gazetteer::new(liverpool());
        let n = normalizer(&gaz);
        let mut candidate = make_candidate("Model X 2004", "£4,000", "");
        candidate.mileage_text = String::new();
        let listing = n.normalize(&candidate, &test_model(), false).unwrap();

        assert_eq!(listing.location, "Unknown");
        assert_eq!(listing.mileage, "Unknown");
        assert_eq!(listing.image, "Unknown");
        // Unresolvable location sits at the origin: distance 0.
        assert!(listing.distance.abs() < 1e-9);
    }
}
