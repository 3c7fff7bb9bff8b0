//! Gumtree adapter — keyword search over the cars category.

use common::{BotConfig, ModelConfig, RawCandidate, SourceId};
use tracing::{info, warn};

use crate::http::HttpClient;
use crate::{absolutize, chain};

/// Gumtree's distance filter tops out well below AutoTrader's.
const MAX_RADIUS_MILES: u32 = 100;

pub struct GumtreeSource {
    http: HttpClient,
    location: String,
    radius_miles: u32,
    max_per_page: usize,
}

impl GumtreeSource {
    pub const BASE_URL: &'static str = "https://www.gumtree.com";

    pub fn new(http: HttpClient, cfg: &BotConfig) -> Self {
        Self {
            http,
            location: cfg.origin.name.clone(),
            radius_miles: (cfg.arb.max_distance_miles as u32).min(MAX_RADIUS_MILES),
            max_per_page: cfg.scrape.max_candidates_per_page,
        }
    }

    /// Keyword query scoped by location and price ceiling. Result
    /// pages only contain the searched model.
    fn query_params(&self, model: &ModelConfig, term: &str) -> Vec<(&'static str, String)> {
        vec![
            ("search_category", "cars".to_string()),
            ("q", term.to_string()),
            ("search_location", self.location.clone()),
            ("distance", self.radius_miles.to_string()),
            ("max_price", model.max_price.to_string()),
        ]
    }

    pub async fn search(&self, model: &ModelConfig, term: &str) -> Vec<RawCandidate> {
        let url = format!("{}/search", Self::BASE_URL);
        let params = self.query_params(model, term);

        let body = match self.http.get_text(&url, &params).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Gumtree request failed for '{}': {}", term, e);
                return Vec::new();
            }
        };

        let mut candidates = chain::run(&self.http, Self::BASE_URL, &body, SourceId::Gumtree).await;
        candidates.truncate(self.max_per_page);
        for candidate in &mut candidates {
            candidate.url = absolutize(&candidate.url, Self::BASE_URL);
        }

        info!("Gumtree: {} candidates for '{}'", candidates.len(), term);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::default_models;

    #[test]
    fn test_query_params() {
        let cfg = BotConfig::default();
        let source = GumtreeSource::new(HttpClient::new(1, 100), &cfg);
        let models = default_models();
        let mx5 = models.iter().find(|m| m.key == "mazda_mx5").unwrap();

        let params = source.query_params(mx5, "Mazda MX-5");
        assert!(params.contains(&("q", "Mazda MX-5".to_string())));
        assert!(params.contains(&("search_location", "Liverpool".to_string())));
        assert!(params.contains(&("max_price", "8000".to_string())));
        // 200-mile working radius is capped to Gumtree's own maximum.
        assert!(params.contains(&("distance", "100".to_string())));
    }
}
