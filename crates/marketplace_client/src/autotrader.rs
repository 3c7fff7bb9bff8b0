//! AutoTrader adapter — structured search, the reliable source.

use common::{BotConfig, ModelConfig, RawCandidate, SourceId};
use tracing::{info, warn};

use crate::http::HttpClient;
use crate::{absolutize, chain};

/// AutoTrader rejects radius values above this.
const MAX_RADIUS_MILES: u32 = 200;

pub struct AutoTraderSource {
    http: HttpClient,
    postcode: String,
    radius_miles: u32,
    max_per_page: usize,
}

impl AutoTraderSource {
    pub const BASE_URL: &'static str = "https://www.autotrader.co.uk";

    pub fn new(http: HttpClient, cfg: &BotConfig) -> Self {
        Self {
            http,
            postcode: cfg.origin.postcode.clone(),
            radius_miles: (cfg.arb.max_distance_miles as u32).min(MAX_RADIUS_MILES),
            max_per_page: cfg.scrape.max_candidates_per_page,
        }
    }

    /// Structured query: postcode/radius scoping plus make/model
    /// filters where the catalog carries hints. Result pages are
    /// scoped to the target model.
    fn query_params(&self, model: &ModelConfig, term: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("postcode", self.postcode.clone()),
            ("radius", self.radius_miles.to_string()),
            ("price-to", model.max_price.to_string()),
            ("sort", "relevance".to_string()),
        ];
        if let Some(make) = &model.make {
            params.push(("make", make.clone()));
        }
        if let Some(hint) = &model.model_hint {
            params.push(("model", hint.clone()));
        }
        params.push(("keywords", term.to_string()));
        params
    }

    pub async fn search(&self, model: &ModelConfig, term: &str) -> Vec<RawCandidate> {
        let url = format!("{}/car-search", Self::BASE_URL);
        let params = self.query_params(model, term);

        let body = match self.http.get_text(&url, &params).await {
            Ok(body) => body,
            Err(e) => {
                warn!("AutoTrader request failed for '{}': {}", term, e);
                return Vec::new();
            }
        };

        let mut candidates =
            chain::run(&self.http, Self::BASE_URL, &body, SourceId::AutoTrader).await;
        candidates.truncate(self.max_per_page);
        for candidate in &mut candidates {
            candidate.url = absolutize(&candidate.url, Self::BASE_URL);
        }

        info!("AutoTrader: {} candidates for '{}'", candidates.len(), term);
        candidates
    }
}
