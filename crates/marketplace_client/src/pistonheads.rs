//! PistonHeads adapter — browse-by-make classifieds.
//!
//! PistonHeads listing pages are not scoped by a free-text query: the
//! adapter fetches the per-make classifieds page, so the candidate set
//! mixes every model of that make. Narrowing to the target model is
//! the normalizer's keyword-match job, which is why this source is
//! flagged as mixing models.

use common::{BotConfig, ModelConfig, RawCandidate, SourceId};
use tracing::{info, warn};

use crate::http::HttpClient;
use crate::{absolutize, chain};

pub struct PistonHeadsSource {
    http: HttpClient,
    max_per_page: usize,
}

impl PistonHeadsSource {
    pub const BASE_URL: &'static str = "https://www.pistonheads.com";

    pub fn new(http: HttpClient, cfg: &BotConfig) -> Self {
        Self {
            http,
            max_per_page: cfg.scrape.max_candidates_per_page,
        }
    }

    /// Category browse: make filter and price ceiling only. No keyword
    /// scoping exists on these pages.
    fn query_params(&self, model: &ModelConfig) -> Vec<(&'static str, String)> {
        let mut params = vec![("price_to", model.max_price.to_string())];
        if let Some(make) = &model.make {
            params.push(("make", make.clone()));
        }
        params
    }

    pub async fn search(&self, model: &ModelConfig, term: &str) -> Vec<RawCandidate> {
        let url = format!("{}/classifieds/used-cars", Self::BASE_URL);
        let params = self.query_params(model);

        let body = match self.http.get_text(&url, &params).await {
            Ok(body) => body,
            Err(e) => {
                warn!("PistonHeads request failed for '{}': {}", term, e);
                return Vec::new();
            }
        };

        let mut candidates =
            chain::run(&self.http, Self::BASE_URL, &body, SourceId::PistonHeads).await;
        candidates.truncate(self.max_per_page);
        for candidate in &mut candidates {
            candidate.url = absolutize(&candidate.url, Self::BASE_URL);
        }

        info!(
            "PistonHeads: {} candidates on the {} page (pre model-match)",
            candidates.len(),
            model.make.as_deref().unwrap_or("all-makes")
        );
        candidates
    }
}
