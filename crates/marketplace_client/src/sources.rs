//! The fixed, priority-ordered set of marketplace sources.

use common::{BotConfig, ModelConfig, RawCandidate, SourceId};

use crate::http::HttpClient;
use crate::{AutoTraderSource, GumtreeSource, PistonHeadsSource};

/// A marketplace source the orchestrator can query.
pub enum Source {
    AutoTrader(AutoTraderSource),
    Gumtree(GumtreeSource),
    PistonHeads(PistonHeadsSource),
}

impl Source {
    pub fn id(&self) -> SourceId {
        match self {
            Source::AutoTrader(_) => SourceId::AutoTrader,
            Source::Gumtree(_) => SourceId::Gumtree,
            Source::PistonHeads(_) => SourceId::PistonHeads,
        }
    }

    /// Whether this source's result pages mix multiple models of one
    /// make, requiring the keyword model-match during normalization.
    pub fn mixes_models(&self) -> bool {
        matches!(self, Source::PistonHeads(_))
    }

    /// The designated reliable source gets a supplementary search with
    /// the model's second term when its primary pass runs thin.
    pub fn is_reliable(&self) -> bool {
        matches!(self, Source::AutoTrader(_))
    }

    pub async fn search(&self, model: &ModelConfig, term: &str) -> Vec<RawCandidate> {
        match self {
            Source::AutoTrader(s) => s.search(model, term).await,
            Source::Gumtree(s) => s.search(model, term).await,
            Source::PistonHeads(s) => s.search(model, term).await,
        }
    }
}

/// Build the source set in its fixed priority order.
pub fn default_sources(http: &HttpClient, cfg: &BotConfig) -> Vec<Source> {
    vec![
        Source::AutoTrader(AutoTraderSource::new(http.clone(), cfg)),
        Source::Gumtree(GumtreeSource::new(http.clone(), cfg)),
        Source::PistonHeads(PistonHeadsSource::new(http.clone(), cfg)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_and_flags() {
        let cfg = BotConfig::default();
        let http = HttpClient::new(1, 100);
        let sources = default_sources(&http, &cfg);

        let ids: Vec<SourceId> = sources.iter().map(Source::id).collect();
        assert_eq!(
            ids,
            vec![SourceId::AutoTrader, SourceId::Gumtree, SourceId::PistonHeads]
        );
        assert!(sources[0].is_reliable());
        assert!(!sources[1].is_reliable());
        assert!(sources[2].mixes_models());
        assert!(!sources[0].mixes_models());
    }
}
