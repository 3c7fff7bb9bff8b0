//! Run orchestrator.
//!
//! Owns the run state machine and the sequential model × source loop.
//! Everything network-bearing is strictly sequential with a randomized
//! politeness pause between calls — that is a deliberate constraint,
//! not a missing optimization.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use common::{BotConfig, Coordinates, Error, EvaluatedListing, RawCandidate, Result, SourceId};
use deal_engine::{is_deal, Normalizer};
use geocode::Gazetteer;
use marketplace_client::{default_sources, HttpClient, Source};
use rand::Rng;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::demo;
use crate::progress::ProgressFeed;

/// How a run is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Live,
    Demo,
}

/// Lifecycle of a run. Only one run may be `Running` at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub deal_count: usize,
    pub total_profit: i64,
    pub elapsed: Duration,
}

#[derive(Debug)]
struct RunStatus {
    state: RunState,
    error: Option<String>,
}

/// The deal finder: sources, scoring, and run state.
pub struct DealFinder {
    cfg: BotConfig,
    gazetteer: Gazetteer,
    sources: Vec<Source>,
    status: Arc<Mutex<RunStatus>>,
    progress: ProgressFeed,
    results: Arc<RwLock<Vec<EvaluatedListing>>>,
    cancel: Arc<AtomicBool>,
}

impl DealFinder {
    pub fn new(cfg: BotConfig) -> Self {
        let http = HttpClient::new(cfg.scrape.request_timeout_secs, cfg.scrape.requests_per_sec);
        let sources = default_sources(&http, &cfg);
        let gazetteer = Gazetteer::new(Coordinates::new(cfg.origin.lat, cfg.origin.lon));
        Self {
            cfg,
            gazetteer,
            sources,
            status: Arc::new(Mutex::new(RunStatus {
                state: RunState::Idle,
                error: None,
            })),
            progress: ProgressFeed::new(),
            results: Arc::new(RwLock::new(Vec::new())),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    fn status(&self) -> MutexGuard<'_, RunStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> RunState {
        self.status().state
    }

    pub fn last_error(&self) -> Option<String> {
        self.status().error.clone()
    }

    /// The progress feed handle for external observers.
    pub fn progress(&self) -> ProgressFeed {
        self.progress.clone()
    }

    /// Read-only snapshot of the current result set.
    pub fn results(&self) -> Vec<EvaluatedListing> {
        self.results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cooperative cancellation, honored between model × source pairs.
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Flip `Idle`/`Completed`/`Failed` → `Running`, rejecting a start
    /// while a run is already in flight.
    fn try_begin(&self) -> Result<()> {
        let mut status = self.status();
        if status.state == RunState::Running {
            return Err(Error::AlreadyRunning);
        }
        status.state = RunState::Running;
        status.error = None;
        Ok(())
    }

    fn finish(&self, outcome: &Result<RunSummary>) {
        let mut status = self.status();
        match outcome {
            Ok(_) => status.state = RunState::Completed,
            Err(e) => {
                status.state = RunState::Failed;
                status.error = Some(e.to_string());
            }
        }
    }

    /// Execute one run. Rejected synchronously with
    /// [`Error::AlreadyRunning`] when a run is in progress.
    pub async fn start_run(&self, mode: RunMode) -> Result<RunSummary> {
        self.try_begin()?;
        self.cancel.store(false, Ordering::Relaxed);
        self.progress.reset();
        self.results
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        let outcome = match mode {
            RunMode::Demo => self.run_demo(),
            RunMode::Live => self.run_live().await,
        };

        self.finish(&outcome);
        match &outcome {
            Ok(summary) => {
                self.progress.set_action(100, "Run complete");
                self.progress.push(format!(
                    "Run complete: {} deals, £{} total potential profit",
                    summary.deal_count, summary.total_profit
                ));
            }
            Err(e) => {
                self.progress.push(format!("Run failed: {}", e));
                warn!("Run failed: {}", e);
            }
        }
        outcome
    }

    // ── Live run ──────────────────────────────────────────────────────

    async fn run_live(&self) -> Result<RunSummary> {
        let started = Instant::now();
        let normalizer = Normalizer::new(&self.gazetteer, self.cfg.arb.fixed_transaction_cost);
        let total_pairs = self.cfg.models.len() * self.sources.len();
        let mut completed_pairs = 0usize;
        let mut deals: Vec<EvaluatedListing> = Vec::new();

        self.progress.push(format!(
            "Live run: {} models x {} sources",
            self.cfg.models.len(),
            self.sources.len()
        ));

        'pairs: for model in &self.cfg.models {
            for source in &self.sources {
                if self.cancel.load(Ordering::Relaxed) {
                    self.progress.push("Cancellation requested; stopping run");
                    info!("Run cancelled between pairs");
                    break 'pairs;
                }

                let Some(term) = model.search_terms.first() else {
                    completed_pairs += 1;
                    continue;
                };

                self.progress.set_action(
                    percent(completed_pairs, total_pairs),
                    format!("Searching {} for {}", source.id().label(), term),
                );

                let mut candidates = source.search(model, term).await;
                self.politeness_pause().await;

                // Supplementary pass: when the reliable source runs
                // thin and the model has a second term, widen the net
                // once, deduplicating by URL at merge time.
                if source.is_reliable()
                    && candidates.len() < self.cfg.scrape.supplementary_threshold
                    && model.search_terms.len() > 1
                {
                    let second = &model.search_terms[1];
                    self.progress.push(format!(
                        "{}: only {} results for '{}', retrying with '{}'",
                        source.id().label(),
                        candidates.len(),
                        term,
                        second
                    ));
                    let extra = source.search(model, second).await;
                    self.politeness_pause().await;
                    merge_candidates(&mut candidates, extra);
                }

                let found = self.evaluate_candidates(&normalizer, model, source, &candidates);
                let accepted = found.len();
                for listing in found {
                    self.results
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(listing.clone());
                    deals.push(listing);
                }

                completed_pairs += 1;
                self.progress.set_action(
                    percent(completed_pairs, total_pairs),
                    format!("Finished {} / {}", model.key, source.id().label()),
                );
                self.progress.push(format!(
                    "{} x {}: {} candidates, {} deals",
                    model.key,
                    source.id().label(),
                    candidates.len(),
                    accepted
                ));
            }
        }

        Ok(self.publish(deals, started))
    }

    /// Normalize and filter one pair's candidates.
    fn evaluate_candidates(
        &self,
        normalizer: &Normalizer<'_>,
        model: &common::ModelConfig,
        source: &Source,
        candidates: &[RawCandidate],
    ) -> Vec<EvaluatedListing> {
        candidates
            .iter()
            .filter_map(|c| normalizer.normalize(c, model, source.mixes_models()))
            .filter(|listing| is_deal(listing, model, self.cfg.arb.max_distance_miles))
            .collect()
    }

    // ── Demo run ──────────────────────────────────────────────────────

    /// Demo mode skips the network but uses the very same normalize +
    /// filter path, so scoring arithmetic is identical to live.
    fn run_demo(&self) -> Result<RunSummary> {
        let started = Instant::now();
        let normalizer = Normalizer::new(&self.gazetteer, self.cfg.arb.fixed_transaction_cost);
        self.progress.push("Demo run: evaluating sample listings");

        let mut deals = Vec::new();
        for (model_key, candidate) in demo::sample_candidates() {
            let Some(model) = self.cfg.models.iter().find(|m| m.key == model_key) else {
                continue;
            };
            let mixes_models = candidate.source == SourceId::PistonHeads;
            if let Some(listing) = normalizer.normalize(&candidate, model, mixes_models) {
                if is_deal(&listing, model, self.cfg.arb.max_distance_miles) {
                    deals.push(listing);
                }
            }
        }

        Ok(self.publish(deals, started))
    }

    // ── Shared ────────────────────────────────────────────────────────

    /// Final dedup, profit sort, and publication of the result set.
    fn publish(&self, deals: Vec<EvaluatedListing>, started: Instant) -> RunSummary {
        let mut unique = dedup_by_url(deals);
        unique.sort_by(|a, b| b.net_profit.cmp(&a.net_profit));

        let total_profit = unique.iter().map(|l| l.net_profit).sum();
        let summary = RunSummary {
            deal_count: unique.len(),
            total_profit,
            elapsed: started.elapsed(),
        };

        info!(
            "Publishing {} deals (£{} total potential profit)",
            summary.deal_count, summary.total_profit
        );
        *self
            .results
            .write()
            .unwrap_or_else(PoisonError::into_inner) = unique;
        summary
    }

    /// Randomized pause between network-bearing calls.
    async fn politeness_pause(&self) {
        let min = self.cfg.scrape.politeness_delay_min_ms;
        let max = self.cfg.scrape.politeness_delay_max_ms;
        let delay_ms = if max > min {
            rand::thread_rng().gen_range(min..=max)
        } else {
            min
        };
        sleep(Duration::from_millis(delay_ms)).await;
    }
}

fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed * 100) / total) as u8
}

/// Merge supplementary candidates into the primary batch, skipping any
/// whose URL already appeared. Empty URLs cannot prove identity and
/// are always kept.
fn merge_candidates(primary: &mut Vec<RawCandidate>, extra: Vec<RawCandidate>) {
    let mut seen: HashSet<String> = primary
        .iter()
        .filter(|c| !c.url.is_empty())
        .map(|c| c.url.clone())
        .collect();
    for candidate in extra {
        if candidate.url.is_empty() || seen.insert(candidate.url.clone()) {
            primary.push(candidate);
        }
    }
}

/// Global URL dedup: first occurrence in iteration order wins; empty
/// URLs are never collapsed against each other.
fn dedup_by_url(listings: Vec<EvaluatedListing>) -> Vec<EvaluatedListing> {
    let mut seen: HashSet<String> = HashSet::new();
    listings
        .into_iter()
        .filter(|listing| listing.url.is_empty() || seen.insert(listing.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_listing(url: &str, source: SourceId, net_profit: i64) -> EvaluatedListing {
        EvaluatedListing {
            url: url.into(),
            model_key: "test".into(),
            title: "Test Car".into(),
            year: "2004".into(),
            mileage: "89,000".into(),
            location: "Chester".into(),
            source,
            image: "Unknown".into(),
            price: 5_000,
            coordinates: Coordinates::new(53.19, -2.89),
            distance: 19.6,
            expected_resale_price: 7_700,
            net_profit,
            profit_margin: 41.0,
            avg_origin_price: 6_000,
            avg_destination_price: 8_500,
            origin_saving: 1_000,
            destination_margin: 800,
        }
    }

    fn make_candidate(url: &str) -> RawCandidate {
        RawCandidate {
            title: "Test Car".into(),
            price_text: "£5,000".into(),
            location: "Chester".into(),
            year_text: String::new(),
            mileage_text: String::new(),
            url: url.into(),
            image_url: None,
            source: SourceId::AutoTrader,
        }
    }

    #[test]
    fn test_dedup_first_seen_wins_across_sources() {
        // Scenario D: identical non-empty URL via two adapters.
        let shared = "https://example.com/ad/1";
        let deduped = dedup_by_url(vec![
            make_listing(shared, SourceId::AutoTrader, 100),
            make_listing(shared, SourceId::Gumtree, 999),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].source, SourceId::AutoTrader, "first seen wins");
    }

    #[test]
    fn test_dedup_keeps_all_empty_urls() {
        // Scenario E: empty identity key never proves duplication.
        let deduped = dedup_by_url(vec![
            make_listing("", SourceId::AutoTrader, 100),
            make_listing("", SourceId::AutoTrader, 100),
        ]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let input = vec![
            make_listing("https://example.com/ad/1", SourceId::AutoTrader, 100),
            make_listing("https://example.com/ad/1", SourceId::Gumtree, 200),
            make_listing("", SourceId::Gumtree, 300),
            make_listing("", SourceId::PistonHeads, 400),
            make_listing("https://example.com/ad/2", SourceId::Gumtree, 500),
        ];
        let once = dedup_by_url(input);
        let twice = dedup_by_url(once.clone());
        assert_eq!(once.len(), twice.len());
        let urls_once: Vec<&str> = once.iter().map(|l| l.url.as_str()).collect();
        let urls_twice: Vec<&str> = twice.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls_once, urls_twice);
    }

    #[test]
    fn test_merge_candidates_skips_known_urls() {
        let mut primary = vec![make_candidate("https://example.com/ad/1")];
        merge_candidates(
            &mut primary,
            vec![
                make_candidate("https://example.com/ad/1"),
                make_candidate("https://example.com/ad/2"),
                make_candidate(""),
                make_candidate(""),
            ],
        );
        let urls: Vec<&str> = primary.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/ad/1", "https://example.com/ad/2", "", ""]);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 45), 0);
        assert_eq!(percent(23, 45), 51);
        assert_eq!(percent(45, 45), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn test_concurrent_start_rejected() {
        let finder = DealFinder::new(BotConfig::default());
        finder.try_begin().expect("first start must succeed");
        assert!(
            matches!(finder.try_begin(), Err(Error::AlreadyRunning)),
            "second start while running must be rejected"
        );
    }

    #[tokio::test]
    async fn test_demo_run_completes_and_sorts() {
        let finder = DealFinder::new(BotConfig::default());
        let summary = finder
            .start_run(RunMode::Demo)
            .await
            .expect("demo run should complete");

        assert_eq!(finder.state(), RunState::Completed);
        assert!(summary.deal_count > 0, "sample data should yield deals");

        let results = finder.results();
        assert_eq!(results.len(), summary.deal_count);
        for pair in results.windows(2) {
            assert!(
                pair[0].net_profit >= pair[1].net_profit,
                "results must be sorted by descending net profit"
            );
        }

        // The sample Skyline R33 (markup 3500, fixed cost 650) tops the
        // table at £2850 net.
        assert_eq!(results[0].net_profit, 2_850);

        // A second run from Completed is allowed.
        let again = finder.start_run(RunMode::Demo).await.expect("rerun allowed");
        assert_eq!(again.deal_count, summary.deal_count);
    }

    #[tokio::test]
    async fn test_demo_filters_thin_margins() {
        // The IS200 sample nets 700 - 650 = 50, under its £100 floor;
        // the E36 328i nets 150 against a £200 floor. Neither may pass.
        let finder = DealFinder::new(BotConfig::default());
        finder.start_run(RunMode::Demo).await.expect("demo run");
        let results = finder.results();
        assert!(!results.iter().any(|l| l.model_key == "lexus_is200"));
        assert!(!results.iter().any(|l| l.model_key == "bmw_e36_328"));
        assert_eq!(results.len(), 7);
    }
}
