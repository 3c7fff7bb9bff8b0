//! Shared HTTP fetch layer for the marketplace adapters.

use common::{Error, Result};
use tracing::debug;

use crate::rate_limit::RateLimiter;

/// Browser-like headers — marketplaces serve a degraded page (or a
/// block page) to clients that look headless.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-GB,en;q=0.5";

/// Rate-limited HTTP client shared by all adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl HttpClient {
    pub fn new(timeout_secs: u64, requests_per_sec: u32) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(2)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            limiter: RateLimiter::per_second(requests_per_sec),
        }
    }

    /// Fetch a page body as text. Non-success statuses are errors so
    /// the adapter's fault-absorption path handles them uniformly with
    /// transport failures.
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        self.limiter.wait().await;

        let mut req = self.client.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }

        let resp = req.send().await.map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http(format!("{} returned status {}", url, status)));
        }

        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        debug!("GET {} -> {} bytes", url, body.len());
        Ok(body)
    }
}
