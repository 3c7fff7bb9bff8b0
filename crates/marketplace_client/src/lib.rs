//! Marketplace source adapters.
//!
//! One adapter per marketplace family. Each builds its family's query,
//! issues exactly one primary request (plus at most one auxiliary
//! request for the data-API strategy), drives the extraction chain,
//! and absorbs transport faults — a source outage is zero candidates,
//! never an error.

pub mod autotrader;
pub mod chain;
pub mod gumtree;
pub mod http;
pub mod pistonheads;
pub mod rate_limit;
mod sources;

pub use autotrader::AutoTraderSource;
pub use gumtree::GumtreeSource;
pub use http::HttpClient;
pub use pistonheads::PistonHeadsSource;
pub use rate_limit::RateLimiter;
pub use sources::{default_sources, Source};

/// Resolve a page-relative link against a marketplace base URL.
pub(crate) fn absolutize(url: &str, base_url: &str) -> String {
    if url.is_empty() || url.starts_with("http") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{}", rest)
    } else if url.starts_with('/') {
        format!("{}{}", base_url, url)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize() {
        let base = "https://www.autotrader.co.uk";
        assert_eq!(
            absolutize("/car-details/1", base),
            "https://www.autotrader.co.uk/car-details/1"
        );
        assert_eq!(
            absolutize("https://elsewhere.example/x", base),
            "https://elsewhere.example/x"
        );
        assert_eq!(absolutize("//cdn.example/i.jpg", base), "https://cdn.example/i.jpg");
        assert_eq!(absolutize("", base), "");
    }
}
