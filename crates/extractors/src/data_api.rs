//! Strategy 2 — side-channel data-API extraction.
//!
//! Pages built on hydration frameworks expose a build token; the same
//! framework serves a data-only JSON twin of every page under a path
//! keyed by that token. This module is the pure half of the strategy:
//! token discovery and payload parsing. The single auxiliary request
//! itself is made by the source adapter.

use common::{RawCandidate, SourceId};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::fields::collect_candidates;

lazy_static! {
    static ref BUILD_ID_RE: Regex =
        Regex::new(r#""buildId"\s*:\s*"([A-Za-z0-9_.-]+)""#).expect("static regex");
}

/// Recover the build/version token from a page, if it exposes one.
pub fn build_token(content: &str) -> Option<String> {
    BUILD_ID_RE
        .captures(content)
        .map(|c| c[1].to_string())
}

/// The predictable data-only path for a search page under `token`.
pub fn data_path(token: &str) -> String {
    format!("/_next/data/{}/search.json", token)
}

/// Parse the auxiliary response body with the shared payload walker.
pub fn extract_payload(body: &str, source: SourceId) -> Vec<RawCandidate> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            let mut out = Vec::new();
            collect_candidates(&value, source, &mut out);
            out
        }
        Err(e) => {
            debug!("data-api payload is not valid JSON: {}", e);
            Vec::new()
        }
    }
}
