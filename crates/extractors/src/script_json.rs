//! Strategy 3 — inline script-literal extraction.
//!
//! Older page templates assign result data straight to a script
//! variable instead of a framework state blob. A small set of known
//! assignment patterns covers what the tracked marketplaces ship.

use common::{RawCandidate, SourceId};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::fields::{balanced_json_slice, collect_candidates};

lazy_static! {
    static ref ASSIGN_RE: Regex = Regex::new(
        r"(?:var|let|const|window\.)\s*(?:adData|searchResults|listingData|listings|pageData|resultsData)\s*=\s*"
    )
    .expect("static regex");
}

/// Extract candidates from script-embedded JSON literals.
///
/// Every matching assignment is tried; literals that fail to parse are
/// skipped without aborting the scan.
pub fn extract(content: &str, source: SourceId) -> Vec<RawCandidate> {
    let mut out = Vec::new();

    for m in ASSIGN_RE.find_iter(content) {
        let after = &content[m.end()..];
        let Some(open_at) = after.find(|c| c == '{' || c == '[') else {
            continue;
        };
        // Assignments separated from their literal by real code are
        // not ours.
        if !after[..open_at].trim().is_empty() {
            continue;
        }
        let Some(literal) = balanced_json_slice(after, open_at) else {
            continue;
        };
        match serde_json::from_str::<Value>(literal) {
            Ok(value) => collect_candidates(&value, source, &mut out),
            Err(e) => debug!("script literal failed to parse: {}", e),
        }
    }

    out
}
