//! Strategy 1 — embedded application-state extraction.
//!
//! Modern marketplace pages ship a serialized state blob for client
//! hydration. It is the most reliable thing on the page: field names
//! drift, but the blob stays machine-readable long after the markup
//! has been redesigned.

use common::{RawCandidate, SourceId};
use serde_json::Value;
use tracing::debug;

use crate::fields::{balanced_json_slice, collect_candidates};

/// Assignment markers state blobs have been observed under.
const STATE_MARKERS: &[&str] = &[
    "window.__APP_STATE__",
    "window.__PRELOADED_STATE__",
    "window.__INITIAL_STATE__",
    "__INITIAL_DATA__",
];

/// Extract candidates from an embedded state blob, if the page has one.
pub fn extract(content: &str, source: SourceId) -> Vec<RawCandidate> {
    for marker in STATE_MARKERS {
        let Some(marker_at) = content.find(marker) else {
            continue;
        };
        let tail = &content[marker_at + marker.len()..];

        // The blob follows the first `=` after the marker.
        let Some(eq_at) = tail.find('=') else {
            continue;
        };
        let after_eq = &tail[eq_at + 1..];
        let Some(open_at) = after_eq.find(|c| c == '{' || c == '[') else {
            continue;
        };

        let Some(blob) = balanced_json_slice(after_eq, open_at) else {
            debug!("state blob under {} is unterminated, trying next marker", marker);
            continue;
        };

        match serde_json::from_str::<Value>(blob) {
            Ok(value) => {
                let mut out = Vec::new();
                collect_candidates(&value, source, &mut out);
                if !out.is_empty() {
                    debug!(
                        "embedded state blob under {} yielded {} candidates",
                        marker,
                        out.len()
                    );
                    return out;
                }
            }
            Err(e) => {
                debug!("state blob under {} is not valid JSON: {}", marker, e);
            }
        }
    }
    Vec::new()
}
