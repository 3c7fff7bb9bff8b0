//! Drives the extraction strategy chain over one marketplace response.
//!
//! Strategies run in fixed priority order; the first to yield any
//! candidates wins and later strategies are not consulted, so a page
//! matching several methods is never double-counted.

use common::{RawCandidate, SourceId};
use extractors::{data_api, embedded, markup, script_json};
use tracing::{debug, warn};

use crate::http::HttpClient;

/// Run the chain over `content`. The data-API strategy may issue the
/// one permitted auxiliary request through `http`.
pub async fn run(
    http: &HttpClient,
    base_url: &str,
    content: &str,
    source: SourceId,
) -> Vec<RawCandidate> {
    // 1. Embedded application-state blob.
    let found = embedded::extract(content, source);
    if !found.is_empty() {
        debug!("{}: embedded strategy won ({})", source.label(), found.len());
        return found;
    }

    // 2. Build-token keyed data endpoint.
    if let Some(token) = data_api::build_token(content) {
        let url = format!("{}{}", base_url, data_api::data_path(&token));
        match http.get_text(&url, &[]).await {
            Ok(body) => {
                let found = data_api::extract_payload(&body, source);
                if !found.is_empty() {
                    debug!("{}: data-api strategy won ({})", source.label(), found.len());
                    return found;
                }
            }
            Err(e) => {
                // Aux endpoint failure just demotes us to the next
                // strategy; the primary response is still in hand.
                warn!("{}: data-api request failed: {}", source.label(), e);
            }
        }
    }

    // 3. Inline script JSON literals.
    let found = script_json::extract(content, source);
    if !found.is_empty() {
        debug!("{}: script-literal strategy won ({})", source.label(), found.len());
        return found;
    }

    // 4. Markup structure.
    let found = markup::extract(content, source);
    if !found.is_empty() {
        debug!("{}: markup strategy won ({})", source.label(), found.len());
    }
    found
}
