//! Extraction strategies for marketplace responses.
//!
//! Marketplaces expose no stable API, so candidate listings are
//! recovered through a chain of strategies in fixed priority order,
//! most-structured first:
//!
//! 1. [`embedded`] — serialized application-state blob in the page.
//! 2. [`data_api`] — build-token keyed data-only endpoint (the adapter
//!    performs the single auxiliary request).
//! 3. [`script_json`] — inline script JSON literals.
//! 4. [`markup`] — repeated container elements + text patterns.
//!
//! The first strategy yielding at least one candidate wins; results
//! are never merged across strategies. Every strategy is a pure
//! function of the response text, and a malformed element never aborts
//! the rest of its batch.

pub mod data_api;
pub mod embedded;
pub mod fields;
pub mod markup;
pub mod script_json;

pub use fields::{parse_price, parse_year};
