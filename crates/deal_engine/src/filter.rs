//! The arbitrage deal predicate.

use common::{EvaluatedListing, ModelConfig};

/// Whether a scored listing qualifies as a deal.
///
/// Pure and order-independent: everything it needs is stored on the
/// listing and the model, so the decision can be re-derived without
/// re-running extraction.
pub fn is_deal(listing: &EvaluatedListing, model: &ModelConfig, max_distance_miles: f64) -> bool {
    listing.price > 0
        && listing.price <= model.max_price
        && listing.distance <= max_distance_miles
        && listing.net_profit >= model.min_profit
}
