//! Domain types shared across the bot.

use serde::{Deserialize, Serialize};

// ── Geography ─────────────────────────────────────────────────────────

/// An approximate lat/lon pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

// ── Sources ───────────────────────────────────────────────────────────

/// One marketplace family supplying candidate listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    AutoTrader,
    Gumtree,
    PistonHeads,
}

impl SourceId {
    /// Display name used in reports and logs.
    pub fn label(&self) -> &'static str {
        match self {
            SourceId::AutoTrader => "AutoTrader",
            SourceId::Gumtree => "Gumtree",
            SourceId::PistonHeads => "PistonHeads",
        }
    }
}

// ── Model catalog ─────────────────────────────────────────────────────

/// Inclusive first/last model-year bounds for a tracked model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// Per-model search terms and profitability expectations.
///
/// Loaded once at startup and never mutated. Prices are whole currency
/// units (GBP).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Unique model key, e.g. `bmw_e46_330`.
    pub key: String,

    /// Ordered search terms; the first is the primary query, the second
    /// feeds the supplementary pass.
    pub search_terms: Vec<String>,

    /// Manufacturer hint for marketplaces with structured make filters.
    #[serde(default)]
    pub make: Option<String>,

    /// Model-range hint for marketplaces with structured model filters.
    #[serde(default)]
    pub model_hint: Option<String>,

    /// Keywords identifying this model on mixed-model pages
    /// (case-insensitive substring match against the title).
    #[serde(default)]
    pub match_keywords: Vec<String>,

    /// Keywords that disqualify a title — used to separate
    /// similar-looking trims or generations sharing a search term.
    #[serde(default)]
    pub exclude_keywords: Vec<String>,

    /// Price ceiling at origin.
    pub max_price: i64,

    /// Expected uplift when reselling at the destination.
    pub markup: i64,

    /// Minimum acceptable net profit for a deal.
    pub min_profit: i64,

    /// Acceptable model-year window, when the model key is
    /// generation-specific.
    #[serde(default)]
    pub year_range: Option<YearRange>,

    /// Reference average price at origin (informational).
    #[serde(default)]
    pub avg_origin_price: i64,

    /// Reference average price at destination (informational).
    #[serde(default)]
    pub avg_destination_price: i64,
}

// ── Listings ──────────────────────────────────────────────────────────

/// An unvalidated record pulled out of one marketplace response.
///
/// Produced and consumed within a single adapter call; all text fields
/// are verbatim page content and may be empty or garbled.
#[derive(Debug, Clone)]
pub struct RawCandidate {
    pub title: String,
    pub price_text: String,
    pub location: String,
    pub year_text: String,
    pub mileage_text: String,
    pub url: String,
    pub image_url: Option<String>,
    pub source: SourceId,
}

impl RawCandidate {
    /// An empty candidate for a source — fields are filled in by the
    /// extraction strategies as they find them.
    pub fn empty(source: SourceId) -> Self {
        Self {
            title: String::new(),
            price_text: String::new(),
            location: String::new(),
            year_text: String::new(),
            mileage_text: String::new(),
            url: String::new(),
            image_url: None,
            source,
        }
    }
}

/// Sentinel for descriptive fields that could not be recovered.
pub const UNKNOWN: &str = "Unknown";

/// A fully normalized and scored listing.
///
/// Every derived field is computed exactly once when the normalizer
/// constructs the value; nothing is recomputed in place afterwards.
/// The `url` is the dedup identity — an empty url is never treated as
/// a duplicate of anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedListing {
    pub url: String,
    pub model_key: String,
    pub title: String,
    pub year: String,
    pub mileage: String,
    pub location: String,
    pub source: SourceId,
    pub image: String,

    /// Asking price in whole currency units; 0 means unparseable.
    pub price: i64,
    pub coordinates: Coordinates,
    /// Great-circle distance from the origin, in miles.
    pub distance: f64,

    /// `price + model.markup`.
    pub expected_resale_price: i64,
    /// `model.markup - fixed_transaction_cost`. Not a function of price.
    pub net_profit: i64,
    /// `net_profit / price * 100`, or 0 when price is 0.
    pub profit_margin: f64,

    pub avg_origin_price: i64,
    pub avg_destination_price: i64,
    /// How far below the origin average this listing is priced.
    pub origin_saving: i64,
    /// Room left under the destination average after resale markup.
    pub destination_margin: i64,
}
