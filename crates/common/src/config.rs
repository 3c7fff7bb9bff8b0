//! Bot configuration types.

use serde::{Deserialize, Serialize};

use crate::types::{ModelConfig, YearRange};

/// Top-level bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Origin region the bot buys from.
    #[serde(default)]
    pub origin: OriginConfig,

    /// Arbitrage thresholds.
    #[serde(default)]
    pub arb: ArbConfig,

    /// Scraping behavior parameters.
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Directory for CSV/JSON report output.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// The tracked model catalog.
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
}

/// The origin region (where cars are bought).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginConfig {
    /// Human-readable name.
    #[serde(default = "default_origin_name")]
    pub name: String,

    /// Postcode prefix used by marketplaces with postcode-scoped search.
    #[serde(default = "default_origin_postcode")]
    pub postcode: String,

    /// Latitude.
    #[serde(default = "default_origin_lat")]
    pub lat: f64,

    /// Longitude.
    #[serde(default = "default_origin_lon")]
    pub lon: f64,
}

/// Arbitrage thresholds that apply across all models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbConfig {
    /// Max distance from the origin a listing may sit at, in miles.
    #[serde(default = "default_max_distance")]
    pub max_distance_miles: f64,

    /// Flat per-vehicle overhead (transport, insurance, admin),
    /// subtracted from the markup. Deliberately not scaled by price
    /// or distance.
    #[serde(default = "default_fixed_cost")]
    pub fixed_transaction_cost: i64,
}

/// Scraping behavior parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Requests-per-second cap per marketplace host.
    #[serde(default = "default_requests_per_sec")]
    pub requests_per_sec: u32,

    /// Max candidates taken from a single result page.
    #[serde(default = "default_max_per_page")]
    pub max_candidates_per_page: usize,

    /// When the reliable source returns fewer candidates than this,
    /// retry it once with the model's second search term.
    #[serde(default = "default_supplementary_threshold")]
    pub supplementary_threshold: usize,

    /// Lower bound of the randomized politeness delay between
    /// network-bearing calls, in milliseconds.
    #[serde(default = "default_delay_min_ms")]
    pub politeness_delay_min_ms: u64,

    /// Upper bound of the randomized politeness delay, in milliseconds.
    #[serde(default = "default_delay_max_ms")]
    pub politeness_delay_max_ms: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_output_dir() -> String {
    "./car_deals".into()
}

fn default_origin_name() -> String {
    "Liverpool".into()
}
fn default_origin_postcode() -> String {
    "L1".into()
}
fn default_origin_lat() -> f64 {
    53.4084
}
fn default_origin_lon() -> f64 {
    -2.9916
}

fn default_max_distance() -> f64 {
    200.0
}
fn default_fixed_cost() -> i64 {
    650
}

fn default_request_timeout() -> u64 {
    15
}
fn default_requests_per_sec() -> u32 {
    1
}
fn default_max_per_page() -> usize {
    10
}
fn default_supplementary_threshold() -> usize {
    3
}
fn default_delay_min_ms() -> u64 {
    2000
}
fn default_delay_max_ms() -> u64 {
    5000
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            name: default_origin_name(),
            postcode: default_origin_postcode(),
            lat: default_origin_lat(),
            lon: default_origin_lon(),
        }
    }
}

impl Default for ArbConfig {
    fn default() -> Self {
        Self {
            max_distance_miles: default_max_distance(),
            fixed_transaction_cost: default_fixed_cost(),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            requests_per_sec: default_requests_per_sec(),
            max_candidates_per_page: default_max_per_page(),
            supplementary_threshold: default_supplementary_threshold(),
            politeness_delay_min_ms: default_delay_min_ms(),
            politeness_delay_max_ms: default_delay_max_ms(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            origin: OriginConfig::default(),
            arb: ArbConfig::default(),
            scrape: ScrapeConfig::default(),
            output_dir: default_output_dir(),
            models: default_models(),
        }
    }
}

// ── Default model catalog ─────────────────────────────────────────────

fn model(
    key: &str,
    search_terms: &[&str],
    make: &str,
    model_hint: Option<&str>,
    match_keywords: &[&str],
    exclude_keywords: &[&str],
    max_price: i64,
    markup: i64,
    min_profit: i64,
    year_range: Option<(i32, i32)>,
    avg_origin_price: i64,
    avg_destination_price: i64,
) -> ModelConfig {
    ModelConfig {
        key: key.into(),
        search_terms: search_terms.iter().map(|s| s.to_string()).collect(),
        make: Some(make.into()),
        model_hint: model_hint.map(Into::into),
        match_keywords: match_keywords.iter().map(|s| s.to_string()).collect(),
        exclude_keywords: exclude_keywords.iter().map(|s| s.to_string()).collect(),
        max_price,
        markup,
        min_profit,
        year_range: year_range.map(|(min, max)| YearRange { min, max }),
        avg_origin_price,
        avg_destination_price,
    }
}

/// The drift/race model catalog the bot tracks out of the box.
///
/// Price points reflect the UK → Northern Ireland market as of early
/// 2026. High-volume models carry low profit floors; rare JDM metal
/// needs a real margin to be worth the ferry.
pub fn default_models() -> Vec<ModelConfig> {
    vec![
        // High volume — lower margins but easy to find.
        model(
            "bmw_e46_330",
            &["BMW 330i", "BMW 330ci", "E46 330", "330i Sport", "330ci M Sport"],
            "BMW",
            Some("3 Series"),
            &["330i", "330ci", "e46 330", "330 sport"],
            &[],
            10_000,
            1_000,
            200,
            Some((1999, 2006)),
            5_500,
            6_700,
        ),
        model(
            "lexus_is200",
            &["Lexus IS200", "Lexus IS300", "IS200 Sport", "IS200 manual"],
            "Lexus",
            Some("IS"),
            &["is200", "is300", "is 200", "is 300"],
            &["is220", "is250"],
            6_000,
            700,
            100,
            Some((1999, 2005)),
            3_200,
            4_000,
        ),
        model(
            "bmw_e46_320",
            &["BMW 320i", "BMW 320ci", "E46 320", "320i Sport"],
            "BMW",
            Some("3 Series"),
            &["320i", "320ci", "e46 320"],
            &["330"],
            7_000,
            600,
            100,
            Some((1998, 2006)),
            3_500,
            4_100,
        ),
        model(
            "mazda_mx5",
            &["Mazda MX-5", "Mazda MX5", "Miata", "MX5 1.8"],
            "Mazda",
            Some("MX-5"),
            &["mx-5", "mx5", "miata"],
            &["mx-30"],
            8_000,
            600,
            100,
            None,
            4_500,
            5_100,
        ),
        model(
            "nissan_350z",
            &["Nissan 350Z", "350Z GT", "Nissan 370Z", "350Z manual"],
            "Nissan",
            Some("350Z"),
            &["350z", "370z"],
            &[],
            18_000,
            1_500,
            500,
            Some((2002, 2014)),
            10_000,
            11_800,
        ),
        // Medium value.
        model(
            "bmw_e36_328",
            &["BMW E36 328i", "E36 328i Sport", "E36 328"],
            "BMW",
            Some("3 Series"),
            &["e36 328", "328i"],
            &["e46"],
            8_000,
            800,
            200,
            Some((1995, 1999)),
            4_500,
            5_500,
        ),
        model(
            "honda_civic_type_r",
            &["Honda Civic Type R", "Civic Type-R EP3", "Civic Type-R FN2", "EP3 Type R"],
            "Honda",
            Some("Civic"),
            &["type r", "type-r", "ep3", "fn2"],
            &["fk2", "fk8"],
            16_000,
            1_500,
            500,
            Some((2001, 2011)),
            11_000,
            12_800,
        ),
        model(
            "mazda_rx8",
            &["Mazda RX-8", "Mazda RX8", "RX8 R3"],
            "Mazda",
            Some("RX-8"),
            &["rx-8", "rx8"],
            &["rx-7", "rx7"],
            8_000,
            700,
            200,
            Some((2003, 2012)),
            5_000,
            5_700,
        ),
        // High value — bigger margins but rarer.
        model(
            "bmw_e36_m3",
            &["BMW E36 M3", "E36 M3 Evolution", "E36 M3 3.2", "M3 E36"],
            "BMW",
            Some("M3"),
            &["e36 m3", "m3 evolution", "m3 3.2"],
            &["e46 m3", "e92"],
            22_000,
            2_500,
            1_200,
            Some((1992, 1999)),
            18_000,
            21_000,
        ),
        model(
            "nissan_200sx",
            &["Nissan 200SX", "Nissan Silvia", "200SX S13", "200SX S14", "200SX S15", "Silvia S14"],
            "Nissan",
            Some("200SX"),
            &["200sx", "silvia", "s13", "s14", "s15"],
            &[],
            20_000,
            2_000,
            1_000,
            Some((1988, 2002)),
            14_700,
            17_200,
        ),
        // Premium JDM — rare but high profit.
        model(
            "nissan_skyline_r33",
            &["Nissan Skyline R33", "R33 GTS-T", "Skyline R33", "R33 GTR"],
            "Nissan",
            Some("Skyline"),
            &["r33"],
            &["r32", "r34"],
            35_000,
            3_500,
            2_000,
            Some((1993, 1998)),
            22_000,
            26_000,
        ),
        model(
            "nissan_skyline_r32",
            &["Nissan Skyline R32", "R32 GTR", "R32 GTS-T", "Skyline R32"],
            "Nissan",
            Some("Skyline"),
            &["r32"],
            &["r33", "r34"],
            45_000,
            4_000,
            2_500,
            Some((1989, 1994)),
            35_000,
            40_000,
        ),
        model(
            "mazda_rx7_fd",
            &["Mazda RX-7 FD", "Mazda RX7 FD3S", "RX-7 Import", "FD RX7"],
            "Mazda",
            Some("RX-7"),
            &["rx-7", "rx7", "fd3s"],
            &["fc3s", "rx-8", "rx8"],
            35_000,
            3_500,
            2_000,
            Some((1992, 2002)),
            28_000,
            32_000,
        ),
        model(
            "mazda_rx7_fc",
            &["Mazda RX-7 FC", "Mazda RX7 FC3S", "FC RX7"],
            "Mazda",
            Some("RX-7"),
            &["rx-7", "rx7", "fc3s"],
            &["fd3s", "rx-8", "rx8"],
            12_000,
            1_200,
            600,
            Some((1985, 1992)),
            9_000,
            10_500,
        ),
        model(
            "toyota_supra",
            &["Toyota Supra", "Supra MK4", "Supra Twin Turbo", "Supra NA"],
            "Toyota",
            Some("Supra"),
            &["supra"],
            &["mk5", "a90"],
            60_000,
            5_000,
            3_000,
            Some((1993, 2002)),
            42_000,
            48_000,
        ),
    ]
}
