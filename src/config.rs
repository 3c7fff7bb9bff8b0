//! Configuration loader — merges defaults, config.toml, and env vars.

use common::{BotConfig, Error, Result};
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{} must be an integer > 0", env_name)))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{} must be an integer > 0", env_name)));
    }
    Ok(parsed)
}

fn parse_non_negative_i64(raw: &str, env_name: &str) -> Result<i64> {
    let parsed = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::Config(format!("{} must be an integer >= 0", env_name)))?;
    if parsed < 0 {
        return Err(Error::Config(format!("{} must be an integer >= 0", env_name)));
    }
    Ok(parsed)
}

fn parse_positive_f64(raw: &str, env_name: &str) -> Result<f64> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{} must be a number > 0", env_name)))?;
    if parsed <= 0.0 {
        return Err(Error::Config(format!("{} must be a number > 0", env_name)));
    }
    Ok(parsed)
}

fn validate_config(config: &BotConfig) -> Result<()> {
    let mut issues: Vec<String> = Vec::new();

    if config.origin.name.trim().is_empty() {
        issues.push("origin.name must not be empty".into());
    }
    if config.origin.postcode.trim().is_empty() {
        issues.push("origin.postcode must not be empty".into());
    }
    if !(-90.0..=90.0).contains(&config.origin.lat) {
        issues.push("origin.lat must be within [-90, 90]".into());
    }
    if !(-180.0..=180.0).contains(&config.origin.lon) {
        issues.push("origin.lon must be within [-180, 180]".into());
    }

    if config.arb.max_distance_miles <= 0.0 {
        issues.push("arb.max_distance_miles must be > 0".into());
    }
    if config.arb.fixed_transaction_cost < 0 {
        issues.push("arb.fixed_transaction_cost must be >= 0".into());
    }

    if config.scrape.request_timeout_secs == 0 {
        issues.push("scrape.request_timeout_secs must be > 0".into());
    }
    if config.scrape.requests_per_sec == 0 {
        issues.push("scrape.requests_per_sec must be > 0".into());
    }
    if config.scrape.max_candidates_per_page == 0 {
        issues.push("scrape.max_candidates_per_page must be > 0".into());
    }
    if config.scrape.politeness_delay_min_ms > config.scrape.politeness_delay_max_ms {
        issues.push("scrape.politeness_delay_min_ms must be <= politeness_delay_max_ms".into());
    }

    if config.models.is_empty() {
        issues.push("models must contain at least one model".into());
    }
    let mut seen_keys = std::collections::HashSet::new();
    for model in &config.models {
        let key = &model.key;
        if key.trim().is_empty() {
            issues.push("every model needs a non-empty key".into());
            continue;
        }
        if !seen_keys.insert(key.clone()) {
            issues.push(format!("duplicate model key '{}'", key));
        }
        if model.search_terms.is_empty() {
            issues.push(format!("{}: search_terms must not be empty", key));
        }
        if model.max_price <= 0 {
            issues.push(format!("{}: max_price must be > 0", key));
        }
        if model.markup < 0 {
            issues.push(format!("{}: markup must be >= 0", key));
        }
        if model.min_profit < 0 {
            issues.push(format!("{}: min_profit must be >= 0", key));
        }
        if let Some(range) = &model.year_range {
            if range.min > range.max {
                issues.push(format!("{}: year_range.min must be <= year_range.max", key));
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load bot configuration from defaults, an optional config file, and
/// environment overrides (highest priority).
pub fn load_config() -> Result<BotConfig> {
    // 1. Load .env if present.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = BotConfig::default();

    // 3. Overlay config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Environment overrides.
    if let Ok(raw) = std::env::var("CARARB_OUTPUT_DIR") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.output_dir = trimmed.to_string();
        }
    }
    if let Ok(raw) = std::env::var("CARARB_MAX_DISTANCE_MILES") {
        config.arb.max_distance_miles = parse_positive_f64(&raw, "CARARB_MAX_DISTANCE_MILES")?;
    }
    if let Ok(raw) = std::env::var("CARARB_FIXED_TRANSACTION_COST") {
        config.arb.fixed_transaction_cost =
            parse_non_negative_i64(&raw, "CARARB_FIXED_TRANSACTION_COST")?;
    }
    if let Ok(raw) = std::env::var("CARARB_REQUEST_TIMEOUT_SECS") {
        config.scrape.request_timeout_secs =
            parse_positive_u64(&raw, "CARARB_REQUEST_TIMEOUT_SECS")?;
    }
    if let Ok(raw) = std::env::var("CARARB_DELAY_MIN_MS") {
        config.scrape.politeness_delay_min_ms = parse_positive_u64(&raw, "CARARB_DELAY_MIN_MS")?;
    }
    if let Ok(raw) = std::env::var("CARARB_DELAY_MAX_MS") {
        config.scrape.politeness_delay_max_ms = parse_positive_u64(&raw, "CARARB_DELAY_MAX_MS")?;
    }
    if let Ok(raw) = std::env::var("CARARB_SUPPLEMENTARY_THRESHOLD") {
        config.scrape.supplementary_threshold =
            parse_non_negative_i64(&raw, "CARARB_SUPPLEMENTARY_THRESHOLD")? as usize;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BotConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_collects_issues() {
        let mut config = BotConfig::default();
        config.origin.name = String::new();
        config.arb.max_distance_miles = 0.0;
        config.scrape.politeness_delay_min_ms = 9_000;

        let err = validate_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("origin.name"));
        assert!(message.contains("max_distance_miles"));
        assert!(message.contains("politeness_delay_min_ms"));
    }

    #[test]
    fn test_duplicate_model_keys_rejected() {
        let mut config = BotConfig::default();
        let dup = config.models[0].clone();
        config.models.push(dup);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate model key"));
    }

    #[test]
    fn test_year_range_order_checked() {
        let mut config = BotConfig::default();
        config.models[0].year_range = Some(common::YearRange { min: 2006, max: 1999 });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_env_parsers() {
        assert_eq!(parse_positive_u64("15", "X").unwrap(), 15);
        assert!(parse_positive_u64("0", "X").is_err());
        assert!(parse_positive_u64("abc", "X").is_err());
        assert_eq!(parse_non_negative_i64("0", "X").unwrap(), 0);
        assert!(parse_non_negative_i64("-1", "X").is_err());
        assert!(parse_positive_f64("-2.5", "X").is_err());
    }
}
