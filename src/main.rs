//! Car arbitrage bot entry point.
//!
//! Scans UK classified-ad marketplaces for drift/race cars that can be
//! bought near the origin region and resold at a profit in Northern
//! Ireland, then writes CSV/JSON reports of the qualifying deals.

mod config;
mod demo;
mod progress;
mod report;
mod runner;

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use crate::config::load_config;
use crate::runner::{DealFinder, RunMode};

/// Car arbitrage finder — origin region to Northern Ireland.
#[derive(Parser)]
#[command(name = "car-arb-bot", about = "Finds profitable second-hand car arbitrage deals")]
struct Cli {
    /// Evaluate the built-in sample data instead of scraping live.
    #[arg(long)]
    demo: bool,

    /// Output base name (without extension); defaults to a timestamped
    /// name under the configured output directory.
    #[arg(long)]
    output: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "car_arb_bot=info,marketplace_client=info,deal_engine=info,extractors=info".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    info!("Car Arbitrage Bot starting...");

    let cfg = match load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.check_config {
        info!(
            "Config OK: {} models, origin {}, radius {} miles, fixed cost £{}",
            cfg.models.len(),
            cfg.origin.name,
            cfg.arb.max_distance_miles,
            cfg.arb.fixed_transaction_cost
        );
        return;
    }

    info!(
        "Origin: {} ({}) | radius {} miles | fixed cost £{} per car",
        cfg.origin.name, cfg.origin.postcode, cfg.arb.max_distance_miles, cfg.arb.fixed_transaction_cost
    );
    info!("Tracking {} models", cfg.models.len());

    let base_name = cli.output.clone().unwrap_or_else(|| {
        format!(
            "{}/deals_{}",
            cfg.output_dir.trim_end_matches('/'),
            Utc::now().format("%Y%m%d_%H%M%S")
        )
    });

    let mode = if cli.demo {
        info!("Running in DEMO mode with sample data");
        RunMode::Demo
    } else {
        RunMode::Live
    };

    let finder = DealFinder::new(cfg);
    let summary = match finder.start_run(mode).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Run failed: {}", e);
            std::process::exit(1);
        }
    };

    let deals = finder.results();
    report::log_summary(&deals);

    if deals.is_empty() {
        info!("Nothing to export.");
        return;
    }

    let csv_path = PathBuf::from(format!("{}.csv", base_name));
    let json_path = PathBuf::from(format!("{}.json", base_name));
    if let Err(e) = report::export_csv(&csv_path, &deals) {
        error!("CSV export failed: {}", e);
    }
    if let Err(e) = report::export_json(&json_path, &deals) {
        error!("JSON export failed: {}", e);
    }

    info!(
        "Run finished in {:.1}s: {} deals, £{} total potential profit",
        summary.elapsed.as_secs_f64(),
        summary.deal_count,
        summary.total_profit
    );
}
