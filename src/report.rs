//! Report writers.
//!
//! Consume the published result set read-only; nothing here feeds back
//! into scoring. CSV for spreadsheets, JSON for anything programmatic.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::Path;

use common::{EvaluatedListing, Error, Result};
use tracing::info;

const CSV_HEADER: &str = "Model,Title,Buy Price,Avg Origin Price,Origin Saving,\
                          Expected Sell Price,Avg Destination Price,Net Profit,\
                          Profit Margin,Location,Distance (miles),Year,Mileage,Source,URL";

/// Render an amount as `£1,234` with thousands separators.
pub fn format_gbp(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-£{}", grouped)
    } else {
        format!("£{}", grouped)
    }
}

/// Quote a CSV field when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write the deal table as CSV, best deals first (caller sorts).
pub fn export_csv(path: &Path, deals: &[EvaluatedListing]) -> Result<()> {
    if let Some(dir) = path.parent() {
        create_dir_all(dir)?;
    }
    let mut file = File::create(path)?;
    writeln!(file, "{}", CSV_HEADER)?;

    for deal in deals {
        let row = [
            csv_field(&deal.model_key),
            csv_field(&deal.title),
            csv_field(&format_gbp(deal.price)),
            csv_field(&format_gbp(deal.avg_origin_price)),
            csv_field(&format_gbp(deal.origin_saving)),
            csv_field(&format_gbp(deal.expected_resale_price)),
            csv_field(&format_gbp(deal.avg_destination_price)),
            csv_field(&format_gbp(deal.net_profit)),
            csv_field(&format!("{:.1}%", deal.profit_margin)),
            csv_field(&deal.location),
            csv_field(&format!("{:.1}", deal.distance)),
            csv_field(&deal.year),
            csv_field(&deal.mileage),
            csv_field(deal.source.label()),
            csv_field(&deal.url),
        ];
        writeln!(file, "{}", row.join(","))?;
    }

    info!("CSV exported: {}", path.display());
    Ok(())
}

/// Write the deal table as pretty JSON.
pub fn export_json(path: &Path, deals: &[EvaluatedListing]) -> Result<()> {
    if let Some(dir) = path.parent() {
        create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(deals)
        .map_err(|e| Error::Report(format!("serializing deals: {}", e)))?;
    std::fs::write(path, json)?;
    info!("JSON exported: {}", path.display());
    Ok(())
}

/// Log the run summary and the top opportunities.
pub fn log_summary(deals: &[EvaluatedListing]) {
    if deals.is_empty() {
        info!("No profitable deals found matching criteria");
        return;
    }

    let total: i64 = deals.iter().map(|d| d.net_profit).sum();
    let average = total / deals.len() as i64;
    info!("Deals found: {}", deals.len());
    info!("Total potential profit: {}", format_gbp(total));
    info!("Average profit per car: {}", format_gbp(average));

    for (i, deal) in deals.iter().take(5).enumerate() {
        info!(
            "{}. {} — buy {} sell {} net {} ({:.1}%) — {} ({:.1} mi) — {}",
            i + 1,
            deal.title,
            format_gbp(deal.price),
            format_gbp(deal.expected_resale_price),
            format_gbp(deal.net_profit),
            deal.profit_margin,
            deal.location,
            deal.distance,
            deal.url
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_gbp() {
        assert_eq!(format_gbp(0), "£0");
        assert_eq!(format_gbp(950), "£950");
        assert_eq!(format_gbp(9500), "£9,500");
        assert_eq!(format_gbp(1234567), "£1,234,567");
        assert_eq!(format_gbp(-450), "-£450");
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("Chester, Cheshire"), "\"Chester, Cheshire\"");
        assert_eq!(csv_field("3.0 \"Evo\""), "\"3.0 \"\"Evo\"\"\"");
    }
}
