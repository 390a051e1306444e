//! # Stockbook CLI
//!
//! Command-line front end for the inventory service.
//!
//! ## Usage
//! ```bash
//! # List low-stock items matching "cable", most valuable first
//! stockbook items --query cable --low --sort value
//!
//! # Record a sale of 2 units at 12.50 paid with Yappy
//! stockbook sell 3f2a... 2 12.50 Yappy
//!
//! # Replace the inventory from a CSV file
//! stockbook import inventory.csv
//! ```
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show request-level detail
//! - Default: INFO level

mod args;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use chrono::{Local, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stockbook_core::filter::AlertLevel;
use stockbook_core::stats::{BaselineSource, Trend, TrendDirection};
use stockbook_core::ErrorKind;
use stockbook_store::{HttpStore, Inventory, StockbookConfig};

use crate::args::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = StockbookConfig::load(cli.config).context("loading configuration")?;
    let store = HttpStore::from_config(&config)?;
    let mut inventory = Inventory::new(store).with_top_products(config.report.top_products);

    if let Err(e) = run(cli.command, &mut inventory).await {
        if let Some(store_error) = e.downcast_ref::<stockbook_store::StoreError>() {
            if store_error.kind() == ErrorKind::Unauthorized {
                warn!("Set STOCKBOOK_TOKEN or api.token in the config file");
            }
        }
        return Err(e);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, inventory: &mut Inventory<HttpStore>) -> Result<()> {
    match command {
        Command::Items { query, low, sort } => {
            let query = Command::item_query(query, low, sort);
            inventory.refresh().await?;
            let items = inventory.filtered(&query);
            println!(
                "{:<36}  {:<24}  {:<12}  {:>6}  {:>10}  {}",
                "ID", "NAME", "SKU", "QTY", "PRICE", "LOCATION"
            );
            for item in &items {
                println!(
                    "{:<36}  {:<24}  {:<12}  {:>6}  {:>10}  {}",
                    item.id,
                    item.name,
                    item.sku,
                    item.quantity,
                    item.price().to_string(),
                    item.location
                );
            }
            println!("{} item(s)", items.len());
        }

        Command::Export { out } => {
            inventory.refresh().await?;
            let csv = inventory.export_csv()?;
            match out {
                Some(path) => {
                    write_file(&path, csv.as_bytes())?;
                    info!(path = %path.display(), items = inventory.items().len(), "Inventory exported");
                }
                None => print!("{csv}"),
            }
        }

        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let kept = inventory.import_csv(&text).await?;
            println!("{kept} item(s) imported");
        }

        Command::Stats => {
            inventory.refresh().await?;
            let summary = inventory.summary();
            let trends = inventory.trends(Utc::now());

            println!("Items        {:>12}  {}", summary.item_count, describe(&trends.items));
            println!("Units        {:>12}  {}", summary.total_units, describe(&trends.units));
            println!("Low stock    {:>12}  {}", summary.low_stock_count, describe(&trends.low_stock));
            println!("Stock value  {:>12}  {}", summary.total_value.to_string(), describe(&trends.value));
            println!("Gains        {:>12}  {}", summary.total_cash.to_string(), describe(&trends.cash));
            if let BaselineSource::SalesHistoryApproximation { cutoff } = trends.source {
                println!(
                    "(trends approximated from sales before {})",
                    cutoff.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                );
            }

            let alerts = inventory.low_stock_alerts();
            if !alerts.is_empty() {
                println!();
                println!("Reorder:");
                for alert in alerts {
                    let level = match alert.level {
                        AlertLevel::Out => "OUT",
                        AlertLevel::Low => "low",
                    };
                    println!(
                        "  {:<4} {:<24} {:>4} / {}",
                        level, alert.item.name, alert.item.quantity, alert.item.threshold
                    );
                }
            }
        }

        Command::Report => {
            let report = inventory.remote_weekly_report().await?;
            println!(
                "Week {} → {}",
                report.start.with_timezone(&Local).format("%Y-%m-%d"),
                report.end.with_timezone(&Local).format("%Y-%m-%d")
            );
            println!("  {} sale(s), {} unit(s), {}", report.count, report.units, report.total);
            for row in &report.by_payment {
                println!("  {:<10} {:>12}  ({} sale(s))", row.method.as_str(), row.total.to_string(), row.count);
            }

            inventory.refresh().await?;
            println!();
            println!("Daily totals:");
            for day in inventory.daily_series(&Local::now()) {
                println!("  {}  {:>12}", day.date.format("%a %d/%m"), day.total.to_string());
            }
        }

        Command::Top { n } => {
            inventory.refresh().await?;
            for (rank, top) in inventory.top_products(n).iter().enumerate() {
                println!("{:>2}. {:<24} {:>6} unit(s)", rank + 1, top.item.name, top.units_sold);
            }
        }

        Command::Sell { item, quantity, price, method } => {
            let request = Command::sale_request(item, quantity, price, method);
            let receipt = inventory.record_sale(request).await?;
            println!(
                "Sale {}: {} × {} = {} ({}), {} left",
                receipt.sale.id,
                receipt.sale.quantity,
                receipt.sale.unit_price(),
                receipt.sale.total(),
                receipt.sale.payment_method,
                receipt.item.quantity
            );
        }

        Command::Unsell { sale_id } => {
            let reversal = inventory.delete_sale(&sale_id).await?;
            match reversal.item {
                Some(item) => println!("Sale {} deleted, {} back to {}", reversal.sale.id, item.name, item.quantity),
                None => println!("Sale {} deleted (item no longer exists)", reversal.sale.id),
            }
        }

        Command::Backup { out } => {
            let bytes = inventory.store().download_backup().await?;
            write_file(&out, &bytes)?;
            println!("Backup written to {} ({} bytes)", out.display(), bytes.len());
        }

        Command::Invoice { sale_id, out } => {
            let bytes = inventory.store().download_invoice(&sale_id).await?;
            write_file(&out, &bytes)?;
            println!("Invoice written to {}", out.display());
        }
    }

    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn describe(trend: &Trend) -> String {
    match (trend.direction, trend.percent) {
        (TrendDirection::New, _) => "new".to_string(),
        (TrendDirection::Flat, None) => "-".to_string(),
        (_, Some(percent)) => format!("{percent:+}%"),
        (_, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_trend() {
        let t = |direction, percent| Trend { direction, percent };
        assert_eq!(describe(&t(TrendDirection::New, None)), "new");
        assert_eq!(describe(&t(TrendDirection::Flat, None)), "-");
        assert_eq!(describe(&t(TrendDirection::Up, Some(13))), "+13%");
        assert_eq!(describe(&t(TrendDirection::Down, Some(-50))), "-50%");
    }
}
