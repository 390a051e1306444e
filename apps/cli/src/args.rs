//! Command-line definition.
//!
//! ```text
//! stockbook [--config PATH] <command> [options]
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stockbook_core::filter::{ItemQuery, SortKey};
use stockbook_core::ledger::SaleRequest;
use stockbook_core::validation::validate_search_query;
use stockbook_core::Money;

#[derive(Debug, Parser)]
#[command(name = "stockbook")]
#[command(about = "Inventory and sales against the Stockbook service")]
#[command(version)]
#[command(arg_required_else_help = true)]
#[command(after_help = "\
Environment:
  STOCKBOOK_API_URL, STOCKBOOK_TOKEN, STOCKBOOK_TIMEOUT_SECS,
  STOCKBOOK_TOP_PRODUCTS, RUST_LOG")]
pub struct Cli {
    /// Config file (default: the per-user config directory)
    #[arg(long, short = 'c', global = true, env = "STOCKBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum Command {
    /// List items
    #[command(after_help = "\
Examples:
  stockbook items --query cable --low --sort value")]
    Items {
        /// Case-insensitive match on name, SKU or location
        #[arg(long, short = 'q', default_value = "", value_parser = parse_query_text)]
        query: String,

        /// Only items at or below their reorder threshold
        #[arg(long)]
        low: bool,

        /// name | quantity | value | recent
        #[arg(long, short = 's', default_value = "recent")]
        sort: SortKey,
    },

    /// Write the inventory as CSV (stdout by default)
    Export {
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Replace the inventory with a CSV file
    Import { file: PathBuf },

    /// Dashboard counters and trends
    Stats,

    /// Weekly report and daily totals
    Report,

    /// Best-selling items
    Top { n: Option<usize> },

    /// Record a sale
    #[command(after_help = "\
Examples:
  stockbook sell 3f2a... 2 12.50 Yappy")]
    Sell {
        item: String,

        quantity: i64,

        #[arg(value_parser = parse_price)]
        price: Money,

        /// Efectivo | Yappy
        method: String,
    },

    /// Delete a sale and restore its stock
    Unsell { sale_id: String },

    /// Download a store backup
    Backup {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },

    /// Download a sale invoice
    Invoice {
        sale_id: String,

        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

impl Command {
    /// The item-list query of an `items` command.
    pub fn item_query(query: String, low: bool, sort: SortKey) -> ItemQuery {
        ItemQuery {
            text: query,
            low_only: low,
            sort,
        }
    }

    /// The sale request of a `sell` command.
    pub fn sale_request(item: String, quantity: i64, price: Money, method: String) -> SaleRequest {
        SaleRequest {
            item_id: item,
            quantity,
            price,
            payment_method: method,
        }
    }
}

fn parse_query_text(text: &str) -> Result<String, String> {
    validate_search_query(text).map_err(|e| e.to_string())
}

fn parse_price(text: &str) -> Result<Money, String> {
    Money::parse_decimal(text).ok_or_else(|| format!("invalid price '{text}'"))
}
