//! # stockbook-core: Pure Inventory & Sales Logic for Stockbook
//!
//! This crate is the **heart** of Stockbook. It keeps stock quantities and
//! sale history consistent, and derives every statistic and report from the
//! two collections, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (`stockbook`)                       │   │
//! │  │    items ──► sell ──► unsell ──► report ──► export / import     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockbook-store                              │   │
//! │  │    Inventory, SaleLedger, Repository cache, HttpStore           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockbook-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  csv    │ │ filter  │ │  stats  │ │ report  │  │   │
//! │  │   │  Item   │ │ encode  │ │ search  │ │ summary │ │ weekly  │  │   │
//! │  │   │  Sale   │ │ decode  │ │ sort    │ │ trends  │ │ top-N   │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐              │   │
//! │  │   │ ledger  │ │ pricing │ │  money  │ │  clock  │              │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘              │   │
//! │  │                                                                 │   │
//! │  │   no I/O: collections in, values out                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Sale, PaymentMethod)
//! - [`money`] - Integer-cent amounts
//! - [`error`] - Error types, codes and kinds
//! - [`validation`] - Field and item validation
//! - [`clock`] - Timestamp parsing and calendar-day helpers
//! - [`csv`] - Fixed-schema CSV encode/decode for bulk inventory replacement
//! - [`filter`] - Search, low-stock filtering and sorting for views
//! - [`stats`] - Summary counters and period-over-period trends
//! - [`ledger`] - Sale creation / reversal rules
//! - [`pricing`] - Unit price ↔ total synchronization for sale entry
//! - [`report`] - Weekly rollup, daily series, top products
//!
//! ## Ground Rules
//!
//! - Time comes in as a parameter (`now`). `csv::decode` stamps the
//!   current time and `clock::parse_timestamp` reads the local zone; both
//!   have explicit variants (`decode_at`, `parse_timestamp_in`).
//! - Nothing here touches a file, socket or database.
//! - Amounts are [`Money`] cents; decimals appear only at the edges.
//! - A rule violation is a [`CoreError`] returned before any value changes.
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use stockbook_core::ledger::{apply_sale, SaleRequest};
//! use stockbook_core::{Item, Money};
//!
//! let item = Item {
//!     id: "cable".into(),
//!     quantity: 10,
//!     price_cents: 1200,
//!     cost_cents: 800,
//!     ..Default::default()
//! };
//!
//! let request = SaleRequest {
//!     item_id: "cable".into(),
//!     quantity: 3,
//!     price: Money::from_cents(1200),
//!     payment_method: "Efectivo".into(),
//! };
//!
//! let receipt = apply_sale(Some(&item), &request, "sale-1".into(), Utc::now()).unwrap();
//! assert_eq!(receipt.item.quantity, 7);
//! assert_eq!(receipt.sale.total().cents(), 3600);
//! assert_eq!(receipt.sale.gain().cents(), 1200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod csv;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod report;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockbook_core::Money` instead of
// `use stockbook_core::money::Money`

pub use error::{CoreError, CoreResult, ErrorCode, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Status given to items that arrive without one (CSV import, manual entry).
pub const DEFAULT_ITEM_STATUS: &str = "Nuevo";

/// Label shown for a sale whose item has been deleted.
pub const UNKNOWN_ITEM_LABEL: &str = "Unknown";

/// Length of the weekly report window and the daily series, in days.
pub const REPORT_WINDOW_DAYS: i64 = 7;

/// Age, in days, before which sales count towards the approximate trend baseline.
pub const TREND_BASELINE_DAYS: i64 = 7;

/// Default length of the top products ranking.
pub const DEFAULT_TOP_PRODUCTS: usize = 5;
