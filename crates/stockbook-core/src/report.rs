//! # Reports
//!
//! Time-windowed rollups over the sale history.
//!
//! ## Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   now = Wed 15:00 (local)                                               │
//! │                                                                         │
//! │   weekly_report:   [ Wed 00:00 − 7 days , Wed 00:00 )                   │
//! │                      start included       end excluded                  │
//! │                                                                         │
//! │   daily_series:    Thu Fri Sat Sun Mon Tue Wed   (7 dates, oldest first)│
//! │                    each sale lands on the local date of created_at      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function takes `now` in the zone the report should be read in.
//! Production callers pass `chrono::Local::now()`; tests pin a fixed offset.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::clock::{local_date, midnight, start_of_day};
use crate::money::Money;
use crate::types::{Item, PaymentMethod, Sale};
use crate::REPORT_WINDOW_DAYS;

// =============================================================================
// Payment Breakdown
// =============================================================================

/// Totals for one payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentTotal {
    pub method: PaymentMethod,
    pub total: Money,
    pub count: i64,
    pub units: i64,
}

/// One row per payment method present in `sales`, largest total first,
/// ties by method name.
pub fn payment_totals<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Vec<PaymentTotal> {
    let mut rows: HashMap<PaymentMethod, PaymentTotal> = HashMap::new();

    for sale in sales {
        let row = rows.entry(sale.payment_method).or_insert(PaymentTotal {
            method: sale.payment_method,
            total: Money::zero(),
            count: 0,
            units: 0,
        });
        row.total += sale.total();
        row.count += 1;
        row.units = row.units.saturating_add(sale.quantity);
    }

    let mut rows: Vec<PaymentTotal> = rows.into_values().collect();
    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.method.as_str().cmp(b.method.as_str()))
    });
    rows
}

// =============================================================================
// Weekly Report
// =============================================================================

/// Sales totals for the seven full days before today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeeklyReport {
    /// First instant of the window (included).
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    /// Start of today (excluded).
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
    pub total: Money,
    pub count: i64,
    pub units: i64,
    pub by_payment: Vec<PaymentTotal>,
}

/// The `[start, end)` window ending at the start of `now`'s day.
pub fn weekly_window<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = start_of_day(now);
    let start = end
        .date_naive()
        .checked_sub_days(Days::new(REPORT_WINDOW_DAYS as u64))
        .and_then(|date| midnight(date, &now.timezone()))
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| end.with_timezone(&Utc) - chrono::Duration::days(REPORT_WINDOW_DAYS));

    (start, end.with_timezone(&Utc))
}

/// Rolls up the sales inside [`weekly_window`].
pub fn weekly_report<Tz: TimeZone>(sales: &[Sale], now: &DateTime<Tz>) -> WeeklyReport {
    let (start, end) = weekly_window(now);
    let in_window: Vec<&Sale> = sales
        .iter()
        .filter(|sale| start <= sale.created_at && sale.created_at < end)
        .collect();

    WeeklyReport {
        start,
        end,
        total: in_window.iter().map(|sale| sale.total()).sum(),
        count: in_window.len() as i64,
        units: in_window.iter().map(|sale| sale.quantity).fold(0, i64::saturating_add),
        by_payment: payment_totals(in_window.iter().copied()),
    }
}

// =============================================================================
// Daily Series
// =============================================================================

/// Sales total for one local calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyTotal {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total: Money,
}

/// Seven daily totals ending today, oldest first. Days without sales are 0.
pub fn daily_series<Tz: TimeZone>(sales: &[Sale], now: &DateTime<Tz>) -> Vec<DailyTotal> {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut by_date: HashMap<NaiveDate, Money> = HashMap::new();
    for sale in sales {
        *by_date.entry(local_date(&sale.created_at, &tz)).or_default() += sale.total();
    }

    (0..REPORT_WINDOW_DAYS as u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| DailyTotal {
            date,
            total: by_date.get(&date).copied().unwrap_or_default(),
        })
        .collect()
}

// =============================================================================
// Top Products
// =============================================================================

/// An item ranked by units sold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopProduct<'a> {
    pub item: &'a Item,
    pub units_sold: i64,
}

/// Best sellers by units, most first, ties by ascending item id.
///
/// Sales of deleted items are ignored; only current items can rank.
pub fn top_products<'a>(items: &'a [Item], sales: &[Sale], n: usize) -> Vec<TopProduct<'a>> {
    let mut units: HashMap<&str, i64> = HashMap::new();
    for sale in sales {
        let sold = units.entry(sale.item_id.as_str()).or_default();
        *sold = sold.saturating_add(sale.quantity);
    }

    let mut ranked: Vec<TopProduct<'a>> = items
        .iter()
        .filter_map(|item| {
            units.get(item.id.as_str()).map(|&units_sold| TopProduct {
                item,
                units_sold,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.units_sold
            .cmp(&a.units_sold)
            .then_with(|| a.item.id.cmp(&b.item.id))
    });
    ranked.truncate(n);
    ranked
}

// =============================================================================
// Unit Tests
// =============================================================================
