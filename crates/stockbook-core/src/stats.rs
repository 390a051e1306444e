//! # Stats & Trends
//!
//! Dashboard counters and their period-over-period trend indicators.
//!
//! ## Counters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  item_count       = |items|                                             │
//! │  total_units      = Σ item.quantity                                     │
//! │  low_stock_count  = |{ item : quantity ≤ threshold }|                   │
//! │  total_value      = Σ item.quantity × item.price                        │
//! │  total_cash       = Σ sale.gain            (all sales, ever)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Baselines
//! A trend compares each counter with a [`Baseline`]. There is no history of
//! item counts, so the usual baseline is an approximation built from sales
//! older than seven days; its [`BaselineSource`] says so, and callers should
//! label it that way. Real snapshots use [`Baseline::from_snapshot`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Item, Sale};
use crate::TREND_BASELINE_DAYS;

// =============================================================================
// Summary
// =============================================================================

/// Dashboard counters over the current collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Summary {
    pub item_count: i64,
    pub total_units: i64,
    pub low_stock_count: i64,
    pub total_value: Money,
    pub total_cash: Money,
}

/// Computes the dashboard counters.
pub fn summarize(items: &[Item], sales: &[Sale]) -> Summary {
    Summary {
        item_count: items.len() as i64,
        total_units: items.iter().map(|item| item.quantity).fold(0, i64::saturating_add),
        low_stock_count: items.iter().filter(|item| item.is_low_stock()).count() as i64,
        total_value: items.iter().map(Item::value).sum(),
        total_cash: sales.iter().map(Sale::gain).sum(),
    }
}

// =============================================================================
// Trend
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
    /// Nothing to compare against, but there is something now.
    New,
}

/// Change of one counter relative to its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Whole percent change; `None` when the baseline is zero.
    pub percent: Option<i64>,
}

/// Compares `current` with `previous`.
///
/// ```text
/// previous = 0, current > 0  →  New,  no percent
/// previous = 0, current ≤ 0  →  Flat, no percent
/// otherwise                  →  percent = round(100 × (current − previous) / previous)
/// ```
/// Halves round toward positive infinity (12.5 → 13, −12.5 → −12).
///
/// ## Example
/// ```rust
/// use stockbook_core::stats::{trend, TrendDirection};
///
/// let up = trend(150, 100);
/// assert_eq!(up.direction, TrendDirection::Up);
/// assert_eq!(up.percent, Some(50));
///
/// assert_eq!(trend(5, 0).direction, TrendDirection::New);
/// assert_eq!(trend(0, 0).direction, TrendDirection::Flat);
/// ```
pub fn trend(current: i64, previous: i64) -> Trend {
    if previous == 0 {
        return Trend {
            direction: if current > 0 {
                TrendDirection::New
            } else {
                TrendDirection::Flat
            },
            percent: None,
        };
    }

    let direction = match current.cmp(&previous) {
        std::cmp::Ordering::Greater => TrendDirection::Up,
        std::cmp::Ordering::Less => TrendDirection::Down,
        std::cmp::Ordering::Equal => TrendDirection::Flat,
    };

    Trend {
        direction,
        percent: Some(percent_change(current, previous)),
    }
}

/// `floor(100 × diff / previous + ½)` in exact integer arithmetic.
fn percent_change(current: i64, previous: i64) -> i64 {
    let diff = current as i128 - previous as i128;
    let mut numerator = 200 * diff + previous as i128;
    let mut denominator = 2 * previous as i128;
    if denominator < 0 {
        numerator = -numerator;
        denominator = -denominator;
    }
    numerator.div_euclid(denominator) as i64
}

// =============================================================================
// Baselines
// =============================================================================

/// Where a baseline's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaselineSource {
    /// A stored copy of the counters at `taken_at`.
    Snapshot { taken_at: DateTime<Utc> },
    /// Built from sales created before `cutoff`. Item count is the current
    /// count and low stock is 0, so those two trends are not meaningful.
    SalesHistoryApproximation { cutoff: DateTime<Utc> },
}

/// The "previous period" side of a trend comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    pub source: BaselineSource,
    pub summary: Summary,
}

impl Baseline {
    /// A baseline from real counters recorded at `taken_at`.
    pub fn from_snapshot(summary: Summary, taken_at: DateTime<Utc>) -> Self {
        Baseline {
            source: BaselineSource::Snapshot { taken_at },
            summary,
        }
    }

    /// Whether these numbers are an estimate rather than a snapshot.
    pub fn is_approximate(&self) -> bool {
        matches!(self.source, BaselineSource::SalesHistoryApproximation { .. })
    }
}

/// Builds the usual baseline from sales strictly older than `now − 7 days`.
///
/// ```text
/// units     = Σ old sale quantity
/// value     = Σ old sale total
/// cash      = Σ old sale gain
/// item_count = current item count
/// low_stock  = 0
/// ```
pub fn approximate_baseline(items: &[Item], sales: &[Sale], now: DateTime<Utc>) -> Baseline {
    let cutoff = now - Duration::days(TREND_BASELINE_DAYS);
    let old: Vec<&Sale> = sales.iter().filter(|sale| sale.created_at < cutoff).collect();

    Baseline {
        source: BaselineSource::SalesHistoryApproximation { cutoff },
        summary: Summary {
            item_count: items.len() as i64,
            total_units: old.iter().map(|sale| sale.quantity).fold(0, i64::saturating_add),
            low_stock_count: 0,
            total_value: old.iter().map(|sale| sale.total()).sum(),
            total_cash: old.iter().map(|sale| sale.gain()).sum(),
        },
    }
}

/// One trend per dashboard counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trends {
    pub source: BaselineSource,
    pub items: Trend,
    pub units: Trend,
    pub low_stock: Trend,
    pub value: Trend,
    pub cash: Trend,
}

/// Compares every counter of `current` with the baseline.
pub fn trends(current: &Summary, baseline: &Baseline) -> Trends {
    let previous = &baseline.summary;

    Trends {
        source: baseline.source,
        items: trend(current.item_count, previous.item_count),
        units: trend(current.total_units, previous.total_units),
        low_stock: trend(current.low_stock_count, previous.low_stock_count),
        value: trend(current.total_value.cents(), previous.total_value.cents()),
        cash: trend(current.total_cash.cents(), previous.total_cash.cents()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    fn sale(quantity: i64, price: i64, cost: i64, created_at: DateTime<Utc>) -> Sale {
        Sale {
            id: format!("s-{quantity}-{price}"),
            item_id: "x".into(),
            quantity,
            unit_price_cents: price,
            cost_unit_cents: cost,
            payment_method: PaymentMethod::Efectivo,
            created_at,
        }
    }

    #[test]
    fn test_summarize() {
        let items = vec![
            Item { id: "a".into(), quantity: 4, price_cents: 250, threshold: 1, ..Default::default() },
            Item { id: "b".into(), quantity: 2, price_cents: 1000, threshold: 2, ..Default::default() },
        ];
        let sales = vec![sale(2, 500, 300, now()), sale(1, 100, 150, now())];

        let summary = summarize(&items, &sales);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_units, 6);
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.total_value.cents(), 3000);
        assert_eq!(summary.total_cash.cents(), 350);
    }

    #[test]
    fn test_summarize_saturates_on_unvalidated_data() {
        let items = vec![
            Item { id: "a".into(), quantity: i64::MAX, price_cents: 200, ..Default::default() },
            Item { id: "b".into(), quantity: i64::MAX, price_cents: 1, ..Default::default() },
        ];
        let sales = vec![sale(i64::MAX, 500, 0, now()), sale(i64::MAX, 500, 0, now())];

        let summary = summarize(&items, &sales);
        assert_eq!(summary.total_units, i64::MAX);
        assert_eq!(summary.total_value.cents(), i64::MAX);
        assert_eq!(summary.total_cash.cents(), i64::MAX);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[], &[]), Summary::default());
    }

    #[test]
    fn test_trend_zero_baseline() {
        assert_eq!(trend(5, 0), Trend { direction: TrendDirection::New, percent: None });
        assert_eq!(trend(0, 0), Trend { direction: TrendDirection::Flat, percent: None });
        assert_eq!(trend(-3, 0).direction, TrendDirection::Flat);
    }

    #[test]
    fn test_trend_percent() {
        assert_eq!(trend(150, 100), Trend { direction: TrendDirection::Up, percent: Some(50) });
        assert_eq!(trend(50, 100), Trend { direction: TrendDirection::Down, percent: Some(-50) });
        assert_eq!(trend(7, 7), Trend { direction: TrendDirection::Flat, percent: Some(0) });
        assert_eq!(trend(2, 3).percent, Some(-33));
    }

    #[test]
    fn test_trend_half_rounds_up() {
        // 100 × 1/8 = 12.5
        assert_eq!(trend(9, 8).percent, Some(13));
        // 100 × −1/8 = −12.5
        assert_eq!(trend(7, 8).percent, Some(-12));
    }

    #[test]
    fn test_approximate_baseline_uses_old_sales_only() {
        let items = vec![Item { id: "a".into(), ..Default::default() }];
        let cutoff = now() - Duration::days(7);
        let sales = vec![
            sale(2, 500, 300, cutoff - Duration::seconds(1)),
            sale(3, 100, 0, cutoff),
            sale(1, 900, 100, now()),
        ];

        let baseline = approximate_baseline(&items, &sales, now());
        assert!(baseline.is_approximate());
        assert_eq!(baseline.source, BaselineSource::SalesHistoryApproximation { cutoff });
        assert_eq!(baseline.summary.item_count, 1);
        assert_eq!(baseline.summary.total_units, 2);
        assert_eq!(baseline.summary.total_value.cents(), 1000);
        assert_eq!(baseline.summary.total_cash.cents(), 400);
        assert_eq!(baseline.summary.low_stock_count, 0);
    }

    #[test]
    fn test_trends_against_snapshot() {
        let previous = Summary {
            item_count: 4,
            total_units: 10,
            low_stock_count: 0,
            total_value: Money::from_cents(1000),
            total_cash: Money::from_cents(200),
        };
        let current = Summary {
            item_count: 5,
            total_units: 5,
            low_stock_count: 2,
            total_value: Money::from_cents(1000),
            total_cash: Money::from_cents(300),
        };
        let baseline = Baseline::from_snapshot(previous, now());

        let t = trends(&current, &baseline);
        assert!(!baseline.is_approximate());
        assert_eq!(t.items.percent, Some(25));
        assert_eq!(t.units.direction, TrendDirection::Down);
        assert_eq!(t.low_stock.direction, TrendDirection::New);
        assert_eq!(t.value.direction, TrendDirection::Flat);
        assert_eq!(t.cash.percent, Some(50));
    }
}
