//! # Filter & Sort
//!
//! Pure search, filtering and ordering over the cached collections.
//! Nothing here mutates its input; every function returns borrowed views.
//!
//! ## Item View Pipeline
//! ```text
//! items ──► text match ──► low-only? ──► sort key ──► Vec<&Item>
//!           (name|sku|       (qty ≤       Name ↑  Quantity ↓
//!            location)       threshold)   Value ↓ Recent ↓
//! ```
//!
//! Every ordering breaks ties by ascending `id`, so equal keys always come
//! out in the same order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{Item, PaymentMethod, Sale};
use crate::UNKNOWN_ITEM_LABEL;

// =============================================================================
// Query Types
// =============================================================================

/// Ordering for the item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Name, ascending, ignoring case.
    Name,
    /// Units on hand, most first.
    Quantity,
    /// Stock value (`quantity × price`), highest first.
    Value,
    /// Most recently updated first.
    #[default]
    Recent,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::Name => "name",
            SortKey::Quantity => "quantity",
            SortKey::Value => "value",
            SortKey::Recent => "recent",
        };
        f.write_str(label)
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "quantity" => Ok(SortKey::Quantity),
            "value" => Ok(SortKey::Value),
            "recent" | "" => Ok(SortKey::Recent),
            other => Err(ValidationError::InvalidFormat {
                field: "sort".to_string(),
                reason: format!("unknown sort key '{other}'"),
            }),
        }
    }
}

/// What the item list should show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemQuery {
    /// Case-insensitive substring of name, SKU or location. Blank matches all.
    pub text: String,
    /// Only items at or below their reorder threshold.
    pub low_only: bool,
    pub sort: SortKey,
}

// =============================================================================
// Item Filtering
// =============================================================================

/// Filters and orders items for display.
///
/// ## Example
/// ```rust
/// use stockbook_core::filter::{apply, ItemQuery, SortKey};
/// use stockbook_core::Item;
///
/// let items = vec![
///     Item { id: "1".into(), name: "Taza".into(), quantity: 9, ..Default::default() },
///     Item { id: "2".into(), name: "Plato".into(), quantity: 3, ..Default::default() },
/// ];
/// let query = ItemQuery { sort: SortKey::Name, ..Default::default() };
/// let names: Vec<_> = apply(&items, &query).iter().map(|i| i.name.as_str()).collect();
/// assert_eq!(names, vec!["Plato", "Taza"]);
/// ```
pub fn apply<'a>(items: &'a [Item], query: &ItemQuery) -> Vec<&'a Item> {
    let needle = query.text.trim().to_lowercase();

    let mut matched: Vec<&Item> = items
        .iter()
        .filter(|item| matches_text(item, &needle))
        .filter(|item| !query.low_only || item.is_low_stock())
        .collect();

    matched.sort_by(|a, b| compare(a, b, query.sort).then_with(|| a.id.cmp(&b.id)));
    matched
}

fn matches_text(item: &Item, needle: &str) -> bool {
    needle.is_empty()
        || item.name.to_lowercase().contains(needle)
        || item.sku.to_lowercase().contains(needle)
        || item.location.to_lowercase().contains(needle)
}

fn compare(a: &Item, b: &Item, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Quantity => b.quantity.cmp(&a.quantity),
        SortKey::Value => b.value().cmp(&a.value()),
        SortKey::Recent => b.updated_at.cmp(&a.updated_at),
    }
}

// =============================================================================
// Low Stock Alerts
// =============================================================================

/// Severity of a low-stock alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AlertLevel {
    /// Nothing left.
    Out,
    /// At or below threshold, but some stock remains.
    Low,
}

/// An item that needs reordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockAlert<'a> {
    pub item: &'a Item,
    pub level: AlertLevel,
}

/// Items with `quantity <= threshold`, emptiest first.
pub fn low_stock_alerts(items: &[Item]) -> Vec<LowStockAlert<'_>> {
    let mut low: Vec<&Item> = items.iter().filter(|item| item.is_low_stock()).collect();
    low.sort_by(|a, b| a.quantity.cmp(&b.quantity).then_with(|| a.id.cmp(&b.id)));

    low.into_iter()
        .map(|item| LowStockAlert {
            item,
            level: if item.quantity == 0 {
                AlertLevel::Out
            } else {
                AlertLevel::Low
            },
        })
        .collect()
}

// =============================================================================
// Sales View
// =============================================================================

/// Display name for the item a sale refers to.
///
/// Deleted items fall back to [`UNKNOWN_ITEM_LABEL`].
pub fn item_label<'a>(items: &'a [Item], item_id: &str) -> &'a str {
    items
        .iter()
        .find(|item| item.id == item_id)
        .map(|item| item.name.as_str())
        .unwrap_or(UNKNOWN_ITEM_LABEL)
}

/// Filters sales by item name and payment method, keeping their order.
///
/// Sales whose item was deleted have no name to match, so they only show
/// up when `text` is blank.
pub fn filter_sales<'a>(
    sales: &'a [Sale],
    items: &[Item],
    text: &str,
    method: Option<PaymentMethod>,
) -> Vec<&'a Sale> {
    let needle = text.trim().to_lowercase();
    let names: HashMap<&str, String> = items
        .iter()
        .map(|item| (item.id.as_str(), item.name.to_lowercase()))
        .collect();

    sales
        .iter()
        .filter(|sale| {
            needle.is_empty()
                || names
                    .get(sale.item_id.as_str())
                    .is_some_and(|name| name.contains(&needle))
        })
        .filter(|sale| method.map_or(true, |m| sale.payment_method == m))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
