//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐          ┌─────────────────┐                       │
//! │  │      Item       │   weak   │      Sale       │                       │
//! │  │  ─────────────  │ ◄─────── │  ─────────────  │                       │
//! │  │  id             │  item_id │  id             │                       │
//! │  │  sku (business) │          │  quantity (> 0) │                       │
//! │  │  quantity (≥ 0) │          │  unit_price     │                       │
//! │  │  price_cents    │          │  cost_unit      │  (snapshot)           │
//! │  │  cost_cents     │          │  payment_method │                       │
//! │  │  threshold      │          │  total() gain() │  (derived)            │
//! │  └─────────────────┘          └─────────────────┘                       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │ PaymentMethod   │                                                    │
//! │  │  Efectivo       │                                                    │
//! │  │  Yappy          │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Weak References
//! A sale keeps the `item_id` it was recorded against, nothing more. Items
//! can be deleted while their sales stay in the history; views render those
//! sales with [`crate::UNKNOWN_ITEM_LABEL`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::DEFAULT_ITEM_STATUS;

// =============================================================================
// Item
// =============================================================================

/// A stock-keeping unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    /// Opaque unique identifier (UUID v4 when generated locally).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit - business identifier, unique across items.
    pub sku: String,

    /// Units on hand. Never negative.
    pub quantity: i64,

    /// Where the stock is kept (shelf, room, warehouse).
    pub location: String,

    /// Unit sale price in cents.
    pub price_cents: i64,

    /// Unit cost in cents (0 when unknown).
    pub cost_cents: i64,

    /// Reorder trigger: the item is low when `quantity <= threshold`.
    pub threshold: i64,

    pub description: String,

    pub image_url: String,

    /// Free-form status label ("Nuevo", "Usado", ...).
    pub status: String,

    /// When the item was last mutated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Default for Item {
    fn default() -> Self {
        Item {
            id: String::new(),
            name: String::new(),
            sku: String::new(),
            quantity: 0,
            location: String::new(),
            price_cents: 0,
            cost_cents: 0,
            threshold: 0,
            description: String::new(),
            image_url: String::new(),
            status: DEFAULT_ITEM_STATUS.to_string(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

impl Item {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the unit cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Stock value at sale price (`quantity × price`).
    #[inline]
    pub fn value(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }

    /// Whether the item is at or below its reorder threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }

    /// Checks if `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.quantity
    }

    /// Applies a stock change, refusing any result below zero.
    ///
    /// ```text
    /// quantity 3, delta -5  →  Err(NegativeStock)  (quantity stays 3)
    /// quantity 3, delta +2  →  Ok, quantity 5
    /// quantity i64::MAX, +1 →  Err(TooLarge)
    /// ```
    pub fn adjust_stock(&mut self, delta: i64, now: DateTime<Utc>) -> CoreResult<()> {
        let next = self.quantity.checked_add(delta).ok_or_else(|| ValidationError::TooLarge {
            field: "quantity".to_string(),
            max: i64::MAX,
        })?;
        if next < 0 {
            return Err(CoreError::NegativeStock {
                sku: self.sku.clone(),
                current: self.quantity,
                delta,
            });
        }

        self.quantity = next;
        self.updated_at = now;
        Ok(())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    /// Cash.
    Efectivo,
    /// Yappy mobile transfer.
    Yappy,
}

impl PaymentMethod {
    /// Every recognized method, in display order.
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Efectivo, PaymentMethod::Yappy];

    /// The label used on the wire and in reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Efectivo => "Efectivo",
            PaymentMethod::Yappy => "Yappy",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, surrounding whitespace ignored.
impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::UnknownPaymentMethod(trimmed.to_string()))
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of one transaction.
///
/// `total` and `gain` are computed from the stored fields on every call, so
/// they always agree with `quantity`, `unit_price_cents` and the cost
/// snapshot taken when the sale was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// The item sold (weak reference; the item may since have been deleted).
    pub item_id: String,

    /// Units sold. Always positive.
    pub quantity: i64,

    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Unit cost in cents at time of sale (frozen).
    pub cost_unit_cents: i64,

    pub payment_method: PaymentMethod,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the unit cost snapshot as Money.
    #[inline]
    pub fn cost_unit(&self) -> Money {
        Money::from_cents(self.cost_unit_cents)
    }

    /// `quantity × unit price`.
    #[inline]
    pub fn total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// `quantity × (unit price − unit cost)`. Negative when sold below cost.
    #[inline]
    pub fn gain(&self) -> Money {
        (self.unit_price() - self.cost_unit()).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn widget(quantity: i64) -> Item {
        Item {
            id: "item-1".into(),
            name: "Widget".into(),
            sku: "W-1".into(),
            quantity,
            price_cents: 250,
            threshold: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_item_default_status() {
        assert_eq!(Item::default().status, "Nuevo");
    }

    #[test]
    fn test_item_value_and_low_stock() {
        let item = widget(4);
        assert_eq!(item.value().cents(), 1000);
        assert!(!item.is_low_stock());
        assert!(widget(2).is_low_stock());
        assert!(widget(0).is_low_stock());
    }

    #[test]
    fn test_adjust_stock_refuses_negative() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut item = widget(3);

        let err = item.adjust_stock(-5, now).unwrap_err();
        assert!(matches!(err, CoreError::NegativeStock { current: 3, delta: -5, .. }));
        assert_eq!(item.quantity, 3);
        assert_eq!(item.updated_at, DateTime::<Utc>::default());

        item.adjust_stock(-3, now).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.updated_at, now);
    }

    #[test]
    fn test_adjust_stock_refuses_overflow() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut item = widget(i64::MAX - 1);

        let err = item.adjust_stock(2, now).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::TooLarge { .. })));
        assert_eq!(item.quantity, i64::MAX - 1);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("Efectivo".parse::<PaymentMethod>().unwrap(), PaymentMethod::Efectivo);
        assert_eq!("  yappy ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Yappy);
        assert!(matches!(
            "Visa".parse::<PaymentMethod>(),
            Err(CoreError::UnknownPaymentMethod(m)) if m == "Visa"
        ));
    }

    #[test]
    fn test_payment_method_wire_format() {
        let json = serde_json::to_string(&PaymentMethod::Yappy).unwrap();
        assert_eq!(json, "\"Yappy\"");
    }

    #[test]
    fn test_sale_derived_amounts() {
        let sale = Sale {
            id: "s1".into(),
            item_id: "item-1".into(),
            quantity: 3,
            unit_price_cents: 500,
            cost_unit_cents: 350,
            payment_method: PaymentMethod::Efectivo,
            created_at: Utc::now(),
        };
        assert_eq!(sale.total().cents(), 1500);
        assert_eq!(sale.gain().cents(), 450);

        let below_cost = Sale {
            cost_unit_cents: 600,
            ..sale
        };
        assert_eq!(below_cost.gain().cents(), -300);
    }
}
