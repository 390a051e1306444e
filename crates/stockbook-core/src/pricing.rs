//! Unit price ↔ total synchronization for the sale entry form.
//!
//! The form shows quantity, unit price and total together. Whichever field
//! the user edited is the source; the other amount is derived from it:
//!
//! ```text
//! edited Quantity | UnitPrice  →  total = quantity × unit price
//! edited Total                 →  unit price = total ÷ quantity  (0 when quantity ≤ 0)
//! ```
//!
//! Because the direction is an argument, a derived value never feeds back
//! into another recomputation.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Item;

/// The field the user just changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditedField {
    Quantity,
    UnitPrice,
    Total,
}

/// The three linked values of the sale form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaleAmounts {
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
}

/// `quantity × unit price`; a non-positive quantity gives zero.
pub fn total_from_price(unit_price: Money, quantity: i64) -> Money {
    if quantity <= 0 {
        return Money::zero();
    }
    unit_price.multiply_quantity(quantity)
}

/// `total ÷ quantity` to the nearest cent; a non-positive quantity gives zero.
pub fn price_from_total(total: Money, quantity: i64) -> Money {
    total.divide_by_quantity(quantity)
}

/// Recomputes the dependent amount after an edit to `edited`.
///
/// ## Example
/// ```rust
/// use stockbook_core::pricing::{sync_amounts, EditedField, SaleAmounts};
/// use stockbook_core::Money;
///
/// let form = SaleAmounts { quantity: 4, unit_price: Money::zero(), total: Money::from_cents(1000) };
/// let synced = sync_amounts(EditedField::Total, form);
/// assert_eq!(synced.unit_price.cents(), 250);
/// ```
pub fn sync_amounts(edited: EditedField, amounts: SaleAmounts) -> SaleAmounts {
    match edited {
        EditedField::Quantity | EditedField::UnitPrice => SaleAmounts {
            total: total_from_price(amounts.unit_price, amounts.quantity),
            ..amounts
        },
        EditedField::Total => SaleAmounts {
            unit_price: price_from_total(amounts.total, amounts.quantity),
            ..amounts
        },
    }
}

/// Form values after choosing `item`: its list price, total derived.
pub fn amounts_for_item(item: &Item, quantity: i64) -> SaleAmounts {
    SaleAmounts {
        quantity,
        unit_price: item.price(),
        total: total_from_price(item.price(), quantity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_from_price() {
        assert_eq!(total_from_price(Money::from_cents(250), 3).cents(), 750);
        assert_eq!(total_from_price(Money::from_cents(250), 0).cents(), 0);
        assert_eq!(total_from_price(Money::from_cents(250), -2).cents(), 0);
    }

    #[test]
    fn test_price_from_total_rounds_to_cent() {
        assert_eq!(price_from_total(Money::from_cents(1000), 3).cents(), 333);
        assert_eq!(price_from_total(Money::from_cents(1000), 0).cents(), 0);
    }

    #[test]
    fn test_sync_direction() {
        let form = SaleAmounts {
            quantity: 2,
            unit_price: Money::from_cents(500),
            total: Money::from_cents(1600),
        };

        let from_price = sync_amounts(EditedField::UnitPrice, form);
        assert_eq!(from_price.unit_price.cents(), 500);
        assert_eq!(from_price.total.cents(), 1000);

        let from_total = sync_amounts(EditedField::Total, form);
        assert_eq!(from_total.unit_price.cents(), 800);
        assert_eq!(from_total.total.cents(), 1600);

        let from_quantity = sync_amounts(EditedField::Quantity, SaleAmounts { quantity: 5, ..form });
        assert_eq!(from_quantity.total.cents(), 2500);
    }

    #[test]
    fn test_amounts_for_item() {
        let item = Item { price_cents: 199, ..Default::default() };
        let amounts = amounts_for_item(&item, 3);
        assert_eq!(amounts.unit_price.cents(), 199);
        assert_eq!(amounts.total.cents(), 597);
    }
}
