//! # Sale Ledger Rules
//!
//! The consistency rules between stock and sale history, as pure functions.
//! The store applies the results atomically; this module only decides what
//! they are.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleRequest { item_id, quantity, price, payment_method }               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_request          quantity > 0          → MustBePositive       │
//! │       │                    quantity ≤ MAX        → TooLarge             │
//! │       │                    method not blank      → Required             │
//! │       │                    method recognized     → UnknownPaymentMethod │
//! │       │                    price ≥ 0             → Negative             │
//! │       │                    price ≤ MAX           → TooLarge             │
//! │       ▼                                                                 │
//! │  apply_sale                item exists           → ItemNotFound         │
//! │       │                    quantity ≤ stock      → InsufficientStock    │
//! │       ▼                                                                 │
//! │  SaleReceipt { sale (cost snapshot), item (stock − quantity) }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conservation
//! For every item still present, `quantity + Σ sold units` is unchanged by
//! any [`apply_sale`] / [`reverse_sale`] pair. A rejected request changes
//! nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Item, PaymentMethod, Sale};
use crate::validation::{validate_price_cents, validate_quantity};

// =============================================================================
// Request / Result Types
// =============================================================================

/// What the sale form submits.
///
/// `payment_method` stays raw text until validated so an unrecognized value
/// gets its own error instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub item_id: String,
    pub quantity: i64,
    /// Unit price charged.
    pub price: Money,
    pub payment_method: String,
}

/// A recorded sale together with the item it changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub item: Item,
}

/// A deleted sale together with the restored item, if it still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReversal {
    pub sale: Sale,
    pub item: Option<Item>,
}

// =============================================================================
// Rules
// =============================================================================

/// Checks the request shape, in a fixed order, and returns the parsed
/// payment method.
///
/// No item lookup happens here, so a malformed request can be rejected
/// before anything is sent to the store.
pub fn validate_request(request: &SaleRequest) -> CoreResult<PaymentMethod> {
    validate_quantity(request.quantity)?;

    if request.payment_method.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "paymentMethod".to_string(),
        }
        .into());
    }
    let method: PaymentMethod = request.payment_method.parse()?;

    validate_price_cents(request.price.cents())?;

    if request.item_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "itemId".to_string(),
        }
        .into());
    }

    Ok(method)
}

/// Records a sale against `item`.
///
/// Returns the new sale, with the item's current unit cost frozen into it,
/// and the item with its stock reduced and `updated_at = now`. On any error
/// nothing is produced and the caller's item is untouched.
pub fn apply_sale(
    item: Option<&Item>,
    request: &SaleRequest,
    sale_id: String,
    now: DateTime<Utc>,
) -> CoreResult<SaleReceipt> {
    let payment_method = validate_request(request)?;

    let item = item
        .filter(|item| item.id == request.item_id)
        .ok_or_else(|| CoreError::ItemNotFound(request.item_id.clone()))?;

    if !item.can_sell(request.quantity) {
        return Err(CoreError::InsufficientStock {
            sku: item.sku.clone(),
            available: item.quantity,
            requested: request.quantity,
        });
    }

    let mut updated = item.clone();
    updated.adjust_stock(-request.quantity, now)?;

    let sale = Sale {
        id: sale_id,
        item_id: item.id.clone(),
        quantity: request.quantity,
        unit_price_cents: request.price.cents(),
        cost_unit_cents: item.cost_cents,
        payment_method,
        created_at: now,
    };

    debug!(
        sale_id = %sale.id,
        item_id = %sale.item_id,
        quantity = sale.quantity,
        remaining = updated.quantity,
        "Sale applied"
    );

    Ok(SaleReceipt { sale, item: updated })
}

/// Restores the stock a sale took.
///
/// Returns `None` when the item has since been deleted; the sale can still
/// be removed, there is just nothing to restore.
pub fn reverse_sale(sale: &Sale, item: Option<&Item>, now: DateTime<Utc>) -> Option<Item> {
    let item = item.filter(|item| item.id == sale.item_id)?;

    let mut restored = item.clone();
    restored.quantity = restored.quantity.saturating_add(sale.quantity);
    restored.updated_at = now;

    debug!(
        sale_id = %sale.id,
        item_id = %restored.id,
        quantity = restored.quantity,
        "Sale reversed"
    );

    Some(restored)
}

// =============================================================================
// Unit Tests
// =============================================================================
