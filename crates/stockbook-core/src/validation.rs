//! # Validation
//!
//! Field rules for items, sale quantities and search text.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Item form / CSV row / bulk upload                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_item        name, sku, location present                       │
//! │       │               quantity, price, costUnit, threshold in range     │
//! │       ▼                                                                 │
//! │  validate_unique_sku  against every other item                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store                (applies the same rules again, authoritatively)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sale requests are checked in [`crate::ledger::validate_request`], which
//! uses [`validate_quantity`].

use crate::error::ValidationError;
use crate::types::Item;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest accepted unit count (stock, threshold, sale quantity).
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest accepted amount in cents ($10,000,000.00). With [`MAX_QUANTITY`]
/// a single line amount stays well inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000;

const MAX_SKU_LEN: usize = 64;
const MAX_NAME_LEN: usize = 200;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// Text Fields
// =============================================================================

fn check_length(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn require(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    check_length(field, value, max)
}

/// A SKU is required and at most 64 characters once trimmed.
///
/// ```rust
/// use stockbook_core::validation::validate_sku;
///
/// assert!(validate_sku("CAB-HDMI-2M").is_ok());
/// assert!(validate_sku("  ").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    require("sku", sku, MAX_SKU_LEN)
}

pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    require("name", name, MAX_NAME_LEN)
}

/// Where the stock is kept. Same rules as a name.
pub fn validate_location(location: &str) -> ValidationResult<()> {
    require("location", location, MAX_NAME_LEN)
}

/// Trims item-list search text. Blank is fine and matches every item.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    check_length("query", query, MAX_QUERY_LEN)?;
    Ok(query.to_string())
}

// =============================================================================
// Numbers
// =============================================================================

/// Units in a sale: at least one, at most [`MAX_QUANTITY`].
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    validate_at_most("quantity", qty, MAX_QUANTITY)
}

/// Stock on hand, thresholds and amounts may be zero, never below.
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn validate_at_most(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    if value > max {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// A unit count between 0 and [`MAX_QUANTITY`].
pub fn validate_count(field: &str, value: i64) -> ValidationResult<()> {
    validate_non_negative(field, value)?;
    validate_at_most(field, value, MAX_QUANTITY)
}

/// An amount in cents between 0 and [`MAX_AMOUNT_CENTS`].
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    validate_non_negative(field, cents)?;
    validate_at_most(field, cents, MAX_AMOUNT_CENTS)
}

/// ```rust
/// use stockbook_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-1).is_err());
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    validate_amount_cents("price", cents)
}

// =============================================================================
// Items
// =============================================================================

/// Validates every field of an item before it is created or updated.
///
/// Checks run in field order and stop at the first failure.
pub fn validate_item(item: &Item) -> ValidationResult<()> {
    validate_item_name(&item.name)?;
    validate_sku(&item.sku)?;
    validate_location(&item.location)?;
    validate_count("quantity", item.quantity)?;
    validate_price_cents(item.price_cents)?;
    validate_amount_cents("costUnit", item.cost_cents)?;
    validate_count("threshold", item.threshold)?;
    Ok(())
}

/// Rejects `candidate` when another item (different id) already uses its SKU.
///
/// SKUs compare after trimming, case-sensitively.
pub fn validate_unique_sku(existing: &[Item], candidate: &Item) -> ValidationResult<()> {
    let sku = candidate.sku.trim();
    let taken = existing
        .iter()
        .any(|other| other.id != candidate.id && other.sku.trim() == sku);

    if taken {
        return Err(ValidationError::Duplicate {
            field: "sku".to_string(),
            value: sku.to_string(),
        });
    }
    Ok(())
}
