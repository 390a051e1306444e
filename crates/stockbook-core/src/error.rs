//! # Errors
//!
//! What can go wrong inside the pure rules, and how each failure is
//! classified for callers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──#[from]──► CoreError ──#[from]──► StoreError         │
//! │  (one bad field)              (ledger rule)          (stockbook-store)  │
//! │                                   │                                     │
//! │                                   ├── code() → ErrorCode  (wire form)   │
//! │                                   └── kind() → ErrorKind  (handling)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `CoreError` is raised before anything is mutated, so the caller's
//! collections are exactly as they were.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Error Taxonomy
// =============================================================================

/// Broad error category, used to decide how a failure is handled.
///
/// ```text
/// Validation   → report immediately, no retry, nothing was mutated
/// NotFound     → report, no retry
/// Unauthorized → drop the session, no retry
/// Transport    → generic failure, re-fetch to reconcile
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Transport,
}

/// Machine-readable error codes.
///
/// These travel on the wire (`{"error": "...", "code": "INSUFFICIENT_STOCK"}`)
/// so a caller can render a precise message rather than a generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    DuplicateSku,
    ItemNotFound,
    SaleNotFound,
    /// Not found, entity unspecified (bare 404 from the service).
    NotFound,
    InsufficientStock,
    NegativeStock,
    UnknownPaymentMethod,
    /// Missing or rejected credential.
    Unauthorized,
    /// Transport or store failure.
    Internal,
}

impl ErrorCode {
    /// The category this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::ItemNotFound | ErrorCode::SaleNotFound | ErrorCode::NotFound => {
                ErrorKind::NotFound
            }
            ErrorCode::Unauthorized => ErrorKind::Unauthorized,
            ErrorCode::Internal => ErrorKind::Transport,
            ErrorCode::ValidationError
            | ErrorCode::DuplicateSku
            | ErrorCode::InsufficientStock
            | ErrorCode::NegativeStock
            | ErrorCode::UnknownPaymentMethod => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// A stock or sale rule refused the operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No item with this id, either never created or deleted since the
    /// cache was loaded.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// The sale asks for more units than the item has.
    ///
    /// ```text
    /// sell 5 of CAB-HDMI ──► on hand: 3 ──► InsufficientStock { available: 3, requested: 5 }
    ///                                        stock stays 3, no sale row
    /// ```
    #[error("Not enough {sku} in stock: {available} left, {requested} requested")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// A stock adjustment would push quantity below zero.
    ///
    /// Quantities are never clamped; the adjustment is refused instead.
    #[error("Stock for {sku} cannot go negative: current {current}, change {delta}")]
    NegativeStock { sku: String, current: i64, delta: i64 },

    #[error("Unknown payment method: '{0}'")]
    UnknownPaymentMethod(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The CSV writer failed while building an export.
    #[error("CSV error: {0}")]
    Csv(String),
}

impl CoreError {
    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ItemNotFound(_) => ErrorCode::ItemNotFound,
            CoreError::SaleNotFound(_) => ErrorCode::SaleNotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::NegativeStock { .. } => ErrorCode::NegativeStock,
            CoreError::UnknownPaymentMethod(_) => ErrorCode::UnknownPaymentMethod,
            CoreError::Validation(ValidationError::Duplicate { .. }) => ErrorCode::DuplicateSku,
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::Csv(_) => ErrorCode::Internal,
        }
    }

    /// Error category (validation vs not-found).
    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// One field of an item, sale request or query is unusable.
///
/// `field` uses the wire name (`costUnit`, `paymentMethod`) so messages match
/// what the user typed into.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} is longer than {max} characters")]
    TooLong { field: String, max: usize },

    /// Zero is allowed (free items, empty shelves).
    #[error("{field} cannot be negative")]
    Negative { field: String },

    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Rejected, never clamped.
    #[error("{field} cannot exceed {max}")]
    TooLarge { field: String, max: i64 },

    #[error("{field} is not valid: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Another item already uses this value.
    #[error("{field} '{value}' is already used by another item")]
    Duplicate { field: String, value: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
