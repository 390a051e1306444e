//! # Inventory Store Contract
//!
//! What the client needs from the authoritative store of items and sales.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        InventoryStore                                   │
//! │                                                                         │
//! │  Items                                 Sales                            │
//! │  ─────                                 ─────                            │
//! │  list_items                            list_sales                       │
//! │  create_item   (insert or replace)     record_sale  → SaleReceipt       │
//! │  update_item   (must exist)            delete_sale  → SaleReversal      │
//! │  delete_item   (must exist)                                             │
//! │  replace_items (bulk, returns list)    weekly_report                    │
//! │                                                                         │
//! │  Every mutation returns the post-mutation state. record_sale and        │
//! │  delete_sale change stock and history as one atomic unit.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations: [`crate::http::HttpStore`] for the REST service and
//! [`crate::memory::MemoryStore`] for in-process use and tests.

use stockbook_core::ledger::{SaleReceipt, SaleRequest, SaleReversal};
use stockbook_core::report::WeeklyReport;
use stockbook_core::{Item, Sale};

use crate::error::StoreResult;

/// The authoritative store of items and sales.
///
/// Callers use it through generics (`Inventory<S: InventoryStore>`), never
/// as a trait object.
#[allow(async_fn_in_trait)]
pub trait InventoryStore {
    /// All items, in the store's order.
    async fn list_items(&self) -> StoreResult<Vec<Item>>;

    /// Inserts `item`, replacing any item with the same id.
    async fn create_item(&self, item: Item) -> StoreResult<Item>;

    /// Replaces an existing item. Fails with not-found when its id is unknown.
    async fn update_item(&self, item: Item) -> StoreResult<Item>;

    /// Removes an item. Its sales stay in the history.
    async fn delete_item(&self, id: &str) -> StoreResult<()>;

    /// Replaces the whole item collection and returns what was kept.
    async fn replace_items(&self, items: Vec<Item>) -> StoreResult<Vec<Item>>;

    /// All sales, newest first.
    async fn list_sales(&self) -> StoreResult<Vec<Sale>>;

    /// Records a sale and decrements the item's stock atomically.
    async fn record_sale(&self, request: &SaleRequest) -> StoreResult<SaleReceipt>;

    /// Deletes a sale and restores its stock if the item still exists.
    async fn delete_sale(&self, id: &str) -> StoreResult<SaleReversal>;

    /// Sales totals for the seven full days before today.
    async fn weekly_report(&self) -> StoreResult<WeeklyReport>;
}
