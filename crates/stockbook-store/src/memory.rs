//! # In-Process Store
//!
//! A complete [`InventoryStore`] held in memory. Both collections sit
//! behind one `tokio::sync::Mutex`, so every call (and in particular the
//! stock change + sale insert of a sale) is atomic with respect to every
//! other call.
//!
//! It applies the same rules the REST service does: item validation, unique
//! SKUs, not-found on update/delete of unknown items, and the sale ledger
//! rules from `stockbook_core::ledger`.

use chrono::{Local, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use stockbook_core::ledger::{apply_sale, reverse_sale, SaleReceipt, SaleRequest, SaleReversal};
use stockbook_core::report::{self, WeeklyReport};
use stockbook_core::validation::{validate_item, validate_unique_sku};
use stockbook_core::{CoreError, Item, Sale};

use crate::error::StoreResult;
use crate::store::InventoryStore;

#[derive(Debug, Default)]
struct State {
    items: Vec<Item>,
    sales: Vec<Sale>,
}

/// In-memory inventory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `items` and `sales` as given, unvalidated.
    pub fn with_data(items: Vec<Item>, sales: Vec<Sale>) -> Self {
        MemoryStore {
            state: Mutex::new(State { items, sales }),
        }
    }
}

/// Trims the text fields the way the store normalizes them.
fn normalize(mut item: Item) -> Item {
    item.name = item.name.trim().to_string();
    item.sku = item.sku.trim().to_string();
    item.location = item.location.trim().to_string();
    if item.id.trim().is_empty() {
        item.id = Uuid::new_v4().to_string();
    }
    item
}

impl InventoryStore for MemoryStore {
    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        let state = self.state.lock().await;
        let mut items = state.items.clone();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn create_item(&self, item: Item) -> StoreResult<Item> {
        let item = normalize(item);
        validate_item(&item)?;

        let mut state = self.state.lock().await;
        validate_unique_sku(&state.items, &item)?;

        match state.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => state.items.insert(0, item.clone()),
        }

        info!(item_id = %item.id, sku = %item.sku, "Item saved");
        Ok(item)
    }

    async fn update_item(&self, item: Item) -> StoreResult<Item> {
        let item = normalize(item);
        validate_item(&item)?;

        let mut state = self.state.lock().await;
        if !state.items.iter().any(|existing| existing.id == item.id) {
            return Err(CoreError::ItemNotFound(item.id).into());
        }
        validate_unique_sku(&state.items, &item)?;

        if let Some(existing) = state.items.iter_mut().find(|existing| existing.id == item.id) {
            *existing = item.clone();
        }

        info!(item_id = %item.id, "Item updated");
        Ok(item)
    }

    async fn delete_item(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let before = state.items.len();
        state.items.retain(|item| item.id != id);

        if state.items.len() == before {
            return Err(CoreError::ItemNotFound(id.to_string()).into());
        }

        info!(item_id = %id, "Item deleted");
        Ok(())
    }

    async fn replace_items(&self, items: Vec<Item>) -> StoreResult<Vec<Item>> {
        let mut kept: Vec<Item> = Vec::with_capacity(items.len());

        for item in items.into_iter().map(normalize) {
            if let Err(e) = validate_item(&item) {
                warn!(item_id = %item.id, sku = %item.sku, error = %e, "Dropping invalid item from bulk replace");
                continue;
            }
            if let Err(e) = validate_unique_sku(&kept, &item) {
                warn!(item_id = %item.id, error = %e, "Dropping duplicate SKU from bulk replace");
                continue;
            }
            match kept.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => *existing = item,
                None => kept.push(item),
            }
        }

        let mut state = self.state.lock().await;
        state.items = kept.clone();

        info!(count = kept.len(), "Items replaced");
        Ok(kept)
    }

    async fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        let state = self.state.lock().await;
        let mut sales = state.sales.clone();
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(sales)
    }

    async fn record_sale(&self, request: &SaleRequest) -> StoreResult<SaleReceipt> {
        let mut state = self.state.lock().await;

        let position = state.items.iter().position(|item| item.id == request.item_id);
        let receipt = apply_sale(
            position.map(|i| &state.items[i]),
            request,
            Uuid::new_v4().to_string(),
            Utc::now(),
        )?;

        // apply_sale only succeeds when the item was found
        if let Some(i) = position {
            state.items[i] = receipt.item.clone();
        }
        state.sales.insert(0, receipt.sale.clone());

        info!(
            sale_id = %receipt.sale.id,
            item_id = %receipt.item.id,
            quantity = receipt.sale.quantity,
            "Sale recorded"
        );
        Ok(receipt)
    }

    async fn delete_sale(&self, id: &str) -> StoreResult<SaleReversal> {
        let mut state = self.state.lock().await;

        let index = state
            .sales
            .iter()
            .position(|sale| sale.id == id)
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;
        let sale = state.sales.remove(index);

        let position = state.items.iter().position(|item| item.id == sale.item_id);
        let restored = reverse_sale(&sale, position.map(|i| &state.items[i]), Utc::now());
        if let (Some(i), Some(item)) = (position, &restored) {
            state.items[i] = item.clone();
        }

        if restored.is_none() {
            debug!(sale_id = %sale.id, item_id = %sale.item_id, "Item already deleted, no stock to restore");
        }
        info!(sale_id = %sale.id, "Sale deleted");

        Ok(SaleReversal { sale, item: restored })
    }

    async fn weekly_report(&self) -> StoreResult<WeeklyReport> {
        let state = self.state.lock().await;
        Ok(report::weekly_report(&state.sales, &Local::now()))
    }
}
