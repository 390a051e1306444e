//! # Sale Ledger Service
//!
//! Records and deletes sales through the store and keeps the local cache in
//! step with what the store answers.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleRequest                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_request (local)  ── malformed ──► error, nothing sent         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.record_sale         ── one request, stock − qty and sale insert  │
//! │       │                       happen atomically in the store            │
//! │       ▼                                                                 │
//! │  cache: upsert sale, upsert item (authoritative copies)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is written to the cache unless the store call succeeded, so a
//! failed sale leaves the cache exactly as it was.

use tracing::info;

use stockbook_core::ledger::{validate_request, SaleReceipt, SaleRequest, SaleReversal};
use stockbook_core::ValidationError;

use crate::error::LedgerResult;
use crate::repository::Repository;
use crate::store::InventoryStore;

/// Sale operations against one store.
pub struct SaleLedger<'s, S> {
    store: &'s S,
}

impl<'s, S: InventoryStore> SaleLedger<'s, S> {
    pub fn new(store: &'s S) -> Self {
        SaleLedger { store }
    }

    /// Records a sale and patches `cache` with the returned sale and item.
    pub async fn record_sale(
        &self,
        cache: &mut Repository,
        request: SaleRequest,
    ) -> LedgerResult<SaleReceipt> {
        validate_request(&request)?;

        let receipt = self.store.record_sale(&request).await?;

        cache.upsert_sale(receipt.sale.clone());
        cache.upsert_item(receipt.item.clone());

        info!(
            sale_id = %receipt.sale.id,
            item_id = %receipt.item.id,
            total = %receipt.sale.total(),
            "Sale recorded"
        );
        Ok(receipt)
    }

    /// Deletes a sale, dropping it from `cache` and refreshing the restored
    /// item when there is one.
    pub async fn delete_sale(
        &self,
        cache: &mut Repository,
        sale_id: &str,
    ) -> LedgerResult<SaleReversal> {
        if sale_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "saleId".to_string(),
            }
            .into());
        }

        let reversal = self.store.delete_sale(sale_id).await?;

        cache.remove_sale(&reversal.sale.id);
        if let Some(item) = &reversal.item {
            cache.upsert_item(item.clone());
        }

        info!(
            sale_id = %reversal.sale.id,
            restored = reversal.item.is_some(),
            "Sale reversed"
        );
        Ok(reversal)
    }
}
