//! # Inventory Service
//!
//! The entry point a front end talks to. It owns the store and the local
//! cache, routes mutations through the store, and derives every view from
//! the cache.
//!
//! ## Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventory<S>                                     │
//! │                                                                         │
//! │  Mutations (store first, then cache)   Views (cache only, no I/O)       │
//! │  ─────────────────────────────────     ──────────────────────────       │
//! │  refresh                               filtered        low_stock_alerts │
//! │  save_item / delete_item               summary         trends           │
//! │  import_csv (bulk replace)             weekly_report   daily_series     │
//! │  record_sale / delete_sale             top_products    sales_view       │
//! │                                        export_csv                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! After a transport error the cache may be stale; call [`Inventory::refresh`]
//! to reconcile.

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use stockbook_core::filter::{self, ItemQuery, LowStockAlert};
use stockbook_core::ledger::{SaleReceipt, SaleRequest, SaleReversal};
use stockbook_core::report::{self, DailyTotal, TopProduct, WeeklyReport};
use stockbook_core::stats::{self, Summary, Trends};
use stockbook_core::validation::{validate_item, validate_unique_sku};
use stockbook_core::{csv, Item, PaymentMethod, Sale, DEFAULT_TOP_PRODUCTS};

use crate::error::{LedgerResult, StoreResult};
use crate::ledger::SaleLedger;
use crate::repository::Repository;
use crate::store::InventoryStore;

pub struct Inventory<S> {
    store: S,
    cache: Repository,
    top_products: usize,
}

impl<S: InventoryStore> Inventory<S> {
    /// Wraps `store` with an empty cache. Call [`Inventory::refresh`] before
    /// reading views.
    pub fn new(store: S) -> Self {
        Inventory {
            store,
            cache: Repository::new(),
            top_products: DEFAULT_TOP_PRODUCTS,
        }
    }

    /// Sets the default length of [`Inventory::top_products`].
    pub fn with_top_products(mut self, n: usize) -> Self {
        self.top_products = n;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn repository(&self) -> &Repository {
        &self.cache
    }

    pub fn items(&self) -> &[Item] {
        self.cache.items()
    }

    pub fn sales(&self) -> &[Sale] {
        self.cache.sales()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Reloads both collections from the store.
    pub async fn refresh(&mut self) -> StoreResult<()> {
        let items = self.store.list_items().await?;
        let sales = self.store.list_sales().await?;
        debug!(items = items.len(), sales = sales.len(), "Cache refreshed");

        self.cache.replace(items, sales, Utc::now());
        Ok(())
    }

    /// Creates or updates an item.
    ///
    /// An item with an empty id, or an id not in the cache, is created (an
    /// id is generated when missing); otherwise it is updated. `updated_at`
    /// is stamped with the current time either way. Item rules are checked
    /// locally first, so an invalid item never reaches the store.
    pub async fn save_item(&mut self, mut item: Item) -> StoreResult<Item> {
        item.updated_at = Utc::now();
        let is_new = item.id.trim().is_empty() || self.cache.item(&item.id).is_none();
        if item.id.trim().is_empty() {
            item.id = Uuid::new_v4().to_string();
        }

        validate_item(&item)?;
        validate_unique_sku(self.cache.items(), &item)?;

        let saved = if is_new {
            self.store.create_item(item).await?
        } else {
            self.store.update_item(item).await?
        };

        self.cache.upsert_item(saved.clone());
        Ok(saved)
    }

    /// Deletes an item. Its sales stay and render as unknown.
    pub async fn delete_item(&mut self, id: &str) -> StoreResult<()> {
        self.store.delete_item(id).await?;
        self.cache.remove_item(id);
        Ok(())
    }

    /// Replaces the whole inventory with the items in a CSV document.
    ///
    /// Returns how many items the store kept. A document with no data rows
    /// changes nothing and returns 0.
    pub async fn import_csv(&mut self, text: &str) -> StoreResult<usize> {
        let items = csv::decode(text);
        if items.is_empty() {
            info!("CSV import has no rows, inventory left unchanged");
            return Ok(0);
        }

        let decoded = items.len();
        let kept = self.store.replace_items(items).await?;
        let count = kept.len();
        self.cache.replace_items(kept);

        info!(decoded, kept = count, "CSV imported");
        Ok(count)
    }

    /// The cached inventory as a CSV document.
    pub fn export_csv(&self) -> StoreResult<String> {
        Ok(csv::encode(self.cache.items())?)
    }

    pub async fn record_sale(&mut self, request: SaleRequest) -> LedgerResult<SaleReceipt> {
        SaleLedger::new(&self.store)
            .record_sale(&mut self.cache, request)
            .await
    }

    pub async fn delete_sale(&mut self, sale_id: &str) -> LedgerResult<SaleReversal> {
        SaleLedger::new(&self.store)
            .delete_sale(&mut self.cache, sale_id)
            .await
    }

    /// The store's own weekly report.
    pub async fn remote_weekly_report(&self) -> StoreResult<WeeklyReport> {
        self.store.weekly_report().await
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn filtered(&self, query: &ItemQuery) -> Vec<&Item> {
        filter::apply(self.cache.items(), query)
    }

    pub fn low_stock_alerts(&self) -> Vec<LowStockAlert<'_>> {
        filter::low_stock_alerts(self.cache.items())
    }

    /// Sales matching an item-name search and payment method, with the
    /// label of the item each refers to.
    pub fn sales_view(&self, text: &str, method: Option<PaymentMethod>) -> Vec<(&Sale, &str)> {
        let items = self.cache.items();
        filter::filter_sales(self.cache.sales(), items, text, method)
            .into_iter()
            .map(|sale| (sale, filter::item_label(items, &sale.item_id)))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        stats::summarize(self.cache.items(), self.cache.sales())
    }

    /// Trends against the sales-history approximation as of `now`.
    pub fn trends(&self, now: DateTime<Utc>) -> Trends {
        let baseline = stats::approximate_baseline(self.cache.items(), self.cache.sales(), now);
        stats::trends(&self.summary(), &baseline)
    }

    pub fn weekly_report<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> WeeklyReport {
        report::weekly_report(self.cache.sales(), now)
    }

    pub fn daily_series<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<DailyTotal> {
        report::daily_series(self.cache.sales(), now)
    }

    /// Best sellers; `n` defaults to the configured ranking length.
    pub fn top_products(&self, n: Option<usize>) -> Vec<TopProduct<'_>> {
        report::top_products(
            self.cache.items(),
            self.cache.sales(),
            n.unwrap_or(self.top_products),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::{Duration, FixedOffset};
    use stockbook_core::filter::{AlertLevel, SortKey};
    use stockbook_core::stats::BaselineSource;
    use stockbook_core::{ErrorCode, ErrorKind, Money, UNKNOWN_ITEM_LABEL};

    fn item(id: &str, sku: &str, quantity: i64, threshold: i64) -> Item {
        Item {
            id: id.into(),
            name: format!("Item {id}"),
            sku: sku.into(),
            location: "Estante A".into(),
            quantity,
            threshold,
            price_cents: 500,
            cost_cents: 300,
            ..Default::default()
        }
    }

    fn sell(item_id: &str, quantity: i64, method: &str) -> SaleRequest {
        SaleRequest {
            item_id: item_id.into(),
            quantity,
            price: Money::from_cents(500),
            payment_method: method.into(),
        }
    }

    async fn inventory(items: Vec<Item>) -> Inventory<MemoryStore> {
        let mut inventory = Inventory::new(MemoryStore::with_data(items, Vec::new()));
        inventory.refresh().await.unwrap();
        inventory
    }

    #[tokio::test]
    async fn test_save_item_creates_then_updates() {
        let mut inv = inventory(Vec::new()).await;

        let created = inv
            .save_item(Item { id: String::new(), ..item("", "A-1", 3, 1) })
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert!(created.updated_at > DateTime::<Utc>::default());

        let updated = inv
            .save_item(Item { quantity: 8, ..created.clone() })
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(inv.items().len(), 1);
        assert_eq!(inv.items()[0].quantity, 8);
    }

    #[tokio::test]
    async fn test_save_item_rejects_locally() {
        let mut inv = inventory(vec![item("a", "A-1", 3, 1)]).await;

        let err = inv.save_item(item("b", "A-1", 1, 0)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateSku);

        let err = inv.save_item(item("b", "", 1, 0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(inv.store().list_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_item_keeps_sales() {
        let mut inv = inventory(vec![item("a", "A-1", 3, 1)]).await;
        inv.record_sale(sell("a", 1, "Efectivo")).await.unwrap();

        inv.delete_item("a").await.unwrap();
        assert!(inv.items().is_empty());
        assert_eq!(inv.sales().len(), 1);

        let view = inv.sales_view("", None);
        assert_eq!(view[0].1, UNKNOWN_ITEM_LABEL);
        assert!(inv.sales_view("item", None).is_empty());

        let err = inv.delete_item("a").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_import_and_export_csv() {
        let mut inv = inventory(vec![item("old", "OLD", 1, 0)]).await;

        let csv_text = "id,name,sku,quantity,location,price,threshold,description,imageUrl,status,updatedAt\n\
                        a,Cable,CAB-1,4,A,12.50,1,,,,2024-03-10T15:00:00Z\n\
                        b,,NONAME,1,A,1,0,,,,\n";
        let kept = inv.import_csv(csv_text).await.unwrap();

        // the nameless row is dropped by the store
        assert_eq!(kept, 1);
        assert_eq!(inv.items().len(), 1);
        assert_eq!(inv.items()[0].price_cents, 1250);

        let exported = inv.export_csv().unwrap();
        assert!(exported.starts_with("id,name,sku,quantity"));
        assert!(exported.contains("a,Cable,CAB-1,4,A,12.50,1"));
    }

    #[tokio::test]
    async fn test_empty_import_is_a_no_op() {
        let mut inv = inventory(vec![item("a", "A-1", 3, 1)]).await;

        let header_only = "id,name,sku,quantity,location,price,threshold,description,imageUrl,status,updatedAt\n";
        assert_eq!(inv.import_csv(header_only).await.unwrap(), 0);
        assert_eq!(inv.import_csv("").await.unwrap(), 0);
        assert_eq!(inv.store().list_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_views_follow_sales() {
        let mut inv = inventory(vec![item("a", "A-1", 10, 2), item("b", "B-1", 3, 3)])
            .await
            .with_top_products(1);

        inv.record_sale(sell("a", 4, "Yappy")).await.unwrap();
        inv.record_sale(sell("b", 3, "Efectivo")).await.unwrap();

        let summary = inv.summary();
        assert_eq!(summary.total_units, 6);
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.total_cash.cents(), 1400);

        let alerts = inv.low_stock_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Out);

        let top = inv.top_products(None);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].item.id, "a");
        assert_eq!(inv.top_products(Some(5)).len(), 2);

        let yappy = inv.sales_view("", Some(PaymentMethod::Yappy));
        assert_eq!(yappy.len(), 1);
        assert_eq!(yappy[0].1, "Item a");

        let by_quantity = inv.filtered(&ItemQuery { sort: SortKey::Quantity, ..Default::default() });
        assert_eq!(by_quantity[0].id, "a");
    }

    #[tokio::test]
    async fn test_reports_from_cache() {
        let mut inv = inventory(vec![item("a", "A-1", 10, 0)]).await;
        inv.record_sale(sell("a", 2, "Efectivo")).await.unwrap();

        let panama = FixedOffset::west_opt(5 * 3600).unwrap();
        let tomorrow = Utc::now().with_timezone(&panama) + Duration::days(1);

        // today's sale is inside tomorrow's window and series
        let weekly = inv.weekly_report(&tomorrow);
        assert_eq!(weekly.count, 1);
        assert_eq!(weekly.total.cents(), 1000);

        let series = inv.daily_series(&tomorrow);
        assert_eq!(series.len(), 7);
        assert_eq!(series.iter().map(|d| d.total.cents()).sum::<i64>(), 1000);

        let trends = inv.trends(Utc::now());
        assert!(matches!(trends.source, BaselineSource::SalesHistoryApproximation { .. }));
    }
}
