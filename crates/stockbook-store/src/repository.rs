//! # Local Cache
//!
//! The client's copy of both collections. It is never the source of truth:
//! it is replaced wholesale on load and patched with whatever authoritative
//! entities a mutation returns.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load          items, sales  ← list_items, list_sales   (wholesale)     │
//! │  mutation      upsert_item / upsert_sale by id          (insert front)  │
//! │  deletion      remove_item / remove_sale by id                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No merging happens here: a returned entity simply replaces the cached
//! copy with the same id.

use chrono::{DateTime, Utc};

use stockbook_core::{Item, Sale};

#[derive(Debug, Clone, Default)]
pub struct Repository {
    items: Vec<Item>,
    sales: Vec<Sale>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both collections with a fresh load.
    pub fn replace(&mut self, items: Vec<Item>, sales: Vec<Sale>, loaded_at: DateTime<Utc>) {
        self.items = items;
        self.sales = sales;
        self.loaded_at = Some(loaded_at);
    }

    /// Replaces the item collection only (after a bulk replace).
    pub fn replace_items(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// When the collections were last loaded; `None` before the first load.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|sale| sale.id == id)
    }

    pub fn upsert_item(&mut self, item: Item) {
        match self.items.iter_mut().find(|cached| cached.id == item.id) {
            Some(cached) => *cached = item,
            None => self.items.insert(0, item),
        }
    }

    pub fn upsert_sale(&mut self, sale: Sale) {
        match self.sales.iter_mut().find(|cached| cached.id == sale.id) {
            Some(cached) => *cached = sale,
            None => self.sales.insert(0, sale),
        }
    }

    /// Returns the removed item, if it was cached.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Returns the removed sale, if it was cached.
    pub fn remove_sale(&mut self, id: &str) -> Option<Sale> {
        let index = self.sales.iter().position(|sale| sale.id == id)?;
        Some(self.sales.remove(index))
    }
}
