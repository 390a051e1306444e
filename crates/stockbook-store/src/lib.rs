//! # stockbook-store: Store Contract, REST Client & Services
//!
//! This crate connects the pure rules of `stockbook-core` to the external
//! inventory service that holds the authoritative items and sales.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stockbook-store                                  │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Inventory<S>        views + item/CSV mutations                 │   │
//! │  │      │                                                          │   │
//! │  │      ├──► SaleLedger<S>   record_sale / delete_sale             │   │
//! │  │      │                                                          │   │
//! │  │      └──► Repository      local cache (replace, upsert by id)   │   │
//! │  └──────────────────────────────┬──────────────────────────────────┘   │
//! │                                 │ InventoryStore                        │
//! │              ┌──────────────────┴───────────────────┐                   │
//! │              ▼                                      ▼                   │
//! │  ┌───────────────────────┐            ┌───────────────────────┐        │
//! │  │  HttpStore (reqwest)  │            │  MemoryStore (Mutex)  │        │
//! │  │  REST service         │            │  in-process / tests   │        │
//! │  └───────────────────────┘            └───────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - The `InventoryStore` contract
//! - [`http`] - REST client
//! - [`memory`] - In-process store
//! - [`wire`] - JSON shapes of the REST service
//! - [`repository`] - Local cache
//! - [`ledger`] - Sale ledger service
//! - [`inventory`] - Inventory service and views
//! - [`config`] - Client configuration
//! - [`error`] - Store error types

pub mod config;
pub mod error;
pub mod http;
pub mod inventory;
pub mod ledger;
pub mod memory;
pub mod repository;
pub mod store;
pub mod wire;

pub use config::StockbookConfig;
pub use error::{LedgerResult, StoreError, StoreResult};
pub use http::HttpStore;
pub use inventory::Inventory;
pub use ledger::SaleLedger;
pub use memory::MemoryStore;
pub use repository::Repository;
pub use store::InventoryStore;
