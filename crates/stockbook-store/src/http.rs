//! # REST Client
//!
//! [`InventoryStore`] over the inventory service's HTTP API.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  call ──► token set? ──no──► NotAuthenticated (nothing sent)            │
//! │              │                                                          │
//! │             yes                                                         │
//! │              ▼                                                          │
//! │  METHOD {api}/path   Authorization: Bearer <token>                      │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  2xx            → decode body                                           │
//! │  401            → drop token, Unauthorized (no retry)                   │
//! │  404            → NotFound (ItemNotFound / SaleNotFound on sales)       │
//! │  400 / 409 / 422→ Rejected { code, message }                            │
//! │  anything else  → Http { status, body }                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Follow-up Reads
//! The service may answer a sale mutation with the sale alone (or just a
//! status). The client then reads the authoritative item with `GET /items`
//! once the mutation has completed. A committed mutation whose outcome
//! cannot be read back is [`StoreError::Unconfirmed`], never not-found.
//!
//! ## Sale Errors Without a Code
//! Some service builds answer sale calls with a bare message:
//! ```text
//! POST   /sales       404 {"error": "Item not found."}   → ItemNotFound(item_id)
//! POST   /sales       400 {"error": "Not enough stock."} → InsufficientStock
//! DELETE /sales/{id}  404 {"error": "Sale not found."}   → SaleNotFound(id)
//! ```

use std::time::Duration;

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use stockbook_core::ledger::{SaleReceipt, SaleRequest, SaleReversal};
use stockbook_core::report::WeeklyReport;
use stockbook_core::{CoreError, Item, Sale};

use crate::config::StockbookConfig;
use crate::error::{StoreError, StoreResult};
use crate::store::InventoryStore;
use crate::wire::{
    parse_error_body, BulkItemsDto, ItemDto, SaleDto, SaleRequestDto, SaleResponseDto,
    SaleReversalDto, WeeklyReportDto,
};

/// Client for the inventory service.
pub struct HttpStore {
    http: Client,
    api_base: String,
    token: RwLock<Option<String>>,
}

impl HttpStore {
    /// Creates a client for `api_base` (e.g. `http://localhost:5000/api`).
    pub fn new(
        api_base: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let api_base = api_base.into().trim_end_matches('/').to_string();

        Ok(HttpStore {
            http,
            api_base,
            token: RwLock::new(token.filter(|t| !t.trim().is_empty())),
        })
    }

    pub fn from_config(config: &StockbookConfig) -> StoreResult<Self> {
        Self::new(
            config.api_url(),
            config.token().map(str::to_string),
            config.timeout(),
        )
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Replaces the session credential (`None` signs out).
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    // =========================================================================
    // Auxiliary endpoints
    // =========================================================================

    /// Probes `GET /health`. Needs no credential.
    pub async fn health(&self) -> StoreResult<bool> {
        let url = self.url("/health");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| network_error(&url, e))?;
        Ok(response.status().is_success())
    }

    /// The rendered invoice of a sale, as opaque bytes.
    pub async fn download_invoice(&self, sale_id: &str) -> StoreResult<Vec<u8>> {
        self.bytes(&format!("/sales/{sale_id}/invoice")).await
    }

    /// A backup of the whole store, as opaque bytes.
    pub async fn download_backup(&self) -> StoreResult<Vec<u8>> {
        self.bytes("/backup").await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn bearer(&self) -> StoreResult<String> {
        self.token.read().await.clone().ok_or(StoreError::NotAuthenticated)
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> StoreResult<Response> {
        let token = self.bearer().await?;
        let url = self.url(path);
        debug!(%method, %url, "Store request");

        let mut request = self.http.request(method, &url).bearer_auth(&token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| network_error(&url, e))?;
        self.check(response).await
    }

    /// Maps a non-success status to the matching error.
    async fn check(&self, response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (message, code) = parse_error_body(&body);

        match status.as_u16() {
            401 => {
                self.token.write().await.take();
                warn!(%message, "Session rejected by store, token dropped");
                Err(StoreError::Unauthorized(message))
            }
            404 => Err(StoreError::NotFound(message)),
            400 | 409 | 422 => Err(StoreError::Rejected { code, message }),
            other => {
                error!(status = other, %body, "Store request failed");
                Err(StoreError::Http { status: other, body })
            }
        }
    }

    async fn json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> StoreResult<T> {
        let response = self.send(method, path, body).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(format!("{path}: {e}")))
    }

    async fn bytes(&self, path: &str) -> StoreResult<Vec<u8>> {
        let response = self.send(Method::GET, path, None).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Turns a code-less sale rejection into the matching ledger error.
    async fn sale_rejection(&self, err: StoreError, request: &SaleRequest) -> StoreError {
        let item_id = request.item_id.trim();
        match err {
            StoreError::NotFound(_) => CoreError::ItemNotFound(item_id.to_string()).into(),
            StoreError::Rejected { code: None, message } if is_stock_message(&message) => {
                // Best effort: the current stock only makes the message precise.
                let item = self.fetch_item(item_id).await.ok().flatten();
                CoreError::InsufficientStock {
                    sku: item.as_ref().map_or_else(|| item_id.to_string(), |i| i.sku.clone()),
                    available: item.map_or(0, |i| i.quantity),
                    requested: request.quantity,
                }
                .into()
            }
            other => other,
        }
    }

    async fn fetch_sales(&self) -> StoreResult<Vec<Sale>> {
        let sales: Vec<SaleDto> = self.json(Method::GET, "/sales", None).await?;
        sales.into_iter().map(Sale::try_from).collect()
    }

    /// Current copy of one item, `None` when it no longer exists.
    async fn fetch_item(&self, id: &str) -> StoreResult<Option<Item>> {
        let items = self.list_items().await?;
        Ok(items.into_iter().find(|item| item.id == id))
    }
}

fn is_stock_message(message: &str) -> bool {
    message.to_ascii_lowercase().contains("not enough stock")
}

fn network_error(url: &str, err: reqwest::Error) -> StoreError {
    error!(%url, error = %err, "Store unreachable");
    StoreError::Network(err.to_string())
}

impl InventoryStore for HttpStore {
    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        let items: Vec<ItemDto> = self.json(Method::GET, "/items", None).await?;
        Ok(items.into_iter().map(Item::from).collect())
    }

    async fn create_item(&self, item: Item) -> StoreResult<Item> {
        let body = serde_json::to_value(ItemDto::from(&item))?;
        let saved: ItemDto = self.json(Method::POST, "/items", Some(body)).await?;

        info!(item_id = %saved.id, "Item saved");
        Ok(saved.into())
    }

    async fn update_item(&self, item: Item) -> StoreResult<Item> {
        let body = serde_json::to_value(ItemDto::from(&item))?;
        let path = format!("/items/{}", item.id);
        let saved: ItemDto = self.json(Method::PUT, &path, Some(body)).await?;

        info!(item_id = %saved.id, "Item updated");
        Ok(saved.into())
    }

    async fn delete_item(&self, id: &str) -> StoreResult<()> {
        self.send(Method::DELETE, &format!("/items/{id}"), None).await?;
        info!(item_id = %id, "Item deleted");
        Ok(())
    }

    async fn replace_items(&self, items: Vec<Item>) -> StoreResult<Vec<Item>> {
        let sent = items.len();
        let body = serde_json::to_value(BulkItemsDto {
            items: items.iter().map(ItemDto::from).collect(),
        })?;
        let kept: Vec<ItemDto> = self.json(Method::POST, "/items/bulk", Some(body)).await?;

        if kept.len() < sent {
            warn!(sent, kept = kept.len(), "Store dropped items from bulk replace");
        }
        info!(count = kept.len(), "Items replaced");
        Ok(kept.into_iter().map(Item::from).collect())
    }

    async fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        self.fetch_sales().await
    }

    async fn record_sale(&self, request: &SaleRequest) -> StoreResult<SaleReceipt> {
        let body = serde_json::to_value(SaleRequestDto::from(request))?;
        let response: SaleResponseDto = match self.json(Method::POST, "/sales", Some(body)).await {
            Ok(response) => response,
            Err(err) => return Err(self.sale_rejection(err, request).await),
        };

        let (sale, item) = match response {
            SaleResponseDto::Receipt { sale, item } => (Sale::try_from(sale)?, item.map(Item::from)),
            SaleResponseDto::Bare(sale) => (Sale::try_from(sale)?, None),
        };

        let item = match item {
            Some(item) => item,
            None => {
                debug!(sale_id = %sale.id, "Sale response without item, re-reading items");
                self.fetch_item(&sale.item_id).await?.ok_or_else(|| {
                    warn!(sale_id = %sale.id, item_id = %sale.item_id, "Sold item missing from item list");
                    StoreError::Unconfirmed(format!(
                        "sale {} recorded, item {} could not be re-read",
                        sale.id, sale.item_id
                    ))
                })?
            }
        };

        info!(sale_id = %sale.id, item_id = %item.id, quantity = sale.quantity, "Sale recorded");
        Ok(SaleReceipt { sale, item })
    }

    async fn delete_sale(&self, id: &str) -> StoreResult<SaleReversal> {
        // The delete response may carry nothing but a status, so the sale
        // is read first.
        let known = self.fetch_sales().await?.into_iter().find(|sale| sale.id == id);

        let response = self
            .send(Method::DELETE, &format!("/sales/{id}"), None)
            .await
            .map_err(|err| match err {
                StoreError::NotFound(_) => CoreError::SaleNotFound(id.to_string()).into(),
                other => other,
            })?;
        let bytes = response.bytes().await?;

        let reversal = match serde_json::from_slice::<SaleReversalDto>(&bytes) {
            Ok(dto) => SaleReversal {
                sale: Sale::try_from(dto.sale)?,
                item: dto.item.map(Item::from),
            },
            Err(_) => {
                let sale = known.ok_or_else(|| {
                    warn!(sale_id = %id, "Deleted sale was not in the sale list");
                    StoreError::Unconfirmed(format!("sale {id} deleted, its record could not be read"))
                })?;
                let item = self.fetch_item(&sale.item_id).await?;
                SaleReversal { sale, item }
            }
        };

        info!(sale_id = %id, restored = reversal.item.is_some(), "Sale deleted");
        Ok(reversal)
    }

    async fn weekly_report(&self) -> StoreResult<WeeklyReport> {
        let report: WeeklyReportDto = self.json(Method::GET, "/reports/weekly", None).await?;
        report.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use stockbook_core::{ErrorCode, ErrorKind, Money, PaymentMethod};

    const TOKEN: &str = "t0k3n";

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
        format!("http://{addr}/api")
    }

    fn client(base: &str, token: Option<&str>) -> HttpStore {
        HttpStore::new(base, token.map(str::to_string), Duration::from_secs(5)).unwrap()
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {TOKEN}"))
    }

    fn item_json(quantity: i64) -> Value {
        json!({
            "id": "a", "name": "Cable", "sku": "CAB-1", "quantity": quantity,
            "location": "A", "price": 12.5, "threshold": 1,
            "updatedAt": "2024-03-10T10:00:00Z"
        })
    }

    fn sale_json() -> Value {
        json!({
            "id": "s1", "itemId": "a", "quantity": 2, "price": 12.5, "total": 25.0,
            "paymentMethod": "Efectivo", "createdAt": "2024-03-10T15:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_list_items_sends_bearer() {
        let app = Router::new().route(
            "/api/items",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})));
                }
                (StatusCode::OK, Json(json!([item_json(4)])))
            }),
        );
        let base = serve(app).await;

        let items = client(&base, Some(TOKEN)).list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price_cents, 1250);
        assert_eq!(items[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_missing_token_sends_nothing() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/api/items",
                get(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!([]))
                }),
            )
            .with_state(hits.clone());
        let base = serve(app).await;

        let err = client(&base, None).list_items().await.unwrap_err();
        assert!(matches!(err, StoreError::NotAuthenticated));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_drops_token() {
        let app = Router::new().route(
            "/api/sales",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid token"}))) }),
        );
        let base = serve(app).await;
        let store = client(&base, Some("expired"));

        let err = store.list_sales().await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized(ref m) if m == "Invalid token"));
        assert!(!store.has_token().await);

        let err = store.list_sales().await.unwrap_err();
        assert!(matches!(err, StoreError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let app = Router::new()
            .route(
                "/api/sales",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": "Not enough stock.", "code": "INSUFFICIENT_STOCK"})),
                    )
                }),
            )
            .route(
                "/api/items/{id}",
                delete(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "Item not found."}))) }),
            )
            .route(
                "/api/reports/weekly",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let base = serve(app).await;
        let store = client(&base, Some(TOKEN));

        let request = SaleRequest {
            item_id: "a".into(),
            quantity: 9,
            price: Money::from_cents(1250),
            payment_method: "Efectivo".into(),
        };
        let err = store.record_sale(&request).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientStock);
        assert!(matches!(err, StoreError::Rejected { ref message, .. } if message == "Not enough stock."));

        let err = store.delete_item("ghost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store.weekly_report().await.unwrap_err();
        assert!(matches!(err, StoreError::Http { status: 500, ref body } if body == "boom"));
        assert!(err.needs_refresh());
        // only 401 drops the session
        assert!(store.has_token().await);
    }

    #[tokio::test]
    async fn test_record_sale_posts_wire_shape_and_rereads_item() {
        let app = Router::new()
            .route(
                "/api/sales",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(
                        body,
                        json!({"itemId": "a", "quantity": 2, "price": 12.5, "paymentMethod": "Efectivo"})
                    );
                    (StatusCode::CREATED, Json(sale_json()))
                }),
            )
            .route("/api/items", get(|| async { Json(json!([item_json(2)])) }));
        let base = serve(app).await;

        let request = SaleRequest {
            item_id: " a ".into(),
            quantity: 2,
            price: Money::from_cents(1250),
            payment_method: " Efectivo ".into(),
        };
        let receipt = client(&base, Some(TOKEN)).record_sale(&request).await.unwrap();

        assert_eq!(receipt.sale.id, "s1");
        assert_eq!(receipt.sale.payment_method, PaymentMethod::Efectivo);
        assert_eq!(receipt.item.quantity, 2);
    }

    #[tokio::test]
    async fn test_record_sale_with_full_receipt() {
        let app = Router::new().route(
            "/api/sales",
            post(|| async { Json(json!({"sale": sale_json(), "item": item_json(7)})) }),
        );
        let base = serve(app).await;

        let request = SaleRequest {
            item_id: "a".into(),
            quantity: 2,
            price: Money::from_cents(1250),
            payment_method: "Efectivo".into(),
        };
        let receipt = client(&base, Some(TOKEN)).record_sale(&request).await.unwrap();
        assert_eq!(receipt.item.quantity, 7);
    }

    #[tokio::test]
    async fn test_delete_sale_with_status_only_response() {
        let app = Router::new()
            .route("/api/sales", get(|| async { Json(json!([sale_json()])) }))
            .route(
                "/api/sales/{id}",
                delete(|Path(id): Path<String>| async move {
                    assert_eq!(id, "s1");
                    Json(json!({"status": "deleted"}))
                }),
            )
            .route("/api/items", get(|| async { Json(json!([item_json(6)])) }));
        let base = serve(app).await;

        let reversal = client(&base, Some(TOKEN)).delete_sale("s1").await.unwrap();
        assert_eq!(reversal.sale.id, "s1");
        assert_eq!(reversal.item.map(|i| i.quantity), Some(6));
    }

    #[tokio::test]
    async fn test_delete_sale_for_deleted_item() {
        let app = Router::new()
            .route("/api/sales", get(|| async { Json(json!([sale_json()])) }))
            .route("/api/sales/{id}", delete(|| async { Json(json!({"status": "deleted"})) }))
            .route("/api/items", get(|| async { Json(json!([])) }));
        let base = serve(app).await;

        let reversal = client(&base, Some(TOKEN)).delete_sale("s1").await.unwrap();
        assert!(reversal.item.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_sale() {
        let app = Router::new()
            .route("/api/sales", get(|| async { Json(json!([])) }))
            .route(
                "/api/sales/{id}",
                delete(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "Sale not found."}))) }),
            );
        let base = serve(app).await;

        let err = client(&base, Some(TOKEN)).delete_sale("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(matches!(err, StoreError::Core(CoreError::SaleNotFound(ref id)) if id == "nope"));
    }

    fn sell(item_id: &str, quantity: i64) -> SaleRequest {
        SaleRequest {
            item_id: item_id.into(),
            quantity,
            price: Money::from_cents(1250),
            payment_method: "Efectivo".into(),
        }
    }

    #[tokio::test]
    async fn test_sale_errors_without_code() {
        let app = Router::new().route(
            "/api/sales",
            post(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "Item not found."}))) }),
        );
        let base = serve(app).await;

        let err = client(&base, Some(TOKEN)).record_sale(&sell("ghost", 1)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ItemNotFound);
        assert!(matches!(err, StoreError::Core(CoreError::ItemNotFound(ref id)) if id == "ghost"));

        let app = Router::new()
            .route(
                "/api/sales",
                post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "Not enough stock."}))) }),
            )
            .route("/api/items", get(|| async { Json(json!([item_json(1)])) }));
        let base = serve(app).await;

        let err = client(&base, Some(TOKEN)).record_sale(&sell("a", 9)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientStock);
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock { ref sku, available: 1, requested: 9 })
                if sku == "CAB-1"
        ));

        // other code-less rejections stay as they are
        let app = Router::new().route(
            "/api/sales",
            post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "Invalid sale data."}))) }),
        );
        let base = serve(app).await;

        let err = client(&base, Some(TOKEN)).record_sale(&sell("a", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected { code: None, .. }));
    }

    #[tokio::test]
    async fn test_recorded_sale_with_unreadable_item_is_not_not_found() {
        let app = Router::new()
            .route("/api/sales", post(|| async { (StatusCode::CREATED, Json(sale_json())) }))
            .route("/api/items", get(|| async { Json(json!([])) }));
        let base = serve(app).await;

        let err = client(&base, Some(TOKEN)).record_sale(&sell("a", 2)).await.unwrap_err();
        assert!(matches!(err, StoreError::Unconfirmed(_)));
        assert_ne!(err.kind(), ErrorKind::NotFound);
        assert!(err.needs_refresh());
    }

    #[tokio::test]
    async fn test_deleted_sale_missing_from_prior_list_is_not_not_found() {
        let app = Router::new()
            .route("/api/sales", get(|| async { Json(json!([])) }))
            .route("/api/sales/{id}", delete(|| async { Json(json!({"status": "deleted"})) }));
        let base = serve(app).await;

        let err = client(&base, Some(TOKEN)).delete_sale("s1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unconfirmed(_)));
        assert_ne!(err.kind(), ErrorKind::NotFound);
        assert!(err.needs_refresh());
    }

    #[tokio::test]
    async fn test_replace_items_sends_bulk_body() {
        let app = Router::new().route(
            "/api/items/bulk",
            post(|Json(body): Json<Value>| async move {
                let items = body["items"].as_array().cloned().unwrap_or_default();
                // keep only the first, as if the rest were invalid
                Json(Value::Array(items.into_iter().take(1).collect()))
            }),
        );
        let base = serve(app).await;

        let items = vec![
            Item { id: "a".into(), sku: "A".into(), price_cents: 199, ..Default::default() },
            Item { id: "b".into(), sku: "B".into(), ..Default::default() },
        ];
        let kept = client(&base, Some(TOKEN)).replace_items(items).await.unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].price_cents, 199);
    }

    #[tokio::test]
    async fn test_downloads_and_health() {
        let app = Router::new()
            .route("/api/health", get(|| async { Json(json!({"status": "ok"})) }))
            .route("/api/backup", get(|| async { b"SQLite format 3\0".to_vec() }))
            .route(
                "/api/sales/{id}/invoice",
                get(|Path(id): Path<String>| async move { format!("%PDF-{id}") }),
            );
        let base = serve(app).await;

        // health needs no token
        assert!(client(&base, None).health().await.unwrap());

        let store = client(&base, Some(TOKEN));
        assert_eq!(store.download_backup().await.unwrap(), b"SQLite format 3\0".to_vec());
        assert_eq!(store.download_invoice("s1").await.unwrap(), b"%PDF-s1".to_vec());
    }
}
