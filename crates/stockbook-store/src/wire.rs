//! # Wire Format
//!
//! JSON shapes of the inventory service and their conversion to domain
//! types.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  wire (camelCase JSON)              domain (stockbook-core)             │
//! │  ─────────────────────              ───────────────────────             │
//! │  "price": 12.5           ──────►    price_cents: 1250                   │
//! │  "costUnit": 8           ──────►    cost_cents: 800                     │
//! │  "updatedAt": "...Z"     ──────►    DateTime<Utc>                       │
//! │  "updatedAt": "...T10:00"──────►    local wall-clock → UTC              │
//! │  "total": 25.0           ──────►    checked, then recomputed            │
//! │  "paymentMethod": "Yappy"──────►    PaymentMethod::Yappy                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stockbook_core::clock::{format_timestamp, parse_timestamp};
use stockbook_core::ledger::SaleRequest;
use stockbook_core::report::{PaymentTotal, WeeklyReport};
use stockbook_core::{ErrorCode, Item, Money, PaymentMethod, Sale};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Amounts
// =============================================================================

/// Decimal amount to cents, to the nearest cent. Non-finite values are 0.
pub fn cents_from_decimal(amount: f64) -> i64 {
    if !amount.is_finite() {
        return 0;
    }
    (amount * 100.0).round() as i64
}

pub fn decimal_from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

fn timestamp(field: &str, text: &str) -> StoreResult<DateTime<Utc>> {
    parse_timestamp(text)
        .ok_or_else(|| StoreError::Decode(format!("invalid {field} timestamp '{text}'")))
}

// =============================================================================
// Items
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub cost_unit: f64,
    #[serde(default)]
    pub threshold: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<&Item> for ItemDto {
    fn from(item: &Item) -> Self {
        ItemDto {
            id: item.id.clone(),
            name: item.name.clone(),
            sku: item.sku.clone(),
            quantity: item.quantity,
            location: item.location.clone(),
            price: decimal_from_cents(item.price_cents),
            cost_unit: decimal_from_cents(item.cost_cents),
            threshold: item.threshold,
            description: item.description.clone(),
            image_url: item.image_url.clone(),
            status: item.status.clone(),
            updated_at: Some(format_timestamp(&item.updated_at)),
        }
    }
}

impl From<ItemDto> for Item {
    /// Missing optional fields take the item defaults. An absent or
    /// unreadable `updatedAt` becomes the epoch, which sorts last.
    fn from(dto: ItemDto) -> Self {
        let updated_at = match dto.updated_at.as_deref().map(parse_timestamp) {
            Some(Some(at)) => at,
            other => {
                if other.is_some() {
                    debug!(item_id = %dto.id, "Unreadable updatedAt on item");
                }
                DateTime::<Utc>::default()
            }
        };

        let mut item = Item {
            id: dto.id,
            name: dto.name,
            sku: dto.sku,
            quantity: dto.quantity,
            location: dto.location,
            price_cents: cents_from_decimal(dto.price),
            cost_cents: cents_from_decimal(dto.cost_unit),
            threshold: dto.threshold,
            description: dto.description,
            image_url: dto.image_url,
            updated_at,
            ..Default::default()
        };
        if !dto.status.trim().is_empty() {
            item.status = dto.status;
        }
        item
    }
}

#[derive(Debug, Serialize)]
pub struct BulkItemsDto {
    pub items: Vec<ItemDto>,
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub item_id: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(default)]
    pub cost_unit: f64,
    #[serde(default)]
    pub total: Option<f64>,
    pub payment_method: String,
    pub created_at: String,
}

impl TryFrom<SaleDto> for Sale {
    type Error = StoreError;

    /// A `total` that disagrees with `quantity × price` is logged; the
    /// recomputed value is what the domain sees.
    fn try_from(dto: SaleDto) -> StoreResult<Self> {
        let payment_method: PaymentMethod = dto
            .payment_method
            .parse()
            .map_err(|e| StoreError::Decode(format!("sale {}: {}", dto.id, e)))?;

        let sale = Sale {
            created_at: timestamp("createdAt", &dto.created_at)?,
            id: dto.id,
            item_id: dto.item_id,
            quantity: dto.quantity,
            unit_price_cents: cents_from_decimal(dto.price),
            cost_unit_cents: cents_from_decimal(dto.cost_unit),
            payment_method,
        };

        if let Some(total) = dto.total {
            let reported = cents_from_decimal(total);
            if reported != sale.total().cents() {
                warn!(
                    sale_id = %sale.id,
                    reported,
                    computed = sale.total().cents(),
                    "Sale total disagrees with quantity × price"
                );
            }
        }

        Ok(sale)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequestDto {
    pub item_id: String,
    pub quantity: i64,
    pub price: f64,
    pub payment_method: String,
}

impl From<&SaleRequest> for SaleRequestDto {
    fn from(request: &SaleRequest) -> Self {
        SaleRequestDto {
            item_id: request.item_id.trim().to_string(),
            quantity: request.quantity,
            price: decimal_from_cents(request.price.cents()),
            payment_method: request.payment_method.trim().to_string(),
        }
    }
}

/// `POST /sales` answers with the sale and item, or with the sale alone.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SaleResponseDto {
    Receipt {
        sale: SaleDto,
        #[serde(default)]
        item: Option<ItemDto>,
    },
    Bare(SaleDto),
}

/// `DELETE /sales/{id}` may answer with the removed sale and restored item.
/// Anything else (`{"status": "deleted"}`) carries no entities.
#[derive(Debug, Deserialize)]
pub struct SaleReversalDto {
    pub sale: SaleDto,
    #[serde(default)]
    pub item: Option<ItemDto>,
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotalDto {
    pub method: String,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub units: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportDto {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub units: Option<i64>,
    #[serde(default)]
    pub by_payment: Vec<PaymentTotalDto>,
}

impl TryFrom<WeeklyReportDto> for WeeklyReport {
    type Error = StoreError;

    fn try_from(dto: WeeklyReportDto) -> StoreResult<Self> {
        let by_payment = dto
            .by_payment
            .into_iter()
            .map(|row| {
                let method: PaymentMethod = row
                    .method
                    .parse()
                    .map_err(|e| StoreError::Decode(format!("weekly report: {e}")))?;
                Ok(PaymentTotal {
                    method,
                    total: Money::from_cents(cents_from_decimal(row.total.unwrap_or_default())),
                    count: row.count.unwrap_or_default(),
                    units: row.units.unwrap_or_default(),
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(WeeklyReport {
            start: timestamp("start", &dto.start)?,
            end: timestamp("end", &dto.end)?,
            total: Money::from_cents(cents_from_decimal(dto.total.unwrap_or_default())),
            count: dto.count.unwrap_or_default(),
            units: dto.units.unwrap_or_default(),
            by_payment,
        })
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Deserialize)]
struct ErrorBodyDto {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

/// Message and code from an error body `{"error": "...", "code"?: "..."}`.
///
/// A body of any other shape is used verbatim as the message. Unknown codes
/// are dropped.
pub fn parse_error_body(body: &str) -> (String, Option<ErrorCode>) {
    match serde_json::from_str::<ErrorBodyDto>(body) {
        Ok(parsed) => {
            let code = parsed
                .code
                .and_then(|code| serde_json::from_value(serde_json::Value::String(code)).ok());
            (parsed.error, code)
        }
        Err(_) => (body.trim().to_string(), None),
    }
}
