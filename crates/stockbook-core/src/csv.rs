//! # CSV Codec
//!
//! Fixed-schema CSV interchange for bulk inventory replacement.
//!
//! ## Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  id,name,sku,quantity,location,price,threshold,description,imageUrl,    │
//! │  status,updatedAt                                    ◄── always first   │
//! │                                                                         │
//! │  a1,"Cable, HDMI",CAB-1,4,Estante A,12.50,2,,,Nuevo,2024-03-10T15:30:00Z│
//! │       ▲                           ▲                         ▲           │
//! │       │ quoted: contains a comma  │ decimal, 2 digits       │ RFC 3339  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decode Tolerance
//! - `\n` and `\r\n` line endings, blank lines ignored
//! - Columns matched by (trimmed) header name, in any order
//! - `image_url` accepted for `imageUrl`; `costUnit` read when present
//! - Short rows padded with empty fields, long rows skipped (logged)
//! - Bad numbers become 0, empty `id` gets a UUID, empty `status` becomes
//!   "Nuevo", empty or bad `updatedAt` becomes the import time
//!
//! Decoding never fails. An input with only a header (or nothing at all)
//! decodes to an empty list.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::clock::{format_timestamp, parse_timestamp};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Item;
use crate::DEFAULT_ITEM_STATUS;

/// Column order written by [`encode`].
pub const HEADER: [&str; 11] = [
    "id",
    "name",
    "sku",
    "quantity",
    "location",
    "price",
    "threshold",
    "description",
    "imageUrl",
    "status",
    "updatedAt",
];

// =============================================================================
// Encode
// =============================================================================

/// Encodes items as CSV, header first, one record per item.
///
/// A field is quoted only when it contains a comma, a double quote, CR or LF;
/// inner quotes are doubled.
pub fn encode(items: &[Item]) -> CoreResult<String> {
    let mut writer = ::csv::WriterBuilder::new()
        .quote_style(::csv::QuoteStyle::Necessary)
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(HEADER)
        .map_err(|e| CoreError::Csv(e.to_string()))?;

    for item in items {
        let quantity = item.quantity.to_string();
        let price = item.price().to_decimal_string();
        let threshold = item.threshold.to_string();
        let updated_at = format_timestamp(&item.updated_at);

        writer
            .write_record([
                item.id.as_str(),
                item.name.as_str(),
                item.sku.as_str(),
                quantity.as_str(),
                item.location.as_str(),
                price.as_str(),
                threshold.as_str(),
                item.description.as_str(),
                item.image_url.as_str(),
                item.status.as_str(),
                updated_at.as_str(),
            ])
            .map_err(|e| CoreError::Csv(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Csv(e.to_string()))
}

// =============================================================================
// Decode
// =============================================================================

/// Decodes CSV text into normalized items, stamping defaults with the
/// current time.
pub fn decode(text: &str) -> Vec<Item> {
    decode_at(text, Utc::now())
}

/// [`decode`] with an explicit "now" for missing or unreadable `updatedAt`.
pub fn decode_at(text: &str, now: DateTime<Utc>) -> Vec<Item> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let columns = match records.next() {
        Some(Ok(header)) => Columns::from_header(&header),
        Some(Err(e)) => {
            debug!(error = %e, "Unreadable CSV header, nothing imported");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    let mut items = Vec::new();
    for (index, record) in records.enumerate() {
        let row = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(row, error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };

        if record.len() > columns.width {
            debug!(
                row,
                fields = record.len(),
                expected = columns.width,
                "Skipping CSV row with too many fields"
            );
            continue;
        }

        items.push(columns.normalize(&record, now));
    }

    debug!(count = items.len(), "Decoded CSV items");
    items
}

/// Header positions, resolved once per file.
struct Columns {
    width: usize,
    id: Option<usize>,
    name: Option<usize>,
    sku: Option<usize>,
    quantity: Option<usize>,
    location: Option<usize>,
    price: Option<usize>,
    cost_unit: Option<usize>,
    threshold: Option<usize>,
    description: Option<usize>,
    image_url: Option<usize>,
    status: Option<usize>,
    updated_at: Option<usize>,
}

impl Columns {
    fn from_header(header: &::csv::StringRecord) -> Self {
        let names: Vec<&str> = header.iter().map(str::trim).collect();
        let find = |name: &str| names.iter().position(|n| *n == name);

        Columns {
            width: names.len(),
            id: find("id"),
            name: find("name"),
            sku: find("sku"),
            quantity: find("quantity"),
            location: find("location"),
            price: find("price"),
            cost_unit: find("costUnit"),
            threshold: find("threshold"),
            description: find("description"),
            image_url: find("imageUrl").or_else(|| find("image_url")),
            status: find("status"),
            updated_at: find("updatedAt"),
        }
    }

    fn normalize(&self, record: &::csv::StringRecord, now: DateTime<Utc>) -> Item {
        // Missing trailing fields read as empty, which pads short rows.
        let field = |column: Option<usize>| -> String {
            column
                .and_then(|index| record.get(index))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        let id = field(self.id);
        let status = field(self.status);

        Item {
            id: if id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                id
            },
            name: field(self.name),
            sku: field(self.sku),
            quantity: parse_count(&field(self.quantity)),
            location: field(self.location),
            price_cents: parse_amount(&field(self.price)),
            cost_cents: parse_amount(&field(self.cost_unit)),
            threshold: parse_count(&field(self.threshold)),
            description: field(self.description),
            image_url: field(self.image_url),
            status: if status.is_empty() {
                DEFAULT_ITEM_STATUS.to_string()
            } else {
                status
            },
            updated_at: parse_timestamp(&field(self.updated_at)).unwrap_or(now),
        }
    }
}

/// Integer cell; whole decimals ("4.0") are accepted, anything else is 0.
fn parse_count(text: &str) -> i64 {
    if let Ok(value) = text.parse::<i64>() {
        return value;
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => value as i64,
        _ => 0,
    }
}

fn parse_amount(text: &str) -> i64 {
    Money::parse_decimal(text).map(|m| m.cents()).unwrap_or(0)
}

// =============================================================================
// Unit Tests
// =============================================================================
