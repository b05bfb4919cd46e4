//! CSV export rendering and bulk-import record parsing for assets.
//!
//! Export produces RFC 4180 text with a fixed header. Import accepts the
//! rows a client has already parsed from a spreadsheet as JSON objects, in
//! either `snake_case` or the `camelCase` spelling spreadsheet tools emit.

use std::borrow::Cow;
use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::asset::{normalize_asset_tag, AssetCategory, AssetStatus, MAX_ASSET_NAME_LEN};
use crate::error::CoreError;
use crate::types::Date;

/// Maximum number of records accepted in one import.
pub const MAX_IMPORT_RECORDS: usize = 5000;

/// Export column headers, in order.
pub const EXPORT_HEADER: [&str; 9] = [
    "Asset Tag",
    "Name",
    "Type",
    "Serial Number",
    "Status",
    "Purchase Price",
    "Location",
    "Assigned To",
    "Current Value",
];

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// One exported line.
#[derive(Debug, Clone)]
pub struct AssetCsvRow {
    pub asset_tag: String,
    pub name: String,
    pub category: AssetCategory,
    pub serial_number: Option<String>,
    pub status: AssetStatus,
    pub purchase_price: Option<Decimal>,
    pub location: Option<String>,
    pub assigned_to: Option<String>,
    pub current_value: Decimal,
}

/// Render rows as CSV text (header included, CRLF line endings).
pub fn render_assets_csv(rows: &[AssetCsvRow]) -> String {
    let mut out = String::new();
    push_line(&mut out, EXPORT_HEADER.iter().map(|h| Cow::Borrowed(*h)));

    for row in rows {
        let price = row.purchase_price.map(|p| p.to_string()).unwrap_or_default();
        push_line(
            &mut out,
            [
                Cow::Borrowed(row.asset_tag.as_str()),
                Cow::Borrowed(row.name.as_str()),
                Cow::Borrowed(row.category.as_str()),
                Cow::Borrowed(row.serial_number.as_deref().unwrap_or("")),
                Cow::Borrowed(row.status.as_str()),
                Cow::Owned(price),
                Cow::Borrowed(row.location.as_deref().unwrap_or("")),
                Cow::Borrowed(row.assigned_to.as_deref().unwrap_or("")),
                Cow::Owned(row.current_value.to_string()),
            ]
            .into_iter(),
        );
    }
    out
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = Cow<'a, str>>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
    }
    out.push_str("\r\n");
}

/// Quote a field when it contains a delimiter, quote, or line break.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// A raw import record as supplied by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRecord {
    #[serde(default, alias = "assetTag")]
    pub asset_tag: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "type")]
    pub category: Option<String>,
    #[serde(default, alias = "serialNumber")]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, alias = "purchasePrice")]
    pub purchase_price: Option<Value>,
    #[serde(default, alias = "purchaseDate")]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// A validated import record, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAsset {
    pub asset_tag: String,
    pub name: String,
    pub category: AssetCategory,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<Date>,
    pub vendor: Option<String>,
    pub location: Option<String>,
}

/// Validate every record; the first failure rejects the whole batch.
///
/// Row numbers in error messages are 1-based. Tags repeated within the
/// batch are rejected here; collisions with stored tags surface on insert.
pub fn parse_import_batch(records: &[ImportRecord]) -> Result<Vec<ParsedAsset>, CoreError> {
    if records.is_empty() {
        return Err(CoreError::Validation("import contains no records".to_string()));
    }
    if records.len() > MAX_IMPORT_RECORDS {
        return Err(CoreError::Validation(format!(
            "import is limited to {MAX_IMPORT_RECORDS} records, got {}",
            records.len()
        )));
    }

    let mut seen = HashSet::new();
    let mut parsed = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let row = i + 1;
        let asset = parse_import_record(record).map_err(|e| match e {
            CoreError::Validation(msg) => CoreError::Validation(format!("row {row}: {msg}")),
            other => other,
        })?;
        if !seen.insert(asset.asset_tag.clone()) {
            return Err(CoreError::Validation(format!(
                "row {row}: asset tag '{}' appears more than once",
                asset.asset_tag
            )));
        }
        parsed.push(asset);
    }
    Ok(parsed)
}

/// Validate a single record.
pub fn parse_import_record(record: &ImportRecord) -> Result<ParsedAsset, CoreError> {
    let asset_tag = normalize_asset_tag(record.asset_tag.as_deref().unwrap_or(""))?;

    let name = non_blank(&record.name)
        .ok_or_else(|| CoreError::Validation("name is required".to_string()))?;
    if name.chars().count() > MAX_ASSET_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_ASSET_NAME_LEN} characters"
        )));
    }

    let category = non_blank(&record.category)
        .ok_or_else(|| CoreError::Validation("type is required".to_string()))
        .and_then(|c| AssetCategory::from_str(&c.to_lowercase()))?;

    let purchase_date = non_blank(&record.purchase_date)
        .map(|d| {
            Date::parse_from_str(&d, "%Y-%m-%d").map_err(|_| {
                CoreError::Validation(format!("purchase date '{d}' must be YYYY-MM-DD"))
            })
        })
        .transpose()?;

    Ok(ParsedAsset {
        asset_tag,
        name,
        category,
        serial_number: non_blank(&record.serial_number),
        manufacturer: non_blank(&record.manufacturer),
        model: non_blank(&record.model),
        purchase_price: parse_price(record.purchase_price.as_ref())?,
        purchase_date,
        vendor: non_blank(&record.vendor),
        location: non_blank(&record.location),
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Prices arrive as JSON numbers or as spreadsheet strings ("1,299.00").
fn parse_price(value: Option<&Value>) -> Result<Option<Decimal>, CoreError> {
    let text = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().replace(',', ""),
        Some(other) => {
            return Err(CoreError::Validation(format!(
                "purchase price must be a number, got {other}"
            )))
        }
    };
    if text.is_empty() {
        return Ok(None);
    }
    let price: Decimal = text
        .parse()
        .map_err(|_| CoreError::Validation(format!("purchase price '{text}' is not a number")))?;
    if price < Decimal::ZERO {
        return Err(CoreError::Validation(
            "purchase price must not be negative".to_string(),
        ));
    }
    Ok(Some(price))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
