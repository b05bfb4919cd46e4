//! Asset and asset note models and DTOs.

use assetdesk_core::asset::{AssetCategory, AssetStatus};
use assetdesk_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `assets` table.
///
/// `current_value` is not stored; see [`AssetView`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub asset_tag: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub category: AssetCategory,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<Date>,
    pub warranty_expiry: Option<Date>,
    pub vendor: Option<String>,
    pub location: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: AssetStatus,
    pub qr_code: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The employee currently holding an asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignee {
    pub assignment_id: DbId,
    pub employee_id: DbId,
    pub name: String,
}

/// An asset row joined with its active assignment, if any.
#[derive(Debug, Clone, FromRow)]
pub struct AssetRow {
    #[sqlx(flatten)]
    pub asset: Asset,
    pub assignment_id: Option<DbId>,
    pub assignee_employee_id: Option<DbId>,
    pub assignee_name: Option<String>,
}

impl AssetRow {
    pub fn assignee(&self) -> Option<Assignee> {
        match (self.assignment_id, self.assignee_employee_id, &self.assignee_name) {
            (Some(assignment_id), Some(employee_id), Some(name)) => Some(Assignee {
                assignment_id,
                employee_id,
                name: name.clone(),
            }),
            _ => None,
        }
    }
}

/// Read model returned by the API: the stored asset plus derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct AssetView {
    #[serde(flatten)]
    pub asset: Asset,
    pub current_value: Decimal,
    pub assigned_to: Option<Assignee>,
}

/// Full record for `GET /api/assets/{id}` and for audit snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub view: AssetView,
    pub notes: Vec<AssetNote>,
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// A note attached to an asset, with the author's username resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetNote {
    pub id: DbId,
    pub asset_id: DbId,
    pub author_id: Option<DbId>,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: Timestamp,
}

/// Request body for `POST /api/assets/{id}/notes`.
#[derive(Debug, Deserialize)]
pub struct CreateAssetNote {
    pub content: String,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST /api/assets`.
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct CreateAsset {
    pub asset_tag: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub category: AssetCategory,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<Date>,
    pub warranty_expiry: Option<Date>,
    pub vendor: Option<String>,
    pub location: Option<String>,
    pub status: Option<AssetStatus>,
}

/// A fully resolved insert: tag normalised, status decided, code rendered.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub asset_tag: String,
    pub name: String,
    pub category: AssetCategory,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<Date>,
    pub warranty_expiry: Option<Date>,
    pub vendor: Option<String>,
    pub location: Option<String>,
    pub status: AssetStatus,
    pub qr_code: Option<String>,
    pub created_by: Option<DbId>,
}

/// Request body for `PUT /api/assets/{id}`. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, validator::Validate)]
pub struct UpdateAsset {
    pub asset_tag: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub category: Option<AssetCategory>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<Date>,
    pub warranty_expiry: Option<Date>,
    pub vendor: Option<String>,
    pub location: Option<String>,
    pub status: Option<AssetStatus>,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filters for `GET /api/assets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFilter {
    pub status: Option<AssetStatus>,
    pub category: Option<AssetCategory>,
    pub location: Option<String>,
    /// Employee id holding the asset.
    pub assigned_to: Option<DbId>,
    /// Case-insensitive substring over name, tag, and serial number.
    pub search: Option<String>,
}
