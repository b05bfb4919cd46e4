//! Assignment entity model and DTOs.

use assetdesk_core::assignment::AssignmentStatus;
use assetdesk_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assignment {
    pub id: DbId,
    pub asset_id: DbId,
    pub employee_id: DbId,
    pub assigned_by: Option<DbId>,
    pub assigned_date: Timestamp,
    pub expected_return_date: Option<Date>,
    pub returned_date: Option<Timestamp>,
    #[sqlx(try_from = "String")]
    pub status: AssignmentStatus,
    pub return_condition: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An assignment joined with the asset and employee it links.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub assignment: Assignment,
    pub asset_tag: String,
    pub asset_name: String,
    pub employee_code: String,
    pub employee_name: String,
}

/// Request body for `POST /api/assignments`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignment {
    pub asset_id: DbId,
    pub employee_id: DbId,
    pub expected_return_date: Option<Date>,
    pub notes: Option<String>,
}

/// Request body for `POST /api/assignments/{id}/return`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReturnAssignment {
    pub return_condition: Option<String>,
    pub notes: Option<String>,
}

/// Filters for `GET /api/assignments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentFilter {
    pub status: Option<AssignmentStatus>,
}
