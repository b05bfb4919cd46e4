//! Dashboard aggregate models.

use serde::Serialize;
use sqlx::FromRow;

/// Number of assets in one status or category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

/// Response body for `GET /api/dashboard/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_assets: i64,
    pub total_employees: i64,
    pub active_assignments: i64,
    pub by_status: Vec<GroupCount>,
    pub by_category: Vec<GroupCount>,
}
