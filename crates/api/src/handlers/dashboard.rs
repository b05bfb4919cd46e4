//! Handlers for the `/dashboard` summary widgets.

use assetdesk_core::assignment::RECENT_ASSIGNMENTS_LIMIT;
use assetdesk_core::depreciation::{summarize, DepreciationSummary};
use assetdesk_core::permissions::Permission;
use assetdesk_db::models::assignment::AssignmentDetail;
use assetdesk_db::models::dashboard::DashboardStats;
use assetdesk_db::repositories::{AssignmentRepo, DashboardRepo, EmployeeRepo};
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::Json;
use crate::handlers::assets::{load_schedule, today};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `GET /dashboard/health`.
#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    /// `"healthy"` or `"unhealthy"`.
    pub status: &'static str,
    /// `"connected"` or `"disconnected"`.
    pub database: &'static str,
}

/// GET /api/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    auth.authorize(Permission::ViewDashboard)?;

    let data = DashboardStats {
        total_assets: DashboardRepo::count_assets(&state.pool).await?,
        total_employees: EmployeeRepo::count(&state.pool).await?,
        active_assignments: AssignmentRepo::count_active(&state.pool).await?,
        by_status: DashboardRepo::count_by_status(&state.pool).await?,
        by_category: DashboardRepo::count_by_category(&state.pool).await?,
    };

    Ok(Json(DataResponse { data }))
}

/// GET /api/dashboard/depreciation
///
/// Portfolio purchase value vs. current book value under the stored schedule.
pub async fn depreciation(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<DepreciationSummary>>> {
    auth.authorize(Permission::ViewDashboard)?;

    let schedule = load_schedule(&state).await?;
    let today = today();
    let inputs = DashboardRepo::valuation_inputs(&state.pool).await?;

    let data = summarize(inputs.into_iter().map(|(category, price, date)| {
        (price, schedule.current_value(category, price, date, today))
    }));

    Ok(Json(DataResponse { data }))
}

/// GET /api/dashboard/recent-assignments
pub async fn recent_assignments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AssignmentDetail>>>> {
    auth.authorize(Permission::ViewDashboard)?;
    let data = AssignmentRepo::recent(&state.pool, RECENT_ASSIGNMENTS_LIMIT).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/dashboard/health
///
/// Unauthenticated; 503 when the database is unreachable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ServiceHealth>) {
    match assetdesk_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ServiceHealth {
                status: "healthy",
                database: "connected",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ServiceHealth {
                    status: "unhealthy",
                    database: "disconnected",
                }),
            )
        }
    }
}
