//! Handlers for browsing the audit trail.
//!
//! Read-only: entries are immutable and no endpoint updates or deletes them.
//! All endpoints require `admin` or `manager`.

use assetdesk_core::audit::{log_categories, AuditEntityType};
use assetdesk_core::error::CoreError;
use assetdesk_core::types::DbId;
use assetdesk_db::models::audit::{AuditLog, AuditLogPage, AuditQuery};
use assetdesk_db::repositories::AuditLogRepo;
use axum::extract::State;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::rbac::RequireAuditor;
use crate::response::DataResponse;
use crate::state::AppState;

const CATEGORIES: &[&str] = &[
    log_categories::AUTHENTICATION,
    log_categories::OPERATIONS,
    log_categories::CONFIGURATION,
    log_categories::DATA_TRANSFER,
];

/// GET /api/audit
///
/// Query entries with filters and pagination, newest first.
pub async fn query_audit_logs(
    State(state): State<AppState>,
    RequireAuditor(_user): RequireAuditor,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<DataResponse<AuditLogPage>>> {
    if let Some(category) = query.category.as_deref() {
        if !CATEGORIES.contains(&category) {
            return Err(AppError::BadRequest(format!(
                "Unknown log category '{category}'. Must be one of: {}",
                CATEGORIES.join(", ")
            )));
        }
    }
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(AppError::BadRequest("'from' must not be after 'to'".into()));
        }
    }

    let items = AuditLogRepo::query(&state.pool, &query).await?;
    let total = AuditLogRepo::count(&state.pool, &query).await?;

    Ok(Json(DataResponse {
        data: AuditLogPage { items, total },
    }))
}

/// GET /api/audit/{id}
pub async fn get_audit_log(
    State(state): State<AppState>,
    RequireAuditor(_user): RequireAuditor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AuditLog>>> {
    let log = AuditLogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AuditLog",
            id,
        }))?;
    Ok(Json(DataResponse { data: log }))
}

/// GET /api/audit/entity/{entity_type}/{entity_id}
///
/// Full history of one entity, oldest first.
pub async fn entity_history(
    State(state): State<AppState>,
    RequireAuditor(_user): RequireAuditor,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<Vec<AuditLog>>>> {
    let entity_type = AuditEntityType::from_str(&entity_type)?;
    let data = AuditLogRepo::list_for_entity(&state.pool, entity_type.as_str(), entity_id).await?;
    Ok(Json(DataResponse { data }))
}
