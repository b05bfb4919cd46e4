//! Handlers for the `/assignments` resource (assign / return workflow).

use assetdesk_core::assignment::{check_employee_can_receive, check_returnable};
use assetdesk_core::audit::{AuditAction, AuditEntry, ChangeSet};
use assetdesk_core::error::CoreError;
use assetdesk_core::permissions::Permission;
use assetdesk_core::types::DbId;
use assetdesk_db::models::assignment::{
    AssignmentDetail, AssignmentFilter, CreateAssignment, ReturnAssignment,
};
use assetdesk_db::repositories::{AssetRepo, AssignmentRepo, EmployeeRepo};
use axum::extract::State;
use axum::http::StatusCode;

use crate::audit;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::handlers::assets::require_assignable;
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_detail(state: &AppState, id: DbId) -> AppResult<AssignmentDetail> {
    AssignmentRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id,
        }))
}

fn entity_label(detail: &AssignmentDetail) -> String {
    format!("{} / {}", detail.asset_tag, detail.employee_name)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/assignments
pub async fn list_assignments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<AssignmentFilter>,
) -> AppResult<Json<DataResponse<Vec<AssignmentDetail>>>> {
    auth.authorize(Permission::ViewAssets)?;
    let data = AssignmentRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/assignments/asset/{id}/history
pub async fn asset_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(asset_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AssignmentDetail>>>> {
    auth.authorize(Permission::ViewAssets)?;

    if AssetRepo::find_by_id(&state.pool, asset_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id: asset_id,
        }));
    }

    let data = AssignmentRepo::history_for_asset(&state.pool, asset_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/assignments/employee/{id}
pub async fn employee_assignments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(employee_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AssignmentDetail>>>> {
    auth.authorize(Permission::ViewEmployees)?;

    if EmployeeRepo::find_by_id(&state.pool, employee_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id: employee_id,
        }));
    }

    let data = AssignmentRepo::list_for_employee(&state.pool, employee_id).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// POST /api/assignments
///
/// Hand an available asset to an active employee. The asset moves to
/// `assigned` in the same transaction that creates the assignment.
pub async fn create_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Json(input): Json<CreateAssignment>,
) -> AppResult<(StatusCode, Json<DataResponse<AssignmentDetail>>)> {
    auth.authorize(Permission::ManageAssignments)?;

    let employee = EmployeeRepo::find_by_id(&state.pool, input.employee_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id: input.employee_id,
        }))?;
    check_employee_can_receive(employee.is_active)?;

    require_assignable(&state, input.asset_id).await?;

    // The check above can race with a concurrent assignment; the conditional
    // status flip in the repository reports a lost race as `None`.
    let assignment = AssignmentRepo::assign(&state.pool, &input, Some(auth.user_id))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "asset is not available for assignment".into(),
            ))
        })?;

    let detail = find_detail(&state, assignment.id).await?;

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::AssetAssigned)
            .actor(auth.user_id)
            .entity(assignment.id, entity_label(&detail))
            .changes(ChangeSet::created(&detail))
            .request(meta),
    )
    .await;

    tracing::info!(
        assignment_id = assignment.id,
        asset_id = assignment.asset_id,
        employee_id = assignment.employee_id,
        "Asset assigned",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// POST /api/assignments/{id}/return
///
/// Close an active assignment; the asset becomes `available` again.
pub async fn return_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Path(id): Path<DbId>,
    input: Option<Json<ReturnAssignment>>,
) -> AppResult<Json<DataResponse<AssignmentDetail>>> {
    auth.authorize(Permission::ManageAssignments)?;
    let input = input.map(|Json(i)| i).unwrap_or_default();

    let before = find_detail(&state, id).await?;
    check_returnable(before.assignment.status)?;

    AssignmentRepo::mark_returned(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "assignment has already been returned".into(),
            ))
        })?;

    let after = find_detail(&state, id).await?;

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::AssetReturned)
            .actor(auth.user_id)
            .entity(id, entity_label(&after))
            .changes(ChangeSet::updated(&before, &after))
            .request(meta),
    )
    .await;

    tracing::info!(assignment_id = id, asset_id = after.assignment.asset_id, "Asset returned");

    Ok(Json(DataResponse { data: after }))
}
