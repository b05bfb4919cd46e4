//! Handlers for the `/employees` resource.

use assetdesk_core::audit::{AuditAction, AuditEntry, ChangeSet};
use assetdesk_core::employee::normalize_employee_code;
use assetdesk_core::error::CoreError;
use assetdesk_core::permissions::Permission;
use assetdesk_core::types::DbId;
use assetdesk_db::models::employee::{CreateEmployee, Employee, EmployeeFilter, UpdateEmployee};
use assetdesk_db::repositories::{AssignmentRepo, EmployeeRepo};
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use crate::audit;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_employee(state: &AppState, id: DbId) -> AppResult<Employee> {
    EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))
}

/// GET /api/employees
pub async fn list_employees(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<EmployeeFilter>,
) -> AppResult<Json<DataResponse<Vec<Employee>>>> {
    auth.authorize(Permission::ViewEmployees)?;
    let data = EmployeeRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Employee>>> {
    auth.authorize(Permission::ViewEmployees)?;
    let employee = find_employee(&state, id).await?;
    Ok(Json(DataResponse { data: employee }))
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Json(mut input): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<DataResponse<Employee>>)> {
    auth.authorize(Permission::ManageEmployees)?;
    input.validate()?;
    input.employee_code = normalize_employee_code(&input.employee_code)?;

    let employee = EmployeeRepo::create(&state.pool, &input).await?;

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::EmployeeCreated)
            .actor(auth.user_id)
            .entity(employee.id, employee.full_name())
            .changes(ChangeSet::created(&employee))
            .request(meta),
    )
    .await;

    tracing::info!(employee_id = employee.id, code = %employee.employee_code, "Employee created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: employee })))
}

/// PUT /api/employees/{id}
pub async fn update_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmployee>,
) -> AppResult<Json<DataResponse<Employee>>> {
    auth.authorize(Permission::ManageEmployees)?;
    input.validate()?;

    let before = find_employee(&state, id).await?;

    let after = EmployeeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))?;

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::EmployeeUpdated)
            .actor(auth.user_id)
            .entity(id, after.full_name())
            .changes(ChangeSet::updated(&before, &after))
            .request(meta),
    )
    .await;

    Ok(Json(DataResponse { data: after }))
}

/// DELETE /api/employees/{id}
///
/// Refused while the employee holds an asset. Returned-assignment history
/// also blocks deletion (foreign key); deactivate the employee instead.
pub async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.authorize(Permission::DeleteEmployee)?;

    let before = find_employee(&state, id).await?;

    if AssignmentRepo::employee_has_active(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "employee still holds assigned assets; return them first".into(),
        )));
    }

    if !EmployeeRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }));
    }

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::EmployeeDeleted)
            .actor(auth.user_id)
            .entity(id, before.full_name())
            .changes(ChangeSet::deleted(&before))
            .request(meta),
    )
    .await;

    tracing::info!(employee_id = id, "Employee deleted");

    Ok(StatusCode::NO_CONTENT)
}
