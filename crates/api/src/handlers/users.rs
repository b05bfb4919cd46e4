//! Handlers for the `/users` resource (account management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use assetdesk_core::audit::{AuditAction, AuditEntry, ChangeSet};
use assetdesk_core::error::CoreError;
use assetdesk_db::models::user::{CreateUser, NewUserRequest, UserResponse};
use assetdesk_db::repositories::{RoleRepo, UserRepo};
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use crate::audit;
use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::client::ClientInfo;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/users
///
/// List all users with resolved role names.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;

    // Pre-fetch all roles to avoid N+1 queries.
    let roles = RoleRepo::list(&state.pool).await?;

    let data = users
        .iter()
        .map(|u| {
            let role_name = roles
                .iter()
                .find(|r| r.id == u.role_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "unknown".to_string());
            UserResponse::from_user(u, role_name)
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/users
///
/// Create a user. Validates password strength, hashes it, and returns
/// a safe [`UserResponse`] with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ClientInfo(meta): ClientInfo,
    Json(input): Json<NewUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = RoleRepo::find_by_name(&state.pool, input.role.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown role '{}'",
                input.role
            )))
        })?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash: hashed,
            role_id: role.id,
        },
    )
    .await?;

    let response = UserResponse::from_user(&user, role.name);

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::UserCreated)
            .actor(admin.user_id)
            .entity(user.id, user.username.clone())
            .changes(ChangeSet::created(&response))
            .request(meta),
    )
    .await;

    tracing::info!(user_id = user.id, role = %response.role, "User created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}
