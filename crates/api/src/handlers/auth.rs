//! Handlers for the `/auth` resource (login, logout, current user).

use assetdesk_core::audit::{AuditAction, AuditEntry};
use assetdesk_core::error::CoreError;
use assetdesk_db::models::user::UserResponse;
use assetdesk_db::repositories::{RoleRepo, UserRepo};
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::audit;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response returned by login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with username + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    ClientInfo(meta): ClientInfo,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find user by username.
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    // 2. Check if the account is active.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // 3. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    // 4. On success: set last_login_at.
    UserRepo::record_login(&state.pool, user.id).await?;

    // 5. Resolve role name for JWT claims.
    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    let access_token = generate_access_token(user.id, &role_name, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::UserLogin)
            .actor(user.id)
            .entity(user.id, user.username.clone())
            .request(meta),
    )
    .await;

    tracing::info!(user_id = user.id, role = %role_name, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserResponse::from_user(&user, role_name),
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; logout is recorded and the client drops its token.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
) -> AppResult<StatusCode> {
    let username = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_default();

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::UserLogout)
            .actor(auth.user_id)
            .entity(auth.user_id, username)
            .request(meta),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
///
/// The authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    Ok(Json(DataResponse {
        data: UserResponse::from_user(&user, role_name),
    }))
}
