//! First-run provisioning.

use assetdesk_core::roles::ROLE_ADMIN;
use assetdesk_db::models::user::{CreateUser, User};
use assetdesk_db::repositories::{RoleRepo, UserRepo};
use assetdesk_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the initial administrator when the `users` table is empty.
///
/// Returns the created user, or `None` if any account already exists.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<Option<User>> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(None);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::InternalError(format!("ADMIN_PASSWORD rejected: {msg}")))?;

    let role = RoleRepo::find_by_name(pool, ROLE_ADMIN)
        .await?
        .ok_or_else(|| AppError::InternalError("admin role is not seeded".into()))?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role_id: role.id,
        },
    )
    .await?;

    tracing::warn!(
        user_id = user.id,
        username = %user.username,
        "Created initial admin account; change its password",
    );

    Ok(Some(user))
}
