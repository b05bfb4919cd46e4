//! Role-based access control (RBAC) extractors.
//!
//! Most handlers check a [`Permission`] on [`AuthUser`] directly. The
//! extractors here cover endpoints whose whole surface sits behind a single
//! permission, so the check is visible in the handler signature.

use assetdesk_core::permissions::Permission;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the [`Permission::ManageUsers`] grant (admin only).
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.authorize(Permission::ManageUsers)?;
        Ok(RequireAdmin(user))
    }
}

/// Requires the [`Permission::ViewAuditLog`] grant (admin or manager).
pub struct RequireAuditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.authorize(Permission::ViewAuditLog)?;
        Ok(RequireAuditor(user))
    }
}
