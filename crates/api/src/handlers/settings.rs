//! Handlers for the `/settings` singleton.
//!
//! Credentials are write-only: responses carry `*_set` flags instead.

use assetdesk_core::audit::{AuditAction, AuditEntry, ChangeSet};
use assetdesk_core::permissions::Permission;
use assetdesk_core::settings::{validate_company_name, SETTINGS_ID};
use assetdesk_core::types::DbId;
use assetdesk_db::models::settings::{SettingsView, UpdateSettings};
use assetdesk_db::repositories::SettingsRepo;
use axum::extract::State;

use crate::audit;
use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/settings
///
/// Creates the row with defaults on first access.
pub async fn get_settings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<SettingsView>>> {
    auth.authorize(Permission::ViewSettings)?;
    let settings = SettingsRepo::get_or_init(&state.pool).await?;
    Ok(Json(DataResponse {
        data: SettingsView::from(settings),
    }))
}

/// PUT /api/settings
///
/// Partial update. A supplied depreciation schedule replaces the stored one
/// as a whole and must be valid.
pub async fn update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Json(mut input): Json<UpdateSettings>,
) -> AppResult<Json<DataResponse<SettingsView>>> {
    auth.authorize(Permission::UpdateSettings)?;

    if let Some(name) = input.company_name.take() {
        validate_company_name(&name)?;
        input.company_name = Some(name.trim().to_string());
    }
    if let Some(schedule) = &input.depreciation {
        schedule.validate()?;
    }

    let before = SettingsView::from(SettingsRepo::get_or_init(&state.pool).await?);
    let after = SettingsView::from(SettingsRepo::update(&state.pool, &input).await?);

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::SettingsUpdated)
            .actor(auth.user_id)
            .entity(DbId::from(SETTINGS_ID), after.settings.company_name.clone())
            .changes(ChangeSet::updated(&before, &after))
            .request(meta),
    )
    .await;

    tracing::info!(user_id = auth.user_id, "Settings updated");

    Ok(Json(DataResponse { data: after }))
}
