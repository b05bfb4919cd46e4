//! Handlers for the `/assets` resource.
//!
//! Every read carries `current_value`, computed from the purchase data and
//! the depreciation schedule stored in settings at request time. Every
//! successful write records one audit entry with full before/after
//! snapshots of the asset (including notes).

use assetdesk_core::asset::{
    check_assignable, initial_status, normalize_asset_tag, normalize_note,
    validate_manual_status_change, AssetStatus,
};
use assetdesk_core::asset_csv::{
    parse_import_batch, render_assets_csv, AssetCsvRow, ImportRecord,
};
use assetdesk_core::audit::{AuditAction, AuditEntry, ChangeSet};
use assetdesk_core::depreciation::DepreciationSchedule;
use assetdesk_core::error::CoreError;
use assetdesk_core::permissions::Permission;
use assetdesk_core::types::{Date, DbId};
use assetdesk_db::models::asset::{
    Asset, AssetDetail, AssetFilter, AssetNote, AssetRow, AssetView, CreateAsset,
    CreateAssetNote, NewAsset, UpdateAsset,
};
use assetdesk_db::repositories::{AssetRepo, SettingsRepo};
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::audit;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::response::DataResponse;
use crate::state::AppState;

/// File name offered for CSV downloads.
const EXPORT_FILE_NAME: &str = "assets.csv";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response body for `GET /assets/{id}/qrcode`.
#[derive(Debug, Serialize)]
pub struct QrCodeResponse {
    pub qr_code: String,
}

/// Request body for `POST /assets/import/csv`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub data: Value,
}

/// Response body for `POST /assets/import/csv`.
#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub count: usize,
    pub assets: Vec<Asset>,
}

// ---------------------------------------------------------------------------
// Valuation helpers
// ---------------------------------------------------------------------------

/// The depreciation schedule currently stored in settings.
pub(crate) async fn load_schedule(state: &AppState) -> AppResult<DepreciationSchedule> {
    let settings = SettingsRepo::get_or_init(&state.pool).await?;
    Ok(settings.depreciation_schedule())
}

/// Valuation date for depreciation: today in UTC.
pub(crate) fn today() -> Date {
    Utc::now().date_naive()
}

fn to_view(row: AssetRow, schedule: &DepreciationSchedule, today: Date) -> AssetView {
    let assigned_to = row.assignee();
    let asset = row.asset;
    let current_value = schedule.current_value(
        asset.category,
        asset.purchase_price,
        asset.purchase_date,
        today,
    );
    AssetView {
        asset,
        current_value,
        assigned_to,
    }
}

/// Load the full record for an asset, or `NotFound`.
async fn load_detail(
    state: &AppState,
    id: DbId,
    schedule: &DepreciationSchedule,
) -> AppResult<AssetDetail> {
    let row = AssetRepo::find_row_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;
    let notes = AssetRepo::list_notes(&state.pool, id).await?;
    Ok(AssetDetail {
        view: to_view(row, schedule, today()),
        notes,
    })
}

/// Full record for an asset that was just inserted.
///
/// The insert has already committed, so a failed reload is logged and the
/// record is built from the inserted row with the default schedule.
async fn created_detail(state: &AppState, asset: Asset) -> AssetDetail {
    let reloaded = match load_schedule(state).await {
        Ok(schedule) => load_detail(state, asset.id, &schedule).await,
        Err(err) => Err(err),
    };
    match reloaded {
        Ok(detail) => detail,
        Err(err) => {
            tracing::warn!(asset_id = asset.id, error = %err, "Failed to reload created asset");
            let row = AssetRow {
                asset,
                assignment_id: None,
                assignee_employee_id: None,
                assignee_name: None,
            };
            AssetDetail {
                view: to_view(row, &DepreciationSchedule::default(), today()),
                notes: Vec::new(),
            }
        }
    }
}

fn render_code(state: &AppState, asset_tag: &str) -> AppResult<String> {
    Ok(state.code_images.generate(asset_tag)?)
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/assets
///
/// List assets, newest first, with optional exact-match filters and a
/// case-insensitive `search` over name, tag, and serial number.
pub async fn list_assets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<AssetFilter>,
) -> AppResult<Json<DataResponse<Vec<AssetView>>>> {
    auth.authorize(Permission::ViewAssets)?;

    let schedule = load_schedule(&state).await?;
    let today = today();
    let rows = AssetRepo::list(&state.pool, &filter).await?;
    let data = rows
        .into_iter()
        .map(|row| to_view(row, &schedule, today))
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AssetDetail>>> {
    auth.authorize(Permission::ViewAssets)?;

    let schedule = load_schedule(&state).await?;
    let detail = load_detail(&state, id, &schedule).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/assets/{id}/qrcode
///
/// The stored code image. Assets created before codes were generated get
/// one rendered on the fly.
pub async fn get_qrcode(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QrCodeResponse>>> {
    auth.authorize(Permission::ViewAssets)?;

    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    let qr_code = match asset.qr_code {
        Some(code) => code,
        None => render_code(&state, &asset.asset_tag)?,
    };

    Ok(Json(DataResponse {
        data: QrCodeResponse { qr_code },
    }))
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// POST /api/assets
///
/// Create an asset. Status defaults to `available`; the code image is
/// rendered from the tag.
pub async fn create_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Json(input): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<DataResponse<AssetDetail>>)> {
    auth.authorize(Permission::CreateAsset)?;
    input.validate()?;

    let asset_tag = normalize_asset_tag(&input.asset_tag)?;
    let status = initial_status(input.status)?;
    let qr_code = render_code(&state, &asset_tag)?;

    let new_asset = NewAsset {
        asset_tag,
        name: input.name.trim().to_string(),
        category: input.category,
        serial_number: input.serial_number,
        manufacturer: input.manufacturer,
        model: input.model,
        purchase_price: input.purchase_price,
        purchase_date: input.purchase_date,
        warranty_expiry: input.warranty_expiry,
        vendor: input.vendor,
        location: input.location,
        status,
        qr_code: Some(qr_code),
        created_by: Some(auth.user_id),
    };

    let asset = AssetRepo::create(&state.pool, &new_asset).await?;
    let detail = created_detail(&state, asset.clone()).await;

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::AssetCreated)
            .actor(auth.user_id)
            .entity(asset.id, asset.name.clone())
            .changes(ChangeSet::created(&detail))
            .request(meta),
    )
    .await;

    tracing::info!(asset_id = asset.id, asset_tag = %asset.asset_tag, "Asset created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/assets/{id}
///
/// Partial update. A tag change regenerates the code image. Status may not
/// move into or out of `assigned` here.
pub async fn update_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAsset>,
) -> AppResult<Json<DataResponse<AssetDetail>>> {
    auth.authorize(Permission::UpdateAsset)?;
    input.validate()?;

    let schedule = load_schedule(&state).await?;
    let before = load_detail(&state, id, &schedule).await?;
    let current = &before.view.asset;

    if let Some(status) = input.status {
        validate_manual_status_change(current.status, status)?;
    }

    let mut qr_code = None;
    if let Some(tag) = input.asset_tag.as_deref() {
        let tag = normalize_asset_tag(tag)?;
        if tag != current.asset_tag {
            qr_code = Some(render_code(&state, &tag)?);
        }
        input.asset_tag = Some(tag);
    }
    if let Some(name) = input.name.as_deref() {
        input.name = Some(name.trim().to_string());
    }

    let expected_status = input.status.map(|_| current.status);
    let updated =
        AssetRepo::update(&state.pool, id, &input, qr_code.as_deref(), expected_status).await?;
    if updated.is_none() {
        return Err(match AssetRepo::find_by_id(&state.pool, id).await? {
            Some(_) => AppError::Core(CoreError::Conflict(
                "asset status changed while updating; reload and retry".into(),
            )),
            None => AppError::Core(CoreError::NotFound { entity: "Asset", id }),
        });
    }

    let after = load_detail(&state, id, &schedule).await?;

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::AssetUpdated)
            .actor(auth.user_id)
            .entity(id, after.view.asset.name.clone())
            .changes(ChangeSet::updated(&before, &after))
            .request(meta),
    )
    .await;

    tracing::info!(asset_id = id, "Asset updated");

    Ok(Json(DataResponse { data: after }))
}

/// DELETE /api/assets/{id}
///
/// Permanently delete an asset and its notes and assignment history.
/// An asset that is currently assigned must be returned first.
pub async fn delete_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.authorize(Permission::DeleteAsset)?;

    let schedule = load_schedule(&state).await?;
    let before = load_detail(&state, id, &schedule).await?;

    if before.view.asset.status == AssetStatus::Assigned || before.view.assigned_to.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "asset is currently assigned; return it before deleting".into(),
        )));
    }

    let deleted = AssetRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::AssetDeleted)
            .actor(auth.user_id)
            .entity(id, deleted.name.clone())
            .changes(ChangeSet::deleted(&before))
            .request(meta),
    )
    .await;

    tracing::info!(asset_id = id, asset_tag = %deleted.asset_tag, "Asset deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/assets/{id}/notes
///
/// Append a note authored by the caller. Audited as an asset update.
pub async fn add_note(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Path(id): Path<DbId>,
    Json(input): Json<CreateAssetNote>,
) -> AppResult<(StatusCode, Json<DataResponse<AssetNote>>)> {
    auth.authorize(Permission::UpdateAsset)?;

    let content = normalize_note(&input.content)?;

    let schedule = load_schedule(&state).await?;
    let before = load_detail(&state, id, &schedule).await?;

    let note = AssetRepo::add_note(&state.pool, id, Some(auth.user_id), &content).await?;

    let after = load_detail(&state, id, &schedule).await?;

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::AssetUpdated)
            .actor(auth.user_id)
            .entity(id, after.view.asset.name.clone())
            .changes(ChangeSet::updated(&before, &after))
            .request(meta),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// GET|POST /api/assets/export/csv
///
/// Download the (optionally filtered) asset list as CSV.
pub async fn export_csv(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Query(filter): Query<AssetFilter>,
) -> AppResult<Response> {
    auth.authorize(Permission::ExportAssets)?;

    let schedule = load_schedule(&state).await?;
    let today = today();
    let rows: Vec<AssetCsvRow> = AssetRepo::list(&state.pool, &filter)
        .await?
        .into_iter()
        .map(|row| {
            let view = to_view(row, &schedule, today);
            AssetCsvRow {
                asset_tag: view.asset.asset_tag,
                name: view.asset.name,
                category: view.asset.category,
                serial_number: view.asset.serial_number,
                status: view.asset.status,
                purchase_price: view.asset.purchase_price,
                location: view.asset.location,
                assigned_to: view.assigned_to.map(|a| a.name),
                current_value: view.current_value,
            }
        })
        .collect();

    let csv = render_assets_csv(&rows);
    let count = rows.len();

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::CsvExported)
            .actor(auth.user_id)
            .entity_name(format!("CSV export: {count} assets"))
            .changes(ChangeSet::summary(json!({ "count": count })))
            .request(meta),
    )
    .await;

    tracing::info!(count, "Assets exported to CSV");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename={EXPORT_FILE_NAME}"),
            ),
        ],
        csv,
    )
        .into_response())
}

/// POST /api/assets/import/csv
///
/// Body: `{"data": [record, ...]}`. Every record is validated before any is
/// written; all rows are then inserted in one transaction, so an import
/// either lands completely or not at all.
pub async fn import_csv(
    State(state): State<AppState>,
    auth: AuthUser,
    ClientInfo(meta): ClientInfo,
    Json(input): Json<ImportRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ImportResult>>)> {
    auth.authorize(Permission::ImportAssets)?;

    let Value::Array(items) = input.data else {
        return Err(AppError::BadRequest("data must be an array".into()));
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<ImportRecord>(item)
                .map_err(|e| AppError::BadRequest(format!("row {}: {e}", i + 1)))
        })
        .collect::<AppResult<Vec<_>>>()?;

    let parsed = parse_import_batch(&records)?;

    let mut new_assets = Vec::with_capacity(parsed.len());
    for p in parsed {
        let qr_code = render_code(&state, &p.asset_tag)?;
        new_assets.push(NewAsset {
            asset_tag: p.asset_tag,
            name: p.name,
            category: p.category,
            serial_number: p.serial_number,
            manufacturer: p.manufacturer,
            model: p.model,
            purchase_price: p.purchase_price,
            purchase_date: p.purchase_date,
            warranty_expiry: None,
            vendor: p.vendor,
            location: p.location,
            status: AssetStatus::Available,
            qr_code: Some(qr_code),
            created_by: Some(auth.user_id),
        });
    }

    let mut tx = state.pool.begin().await?;
    let mut assets = Vec::with_capacity(new_assets.len());
    for new_asset in &new_assets {
        assets.push(AssetRepo::create(&mut *tx, new_asset).await?);
    }
    tx.commit().await?;

    let count = assets.len();
    let tags: Vec<&str> = assets.iter().map(|a| a.asset_tag.as_str()).collect();

    audit::record(
        &state.pool,
        AuditEntry::new(AuditAction::CsvImported)
            .actor(auth.user_id)
            .entity_name(format!("Bulk import: {count} assets"))
            .changes(ChangeSet::summary(json!({ "count": count, "asset_tags": tags })))
            .request(meta),
    )
    .await;

    tracing::info!(count, "Assets imported");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ImportResult { count, assets },
        }),
    ))
}

/// Shared by the assignment handlers: the asset must exist and be free.
pub(crate) async fn require_assignable(state: &AppState, asset_id: DbId) -> AppResult<Asset> {
    let asset = AssetRepo::find_by_id(&state.pool, asset_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id: asset_id,
        }))?;
    check_assignable(asset.status)?;
    Ok(asset)
}
