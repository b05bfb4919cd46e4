//! Route definitions for the `/assets` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /                -> list_assets
/// POST   /                -> create_asset
/// GET    /export/csv      -> export_csv
/// POST   /export/csv      -> export_csv
/// POST   /import/csv      -> import_csv
/// GET    /{id}            -> get_asset
/// PUT    /{id}            -> update_asset
/// DELETE /{id}            -> delete_asset
/// POST   /{id}/notes      -> add_note
/// GET    /{id}/qrcode     -> get_qrcode
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/export/csv",
            get(assets::export_csv).post(assets::export_csv),
        )
        .route("/import/csv", post(assets::import_csv))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/notes", post(assets::add_note))
        .route("/{id}/qrcode", get(assets::get_qrcode))
}
