//! Route definitions for the `/assignments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assignments;
use crate::state::AppState;

/// Routes mounted at `/assignments`.
///
/// ```text
/// GET  /                       -> list_assignments
/// POST /                       -> create_assignment
/// POST /{id}/return            -> return_assignment
/// GET  /asset/{id}/history     -> asset_history
/// GET  /employee/{id}          -> employee_assignments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route("/{id}/return", post(assignments::return_assignment))
        .route("/asset/{id}/history", get(assignments::asset_history))
        .route("/employee/{id}", get(assignments::employee_assignments))
}
