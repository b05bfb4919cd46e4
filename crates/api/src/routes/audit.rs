//! Route definitions for the `/audit` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Routes mounted at `/audit` (admin and manager).
///
/// ```text
/// GET  /                                   -> query_audit_logs
/// GET  /{id}                               -> get_audit_log
/// GET  /entity/{entity_type}/{entity_id}   -> entity_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(audit::query_audit_logs))
        .route("/{id}", get(audit::get_audit_log))
        .route(
            "/entity/{entity_type}/{entity_id}",
            get(audit::entity_history),
        )
}
