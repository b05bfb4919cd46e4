//! Route definitions for the `/dashboard` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /stats                -> stats
/// GET /depreciation         -> depreciation
/// GET /recent-assignments   -> recent_assignments
/// GET /health               -> health (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/depreciation", get(dashboard::depreciation))
        .route("/recent-assignments", get(dashboard::recent_assignments))
        .route("/health", get(dashboard::health))
}
