pub mod assets;
pub mod assignments;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod settings;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/logout                                     logout
/// /auth/me                                         current user
///
/// /users                                           list, create (admin only)
///
/// /assets                                          list, create
/// /assets/export/csv                               CSV download (GET or POST)
/// /assets/import/csv                               bulk import (POST)
/// /assets/{id}                                     get, update, delete
/// /assets/{id}/notes                               append note (POST)
/// /assets/{id}/qrcode                              code image
///
/// /employees                                       list, create
/// /employees/{id}                                  get, update, delete
///
/// /assignments                                     list, assign
/// /assignments/{id}/return                         return (POST)
/// /assignments/asset/{id}/history                  per-asset history
/// /assignments/employee/{id}                       per-employee assignments
///
/// /settings                                        get, update (update admin only)
///
/// /audit                                           query (admin, manager)
/// /audit/{id}                                      single entry
/// /audit/entity/{entity_type}/{entity_id}          one entity's history
///
/// /dashboard/stats                                 totals by status / category
/// /dashboard/depreciation                          portfolio valuation
/// /dashboard/recent-assignments                    10 newest assignments
/// /dashboard/health                                service health (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, logout, me).
        .nest("/auth", auth::router())
        // Account management.
        .nest("/users", users::router())
        // Asset registry, notes, code images, CSV import/export.
        .nest("/assets", assets::router())
        // Employee directory.
        .nest("/employees", employees::router())
        // Assign / return workflow.
        .nest("/assignments", assignments::router())
        // Organisation settings singleton.
        .nest("/settings", settings::router())
        // Audit trail (read-only).
        .nest("/audit", audit::router())
        // Dashboard widgets.
        .nest("/dashboard", dashboard::router())
}
