use std::sync::Arc;

use assetdesk_core::code_image::CodeImageGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: assetdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Renders asset tags into scannable code images.
    pub code_images: Arc<dyn CodeImageGenerator>,
}
