//! Audit log entity model and DTOs.
//!
//! Audit logs have no `updated_at` field (immutable records).

use assetdesk_core::audit::{AuditAction, AuditEntityType, AuditEntry, ChangeSet};
use assetdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Audit log entity
// ---------------------------------------------------------------------------

/// A single audit log entry, with the acting user's name resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    #[sqlx(try_from = "String")]
    pub action: AuditAction,
    #[sqlx(try_from = "String")]
    pub entity_type: AuditEntityType,
    pub entity_id: Option<DbId>,
    pub entity_name: Option<String>,
    pub changes: Json<ChangeSet>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Row to insert into `audit_logs`.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub action: AuditAction,
    pub entity_type: AuditEntityType,
    pub entity_id: Option<DbId>,
    pub entity_name: Option<String>,
    pub changes: ChangeSet,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl From<AuditEntry> for CreateAuditLog {
    fn from(entry: AuditEntry) -> Self {
        Self {
            user_id: entry.actor_id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            entity_name: entry.entity_name,
            changes: entry.changes,
            ip_address: entry.request.ip_address,
            user_agent: entry.request.user_agent,
        }
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filter parameters for `GET /api/audit`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<DbId>,
    pub action: Option<AuditAction>,
    /// Log category (`authentication`, `operations`, ...).
    pub category: Option<String>,
    pub entity_type: Option<AuditEntityType>,
    pub entity_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One page of results plus the unpaginated total.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPage {
    pub items: Vec<AuditLog>,
    pub total: i64,
}
