//! Inline audit recording for mutating handlers.
//!
//! Handlers call [`record`] after the primary write has committed. A failed
//! audit insert is logged and swallowed: the caller's response reflects the
//! primary operation only.

use assetdesk_core::audit::AuditEntry;
use assetdesk_db::models::audit::{AuditLog, CreateAuditLog};
use assetdesk_db::repositories::AuditLogRepo;
use assetdesk_db::DbPool;

/// Persist `entry`, returning the stored row when the insert succeeded.
pub async fn record(pool: &DbPool, entry: AuditEntry) -> Option<AuditLog> {
    let action = entry.action;
    let entity_id = entry.entity_id;
    let input = CreateAuditLog::from(entry);

    match AuditLogRepo::insert(pool, &input).await {
        Ok(log) => {
            tracing::debug!(audit_id = log.id, %action, ?entity_id, "Audit entry recorded");
            Some(log)
        }
        Err(e) => {
            tracing::error!(
                %action,
                ?entity_id,
                error = %e,
                "Failed to record audit entry (primary operation already applied)",
            );
            None
        }
    }
}
