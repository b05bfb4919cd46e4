//! Repository for the `audit_logs` table.
//!
//! Append-only: there is no update or delete.

use assetdesk_core::audit::AuditAction;
use assetdesk_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `audit_logs` SELECT queries (joined with `users` as `u`).
const COLUMNS: &str = "\
    l.id, l.user_id, u.username, l.action, l.entity_type, l.entity_id, \
    l.entity_name, l.changes, l.ip_address, l.user_agent, l.created_at";

const FROM: &str = "audit_logs l LEFT JOIN users u ON u.id = l.user_id";

/// Default and maximum page sizes.
pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 500;

// ---------------------------------------------------------------------------
// AuditLogRepo
// ---------------------------------------------------------------------------

/// Provides insert and query operations for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append an entry, returning the stored row.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "WITH l AS (
                INSERT INTO audit_logs (user_id, action, entity_type, entity_id, entity_name, \
                    changes, ip_address, user_agent)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
             )
             SELECT {COLUMNS} FROM l LEFT JOIN users u ON u.id = l.user_id"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.user_id)
            .bind(entry.action.as_str())
            .bind(entry.entity_type.as_str())
            .bind(entry.entity_id)
            .bind(&entry.entity_name)
            .bind(Json(&entry.changes))
            .bind(&entry.ip_address)
            .bind(&entry.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AuditLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE l.id = $1");
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Query entries with filtering and pagination, newest first.
    pub async fn query(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let (where_clause, bind_values) = build_audit_filter(params);
        let next = bind_values.len() + 1;

        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} {where_clause} \
             ORDER BY l.created_at DESC, l.id DESC \
             LIMIT ${next} OFFSET ${}",
            next + 1
        );

        let mut q = sqlx::query_as::<_, AuditLog>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::TextArray(v) => q.bind(v.as_slice()),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count entries matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values) = build_audit_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM {FROM} {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::TextArray(v) => q.bind(v.as_slice()),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q.fetch_one(pool).await
    }

    /// Entries about one entity, oldest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE l.entity_type = $1 AND l.entity_id = $2 \
             ORDER BY l.created_at ASC, l.id ASC"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Filter builder
// ---------------------------------------------------------------------------

enum BindValue {
    BigInt(i64),
    Text(String),
    TextArray(Vec<String>),
    Timestamp(Timestamp),
}

fn build_audit_filter(params: &AuditQuery) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(user_id) = params.user_id {
        bind_values.push(BindValue::BigInt(user_id));
        conditions.push(format!("l.user_id = ${}", bind_values.len()));
    }

    if let Some(action) = params.action {
        bind_values.push(BindValue::Text(action.as_str().to_string()));
        conditions.push(format!("l.action = ${}", bind_values.len()));
    }

    if let Some(ref category) = params.category {
        let actions = AuditAction::in_category(category)
            .into_iter()
            .map(|a| a.as_str().to_string())
            .collect();
        bind_values.push(BindValue::TextArray(actions));
        conditions.push(format!("l.action = ANY(${})", bind_values.len()));
    }

    if let Some(entity_type) = params.entity_type {
        bind_values.push(BindValue::Text(entity_type.as_str().to_string()));
        conditions.push(format!("l.entity_type = ${}", bind_values.len()));
    }

    if let Some(entity_id) = params.entity_id {
        bind_values.push(BindValue::BigInt(entity_id));
        conditions.push(format!("l.entity_id = ${}", bind_values.len()));
    }

    if let Some(from) = params.from {
        bind_values.push(BindValue::Timestamp(from));
        conditions.push(format!("l.created_at >= ${}", bind_values.len()));
    }

    if let Some(to) = params.to {
        bind_values.push(BindValue::Timestamp(to));
        conditions.push(format!("l.created_at <= ${}", bind_values.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}
