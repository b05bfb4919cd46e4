//! Audit trail vocabulary and snapshot rules.
//!
//! This module lives in `core` (zero internal deps) so the recorder in the
//! API layer and the repository layer agree on the closed set of actions,
//! the entity each action is about, and which snapshots each action keeps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text_enum;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Actions and entity types
// ---------------------------------------------------------------------------

text_enum! {
    /// Every recorded action. The set is closed.
    pub enum AuditAction ("audit action") {
        AssetCreated => "asset_created",
        AssetUpdated => "asset_updated",
        AssetDeleted => "asset_deleted",
        AssetAssigned => "asset_assigned",
        AssetReturned => "asset_returned",
        EmployeeCreated => "employee_created",
        EmployeeUpdated => "employee_updated",
        EmployeeDeleted => "employee_deleted",
        UserLogin => "user_login",
        UserLogout => "user_logout",
        UserCreated => "user_created",
        SettingsUpdated => "settings_updated",
        CsvImported => "csv_imported",
        CsvExported => "csv_exported",
    }
}

text_enum! {
    pub enum AuditEntityType ("audit entity type") {
        Asset => "asset",
        Employee => "employee",
        User => "user",
        Assignment => "assignment",
        Settings => "settings",
    }
}

/// Which snapshots an action keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotShape {
    /// Creation: the new state only.
    AfterOnly,
    /// Update: the state on both sides of the change.
    BeforeAndAfter,
    /// Deletion: the removed state only.
    BeforeOnly,
    /// Bulk operations: a summary document stored as `after`.
    Summary,
    /// Session events carry no snapshots.
    None,
}

// ---------------------------------------------------------------------------
// Log categories
// ---------------------------------------------------------------------------

/// Coarse grouping used for filtering the audit browser.
pub mod log_categories {
    pub const AUTHENTICATION: &str = "authentication";
    pub const OPERATIONS: &str = "operations";
    pub const CONFIGURATION: &str = "configuration";
    pub const DATA_TRANSFER: &str = "data_transfer";
}

impl AuditAction {
    /// Entity type an action is about.
    pub fn entity_type(self) -> AuditEntityType {
        match self {
            Self::AssetCreated
            | Self::AssetUpdated
            | Self::AssetDeleted
            | Self::CsvImported
            | Self::CsvExported => AuditEntityType::Asset,
            Self::AssetAssigned | Self::AssetReturned => AuditEntityType::Assignment,
            Self::EmployeeCreated | Self::EmployeeUpdated | Self::EmployeeDeleted => {
                AuditEntityType::Employee
            }
            Self::UserLogin | Self::UserLogout | Self::UserCreated => AuditEntityType::User,
            Self::SettingsUpdated => AuditEntityType::Settings,
        }
    }

    pub fn snapshot_shape(self) -> SnapshotShape {
        match self {
            Self::AssetCreated
            | Self::EmployeeCreated
            | Self::UserCreated
            | Self::AssetAssigned => SnapshotShape::AfterOnly,
            Self::AssetUpdated
            | Self::EmployeeUpdated
            | Self::SettingsUpdated
            | Self::AssetReturned => SnapshotShape::BeforeAndAfter,
            Self::AssetDeleted | Self::EmployeeDeleted => SnapshotShape::BeforeOnly,
            Self::CsvImported | Self::CsvExported => SnapshotShape::Summary,
            Self::UserLogin | Self::UserLogout => SnapshotShape::None,
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Self::UserLogin | Self::UserLogout => log_categories::AUTHENTICATION,
            Self::SettingsUpdated | Self::UserCreated => log_categories::CONFIGURATION,
            Self::CsvImported | Self::CsvExported => log_categories::DATA_TRANSFER,
            _ => log_categories::OPERATIONS,
        }
    }

    /// Actions belonging to a log category.
    pub fn in_category(category: &str) -> Vec<AuditAction> {
        Self::ALL
            .iter()
            .copied()
            .filter(|a| a.category() == category)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Fields that should be redacted from snapshots before storage.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "api_key",
    "private_key",
    "authorization",
    "credential",
];

pub const REDACTED: &str = "[REDACTED]";

/// Redact sensitive fields from a JSON value, recursing into objects and arrays.
///
/// Replaces the value of any key containing one of [`SENSITIVE_FIELDS`]
/// (case-insensitive) with `"[REDACTED]"`.
pub fn redact_sensitive_fields(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(key.clone(), Value::String(REDACTED.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(redact_sensitive_fields).collect()),
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Change sets
// ---------------------------------------------------------------------------

/// Before/after snapshots attached to an entry.
///
/// Snapshots are opaque JSON documents; nothing downstream depends on
/// their field layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

impl ChangeSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn created<T: Serialize>(after: &T) -> Self {
        Self {
            before: None,
            after: snapshot(after),
        }
    }

    pub fn updated<T: Serialize>(before: &T, after: &T) -> Self {
        Self {
            before: snapshot(before),
            after: snapshot(after),
        }
    }

    pub fn deleted<T: Serialize>(before: &T) -> Self {
        Self {
            before: snapshot(before),
            after: None,
        }
    }

    /// A summary document for bulk operations, stored as `after`.
    pub fn summary(summary: Value) -> Self {
        Self {
            before: None,
            after: Some(redact_sensitive_fields(&summary)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }

    /// Drop the snapshots `action` does not keep.
    pub fn conform_to(self, action: AuditAction) -> Self {
        match action.snapshot_shape() {
            SnapshotShape::BeforeAndAfter => self,
            SnapshotShape::AfterOnly | SnapshotShape::Summary => Self {
                before: None,
                after: self.after,
            },
            SnapshotShape::BeforeOnly => Self {
                before: self.before,
                after: None,
            },
            SnapshotShape::None => Self::none(),
        }
    }
}

fn snapshot<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value)
        .ok()
        .map(|v| redact_sensitive_fields(&v))
}

// ---------------------------------------------------------------------------
// Pending entry
// ---------------------------------------------------------------------------

/// Network context captured from the triggering request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// An audit entry waiting to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub actor_id: Option<DbId>,
    pub action: AuditAction,
    pub entity_type: AuditEntityType,
    pub entity_id: Option<DbId>,
    pub entity_name: Option<String>,
    pub changes: ChangeSet,
    pub request: RequestMeta,
}

impl AuditEntry {
    pub fn new(action: AuditAction) -> Self {
        Self {
            actor_id: None,
            action,
            entity_type: action.entity_type(),
            entity_id: None,
            entity_name: None,
            changes: ChangeSet::none(),
            request: RequestMeta::default(),
        }
    }

    pub fn actor(mut self, actor_id: DbId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn entity(mut self, id: DbId, name: impl Into<String>) -> Self {
        self.entity_id = Some(id);
        self.entity_name = Some(name.into());
        self
    }

    /// Name without an id, for bulk entries such as imports.
    pub fn entity_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    pub fn changes(mut self, changes: ChangeSet) -> Self {
        self.changes = changes.conform_to(self.action);
        self
    }

    pub fn request(mut self, meta: RequestMeta) -> Self {
        self.request = meta;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn there_are_fourteen_actions() {
        assert_eq!(AuditAction::ALL.len(), 14);
    }

    #[test]
    fn actions_use_snake_case_spelling() {
        assert_eq!(AuditAction::CsvImported.as_str(), "csv_imported");
        assert_eq!(
            AuditAction::from_str("settings_updated").unwrap(),
            AuditAction::SettingsUpdated
        );
        assert!(AuditAction::from_str("asset_exploded").is_err());
    }

    #[test]
    fn assignment_actions_target_assignments() {
        assert_eq!(AuditAction::AssetAssigned.entity_type(), AuditEntityType::Assignment);
        assert_eq!(AuditAction::AssetReturned.entity_type(), AuditEntityType::Assignment);
        assert_eq!(AuditAction::CsvExported.entity_type(), AuditEntityType::Asset);
        assert_eq!(AuditAction::UserLogin.entity_type(), AuditEntityType::User);
    }

    #[test]
    fn login_maps_to_authentication() {
        assert_eq!(AuditAction::UserLogin.category(), log_categories::AUTHENTICATION);
        assert_eq!(
            AuditAction::in_category(log_categories::AUTHENTICATION),
            vec![AuditAction::UserLogin, AuditAction::UserLogout]
        );
    }

    #[test]
    fn every_action_has_a_category() {
        let total: usize = [
            log_categories::AUTHENTICATION,
            log_categories::OPERATIONS,
            log_categories::CONFIGURATION,
            log_categories::DATA_TRANSFER,
        ]
        .iter()
        .map(|c| AuditAction::in_category(c).len())
        .sum();
        assert_eq!(total, AuditAction::ALL.len());
    }

    #[test]
    fn redacts_password_fields() {
        let input = json!({"username": "admin", "password": "secret123"});
        let result = redact_sensitive_fields(&input);
        assert_eq!(result["username"], "admin");
        assert_eq!(result["password"], REDACTED);
    }

    #[test]
    fn redaction_is_case_insensitive_and_substring() {
        let input = json!({"sendgrid_API_KEY": "SG.x", "gmail_password": "p", "name": "n"});
        let result = redact_sensitive_fields(&input);
        assert_eq!(result["sendgrid_API_KEY"], REDACTED);
        assert_eq!(result["gmail_password"], REDACTED);
        assert_eq!(result["name"], "n");
    }

    #[test]
    fn redaction_recurses_into_arrays() {
        let input = json!({"users": [{"name": "a", "token": "t"}]});
        let result = redact_sensitive_fields(&input);
        assert_eq!(result["users"][0]["token"], REDACTED);
        assert_eq!(result["users"][0]["name"], "a");
    }

    #[test]
    fn created_changes_keep_after_only() {
        let cs = ChangeSet::created(&json!({"asset_tag": "LAP-1"}));
        assert!(cs.before.is_none());
        assert_eq!(cs.after.unwrap()["asset_tag"], "LAP-1");
    }

    #[test]
    fn deleted_changes_keep_before_only() {
        let cs = ChangeSet::deleted(&json!({"asset_tag": "LAP-1"}));
        assert!(cs.after.is_none());
        assert!(cs.before.is_some());
    }

    #[test]
    fn snapshots_are_redacted() {
        let cs = ChangeSet::updated(&json!({"gmail_password": "a"}), &json!({"gmail_password": "b"}));
        assert_eq!(cs.before.unwrap()["gmail_password"], REDACTED);
        assert_eq!(cs.after.unwrap()["gmail_password"], REDACTED);
    }

    #[test]
    fn entry_conforms_changes_to_action() {
        let entry = AuditEntry::new(AuditAction::AssetDeleted)
            .actor(1)
            .entity(7, "LAP-7")
            .changes(ChangeSet::updated(&json!({"a": 1}), &json!({"a": 2})));
        assert!(entry.changes.before.is_some());
        assert!(entry.changes.after.is_none());
        assert_eq!(entry.entity_type, AuditEntityType::Asset);

        let login = AuditEntry::new(AuditAction::UserLogin)
            .changes(ChangeSet::created(&json!({"x": 1})));
        assert!(login.changes.is_empty());
    }

    #[test]
    fn change_set_serializes_without_absent_sides() {
        let cs = ChangeSet::summary(json!({"count": 3}));
        let value = serde_json::to_value(&cs).unwrap();
        assert_eq!(value, json!({"after": {"count": 3}}));
    }
}
