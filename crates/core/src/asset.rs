//! Asset categories, lifecycle statuses, and the rules that govern them.

use crate::error::CoreError;
use crate::text_enum;

/// Maximum length of an asset tag.
pub const MAX_ASSET_TAG_LEN: usize = 64;

/// Maximum length of an asset name.
pub const MAX_ASSET_NAME_LEN: usize = 200;

/// Maximum length of a single asset note.
pub const MAX_NOTE_LEN: usize = 4000;

text_enum! {
    /// What kind of thing an asset is. Drives per-category depreciation.
    pub enum AssetCategory ("asset category") {
        Hardware => "hardware",
        Software => "software",
        Accessory => "accessory",
        OfficeEquipment => "office_equipment",
        Vehicle => "vehicle",
    }
}

text_enum! {
    /// Lifecycle status of an asset.
    pub enum AssetStatus ("asset status") {
        Available => "available",
        /// Set only by the assignment workflow.
        Assigned => "assigned",
        InMaintenance => "in_maintenance",
        Retired => "retired",
        Lost => "lost",
    }
}

impl Default for AssetStatus {
    fn default() -> Self {
        Self::Available
    }
}

/// Normalise and validate an asset tag.
///
/// Tags are trimmed; they must be non-empty, at most [`MAX_ASSET_TAG_LEN`]
/// characters, and contain no interior whitespace (they are encoded into
/// scannable codes and CSV cells).
pub fn normalize_asset_tag(tag: &str) -> Result<String, CoreError> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(CoreError::Validation("asset tag must not be empty".to_string()));
    }
    if tag.chars().count() > MAX_ASSET_TAG_LEN {
        return Err(CoreError::Validation(format!(
            "asset tag must be at most {MAX_ASSET_TAG_LEN} characters"
        )));
    }
    if tag.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "asset tag '{tag}' must not contain whitespace"
        )));
    }
    Ok(tag.to_string())
}

/// Status a newly created asset starts in.
///
/// Defaults to `available`. Creating an asset directly in `assigned` is
/// rejected: assignment happens through the assignment workflow.
pub fn initial_status(requested: Option<AssetStatus>) -> Result<AssetStatus, CoreError> {
    match requested {
        None => Ok(AssetStatus::Available),
        Some(AssetStatus::Assigned) => Err(CoreError::Validation(
            "assets cannot be created as assigned; create an assignment instead".to_string(),
        )),
        Some(status) => Ok(status),
    }
}

/// Validate a status change requested through a plain asset update.
///
/// Moving into or out of `assigned` is reserved for the assignment
/// workflow (assign / return).
pub fn validate_manual_status_change(
    current: AssetStatus,
    requested: AssetStatus,
) -> Result<(), CoreError> {
    if current == requested {
        return Ok(());
    }
    if requested == AssetStatus::Assigned {
        return Err(CoreError::Validation(
            "status 'assigned' is set by creating an assignment".to_string(),
        ));
    }
    if current == AssetStatus::Assigned {
        return Err(CoreError::Validation(
            "an assigned asset must be returned before its status can change".to_string(),
        ));
    }
    Ok(())
}

/// Check that an asset in `status` may be handed out.
pub fn check_assignable(status: AssetStatus) -> Result<(), CoreError> {
    if status == AssetStatus::Available {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "asset is not available for assignment (status: {status})"
        )))
    }
}

/// Validate note content, returning the trimmed text.
pub fn normalize_note(content: &str) -> Result<String, CoreError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(CoreError::Validation("note must not be empty".to_string()));
    }
    if content.chars().count() > MAX_NOTE_LEN {
        return Err(CoreError::Validation(format!(
            "note must be at most {MAX_NOTE_LEN} characters"
        )));
    }
    Ok(content.to_string())
}
