//! Assignment lifecycle.

use crate::error::CoreError;
use crate::text_enum;

text_enum! {
    pub enum AssignmentStatus ("assignment status") {
        Active => "active",
        Returned => "returned",
    }
}

/// Number of entries returned by the "recent assignments" dashboard widget.
pub const RECENT_ASSIGNMENTS_LIMIT: i64 = 10;

/// Check that an assignment in `status` can be closed.
pub fn check_returnable(status: AssignmentStatus) -> Result<(), CoreError> {
    match status {
        AssignmentStatus::Active => Ok(()),
        AssignmentStatus::Returned => Err(CoreError::Conflict(
            "assignment has already been returned".to_string(),
        )),
    }
}

/// An employee must be active to receive an asset.
pub fn check_employee_can_receive(is_active: bool) -> Result<(), CoreError> {
    if is_active {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "inactive employees cannot receive assets".to_string(),
        ))
    }
}
