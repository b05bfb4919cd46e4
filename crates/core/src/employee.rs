//! Employee record rules.

use crate::error::CoreError;
use crate::text_enum;

text_enum! {
    pub enum EmploymentType ("employment type") {
        FullTime => "full_time",
        PartTime => "part_time",
        Contractor => "contractor",
        Intern => "intern",
    }
}

impl Default for EmploymentType {
    fn default() -> Self {
        Self::FullTime
    }
}

/// Display name used in listings, CSV exports, and audit entity names.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}

/// Employee codes are stored upper-case without surrounding whitespace.
pub fn normalize_employee_code(code: &str) -> Result<String, CoreError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(CoreError::Validation("employee code must not be empty".to_string()));
    }
    Ok(code.to_uppercase())
}
