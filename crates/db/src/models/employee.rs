//! Employee entity model and DTOs.

use assetdesk_core::employee::EmploymentType;
use assetdesk_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    #[sqlx(try_from = "String")]
    pub employment_type: EmploymentType,
    pub joining_date: Option<Date>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Employee {
    pub fn full_name(&self) -> String {
        assetdesk_core::employee::full_name(&self.first_name, &self.last_name)
    }
}

/// Request body for `POST /api/employees`.
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct CreateEmployee {
    #[validate(length(min = 1, max = 32))]
    pub employee_code: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub joining_date: Option<Date>,
}

/// Request body for `PUT /api/employees/{id}`. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, validator::Validate)]
pub struct UpdateEmployee {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub joining_date: Option<Date>,
    pub is_active: Option<bool>,
}

/// Filters for `GET /api/employees`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub is_active: Option<bool>,
    /// Case-insensitive substring over names, email, and employee code.
    pub search: Option<String>,
}
