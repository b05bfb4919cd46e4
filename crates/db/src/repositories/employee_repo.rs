//! Repository for the `employees` table.

use assetdesk_core::employee::EmploymentType;
use assetdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::employee::{CreateEmployee, Employee, EmployeeFilter, UpdateEmployee};
use crate::repositories::asset_repo::escape_like;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, employee_code, first_name, last_name, email, phone, department, designation, \
    employment_type, joining_date, is_active, created_at, updated_at";

/// Provides CRUD operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee, returning the created row.
    ///
    /// `employee_code` is expected to be normalised by the caller.
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees (employee_code, first_name, last_name, email, phone, \
                 department, designation, employment_type, joining_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&input.employee_code)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(input.email.trim())
            .bind(&input.phone)
            .bind(&input.department)
            .bind(&input.designation)
            .bind(input.employment_type.unwrap_or_default().as_str())
            .bind(input.joining_date)
            .fetch_one(pool)
            .await
    }

    /// Find an employee by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List employees matching `filter`, ordered by last then first name.
    pub async fn list(pool: &PgPool, filter: &EmployeeFilter) -> Result<Vec<Employee>, sqlx::Error> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let query = format!(
            "SELECT {COLUMNS} FROM employees
             WHERE ($1::TEXT IS NULL OR department = $1)
               AND ($2::BOOLEAN IS NULL OR is_active = $2)
               AND ($3::TEXT IS NULL
                    OR first_name ILIKE $3 OR last_name ILIKE $3
                    OR email ILIKE $3 OR employee_code ILIKE $3)
             ORDER BY last_name ASC, first_name ASC, id ASC"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&filter.department)
            .bind(filter.is_active)
            .bind(search)
            .fetch_all(pool)
            .await
    }

    /// Update an employee. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEmployee,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                department = COALESCE($6, department),
                designation = COALESCE($7, designation),
                employment_type = COALESCE($8, employment_type),
                joining_date = COALESCE($9, joining_date),
                is_active = COALESCE($10, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.department)
            .bind(&input.designation)
            .bind(input.employment_type.map(|t: EmploymentType| t.as_str()))
            .bind(input.joining_date)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an employee.
    ///
    /// Fails with a foreign-key violation while assignment history references
    /// the employee. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count employees.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM employees")
            .fetch_one(pool)
            .await
    }
}
