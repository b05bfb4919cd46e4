//! Repository for the `assignments` table.
//!
//! Assigning and returning touch both `assignments` and `assets` and run in
//! a single transaction so the asset's status always agrees with whether an
//! active assignment exists.

use assetdesk_core::assignment::AssignmentStatus;
use assetdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::{
    Assignment, AssignmentDetail, AssignmentFilter, CreateAssignment, ReturnAssignment,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "\
    id, asset_id, employee_id, assigned_by, assigned_date, expected_return_date, \
    returned_date, status, return_condition, notes, created_at, updated_at";

const DETAIL_COLUMNS: &str = "\
    g.id, g.asset_id, g.employee_id, g.assigned_by, g.assigned_date, g.expected_return_date, \
    g.returned_date, g.status, g.return_condition, g.notes, g.created_at, g.updated_at, \
    a.asset_tag, a.name AS asset_name, e.employee_code, \
    e.first_name || ' ' || e.last_name AS employee_name";

const DETAIL_FROM: &str = "\
    assignments g \
    JOIN assets a ON a.id = g.asset_id \
    JOIN employees e ON e.id = g.employee_id";

// ---------------------------------------------------------------------------
// AssignmentRepo
// ---------------------------------------------------------------------------

/// Provides the assign / return workflow and assignment queries.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Hand an available asset to an employee.
    ///
    /// Flips the asset from `available` to `assigned` and inserts the active
    /// assignment in one transaction. Returns `None` (and writes nothing) if
    /// the asset was not `available` at the time of the update.
    pub async fn assign(
        pool: &PgPool,
        input: &CreateAssignment,
        assigned_by: Option<DbId>,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let flipped = sqlx::query(
            "UPDATE assets SET status = 'assigned', updated_at = NOW() \
             WHERE id = $1 AND status = 'available'",
        )
        .bind(input.asset_id)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO assignments (asset_id, employee_id, assigned_by, expected_return_date, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let assignment = sqlx::query_as::<_, Assignment>(&query)
            .bind(input.asset_id)
            .bind(input.employee_id)
            .bind(assigned_by)
            .bind(input.expected_return_date)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(assignment))
    }

    /// Close an active assignment and make its asset available again.
    ///
    /// Returns `None` (and writes nothing) if the assignment is not active.
    pub async fn mark_returned(
        pool: &PgPool,
        id: DbId,
        input: &ReturnAssignment,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE assignments SET
                status = 'returned',
                returned_date = NOW(),
                return_condition = COALESCE($2, return_condition),
                notes = COALESCE($3, notes),
                updated_at = NOW()
             WHERE id = $1 AND status = 'active'
             RETURNING {COLUMNS}"
        );
        let returned = sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(&input.return_condition)
            .bind(&input.notes)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(assignment) = returned else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "UPDATE assets SET status = 'available', updated_at = NOW() \
             WHERE id = $1 AND status = 'assigned'",
        )
        .bind(assignment.asset_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(assignment))
    }

    /// Find an assignment by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assignments WHERE id = $1");
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an assignment with asset and employee names resolved.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssignmentDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} WHERE g.id = $1");
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The active assignment of an asset, if any.
    pub async fn find_active_for_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assignments WHERE asset_id = $1 AND status = 'active'"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }

    /// List assignments, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &AssignmentFilter,
    ) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE ($1::TEXT IS NULL OR g.status = $1)
             ORDER BY g.assigned_date DESC, g.id DESC"
        );
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(filter.status.map(|s: AssignmentStatus| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Every assignment an asset has had, newest first.
    pub async fn history_for_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE g.asset_id = $1
             ORDER BY g.assigned_date DESC, g.id DESC"
        );
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }

    /// Every assignment an employee has had, newest first.
    pub async fn list_for_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE g.employee_id = $1
             ORDER BY g.assigned_date DESC, g.id DESC"
        );
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// The `limit` most recent assignments.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             ORDER BY g.assigned_date DESC, g.id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Whether an employee currently holds any asset.
    pub async fn employee_has_active(pool: &PgPool, employee_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM assignments WHERE employee_id = $1 AND status = 'active')",
        )
        .bind(employee_id)
        .fetch_one(pool)
        .await
    }

    /// Count active assignments.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM assignments WHERE status = 'active'",
        )
        .fetch_one(pool)
        .await
    }
}
