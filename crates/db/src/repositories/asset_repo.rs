//! Repository for the `assets` and `asset_notes` tables.

use assetdesk_core::asset::AssetStatus;
use assetdesk_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::asset::{Asset, AssetFilter, AssetNote, AssetRow, NewAsset, UpdateAsset};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `assets` queries against the bare table.
const COLUMNS: &str = "\
    id, asset_tag, name, category, serial_number, manufacturer, model, \
    purchase_price, purchase_date, warranty_expiry, vendor, location, \
    status, qr_code, created_by, created_at, updated_at";

/// Column list for the assignee join (see [`JOINED_FROM`]).
const JOINED_COLUMNS: &str = "\
    a.id, a.asset_tag, a.name, a.category, a.serial_number, a.manufacturer, a.model, \
    a.purchase_price, a.purchase_date, a.warranty_expiry, a.vendor, a.location, \
    a.status, a.qr_code, a.created_by, a.created_at, a.updated_at, \
    asg.id AS assignment_id, \
    e.id AS assignee_employee_id, \
    CASE WHEN e.id IS NULL THEN NULL ELSE e.first_name || ' ' || e.last_name END AS assignee_name";

/// Assets joined with their active assignment and its employee.
const JOINED_FROM: &str = "\
    assets a \
    LEFT JOIN assignments asg ON asg.asset_id = a.id AND asg.status = 'active' \
    LEFT JOIN employees e ON e.id = asg.employee_id";

const NOTE_COLUMNS: &str = "\
    n.id, n.asset_id, n.author_id, u.username AS author_name, n.content, n.created_at";

// ---------------------------------------------------------------------------
// AssetRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for assets and their notes.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset, returning the created row.
    ///
    /// Accepts any executor so bulk imports can run inside a transaction.
    pub async fn create<'e, E>(executor: E, input: &NewAsset) -> Result<Asset, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO assets (asset_tag, name, category, serial_number, manufacturer, model, \
                 purchase_price, purchase_date, warranty_expiry, vendor, location, status, \
                 qr_code, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&input.asset_tag)
            .bind(&input.name)
            .bind(input.category.as_str())
            .bind(&input.serial_number)
            .bind(&input.manufacturer)
            .bind(&input.model)
            .bind(input.purchase_price)
            .bind(input.purchase_date)
            .bind(input.warranty_expiry)
            .bind(&input.vendor)
            .bind(&input.location)
            .bind(input.status.as_str())
            .bind(&input.qr_code)
            .bind(input.created_by)
            .fetch_one(executor)
            .await
    }

    /// Find an asset by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an asset by internal ID together with its current assignee.
    pub async fn find_row_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetRow>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} FROM {JOINED_FROM} WHERE a.id = $1");
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an asset by its tag (case-sensitive).
    pub async fn find_by_tag(pool: &PgPool, asset_tag: &str) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE asset_tag = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(asset_tag)
            .fetch_optional(pool)
            .await
    }

    /// List assets matching `filter`, newest first.
    pub async fn list(pool: &PgPool, filter: &AssetFilter) -> Result<Vec<AssetRow>, sqlx::Error> {
        let (where_clause, bind_values) = build_asset_filter(filter);
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOINED_FROM} {where_clause} \
             ORDER BY a.created_at DESC, a.id DESC"
        );

        let mut q = sqlx::query_as::<_, AssetRow>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::BigInt(v) => q.bind(*v),
            };
        }
        q.fetch_all(pool).await
    }

    /// Update an asset. Only non-`None` fields in `input` are applied.
    ///
    /// `qr_code` replaces the stored code when given (after a tag change).
    /// When `expected_status` is given the row is only updated while its
    /// status still equals it, so a concurrent assignment is never
    /// overwritten. Returns `None` if no row with the given `id` exists or
    /// the status no longer matches.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
        qr_code: Option<&str>,
        expected_status: Option<AssetStatus>,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                asset_tag = COALESCE($2, asset_tag),
                name = COALESCE($3, name),
                category = COALESCE($4, category),
                serial_number = COALESCE($5, serial_number),
                manufacturer = COALESCE($6, manufacturer),
                model = COALESCE($7, model),
                purchase_price = COALESCE($8, purchase_price),
                purchase_date = COALESCE($9, purchase_date),
                warranty_expiry = COALESCE($10, warranty_expiry),
                vendor = COALESCE($11, vendor),
                location = COALESCE($12, location),
                status = COALESCE($13, status),
                qr_code = COALESCE($14, qr_code),
                updated_at = NOW()
             WHERE id = $1 AND ($15::text IS NULL OR status = $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.asset_tag)
            .bind(&input.name)
            .bind(input.category.map(|c| c.as_str()))
            .bind(&input.serial_number)
            .bind(&input.manufacturer)
            .bind(&input.model)
            .bind(input.purchase_price)
            .bind(input.purchase_date)
            .bind(input.warranty_expiry)
            .bind(&input.vendor)
            .bind(&input.location)
            .bind(input.status.map(|s| s.as_str()))
            .bind(qr_code)
            .bind(expected_status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Set an asset's status. Returns `true` if the row was updated.
    pub async fn set_status<'e, E>(
        executor: E,
        id: DbId,
        status: AssetStatus,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE assets SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status.as_str())
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete an asset. Notes and assignment history cascade.
    ///
    /// Returns the deleted row, or `None` if it did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("DELETE FROM assets WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Notes
    // -----------------------------------------------------------------------

    /// Append a note and touch the asset's `updated_at`.
    pub async fn add_note(
        pool: &PgPool,
        asset_id: DbId,
        author_id: Option<DbId>,
        content: &str,
    ) -> Result<AssetNote, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let note_id: DbId = sqlx::query_scalar(
            "INSERT INTO asset_notes (asset_id, author_id, content) VALUES ($1, $2, $3) \
             RETURNING id",
        )
        .bind(asset_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE assets SET updated_at = NOW() WHERE id = $1")
            .bind(asset_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM asset_notes n \
             LEFT JOIN users u ON u.id = n.author_id \
             WHERE n.id = $1"
        );
        let note = sqlx::query_as::<_, AssetNote>(&query)
            .bind(note_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(note)
    }

    /// List an asset's notes, oldest first.
    pub async fn list_notes(pool: &PgPool, asset_id: DbId) -> Result<Vec<AssetNote>, sqlx::Error> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM asset_notes n \
             LEFT JOIN users u ON u.id = n.author_id \
             WHERE n.asset_id = $1 \
             ORDER BY n.created_at ASC, n.id ASC"
        );
        sqlx::query_as::<_, AssetNote>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Filter builder
// ---------------------------------------------------------------------------

enum BindValue {
    Text(String),
    BigInt(i64),
}

fn build_asset_filter(filter: &AssetFilter) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(status) = filter.status {
        bind_values.push(BindValue::Text(status.as_str().to_string()));
        conditions.push(format!("a.status = ${}", bind_values.len()));
    }

    if let Some(category) = filter.category {
        bind_values.push(BindValue::Text(category.as_str().to_string()));
        conditions.push(format!("a.category = ${}", bind_values.len()));
    }

    if let Some(ref location) = filter.location {
        bind_values.push(BindValue::Text(location.clone()));
        conditions.push(format!("a.location = ${}", bind_values.len()));
    }

    if let Some(employee_id) = filter.assigned_to {
        bind_values.push(BindValue::BigInt(employee_id));
        conditions.push(format!("asg.employee_id = ${}", bind_values.len()));
    }

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        bind_values.push(BindValue::Text(format!("%{}%", escape_like(search))));
        let idx = bind_values.len();
        conditions.push(format!(
            "(a.name ILIKE ${idx} OR a.asset_tag ILIKE ${idx} OR a.serial_number ILIKE ${idx})"
        ));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}

/// Escape `LIKE` wildcards so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
