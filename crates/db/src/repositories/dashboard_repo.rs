//! Aggregate queries behind the dashboard.

use assetdesk_core::asset::AssetCategory;
use assetdesk_core::types::Date;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::dashboard::GroupCount;

/// Read-only aggregates across assets.
pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn count_assets(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM assets")
            .fetch_one(pool)
            .await
    }

    /// Asset counts grouped by status.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT status AS key, COUNT(*)::BIGINT AS count FROM assets \
             GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Asset counts grouped by category.
    pub async fn count_by_category(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT category AS key, COUNT(*)::BIGINT AS count FROM assets \
             GROUP BY category ORDER BY category",
        )
        .fetch_all(pool)
        .await
    }

    /// `(category, purchase_price, purchase_date)` for every asset, as input
    /// to the depreciation summary.
    pub async fn valuation_inputs(
        pool: &PgPool,
    ) -> Result<Vec<(AssetCategory, Option<Decimal>, Option<Date>)>, sqlx::Error> {
        let rows: Vec<(String, Option<Decimal>, Option<Date>)> =
            sqlx::query_as("SELECT category, purchase_price, purchase_date FROM assets")
                .fetch_all(pool)
                .await?;

        rows.into_iter()
            .map(|(category, price, date)| {
                AssetCategory::from_str(&category)
                    .map(|c| (c, price, date))
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))
            })
            .collect()
    }
}
