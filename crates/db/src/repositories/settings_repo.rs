//! Repository for the `settings` singleton.

use assetdesk_core::settings::{normalize_secret, SETTINGS_ID};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::settings::{Settings, UpdateSettings};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, company_name, company_logo, company_website, currency, header_text, footer_text, \
    email_provider, gmail_email, gmail_password, sendgrid_api_key, office365_email, \
    office365_password, send_asset_assignment_notification, send_warranty_expiry_notification, \
    send_return_reminder_notification, enable_dark_mode, depreciation_rate, \
    depreciation_useful_life_years, depreciation_floor, depreciation_overrides, \
    created_at, updated_at";

/// Reads and writes the single settings row.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Return the settings row, creating it with defaults on first use.
    ///
    /// Safe to call concurrently: the insert is `ON CONFLICT DO NOTHING`,
    /// so racing callers all observe the same row.
    pub async fn get_or_init(pool: &PgPool) -> Result<Settings, sqlx::Error> {
        sqlx::query("INSERT INTO settings (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(SETTINGS_ID)
            .execute(pool)
            .await?;

        let query = format!("SELECT {COLUMNS} FROM settings WHERE id = $1");
        sqlx::query_as::<_, Settings>(&query)
            .bind(SETTINGS_ID)
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update, creating the row first if needed.
    ///
    /// Credential fields: `None` keeps the stored value, an empty string
    /// clears it, anything else replaces it.
    pub async fn update(pool: &PgPool, input: &UpdateSettings) -> Result<Settings, sqlx::Error> {
        Self::get_or_init(pool).await?;

        let secret = |v: &Option<String>| -> (bool, Option<String>) {
            match v {
                None => (false, None),
                Some(s) => (true, normalize_secret(s)),
            }
        };
        let (gmail_pw_set, gmail_pw) = secret(&input.gmail_password);
        let (sendgrid_set, sendgrid) = secret(&input.sendgrid_api_key);
        let (o365_pw_set, o365_pw) = secret(&input.office365_password);

        let schedule = input.depreciation.as_ref();

        let query = format!(
            "UPDATE settings SET
                company_name = COALESCE($2, company_name),
                company_logo = COALESCE($3, company_logo),
                company_website = COALESCE($4, company_website),
                currency = COALESCE($5, currency),
                header_text = COALESCE($6, header_text),
                footer_text = COALESCE($7, footer_text),
                email_provider = COALESCE($8, email_provider),
                gmail_email = COALESCE($9, gmail_email),
                gmail_password = CASE WHEN $10 THEN $11 ELSE gmail_password END,
                sendgrid_api_key = CASE WHEN $12 THEN $13 ELSE sendgrid_api_key END,
                office365_email = COALESCE($14, office365_email),
                office365_password = CASE WHEN $15 THEN $16 ELSE office365_password END,
                send_asset_assignment_notification = COALESCE($17, send_asset_assignment_notification),
                send_warranty_expiry_notification = COALESCE($18, send_warranty_expiry_notification),
                send_return_reminder_notification = COALESCE($19, send_return_reminder_notification),
                enable_dark_mode = COALESCE($20, enable_dark_mode),
                depreciation_rate = COALESCE($21, depreciation_rate),
                depreciation_useful_life_years = COALESCE($22, depreciation_useful_life_years),
                depreciation_floor = COALESCE($23, depreciation_floor),
                depreciation_overrides = COALESCE($24, depreciation_overrides),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Settings>(&query)
            .bind(SETTINGS_ID)
            .bind(&input.company_name)
            .bind(&input.company_logo)
            .bind(&input.company_website)
            .bind(input.currency.map(|c| c.as_str()))
            .bind(&input.header_text)
            .bind(&input.footer_text)
            .bind(input.email_provider.map(|p| p.as_str()))
            .bind(&input.gmail_email)
            .bind(gmail_pw_set)
            .bind(gmail_pw)
            .bind(sendgrid_set)
            .bind(sendgrid)
            .bind(&input.office365_email)
            .bind(o365_pw_set)
            .bind(o365_pw)
            .bind(input.send_asset_assignment_notification)
            .bind(input.send_warranty_expiry_notification)
            .bind(input.send_return_reminder_notification)
            .bind(input.enable_dark_mode)
            .bind(schedule.map(|s| s.default.annual_rate))
            .bind(schedule.map(|s| i32::try_from(s.default.useful_life_years).unwrap_or(i32::MAX)))
            .bind(schedule.map(|s| s.default.floor))
            .bind(schedule.map(|s| Json(s.overrides.clone())))
            .fetch_one(pool)
            .await
    }
}
