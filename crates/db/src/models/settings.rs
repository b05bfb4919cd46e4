//! Settings singleton model and DTOs.

use std::collections::BTreeMap;

use assetdesk_core::asset::AssetCategory;
use assetdesk_core::depreciation::{DepreciationPolicy, DepreciationSchedule};
use assetdesk_core::settings::{Currency, EmailProvider};
use assetdesk_core::types::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// The single row of the `settings` table.
///
/// Credential columns are never serialized; [`SettingsView`] exposes
/// `*_set` flags in their place.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Settings {
    pub id: i32,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub company_website: Option<String>,
    #[sqlx(try_from = "String")]
    pub currency: Currency,
    pub header_text: Option<String>,
    pub footer_text: Option<String>,
    #[sqlx(try_from = "String")]
    pub email_provider: EmailProvider,
    pub gmail_email: Option<String>,
    #[serde(skip_serializing)]
    pub gmail_password: Option<String>,
    #[serde(skip_serializing)]
    pub sendgrid_api_key: Option<String>,
    pub office365_email: Option<String>,
    #[serde(skip_serializing)]
    pub office365_password: Option<String>,
    pub send_asset_assignment_notification: bool,
    pub send_warranty_expiry_notification: bool,
    pub send_return_reminder_notification: bool,
    pub enable_dark_mode: bool,
    pub depreciation_rate: Decimal,
    pub depreciation_useful_life_years: i32,
    pub depreciation_floor: Decimal,
    pub depreciation_overrides: Json<BTreeMap<AssetCategory, DepreciationPolicy>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Settings {
    /// The depreciation schedule stored in this row.
    pub fn depreciation_schedule(&self) -> DepreciationSchedule {
        DepreciationSchedule {
            default: DepreciationPolicy {
                annual_rate: self.depreciation_rate,
                useful_life_years: u32::try_from(self.depreciation_useful_life_years).unwrap_or(1),
                floor: self.depreciation_floor,
            },
            overrides: self.depreciation_overrides.0.clone(),
        }
    }
}

/// Settings as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    #[serde(flatten)]
    pub settings: Settings,
    pub gmail_password_set: bool,
    pub sendgrid_api_key_set: bool,
    pub office365_password_set: bool,
}

impl From<Settings> for SettingsView {
    fn from(settings: Settings) -> Self {
        Self {
            gmail_password_set: settings.gmail_password.is_some(),
            sendgrid_api_key_set: settings.sendgrid_api_key.is_some(),
            office365_password_set: settings.office365_password.is_some(),
            settings,
        }
    }
}

/// Request body for `PUT /api/settings`. All fields are optional.
///
/// For the credential fields an empty string clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettings {
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    pub company_website: Option<String>,
    pub currency: Option<Currency>,
    pub header_text: Option<String>,
    pub footer_text: Option<String>,
    pub email_provider: Option<EmailProvider>,
    pub gmail_email: Option<String>,
    pub gmail_password: Option<String>,
    pub sendgrid_api_key: Option<String>,
    pub office365_email: Option<String>,
    pub office365_password: Option<String>,
    pub send_asset_assignment_notification: Option<bool>,
    pub send_warranty_expiry_notification: Option<bool>,
    pub send_return_reminder_notification: Option<bool>,
    pub enable_dark_mode: Option<bool>,
    pub depreciation: Option<DepreciationSchedule>,
}
