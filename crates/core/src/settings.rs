//! Organisation settings vocabulary.

use crate::error::CoreError;
use crate::text_enum;

/// Primary key of the single settings row.
pub const SETTINGS_ID: i32 = 1;

pub const DEFAULT_COMPANY_NAME: &str = "My Company";

pub const MAX_COMPANY_NAME_LEN: usize = 200;

text_enum! {
    pub enum Currency ("currency") {
        Usd => "USD",
        Eur => "EUR",
        Gbp => "GBP",
        Jpy => "JPY",
        Inr => "INR",
        Aud => "AUD",
        Cad => "CAD",
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Usd
    }
}

text_enum! {
    /// Outbound mail provider used for notifications.
    pub enum EmailProvider ("email provider") {
        Gmail => "gmail",
        Sendgrid => "sendgrid",
        Office365 => "office365",
    }
}

impl Default for EmailProvider {
    fn default() -> Self {
        Self::Gmail
    }
}

/// Validate a company name supplied on update.
pub fn validate_company_name(name: &str) -> Result<(), CoreError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation("company name must not be empty".to_string()));
    }
    if len > MAX_COMPANY_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "company name must be at most {MAX_COMPANY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Secrets are write-only: an empty string clears the stored value.
pub fn normalize_secret(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
