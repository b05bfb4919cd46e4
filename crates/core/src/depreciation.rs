//! Straight-line depreciation.
//!
//! Current value is derived on read and never stored:
//!
//! ```text
//! elapsed      = whole years between purchase date and "today" (floor(days / 365), >= 0)
//! depreciated  = price * rate * min(elapsed, useful_life_years)
//! current      = max(price - depreciated, floor)
//! ```
//!
//! Evaluation never fails. Missing or non-positive prices value the asset at
//! zero; a missing purchase date counts as zero elapsed years; out-of-range
//! policy parameters are clamped so the result always stays in
//! `[0, purchase_price]`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::asset::AssetCategory;
use crate::error::CoreError;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Days counted as one year when computing elapsed whole years.
pub const DAYS_PER_YEAR: i64 = 365;

/// Upper bound on a configurable useful life.
pub const MAX_USEFUL_LIFE_YEARS: u32 = 100;

/// Decimal places kept on monetary results.
pub const MONEY_SCALE: u32 = 2;

/// Decimal places a stored depreciation rate can hold.
pub const RATE_SCALE: u32 = 4;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Parameters of a straight-line schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationPolicy {
    /// Fraction of the purchase price lost per whole year, in `[0, 1]`.
    pub annual_rate: Decimal,
    /// Years after which depreciation stops.
    pub useful_life_years: u32,
    /// Minimum current value.
    pub floor: Decimal,
}

impl Default for DepreciationPolicy {
    /// 20% per year over five years, down to zero.
    fn default() -> Self {
        Self {
            annual_rate: Decimal::new(2, 1),
            useful_life_years: 5,
            floor: Decimal::ZERO,
        }
    }
}

impl DepreciationPolicy {
    /// Validate operator-supplied parameters before they are persisted.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.annual_rate < Decimal::ZERO || self.annual_rate > Decimal::ONE {
            return Err(CoreError::Validation(format!(
                "depreciation rate must be between 0 and 1, got {}",
                self.annual_rate
            )));
        }
        if self.annual_rate.normalize().scale() > RATE_SCALE {
            return Err(CoreError::Validation(format!(
                "depreciation rate allows at most {RATE_SCALE} decimal places, got {}",
                self.annual_rate
            )));
        }
        if self.useful_life_years == 0 || self.useful_life_years > MAX_USEFUL_LIFE_YEARS {
            return Err(CoreError::Validation(format!(
                "useful life must be between 1 and {MAX_USEFUL_LIFE_YEARS} years, got {}",
                self.useful_life_years
            )));
        }
        if self.floor < Decimal::ZERO {
            return Err(CoreError::Validation(format!(
                "depreciation floor must not be negative, got {}",
                self.floor
            )));
        }
        if self.floor.normalize().scale() > MONEY_SCALE {
            return Err(CoreError::Validation(format!(
                "depreciation floor allows at most {MONEY_SCALE} decimal places, got {}",
                self.floor
            )));
        }
        Ok(())
    }

    /// Current value of an asset under this policy as of `today`.
    pub fn current_value(
        &self,
        purchase_price: Option<Decimal>,
        purchase_date: Option<Date>,
        today: Date,
    ) -> Decimal {
        let price = match purchase_price {
            Some(p) if p > Decimal::ZERO => p,
            _ => return Decimal::ZERO,
        };

        let elapsed = purchase_date.map_or(0, |d| elapsed_whole_years(d, today));
        let years = elapsed.min(self.useful_life_years);
        let rate = self.annual_rate.clamp(Decimal::ZERO, Decimal::ONE);
        let floor = self.floor.clamp(Decimal::ZERO, price);

        let depreciated = price * rate * Decimal::from(years);
        round_money((price - depreciated).max(floor))
    }
}

/// Whole years between `purchase_date` and `today`.
///
/// Partial years are truncated; a purchase date in the future yields zero.
pub fn elapsed_whole_years(purchase_date: Date, today: Date) -> u32 {
    let days = (today - purchase_date).num_days();
    if days <= 0 {
        return 0;
    }
    u32::try_from(days / DAYS_PER_YEAR).unwrap_or(u32::MAX)
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp(MONEY_SCALE).normalize()
}

// ---------------------------------------------------------------------------
// Schedule (default + per-category overrides)
// ---------------------------------------------------------------------------

/// Organisation-wide schedule: one default policy plus optional
/// per-category overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub default: DepreciationPolicy,
    #[serde(default)]
    pub overrides: BTreeMap<AssetCategory, DepreciationPolicy>,
}

impl DepreciationSchedule {
    /// Policy that applies to `category`.
    pub fn policy_for(&self, category: AssetCategory) -> &DepreciationPolicy {
        self.overrides.get(&category).unwrap_or(&self.default)
    }

    pub fn current_value(
        &self,
        category: AssetCategory,
        purchase_price: Option<Decimal>,
        purchase_date: Option<Date>,
        today: Date,
    ) -> Decimal {
        self.policy_for(category)
            .current_value(purchase_price, purchase_date, today)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.default.validate()?;
        for (category, policy) in &self.overrides {
            policy.validate().map_err(|e| match e {
                CoreError::Validation(msg) => {
                    CoreError::Validation(format!("{category} override: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Portfolio summary
// ---------------------------------------------------------------------------

/// Aggregate purchase vs. current value across a set of assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepreciationSummary {
    pub total_purchase_value: Decimal,
    pub total_current_value: Decimal,
    pub total_depreciation: Decimal,
    /// Percent of purchase value lost, two decimals; zero for an empty portfolio.
    pub depreciation_percentage: Decimal,
}

/// Summarise `(purchase_price, current_value)` pairs.
pub fn summarize<I>(values: I) -> DepreciationSummary
where
    I: IntoIterator<Item = (Option<Decimal>, Decimal)>,
{
    let (purchase, current) = values.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(purchase, current), (price, value)| {
            let price = price.filter(|p| *p > Decimal::ZERO).unwrap_or(Decimal::ZERO);
            (purchase + price, current + value)
        },
    );

    let depreciation = purchase - current;
    let percentage = if purchase > Decimal::ZERO {
        depreciation / purchase * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    DepreciationSummary {
        total_purchase_value: round_money(purchase),
        total_current_value: round_money(current),
        total_depreciation: round_money(depreciation),
        depreciation_percentage: round_money(percentage),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
