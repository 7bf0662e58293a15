//! Business (tenant root) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Fixed identifier for the auto-provisioned demo tenant.
pub const DEFAULT_BUSINESS_ID: Uuid = Uuid::from_u128(1);

/// Tenant root. Owns every other entity by business id; never
/// hard-deleted, only deactivated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Business {
    pub business_id: Uuid,
    pub business_name: String,
    pub gstin: Option<String>,
    pub pan: Option<String>,
    pub currency_code: String,
    pub financial_year_start: i32,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
}

/// Input for registering a business. Tax registration numbers are
/// format-checked only, never validated against government registries.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterBusiness {
    #[validate(length(min = 1, max = 255))]
    pub business_name: String,
    #[validate(length(equal = 15))]
    pub gstin: Option<String>,
    #[validate(length(equal = 10))]
    pub pan: Option<String>,
    #[serde(default = "default_currency")]
    pub currency_code: String,
    /// April start for the Indian financial year.
    #[serde(default = "default_fy_start")]
    pub financial_year_start: i32,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_fy_start() -> i32 {
    4
}

impl RegisterBusiness {
    pub fn new(business_name: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            gstin: None,
            pan: None,
            currency_code: default_currency(),
            financial_year_start: default_fy_start(),
        }
    }
}
