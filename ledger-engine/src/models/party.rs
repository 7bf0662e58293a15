//! Party (client/vendor) model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    Customer,
    Vendor,
    Both,
}

impl PartyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
            Self::Both => "both",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(Self::Customer),
            "vendor" => Some(Self::Vendor),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Counterparty row. `normalized_name` is the lookup key (lower-cased,
/// whitespace removed) and is unique per business; `display_name` keeps
/// the spelling seen on first contact. Soft-deactivated, never deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Party {
    pub party_id: Uuid,
    pub business_id: Uuid,
    pub display_name: String,
    pub normalized_name: String,
    pub party_type: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub credit_limit: Decimal,
    pub credit_days: i32,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
    pub deleted_utc: Option<DateTime<Utc>>,
}

impl Party {
    pub fn parsed_type(&self) -> Option<PartyType> {
        PartyType::parse(&self.party_type)
    }
}
