//! Chart-of-accounts model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account classes following standard accounting categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountClass {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountClass {
    /// Get string representation for database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four accounts the engine provisions for every business. Posting
/// only ever touches these; user-defined accounts are reporting-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAccount {
    Bank,
    Receivable,
    Revenue,
    Expense,
}

impl SystemAccount {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bank => "1000",
            Self::Receivable => "1100",
            Self::Revenue => "4000",
            Self::Expense => "5000",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bank => "Bank",
            Self::Receivable => "Accounts Receivable",
            Self::Revenue => "Revenue",
            Self::Expense => "General Expenses",
        }
    }

    pub fn class(&self) -> AccountClass {
        match self {
            Self::Bank | Self::Receivable => AccountClass::Asset,
            Self::Revenue => AccountClass::Income,
            Self::Expense => AccountClass::Expense,
        }
    }
}

/// Chart-of-accounts row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Uuid,
    pub business_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    pub account_class: String,
    pub parent_id: Option<Uuid>,
    pub is_system_account: bool,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
}

impl Account {
    /// Get parsed account class.
    pub fn parsed_class(&self) -> Option<AccountClass> {
        AccountClass::parse(&self.account_class)
    }
}
