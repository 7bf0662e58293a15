//! Typed raw-transaction record: the shape produced by the CSV boundary
//! and consumed by the signature engine, duplicate filter and poster.
//! Required-field validation happens once, at the boundary, so every
//! field here is already present and well-formed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Economic direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Case-insensitive, whitespace-tolerant parse.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement status carried through from the CSV. Not part of the
/// transaction signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "paid" => Some(Self::Paid),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }
}

/// One validated transaction record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub entry_date: NaiveDate,
    pub party: String,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub status: PaymentStatus,
    /// Opaque tag from the external GST classifier, stored verbatim on
    /// both lines of the posted entry.
    pub gst_category: Option<String>,
}
