//! Journal entry and line models. Entries are immutable once posted;
//! corrections are posted as new offsetting entries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Origin of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    Manual,
    CsvImport,
    AiSuggested,
    SystemGenerated,
}

impl EntrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::CsvImport => "csv_import",
            Self::AiSuggested => "ai_suggested",
            Self::SystemGenerated => "system_generated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(Self::Manual),
            "csv_import" => Some(Self::CsvImport),
            "ai_suggested" => Some(Self::AiSuggested),
            "system_generated" => Some(Self::SystemGenerated),
            _ => None,
        }
    }
}

/// Journal entry header.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct JournalEntry {
    pub entry_id: Uuid,
    pub business_id: Uuid,
    pub reference_number: String,
    pub entry_date: NaiveDate,
    pub description: Option<String>,
    pub source_type: String,
    pub is_posted: bool,
    pub posted_utc: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl JournalEntry {
    pub fn parsed_source(&self) -> Option<EntrySource> {
        EntrySource::parse(&self.source_type)
    }
}

/// One debit or credit leg of an entry.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct JournalEntryLine {
    pub line_id: Uuid,
    pub entry_id: Uuid,
    pub account_id: Uuid,
    pub party_id: Option<Uuid>,
    pub line_number: i32,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub description: Option<String>,
    pub gst_category: Option<String>,
}

impl JournalEntryLine {
    /// At most one side of a line carries a positive amount.
    pub fn is_single_sided(&self) -> bool {
        !(self.debit_amount > Decimal::ZERO && self.credit_amount > Decimal::ZERO)
    }
}

/// Header fields for an entry about to be posted.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub business_id: Uuid,
    pub reference_number: String,
    pub entry_date: NaiveDate,
    pub description: Option<String>,
    pub source: EntrySource,
    pub created_by: Option<String>,
}

/// One leg of an entry about to be posted.
#[derive(Debug, Clone)]
pub struct NewJournalLine {
    pub account_id: Uuid,
    pub party_id: Option<Uuid>,
    pub line_number: i32,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub description: Option<String>,
    pub gst_category: Option<String>,
}
