//! Content-based transaction identity.
//!
//! Two records that normalize to the same date, party, description,
//! amount and kind are the same economic event and must resolve to at
//! most one posted journal entry. This is exact matching after
//! normalization, not semantic matching: "AWS Cloud Subscription" and
//! "AWS subscription" stay distinct on purpose, favoring precision over
//! recall so legitimate transactions are never silently dropped.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::models::{RawTransaction, TransactionKind};

/// Lower-case and remove all whitespace. Shared by the signature engine
/// and the party resolver so the two never disagree about name identity.
pub fn normalize_text(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Render an amount with exactly two fraction digits, e.g. `1234.50`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// SHA-256 fingerprint over the five normalized fields, joined with `|`
/// in fixed order: date, party, description, amount, kind.
pub fn transaction_signature(
    entry_date: NaiveDate,
    party: &str,
    description: &str,
    amount: Decimal,
    kind: TransactionKind,
) -> String {
    let payload = format!(
        "{}|{}|{}|{}|{}",
        entry_date.format("%Y-%m-%d"),
        normalize_text(party),
        normalize_text(description),
        format_amount(amount),
        kind.as_str(),
    );
    let digest = Sha256::digest(payload.as_bytes());
    hex::encode(digest)
}

impl RawTransaction {
    /// Signature of this record; `status` and `gst_category` are not
    /// identity-bearing and do not participate.
    pub fn signature(&self) -> String {
        transaction_signature(
            self.entry_date,
            &self.party,
            &self.description,
            self.amount,
            self.kind,
        )
    }
}
