//! Ledger poster: one validated transaction in, one balanced two-line
//! journal entry out.

use chrono::Utc;
use ledger_core::error::AppError;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::models::{EntrySource, NewJournalEntry, NewJournalLine, RawTransaction};
use crate::services::database::Database;
use crate::services::metrics::ENTRIES_POSTED;
use crate::services::parties::PartyResolver;
use crate::services::posting_rules;
use crate::services::provisioner::SystemAccounts;

/// One rejected record and why.
#[derive(Debug, Clone, Serialize)]
pub struct RecordFailure {
    /// Zero-based position in the submitted batch.
    pub row: usize,
    pub party: String,
    pub reason: String,
}

/// Result of posting one batch. Per-record failures never abort the
/// batch; `aborted` is set only when the store itself failed, and the
/// counts still cover the work completed before that.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub posted: usize,
    pub failures: Vec<RecordFailure>,
    pub aborted: Option<String>,
}

/// Writes balanced journal entries for non-duplicate transactions.
#[derive(Clone)]
pub struct LedgerPoster {
    db: Database,
}

impl LedgerPoster {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Post a batch in input order. Records with a non-positive amount
    /// are rejected individually; a storage failure stops the remainder
    /// but leaves already-posted entries intact.
    #[instrument(skip(self, accounts, resolver, batch), fields(business_id = %business_id, batch_size = batch.len()))]
    pub async fn post_batch(
        &self,
        business_id: Uuid,
        accounts: &SystemAccounts,
        resolver: &PartyResolver,
        batch: &[RawTransaction],
        created_by: &str,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (row, txn) in batch.iter().enumerate() {
            match self
                .post_one(business_id, accounts, resolver, txn, created_by)
                .await
            {
                Ok(()) => {
                    outcome.posted += 1;
                    ENTRIES_POSTED.with_label_values(&["posted"]).inc();
                }
                Err(e) if is_record_level(&e) => {
                    warn!(row = row, party = %txn.party, error = %e, "Record rejected");
                    ENTRIES_POSTED.with_label_values(&["rejected"]).inc();
                    outcome.failures.push(RecordFailure {
                        row,
                        party: txn.party.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!(row = row, error = %e, "Storage failure, aborting remaining batch");
                    outcome.aborted = Some(e.to_string());
                    break;
                }
            }
        }

        outcome
    }

    async fn post_one(
        &self,
        business_id: Uuid,
        accounts: &SystemAccounts,
        resolver: &PartyResolver,
        txn: &RawTransaction,
        created_by: &str,
    ) -> Result<(), AppError> {
        if txn.amount <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "Amount must be positive, got {}",
                txn.amount
            )));
        }

        let party = resolver.get_or_create(business_id, &txn.party).await?;

        let split = posting_rules::split_for(txn.kind);
        let debit_account = accounts.get(split.debit);
        let credit_account = accounts.get(split.credit);

        let header = NewJournalEntry {
            business_id,
            reference_number: import_reference(),
            entry_date: txn.entry_date,
            description: Some(txn.description.clone()),
            source: EntrySource::CsvImport,
            created_by: Some(created_by.to_string()),
        };

        let lines = [
            NewJournalLine {
                account_id: debit_account.account_id,
                party_id: Some(party.party_id),
                line_number: 1,
                debit_amount: txn.amount,
                credit_amount: Decimal::ZERO,
                description: Some(txn.description.clone()),
                gst_category: txn.gst_category.clone(),
            },
            NewJournalLine {
                account_id: credit_account.account_id,
                party_id: Some(party.party_id),
                line_number: 2,
                debit_amount: Decimal::ZERO,
                credit_amount: txn.amount,
                description: Some(txn.description.clone()),
                gst_category: txn.gst_category.clone(),
            },
        ];

        self.db.insert_posted_entry(&header, &lines).await?;

        Ok(())
    }
}

/// Validation and constraint failures affect a single record; anything
/// else is a store-wide problem.
fn is_record_level(err: &AppError) -> bool {
    matches!(err, AppError::Validation(_) | AppError::Conflict(_))
}

/// Business-unique reference: a second-resolution timestamp plus an
/// opaque suffix, so two transactions posted in the same second cannot
/// collide.
fn import_reference() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "IMP-{}-{}",
        Utc::now().format("%Y%m%d%H%M%S"),
        &suffix[..8]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_are_unique_within_a_second() {
        let refs: std::collections::HashSet<String> =
            (0..1000).map(|_| import_reference()).collect();
        assert_eq!(refs.len(), 1000);
    }

    #[test]
    fn reference_carries_import_prefix() {
        assert!(import_reference().starts_with("IMP-"));
    }
}
