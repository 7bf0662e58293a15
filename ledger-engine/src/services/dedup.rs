//! Duplicate filter: drops incoming records whose signature matches a
//! journal entry already posted within the lookback window.

use std::collections::{HashMap, HashSet};

use chrono::{Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::models::{AccountClass, RawTransaction};
use crate::services::database::{Database, PostedLine};
use crate::services::metrics::{DUPLICATES_SKIPPED, ERRORS_TOTAL};
use crate::services::posting_rules;
use crate::services::signature::transaction_signature;

/// Default lookback: six calendar months.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 6;

/// Read-only filter over previously posted entries.
#[derive(Clone)]
pub struct DuplicateFilter {
    db: Database,
    lookback_months: u32,
}

impl DuplicateFilter {
    pub fn new(db: Database, lookback_months: u32) -> Self {
        Self {
            db,
            lookback_months,
        }
    }

    /// Partition `batch` into (new records, duplicate count), preserving
    /// input order among the survivors.
    ///
    /// On any storage failure this fails open: the whole batch is
    /// returned as new with a loud log line, so an unreachable store
    /// degrades to manual dedup review instead of blocking ingestion.
    #[instrument(skip(self, batch), fields(business_id = %business_id, batch_size = batch.len()))]
    pub async fn partition(
        &self,
        business_id: Uuid,
        batch: Vec<RawTransaction>,
    ) -> (Vec<RawTransaction>, usize) {
        if batch.is_empty() {
            return (batch, 0);
        }

        let cutoff = lookback_cutoff(Utc::now().date_naive(), self.lookback_months);

        let existing = match self.db.posted_lines_since(business_id, cutoff).await {
            Ok(rows) => reconstruct_signatures(&rows),
            Err(e) => {
                error!(
                    error = %e,
                    "Duplicate lookup failed; failing open and treating the whole batch as new"
                );
                ERRORS_TOTAL.with_label_values(&["dedup_fail_open"]).inc();
                return (batch, 0);
            }
        };

        debug!(existing = existing.len(), "Loaded posted signatures");

        let (fresh, duplicates) = partition_by_signature(batch, &existing);
        if duplicates > 0 {
            DUPLICATES_SKIPPED
                .with_label_values(&["csv_import"])
                .inc_by(duplicates as f64);
        }
        (fresh, duplicates)
    }
}

/// Walk back N calendar months from `today`.
pub fn lookback_cutoff(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Pure partition step: a record is a duplicate iff its signature is in
/// `existing`.
pub fn partition_by_signature(
    batch: Vec<RawTransaction>,
    existing: &HashSet<String>,
) -> (Vec<RawTransaction>, usize) {
    let mut fresh = Vec::with_capacity(batch.len());
    let mut duplicates = 0;

    for txn in batch {
        if existing.contains(&txn.signature()) {
            duplicates += 1;
        } else {
            fresh.push(txn);
        }
    }

    (fresh, duplicates)
}

/// Reconstruct the signature of every posted entry from its stored
/// lines. Entries that do not map back through the posting rules
/// (manual journals against other account classes) are skipped.
pub fn reconstruct_signatures(rows: &[PostedLine]) -> HashSet<String> {
    let mut groups: HashMap<Uuid, Vec<&PostedLine>> = HashMap::new();
    for row in rows {
        groups.entry(row.entry_id).or_default().push(row);
    }

    groups
        .values()
        .filter_map(|lines| reconstruct_signature(lines))
        .collect()
}

/// Inverse of the posting rule, applied to one entry's lines: the party
/// comes from whichever line carries one, the amount from the positive
/// debit leg (else the positive credit leg), the kind from the debit
/// leg's account class.
fn reconstruct_signature(lines: &[&PostedLine]) -> Option<String> {
    let first = lines.first()?;

    let debit = lines.iter().find(|l| l.debit_amount > Decimal::ZERO);
    let credit = lines.iter().find(|l| l.credit_amount > Decimal::ZERO);

    let kind = debit
        .and_then(|l| AccountClass::parse(&l.account_class))
        .and_then(posting_rules::kind_from_debit)?;

    let amount = debit
        .map(|l| l.debit_amount)
        .or_else(|| credit.map(|l| l.credit_amount))
        .unwrap_or(Decimal::ZERO);

    let party = lines
        .iter()
        .find_map(|l| l.party_name.clone())
        .unwrap_or_default();

    let description = first.entry_description.clone().unwrap_or_default();

    Some(transaction_signature(
        first.entry_date,
        &party,
        &description,
        amount,
        kind,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentStatus, TransactionKind};

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn txn(date: &str, party: &str, description: &str, amount: &str, kind: TransactionKind) -> RawTransaction {
        RawTransaction {
            entry_date: date.parse().unwrap(),
            party: party.to_string(),
            description: description.to_string(),
            amount: dec(amount),
            kind,
            status: PaymentStatus::Paid,
            gst_category: None,
        }
    }

    /// Stored lines for one two-line entry posted by the engine's rules.
    fn posted_entry(txn: &RawTransaction) -> Vec<PostedLine> {
        let entry_id = Uuid::new_v4();
        let split = posting_rules::split_for(txn.kind);
        let line = |debit: bool, class: AccountClass| PostedLine {
            entry_id,
            entry_date: txn.entry_date,
            entry_description: Some(txn.description.clone()),
            debit_amount: if debit { txn.amount } else { Decimal::ZERO },
            credit_amount: if debit { Decimal::ZERO } else { txn.amount },
            account_class: class.as_str().to_string(),
            party_name: Some(txn.party.clone()),
        };
        vec![
            line(true, split.debit.class()),
            line(false, split.credit.class()),
        ]
    }

    #[test]
    fn reconstruction_matches_original_signature() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            let original = txn("2026-01-15", "TechCorp", "Web dev", "15000", kind);
            let sigs = reconstruct_signatures(&posted_entry(&original));
            assert_eq!(sigs.len(), 1);
            assert!(sigs.contains(&original.signature()));
        }
    }

    #[test]
    fn manual_entries_are_not_reconstructed() {
        // Debit against equity does not map through the posting rules.
        let original = txn("2026-01-15", "Owner", "Capital injection", "50000", TransactionKind::Income);
        let mut lines = posted_entry(&original);
        lines[0].account_class = AccountClass::Equity.as_str().to_string();
        assert!(reconstruct_signatures(&lines).is_empty());
    }

    #[test]
    fn partition_reports_duplicates_and_preserves_order() {
        let existing_txn = txn("2026-01-15", "TechCorp", "Web dev", "15000", TransactionKind::Income);
        let fresh_a = txn("2026-01-25", "NewClient", "New Service", "2000", TransactionKind::Income);
        let fresh_b = txn("2026-01-26", "CloudHost", "Hosting", "500", TransactionKind::Expense);

        let existing: HashSet<String> = [existing_txn.signature()].into_iter().collect();
        let batch = vec![fresh_a.clone(), existing_txn.clone(), fresh_b.clone()];

        let (fresh, duplicates) = partition_by_signature(batch, &existing);
        assert_eq!(duplicates, 1);
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].party, fresh_a.party);
        assert_eq!(fresh[1].party, fresh_b.party);
    }

    #[test]
    fn partition_matches_normalized_variants() {
        let posted = txn("2026-01-15", "TechCorp", "Software Development", "1000", TransactionKind::Income);
        let resubmitted = txn("2026-01-15", "TECHCORP", "software development", "1000.00", TransactionKind::Income);

        let existing: HashSet<String> = [posted.signature()].into_iter().collect();
        let (fresh, duplicates) = partition_by_signature(vec![resubmitted], &existing);
        assert_eq!(duplicates, 1);
        assert!(fresh.is_empty());
    }

    #[test]
    fn lookback_walks_back_calendar_months() {
        let today: NaiveDate = "2026-08-31".parse().unwrap();
        assert_eq!(lookback_cutoff(today, 6), "2026-02-28".parse().unwrap());
        assert_eq!(lookback_cutoff(today, 0), today);
    }
}
