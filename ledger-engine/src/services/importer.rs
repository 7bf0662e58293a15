//! Batch import orchestration: filter, provision, resolve, post.

use ledger_core::error::AppError;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::RawTransaction;
use crate::services::database::Database;
use crate::services::dedup::DuplicateFilter;
use crate::services::ingest::RowError;
use crate::services::parties::PartyResolver;
use crate::services::poster::{LedgerPoster, RecordFailure};
use crate::services::provisioner::AccountProvisioner;

/// The per-batch contract: the caller can always report
/// "X saved, Y duplicates skipped, Z failed".
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub saved: usize,
    pub duplicates: usize,
    /// Posting failures plus any folded-in boundary rejections.
    pub failed: usize,
    pub failures: Vec<RecordFailure>,
    /// Rows the CSV boundary rejected before the batch was formed.
    pub rejected_rows: Vec<RowError>,
    /// Set when a storage failure stopped the batch early; the counts
    /// above cover the work completed before it.
    pub aborted: Option<String>,
}

impl ImportReport {
    /// Fold CSV boundary rejections into the totals, so the final
    /// "saved / duplicates / failed" line covers every row of the file,
    /// not just the rows that parsed.
    pub fn with_row_errors(mut self, errors: Vec<RowError>) -> Self {
        self.failed += errors.len();
        self.rejected_rows = errors;
        self
    }
}

/// End-to-end CSV batch importer for one business at a time.
/// Batches for different businesses are independent; no concurrent
/// posting to the same business is assumed.
#[derive(Clone)]
pub struct TransactionImporter {
    filter: DuplicateFilter,
    provisioner: AccountProvisioner,
    resolver: PartyResolver,
    poster: LedgerPoster,
    created_by: String,
}

impl TransactionImporter {
    pub fn new(db: Database, lookback_months: u32, created_by: impl Into<String>) -> Self {
        Self {
            filter: DuplicateFilter::new(db.clone(), lookback_months),
            provisioner: AccountProvisioner::new(db.clone()),
            resolver: PartyResolver::new(db.clone()),
            poster: LedgerPoster::new(db),
            created_by: created_by.into(),
        }
    }

    /// Import one batch, in CSV row order. Errors here mean nothing was
    /// posted (provisioning the system accounts failed); once posting
    /// starts, failures are reported through the `ImportReport` instead.
    #[instrument(skip(self, batch), fields(business_id = %business_id, batch_size = batch.len()))]
    pub async fn import(
        &self,
        business_id: Uuid,
        batch: Vec<RawTransaction>,
    ) -> Result<ImportReport, AppError> {
        let accounts = self.provisioner.ensure_default_accounts(business_id).await?;

        let (fresh, duplicates) = self.filter.partition(business_id, batch).await;

        let outcome = self
            .poster
            .post_batch(
                business_id,
                &accounts,
                &self.resolver,
                &fresh,
                &self.created_by,
            )
            .await;

        let report = ImportReport {
            saved: outcome.posted,
            duplicates,
            failed: outcome.failures.len(),
            failures: outcome.failures,
            rejected_rows: Vec::new(),
            aborted: outcome.aborted,
        };

        info!(
            saved = report.saved,
            duplicates = report.duplicates,
            failed = report.failed,
            "Batch import finished"
        );

        Ok(report)
    }
}
