//! Engine services: storage, signatures, deduplication and posting.

pub mod database;
pub mod dedup;
pub mod importer;
pub mod ingest;
pub mod metrics;
pub mod parties;
pub mod poster;
pub mod posting_rules;
pub mod provisioner;
pub mod signature;

pub use database::{Database, FinancialSummary};
pub use dedup::DuplicateFilter;
pub use importer::{ImportReport, TransactionImporter};
pub use parties::PartyResolver;
pub use poster::{BatchOutcome, LedgerPoster, RecordFailure};
pub use provisioner::{AccountProvisioner, SystemAccounts};
