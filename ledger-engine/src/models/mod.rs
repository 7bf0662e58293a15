//! Domain models for the posting engine.

mod account;
mod business;
mod journal;
mod party;
mod transaction;

pub use account::{Account, AccountClass, SystemAccount};
pub use business::{Business, RegisterBusiness, DEFAULT_BUSINESS_ID};
pub use journal::{EntrySource, JournalEntry, JournalEntryLine, NewJournalEntry, NewJournalLine};
pub use party::{Party, PartyType};
pub use transaction::{PaymentStatus, RawTransaction, TransactionKind};
