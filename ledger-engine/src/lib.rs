//! Transaction deduplication and double-entry posting engine.
//!
//! Raw CSV batches become balanced, immutable journal entries: the
//! signature engine fingerprints each record, the duplicate filter drops
//! records already posted within the lookback window, and the poster
//! writes one balanced two-line journal entry per surviving record.

pub mod config;
pub mod models;
pub mod services;
pub mod startup;
