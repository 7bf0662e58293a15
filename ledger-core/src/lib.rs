//! Shared foundation for the ledger workspace: error taxonomy,
//! configuration loading and tracing setup.

pub mod config;
pub mod error;
pub mod observability;
