//! Common test utilities for ledger-engine integration tests.

#![allow(dead_code)]

use chrono::{Days, NaiveDate, Utc};
use ledger_engine::models::{PaymentStatus, RawTransaction, RegisterBusiness, TransactionKind};
use ledger_engine::services::Database;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Initialize tracing for tests (safe to call repeatedly).
pub fn init_tracing() {
    ledger_core::observability::init_test_tracing("info,ledger_engine=debug,sqlx=warn");
}

/// Connect to the test database and run migrations.
pub async fn spawn_db() -> Database {
    init_tracing();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set to run integration tests");

    let db = Database::new(&database_url, 2, 1)
        .await
        .expect("Failed to connect to test database");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

/// Register a fresh business so each test is isolated.
pub async fn test_business(db: &Database) -> Uuid {
    let input = RegisterBusiness::new(format!("Test Business {}", Uuid::new_v4()));
    db.register_business(&input)
        .await
        .expect("Failed to register test business")
        .business_id
}

/// A date `n` days before today, keeping test data inside the six-month
/// duplicate lookback window.
pub fn days_ago(n: u64) -> NaiveDate {
    Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(n))
        .unwrap()
}

/// Build a paid transaction record.
pub fn txn(
    date: NaiveDate,
    client: &str,
    description: &str,
    amount: &str,
    kind: TransactionKind,
) -> RawTransaction {
    RawTransaction {
        entry_date: date,
        party: client.to_string(),
        description: description.to_string(),
        amount: amount.parse::<Decimal>().unwrap(),
        kind,
        status: PaymentStatus::Paid,
        gst_category: None,
    }
}
