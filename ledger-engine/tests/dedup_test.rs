//! End-to-end duplicate detection tests over the full import path.
//! Run with: TEST_DATABASE_URL=postgres://... cargo test -- --ignored

mod common;

use common::{days_ago, spawn_db, test_business, txn};
use ledger_engine::models::TransactionKind;
use ledger_engine::services::TransactionImporter;

fn importer(db: &ledger_engine::services::Database) -> TransactionImporter {
    TransactionImporter::new(db.clone(), 6, "tester")
}

#[tokio::test]
#[ignore]
async fn resubmitted_batch_posts_nothing() {
    let db = spawn_db().await;
    let business_id = test_business(&db).await;
    let importer = importer(&db);

    let batch = vec![
        txn(
            days_ago(30),
            "TechCorp",
            "Website development",
            "15000.00",
            TransactionKind::Income,
        ),
        txn(
            days_ago(25),
            "Airtel",
            "Office internet",
            "1499.00",
            TransactionKind::Expense,
        ),
        txn(
            days_ago(20),
            "Retail Mart",
            "POS integration",
            "8000.00",
            TransactionKind::Income,
        ),
    ];

    let first = importer.import(business_id, batch.clone()).await.unwrap();
    assert_eq!(first.saved, 3);
    assert_eq!(first.duplicates, 0);

    let second = importer.import(business_id, batch).await.unwrap();
    assert_eq!(second.saved, 0);
    assert_eq!(second.duplicates, 3);
    assert_eq!(second.failed, 0);

    assert_eq!(db.count_posted_entries(business_id).await.unwrap(), 3);
}

#[tokio::test]
#[ignore]
async fn mixed_batch_posts_only_the_new_record() {
    let db = spawn_db().await;
    let business_id = test_business(&db).await;
    let importer = importer(&db);

    let existing = txn(
        days_ago(14),
        "TechCorp",
        "Website development",
        "15000.00",
        TransactionKind::Income,
    );
    importer
        .import(business_id, vec![existing.clone()])
        .await
        .unwrap();

    let fresh = txn(
        days_ago(7),
        "TechCorp",
        "Maintenance retainer",
        "5000.00",
        TransactionKind::Income,
    );
    let report = importer
        .import(business_id, vec![existing, fresh])
        .await
        .unwrap();

    assert_eq!(report.saved, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(db.count_posted_entries(business_id).await.unwrap(), 2);
}

#[tokio::test]
#[ignore]
async fn spelling_variants_are_duplicates() {
    let db = spawn_db().await;
    let business_id = test_business(&db).await;
    let importer = importer(&db);

    importer
        .import(
            business_id,
            vec![txn(
                days_ago(10),
                "TechCorp",
                "Web development",
                "15000.00",
                TransactionKind::Income,
            )],
        )
        .await
        .unwrap();

    let variant = txn(
        days_ago(10),
        "  TECHCORP ",
        "WEB  DEVELOPMENT",
        "15000",
        TransactionKind::Income,
    );
    let report = importer.import(business_id, vec![variant]).await.unwrap();

    assert_eq!(report.saved, 0);
    assert_eq!(report.duplicates, 1);
}

#[tokio::test]
#[ignore]
async fn a_changed_amount_is_a_new_transaction() {
    let db = spawn_db().await;
    let business_id = test_business(&db).await;
    let importer = importer(&db);

    importer
        .import(
            business_id,
            vec![txn(
                days_ago(10),
                "TechCorp",
                "Web development",
                "15000.00",
                TransactionKind::Income,
            )],
        )
        .await
        .unwrap();

    let report = importer
        .import(
            business_id,
            vec![txn(
                days_ago(10),
                "TechCorp",
                "Web development",
                "15500.00",
                TransactionKind::Income,
            )],
        )
        .await
        .unwrap();

    assert_eq!(report.saved, 1);
    assert_eq!(report.duplicates, 0);
}

#[tokio::test]
#[ignore]
async fn duplicates_are_scoped_per_business() {
    let db = spawn_db().await;
    let business_a = test_business(&db).await;
    let business_b = test_business(&db).await;
    let importer = importer(&db);

    let record = txn(
        days_ago(10),
        "TechCorp",
        "Web development",
        "15000.00",
        TransactionKind::Income,
    );

    importer
        .import(business_a, vec![record.clone()])
        .await
        .unwrap();
    let report = importer.import(business_b, vec![record]).await.unwrap();

    assert_eq!(report.saved, 1);
    assert_eq!(report.duplicates, 0);
}
