//! Integration tests for party resolution.
//! Run with: TEST_DATABASE_URL=postgres://... cargo test -- --ignored

mod common;

use common::{spawn_db, test_business};
use ledger_core::error::AppError;
use ledger_engine::services::PartyResolver;

#[tokio::test]
#[ignore]
async fn creates_party_on_first_sight() {
    let db = spawn_db().await;
    let business_id = test_business(&db).await;
    let resolver = PartyResolver::new(db.clone());

    let party = resolver
        .get_or_create(business_id, "TechCorp Solutions")
        .await
        .unwrap();

    assert_eq!(party.display_name, "TechCorp Solutions");
    assert_eq!(party.normalized_name, "techcorpsolutions");
    assert_eq!(party.business_id, business_id);
}

#[tokio::test]
#[ignore]
async fn spelling_variants_resolve_to_one_party() {
    let db = spawn_db().await;
    let business_id = test_business(&db).await;
    let resolver = PartyResolver::new(db.clone());

    let first = resolver
        .get_or_create(business_id, "TechCorp Solutions")
        .await
        .unwrap();
    let upper = resolver
        .get_or_create(business_id, "TECHCORP SOLUTIONS")
        .await
        .unwrap();
    let spaced = resolver
        .get_or_create(business_id, "  Tech Corp  Solutions ")
        .await
        .unwrap();

    assert_eq!(first.party_id, upper.party_id);
    assert_eq!(first.party_id, spaced.party_id);
    // The display name keeps the original spelling.
    assert_eq!(spaced.display_name, "TechCorp Solutions");
}

#[tokio::test]
#[ignore]
async fn same_name_in_two_businesses_gets_two_parties() {
    let db = spawn_db().await;
    let business_a = test_business(&db).await;
    let business_b = test_business(&db).await;
    let resolver = PartyResolver::new(db.clone());

    let a = resolver.get_or_create(business_a, "Acme").await.unwrap();
    let b = resolver.get_or_create(business_b, "Acme").await.unwrap();

    assert_ne!(a.party_id, b.party_id);
}

#[tokio::test]
#[ignore]
async fn blank_name_is_rejected() {
    let db = spawn_db().await;
    let business_id = test_business(&db).await;
    let resolver = PartyResolver::new(db);

    let err = resolver
        .get_or_create(business_id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
