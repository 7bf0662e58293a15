//! Integration tests for system account provisioning.
//! Run with: TEST_DATABASE_URL=postgres://... cargo test -- --ignored

mod common;

use common::{spawn_db, test_business};
use ledger_engine::models::AccountClass;
use ledger_engine::services::AccountProvisioner;

#[tokio::test]
#[ignore]
async fn provisions_exactly_four_system_accounts() {
    let db = spawn_db().await;
    let business_id = test_business(&db).await;

    let provisioner = AccountProvisioner::new(db.clone());
    let accounts = provisioner
        .ensure_default_accounts(business_id)
        .await
        .unwrap();

    assert_eq!(db.count_system_accounts(business_id).await.unwrap(), 4);

    assert_eq!(accounts.bank.account_code, "1000");
    assert_eq!(accounts.receivable.account_code, "1100");
    assert_eq!(accounts.revenue.account_code, "4000");
    assert_eq!(accounts.expense.account_code, "5000");

    assert_eq!(accounts.bank.parsed_class(), Some(AccountClass::Asset));
    assert_eq!(
        accounts.receivable.parsed_class(),
        Some(AccountClass::Asset)
    );
    assert_eq!(accounts.revenue.parsed_class(), Some(AccountClass::Income));
    assert_eq!(accounts.expense.parsed_class(), Some(AccountClass::Expense));

    assert!(accounts.bank.is_system_account);
}

#[tokio::test]
#[ignore]
async fn provisioning_twice_creates_nothing_new() {
    let db = spawn_db().await;
    let business_id = test_business(&db).await;

    let provisioner = AccountProvisioner::new(db.clone());
    let first = provisioner
        .ensure_default_accounts(business_id)
        .await
        .unwrap();
    let second = provisioner
        .ensure_default_accounts(business_id)
        .await
        .unwrap();

    assert_eq!(db.count_system_accounts(business_id).await.unwrap(), 4);
    assert_eq!(first.bank.account_id, second.bank.account_id);
    assert_eq!(first.revenue.account_id, second.revenue.account_id);
    assert_eq!(first.expense.account_id, second.expense.account_id);
}

#[tokio::test]
#[ignore]
async fn accounts_are_scoped_per_business() {
    let db = spawn_db().await;
    let business_a = test_business(&db).await;
    let business_b = test_business(&db).await;

    let provisioner = AccountProvisioner::new(db.clone());
    let a = provisioner.ensure_default_accounts(business_a).await.unwrap();
    let b = provisioner.ensure_default_accounts(business_b).await.unwrap();

    assert_ne!(a.bank.account_id, b.bank.account_id);
    assert_eq!(db.count_system_accounts(business_a).await.unwrap(), 4);
    assert_eq!(db.count_system_accounts(business_b).await.unwrap(), 4);
}
