//! Chart-of-accounts provisioning.

use crate::models::{Account, SystemAccount};
use crate::services::database::Database;
use ledger_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

/// The four system accounts posting depends on, resolved to rows.
#[derive(Debug, Clone)]
pub struct SystemAccounts {
    pub bank: Account,
    pub receivable: Account,
    pub revenue: Account,
    pub expense: Account,
}

impl SystemAccounts {
    pub fn get(&self, role: SystemAccount) -> &Account {
        match role {
            SystemAccount::Bank => &self.bank,
            SystemAccount::Receivable => &self.receivable,
            SystemAccount::Revenue => &self.revenue,
            SystemAccount::Expense => &self.expense,
        }
    }
}

/// Guarantees the system accounts exist before any posting occurs.
/// Idempotent: each account is created at most once per business,
/// matched by (business_id, account_code); existing rows are never
/// touched.
#[derive(Clone)]
pub struct AccountProvisioner {
    db: Database,
}

impl AccountProvisioner {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self), fields(business_id = %business_id))]
    pub async fn ensure_default_accounts(
        &self,
        business_id: Uuid,
    ) -> Result<SystemAccounts, AppError> {
        let bank = self
            .db
            .ensure_system_account(business_id, SystemAccount::Bank)
            .await?;
        let receivable = self
            .db
            .ensure_system_account(business_id, SystemAccount::Receivable)
            .await?;
        let revenue = self
            .db
            .ensure_system_account(business_id, SystemAccount::Revenue)
            .await?;
        let expense = self
            .db
            .ensure_system_account(business_id, SystemAccount::Expense)
            .await?;

        Ok(SystemAccounts {
            bank,
            receivable,
            revenue,
            expense,
        })
    }
}
