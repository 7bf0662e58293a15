//! The fixed double-entry posting rule and its inverse.
//!
//! The poster applies the rule forward (kind → debit/credit accounts);
//! the duplicate filter applies it in reverse (positive debit's account
//! class → kind) when reconstructing transactions from stored lines.
//! Both directions live here so they cannot drift apart.

use crate::models::{AccountClass, SystemAccount, TransactionKind};

/// Which system accounts the two legs of an entry hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingSplit {
    pub debit: SystemAccount,
    pub credit: SystemAccount,
}

/// Forward rule: income debits Bank and credits Revenue; expense debits
/// General Expenses and credits Bank. Not configurable.
pub fn split_for(kind: TransactionKind) -> PostingSplit {
    match kind {
        TransactionKind::Income => PostingSplit {
            debit: SystemAccount::Bank,
            credit: SystemAccount::Revenue,
        },
        TransactionKind::Expense => PostingSplit {
            debit: SystemAccount::Expense,
            credit: SystemAccount::Bank,
        },
    }
}

/// Inverse rule: the class of the account behind the positive debit leg
/// determines the kind. A debit against an asset account means money
/// came in; a debit against an expense account means money went out.
/// Entries whose debit leg hits any other class (manual journals and the
/// like) do not map back to an imported transaction.
pub fn kind_from_debit(class: AccountClass) -> Option<TransactionKind> {
    match class {
        AccountClass::Asset => Some(TransactionKind::Income),
        AccountClass::Expense => Some(TransactionKind::Expense),
        _ => None,
    }
}
