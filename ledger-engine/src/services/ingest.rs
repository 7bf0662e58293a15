//! CSV ingestion boundary.
//!
//! Columns: `date, client, description, amount, type, status` with an
//! optional `gst_category`. All required-field validation happens here,
//! once; the rest of the engine only ever sees well-formed
//! `RawTransaction` records.

use std::io::Read;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{PaymentStatus, RawTransaction, TransactionKind};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    client: String,
    description: String,
    amount: String,
    #[serde(rename = "type")]
    kind: String,
    status: String,
    #[serde(default)]
    gst_category: Option<String>,
}

/// One rejected CSV row and why.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    /// 1-based line number in the file (the header is line 1).
    pub line: u64,
    pub reason: String,
}

/// Parse a CSV stream into validated transactions plus per-row errors.
/// A bad row never aborts the read.
pub fn read_transactions<R: Read>(reader: R) -> (Vec<RawTransaction>, Vec<RowError>) {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    let mut errors = Vec::new();

    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let line = index as u64 + 2;
        match result {
            Ok(row) => match validate_row(row) {
                Ok(txn) => transactions.push(txn),
                Err(reason) => {
                    warn!(line = line, reason = %reason, "CSV row rejected");
                    errors.push(RowError { line, reason });
                }
            },
            Err(e) => {
                warn!(line = line, error = %e, "CSV row unreadable");
                errors.push(RowError {
                    line,
                    reason: e.to_string(),
                });
            }
        }
    }

    (transactions, errors)
}

fn validate_row(row: CsvRow) -> Result<RawTransaction, String> {
    let entry_date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", row.date))?;

    if row.client.trim().is_empty() {
        return Err("Client name is required".to_string());
    }

    let amount: Decimal = row
        .amount
        .parse()
        .map_err(|_| format!("Invalid amount '{}'", row.amount))?;
    if amount <= Decimal::ZERO {
        return Err(format!("Amount must be positive, got {}", amount));
    }

    let kind = TransactionKind::parse(&row.kind)
        .ok_or_else(|| format!("Unknown type '{}', expected income or expense", row.kind))?;

    let status = PaymentStatus::parse(&row.status)
        .ok_or_else(|| format!("Unknown status '{}', expected paid or unpaid", row.status))?;

    Ok(RawTransaction {
        entry_date,
        party: row.client,
        description: row.description,
        amount,
        kind,
        status,
        gst_category: row.gst_category.filter(|c| !c.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_rows() {
        let data = "\
date,client,description,amount,type,status
2026-01-15,TechCorp,Web development project,15000,income,paid
2026-01-16,CloudHost Inc,Monthly hosting fee,500,expense,paid
";
        let (transactions, errors) = read_transactions(data.as_bytes());
        assert!(errors.is_empty());
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].party, "TechCorp");
        assert_eq!(transactions[0].kind, TransactionKind::Income);
        assert_eq!(transactions[1].kind, TransactionKind::Expense);
        assert_eq!(transactions[1].amount, Decimal::from(500));
    }

    #[test]
    fn rejects_bad_rows_and_keeps_the_rest() {
        let data = "\
date,client,description,amount,type,status
2026-01-15,TechCorp,Web dev,abc,income,paid
not-a-date,TechCorp,Web dev,100,income,paid
2026-01-15,,Web dev,100,income,paid
2026-01-15,TechCorp,Web dev,100,transfer,paid
2026-01-15,TechCorp,Web dev,-100,expense,paid
2026-01-20,StartupX,Consulting,8000,income,unpaid
";
        let (transactions, errors) = read_transactions(data.as_bytes());
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].party, "StartupX");
        assert_eq!(transactions[0].status, PaymentStatus::Unpaid);
        assert_eq!(errors.len(), 5);
        // Line numbers are file positions, header included.
        assert_eq!(errors[0].line, 2);
        assert_eq!(errors[4].line, 6);
    }

    #[test]
    fn gst_category_passes_through_when_present() {
        let data = "\
date,client,description,amount,type,status,gst_category
2026-01-15,Office Supplies Ltd,Stationery,1200,expense,paid,office_supplies
2026-01-16,TechCorp,Web dev,1000,income,paid,
";
        let (transactions, errors) = read_transactions(data.as_bytes());
        assert!(errors.is_empty());
        assert_eq!(
            transactions[0].gst_category.as_deref(),
            Some("office_supplies")
        );
        assert_eq!(transactions[1].gst_category, None);
    }
}
