//! Ledger store: durable, constraint-enforcing persistence for
//! businesses, parties, accounts and journal entries.

use crate::models::{
    Account, Business, JournalEntry, JournalEntryLine, NewJournalEntry, NewJournalLine, Party,
    PartyType, RegisterBusiness, SystemAccount, DEFAULT_BUSINESS_ID,
};
use crate::services::metrics::DB_QUERY_DURATION;
use chrono::NaiveDate;
use ledger_core::error::AppError;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// One stored journal line joined with its account class, party name and
/// header fields; the shape the duplicate filter reconstructs from.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostedLine {
    pub entry_id: Uuid,
    pub entry_date: NaiveDate,
    pub entry_description: Option<String>,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub account_class: String,
    pub party_name: Option<String>,
}

/// Read-only aggregates over posted entries, handed to the reporting and
/// commentary layers.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
    pub receivables: Decimal,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "ledger-engine"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Create a pool without connecting. Queries fail at use time if the
    /// server is unreachable; the duplicate filter's fail-open path
    /// depends on that surfacing as a `Database` error.
    pub fn connect_lazy(database_url: &str, acquire_timeout: Duration) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)
            .map_err(|e| AppError::Database(anyhow::anyhow!("Invalid database url: {}", e)))?;
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Business Operations
    // -------------------------------------------------------------------------

    /// Register a new business after format-checking its inputs.
    #[instrument(skip(self, input), fields(business_name = %input.business_name))]
    pub async fn register_business(&self, input: &RegisterBusiness) -> Result<Business, AppError> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["register_business"])
            .start_timer();

        let business = sqlx::query_as::<_, Business>(
            r#"
            INSERT INTO businesses (business_id, business_name, gstin, pan, currency_code, financial_year_start)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING business_id, business_name, gstin, pan, currency_code, financial_year_start, is_active, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.business_name)
        .bind(&input.gstin)
        .bind(&input.pan)
        .bind(&input.currency_code)
        .bind(input.financial_year_start)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to register business", e))?;

        timer.observe_duration();

        info!(business_id = %business.business_id, "Business registered");

        Ok(business)
    }

    /// Get a business by id.
    #[instrument(skip(self), fields(business_id = %business_id))]
    pub async fn get_business(&self, business_id: Uuid) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            SELECT business_id, business_name, gstin, pan, currency_code, financial_year_start, is_active, created_utc
            FROM businesses
            WHERE business_id = $1
            "#,
        )
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to get business", e))?;

        Ok(business)
    }

    /// Idempotently provision the demo tenant with a fixed id.
    #[instrument(skip(self))]
    pub async fn ensure_default_business(&self, business_name: &str) -> Result<Business, AppError> {
        sqlx::query(
            r#"
            INSERT INTO businesses (business_id, business_name)
            VALUES ($1, $2)
            ON CONFLICT (business_id) DO NOTHING
            "#,
        )
        .bind(DEFAULT_BUSINESS_ID)
        .bind(business_name)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to ensure default business", e))?;

        self.get_business(DEFAULT_BUSINESS_ID)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Default business missing after insert")))
    }

    // -------------------------------------------------------------------------
    // Account Operations
    // -------------------------------------------------------------------------

    /// Insert a system account if it does not exist, then fetch it.
    /// Matched by (business_id, account_code); existing rows are never
    /// updated.
    #[instrument(skip(self), fields(business_id = %business_id, code = role.code()))]
    pub async fn ensure_system_account(
        &self,
        business_id: Uuid,
        role: SystemAccount,
    ) -> Result<Account, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["ensure_system_account"])
            .start_timer();

        sqlx::query(
            r#"
            INSERT INTO chart_of_accounts (account_id, business_id, account_code, account_name, account_class, is_system_account)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            ON CONFLICT (business_id, account_code) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(business_id)
        .bind(role.code())
        .bind(role.name())
        .bind(role.class().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to ensure system account", e))?;

        let account = self
            .get_account_by_code(business_id, role.code())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!(
                    "System account '{}' missing after insert",
                    role.code()
                ))
            })?;

        timer.observe_duration();

        Ok(account)
    }

    /// Get an account by code for a business.
    #[instrument(skip(self), fields(business_id = %business_id, code = %account_code))]
    pub async fn get_account_by_code(
        &self,
        business_id: Uuid,
        account_code: &str,
    ) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, business_id, account_code, account_name, account_class, parent_id, is_system_account, is_active, created_utc
            FROM chart_of_accounts
            WHERE business_id = $1 AND account_code = $2
            "#,
        )
        .bind(business_id)
        .bind(account_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to get account", e))?;

        Ok(account)
    }

    /// Count system accounts for a business.
    pub async fn count_system_accounts(&self, business_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chart_of_accounts WHERE business_id = $1 AND is_system_account",
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to count system accounts", e))?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Party Operations
    // -------------------------------------------------------------------------

    /// Look up an active party by its normalized name.
    #[instrument(skip(self), fields(business_id = %business_id))]
    pub async fn find_party_by_normalized(
        &self,
        business_id: Uuid,
        normalized_name: &str,
    ) -> Result<Option<Party>, AppError> {
        let party = sqlx::query_as::<_, Party>(
            r#"
            SELECT party_id, business_id, display_name, normalized_name, party_type, email, phone,
                   credit_limit, credit_days, is_active, created_utc, deleted_utc
            FROM clients
            WHERE business_id = $1 AND normalized_name = $2 AND deleted_utc IS NULL
            "#,
        )
        .bind(business_id)
        .bind(normalized_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to find party", e))?;

        Ok(party)
    }

    /// Insert a new party. A unique violation on
    /// (business_id, normalized_name) surfaces as `Conflict` so the
    /// resolver can re-fetch the row another writer created.
    #[instrument(skip(self), fields(business_id = %business_id, name = %display_name))]
    pub async fn insert_party(
        &self,
        business_id: Uuid,
        display_name: &str,
        normalized_name: &str,
        party_type: PartyType,
    ) -> Result<Party, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_party"])
            .start_timer();

        let party = sqlx::query_as::<_, Party>(
            r#"
            INSERT INTO clients (party_id, business_id, display_name, normalized_name, party_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING party_id, business_id, display_name, normalized_name, party_type, email, phone,
                      credit_limit, credit_days, is_active, created_utc, deleted_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(business_id)
        .bind(display_name)
        .bind(normalized_name)
        .bind(party_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to insert party", e))?;

        timer.observe_duration();

        info!(party_id = %party.party_id, "Party created");

        Ok(party)
    }

    // -------------------------------------------------------------------------
    // Journal Operations
    // -------------------------------------------------------------------------

    /// Atomically insert a posted journal entry header and its lines.
    /// The header and every line commit together or not at all; a
    /// defensive balance check rejects unbalanced inputs before any row
    /// is written (the poster already guarantees balance by
    /// construction).
    #[instrument(skip(self, header, lines), fields(business_id = %header.business_id, reference = %header.reference_number))]
    pub async fn insert_posted_entry(
        &self,
        header: &NewJournalEntry,
        lines: &[NewJournalLine],
    ) -> Result<(JournalEntry, Vec<JournalEntryLine>), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_posted_entry"])
            .start_timer();

        let debit_total: Decimal = lines.iter().map(|l| l.debit_amount).sum();
        let credit_total: Decimal = lines.iter().map(|l| l.credit_amount).sum();
        if debit_total != credit_total {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Unbalanced entry: debits ({}) != credits ({})",
                debit_total,
                credit_total
            )));
        }
        for line in lines {
            if line.debit_amount > Decimal::ZERO && line.credit_amount > Decimal::ZERO {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "Line {} has both debit and credit amounts",
                    line.line_number
                )));
            }
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(anyhow::anyhow!("Failed to begin transaction: {}", e)))?;

        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries
                (entry_id, business_id, reference_number, entry_date, description, source_type, is_posted, posted_utc, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, now(), $7)
            RETURNING entry_id, business_id, reference_number, entry_date, description, source_type,
                      is_posted, posted_utc, created_by, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(header.business_id)
        .bind(&header.reference_number)
        .bind(header.entry_date)
        .bind(&header.description)
        .bind(header.source.as_str())
        .bind(&header.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to insert journal entry", e))?;

        let mut inserted_lines = Vec::with_capacity(lines.len());
        for line in lines {
            let inserted = sqlx::query_as::<_, JournalEntryLine>(
                r#"
                INSERT INTO journal_entry_lines
                    (line_id, entry_id, account_id, party_id, line_number, debit_amount, credit_amount, description, gst_category)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING line_id, entry_id, account_id, party_id, line_number, debit_amount, credit_amount, description, gst_category
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(entry.entry_id)
            .bind(line.account_id)
            .bind(line.party_id)
            .bind(line.line_number)
            .bind(line.debit_amount)
            .bind(line.credit_amount)
            .bind(&line.description)
            .bind(&line.gst_category)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::from_sqlx("Failed to insert journal line", e))?;

            inserted_lines.push(inserted);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(anyhow::anyhow!("Failed to commit entry: {}", e)))?;

        timer.observe_duration();

        info!(
            entry_id = %entry.entry_id,
            reference = %entry.reference_number,
            amount = %debit_total,
            "Journal entry posted"
        );

        Ok((entry, inserted_lines))
    }

    /// All lines of posted entries dated on or after `cutoff`, joined
    /// with account class and party name. The duplicate filter's
    /// lookback query.
    #[instrument(skip(self), fields(business_id = %business_id, cutoff = %cutoff))]
    pub async fn posted_lines_since(
        &self,
        business_id: Uuid,
        cutoff: NaiveDate,
    ) -> Result<Vec<PostedLine>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["posted_lines_since"])
            .start_timer();

        let rows = sqlx::query_as::<_, PostedLine>(
            r#"
            SELECT je.entry_id,
                   je.entry_date,
                   je.description AS entry_description,
                   jel.debit_amount,
                   jel.credit_amount,
                   coa.account_class,
                   c.display_name AS party_name
            FROM journal_entries je
            JOIN journal_entry_lines jel ON jel.entry_id = je.entry_id
            JOIN chart_of_accounts coa ON coa.account_id = jel.account_id
            LEFT JOIN clients c ON c.party_id = jel.party_id
            WHERE je.business_id = $1
              AND je.is_posted
              AND je.entry_date >= $2
            ORDER BY je.entry_date, je.entry_id, jel.line_number
            "#,
        )
        .bind(business_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to load posted lines", e))?;

        timer.observe_duration();

        Ok(rows)
    }

    /// All lines of one entry, ordered by line number.
    pub async fn get_entry_lines(&self, entry_id: Uuid) -> Result<Vec<JournalEntryLine>, AppError> {
        let lines = sqlx::query_as::<_, JournalEntryLine>(
            r#"
            SELECT line_id, entry_id, account_id, party_id, line_number, debit_amount, credit_amount, description, gst_category
            FROM journal_entry_lines
            WHERE entry_id = $1
            ORDER BY line_number
            "#,
        )
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to get entry lines", e))?;

        Ok(lines)
    }

    /// Posted entries for a business, oldest first.
    pub async fn list_posted_entries(&self, business_id: Uuid) -> Result<Vec<JournalEntry>, AppError> {
        let entries = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT entry_id, business_id, reference_number, entry_date, description, source_type,
                   is_posted, posted_utc, created_by, created_utc
            FROM journal_entries
            WHERE business_id = $1 AND is_posted
            ORDER BY entry_date, created_utc
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to list entries", e))?;

        Ok(entries)
    }

    /// Count posted entries for a business.
    pub async fn count_posted_entries(&self, business_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM journal_entries WHERE business_id = $1 AND is_posted",
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to count entries", e))?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    /// Aggregate revenue, expenses, profit and receivables over posted
    /// entries. Read-only; this is the metrics shape handed to the
    /// commentary layer.
    #[instrument(skip(self), fields(business_id = %business_id))]
    pub async fn financial_summary(&self, business_id: Uuid) -> Result<FinancialSummary, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["financial_summary"])
            .start_timer();

        let (revenue, expenses, receivables): (Decimal, Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN coa.account_class = 'income' THEN jel.credit_amount - jel.debit_amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN coa.account_class = 'expense' THEN jel.debit_amount - jel.credit_amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN coa.account_code = $2 THEN jel.debit_amount - jel.credit_amount ELSE 0 END), 0)
            FROM journal_entries je
            JOIN journal_entry_lines jel ON jel.entry_id = je.entry_id
            JOIN chart_of_accounts coa ON coa.account_id = jel.account_id
            WHERE je.business_id = $1 AND je.is_posted
            "#,
        )
        .bind(business_id)
        .bind(SystemAccount::Receivable.code())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to compute financial summary", e))?;

        timer.observe_duration();

        Ok(FinancialSummary {
            revenue,
            expenses,
            profit: revenue - expenses,
            receivables,
        })
    }
}
